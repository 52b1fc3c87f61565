use std::path::PathBuf;
use std::time::Duration;

use crate::{ClientError, ClientResult};

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_QUOTES_URL: &str = "http://localhost:3000/stocks";
pub const DEFAULT_POLL_SECS: u64 = 5;

const API_URL_VAR: &str = "FINBOARD_API_URL";
const QUOTES_URL_VAR: &str = "FINBOARD_QUOTES_URL";
const TOKEN_VAR: &str = "FINBOARD_TOKEN";
const HOME_VAR: &str = "FINBOARD_HOME";
const POLL_SECS_VAR: &str = "FINBOARD_POLL_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub quotes_url: String,
    pub token: Option<String>,
    pub home: Option<PathBuf>,
    pub poll_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            quotes_url: DEFAULT_QUOTES_URL.to_string(),
            token: None,
            home: None,
            poll_interval: Duration::from_secs(DEFAULT_POLL_SECS),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(url) = read(API_URL_VAR) {
            config.api_url = normalize_url(&url);
        }
        if let Some(url) = read(QUOTES_URL_VAR) {
            config.quotes_url = url;
        }
        config.token = read(TOKEN_VAR);
        config.home = read(HOME_VAR).map(PathBuf::from);
        if let Some(raw) = read(POLL_SECS_VAR) {
            let seconds = raw
                .parse::<u64>()
                .ok()
                .filter(|value| *value > 0)
                .ok_or_else(|| ClientError::invalid_config(POLL_SECS_VAR, &raw))?;
            config.poll_interval = Duration::from_secs(seconds);
        }
        Ok(config)
    }

    pub fn with_api_url(mut self, api_url: Option<&str>) -> Self {
        if let Some(url) = api_url.map(str::trim).filter(|url| !url.is_empty()) {
            self.api_url = normalize_url(url);
        }
        self
    }

    pub fn with_home(mut self, home: Option<PathBuf>) -> Self {
        if home.is_some() {
            self.home = home;
        }
        self
    }
}

fn normalize_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
