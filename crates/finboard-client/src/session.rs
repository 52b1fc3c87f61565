use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ClientError, ClientResult};

const SESSION_FILE: &str = "session.json";

/// What the signed-in user left behind: the home account and role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl SessionContext {
    /// The account to use for a command: an explicit override first, then
    /// the stored one. Blank values count as absent.
    pub fn resolve_account(&self, account_override: Option<&str>) -> ClientResult<String> {
        let usable = |value: &str| {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        };
        account_override
            .and_then(usable)
            .or_else(|| self.account_number.as_deref().and_then(usable))
            .ok_or_else(ClientError::account_required)
    }
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    home: PathBuf,
}

impl SessionStore {
    pub fn open(home_override: Option<&Path>) -> ClientResult<Self> {
        Ok(Self {
            home: resolve_session_home(home_override)?,
        })
    }

    pub fn path(&self) -> PathBuf {
        self.home.join(SESSION_FILE)
    }

    /// A missing session file is an empty session, not an error.
    pub fn load(&self) -> ClientResult<SessionContext> {
        let path = self.path();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                return Ok(SessionContext::default());
            }
            Err(error) => return Err(ClientError::session_read_failed(&path, &error.to_string())),
        };
        serde_json::from_str(&raw)
            .map_err(|error| ClientError::session_read_failed(&path, &error.to_string()))
    }

    pub fn save(&self, context: &SessionContext) -> ClientResult<()> {
        fs::create_dir_all(&self.home)
            .map_err(|error| ClientError::session_write_failed(&self.home, &error.to_string()))?;
        set_private_permissions_best_effort(&self.home, 0o700);

        let path = self.path();
        let body = serde_json::to_string_pretty(context)
            .map_err(|error| ClientError::internal_serialization(&error.to_string()))?;

        // Write beside the target and rename so readers never see half a file.
        let staging = self.home.join(format!("{SESSION_FILE}.tmp"));
        fs::write(&staging, body)
            .map_err(|error| ClientError::session_write_failed(&staging, &error.to_string()))?;
        set_private_permissions_best_effort(&staging, 0o600);
        fs::rename(&staging, &path)
            .map_err(|error| ClientError::session_write_failed(&path, &error.to_string()))?;

        debug!(path = %path.display(), "saved session");
        Ok(())
    }

    /// Returns true when a session file was removed.
    pub fn clear(&self) -> ClientResult<bool> {
        let path = self.path();
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(false),
            Err(error) => Err(ClientError::session_write_failed(&path, &error.to_string())),
        }
    }
}

/// `home_override` is the configured session home; without one the session
/// lives in `~/.finboard`.
pub fn resolve_session_home(home_override: Option<&Path>) -> ClientResult<PathBuf> {
    let candidate = match home_override {
        Some(path) => path.to_path_buf(),
        None => home::home_dir()
            .map(|home_path| home_path.join(".finboard"))
            .ok_or_else(|| {
                ClientError::session_read_failed(
                    Path::new("."),
                    "could not resolve a home directory",
                )
            })?,
    };

    if candidate.is_absolute() {
        return Ok(candidate);
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(&candidate))
        .map_err(|error| ClientError::session_read_failed(&candidate, &error.to_string()))
}

#[cfg(unix)]
fn set_private_permissions_best_effort(path: &Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;

    let _ = fs::set_permissions(path, fs::Permissions::from_mode(mode));
}

#[cfg(not(unix))]
fn set_private_permissions_best_effort(_path: &Path, _mode: u32) {}
