use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

pub(crate) const LOGIN_HINT: &str = "Sign in again through the banking web app, then retry.";

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl ClientError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `finboard {cmd} --help` for usage."),
            None => "Run `finboard --help` for usage.".to_string(),
        };
        let error = Self::new("invalid_argument", message, vec![help_hint]);
        if let Some(cmd) = command {
            return error.with_data(json!({
                "command_hint": cmd,
            }));
        }
        error
    }

    pub fn invalid_config(variable: &str, value: &str) -> Self {
        Self::new(
            "invalid_config",
            &format!("Environment variable `{variable}` has an unusable value `{value}`."),
            vec![format!("Unset `{variable}` or give it a valid value.")],
        )
        .with_data(json!({
            "variable": variable,
            "value": value,
        }))
    }

    pub fn account_required() -> Self {
        Self::new(
            "account_required",
            "No account number is known for this session.",
            vec![
                "Run `finboard session set <account-number>`.".to_string(),
                "Or pass `--account <number>` to this command.".to_string(),
            ],
        )
    }

    pub fn fetch_failed(url: &str, detail: &str) -> Self {
        Self::new(
            "fetch_failed",
            &format!("Could not load data from `{url}`: {detail}"),
            vec![
                "Check that the banking backend is running and reachable.".to_string(),
                "Retry the command.".to_string(),
            ],
        )
        .with_data(json!({
            "url": url,
        }))
    }

    pub fn backend_rejected(url: &str, message: &str) -> Self {
        Self::new(
            "fetch_failed",
            &format!("The backend rejected the request to `{url}`: {message}"),
            vec!["Retry the command.".to_string()],
        )
        .with_data(json!({
            "url": url,
            "backend_message": message,
        }))
    }

    pub fn auth_required(url: &str) -> Self {
        Self::new(
            "auth_required",
            &format!("The backend requires authentication for `{url}`."),
            vec![
                LOGIN_HINT.to_string(),
                "Set `FINBOARD_TOKEN` to a valid bearer token.".to_string(),
            ],
        )
        .with_data(json!({
            "url": url,
        }))
    }

    pub fn unrecognized_envelope(received: &str) -> Self {
        Self::new(
            "unrecognized_envelope",
            &format!("The transaction list arrived in an unrecognized shape ({received})."),
            vec![
                "Confirm the backend version matches this client.".to_string(),
                "If the response is a login page, sign in again and retry.".to_string(),
            ],
        )
        .with_data(json!({
            "received": received,
            "supported_shapes": ["array", "status_data", "content", "transactions", "list"],
        }))
    }

    pub fn session_read_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "session_read_failed",
            &format!("Cannot read session file `{location}`: {detail}"),
            vec![
                "Run `finboard session clear` to reset the session.".to_string(),
                "Or set `FINBOARD_HOME` to another directory.".to_string(),
            ],
        )
    }

    pub fn session_write_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "session_write_failed",
            &format!("Cannot write session file `{location}`: {detail}"),
            vec![format!(
                "Grant write access to `{location}` or set `FINBOARD_HOME` to a writable directory."
            )],
        )
    }

    pub fn export_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "export_failed",
            &format!("Cannot export statements to `{location}`: {detail}"),
            vec!["Choose a writable export path and retry.".to_string()],
        )
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }

    pub fn internal_runtime(message: &str) -> Self {
        Self::new("internal_runtime_error", message, Vec::new())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
