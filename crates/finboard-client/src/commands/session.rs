use tracing::info;

use crate::config::ClientConfig;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::SessionData;
use crate::session::{SessionContext, SessionStore};
use crate::{ClientError, ClientResult};

pub fn show(config: &ClientConfig) -> ClientResult<SuccessEnvelope> {
    let store = SessionStore::open(config.home.as_deref())?;
    let context = store.load()?;
    success("session show", session_data(&store, context, None))
}

pub fn set(config: &ClientConfig, account: &str, role: Option<&str>) -> ClientResult<SuccessEnvelope> {
    let account = account.trim();
    if account.is_empty() {
        return Err(ClientError::invalid_argument_for_command(
            "Account number must not be blank.",
            Some("session set"),
        ));
    }

    let store = SessionStore::open(config.home.as_deref())?;
    let mut context = store.load()?;
    context.account_number = Some(account.to_string());
    if let Some(role) = role.map(str::trim).filter(|role| !role.is_empty()) {
        context.role = Some(role.to_string());
    }
    store.save(&context)?;
    info!(account, "session account updated");

    success("session set", session_data(&store, context, None))
}

pub fn clear(config: &ClientConfig) -> ClientResult<SuccessEnvelope> {
    let store = SessionStore::open(config.home.as_deref())?;
    let removed = store.clear()?;
    success(
        "session clear",
        session_data(&store, SessionContext::default(), Some(removed)),
    )
}

fn session_data(store: &SessionStore, context: SessionContext, cleared: Option<bool>) -> SessionData {
    SessionData {
        path: store.path().display().to_string(),
        account_number: context.account_number,
        role: context.role,
        cleared,
    }
}
