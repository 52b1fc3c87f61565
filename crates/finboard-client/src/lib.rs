pub mod commands;
pub mod config;
pub mod contracts;
pub mod dashboard;
pub mod error;
pub mod fetch;
pub mod portfolio;
pub mod session;

pub use config::ClientConfig;
pub use contracts::envelope::{FailureEnvelope, SuccessEnvelope};
pub use error::{ClientError, ClientResult};
pub use fetch::{BankBackend, HttpBackend};

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");
