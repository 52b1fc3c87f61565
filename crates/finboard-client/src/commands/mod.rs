pub mod common;
pub mod dashboard;
pub mod history;
pub mod portfolio;
pub mod session;
pub mod statements;
