mod dashboard_text;
mod error_text;
mod format;
mod json;
mod ledger_text;
mod mode;
mod portfolio_text;
mod session_text;

use std::io;

use finboard_client::{ClientError, SuccessEnvelope};

use crate::stdout_io::{write_stderr_line, write_stdout_line};

pub use mode::{OutputMode, mode_for, requested_mode};

pub fn print_success(success: &SuccessEnvelope, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Text => render_text_success(success)?,
        OutputMode::Json => json::render_success_json(success)?,
    };
    write_stdout_line(&body)?;

    if mode == OutputMode::Text {
        for warning in &success.warnings {
            write_stderr_line(&format!("warning: {warning}"))?;
        }
    }
    Ok(())
}

pub fn print_failure(error: &ClientError, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Json => json::render_error_json(error)?,
        OutputMode::Text => error_text::render_error(error),
    };
    write_stdout_line(&body)
}

fn render_text_success(success: &SuccessEnvelope) -> io::Result<String> {
    match success.command.as_str() {
        "session show" | "session set" | "session clear" => {
            session_text::render_session(&success.command, &success.data)
        }
        "dashboard" => dashboard_text::render_dashboard(&success.data),
        "dashboard watch" => dashboard_text::render_watch_summary(&success.data),
        "history" => ledger_text::render_history(&success.data),
        "statements" => ledger_text::render_statements(&success.data),
        "portfolio" => portfolio_text::render_portfolio(&success.data),
        _ => Err(io::Error::other(format!(
            "unsupported text output command `{}`",
            success.command
        ))),
    }
}
