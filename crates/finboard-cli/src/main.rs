mod cli;
mod dispatch;
mod logging;
mod output;
mod stdout_io;

use std::process::ExitCode;

use clap::{Parser, error::ErrorKind};
use finboard_client::{ClientConfig, ClientError};
use stdout_io::write_stdout_text;
use tracing::debug;

const ROOT_HELP: &str = "finboard - account dashboard for the banking backend

Usage:
  finboard <command>

Start here:
  finboard session set <account-number>
  finboard dashboard
  finboard --help
";

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(code) => code,
    }
}

fn run() -> Result<ExitCode, ExitCode> {
    let raw_args = std::env::args().collect::<Vec<String>>();
    if raw_args.len() == 1 {
        if write_stdout_text(ROOT_HELP).is_err() {
            return Err(ExitCode::from(2));
        }
        return Ok(ExitCode::SUCCESS);
    }

    let cli = match cli::Cli::try_parse() {
        Ok(value) => value,
        Err(err) => return Err(report_parse_error(&err, &raw_args)),
    };
    let mode = output::mode_for(&cli);

    logging::init_tracing();

    let config = match ClientConfig::from_env() {
        Ok(config) => config.with_api_url(cli.global.api_url.as_deref()),
        Err(error) => return Err(report_failure(&error, mode)),
    };
    debug!(api_url = %config.api_url, "resolved configuration");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|error| {
            report_failure(&ClientError::internal_runtime(&error.to_string()), mode)
        })?;

    match runtime.block_on(dispatch::dispatch(&cli, &config)) {
        Ok(success) => {
            if output::print_success(&success, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => Err(report_failure(&error, mode)),
    }
}

fn report_failure(error: &ClientError, mode: output::OutputMode) -> ExitCode {
    if output::print_failure(error, mode).is_err() {
        return ExitCode::from(2);
    }
    exit_code_for_error(error)
}

fn report_parse_error(err: &clap::Error, raw_args: &[String]) -> ExitCode {
    if matches!(
        err.kind(),
        ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
    ) {
        if write_stdout_text(&err.to_string()).is_err() {
            return ExitCode::from(2);
        }
        return ExitCode::SUCCESS;
    }

    let command_hint = command_path_from_args(raw_args);
    let clean_message = strip_clap_boilerplate(&err.to_string());
    let parse_error = ClientError::invalid_argument_for_command(&clean_message, command_hint);
    report_failure(&parse_error, output::requested_mode(raw_args))
}

/// Drops clap's trailing usage and "For more information" lines so the
/// "What to do next" section is the single source of guidance.
fn strip_clap_boilerplate(message: &str) -> String {
    let trimmed = if let Some(pos) = message.find("\n\nUsage:") {
        &message[..pos]
    } else if let Some(pos) = message.find("\nFor more information") {
        &message[..pos]
    } else {
        message
    };
    trimmed.trim_start_matches("error: ").trim_end().to_string()
}

fn command_path_from_args(raw_args: &[String]) -> Option<&'static str> {
    let mut words = raw_args
        .iter()
        .skip(1)
        .filter(|value| !value.starts_with('-'))
        .map(String::as_str);

    match (words.next()?, words.next()) {
        ("session", Some("set")) => Some("session set"),
        ("session", Some("show")) => Some("session show"),
        ("session", Some("clear")) => Some("session clear"),
        ("session", _) => Some("session"),
        ("dashboard", _) => Some("dashboard"),
        ("history", _) => Some("history"),
        ("statements", _) => Some("statements"),
        ("portfolio", _) => Some("portfolio"),
        _ => None,
    }
}

fn exit_code_for_error(error: &ClientError) -> ExitCode {
    if is_internal_error(error) {
        ExitCode::from(2)
    } else {
        ExitCode::from(1)
    }
}

fn is_internal_error(error: &ClientError) -> bool {
    error.code.starts_with("internal_")
        || matches!(
            error.code.as_str(),
            "session_read_failed" | "session_write_failed" | "export_failed"
        )
}
