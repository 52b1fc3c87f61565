use crate::cli::Cli;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    Json,
}

pub fn mode_for(cli: &Cli) -> OutputMode {
    if cli.global.json {
        OutputMode::Json
    } else {
        OutputMode::Text
    }
}

/// Best guess from raw arguments, for errors raised before clap succeeds.
pub fn requested_mode(raw_args: &[String]) -> OutputMode {
    if raw_args.iter().skip(1).any(|value| value == "--json") {
        OutputMode::Json
    } else {
        OutputMode::Text
    }
}
