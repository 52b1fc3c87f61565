use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use finboard_client::dashboard::date;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsoDate(pub String);

impl IsoDate {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn parse_iso_date(value: &str) -> Result<IsoDate, String> {
    date::parse_iso_date(value)
        .map(|_| IsoDate(value.to_string()))
        .ok_or_else(|| format!("date {}", date::ISO_DATE_RULE))
}

pub fn parse_time_range(value: &str) -> Result<String, String> {
    match value {
        "7d" | "12m" | "all" => Ok(value.to_string()),
        _ => Err("range must be one of: 7d, 12m, all".to_string()),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "finboard",
    version,
    about = "account dashboard for the banking backend",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Account number to use instead of the stored session account
    #[arg(long, global = true)]
    pub account: Option<String>,
    /// Backend base URL (overrides FINBOARD_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,
    /// Emit machine-readable JSON output
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show or change the stored session account
    #[command(arg_required_else_help = true)]
    Session {
        #[command(subcommand)]
        command: SessionCommand,
    },
    /// Credit/debit totals and monthly buckets for the home account
    Dashboard {
        /// Rolling window: 7d, 12m or all
        #[arg(long, value_parser = parse_time_range)]
        range: Option<String>,
        /// Start date, inclusive (YYYY-MM-DD); overrides --range
        #[arg(long, value_parser = parse_iso_date)]
        from: Option<IsoDate>,
        /// End date (YYYY-MM-DD); overrides --range
        #[arg(long, value_parser = parse_iso_date)]
        to: Option<IsoDate>,
        /// Case-insensitive text matched against type, accounts, amount and id
        #[arg(long)]
        search: Option<String>,
        /// Keep polling the backend and redraw on every accepted response
        #[arg(long)]
        watch: bool,
    },
    /// Every transaction, newest first, with direction and counterparty
    History,
    /// Monthly statement summaries, optionally with a custom period
    Statements {
        /// Statement year (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,
        /// Only this month, by name (e.g. `march` or `mar`)
        #[arg(long)]
        month: Option<String>,
        /// Custom period start (YYYY-MM-DD)
        #[arg(long, value_parser = parse_iso_date, requires = "to")]
        from: Option<IsoDate>,
        /// Custom period end (YYYY-MM-DD)
        #[arg(long, value_parser = parse_iso_date, requires = "from")]
        to: Option<IsoDate>,
        /// Also write the statements to this CSV file
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Stock positions valued at current quotes
    Portfolio,
}

#[derive(Debug, Clone, Subcommand)]
pub enum SessionCommand {
    /// Print the stored account and role
    Show,
    /// Store the home account for later commands
    Set {
        /// Account number to remember
        account_number: String,
        /// Role reported by the login flow
        #[arg(long)]
        role: Option<String>,
    },
    /// Forget the stored account
    Clear,
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}
