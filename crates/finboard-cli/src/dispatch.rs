use std::ops::ControlFlow;

use chrono::Utc;
use finboard_client::commands::dashboard::DashboardOptions;
use finboard_client::commands::statements::StatementsOptions;
use finboard_client::commands::{self, common::resolve_account};
use finboard_client::contracts::envelope::success;
use finboard_client::dashboard::filter::FilterState;
use finboard_client::{ClientConfig, ClientResult, HttpBackend, SuccessEnvelope};
use serde_json::json;
use tracing::info;

use crate::cli::{Cli, Commands, IsoDate, SessionCommand};
use crate::output::{self, OutputMode};

pub async fn dispatch(cli: &Cli, config: &ClientConfig) -> ClientResult<SuccessEnvelope> {
    let account_override = cli.global.account.as_deref();

    match &cli.command {
        Commands::Session { command } => match command {
            SessionCommand::Show => commands::session::show(config),
            SessionCommand::Set {
                account_number,
                role,
            } => commands::session::set(config, account_number, role.as_deref()),
            SessionCommand::Clear => commands::session::clear(config),
        },
        Commands::Dashboard {
            range,
            from,
            to,
            search,
            watch,
        } => {
            let options = DashboardOptions {
                range: range.clone(),
                from: from.as_ref().map(IsoDate::as_str).map(str::to_string),
                to: to.as_ref().map(IsoDate::as_str).map(str::to_string),
                search: search.clone(),
            };
            let state = options.filter_state()?;
            let account = resolve_account(config, account_override)?;
            let backend = HttpBackend::new(config)?;

            if *watch {
                let mode = output::mode_for(cli);
                watch_dashboard(backend, account, state, config, mode).await
            } else {
                commands::dashboard::run(&backend, &account, &state).await
            }
        }
        Commands::History => {
            let account = resolve_account(config, account_override)?;
            let backend = HttpBackend::new(config)?;
            commands::history::run(&backend, &account).await
        }
        Commands::Statements {
            year,
            month,
            from,
            to,
            export,
        } => {
            let options = StatementsOptions {
                year: *year,
                month: month.clone(),
                from: from.as_ref().map(IsoDate::as_str).map(str::to_string),
                to: to.as_ref().map(IsoDate::as_str).map(str::to_string),
                export: export.clone(),
            };
            let account = resolve_account(config, account_override)?;
            let backend = HttpBackend::new(config)?;
            let today = Utc::now().date_naive();
            commands::statements::run(&backend, &account, &options, today).await
        }
        Commands::Portfolio => {
            let account = resolve_account(config, account_override)?;
            let backend = HttpBackend::new(config)?;
            commands::portfolio::run(&backend, &account).await
        }
    }
}

/// Streams dashboard refreshes to stdout until Ctrl-C or a write failure.
async fn watch_dashboard(
    backend: HttpBackend,
    account: String,
    state: FilterState,
    config: &ClientConfig,
    mode: OutputMode,
) -> ClientResult<SuccessEnvelope> {
    let mut refreshes = 0usize;
    let watching = commands::dashboard::watch(
        backend,
        account.clone(),
        state,
        config.poll_interval,
        |update| {
            let printed = match update {
                Ok(data) => {
                    refreshes += 1;
                    success("dashboard", data)
                        .map_err(|error| std::io::Error::other(error.message))
                        .and_then(|envelope| output::print_success(&envelope, mode))
                }
                Err(error) => output::print_failure(&error, mode),
            };
            if printed.is_err() {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        },
    );

    tokio::select! {
        result = watching => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("stopping dashboard watch");
        }
    }

    success(
        "dashboard watch",
        json!({ "account": account, "refreshes": refreshes }),
    )
}
