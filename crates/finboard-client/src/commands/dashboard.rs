use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, warn};

use crate::ClientResult;
use crate::commands::common::{sort_newest_first, transaction_row};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{DashboardData, DashboardTotals, FilterSummary, MonthlyBucketRow};
use crate::dashboard::aggregate::aggregate;
use crate::dashboard::date::{build_range, format_iso_date};
use crate::dashboard::filter::{FilterState, TimeMode, apply_filters};
use crate::dashboard::record::TransactionRecord;
use crate::fetch::BankBackend;
use crate::fetch::sequence::{RequestSequencer, RequestTicket};

#[derive(Debug, Clone, Default)]
pub struct DashboardOptions {
    pub range: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub search: Option<String>,
}

impl DashboardOptions {
    pub fn filter_state(&self) -> ClientResult<FilterState> {
        let mode = match self.range.as_deref() {
            Some(value) => TimeMode::parse(value)?,
            None => TimeMode::default(),
        };
        let range = build_range(self.from.as_deref(), self.to.as_deref(), "dashboard")?;
        Ok(FilterState {
            mode,
            range,
            search_term: self.search.clone().unwrap_or_default(),
        })
    }
}

/// Filters and aggregates an already-fetched list. Pure: the same inputs
/// always give the same view.
pub fn build_dashboard(
    account: &str,
    records: &[TransactionRecord],
    state: &FilterState,
    now: DateTime<Utc>,
) -> DashboardData {
    let mut filtered = apply_filters(records, state, now);
    let aggregation = aggregate(filtered.iter().copied(), account);

    let single_year = aggregation.spans_single_year();
    let monthly = aggregation
        .monthly
        .iter()
        .map(|(key, bucket)| MonthlyBucketRow {
            label: if single_year {
                key.short_label().to_string()
            } else {
                format!("{} {}", key.short_label(), key.year)
            },
            year: key.year,
            month: key.month,
            credit: bucket.credit,
            debit: bucket.debit,
            records: bucket.records,
        })
        .collect();

    let filtered_count = filtered.len();
    sort_newest_first(&mut filtered);
    let search = state.search_term.trim();

    DashboardData {
        account: account.to_string(),
        filter: FilterSummary {
            mode: state.mode.as_str().to_string(),
            from: state.range.from.as_ref().map(format_iso_date),
            to: state.range.to.as_ref().map(format_iso_date),
            search: (!search.is_empty()).then(|| search.to_string()),
        },
        totals: DashboardTotals {
            credit: aggregation.total_credit,
            debit: aggregation.total_debit,
            net: aggregation.net(),
        },
        monthly,
        fetched_count: records.len(),
        filtered_count,
        skipped_count: aggregation.records_skipped,
        rows: filtered.into_iter().map(transaction_row).collect(),
    }
}

pub async fn run<B: BankBackend>(
    backend: &B,
    account: &str,
    state: &FilterState,
) -> ClientResult<SuccessEnvelope> {
    let records = backend.fetch_transactions(account).await?;
    success("dashboard", build_dashboard(account, &records, state, Utc::now()))
}

/// Refreshes the dashboard every `period` until `on_update` breaks.
///
/// Each tick fetches in its own task so a slow response never blocks the
/// next poll. A response is shown only if nothing newer has been shown
/// already; failures are reported but leave the last view in place.
pub async fn watch<B, F>(
    backend: B,
    account: String,
    state: FilterState,
    period: Duration,
    mut on_update: F,
) -> ClientResult<()>
where
    B: BankBackend + Clone + Send + Sync + 'static,
    F: FnMut(ClientResult<DashboardData>) -> ControlFlow<()>,
{
    let sequencer = Arc::new(RequestSequencer::default());
    let (sender, mut receiver) =
        mpsc::channel::<(RequestTicket, ClientResult<Vec<TransactionRecord>>)>(16);
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let ticket = sequencer.issue();
                let task_backend = backend.clone();
                let task_account = account.clone();
                let task_sender = sender.clone();
                tokio::spawn(async move {
                    let result = task_backend.fetch_transactions(&task_account).await;
                    let _ = task_sender.send((ticket, result)).await;
                });
            }
            Some((ticket, result)) = receiver.recv() => {
                let flow = match result {
                    Ok(records) => {
                        if !sequencer.try_apply(ticket) {
                            debug!(ticket = ticket.value(), "discarding stale dashboard response");
                            continue;
                        }
                        on_update(Ok(build_dashboard(&account, &records, &state, Utc::now())))
                    }
                    Err(error) => {
                        if ticket.value() <= sequencer.last_applied() {
                            debug!(ticket = ticket.value(), "ignoring stale fetch failure");
                            continue;
                        }
                        warn!(code = %error.code, "dashboard refresh failed");
                        on_update(Err(error))
                    }
                };
                if flow.is_break() {
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::{DashboardOptions, build_dashboard};
    use crate::dashboard::record::TransactionRecord;

    fn records() -> Vec<TransactionRecord> {
        [
            json!({"id": "1", "type": "DEPOSIT", "amount": 100, "timestamp": "2025-01-10T10:00:00Z"}),
            json!({"id": "2", "type": "TRANSFER", "amount": 50, "senderAccount": "HOME",
                   "receiverAccount": "X", "timestamp": "2025-01-20T10:00:00Z"}),
            json!({"id": "3", "type": "TRANSFER", "amount": 25, "senderAccount": "X",
                   "receiverAccount": "HOME", "timestamp": "2025-02-05T10:00:00Z"}),
        ]
        .iter()
        .filter_map(TransactionRecord::from_value)
        .collect()
    }

    #[test]
    fn dashboard_totals_buckets_and_rows_line_up() {
        let options = DashboardOptions {
            range: Some("all".to_string()),
            ..DashboardOptions::default()
        };
        let state = options.filter_state();
        assert!(state.is_ok());
        let Ok(state) = state else { return };
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).single().unwrap_or_default();

        let data = build_dashboard("HOME", &records(), &state, now);
        assert_eq!(data.totals.credit, 125.0);
        assert_eq!(data.totals.debit, 50.0);
        assert_eq!(data.totals.net, 75.0);
        assert_eq!(data.filtered_count, 3);
        let labels: Vec<&str> = data.monthly.iter().map(|row| row.label.as_str()).collect();
        assert_eq!(labels, vec!["Jan", "Feb"]);
        assert_eq!(data.rows.first().map(|row| row.id.as_str()), Some("3"));
    }

    #[test]
    fn search_narrows_rows_and_totals_together() {
        let options = DashboardOptions {
            range: Some("all".to_string()),
            search: Some("  deposit ".to_string()),
            ..DashboardOptions::default()
        };
        let Ok(state) = options.filter_state() else {
            panic!("options should parse");
        };
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).single().unwrap_or_default();

        let data = build_dashboard("HOME", &records(), &state, now);
        assert_eq!(data.filtered_count, 1);
        assert_eq!(data.totals.credit, 100.0);
        assert_eq!(data.totals.debit, 0.0);
        assert_eq!(data.filter.search.as_deref(), Some("deposit"));
    }

    #[test]
    fn bad_range_flags_are_rejected_before_fetching() {
        let options = DashboardOptions {
            range: Some("fortnight".to_string()),
            ..DashboardOptions::default()
        };
        assert!(options.filter_state().is_err());

        let reversed = DashboardOptions {
            from: Some("2025-02-01".to_string()),
            to: Some("2025-01-01".to_string()),
            ..DashboardOptions::default()
        };
        assert!(reversed.filter_state().is_err());
    }
}
