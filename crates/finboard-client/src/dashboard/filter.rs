use chrono::{DateTime, Utc};

use crate::dashboard::date::{DateRange, parse_timestamp, start_of_day};
use crate::dashboard::record::TransactionRecord;
use crate::{ClientError, ClientResult};

const MILLIS_PER_DAY: f64 = 1000.0 * 60.0 * 60.0 * 24.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeMode {
    Last7Days,
    #[default]
    Last12Months,
    AllTime,
}

impl TimeMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Last7Days => "last-7-days",
            Self::Last12Months => "last-12-months",
            Self::AllTime => "all-time",
        }
    }

    pub fn parse(value: &str) -> ClientResult<Self> {
        match value.trim() {
            "7d" | "last-7-days" => Ok(Self::Last7Days),
            "12m" | "last-12-months" => Ok(Self::Last12Months),
            "all" | "all-time" => Ok(Self::AllTime),
            other => Err(ClientError::invalid_argument_for_command(
                &format!("Unknown time range `{other}`; expected one of 7d, 12m, all."),
                Some("dashboard"),
            )),
        }
    }

    const fn max_age_days(self) -> Option<f64> {
        match self {
            Self::Last7Days => Some(7.0),
            Self::Last12Months => Some(365.0),
            Self::AllTime => None,
        }
    }
}

/// Dashboard filter controls. An explicit date range, when present, replaces
/// the rolling window entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub mode: TimeMode,
    pub range: DateRange,
    pub search_term: String,
}

impl FilterState {
    pub fn has_explicit_range(&self) -> bool {
        self.range.is_set()
    }

    /// Back to the default twelve-month view with no range and no search.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Returns the records that pass both the time and the search predicate, in
/// their original order.
pub fn apply_filters<'a>(
    records: &'a [TransactionRecord],
    state: &FilterState,
    now: DateTime<Utc>,
) -> Vec<&'a TransactionRecord> {
    let term = state.search_term.trim().to_lowercase();
    records
        .iter()
        .filter(|record| matches_time(record, state, now) && matches_search(record, &term))
        .collect()
}

pub fn matches_time(record: &TransactionRecord, state: &FilterState, now: DateTime<Utc>) -> bool {
    let Some(instant) = parse_timestamp(&record.timestamp) else {
        // Undated rows only survive the unrestricted view.
        return state.mode == TimeMode::AllTime && !state.has_explicit_range();
    };

    if state.has_explicit_range() {
        let after_start = state
            .range
            .from
            .is_none_or(|from| instant >= start_of_day(from));
        let before_end = state.range.to.is_none_or(|to| instant <= start_of_day(to));
        return after_start && before_end;
    }

    match state.mode.max_age_days() {
        Some(max_age) => {
            let age_days = (now - instant).num_milliseconds() as f64 / MILLIS_PER_DAY;
            age_days <= max_age
        }
        None => true,
    }
}

/// `term` must already be lowercased.
pub fn matches_search(record: &TransactionRecord, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }

    [
        record.kind_str(),
        record.receiver_account.as_str(),
        record.sender_account.as_str(),
        record.amount_text.as_str(),
        record.id.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(term))
}
