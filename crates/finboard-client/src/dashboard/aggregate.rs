use std::collections::BTreeMap;

use tracing::debug;

use crate::dashboard::date::{MonthKey, parse_timestamp};
use crate::dashboard::record::{TransactionRecord, TxnKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Credit,
    Debit,
}

impl Direction {
    /// Label used on history rows.
    pub const fn past_tense(self) -> &'static str {
        match self {
            Self::Credit => "credited",
            Self::Debit => "debited",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MonthlyBucket {
    pub credit: f64,
    pub debit: f64,
    pub records: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    pub total_credit: f64,
    pub total_debit: f64,
    pub monthly: BTreeMap<MonthKey, MonthlyBucket>,
    pub records_considered: usize,
    pub records_skipped: usize,
}

impl Aggregation {
    pub fn net(&self) -> f64 {
        self.total_credit - self.total_debit
    }

    pub fn bucket(&self, key: MonthKey) -> Option<&MonthlyBucket> {
        self.monthly.get(&key)
    }

    /// True when every bucket falls in one calendar year, so short month
    /// labels are unambiguous.
    pub fn spans_single_year(&self) -> bool {
        let mut years = self.monthly.keys().map(|key| key.year);
        match years.next() {
            Some(first) => years.all(|year| year == first),
            None => true,
        }
    }
}

/// Decides which side of the home account a record lands on.
///
/// Type tags win over account matching, and a receiver match wins over a
/// sender match, so no record is ever counted twice.
pub fn classify(record: &TransactionRecord, home_account: &str) -> Option<Direction> {
    match record.kind.as_ref() {
        Some(TxnKind::Withdraw) => return Some(Direction::Debit),
        Some(kind) if kind.is_deposit() => return Some(Direction::Credit),
        _ => {}
    }

    let home = home_account.trim();
    if home.is_empty() {
        return None;
    }
    if record.receiver_account.trim() == home {
        return Some(Direction::Credit);
    }
    if record.sender_account.trim() == home {
        return Some(Direction::Debit);
    }
    None
}

/// Reduces records into credit/debit totals and monthly buckets. Records with
/// an unreadable timestamp or amount, or that belong to neither side, are
/// skipped.
pub fn aggregate<'a, I>(records: I, home_account: &str) -> Aggregation
where
    I: IntoIterator<Item = &'a TransactionRecord>,
{
    let mut aggregation = Aggregation::default();

    for record in records {
        aggregation.records_considered += 1;

        let Some(instant) = parse_timestamp(&record.timestamp) else {
            debug!(id = %record.id, "skipping record with unreadable timestamp");
            aggregation.records_skipped += 1;
            continue;
        };
        let Some(amount) = record.abs_amount() else {
            debug!(id = %record.id, "skipping record with unreadable amount");
            aggregation.records_skipped += 1;
            continue;
        };
        let Some(direction) = classify(record, home_account) else {
            debug!(
                id = %record.id,
                sender = %record.sender_account,
                receiver = %record.receiver_account,
                "skipping record unrelated to home account"
            );
            aggregation.records_skipped += 1;
            continue;
        };

        let bucket = aggregation.monthly.entry(MonthKey::of(&instant)).or_default();
        bucket.records += 1;
        match direction {
            Direction::Credit => {
                aggregation.total_credit += amount;
                bucket.credit += amount;
            }
            Direction::Debit => {
                aggregation.total_debit += amount;
                bucket.debit += amount;
            }
        }
    }

    aggregation
}
