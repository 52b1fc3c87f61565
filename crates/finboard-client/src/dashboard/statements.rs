use std::io::Write;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::dashboard::aggregate::{Direction, classify};
use crate::dashboard::date::{MonthKey, format_iso_date, parse_timestamp};
use crate::dashboard::record::TransactionRecord;
use crate::{ClientError, ClientResult};

pub const CUSTOM_PERIOD_NAME: &str = "Custom Period";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementPeriod {
    pub name: String,
    pub month: String,
    pub start_date: String,
    pub end_date: String,
    pub credits: f64,
    pub debits: f64,
    pub balance: f64,
    pub txn_count: usize,
}

/// One statement per month of `year`, newest first. The current year stops at
/// the month containing `today`.
pub fn monthly_statements(
    records: &[TransactionRecord],
    home_account: &str,
    year: i32,
    today: NaiveDate,
) -> Vec<StatementPeriod> {
    let last_month = if year == today.year() {
        today.month()
    } else {
        12
    };

    (1..=last_month)
        .rev()
        .filter_map(|month| MonthKey::new(year, month))
        .filter_map(|key| month_statement(records, home_account, key))
        .collect()
}

pub fn month_statement(
    records: &[TransactionRecord],
    home_account: &str,
    key: MonthKey,
) -> Option<StatementPeriod> {
    let start = key.first_day()?;
    let end = key.last_day()?;
    let name = format!("{} {}", key.long_name(), key.year);
    Some(summarize(records, home_account, start, end, name, key.long_name()))
}

pub fn custom_statement(
    records: &[TransactionRecord],
    home_account: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> StatementPeriod {
    summarize(
        records,
        home_account,
        start,
        end,
        CUSTOM_PERIOD_NAME.to_string(),
        "Custom",
    )
}

pub fn write_statements_csv<W: Write>(periods: &[StatementPeriod], writer: W) -> csv::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for period in periods {
        csv_writer.serialize(period)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn export_statements_csv(
    periods: &[StatementPeriod],
    path: &std::path::Path,
) -> ClientResult<()> {
    let file = std::fs::File::create(path)
        .map_err(|error| ClientError::export_failed(path, &error.to_string()))?;
    write_statements_csv(periods, file)
        .map_err(|error| ClientError::export_failed(path, &error.to_string()))
}

fn summarize(
    records: &[TransactionRecord],
    home_account: &str,
    start: NaiveDate,
    end: NaiveDate,
    name: String,
    month: &str,
) -> StatementPeriod {
    let mut credits = 0.0;
    let mut debits = 0.0;
    let mut txn_count = 0usize;

    for record in records {
        let Some(instant) = parse_timestamp(&record.timestamp) else {
            continue;
        };
        let day = instant.date_naive();
        if day < start || day > end {
            continue;
        }
        txn_count += 1;

        let Some(amount) = record.abs_amount() else {
            continue;
        };
        match classify(record, home_account) {
            Some(Direction::Credit) => credits += amount,
            Some(Direction::Debit) => debits += amount,
            None => {}
        }
    }

    StatementPeriod {
        name,
        month: month.to_string(),
        start_date: format_iso_date(&start),
        end_date: format_iso_date(&end),
        credits,
        debits,
        balance: credits - debits,
        txn_count,
    }
}
