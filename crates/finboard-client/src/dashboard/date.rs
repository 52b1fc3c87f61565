use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::dashboard::record::RawTimestamp;
use crate::{ClientError, ClientResult};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Calendar month used as an aggregation key. Text labels are derived from it
/// only when rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            return Some(Self { year, month });
        }
        None
    }

    pub fn of(instant: &DateTime<Utc>) -> Self {
        Self {
            year: instant.year(),
            month: instant.month(),
        }
    }

    pub fn long_name(self) -> &'static str {
        let index = usize::try_from(self.month.saturating_sub(1)).unwrap_or(0);
        MONTH_NAMES.get(index).copied().unwrap_or("January")
    }

    pub fn short_label(self) -> &'static str {
        let name = self.long_name();
        name.get(..3).unwrap_or(name)
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn last_day(self) -> Option<NaiveDate> {
        self.first_day()?
            .checked_add_months(Months::new(1))?
            .pred_opt()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn is_set(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }
}

pub fn build_range(from: Option<&str>, to: Option<&str>, command: &str) -> ClientResult<DateRange> {
    let bound = |value: Option<&str>, field: &str| -> ClientResult<Option<NaiveDate>> {
        value
            .map(|raw| {
                parse_iso_date(raw).ok_or_else(|| {
                    ClientError::invalid_argument_for_command(
                        &format!("`{field}` {ISO_DATE_RULE}."),
                        Some(command),
                    )
                })
            })
            .transpose()
    };
    let parsed_from = bound(from, "from")?;
    let parsed_to = bound(to, "to")?;

    if let (Some(start), Some(end)) = (parsed_from, parsed_to)
        && start > end
    {
        return Err(ClientError::invalid_argument_for_command(
            "Invalid date range: `from` must be on or before `to`.",
            Some(command),
        ));
    }

    Ok(DateRange {
        from: parsed_from,
        to: parsed_to,
    })
}

pub const ISO_DATE_RULE: &str = "must be a real calendar date written as YYYY-MM-DD";

/// Accepts exactly `YYYY-MM-DD` with zero-padded fields and a date that
/// exists on the calendar.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let padded = value.len() == 10
        && value.char_indices().all(|(index, ch)| match index {
            4 | 7 => ch == '-',
            _ => ch.is_ascii_digit(),
        });
    if !padded {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Resolves a backend timestamp into an instant.
///
/// Digit-only strings and JSON numbers are epoch milliseconds. Text without
/// an offset is read as UTC.
pub fn parse_timestamp(raw: &RawTimestamp) -> Option<DateTime<Utc>> {
    match raw {
        RawTimestamp::Missing => None,
        RawTimestamp::EpochMillis(millis) => from_epoch_millis(*millis),
        RawTimestamp::Text(text) => parse_timestamp_text(text),
    }
}

pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

pub fn format_iso_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

pub fn month_from_name(value: &str) -> Option<u32> {
    let lowered = value.trim().to_ascii_lowercase();
    if lowered.len() < 3 {
        return None;
    }
    MONTH_NAMES
        .iter()
        .position(|name| name.to_ascii_lowercase().starts_with(&lowered))
        .and_then(|index| u32::try_from(index + 1).ok())
}

fn parse_timestamp_text(text: &str) -> Option<DateTime<Utc>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
        let millis = trimmed.parse::<i64>().ok()?;
        return Utc.timestamp_millis_opt(millis).single();
    }

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(with_offset.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(naive.and_utc());
        }
    }

    parse_iso_date(trimmed).map(start_of_day)
}

fn from_epoch_millis(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() || millis.fract() != 0.0 {
        return None;
    }
    if millis.abs() > 8.64e15 {
        return None;
    }
    Utc.timestamp_millis_opt(millis as i64).single()
}
