use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use tracing::info;

use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::StatementsData;
use crate::dashboard::date::{MonthKey, build_range, month_from_name};
use crate::dashboard::record::TransactionRecord;
use crate::dashboard::statements::{
    StatementPeriod, custom_statement, export_statements_csv, month_statement, monthly_statements,
};
use crate::fetch::BankBackend;
use crate::{ClientError, ClientResult};

const COMMAND: &str = "statements";

#[derive(Debug, Clone, Default)]
pub struct StatementsOptions {
    pub year: Option<i32>,
    pub month: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub export: Option<PathBuf>,
}

/// Options resolved against today's date, before any fetch happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementPlan {
    pub year: i32,
    pub month: Option<u32>,
    pub custom: Option<(NaiveDate, NaiveDate)>,
}

impl StatementsOptions {
    pub fn plan(&self, today: NaiveDate) -> ClientResult<StatementPlan> {
        let year = self.year.unwrap_or_else(|| today.year());
        if year > today.year() {
            return Err(ClientError::invalid_argument_for_command(
                &format!("Year {year} is in the future."),
                Some(COMMAND),
            ));
        }

        let month = match self.month.as_deref() {
            Some(name) => Some(month_from_name(name).ok_or_else(|| {
                ClientError::invalid_argument_for_command(
                    &format!("Unknown month `{}`.", name.trim()),
                    Some(COMMAND),
                )
            })?),
            None => None,
        };
        if let Some(month) = month
            && year == today.year()
            && month > today.month()
        {
            return Err(ClientError::invalid_argument_for_command(
                &format!("No statement exists yet for month {month} of {year}."),
                Some(COMMAND),
            ));
        }

        let range = build_range(self.from.as_deref(), self.to.as_deref(), COMMAND)?;
        let custom = match (range.from, range.to) {
            (Some(start), Some(end)) => Some((start, end)),
            (None, None) => None,
            _ => {
                return Err(ClientError::invalid_argument_for_command(
                    "A custom period needs both --from and --to.",
                    Some(COMMAND),
                ));
            }
        };

        Ok(StatementPlan {
            year,
            month,
            custom,
        })
    }
}

/// Custom period first, then the monthly statements of the planned year.
pub fn build_statements(
    records: &[TransactionRecord],
    home_account: &str,
    plan: &StatementPlan,
    today: NaiveDate,
) -> Vec<StatementPeriod> {
    let mut periods = Vec::new();
    if let Some((start, end)) = plan.custom {
        periods.push(custom_statement(records, home_account, start, end));
    }

    match plan.month.and_then(|month| MonthKey::new(plan.year, month)) {
        Some(key) => periods.extend(month_statement(records, home_account, key)),
        None => periods.extend(monthly_statements(records, home_account, plan.year, today)),
    }
    periods
}

pub async fn run<B: BankBackend>(
    backend: &B,
    account: &str,
    options: &StatementsOptions,
    today: NaiveDate,
) -> ClientResult<SuccessEnvelope> {
    let plan = options.plan(today)?;
    let records = backend.fetch_transactions(account).await?;
    let periods = build_statements(&records, account, &plan, today);

    let exported_to = match &options.export {
        Some(path) => {
            export_statements_csv(&periods, path)?;
            info!(path = %path.display(), periods = periods.len(), "exported statements");
            Some(path.display().to_string())
        }
        None => None,
    };

    success(
        COMMAND,
        StatementsData {
            account: account.to_string(),
            year: plan.year,
            periods,
            exported_to,
        },
    )
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::{StatementsOptions, build_statements};
    use crate::dashboard::record::TransactionRecord;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 15).unwrap_or_default()
    }

    #[test]
    fn plan_defaults_to_current_year_and_validates_flags() {
        let plan = StatementsOptions::default().plan(today());
        assert_eq!(plan.ok().map(|plan| plan.year), Some(2025));

        let future = StatementsOptions {
            year: Some(2026),
            ..StatementsOptions::default()
        };
        assert!(future.plan(today()).is_err());

        let half_range = StatementsOptions {
            from: Some("2025-01-01".to_string()),
            ..StatementsOptions::default()
        };
        assert!(half_range.plan(today()).is_err());

        let bad_month = StatementsOptions {
            month: Some("Smarch".to_string()),
            ..StatementsOptions::default()
        };
        assert!(bad_month.plan(today()).is_err());

        let upcoming_month = StatementsOptions {
            month: Some("april".to_string()),
            ..StatementsOptions::default()
        };
        let rejected = upcoming_month.plan(today());
        assert!(rejected.is_err());
        if let Err(error) = rejected {
            assert_eq!(error.code, "invalid_argument");
        }

        let last_year_april = StatementsOptions {
            year: Some(2024),
            month: Some("april".to_string()),
            ..StatementsOptions::default()
        };
        assert_eq!(last_year_april.plan(today()).ok().and_then(|plan| plan.month), Some(4));
    }

    #[test]
    fn month_filter_picks_the_statement_by_calendar_month() {
        let records = [
            json!({"id": "1", "type": "DEPOSIT", "amount": 30, "timestamp": "2024-11-04"}),
            json!({"id": "2", "type": "DEPOSIT", "amount": 7, "timestamp": "2024-01-04"}),
        ]
        .iter()
        .filter_map(TransactionRecord::from_value)
        .collect::<Vec<TransactionRecord>>();

        let options = StatementsOptions {
            year: Some(2024),
            month: Some("nov".to_string()),
            ..StatementsOptions::default()
        };
        let Ok(plan) = options.plan(today()) else {
            panic!("plan should resolve");
        };

        let periods = build_statements(&records, "ACC-1", &plan, today());
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].name, "November 2024");
        assert_eq!(periods[0].start_date, "2024-11-01");
        assert_eq!(periods[0].end_date, "2024-11-30");
        assert_eq!(periods[0].credits, 30.0);
    }

    #[test]
    fn month_filter_and_custom_period_compose() {
        let records = [
            json!({"id": "1", "type": "DEPOSIT", "amount": 10, "timestamp": "2025-02-03"}),
            json!({"id": "2", "type": "WITHDRAW", "amount": 4, "timestamp": "2025-02-20"}),
        ]
        .iter()
        .filter_map(TransactionRecord::from_value)
        .collect::<Vec<TransactionRecord>>();

        let options = StatementsOptions {
            month: Some("feb".to_string()),
            from: Some("2025-02-01".to_string()),
            to: Some("2025-02-10".to_string()),
            ..StatementsOptions::default()
        };
        let Ok(plan) = options.plan(today()) else {
            panic!("plan should resolve");
        };

        let periods = build_statements(&records, "ACC-1", &plan, today());
        assert_eq!(periods.len(), 2);
        assert_eq!(periods[0].name, "Custom Period");
        assert_eq!(periods[0].credits, 10.0);
        assert_eq!(periods[0].debits, 0.0);
        assert_eq!(periods[1].name, "February 2025");
        assert_eq!(periods[1].balance, 6.0);
        assert_eq!(periods[1].txn_count, 2);
    }
}
