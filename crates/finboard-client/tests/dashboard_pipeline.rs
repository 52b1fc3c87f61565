mod support;

use chrono::{TimeZone, Utc};
use finboard_client::ClientError;
use finboard_client::commands::dashboard::{self, DashboardOptions, build_dashboard};
use finboard_client::commands::{history, portfolio, statements};
use finboard_client::commands::statements::StatementsOptions;
use finboard_client::dashboard::date::build_range;
use finboard_client::dashboard::filter::{FilterState, TimeMode};
use finboard_client::portfolio::{Holding, Quote};
use serde_json::{Value, json};
use support::{FixtureBackend, records};

fn scenario_a() -> Vec<Value> {
    vec![
        json!({"id": "t1", "type": "DEPOSIT", "receiverAccount": "ACC1", "amount": 100,
               "timestamp": "2025-01-10"}),
        json!({"id": "t2", "type": "TRANSFER", "senderAccount": "ACC1", "receiverAccount": "ACC2",
               "amount": 40, "timestamp": "2025-01-15"}),
    ]
}

fn all_time() -> FilterState {
    FilterState {
        mode: TimeMode::AllTime,
        ..FilterState::default()
    }
}

#[tokio::test]
async fn dashboard_command_fetches_filters_and_aggregates() {
    let backend = FixtureBackend::with_transactions(&scenario_a());

    let response = dashboard::run(&backend, "ACC1", &all_time()).await;
    assert!(response.is_ok());
    if let Ok(envelope) = response {
        assert_eq!(envelope.command, "dashboard");
        assert_eq!(envelope.data["totals"]["credit"], json!(100.0));
        assert_eq!(envelope.data["totals"]["debit"], json!(40.0));
        assert_eq!(envelope.data["monthly"][0]["label"], json!("Jan"));
        assert_eq!(envelope.data["monthly"][0]["credit"], json!(100.0));
        assert_eq!(envelope.data["monthly"][0]["debit"], json!(40.0));
        assert_eq!(envelope.data["filtered_count"], json!(2));
    }
}

#[test]
fn explicit_range_beats_the_seven_day_window() {
    let records = records(&[
        json!({"id": "jan", "type": "DEPOSIT", "amount": 5, "timestamp": "2025-01-05"}),
        json!({"id": "feb", "type": "DEPOSIT", "amount": 7, "timestamp": "2025-02-10"}),
    ]);
    let Ok(range) = build_range(Some("2025-02-01"), Some("2025-02-28"), "dashboard") else {
        panic!("range should parse");
    };
    let state = FilterState {
        mode: TimeMode::Last7Days,
        range,
        search_term: String::new(),
    };
    let now = Utc
        .with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
        .single()
        .unwrap_or_default();

    let data = build_dashboard("ACC1", &records, &state, now);
    let ids: Vec<&str> = data.rows.iter().map(|row| row.id.as_str()).collect();
    assert_eq!(ids, vec!["feb"]);
    assert_eq!(data.totals.credit, 7.0);
}

#[test]
fn amount_search_narrows_to_one_record() {
    let records = records(&scenario_a());
    let state = FilterState {
        search_term: "40".to_string(),
        ..all_time()
    };

    let data = build_dashboard("ACC1", &records, &state, Utc::now());
    assert_eq!(data.filtered_count, 1);
    assert_eq!(data.rows[0].id, "t2");
    assert_eq!(data.totals.credit, 0.0);
    assert_eq!(data.totals.debit, 40.0);
}

#[test]
fn undated_rows_pass_all_time_but_never_reach_the_totals() {
    let mut values = scenario_a();
    values.push(json!({"id": "odd", "type": "DEPOSIT", "amount": 999, "timestamp": "not-a-date"}));
    let records = records(&values);

    let data = build_dashboard("ACC1", &records, &all_time(), Utc::now());
    assert_eq!(data.filtered_count, 3);
    assert_eq!(data.skipped_count, 1);
    assert_eq!(data.totals.credit, 100.0);

    let twelve_months = build_dashboard("ACC1", &records, &FilterState::default(), Utc::now());
    assert!(twelve_months.rows.iter().all(|row| row.id != "odd"));
}

#[tokio::test]
async fn history_and_statements_share_the_classification() {
    let backend = FixtureBackend::with_transactions(&scenario_a());

    let history = history::run(&backend, "ACC1").await;
    assert!(history.is_ok());
    if let Ok(envelope) = history {
        let rows = envelope.data["rows"].as_array().cloned().unwrap_or_default();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["id"], json!("t2"));
        assert_eq!(rows[0]["direction"], json!("debited"));
        assert_eq!(rows[0]["counterparty"], json!("ACC2"));
        assert_eq!(rows[1]["counterparty"], json!("Bank Deposit"));
    }

    let Ok(temp) = tempfile::tempdir() else {
        panic!("tempdir should be available");
    };
    let export = temp.path().join("statements.csv");
    let options = StatementsOptions {
        year: Some(2025),
        month: Some("january".to_string()),
        export: Some(export.clone()),
        ..StatementsOptions::default()
    };
    let today = chrono::NaiveDate::from_ymd_opt(2025, 4, 2).unwrap_or_default();

    let statements = statements::run(&backend, "ACC1", &options, today).await;
    assert!(statements.is_ok());
    if let Ok(envelope) = statements {
        let periods = envelope.data["periods"].as_array().cloned().unwrap_or_default();
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0]["name"], json!("January 2025"));
        assert_eq!(periods[0]["credits"], json!(100.0));
        assert_eq!(periods[0]["debits"], json!(40.0));
        assert_eq!(periods[0]["balance"], json!(60.0));
    }

    let written = std::fs::read_to_string(&export);
    assert!(written.is_ok());
    if let Ok(text) = written {
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("name,month,start_date,end_date,credits,debits,balance,txn_count")
        );
        assert!(lines.next().is_some_and(|line| line.starts_with("January 2025,January,2025-01-01,2025-01-31")));
    }
}

#[tokio::test]
async fn portfolio_falls_back_to_quotes_when_holdings_fail() {
    let quotes = vec![Quote {
        symbol: "ACME".to_string(),
        current_price: 12.0,
        buy_price: Some(10.0),
    }];

    let without_holdings = FixtureBackend {
        quotes: quotes.clone(),
        ..FixtureBackend::default()
    };
    let response = portfolio::run(&without_holdings, "ACC1").await;
    assert!(response.is_ok());
    if let Ok(envelope) = response {
        assert_eq!(envelope.data["holdings_available"], json!(false));
        assert_eq!(envelope.data["positions"][0]["quantity"], json!(0.0));
        assert_eq!(envelope.warnings.len(), 1);
    }

    let with_holdings = FixtureBackend {
        quotes,
        holdings: Some(vec![Holding {
            symbol: "acme".to_string(),
            quantity: 4.0,
            average_buy_price: Some(8.0),
        }]),
        ..FixtureBackend::default()
    };
    let response = portfolio::run(&with_holdings, "ACC1").await;
    assert!(response.is_ok());
    if let Ok(envelope) = response {
        assert!(envelope.warnings.is_empty());
        assert_eq!(envelope.data["positions"][0]["market_value"], json!(48.0));
        assert_eq!(envelope.data["summary"]["total_pl"], json!(16.0));
    }
}

#[tokio::test]
async fn portfolio_reports_expired_login_instead_of_empty_holdings() {
    let backend = FixtureBackend {
        quotes: vec![Quote {
            symbol: "ACME".to_string(),
            current_price: 12.0,
            buy_price: None,
        }],
        holdings_error: Some(ClientError::auth_required("fixture://portfolio")),
        ..FixtureBackend::default()
    };

    let response = portfolio::run(&backend, "ACC1").await;
    assert!(response.is_err());
    if let Err(error) = response {
        assert_eq!(error.code, "auth_required");
        assert!(!error.recovery_steps.is_empty());
    }

    let reshaped = FixtureBackend {
        holdings_error: Some(ClientError::unrecognized_envelope("text/html")),
        ..backend
    };
    let response = portfolio::run(&reshaped, "ACC1").await;
    assert!(response.is_ok());
    if let Ok(envelope) = response {
        assert_eq!(envelope.data["holdings_available"], json!(false));
        assert_eq!(envelope.warnings.len(), 1);
    }
}

#[test]
fn dashboard_options_reject_unknown_windows() {
    let options = DashboardOptions {
        range: Some("90d".to_string()),
        ..DashboardOptions::default()
    };
    let result = options.filter_state();
    assert!(result.is_err());
    if let Err(error) = result {
        assert_eq!(error.code, "invalid_argument");
    }
}
