use std::io;

use serde_json::Value;

use super::format::{Column, key_value_rows, money, num_field, render_table, rows_field, str_field};

const MAX_TEXT_ROWS: usize = 25;

pub fn render_dashboard(data: &Value) -> io::Result<String> {
    let filter = data
        .get("filter")
        .ok_or_else(|| io::Error::other("dashboard output requires filter"))?;
    let totals = data
        .get("totals")
        .ok_or_else(|| io::Error::other("dashboard output requires totals"))?;

    let mut lines = vec![format!(
        "Dashboard for {} ({})",
        str_field(data, "account"),
        describe_filter(filter)
    )];

    lines.push(String::new());
    lines.push("Totals:".to_string());
    lines.extend(key_value_rows(
        &[
            ("Credit:", money(num_field(totals, "credit").unwrap_or(0.0))),
            ("Debit:", money(num_field(totals, "debit").unwrap_or(0.0))),
            ("Net:", money(num_field(totals, "net").unwrap_or(0.0))),
        ],
        2,
    ));

    let monthly = rows_field(data, "monthly");
    lines.push(String::new());
    if monthly.is_empty() {
        lines.push("No credits or debits in this window.".to_string());
    } else {
        lines.push("By month:".to_string());
        let rows = monthly
            .iter()
            .map(|bucket| {
                vec![
                    str_field(bucket, "label"),
                    money(num_field(bucket, "credit").unwrap_or(0.0)),
                    money(num_field(bucket, "debit").unwrap_or(0.0)),
                    bucket
                        .get("records")
                        .and_then(Value::as_u64)
                        .unwrap_or(0)
                        .to_string(),
                ]
            })
            .collect::<Vec<Vec<String>>>();
        lines.extend(render_table(
            &[
                Column::left("Month"),
                Column::right("Credit"),
                Column::right("Debit"),
                Column::right("Records"),
            ],
            &rows,
        ));
    }

    let transactions = rows_field(data, "rows");
    let fetched = data.get("fetched_count").and_then(Value::as_u64).unwrap_or(0);
    lines.push(String::new());
    lines.push(format!(
        "Transactions ({} of {fetched} fetched):",
        transactions.len()
    ));
    if transactions.is_empty() {
        lines.push("  Nothing matches the current filters.".to_string());
    } else {
        let rows = transactions
            .iter()
            .take(MAX_TEXT_ROWS)
            .map(|row| {
                vec![
                    date_part(row.get("timestamp")),
                    str_field(row, "type"),
                    str_field(row, "sender_account"),
                    str_field(row, "receiver_account"),
                    num_field(row, "amount").map(money).unwrap_or_default(),
                ]
            })
            .collect::<Vec<Vec<String>>>();
        lines.extend(render_table(
            &[
                Column::left("Date"),
                Column::left("Type"),
                Column::left("From"),
                Column::left("To"),
                Column::right("Amount"),
            ],
            &rows,
        ));
        if transactions.len() > MAX_TEXT_ROWS {
            lines.push(format!(
                "  ... {} more; use --json for the full list.",
                transactions.len() - MAX_TEXT_ROWS
            ));
        }
    }

    let skipped = data.get("skipped_count").and_then(Value::as_u64).unwrap_or(0);
    if skipped > 0 {
        lines.push(String::new());
        lines.push(format!(
            "{skipped} record(s) were left out of the totals (no readable date or amount, or not tied to this account)."
        ));
    }

    Ok(lines.join("\n"))
}

pub fn render_watch_summary(data: &Value) -> io::Result<String> {
    let refreshes = data.get("refreshes").and_then(Value::as_u64).unwrap_or(0);
    Ok(format!(
        "Stopped watching {} after {refreshes} refresh(es).",
        str_field(data, "account")
    ))
}

fn describe_filter(filter: &Value) -> String {
    let from = filter.get("from").and_then(Value::as_str);
    let to = filter.get("to").and_then(Value::as_str);
    let window = match (from, to) {
        (None, None) => str_field(filter, "mode"),
        (start, end) => format!("{} to {}", start.unwrap_or("start"), end.unwrap_or("now")),
    };

    match filter.get("search").and_then(Value::as_str) {
        Some(term) => format!("{window}, matching \"{term}\""),
        None => window,
    }
}

pub(super) fn date_part(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map(|text| text.get(..10).unwrap_or(text).to_string())
        .unwrap_or_else(|| "-".to_string())
}
