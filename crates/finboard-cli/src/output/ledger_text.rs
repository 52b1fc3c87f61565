use std::io;

use serde_json::Value;

use super::dashboard_text::date_part;
use super::format::{Column, money, num_field, render_table, rows_field, signed_money, str_field};

pub fn render_history(data: &Value) -> io::Result<String> {
    let rows = data
        .get("rows")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("history output requires rows"))?;

    let mut lines = vec![format!(
        "Transaction history for {} ({} records):",
        str_field(data, "account"),
        rows.len()
    )];
    lines.push(String::new());

    if rows.is_empty() {
        lines.push("  No transactions yet.".to_string());
        return Ok(lines.join("\n"));
    }

    let table_rows = rows
        .iter()
        .map(|row| {
            vec![
                date_part(row.get("timestamp")),
                str_field(row, "direction"),
                str_field(row, "counterparty"),
                str_field(row, "type"),
                num_field(row, "signed_amount")
                    .map(signed_money)
                    .unwrap_or_else(|| "?".to_string()),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    lines.extend(render_table(
        &[
            Column::left("Date"),
            Column::left("Direction"),
            Column::left("Counterparty"),
            Column::left("Type"),
            Column::right("Amount"),
        ],
        &table_rows,
    ));

    Ok(lines.join("\n"))
}

pub fn render_statements(data: &Value) -> io::Result<String> {
    let periods = rows_field(data, "periods");
    let year = data.get("year").and_then(Value::as_i64).unwrap_or_default();

    let mut lines = vec![format!(
        "Statements for {} ({year}):",
        str_field(data, "account")
    )];
    lines.push(String::new());

    if periods.is_empty() {
        lines.push("  No statement periods for this selection.".to_string());
    } else {
        let rows = periods
            .iter()
            .map(|period| {
                vec![
                    str_field(period, "name"),
                    format!(
                        "{} - {}",
                        str_field(period, "start_date"),
                        str_field(period, "end_date")
                    ),
                    money(num_field(period, "credits").unwrap_or(0.0)),
                    money(num_field(period, "debits").unwrap_or(0.0)),
                    signed_money(num_field(period, "balance").unwrap_or(0.0)),
                    period
                        .get("txn_count")
                        .and_then(Value::as_u64)
                        .unwrap_or(0)
                        .to_string(),
                ]
            })
            .collect::<Vec<Vec<String>>>();
        lines.extend(render_table(
            &[
                Column::left("Period"),
                Column::left("Dates"),
                Column::right("Credits"),
                Column::right("Debits"),
                Column::right("Balance"),
                Column::right("Txns"),
            ],
            &rows,
        ));
    }

    if let Some(path) = data.get("exported_to").and_then(Value::as_str) {
        lines.push(String::new());
        lines.push(format!("Exported to {path}"));
    }

    Ok(lines.join("\n"))
}
