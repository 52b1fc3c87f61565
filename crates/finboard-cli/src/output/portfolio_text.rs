use std::io;

use serde_json::Value;

use super::format::{Column, key_value_rows, money, num_field, percent, render_table, rows_field, str_field};

pub fn render_portfolio(data: &Value) -> io::Result<String> {
    let positions = rows_field(data, "positions");
    let mut lines = vec![format!("Portfolio for {}:", str_field(data, "account"))];
    lines.push(String::new());

    if positions.is_empty() {
        lines.push("  No quotes available.".to_string());
        return Ok(lines.join("\n"));
    }

    let rows = positions
        .iter()
        .map(|position| {
            vec![
                str_field(position, "symbol"),
                format!("{}", num_field(position, "quantity").unwrap_or(0.0)),
                money(num_field(position, "buy_price").unwrap_or(0.0)),
                money(num_field(position, "current_price").unwrap_or(0.0)),
                money(num_field(position, "market_value").unwrap_or(0.0)),
                percent(num_field(position, "return_pct")),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    lines.extend(render_table(
        &[
            Column::left("Symbol"),
            Column::right("Qty"),
            Column::right("Buy"),
            Column::right("Price"),
            Column::right("Value"),
            Column::right("Return"),
        ],
        &rows,
    ));

    if let Some(summary) = data.get("summary").filter(|value| value.is_object()) {
        lines.push(String::new());
        lines.push("Summary:".to_string());
        let symbol = |key: &str| {
            summary
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or("n/a")
                .to_string()
        };
        lines.extend(key_value_rows(
            &[
                ("Total value:", money(num_field(summary, "total_value").unwrap_or(0.0))),
                (
                    "Invested:",
                    money(num_field(summary, "total_investment").unwrap_or(0.0)),
                ),
                (
                    "Profit/loss:",
                    format!(
                        "{} ({})",
                        money(num_field(summary, "total_pl").unwrap_or(0.0)),
                        percent(num_field(summary, "total_pl_pct"))
                    ),
                ),
                ("Best:", symbol("best_symbol")),
                ("Worst:", symbol("worst_symbol")),
            ],
            2,
        ));
    }

    Ok(lines.join("\n"))
}
