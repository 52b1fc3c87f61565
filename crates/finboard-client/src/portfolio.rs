use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Holding {
    pub symbol: String,
    pub quantity: f64,
    pub average_buy_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub symbol: String,
    pub current_price: f64,
    pub buy_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Position {
    pub symbol: String,
    pub quantity: f64,
    pub buy_price: f64,
    pub current_price: f64,
    pub market_value: f64,
    pub return_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub total_value: f64,
    pub total_investment: f64,
    pub total_pl: f64,
    pub total_pl_pct: Option<f64>,
    pub best_symbol: Option<String>,
    pub worst_symbol: Option<String>,
}

/// Reads holdings from either `{holdings: [...]}` or a bare array.
pub fn holdings_from_value(body: &Value) -> Vec<Holding> {
    let items = body
        .get("holdings")
        .and_then(Value::as_array)
        .or_else(|| body.as_array());
    let Some(items) = items else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let symbol = text(item.get("stockSymbol").or_else(|| item.get("symbol")))?;
            Some(Holding {
                symbol,
                quantity: number(item.get("quantity")).unwrap_or(0.0),
                average_buy_price: number(item.get("averageBuyPrice")),
            })
        })
        .collect()
}

pub fn quotes_from_value(body: &Value) -> Vec<Quote> {
    let Some(items) = body.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            Some(Quote {
                symbol: text(item.get("symbol"))?,
                current_price: number(item.get("currentPrice"))?,
                buy_price: number(item.get("buyPrice")),
            })
        })
        .collect()
}

/// One position per quoted symbol. Quantities come from the account's
/// holdings (zero when not held); the buy price prefers the holding's average.
pub fn merge_positions(quotes: &[Quote], holdings: &[Holding]) -> Vec<Position> {
    quotes
        .iter()
        .map(|quote| {
            let holding = holdings
                .iter()
                .find(|holding| holding.symbol.eq_ignore_ascii_case(&quote.symbol));
            let quantity = holding.map(|value| value.quantity).unwrap_or(0.0);
            let buy_price = holding
                .and_then(|value| value.average_buy_price)
                .or(quote.buy_price)
                .unwrap_or(quote.current_price);
            let return_pct = if buy_price > 0.0 {
                Some((quote.current_price - buy_price) / buy_price * 100.0)
            } else {
                None
            };

            Position {
                symbol: quote.symbol.clone(),
                quantity,
                buy_price,
                current_price: quote.current_price,
                market_value: quantity * quote.current_price,
                return_pct,
            }
        })
        .collect()
}

pub fn summarize(positions: &[Position]) -> Option<PortfolioSummary> {
    if positions.is_empty() {
        return None;
    }

    let total_value = positions.iter().map(|p| p.quantity * p.current_price).sum::<f64>();
    let total_investment = positions.iter().map(|p| p.quantity * p.buy_price).sum::<f64>();
    let total_pl = total_value - total_investment;
    let total_pl_pct = if total_investment > 0.0 {
        Some(total_pl / total_investment * 100.0)
    } else {
        None
    };

    let mut ranked = positions
        .iter()
        .filter_map(|position| position.return_pct.map(|pct| (pct, position.symbol.as_str())))
        .collect::<Vec<(f64, &str)>>();
    ranked.sort_by(|left, right| right.0.total_cmp(&left.0).then_with(|| left.1.cmp(right.1)));

    Some(PortfolioSummary {
        total_value,
        total_investment,
        total_pl,
        total_pl_pct,
        best_symbol: ranked.first().map(|(_, symbol)| symbol.to_string()),
        worst_symbol: ranked.last().map(|(_, symbol)| symbol.to_string()),
    })
}

fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        _ => None,
    }
}

fn number(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|parsed| parsed.is_finite())
}
