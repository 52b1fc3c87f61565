use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxnKind {
    Deposit,
    InitialDeposit,
    Withdraw,
    Transfer,
    Other(String),
}

impl TxnKind {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "DEPOSIT" => Self::Deposit,
            "INITIAL_DEPOSIT" => Self::InitialDeposit,
            "WITHDRAW" => Self::Withdraw,
            "TRANSFER" => Self::Transfer,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Deposit => "DEPOSIT",
            Self::InitialDeposit => "INITIAL_DEPOSIT",
            Self::Withdraw => "WITHDRAW",
            Self::Transfer => "TRANSFER",
            Self::Other(value) => value,
        }
    }

    pub fn is_deposit(&self) -> bool {
        matches!(self, Self::Deposit | Self::InitialDeposit)
    }
}

/// Timestamp exactly as the backend sent it. Parsing happens lazily in
/// [`crate::dashboard::date::parse_timestamp`].
#[derive(Debug, Clone, PartialEq)]
pub enum RawTimestamp {
    Text(String),
    EpochMillis(f64),
    Missing,
}

/// One entry of an account's transaction history.
///
/// Built leniently from backend JSON: every field tolerates absence or an
/// unexpected type, so construction only fails for non-object values.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    pub id: String,
    pub timestamp: RawTimestamp,
    pub kind: Option<TxnKind>,
    pub sender_account: String,
    pub receiver_account: String,
    pub amount: Option<f64>,
    /// Amount rendered as text, used by search. Empty for zero or missing amounts.
    pub amount_text: String,
}

impl TransactionRecord {
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let kind_text = text_field(object.get("type"));
        let (amount, amount_text) = read_amount(object.get("amount"));

        Some(Self {
            id: text_field(object.get("id")),
            timestamp: read_timestamp(object),
            kind: if kind_text.is_empty() {
                None
            } else {
                Some(TxnKind::parse(&kind_text))
            },
            sender_account: text_field(object.get("senderAccount")),
            receiver_account: text_field(object.get("receiverAccount")),
            amount,
            amount_text,
        })
    }

    pub fn kind_str(&self) -> &str {
        self.kind.as_ref().map(TxnKind::as_str).unwrap_or("")
    }

    pub fn abs_amount(&self) -> Option<f64> {
        self.amount.map(f64::abs)
    }
}

/// Renders a number the way a JSON number prints: integral values without a
/// fractional part.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    format!("{value}")
}

fn read_timestamp(object: &Map<String, Value>) -> RawTimestamp {
    let primary = raw_timestamp(object.get("timestamp"));
    if primary != RawTimestamp::Missing {
        return primary;
    }
    raw_timestamp(object.get("date"))
}

fn raw_timestamp(value: Option<&Value>) -> RawTimestamp {
    match value {
        Some(Value::String(text)) if !text.trim().is_empty() => {
            RawTimestamp::Text(text.trim().to_string())
        }
        Some(Value::Number(number)) => match number.as_f64() {
            Some(millis) if millis != 0.0 => RawTimestamp::EpochMillis(millis),
            _ => RawTimestamp::Missing,
        },
        _ => RawTimestamp::Missing,
    }
}

fn read_amount(value: Option<&Value>) -> (Option<f64>, String) {
    match value {
        Some(Value::Number(number)) => {
            let parsed = number.as_f64();
            let text = match (number.as_i64(), parsed) {
                (Some(0), _) => String::new(),
                (Some(integer), _) => integer.to_string(),
                (None, Some(float)) if float == 0.0 => String::new(),
                (None, Some(float)) => format_number(float),
                (None, None) => number.to_string(),
            };
            (parsed, text)
        }
        Some(Value::String(text)) => {
            let parsed = text.trim().parse::<f64>().ok().filter(|v| v.is_finite());
            (parsed, text.clone())
        }
        _ => (None, String::new()),
    }
}

fn text_field(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => match number.as_i64() {
            Some(integer) => integer.to_string(),
            None => number.as_f64().map(format_number).unwrap_or_default(),
        },
        Some(Value::Bool(flag)) => flag.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{RawTimestamp, TransactionRecord, TxnKind, format_number};

    #[test]
    fn lenient_parse_accepts_numeric_identifiers_and_string_amounts() {
        let record = TransactionRecord::from_value(&json!({
            "id": 917,
            "timestamp": "1736500000000",
            "type": "TRANSFER",
            "senderAccount": 1234567890u64,
            "receiverAccount": "0000000042",
            "amount": "-40.50"
        }));
        assert!(record.is_some());
        if let Some(value) = record {
            assert_eq!(value.id, "917");
            assert_eq!(value.sender_account, "1234567890");
            assert_eq!(value.kind, Some(TxnKind::Transfer));
            assert_eq!(value.amount, Some(-40.5));
            assert_eq!(value.amount_text, "-40.50");
            assert_eq!(
                value.timestamp,
                RawTimestamp::Text("1736500000000".to_string())
            );
        }
    }

    #[test]
    fn date_field_backs_up_an_empty_timestamp() {
        let record = TransactionRecord::from_value(&json!({
            "timestamp": "",
            "date": "2025-03-01",
            "amount": 0
        }));
        assert!(record.is_some());
        if let Some(value) = record {
            assert_eq!(value.timestamp, RawTimestamp::Text("2025-03-01".to_string()));
            assert_eq!(value.amount, Some(0.0));
            assert_eq!(value.amount_text, "");
            assert_eq!(value.kind, None);
        }
    }

    #[test]
    fn non_objects_are_rejected() {
        assert!(TransactionRecord::from_value(&json!("DEPOSIT")).is_none());
        assert!(TransactionRecord::from_value(&json!([1, 2])).is_none());
    }

    #[test]
    fn numbers_render_like_json() {
        assert_eq!(format_number(40.0), "40");
        assert_eq!(format_number(40.5), "40.5");
        assert_eq!(format_number(-0.25), "-0.25");
    }

    #[test]
    fn unknown_types_are_kept_verbatim() {
        let kind = TxnKind::parse("REVERSAL");
        assert_eq!(kind.as_str(), "REVERSAL");
        assert!(!kind.is_deposit());
        assert!(TxnKind::parse("INITIAL_DEPOSIT").is_deposit());
    }
}
