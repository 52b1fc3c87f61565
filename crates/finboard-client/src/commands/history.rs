use crate::ClientResult;
use crate::commands::common::{display_timestamp, sort_newest_first};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{HistoryData, HistoryRow};
use crate::dashboard::aggregate::{Direction, classify};
use crate::dashboard::record::{TransactionRecord, TxnKind};
use crate::fetch::BankBackend;

pub async fn run<B: BankBackend>(backend: &B, account: &str) -> ClientResult<SuccessEnvelope> {
    let records = backend.fetch_transactions(account).await?;
    success(
        "history",
        HistoryData {
            account: account.to_string(),
            rows: history_rows(&records, account),
        },
    )
}

pub fn history_rows(records: &[TransactionRecord], home_account: &str) -> Vec<HistoryRow> {
    let mut ordered = records.iter().collect::<Vec<&TransactionRecord>>();
    sort_newest_first(&mut ordered);
    ordered
        .into_iter()
        .map(|record| history_row(record, home_account))
        .collect()
}

fn history_row(record: &TransactionRecord, home_account: &str) -> HistoryRow {
    let direction = classify(record, home_account);
    let signed_amount = match direction {
        Some(Direction::Credit) => record.abs_amount(),
        Some(Direction::Debit) => record.abs_amount().map(|amount| -amount),
        None => record.amount,
    };

    HistoryRow {
        id: record.id.clone(),
        timestamp: display_timestamp(record),
        kind: record.kind_str().to_string(),
        direction: direction
            .map_or("unclassified", Direction::past_tense)
            .to_string(),
        counterparty: counterparty(record, direction, home_account),
        signed_amount,
    }
}

fn counterparty(record: &TransactionRecord, direction: Option<Direction>, home_account: &str) -> String {
    match record.kind.as_ref() {
        Some(TxnKind::Deposit) => return "Bank Deposit".to_string(),
        Some(TxnKind::InitialDeposit) => return "Initial Deposit".to_string(),
        Some(TxnKind::Withdraw) => return "Bank Withdrawal".to_string(),
        _ => {}
    }

    let other = match direction {
        Some(Direction::Credit) => record.sender_account.trim(),
        Some(Direction::Debit) => record.receiver_account.trim(),
        None if record.sender_account.trim() == home_account.trim() => {
            record.receiver_account.trim()
        }
        None => record.sender_account.trim(),
    };
    if other.is_empty() {
        "Unknown".to_string()
    } else {
        other.to_string()
    }
}
