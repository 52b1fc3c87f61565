use crate::ClientResult;
use crate::config::ClientConfig;
use crate::contracts::types::TransactionRow;
use crate::dashboard::date::{format_instant, parse_timestamp};
use crate::dashboard::record::TransactionRecord;
use crate::session::SessionStore;

/// Picks the home account for a command: the `--account` flag first, then
/// the stored session.
pub fn resolve_account(config: &ClientConfig, account_override: Option<&str>) -> ClientResult<String> {
    let store = SessionStore::open(config.home.as_deref())?;
    store.load()?.resolve_account(account_override)
}

pub(crate) fn display_timestamp(record: &TransactionRecord) -> Option<String> {
    parse_timestamp(&record.timestamp).map(|instant| format_instant(&instant))
}

/// Newest first; records without a readable timestamp sink to the end.
pub(crate) fn sort_newest_first(records: &mut [&TransactionRecord]) {
    records.sort_by_cached_key(|record| {
        std::cmp::Reverse(parse_timestamp(&record.timestamp))
    });
}

pub(crate) fn transaction_row(record: &TransactionRecord) -> TransactionRow {
    TransactionRow {
        id: record.id.clone(),
        timestamp: display_timestamp(record),
        kind: record.kind_str().to_string(),
        sender_account: record.sender_account.clone(),
        receiver_account: record.receiver_account.clone(),
        amount: record.amount,
    }
}
