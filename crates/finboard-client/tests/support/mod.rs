#![allow(dead_code)]

use std::sync::Arc;

use finboard_client::dashboard::record::TransactionRecord;
use finboard_client::portfolio::{Holding, Quote};
use finboard_client::{BankBackend, ClientError, ClientResult};
use serde_json::Value;

/// Serves canned data instead of talking to the banking backend.
#[derive(Debug, Clone, Default)]
pub struct FixtureBackend {
    pub transactions: Arc<Vec<TransactionRecord>>,
    pub holdings: Option<Vec<Holding>>,
    pub holdings_error: Option<ClientError>,
    pub quotes: Vec<Quote>,
}

impl FixtureBackend {
    pub fn with_transactions(values: &[Value]) -> Self {
        Self {
            transactions: Arc::new(records(values)),
            ..Self::default()
        }
    }
}

impl BankBackend for FixtureBackend {
    async fn fetch_transactions(&self, account_id: &str) -> ClientResult<Vec<TransactionRecord>> {
        if account_id.trim().is_empty() {
            return Err(ClientError::account_required());
        }
        Ok(self.transactions.as_ref().clone())
    }

    async fn fetch_holdings(&self, _account_id: &str) -> ClientResult<Vec<Holding>> {
        if let Some(error) = &self.holdings_error {
            return Err(error.clone());
        }
        self.holdings
            .clone()
            .ok_or_else(|| ClientError::fetch_failed("fixture://portfolio", "unavailable"))
    }

    async fn fetch_quotes(&self) -> ClientResult<Vec<Quote>> {
        Ok(self.quotes.clone())
    }
}

pub fn records(values: &[Value]) -> Vec<TransactionRecord> {
    values.iter().filter_map(TransactionRecord::from_value).collect()
}
