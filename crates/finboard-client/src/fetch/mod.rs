pub mod envelope;
pub mod http;
pub mod sequence;

use std::future::Future;

use crate::ClientResult;
use crate::dashboard::record::TransactionRecord;
use crate::portfolio::{Holding, Quote};

pub use http::HttpBackend;

/// The banking backend as seen by the dashboard.
pub trait BankBackend {
    fn fetch_transactions(
        &self,
        account_id: &str,
    ) -> impl Future<Output = ClientResult<Vec<TransactionRecord>>> + Send;

    fn fetch_holdings(
        &self,
        account_id: &str,
    ) -> impl Future<Output = ClientResult<Vec<Holding>>> + Send;

    fn fetch_quotes(&self) -> impl Future<Output = ClientResult<Vec<Quote>>> + Send;
}
