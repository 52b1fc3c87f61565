use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::dashboard::record::TransactionRecord;
use crate::fetch::BankBackend;
use crate::fetch::envelope::normalize_body;
use crate::portfolio::{Holding, Quote, holdings_from_value, quotes_from_value};
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    api_url: String,
    quotes_url: String,
    token: Option<String>,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|error| ClientError::internal_runtime(&error.to_string()))?;
        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            quotes_url: config.quotes_url.clone(),
            token: config.token.clone(),
        })
    }

    pub fn history_url(&self) -> String {
        format!("{}/api/history", self.api_url)
    }

    pub fn portfolio_url(&self) -> String {
        format!("{}/api/portfolio", self.api_url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_text(&self, url: &str, query: &[(&str, &str)]) -> ClientResult<String> {
        let request = self.authorized(self.client.get(url).query(query));
        let response = request
            .send()
            .await
            .map_err(|error| ClientError::fetch_failed(url, &error.to_string()))?;

        let status = response.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(ClientError::auth_required(url));
        }
        if !status.is_success() {
            return Err(ClientError::fetch_failed(url, &format!("HTTP {status}")));
        }

        response
            .text()
            .await
            .map_err(|error| ClientError::fetch_failed(url, &error.to_string()))
    }

    async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> ClientResult<Value> {
        let body = self.get_text(url, query).await?;
        serde_json::from_str(&body)
            .map_err(|error| ClientError::fetch_failed(url, &format!("invalid JSON: {error}")))
    }
}

impl BankBackend for HttpBackend {
    async fn fetch_transactions(&self, account_id: &str) -> ClientResult<Vec<TransactionRecord>> {
        let account = account_id.trim();
        if account.is_empty() {
            return Err(ClientError::account_required());
        }

        let url = self.history_url();
        let body = self.get_text(&url, &[("accountId", account)]).await?;
        let normalized = normalize_body(&body)?;
        info!(
            account,
            shape = normalized.shape.as_str(),
            count = normalized.records.len(),
            skipped = normalized.skipped,
            "fetched transaction history"
        );
        Ok(normalized.records)
    }

    async fn fetch_holdings(&self, account_id: &str) -> ClientResult<Vec<Holding>> {
        let account = account_id.trim();
        if account.is_empty() {
            return Err(ClientError::account_required());
        }

        let url = self.portfolio_url();
        let body = self.get_json(&url, &[("accountId", account)]).await?;
        let holdings = holdings_from_value(&body);
        debug!(account, count = holdings.len(), "fetched holdings");
        Ok(holdings)
    }

    async fn fetch_quotes(&self) -> ClientResult<Vec<Quote>> {
        let url = self.quotes_url.clone();
        let body = self.get_json(&url, &[]).await?;
        if !body.is_array() {
            return Err(ClientError::fetch_failed(&url, "quotes must be a JSON array"));
        }
        Ok(quotes_from_value(&body))
    }
}
