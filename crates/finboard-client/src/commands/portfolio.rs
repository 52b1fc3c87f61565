use tracing::warn;

use crate::{ClientError, ClientResult};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::PortfolioData;
use crate::fetch::BankBackend;
use crate::portfolio::{Holding, Quote, merge_positions, summarize};

pub async fn run<B: BankBackend>(backend: &B, account: &str) -> ClientResult<SuccessEnvelope> {
    let quotes = backend.fetch_quotes().await?;
    let holdings = match backend.fetch_holdings(account).await {
        Ok(holdings) => Some(holdings),
        Err(error) if is_recoverable(&error) => {
            warn!(code = %error.code, message = %error.message, "holdings unavailable; showing quotes only");
            None
        }
        Err(error) => return Err(error),
    };

    let envelope = success("portfolio", portfolio_data(account, &quotes, holdings.as_deref()))?;
    if holdings.is_some() {
        Ok(envelope)
    } else {
        Ok(envelope.with_warning("Holdings could not be loaded; quantities are shown as zero."))
    }
}

/// Only transport and shape failures fall back to a quotes-only view; an
/// expired login must reach the user.
fn is_recoverable(error: &ClientError) -> bool {
    matches!(error.code.as_str(), "fetch_failed" | "unrecognized_envelope")
}

/// `holdings` is `None` when the holdings call failed.
pub fn portfolio_data(account: &str, quotes: &[Quote], holdings: Option<&[Holding]>) -> PortfolioData {
    let positions = merge_positions(quotes, holdings.unwrap_or_default());
    let summary = summarize(&positions);
    PortfolioData {
        account: account.to_string(),
        holdings_available: holdings.is_some(),
        positions,
        summary,
    }
}
