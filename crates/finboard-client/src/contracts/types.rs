use serde::Serialize;

use crate::dashboard::statements::StatementPeriod;
use crate::portfolio::{PortfolioSummary, Position};

#[derive(Debug, Clone, Serialize)]
pub struct SessionData {
    pub path: String,
    pub account_number: Option<String>,
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleared: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilterSummary {
    pub mode: String,
    pub from: Option<String>,
    pub to: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardTotals {
    pub credit: f64,
    pub debit: f64,
    pub net: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyBucketRow {
    pub label: String,
    pub year: i32,
    pub month: u32,
    pub credit: f64,
    pub debit: f64,
    pub records: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub timestamp: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub sender_account: String,
    pub receiver_account: String,
    pub amount: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardData {
    pub account: String,
    pub filter: FilterSummary,
    pub totals: DashboardTotals,
    pub monthly: Vec<MonthlyBucketRow>,
    pub fetched_count: usize,
    pub filtered_count: usize,
    pub skipped_count: usize,
    pub rows: Vec<TransactionRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryRow {
    pub id: String,
    pub timestamp: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub direction: String,
    pub counterparty: String,
    pub signed_amount: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryData {
    pub account: String,
    pub rows: Vec<HistoryRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatementsData {
    pub account: String,
    pub year: i32,
    pub periods: Vec<StatementPeriod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exported_to: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PortfolioData {
    pub account: String,
    pub holdings_available: bool,
    pub positions: Vec<Position>,
    pub summary: Option<PortfolioSummary>,
}
