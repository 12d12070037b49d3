use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One category's share of the period's spending, untruncated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct CategoryShare {
    pub name: String,
    pub icon: String,
    pub color: String,
    pub total: f64,
    pub percentage: f64,
}

/// Aggregated figures for the reports page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct MonthlyReport {
    pub total_expenses: f64,
    pub daily_average: f64,
    pub top_category: String,
    pub breakdown: Vec<CategoryShare>,
}
