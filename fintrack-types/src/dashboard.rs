use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::transaction::{Transaction, TransactionType};

/// Period totals for the dashboard summary cards.
///
/// Recomputed on every fetch, never persisted client-side.
/// Invariant: `balance == income - expenses`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct MonthlySummary {
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
    pub previous_month_expenses: f64,
}

impl Default for MonthlySummary {
    fn default() -> Self {
        Self {
            income: 0.0,
            expenses: 0.0,
            balance: 0.0,
            previous_month_expenses: 0.0,
        }
    }
}

/// One slice of the expenses-by-category pie chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct CategoryExpense {
    pub name: String,
    pub value: f64,
    pub emoji: String,
    pub color: String,
}

/// One point of the short trend chart, labelled per calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct DailyTrend {
    pub day: String,
    pub expenses: f64,
    pub income: f64,
}

/// Per-category spend compared against the previous period.
///
/// `previous` and `change` are a declared placeholder: no data source for the
/// previous period exists yet, so consumers must treat both as always zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct CategoryComparison {
    pub category: String,
    pub emoji: String,
    pub current: f64,
    pub previous: f64,
    pub change: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Warning,
    Success,
    Info,
    Tip,
}

/// A short derived observation about the user's spending for the period.
/// Ephemeral; recomputed on each request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct Insight {
    pub kind: InsightKind,
    pub icon: String,
    pub message: String,
}

/// Raw row from the monthly summary view. The view may return one row per
/// transaction type or a single pre-aggregated row; consumers sum per type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct MonthlySummaryRow {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub total_amount: f64,
}

/// Raw row from the per-category spend view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct CategorySpendRow {
    pub category_name: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub total: f64,
}

/// Raw row from the per-day balance view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct DailyBalanceRow {
    pub date: NaiveDate,
    pub total_expense: f64,
    pub total_income: f64,
}

/// The full dashboard payload
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct DashboardData {
    pub summary: MonthlySummary,
    pub expenses_by_category: Vec<CategoryExpense>,
    pub daily_trend: Vec<DailyTrend>,
    pub category_comparison: Vec<CategoryComparison>,
    pub insights: Vec<Insight>,
    pub pending_transactions: Vec<Transaction>,
    pub recent_transactions: Vec<Transaction>,
    pub last_updated: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insight_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&InsightKind::Warning).unwrap(),
            "\"warning\""
        );
        assert_eq!(
            serde_json::to_string(&InsightKind::Tip).unwrap(),
            "\"tip\""
        );
    }

    #[test]
    fn test_summary_row_type_field() {
        let row: MonthlySummaryRow =
            serde_json::from_str(r#"{"type": "income", "total_amount": 1500000}"#).unwrap();
        assert_eq!(row.transaction_type, TransactionType::Income);
        assert_eq!(row.total_amount, 1500000.0);
    }
}
