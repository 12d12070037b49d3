use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use fintrack_types::{
    CategoryComparison, CategoryExpense, CategorySpendRow, DailyBalanceRow, DailyTrend,
    MonthlySummary, MonthlySummaryRow, Transaction, TransactionType,
};

use crate::period::day_label;
use crate::sources::Ranked;

/// The pie chart shows at most this many slices
pub const TOP_CATEGORIES: usize = 6;

/// The short trend chart shows at most this many days
pub const TREND_DAYS: usize = 7;

/// The dashboard lists at most this many confirmed transactions
pub const RECENT_TRANSACTIONS_LIMIT: usize = 10;

/// Bucket for transactions whose category mapping is null
pub const UNCATEGORIZED: &str = "Otros";

const DEFAULT_ICON: &str = "📦";
const DEFAULT_COLOR: &str = "#6B7280";

/// Everything the aggregation engine derives for one period
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardAggregate {
    pub summary: MonthlySummary,
    pub expenses_by_category: Vec<CategoryExpense>,
    pub daily_trend: Vec<DailyTrend>,
    pub category_comparison: Vec<CategoryComparison>,
}

/// Derives the dashboard aggregates for one period.
///
/// Each field resolves independently through a ranked source list: the
/// precomputed view rows win when present, otherwise the raw transactions are
/// reduced client-side. Empty inputs produce a zero summary and empty lists,
/// never an error.
pub fn aggregate(
    transactions: &[Transaction],
    monthly_summary_rows: &[MonthlySummaryRow],
    prev_monthly_summary_rows: &[MonthlySummaryRow],
    category_rows: &[CategorySpendRow],
    daily_rows: &[DailyBalanceRow],
) -> DashboardAggregate {
    let summary = derive_summary(transactions, monthly_summary_rows, prev_monthly_summary_rows);

    let totals = category_totals(transactions, category_rows);
    let mut expenses_by_category = totals.clone();
    expenses_by_category.truncate(TOP_CATEGORIES);

    // Previous-period figures have no data source yet; consumers must treat
    // `previous` and `change` as always zero.
    let category_comparison = totals
        .into_iter()
        .map(|entry| CategoryComparison {
            category: entry.name,
            emoji: entry.emoji,
            current: entry.value,
            previous: 0.0,
            change: 0.0,
        })
        .collect();

    let daily_trend = derive_daily_trend(transactions, daily_rows);

    DashboardAggregate {
        summary,
        expenses_by_category,
        daily_trend,
        category_comparison,
    }
}

/// Splits a period's transactions into (confirmed, pending). The partition is
/// disjoint and exhaustive; input order is preserved within each half.
pub fn split_by_confirmation(transactions: &[Transaction]) -> (Vec<Transaction>, Vec<Transaction>) {
    transactions
        .iter()
        .cloned()
        .partition(|transaction| transaction.is_confirmed)
}

/// Amounts arrive with untrusted signs and may be non-finite after upstream
/// arithmetic; display math uses absolute values and treats garbage as zero.
fn sanitize(amount: f64) -> f64 {
    if amount.is_finite() {
        amount.abs()
    } else {
        0.0
    }
}

fn derive_summary(
    transactions: &[Transaction],
    monthly_summary_rows: &[MonthlySummaryRow],
    prev_monthly_summary_rows: &[MonthlySummaryRow],
) -> MonthlySummary {
    let (income, expenses) = Ranked::new()
        .then(|| totals_from_summary_rows(monthly_summary_rows))
        .then(|| totals_from_transactions(transactions))
        .resolve()
        .unwrap_or((0.0, 0.0));

    // Previous-month expenses always come from the previous summary rows,
    // regardless of which source produced the current totals.
    let previous_month_expenses = prev_monthly_summary_rows
        .iter()
        .filter(|row| row.transaction_type == TransactionType::Expense)
        .map(|row| sanitize(row.total_amount))
        .sum();

    MonthlySummary {
        income,
        expenses,
        balance: income - expenses,
        previous_month_expenses,
    }
}

/// The summary view may return one row per type or a single pre-aggregated
/// row per type; summing per type handles both shapes uniformly.
fn totals_from_summary_rows(rows: &[MonthlySummaryRow]) -> Option<(f64, f64)> {
    if rows.is_empty() {
        return None;
    }

    let mut income = 0.0;
    let mut expenses = 0.0;
    for row in rows {
        match row.transaction_type {
            TransactionType::Income => income += sanitize(row.total_amount),
            TransactionType::Expense => expenses += sanitize(row.total_amount),
        }
    }
    Some((income, expenses))
}

fn totals_from_transactions(transactions: &[Transaction]) -> Option<(f64, f64)> {
    if transactions.is_empty() {
        return None;
    }

    let mut income = 0.0;
    let mut expenses = 0.0;
    for transaction in transactions {
        match transaction.transaction_type {
            TransactionType::Income => income += sanitize(transaction.amount),
            TransactionType::Expense => expenses += sanitize(transaction.amount),
        }
    }
    Some((income, expenses))
}

/// Per-category expense totals straight from raw transactions, untruncated.
/// Shared with the reports derivation.
pub(crate) fn expense_totals(transactions: &[Transaction]) -> Vec<CategoryExpense> {
    totals_from_expense_transactions(transactions).unwrap_or_default()
}

/// Untruncated per-category expense totals, sorted descending by value. The
/// query layer orders the view rows already, but the engine never trusts that
/// and performs the final sort itself.
fn category_totals(
    transactions: &[Transaction],
    category_rows: &[CategorySpendRow],
) -> Vec<CategoryExpense> {
    Ranked::new()
        .then(|| totals_from_category_rows(category_rows))
        .then(|| totals_from_expense_transactions(transactions))
        .resolve()
        .unwrap_or_default()
}

fn totals_from_category_rows(rows: &[CategorySpendRow]) -> Option<Vec<CategoryExpense>> {
    if rows.is_empty() {
        return None;
    }

    let mut entries: Vec<CategoryExpense> = rows
        .iter()
        .map(|row| CategoryExpense {
            name: row
                .category_name
                .clone()
                .unwrap_or_else(|| UNCATEGORIZED.to_string()),
            value: sanitize(row.total),
            emoji: row.icon.clone().unwrap_or_else(|| DEFAULT_ICON.to_string()),
            color: row.color.clone().unwrap_or_else(|| DEFAULT_COLOR.to_string()),
        })
        .collect();
    sort_by_value_descending(&mut entries);
    Some(entries)
}

fn totals_from_expense_transactions(transactions: &[Transaction]) -> Option<Vec<CategoryExpense>> {
    if transactions.is_empty() {
        return None;
    }

    let mut buckets: BTreeMap<String, CategoryExpense> = BTreeMap::new();
    for transaction in transactions {
        if transaction.transaction_type != TransactionType::Expense {
            continue;
        }

        let name = transaction
            .category_name
            .clone()
            .unwrap_or_else(|| UNCATEGORIZED.to_string());
        let entry = buckets.entry(name.clone()).or_insert_with(|| CategoryExpense {
            name,
            value: 0.0,
            emoji: transaction
                .category_icon
                .clone()
                .unwrap_or_else(|| DEFAULT_ICON.to_string()),
            color: transaction
                .category_color
                .clone()
                .unwrap_or_else(|| DEFAULT_COLOR.to_string()),
        });
        entry.value += sanitize(transaction.amount);
    }

    let mut entries: Vec<CategoryExpense> = buckets.into_values().collect();
    sort_by_value_descending(&mut entries);
    Some(entries)
}

fn sort_by_value_descending(entries: &mut [CategoryExpense]) {
    entries.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
}

/// Chronologically ascending (oldest first) on both source paths, truncated
/// to the most recent [`TREND_DAYS`] days.
fn derive_daily_trend(
    transactions: &[Transaction],
    daily_rows: &[DailyBalanceRow],
) -> Vec<DailyTrend> {
    let mut trend = Ranked::new()
        .then(|| trend_from_daily_rows(daily_rows))
        .then(|| trend_from_transactions(transactions))
        .resolve()
        .unwrap_or_default();

    if trend.len() > TREND_DAYS {
        trend.drain(..trend.len() - TREND_DAYS);
    }
    trend
}

fn trend_from_daily_rows(rows: &[DailyBalanceRow]) -> Option<Vec<DailyTrend>> {
    if rows.is_empty() {
        return None;
    }

    let mut ordered: Vec<&DailyBalanceRow> = rows.iter().collect();
    ordered.sort_by_key(|row| row.date);
    Some(
        ordered
            .into_iter()
            .map(|row| DailyTrend {
                day: day_label(row.date),
                expenses: sanitize(row.total_expense),
                income: sanitize(row.total_income),
            })
            .collect(),
    )
}

fn trend_from_transactions(transactions: &[Transaction]) -> Option<Vec<DailyTrend>> {
    if transactions.is_empty() {
        return None;
    }

    let mut days: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
    for transaction in transactions {
        let date = transaction.occurred_at.date_naive();
        let entry = days.entry(date).or_insert((0.0, 0.0));
        match transaction.transaction_type {
            TransactionType::Expense => entry.0 += sanitize(transaction.amount),
            TransactionType::Income => entry.1 += sanitize(transaction.amount),
        }
    }

    Some(
        days.into_iter()
            .map(|(date, (expenses, income))| DailyTrend {
                day: day_label(date),
                expenses,
                income,
            })
            .collect(),
    )
}
