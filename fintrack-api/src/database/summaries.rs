use anyhow::Result;
use chrono::NaiveDate;
use fintrack_analytics::Period;
use fintrack_types::{
    CategorySpendRow, DailyBalanceRow, MonthlySummaryRow, TransactionType,
};
use rusqlite::params;

use crate::database::AsyncDbConnection;

/// Rows from the monthly summary view for one period. The view returns one
/// row per transaction type; the aggregation engine sums per type either way.
pub async fn monthly_summary_rows(
    conn: AsyncDbConnection,
    user_id: &str,
    period: Period,
) -> Result<Vec<MonthlySummaryRow>> {
    let conn = conn.lock().await;

    let mut stmt = conn.prepare(
        "SELECT type, total_amount
         FROM v_monthly_summary
         WHERE user_id = ?1 AND month = ?2",
    )?;

    let rows = stmt
        .query_map(params![user_id, period.month_key()], |row| {
            let type_str: String = row.get(0)?;
            let transaction_type = match type_str.as_str() {
                "income" => TransactionType::Income,
                _ => TransactionType::Expense,
            };
            Ok(MonthlySummaryRow {
                transaction_type,
                total_amount: row.get::<_, Option<f64>>(1)?.unwrap_or(0.0),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Per-category expense totals for one period, largest first
pub async fn spending_by_category(
    conn: AsyncDbConnection,
    user_id: &str,
    period: Period,
) -> Result<Vec<CategorySpendRow>> {
    let conn = conn.lock().await;

    let mut stmt = conn.prepare(
        "SELECT category_name, icon, color, total
         FROM v_spending_by_category
         WHERE user_id = ?1 AND month = ?2
         ORDER BY total DESC",
    )?;

    let rows = stmt
        .query_map(params![user_id, period.month_key()], |row| {
            Ok(CategorySpendRow {
                category_name: row.get(0)?,
                icon: row.get(1)?,
                color: row.get(2)?,
                total: row.get::<_, Option<f64>>(3)?.unwrap_or(0.0),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Per-day expense and income totals for one period, oldest first
pub async fn daily_balance(
    conn: AsyncDbConnection,
    user_id: &str,
    period: Period,
) -> Result<Vec<DailyBalanceRow>> {
    let conn = conn.lock().await;

    let mut stmt = conn.prepare(
        "SELECT date, total_expense, total_income
         FROM v_daily_balance
         WHERE user_id = ?1 AND date >= ?2 AND date <= ?3
         ORDER BY date ASC",
    )?;

    let first_day = period.first_day().to_string();
    let last_day = period.last_day().to_string();

    let rows = stmt
        .query_map(params![user_id, first_day, last_day], |row| {
            let date_str: String = row.get(0)?;
            let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|_| {
                rusqlite::Error::InvalidColumnType(0, date_str.clone(), rusqlite::types::Type::Text)
            })?;
            Ok(DailyBalanceRow {
                date,
                total_expense: row.get::<_, Option<f64>>(1)?.unwrap_or(0.0),
                total_income: row.get::<_, Option<f64>>(2)?.unwrap_or(0.0),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}
