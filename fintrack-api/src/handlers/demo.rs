use actix_web::{web, HttpResponse, Result as ActixResult};
use chrono::{Datelike, Duration, Utc};
use fintrack_analytics::Period;
use fintrack_types::{Transaction, TransactionType};
use serde::Deserialize;

use crate::handlers::dashboard::build_dashboard;
use crate::jobs::sync_manager::DashboardRows;

#[derive(Deserialize)]
pub struct DemoQuery {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

/// A canned sample ledger run through the real aggregation and insight
/// pipeline, with no precomputed view rows so the fallback reduction is what
/// the visitor sees. Backs the public demo dashboard.
pub async fn demo_dashboard(query: web::Query<DemoQuery>) -> ActixResult<HttpResponse> {
    let today = Utc::now().date_naive();
    let period = Period::new(
        query.year.unwrap_or_else(|| today.year()),
        query.month.unwrap_or(today.month()),
    )
    .map_err(actix_web::error::ErrorBadRequest)?;

    let transactions = demo_transactions(period);
    let rows = DashboardRows {
        transactions,
        monthly_summary: Vec::new(),
        prev_monthly_summary: Vec::new(),
        spending_by_category: Vec::new(),
        daily_balance: Vec::new(),
        last_updated: Some(Utc::now()),
    };

    Ok(HttpResponse::Ok().json(build_dashboard(rows)))
}

fn demo_transactions(period: Period) -> Vec<Transaction> {
    // (day offset, hour, amount, type, merchant, category, icon, color)
    let seed: &[(i64, i64, f64, TransactionType, &str, &str, &str, &str)] = &[
        (0, 9, 3_200_000.0, TransactionType::Income, "Nómina Empresa SAS", "Salario", "💰", "#22c55e"),
        (1, 12, 185_000.0, TransactionType::Expense, "Éxito Calle 80", "Mercado", "🛒", "#22c55e"),
        (2, 20, 96_000.0, TransactionType::Expense, "Crepes & Waffles", "Restaurantes", "🍔", "#f97316"),
        (3, 8, 25_000.0, TransactionType::Expense, "Uber", "Transporte", "🚗", "#3b82f6"),
        (4, 21, 32_900.0, TransactionType::Expense, "Netflix", "Entretenimiento", "🎬", "#8b5cf6"),
        (5, 10, 210_000.0, TransactionType::Expense, "EPM Servicios", "Servicios", "💡", "#eab308"),
        (6, 13, 145_000.0, TransactionType::Expense, "Carulla", "Mercado", "🛒", "#22c55e"),
        (6, 19, 58_000.0, TransactionType::Expense, "Rappi", "Restaurantes", "🍔", "#f97316"),
        (7, 16, 89_000.0, TransactionType::Expense, "Farmatodo", "Salud", "💊", "#ef4444"),
        (8, 11, 450_000.0, TransactionType::Income, "Transferencia recibida", "Otros ingresos", "💵", "#14b8a6"),
        (8, 18, 67_500.0, TransactionType::Expense, "Cine Colombia", "Entretenimiento", "🎬", "#8b5cf6"),
        (9, 14, 120_000.0, TransactionType::Expense, "Falabella", "Compras", "🛍️", "#ec4899"),
    ];

    let last_offset = (period.days_in_month() - 1) as i64;
    seed.iter()
        .enumerate()
        .map(
            |(index, (day, hour, amount, tx_type, merchant, category, icon, color))| {
                let occurred_at =
                    period.start() + Duration::days((*day).min(last_offset)) + Duration::hours(*hour);
                Transaction {
                    id: format!("demo-{}", index + 1),
                    user_id: "demo".to_string(),
                    amount: *amount,
                    currency: "COP".to_string(),
                    transaction_type: *tx_type,
                    merchant: Some(merchant.to_string()),
                    description: None,
                    occurred_at,
                    // One pending transaction keeps the confirmation flow visible
                    is_confirmed: index != seed.len() - 1,
                    category_id: None,
                    category_name: Some(category.to_string()),
                    category_icon: Some(icon.to_string()),
                    category_color: Some(color.to_string()),
                    provider_id: None,
                    provider_name: Some("Bancolombia".to_string()),
                    reference_number: None,
                    location: None,
                }
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_ledger_stays_inside_period() {
        let period = Period::new(2026, 2).unwrap();
        let transactions = demo_transactions(period);

        assert!(!transactions.is_empty());
        for transaction in &transactions {
            assert!(period.contains(transaction.occurred_at.date_naive()));
        }
        assert!(transactions.iter().any(|t| !t.is_confirmed));
    }
}
