use actix_web::{web, HttpResponse, Result as ActixResult};
use fintrack_analytics::Period;
use fintrack_types::{TransactionType, TransactionsResponse};
use serde::Deserialize;
use std::sync::Arc;

use crate::database::{transactions as db, Database};

#[derive(Deserialize)]
pub struct TransactionsQuery {
    pub user_id: String,
    pub month: u32,
    pub year: i32,
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    pub search: Option<String>,
}

/// Period transaction list with the same filters the transactions page
/// offers: a type toggle and a free-text search over merchant and
/// description.
pub async fn list_transactions(
    db: web::Data<Arc<Database>>,
    query: web::Query<TransactionsQuery>,
) -> ActixResult<HttpResponse> {
    let period =
        Period::new(query.year, query.month).map_err(actix_web::error::ErrorBadRequest)?;

    let mut transactions =
        db::list_for_period(db.async_connection.clone(), &query.user_id, period)
            .await
            .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    if let Some(wanted) = query.transaction_type {
        transactions.retain(|t| t.transaction_type == wanted);
    }

    if let Some(term) = query.search.as_deref() {
        let term = term.to_lowercase();
        if !term.is_empty() {
            transactions.retain(|t| {
                t.merchant
                    .as_deref()
                    .is_some_and(|m| m.to_lowercase().contains(&term))
                    || t.description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&term))
            });
        }
    }

    let total = transactions.len();
    Ok(HttpResponse::Ok().json(TransactionsResponse {
        transactions,
        total,
    }))
}
