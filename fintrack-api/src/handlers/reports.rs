use actix_web::{web, HttpResponse, Result as ActixResult};
use fintrack_analytics::{monthly_report, Period};
use serde::Deserialize;
use std::sync::Arc;

use crate::database::{transactions as db, Database};

#[derive(Deserialize)]
pub struct ReportQuery {
    pub user_id: String,
    pub month: u32,
    pub year: i32,
}

pub async fn get_report(
    db: web::Data<Arc<Database>>,
    query: web::Query<ReportQuery>,
) -> ActixResult<HttpResponse> {
    let period =
        Period::new(query.year, query.month).map_err(actix_web::error::ErrorBadRequest)?;

    let transactions = db::list_for_period(db.async_connection.clone(), &query.user_id, period)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    let report = monthly_report(&transactions, period, chrono::Utc::now().date_naive());

    Ok(HttpResponse::Ok().json(report))
}
