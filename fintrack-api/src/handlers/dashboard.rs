use actix_web::{web, HttpResponse, Result as ActixResult};
use fintrack_analytics::{
    aggregate, generate_insights, split_by_confirmation, Period, RECENT_TRANSACTIONS_LIMIT,
};
use fintrack_types::DashboardData;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::jobs::sync_manager::{DashboardRows, SyncManager};

#[derive(Deserialize)]
pub struct DashboardQuery {
    pub user_id: String,
    pub month: u32,
    pub year: i32,
}

/// The dashboard always renders: failed reads have already degraded to empty
/// defaults inside the sync manager, so the only client error here is an
/// invalid period.
pub async fn get_dashboard(
    manager: web::Data<Arc<SyncManager>>,
    query: web::Query<DashboardQuery>,
) -> ActixResult<HttpResponse> {
    let period =
        Period::new(query.year, query.month).map_err(actix_web::error::ErrorBadRequest)?;

    let rows = manager.dashboard_rows(&query.user_id, period).await;

    Ok(HttpResponse::Ok().json(build_dashboard(rows)))
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub user_id: String,
    pub month: u32,
    pub year: i32,
}

/// Manual refetch: drop the cached period and load it again now
pub async fn refresh_dashboard(
    manager: web::Data<Arc<SyncManager>>,
    request: web::Json<RefreshRequest>,
) -> ActixResult<HttpResponse> {
    let period =
        Period::new(request.year, request.month).map_err(actix_web::error::ErrorBadRequest)?;

    info!(
        "Manual dashboard refresh for user={} period={}",
        request.user_id,
        period.month_key()
    );

    manager.refresh_period(&request.user_id, period).await;
    let rows = manager.dashboard_rows(&request.user_id, period).await;

    Ok(HttpResponse::Ok().json(build_dashboard(rows)))
}

pub(crate) fn build_dashboard(rows: DashboardRows) -> DashboardData {
    let derived = aggregate(
        &rows.transactions,
        &rows.monthly_summary,
        &rows.prev_monthly_summary,
        &rows.spending_by_category,
        &rows.daily_balance,
    );
    let insights = generate_insights(&derived.summary, &derived.expenses_by_category);

    let (mut recent_transactions, pending_transactions) =
        split_by_confirmation(&rows.transactions);
    recent_transactions.truncate(RECENT_TRANSACTIONS_LIMIT);

    DashboardData {
        summary: derived.summary,
        expenses_by_category: derived.expenses_by_category,
        daily_trend: derived.daily_trend,
        category_comparison: derived.category_comparison,
        insights,
        pending_transactions,
        recent_transactions,
        last_updated: rows.last_updated,
    }
}
