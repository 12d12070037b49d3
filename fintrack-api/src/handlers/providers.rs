use actix_web::{web, HttpResponse, Result as ActixResult};
use fintrack_types::{ProvidersResponse, UpdateUserProvidersRequest};
use std::sync::Arc;
use tracing::info;

use crate::database::{providers as db, Database};

pub async fn list_providers(db: web::Data<Arc<Database>>) -> ActixResult<HttpResponse> {
    let providers = db::list_providers(db.async_connection.clone())
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    let total = providers.len();
    Ok(HttpResponse::Ok().json(ProvidersResponse { providers, total }))
}

pub async fn list_user_providers(
    db: web::Data<Arc<Database>>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let providers = db::list_user_providers(db.async_connection.clone(), &path)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    let total = providers.len();
    Ok(HttpResponse::Ok().json(ProvidersResponse { providers, total }))
}

/// Replaces the user's connected bank set, as the onboarding flow does
pub async fn update_user_providers(
    db: web::Data<Arc<Database>>,
    path: web::Path<String>,
    request: web::Json<UpdateUserProvidersRequest>,
) -> ActixResult<HttpResponse> {
    let user_id = path.into_inner();

    db::replace_user_providers(db.async_connection.clone(), &user_id, &request.provider_ids)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    info!(
        "Linked {} providers for user={}",
        request.provider_ids.len(),
        user_id
    );

    let providers = db::list_user_providers(db.async_connection.clone(), &user_id)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    let total = providers.len();
    Ok(HttpResponse::Ok().json(ProvidersResponse { providers, total }))
}
