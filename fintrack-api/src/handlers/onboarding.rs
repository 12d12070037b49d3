use actix_web::{web, HttpResponse, Result as ActixResult};
use fintrack_types::UpdateOnboardingRequest;
use std::sync::Arc;
use tracing::info;

use crate::database::{users as db, Database};

const LAST_ONBOARDING_STEP: i32 = 3;

pub async fn get_onboarding(
    db: web::Data<Arc<Database>>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let progress = db::onboarding_progress(db.async_connection.clone(), &path)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    Ok(HttpResponse::Ok().json(progress))
}

/// Records the last completed step; passing the final step with `completed`
/// finishes onboarding.
pub async fn update_onboarding(
    db: web::Data<Arc<Database>>,
    path: web::Path<String>,
    request: web::Json<UpdateOnboardingRequest>,
) -> ActixResult<HttpResponse> {
    if !(0..=LAST_ONBOARDING_STEP).contains(&request.step) {
        return Err(actix_web::error::ErrorBadRequest(format!(
            "Onboarding step must be between 0 and {}",
            LAST_ONBOARDING_STEP
        )));
    }

    let user_id = path.into_inner();
    db::set_onboarding_step(
        db.async_connection.clone(),
        &user_id,
        request.step,
        request.completed,
    )
    .await
    .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    if request.completed {
        info!("Onboarding completed for user={}", user_id);
    }

    let progress = db::onboarding_progress(db.async_connection.clone(), &user_id)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    Ok(HttpResponse::Ok().json(progress))
}

pub async fn mark_welcome_seen(
    db: web::Data<Arc<Database>>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let user_id = path.into_inner();

    db::mark_welcome_seen(db.async_connection.clone(), &user_id)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    let progress = db::onboarding_progress(db.async_connection.clone(), &user_id)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    Ok(HttpResponse::Ok().json(progress))
}
