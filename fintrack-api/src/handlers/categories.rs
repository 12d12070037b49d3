use actix_web::{web, HttpResponse, Result as ActixResult};
use fintrack_types::{CategoriesResponse, CreateCategoryRequest, UpdateCategoryRequest};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::database::categories::{self as db, CategoryDbError};
use crate::database::Database;

#[derive(Deserialize)]
pub struct ListCategoriesQuery {
    pub user_id: String,
}

pub async fn list_categories(
    db: web::Data<Arc<Database>>,
    query: web::Query<ListCategoriesQuery>,
) -> ActixResult<HttpResponse> {
    let categories = db::list_categories(db.async_connection.clone(), &query.user_id)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    let total = categories.len();
    Ok(HttpResponse::Ok().json(CategoriesResponse { categories, total }))
}

/// Creates a personal category. The list is only refreshed after the write is
/// confirmed; a failure surfaces as an error response for the client to show
/// as a transient notification.
pub async fn create_category(
    db: web::Data<Arc<Database>>,
    request: web::Json<CreateCategoryRequest>,
) -> ActixResult<HttpResponse> {
    if request.name.trim().is_empty() {
        return Err(actix_web::error::ErrorBadRequest(
            "Category name must not be empty",
        ));
    }

    let created = db::insert_category(db.async_connection.clone(), &request)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    info!("Created category '{}' for user={}", created.name, request.user_id);

    let categories = db::list_categories(db.async_connection.clone(), &request.user_id)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    let total = categories.len();
    Ok(HttpResponse::Created().json(CategoriesResponse { categories, total }))
}

pub async fn update_category(
    db: web::Data<Arc<Database>>,
    path: web::Path<String>,
    request: web::Json<UpdateCategoryRequest>,
) -> ActixResult<HttpResponse> {
    let category_id = path.into_inner();

    db::update_category(db.async_connection.clone(), &category_id, &request)
        .await
        .map_err(|e| match e {
            CategoryDbError::NotFound => actix_web::error::ErrorNotFound(e.to_string()),
            CategoryDbError::GlobalImmutable => actix_web::error::ErrorForbidden(e.to_string()),
            CategoryDbError::Database(_) => {
                actix_web::error::ErrorInternalServerError(e.to_string())
            }
        })?;

    let categories = db::list_categories(db.async_connection.clone(), &request.user_id)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    let total = categories.len();
    Ok(HttpResponse::Ok().json(CategoriesResponse { categories, total }))
}

#[derive(Deserialize)]
pub struct DeleteCategoryQuery {
    pub user_id: String,
}

pub async fn delete_category(
    db: web::Data<Arc<Database>>,
    path: web::Path<String>,
    query: web::Query<DeleteCategoryQuery>,
) -> ActixResult<HttpResponse> {
    let category_id = path.into_inner();

    db::delete_category(db.async_connection.clone(), &query.user_id, &category_id)
        .await
        .map_err(|e| match e {
            CategoryDbError::NotFound => actix_web::error::ErrorNotFound(e.to_string()),
            CategoryDbError::GlobalImmutable => actix_web::error::ErrorForbidden(e.to_string()),
            CategoryDbError::Database(_) => {
                actix_web::error::ErrorInternalServerError(e.to_string())
            }
        })?;

    let categories = db::list_categories(db.async_connection.clone(), &query.user_id)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    let total = categories.len();
    Ok(HttpResponse::Ok().json(CategoriesResponse { categories, total }))
}
