use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A spending or income category. Global categories are shared across all
/// users and drive the AI classifier; user categories are personal additions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct Category {
    pub id: String,
    pub user_id: Option<String>,
    pub name: String,
    pub slug: String,
    pub icon: String,
    pub color: String,
    pub is_income: bool,
    pub is_global: bool,
    pub sort_order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateCategoryRequest {
    pub user_id: String,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub is_income: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdateCategoryRequest {
    pub user_id: String,
    pub name: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub is_income: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CategoriesResponse {
    pub categories: Vec<Category>,
    pub total: usize,
}
