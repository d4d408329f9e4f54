use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::AppResult;
use crate::models::Category;
use crate::routes::AppState;

#[derive(Debug, Serialize)]
pub struct CategoryListResponse {
    pub categories: Vec<Category>,
}

pub async fn list(State(state): State<AppState>) -> AppResult<Json<CategoryListResponse>> {
    let categories = state.categories.list_categories()?;
    Ok(Json(CategoryListResponse { categories }))
}
