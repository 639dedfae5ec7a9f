//! Public category endpoint

use std::sync::Arc;

use axum::extract::State;
use axum::{routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db::repos::{Category, CategoryRepo};
use crate::http::error::ApiError;
use crate::http::server::AppState;

/// Category response body
#[derive(Serialize)]
pub struct CategoryBody {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_visible: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Category> for CategoryBody {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            slug: c.slug,
            description: c.description,
            is_visible: c.is_visible,
            sort_order: c.sort_order,
            created_at: c.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct CategoriesResponse<T> {
    pub categories: Vec<T>,
}

/// GET /api/categories - visible categories in display order
async fn list_visible(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CategoriesResponse<CategoryBody>>, ApiError> {
    let categories = CategoryRepo::new(&state.pool).list_visible().await?;
    Ok(Json(CategoriesResponse {
        categories: categories.into_iter().map(Into::into).collect(),
    }))
}

/// Public category routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(list_visible))
}
