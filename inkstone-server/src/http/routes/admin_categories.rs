//! Admin category endpoints (bearer required)
//!
//! JSON bodies with the camelCase keys the admin UI submits. The
//! update body keeps the omitted / null / value distinction for the
//! nullable description.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use inkstone_core::{patch, slugify, Patch, ValidationError};

use crate::db::repos::{CategoryRepo, CategoryWithCount, NewCategory, UpdateCategory};
use crate::http::error::ApiError;
use crate::http::extractors::{AuthUser, ValidId};
use crate::http::server::AppState;

use super::categories::{CategoriesResponse, CategoryBody};

/// Create request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    #[serde(default)]
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub is_visible: Option<bool>,
    pub sort_order: Option<i32>,
}

/// Update request: absent fields keep the stored value; an explicit
/// null clears the description.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "patch::deserialize")]
    pub description: Patch<String>,
    pub is_visible: Option<bool>,
    pub sort_order: Option<i32>,
}

/// Category with post count, for the admin list
#[derive(Serialize)]
pub struct CategoryWithCountBody {
    #[serde(flatten)]
    pub category: CategoryBody,
    pub post_count: i64,
}

impl From<CategoryWithCount> for CategoryWithCountBody {
    fn from(c: CategoryWithCount) -> Self {
        Self {
            category: CategoryBody {
                id: c.id,
                name: c.name,
                slug: c.slug,
                description: c.description,
                is_visible: c.is_visible,
                sort_order: c.sort_order,
                created_at: c.created_at,
            },
            post_count: c.post_count,
        }
    }
}

#[derive(Serialize)]
pub struct CategoryResponse {
    pub category: CategoryBody,
}

/// GET /api/admin/categories - all categories with post counts
async fn list(
    _admin: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<CategoriesResponse<CategoryWithCountBody>>, ApiError> {
    let categories = CategoryRepo::new(&state.pool).list_with_counts().await?;
    Ok(Json(CategoriesResponse {
        categories: categories.into_iter().map(Into::into).collect(),
    }))
}

/// POST /api/admin/categories
async fn create(
    _admin: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), ApiError> {
    let name = req.name.trim().to_owned();
    if name.is_empty() {
        return Err(ValidationError::Empty { field: "name" }.into());
    }

    let slug = req
        .slug
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| slugify(&name));

    let category = CategoryRepo::new(&state.pool)
        .create(NewCategory {
            name,
            slug,
            description: req.description,
            is_visible: req.is_visible.unwrap_or(true),
            sort_order: req.sort_order.unwrap_or(0),
        })
        .await?;

    tracing::info!(category_id = category.id, "created category");
    Ok((
        StatusCode::CREATED,
        Json(CategoryResponse {
            category: category.into(),
        }),
    ))
}

/// PUT /api/admin/categories/{id}
async fn update(
    _admin: AuthUser,
    ValidId(id): ValidId,
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateCategoryRequest>,
) -> Result<Json<CategoryResponse>, ApiError> {
    let category = CategoryRepo::new(&state.pool)
        .update(
            id,
            UpdateCategory {
                name: req.name,
                slug: req.slug,
                description: req.description,
                is_visible: req.is_visible,
                sort_order: req.sort_order,
            },
        )
        .await?;

    Ok(Json(CategoryResponse {
        category: category.into(),
    }))
}

/// DELETE /api/admin/categories/{id}
///
/// Never cascades: posts referencing the category keep their rows.
async fn delete(
    _admin: AuthUser,
    ValidId(id): ValidId,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, ApiError> {
    let repo = CategoryRepo::new(&state.pool);
    repo.get(id).await?;
    repo.delete(id).await?;

    tracing::info!(category_id = id, "deleted category");
    Ok(StatusCode::NO_CONTENT)
}

/// Admin category routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_by_id).put(update).delete(delete))
}

/// GET /api/admin/categories/{id}
async fn get_by_id(
    _admin: AuthUser,
    ValidId(id): ValidId,
    State(state): State<Arc<AppState>>,
) -> Result<Json<CategoryResponse>, ApiError> {
    let category = CategoryRepo::new(&state.pool).get(id).await?;
    Ok(Json(CategoryResponse {
        category: category.into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_body_keeps_tri_state_description() {
        let req: UpdateCategoryRequest = serde_json::from_str(r#"{"name": "Letters"}"#).unwrap();
        assert_eq!(req.name.as_deref(), Some("Letters"));
        assert_eq!(req.description, Patch::Keep);

        let req: UpdateCategoryRequest =
            serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(req.description, Patch::Clear);

        let req: UpdateCategoryRequest =
            serde_json::from_str(r#"{"description": "about letters"}"#).unwrap();
        assert_eq!(req.description, Patch::Set("about letters".into()));
    }

    #[test]
    fn update_body_uses_camel_case_keys() {
        let req: UpdateCategoryRequest =
            serde_json::from_str(r#"{"isVisible": false, "sortOrder": 9}"#).unwrap();
        assert_eq!(req.is_visible, Some(false));
        assert_eq!(req.sort_order, Some(9));
    }
}
