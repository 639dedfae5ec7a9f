//! Admin post endpoints (bearer required)
//!
//! Create and update accept `multipart/form-data`: the admin editor
//! submits text fields as strings plus an optional `featuredImage`
//! file. Field coercion keeps the omitted / empty-string / value
//! distinction so nullable columns can be cleared explicitly.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};

use inkstone_core::{slugify, Patch, PostStatus, ValidationError};

use crate::db::repos::{NewPost, PostRepo, UpdatePost};
use crate::http::error::ApiError;
use crate::http::extractors::{AuthUser, ValidId};
use crate::http::server::AppState;
use crate::http::upload::UploadStore;

use super::posts::{PostBody, PostResponse, PostsResponse};

/// File field name the admin editor submits
const FILE_FIELD: &str = "featuredImage";

/// Collected multipart form: text fields plus the stored image path,
/// if a file part was present.
#[derive(Debug, Default)]
struct PostForm {
    fields: HashMap<String, String>,
    featured_image: Option<String>,
}

impl PostForm {
    fn value(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Present-and-nonempty accessor for fields where an empty string
    /// means "not provided" rather than "clear".
    fn nonempty(&self, name: &str) -> Option<&str> {
        self.value(name).map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Drain a multipart request, storing the file part as it streams by.
async fn read_form(mut multipart: Multipart, uploads: &UploadStore) -> Result<PostForm, ApiError> {
    let mut form = PostForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        let Some(name) = field.name().map(ToOwned::to_owned) else {
            continue;
        };

        if name == FILE_FIELD {
            let original = field.file_name().unwrap_or("image").to_owned();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(e.to_string()))?;
            // A file input submitted without a selection arrives as an
            // empty part; that is not an upload.
            if bytes.is_empty() {
                continue;
            }
            let path = uploads
                .store(&original, &bytes)
                .await
                .map_err(|e| ApiError::Internal(e.to_string()))?;
            form.featured_image = Some(path);
        } else {
            let text = field
                .text()
                .await
                .map_err(|e| ApiError::BadRequest(e.to_string()))?;
            form.fields.insert(name, text);
        }
    }

    Ok(form)
}

/// Coerce a create form into a post, applying the documented defaults.
fn build_new_post(form: &PostForm, author_id: i64) -> Result<NewPost, ApiError> {
    let title = form
        .nonempty("title")
        .ok_or(ValidationError::Empty { field: "title" })?
        .to_owned();
    let content = form
        .value("content")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(ValidationError::Empty { field: "content" })?
        .to_owned();

    let status = match form.nonempty("status") {
        Some(s) => s.parse::<PostStatus>()?,
        None => PostStatus::default(),
    };

    Ok(NewPost {
        slug: form
            .nonempty("slug")
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| slugify(&title)),
        title,
        content,
        excerpt: form.value("excerpt").map(ToOwned::to_owned),
        featured_image: form.featured_image.clone(),
        status,
        author_id,
        category_id: Patch::parse_form(form.value("categoryId"), "categoryId")?.into_set(),
        is_hero: Patch::parse_form_flag(form.value("isHero"))
            .into_set()
            .unwrap_or(false),
        hero_order: Patch::parse_form(form.value("heroOrder"), "heroOrder")?.into_set(),
        is_favorite: Patch::parse_form_flag(form.value("isFavorite"))
            .into_set()
            .unwrap_or(false),
    })
}

/// Coerce an update form into a sparse patch: only submitted fields
/// land in the update.
fn build_update(form: &PostForm) -> Result<UpdatePost, ApiError> {
    let status = match form.value("status") {
        None => None,
        Some(s) if s.trim().is_empty() => None,
        Some(s) => Some(s.trim().parse::<PostStatus>()?),
    };

    Ok(UpdatePost {
        title: form.value("title").map(ToOwned::to_owned),
        slug: form.value("slug").map(ToOwned::to_owned),
        content: form.value("content").map(ToOwned::to_owned),
        excerpt: form.value("excerpt").map(ToOwned::to_owned),
        featured_image: form.featured_image.clone(),
        status,
        category_id: Patch::parse_form(form.value("categoryId"), "categoryId")?,
        is_hero: Patch::parse_form_flag(form.value("isHero")).into_set(),
        hero_order: Patch::parse_form(form.value("heroOrder"), "heroOrder")?,
        is_favorite: Patch::parse_form_flag(form.value("isFavorite")).into_set(),
    })
}

/// GET /api/admin/posts - every post, drafts included
async fn list(
    _admin: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<PostsResponse<PostBody>>, ApiError> {
    let posts = PostRepo::new(&state.pool).list_all().await?;
    Ok(Json(PostsResponse {
        posts: posts.into_iter().map(Into::into).collect(),
    }))
}

/// GET /api/admin/posts/{id}
async fn get_by_id(
    _admin: AuthUser,
    ValidId(id): ValidId,
    State(state): State<Arc<AppState>>,
) -> Result<Json<PostResponse<PostBody>>, ApiError> {
    let post = PostRepo::new(&state.pool).get(id).await?;
    Ok(Json(PostResponse { post: post.into() }))
}

/// POST /api/admin/posts
async fn create(
    AuthUser(claims): AuthUser,
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<PostResponse<PostBody>>), ApiError> {
    let form = read_form(multipart, &state.uploads).await?;
    let input = build_new_post(&form, claims.id)?;

    let post = PostRepo::new(&state.pool).create(input).await?;
    tracing::info!(post_id = post.id, "created post");

    Ok((
        StatusCode::CREATED,
        Json(PostResponse { post: post.into() }),
    ))
}

/// PUT /api/admin/posts/{id}
async fn update(
    _admin: AuthUser,
    ValidId(id): ValidId,
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<PostResponse<PostBody>>, ApiError> {
    let form = read_form(multipart, &state.uploads).await?;
    let input = build_update(&form)?;

    let post = PostRepo::new(&state.pool).update(id, input).await?;
    Ok(Json(PostResponse { post: post.into() }))
}

/// DELETE /api/admin/posts/{id}
async fn delete(
    _admin: AuthUser,
    ValidId(id): ValidId,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, ApiError> {
    let repo = PostRepo::new(&state.pool);
    repo.get(id).await?;
    repo.delete(id).await?;

    tracing::info!(post_id = id, "deleted post");
    Ok(StatusCode::NO_CONTENT)
}

/// Admin post routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_by_id).put(update).delete(delete))
}
