//! Public post endpoints: published feed, hero carousel, favorites,
//! and slug lookup

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::{routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db::repos::{CategorySummary, Post, PostRepo, PostWithCategory};
use crate::http::error::ApiError;
use crate::http::server::AppState;

/// Post response body (database field names, as the site consumes them)
#[derive(Serialize)]
pub struct PostBody {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub status: String,
    pub author_id: i64,
    pub category_id: Option<i64>,
    pub is_hero: bool,
    pub hero_order: Option<i16>,
    pub is_favorite: bool,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Post> for PostBody {
    fn from(p: Post) -> Self {
        Self {
            id: p.id,
            title: p.title,
            slug: p.slug,
            content: p.content,
            excerpt: p.excerpt,
            featured_image: p.featured_image,
            status: p.status,
            author_id: p.author_id,
            category_id: p.category_id,
            is_hero: p.is_hero,
            hero_order: p.hero_order,
            is_favorite: p.is_favorite,
            views: p.views,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Category nested into public post responses
#[derive(Serialize)]
pub struct CategoryRef {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

impl From<CategorySummary> for CategoryRef {
    fn from(c: CategorySummary) -> Self {
        Self {
            id: c.id,
            name: c.name,
            slug: c.slug,
            description: c.description,
        }
    }
}

/// Post with its category nested alongside the flat fields
#[derive(Serialize)]
pub struct PostWithCategoryBody {
    #[serde(flatten)]
    pub post: PostBody,
    pub category: Option<CategoryRef>,
}

impl From<PostWithCategory> for PostWithCategoryBody {
    fn from(p: PostWithCategory) -> Self {
        Self {
            post: p.post.into(),
            category: p.category.map(CategoryRef::from),
        }
    }
}

#[derive(Serialize)]
pub struct PostsResponse<T> {
    pub posts: Vec<T>,
}

#[derive(Serialize)]
pub struct PostResponse<T> {
    pub post: T,
}

/// GET /api/posts - published posts, newest first
async fn list_published(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PostsResponse<PostWithCategoryBody>>, ApiError> {
    let posts = PostRepo::new(&state.pool).list_published().await?;
    Ok(Json(PostsResponse {
        posts: posts.into_iter().map(Into::into).collect(),
    }))
}

/// GET /api/posts/hero - homepage carousel, at most 3 slots
async fn list_hero(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PostsResponse<PostBody>>, ApiError> {
    let posts = PostRepo::new(&state.pool).list_hero().await?;
    Ok(Json(PostsResponse {
        posts: posts.into_iter().map(Into::into).collect(),
    }))
}

/// GET /api/posts/favorites - up to 3 favorites, shuffled per request
async fn list_favorites(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PostsResponse<PostWithCategoryBody>>, ApiError> {
    let posts = PostRepo::new(&state.pool).list_favorites().await?;
    Ok(Json(PostsResponse {
        posts: posts.into_iter().map(Into::into).collect(),
    }))
}

/// GET /api/posts/{slug} - a single published post
async fn get_by_slug(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<PostResponse<PostWithCategoryBody>>, ApiError> {
    let post = PostRepo::new(&state.pool)
        .get_published_by_slug(&slug)
        .await?;
    Ok(Json(PostResponse { post: post.into() }))
}

/// Public post routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_published))
        .route("/hero", get(list_hero))
        .route("/favorites", get(list_favorites))
        .route("/{slug}", get(get_by_slug))
}
