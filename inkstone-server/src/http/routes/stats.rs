//! Admin dashboard stats endpoint (bearer required)

use std::sync::Arc;

use axum::extract::State;
use axum::{routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db::repos::{DashboardStats, RecentPost, StatsRepo};
use crate::http::error::ApiError;
use crate::http::extractors::AuthUser;
use crate::http::server::AppState;

/// Rolled-up counters, camelCase as the dashboard consumes them
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsBody {
    pub total_posts: i64,
    pub published_posts: i64,
    pub draft_posts: i64,
    pub total_views: i64,
    pub total_categories: i64,
}

#[derive(Serialize)]
pub struct RecentPostBody {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<RecentPost> for RecentPostBody {
    fn from(p: RecentPost) -> Self {
        Self {
            id: p.id,
            title: p.title,
            slug: p.slug,
            status: p.status,
            created_at: p.created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub stats: StatsBody,
    pub recent_posts: Vec<RecentPostBody>,
}

impl From<DashboardStats> for StatsResponse {
    fn from(s: DashboardStats) -> Self {
        Self {
            stats: StatsBody {
                total_posts: s.posts.total,
                published_posts: s.posts.published,
                draft_posts: s.posts.drafts,
                total_views: s.posts.views,
                total_categories: s.total_categories,
            },
            recent_posts: s.recent.into_iter().map(Into::into).collect(),
        }
    }
}

/// GET /api/admin/stats
async fn dashboard(
    _admin: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatsResponse>, ApiError> {
    let stats = StatsRepo::new(&state.pool).dashboard().await?;
    Ok(Json(stats.into()))
}

/// Stats routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(dashboard))
}
