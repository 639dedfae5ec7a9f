//! Dashboard stats
//!
//! Three independent aggregates run concurrently against the pool and
//! merge into one snapshot. Nothing is cached: every request recounts.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use super::DbError;

/// Rolled-up post counters
#[derive(Debug, Clone, Copy, Default)]
pub struct PostCounts {
    pub total: i64,
    pub published: i64,
    pub drafts: i64,
    pub views: i64,
}

/// Recent post line for the dashboard
#[derive(Debug, Clone, FromRow)]
pub struct RecentPost {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// One dashboard snapshot
#[derive(Debug, Clone)]
pub struct DashboardStats {
    pub posts: PostCounts,
    pub total_categories: i64,
    pub recent: Vec<RecentPost>,
}

/// Stats repository
pub struct StatsRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> StatsRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Gather the dashboard snapshot, aggregates in parallel.
    pub async fn dashboard(&self) -> Result<DashboardStats, DbError> {
        let (posts, total_categories, recent) = tokio::try_join!(
            self.post_counts(),
            self.category_count(),
            self.recent_posts(),
        )?;

        Ok(DashboardStats {
            posts,
            total_categories,
            recent,
        })
    }

    async fn post_counts(&self) -> Result<PostCounts, DbError> {
        let (total, published, drafts, views): (i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COUNT(*) FILTER (WHERE status = 'published'),
                COUNT(*) FILTER (WHERE status = 'draft'),
                COALESCE(SUM(views), 0)::BIGINT
            FROM posts
            "#,
        )
        .fetch_one(self.pool)
        .await?;

        Ok(PostCounts {
            total,
            published,
            drafts,
            views,
        })
    }

    async fn category_count(&self) -> Result<i64, DbError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM categories")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    async fn recent_posts(&self) -> Result<Vec<RecentPost>, DbError> {
        let recent = sqlx::query_as::<_, RecentPost>(
            r#"
            SELECT id, title, slug, status, created_at
            FROM posts
            ORDER BY created_at DESC
            LIMIT 5
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(recent)
    }
}
