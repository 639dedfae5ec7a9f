//! Repositories: one per entity, borrowing the shared pool

pub mod categories;
pub mod posts;
pub mod stats;
pub mod users;

pub use categories::{Category, CategoryRepo, CategoryWithCount, NewCategory, UpdateCategory};
pub use posts::{CategorySummary, NewPost, Post, PostRepo, PostWithCategory, UpdatePost};
pub use stats::{DashboardStats, RecentPost, StatsRepo};
pub use users::{NewUser, User, UserRepo};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },
}
