//! User repository

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use super::DbError;

/// User record from the database. `password` holds the encoded argon2
/// hash, never plaintext, and must not leak into responses.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    /// Encoded argon2 hash
    pub password_hash: String,
    pub role: String,
}

/// User repository
pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Look up a user by email. Returns `None` when no row matches;
    /// the caller decides whether that is an error.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password, role, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Insert a user and return the stored row.
    pub async fn create(&self, input: NewUser) -> Result<User, DbError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, password, role, created_at
            "#,
        )
        .bind(&input.username)
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(&input.role)
        .fetch_one(self.pool)
        .await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires database"]
    async fn create_then_find_by_email() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool");
        crate::db::migrations::run(&pool).await.expect("migrations");

        let repo = UserRepo::new(&pool);
        let email = format!("user-{}@test.invalid", uuid::Uuid::new_v4());
        let created = repo
            .create(NewUser {
                username: "tester".into(),
                email: email.clone(),
                password_hash: "$argon2id$stub".into(),
                role: "admin".into(),
            })
            .await
            .expect("create");

        let found = repo.find_by_email(&email).await.expect("find");
        assert_eq!(found.map(|u| u.id), Some(created.id));

        let missing = repo
            .find_by_email("nobody@test.invalid")
            .await
            .expect("find");
        assert!(missing.is_none());
    }
}
