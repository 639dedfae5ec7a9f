//! Category repository
//!
//! Deletion never cascades into posts: a post keeps its `category_id`
//! and the public feeds render its category as null from then on.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use inkstone_core::Patch;

use super::DbError;

/// Category record from the database
#[derive(Debug, Clone, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_visible: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

/// Category with post count for the admin list
#[derive(Debug, Clone, FromRow)]
pub struct CategoryWithCount {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_visible: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub post_count: i64,
}

/// Input for creating a category
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_visible: bool,
    pub sort_order: i32,
}

/// Sparse update: only non-`Keep`/non-`None` fields touch the row.
#[derive(Debug, Clone, Default)]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Patch<String>,
    pub is_visible: Option<bool>,
    pub sort_order: Option<i32>,
}

impl UpdateCategory {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.slug.is_none()
            && self.description.is_keep()
            && self.is_visible.is_none()
            && self.sort_order.is_none()
    }
}

const CATEGORY_COLUMNS: &str = "id, name, slug, description, is_visible, sort_order, created_at";

/// Category repository
pub struct CategoryRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every category with its post count in a single query.
    pub async fn list_with_counts(&self) -> Result<Vec<CategoryWithCount>, DbError> {
        let categories = sqlx::query_as::<_, CategoryWithCount>(
            r#"
            SELECT
                c.id, c.name, c.slug, c.description, c.is_visible,
                c.sort_order, c.created_at,
                COUNT(p.id) AS post_count
            FROM categories c
            LEFT JOIN posts p ON p.category_id = c.id
            GROUP BY c.id
            ORDER BY c.sort_order ASC, c.name ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    /// List categories flagged visible, for the public site.
    pub async fn list_visible(&self) -> Result<Vec<Category>, DbError> {
        let categories = sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories \
             WHERE is_visible ORDER BY sort_order ASC, name ASC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    /// Get a single category by id.
    pub async fn get(&self, id: i64) -> Result<Category, DbError> {
        let category = sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound {
            resource: "category",
            id: id.to_string(),
        })?;

        Ok(category)
    }

    /// Insert a category and return the stored row.
    pub async fn create(&self, input: NewCategory) -> Result<Category, DbError> {
        let category = sqlx::query_as::<_, Category>(&format!(
            "INSERT INTO categories (name, slug, description, is_visible, sort_order) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(&input.name)
        .bind(&input.slug)
        .bind(&input.description)
        .bind(input.is_visible)
        .bind(input.sort_order)
        .fetch_one(self.pool)
        .await?;

        Ok(category)
    }

    /// Apply a sparse update as one parameterized statement.
    ///
    /// An empty update degenerates to a read, so the caller still gets
    /// the row (or a typed not-found).
    pub async fn update(&self, id: i64, input: UpdateCategory) -> Result<Category, DbError> {
        if input.is_empty() {
            return self.get(id).await;
        }

        let UpdateCategory {
            name,
            slug,
            description,
            is_visible,
            sort_order,
        } = input;

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE categories SET ");
        {
            let mut sets = qb.separated(", ");
            if let Some(name) = name {
                sets.push("name = ").push_bind_unseparated(name);
            }
            if let Some(slug) = slug {
                sets.push("slug = ").push_bind_unseparated(slug);
            }
            match description {
                Patch::Keep => {}
                Patch::Clear => {
                    sets.push("description = NULL");
                }
                Patch::Set(v) => {
                    sets.push("description = ").push_bind_unseparated(v);
                }
            }
            if let Some(is_visible) = is_visible {
                sets.push("is_visible = ").push_bind_unseparated(is_visible);
            }
            if let Some(sort_order) = sort_order {
                sets.push("sort_order = ").push_bind_unseparated(sort_order);
            }
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.push(format!(" RETURNING {CATEGORY_COLUMNS}"));

        let category = qb
            .build_query_as::<Category>()
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::NotFound {
                resource: "category",
                id: id.to_string(),
            })?;

        Ok(category)
    }

    /// Hard delete. The caller is responsible for the 404 check.
    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
