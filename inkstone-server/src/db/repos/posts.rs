//! Post repository
//!
//! Public feeds join the category in the same query and tolerate a
//! dangling `category_id` (the join degrades to a null category).
//! The sparse update maps a field patch onto one parameterized UPDATE,
//! keeping the omitted-vs-null distinction per field.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, Row};

use inkstone_core::{Patch, PostStatus};

use super::DbError;

/// Post record from the database
#[derive(Debug, Clone, FromRow)]
pub struct Post {
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

/// Category fields carried alongside a post on the public feeds
#[derive(Debug, Clone)]
pub struct CategorySummary {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

/// A post with its (possibly missing) category
#[derive(Debug, Clone)]
pub struct PostWithCategory {
    pub post: Post,
    pub category: Option<CategorySummary>,
}

/// Input for creating a post
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub status: PostStatus,
    pub author_id: i64,
    pub category_id: Option<i64>,
    pub is_hero: bool,
    pub hero_order: Option<i16>,
    pub is_favorite: bool,
}

/// Sparse update for a post.
///
/// `Option` fields are keep-or-set; `Patch` fields additionally
/// distinguish an explicit clear for the nullable columns.
#[derive(Debug, Clone, Default)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub status: Option<PostStatus>,
    pub category_id: Patch<i64>,
    pub is_hero: Option<bool>,
    pub hero_order: Patch<i16>,
    pub is_favorite: Option<bool>,
}

impl UpdatePost {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.slug.is_none()
            && self.content.is_none()
            && self.excerpt.is_none()
            && self.featured_image.is_none()
            && self.status.is_none()
            && self.category_id.is_keep()
            && self.is_hero.is_none()
            && self.hero_order.is_keep()
            && self.is_favorite.is_none()
    }
}

const POST_COLUMNS: &str = "id, title, slug, content, excerpt, featured_image, status, \
     author_id, category_id, is_hero, hero_order, is_favorite, views, created_at, updated_at";

/// Columns for the joined public reads. Category columns are aliased
/// so they never collide with the post's own id/name/slug.
const JOINED_COLUMNS: &str = "p.id, p.title, p.slug, p.content, p.excerpt, p.featured_image, \
     p.status, p.author_id, p.category_id, p.is_hero, p.hero_order, p.is_favorite, p.views, \
     p.created_at, p.updated_at, \
     c.id AS cat_id, c.name AS cat_name, c.slug AS cat_slug, c.description AS cat_description";

fn row_with_category(row: &sqlx::postgres::PgRow) -> Result<PostWithCategory, sqlx::Error> {
    let post = Post::from_row(row)?;
    let category = row
        .try_get::<Option<i64>, _>("cat_id")?
        .map(|id| -> Result<CategorySummary, sqlx::Error> {
            Ok(CategorySummary {
                id,
                name: row.try_get("cat_name")?,
                slug: row.try_get("cat_slug")?,
                description: row.try_get("cat_description")?,
            })
        })
        .transpose()?;

    Ok(PostWithCategory { post, category })
}

/// Post repository
pub struct PostRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> PostRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a single post by id.
    pub async fn get(&self, id: i64) -> Result<Post, DbError> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound {
            resource: "post",
            id: id.to_string(),
        })?;

        Ok(post)
    }

    /// Get a published post by slug, category joined in.
    pub async fn get_published_by_slug(&self, slug: &str) -> Result<PostWithCategory, DbError> {
        let row = sqlx::query(&format!(
            "SELECT {JOINED_COLUMNS} FROM posts p \
             LEFT JOIN categories c ON p.category_id = c.id \
             WHERE p.slug = $1 AND p.status = 'published'"
        ))
        .bind(slug)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound {
            resource: "post",
            id: slug.to_owned(),
        })?;

        Ok(row_with_category(&row)?)
    }

    /// List every post, newest first, for the admin screen.
    pub async fn list_all(&self) -> Result<Vec<Post>, DbError> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(posts)
    }

    /// List published posts with their categories, newest first.
    pub async fn list_published(&self) -> Result<Vec<PostWithCategory>, DbError> {
        let rows = sqlx::query(&format!(
            "SELECT {JOINED_COLUMNS} FROM posts p \
             LEFT JOIN categories c ON p.category_id = c.id \
             WHERE p.status = 'published' \
             ORDER BY p.created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.iter()
            .map(|r| row_with_category(r).map_err(DbError::from))
            .collect()
    }

    /// Hero carousel feed: at most 3 published hero posts, explicit
    /// slot order first, slotless heroes last by recency.
    pub async fn list_hero(&self) -> Result<Vec<Post>, DbError> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts \
             WHERE status = 'published' AND is_hero \
             ORDER BY hero_order ASC NULLS LAST, created_at DESC \
             LIMIT 3"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(posts)
    }

    /// Favorites feed: up to 3 published favorites in a fresh random
    /// order on every request. No stable ordering is promised.
    pub async fn list_favorites(&self) -> Result<Vec<PostWithCategory>, DbError> {
        let rows = sqlx::query(&format!(
            "SELECT {JOINED_COLUMNS} FROM posts p \
             LEFT JOIN categories c ON p.category_id = c.id \
             WHERE p.status = 'published' AND p.is_favorite \
             ORDER BY RANDOM() \
             LIMIT 3"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.iter()
            .map(|r| row_with_category(r).map_err(DbError::from))
            .collect()
    }

    /// Insert a post and return the stored row.
    pub async fn create(&self, input: NewPost) -> Result<Post, DbError> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "INSERT INTO posts \
             (title, slug, content, excerpt, featured_image, status, author_id, \
              category_id, is_hero, hero_order, is_favorite) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {POST_COLUMNS}"
        ))
        .bind(&input.title)
        .bind(&input.slug)
        .bind(&input.content)
        .bind(&input.excerpt)
        .bind(&input.featured_image)
        .bind(input.status.as_str())
        .bind(input.author_id)
        .bind(input.category_id)
        .bind(input.is_hero)
        .bind(input.hero_order)
        .bind(input.is_favorite)
        .fetch_one(self.pool)
        .await?;

        Ok(post)
    }

    /// Apply a sparse update as one parameterized statement, always
    /// touching `updated_at`. An empty update degenerates to a read.
    pub async fn update(&self, id: i64, input: UpdatePost) -> Result<Post, DbError> {
        if input.is_empty() {
            return self.get(id).await;
        }

        let UpdatePost {
            title,
            slug,
            content,
            excerpt,
            featured_image,
            status,
            category_id,
            is_hero,
            hero_order,
            is_favorite,
        } = input;

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE posts SET ");
        {
            let mut sets = qb.separated(", ");
            if let Some(title) = title {
                sets.push("title = ").push_bind_unseparated(title);
            }
            if let Some(slug) = slug {
                sets.push("slug = ").push_bind_unseparated(slug);
            }
            if let Some(content) = content {
                sets.push("content = ").push_bind_unseparated(content);
            }
            if let Some(excerpt) = excerpt {
                sets.push("excerpt = ").push_bind_unseparated(excerpt);
            }
            if let Some(featured_image) = featured_image {
                sets.push("featured_image = ")
                    .push_bind_unseparated(featured_image);
            }
            if let Some(status) = status {
                sets.push("status = ").push_bind_unseparated(status.as_str());
            }
            match category_id {
                Patch::Keep => {}
                Patch::Clear => {
                    sets.push("category_id = NULL");
                }
                Patch::Set(v) => {
                    sets.push("category_id = ").push_bind_unseparated(v);
                }
            }
            if let Some(is_hero) = is_hero {
                sets.push("is_hero = ").push_bind_unseparated(is_hero);
            }
            match hero_order {
                Patch::Keep => {}
                Patch::Clear => {
                    sets.push("hero_order = NULL");
                }
                Patch::Set(v) => {
                    sets.push("hero_order = ").push_bind_unseparated(v);
                }
            }
            if let Some(is_favorite) = is_favorite {
                sets.push("is_favorite = ").push_bind_unseparated(is_favorite);
            }
            sets.push("updated_at = NOW()");
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.push(format!(" RETURNING {POST_COLUMNS}"));

        let post = qb
            .build_query_as::<Post>()
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::NotFound {
                resource: "post",
                id: id.to_string(),
            })?;

        Ok(post)
    }

    /// Hard delete. The caller is responsible for the 404 check.
    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::{CategoryRepo, NewCategory, NewUser, UserRepo};

    async fn test_pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool");
        crate::db::migrations::run(&pool).await.expect("migrations");
        pool
    }

    async fn test_author(pool: &PgPool) -> i64 {
        UserRepo::new(pool)
            .create(NewUser {
                username: "author".into(),
                email: format!("author-{}@test.invalid", uuid::Uuid::new_v4()),
                password_hash: "$argon2id$stub".into(),
                role: "admin".into(),
            })
            .await
            .expect("author")
            .id
    }

    fn draft(title: &str, author_id: i64) -> NewPost {
        NewPost {
            title: title.into(),
            slug: inkstone_core::slugify(title),
            content: "<p>body</p>".into(),
            excerpt: None,
            featured_image: None,
            status: PostStatus::Draft,
            author_id,
            category_id: None,
            is_hero: false,
            hero_order: None,
            is_favorite: false,
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn minimal_create_lands_as_draft() {
        let pool = test_pool().await;
        let author = test_author(&pool).await;
        let repo = PostRepo::new(&pool);

        let post = repo.create(draft("Minimal", author)).await.expect("create");
        assert_eq!(post.status, "draft");
        assert_eq!(post.category_id, None);
        assert!(!post.is_hero);
        assert_eq!(post.views, 0);

        repo.delete(post.id).await.expect("delete");
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn clearing_hero_order_vs_omitting_it() {
        let pool = test_pool().await;
        let author = test_author(&pool).await;
        let repo = PostRepo::new(&pool);

        let post = repo
            .create(NewPost {
                is_hero: true,
                hero_order: Some(2),
                ..draft("Hero slot", author)
            })
            .await
            .expect("create");

        // Omitted hero_order leaves the slot untouched.
        let updated = repo
            .update(
                post.id,
                UpdatePost {
                    title: Some("Hero slot renamed".into()),
                    ..Default::default()
                },
            )
            .await
            .expect("update");
        assert_eq!(updated.hero_order, Some(2));

        // An explicit clear nulls it.
        let cleared = repo
            .update(
                post.id,
                UpdatePost {
                    hero_order: Patch::Clear,
                    ..Default::default()
                },
            )
            .await
            .expect("update");
        assert_eq!(cleared.hero_order, None);
        assert!(cleared.is_hero, "clearing the slot does not unflag the post");

        repo.delete(post.id).await.expect("delete");
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn hero_feed_is_capped_and_slot_ordered() {
        let pool = test_pool().await;
        let author = test_author(&pool).await;
        let repo = PostRepo::new(&pool);

        let mut ids = Vec::new();
        for (title, slot) in [
            ("Hero one", Some(1i16)),
            ("Hero two", Some(2)),
            ("Hero three", Some(3)),
            ("Hero slotless", None),
        ] {
            let post = repo
                .create(NewPost {
                    status: PostStatus::Published,
                    is_hero: true,
                    hero_order: slot,
                    ..draft(title, author)
                })
                .await
                .expect("create");
            ids.push(post.id);
        }

        let feed = repo.list_hero().await.expect("hero feed");
        assert!(feed.len() <= 3);
        assert!(feed.iter().all(|p| p.status == "published" && p.is_hero));

        // Explicit slots come before slotless heroes.
        let slots: Vec<_> = feed.iter().map(|p| p.hero_order).collect();
        let first_none = slots.iter().position(|s| s.is_none());
        if let Some(idx) = first_none {
            assert!(slots[idx..].iter().all(|s| s.is_none()));
        }

        for id in ids {
            repo.delete(id).await.expect("delete");
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn favorites_feed_is_capped_and_filtered() {
        let pool = test_pool().await;
        let author = test_author(&pool).await;
        let repo = PostRepo::new(&pool);

        let mut ids = Vec::new();
        for title in ["Fav one", "Fav two", "Fav three", "Fav four"] {
            let post = repo
                .create(NewPost {
                    status: PostStatus::Published,
                    is_favorite: true,
                    ..draft(title, author)
                })
                .await
                .expect("create");
            ids.push(post.id);
        }

        let feed = repo.list_favorites().await.expect("favorites feed");
        assert!(feed.len() <= 3);
        assert!(feed
            .iter()
            .all(|p| p.post.status == "published" && p.post.is_favorite));

        for id in ids {
            repo.delete(id).await.expect("delete");
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn deleting_category_leaves_post_retrievable() {
        let pool = test_pool().await;
        let author = test_author(&pool).await;
        let posts = PostRepo::new(&pool);
        let categories = CategoryRepo::new(&pool);

        let category = categories
            .create(NewCategory {
                name: "Doomed".into(),
                slug: format!("doomed-{}", uuid::Uuid::new_v4()),
                description: None,
                is_visible: true,
                sort_order: 0,
            })
            .await
            .expect("category");

        let post = posts
            .create(NewPost {
                status: PostStatus::Published,
                category_id: Some(category.id),
                ..draft("Orphaned post", author)
            })
            .await
            .expect("post");

        categories.delete(category.id).await.expect("delete category");

        let fetched = posts.get(post.id).await.expect("post survives");
        assert_eq!(fetched.category_id, Some(category.id));

        // Public read degrades the dangling reference to a null category.
        let joined = posts
            .get_published_by_slug(&fetched.slug)
            .await
            .expect("public read");
        assert!(joined.category.is_none());

        posts.delete(post.id).await.expect("delete post");
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn drafts_stay_off_public_feeds() {
        let pool = test_pool().await;
        let author = test_author(&pool).await;
        let repo = PostRepo::new(&pool);

        let post = repo
            .create(NewPost {
                is_hero: true,
                is_favorite: true,
                ..draft("Unpublished", author)
            })
            .await
            .expect("create");

        assert!(repo.get_published_by_slug(&post.slug).await.is_err());
        assert!(repo
            .list_hero()
            .await
            .expect("hero")
            .iter()
            .all(|p| p.id != post.id));

        repo.delete(post.id).await.expect("delete");
    }
}
