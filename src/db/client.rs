use super::PostRepository;
use crate::models::{NewPost, Post};
use crate::Result;
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::info;

const MAX_CONNECTIONS: u32 = 8;
const ACQUIRE_TIMEOUT_SECS: u64 = 5;

#[derive(Clone, Debug)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    /// Open a pool against `database_url` and apply embedded migrations.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(Duration::from_secs(ACQUIRE_TIMEOUT_SECS))
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Connected to metadata store and applied migrations");

        Ok(Self { pool })
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn insert(&self, post: NewPost) -> Result<Post> {
        let row = sqlx::query_as::<_, Post>(
            "INSERT INTO posts (image_name, caption) VALUES ($1, $2) \
             RETURNING id, image_name, caption",
        )
        .bind(&post.image_name)
        .bind(&post.caption)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_all(&self) -> Result<Vec<Post>> {
        let rows =
            sqlx::query_as::<_, Post>("SELECT id, image_name, caption FROM posts ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Post>> {
        let row =
            sqlx::query_as::<_, Post>("SELECT id, image_name, caption FROM posts WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row)
    }

    async fn delete_by_id(&self, id: i32) -> Result<()> {
        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
