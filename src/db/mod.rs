//! Post metadata persistence
//!
//! One row per post in a relational table. Rows reference their image by the
//! object-store key; nothing ties the two together transactionally.

pub mod client;
pub mod mock;

pub use client::PgPostRepository;
pub use mock::MockPostRepository;

use crate::models::{NewPost, Post};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn insert(&self, post: NewPost) -> Result<Post>;
    async fn find_all(&self) -> Result<Vec<Post>>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Post>>;
    async fn delete_by_id(&self, id: i32) -> Result<()>;
}
