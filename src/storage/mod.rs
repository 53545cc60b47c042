//! Object storage for uploaded image bytes
//!
//! Images are written to an S3 bucket under their random key and served
//! publicly through the CDN that fronts the bucket.

pub mod client;
pub mod mock;

pub use client::S3ObjectStore;
pub use mock::MockObjectStore;

use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_object(&self, key: &str, data: &[u8], content_type: &str) -> Result<()>;
    async fn delete_object(&self, key: &str) -> Result<()>;
}
