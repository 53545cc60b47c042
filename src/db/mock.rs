use super::PostRepository;
use crate::models::{NewPost, Post};
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Table {
    rows: BTreeMap<i32, Post>,
    next_id: i32,
}

/// In-memory post table. Ids start at 1 and are never reused.
#[derive(Clone, Default)]
pub struct MockPostRepository {
    table: Arc<Mutex<Table>>,
    fail_inserts: Arc<Mutex<bool>>,
}

impl MockPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_insert_failure(self, should_fail: bool) -> Self {
        *self.fail_inserts.lock().unwrap() = should_fail;
        self
    }

    pub fn len(&self) -> usize {
        self.table.lock().unwrap().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PostRepository for MockPostRepository {
    async fn insert(&self, post: NewPost) -> Result<Post> {
        if *self.fail_inserts.lock().unwrap() {
            return Err(Error::Database(sqlx::Error::PoolTimedOut));
        }

        let mut table = self.table.lock().unwrap();
        table.next_id += 1;
        let row = Post {
            id: table.next_id,
            image_name: post.image_name,
            caption: post.caption,
        };
        table.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_all(&self) -> Result<Vec<Post>> {
        Ok(self.table.lock().unwrap().rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Post>> {
        Ok(self.table.lock().unwrap().rows.get(&id).cloned())
    }

    async fn delete_by_id(&self, id: i32) -> Result<()> {
        self.table.lock().unwrap().rows.remove(&id);
        Ok(())
    }
}
