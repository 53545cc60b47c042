use super::CdnInvalidator;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct MockCdnInvalidator {
    invalidated: Arc<Mutex<Vec<String>>>,
    call_count: Arc<Mutex<usize>>,
    should_fail: Arc<Mutex<bool>>,
}

impl MockCdnInvalidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_failure(self, should_fail: bool) -> Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Every path accepted so far, in request order.
    pub fn get_invalidated_paths(&self) -> Vec<String> {
        self.invalidated.lock().unwrap().clone()
    }
}

#[async_trait]
impl CdnInvalidator for MockCdnInvalidator {
    async fn invalidate(&self, paths: &[String]) -> Result<()> {
        *self.call_count.lock().unwrap() += 1;

        if *self.should_fail.lock().unwrap() {
            return Err(Error::Cdn("Mock invalidation failure".to_string()));
        }

        self.invalidated
            .lock()
            .unwrap()
            .extend(paths.iter().cloned());
        Ok(())
    }
}
