//! CDN cache invalidation
//!
//! Purges deleted images from the CloudFront distribution that fronts the
//! bucket, so the public URL stops serving a cached copy.

pub mod client;
pub mod mock;

pub use client::CloudFrontInvalidator;
pub use mock::MockCdnInvalidator;

use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait CdnInvalidator: Send + Sync {
    /// Request eviction of `paths` (each starting with `/`). Returns once the
    /// CDN has accepted the request, not once the purge has propagated.
    async fn invalidate(&self, paths: &[String]) -> Result<()>;
}

/// CDN path for an object key.
pub fn cdn_path(key: &str) -> String {
    format!("/{}", key)
}

/// Caller reference for an invalidation batch. Derived from the paths so a
/// resubmitted purge for the same paths is treated as the same request.
pub fn caller_reference(paths: &[String]) -> String {
    paths
        .iter()
        .map(|p| p.trim_start_matches('/'))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cdn_path() {
        assert_eq!(cdn_path("abc"), "/abc");
    }

    #[test]
    fn test_caller_reference_single_path_is_key() {
        assert_eq!(caller_reference(&["/abc".to_string()]), "abc");
    }

    #[test]
    fn test_caller_reference_joins_paths() {
        let paths = vec!["/a".to_string(), "/b".to_string()];
        assert_eq!(caller_reference(&paths), "a,b");
    }
}
