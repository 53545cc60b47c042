//! Data models and structures
//!
//! Defines the post record persisted in the metadata store, the listing
//! representation with its derived CDN URL, and environment configuration.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

const DEFAULT_REGION: &str = "ap-south-1";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// A persisted post row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: i32,
    pub image_name: String,
    pub caption: String,
}

impl Post {
    /// Attach the public URL for this post's image, served from `base_url`.
    pub fn with_url(self, base_url: &str) -> PostView {
        let url = public_url(base_url, &self.image_name);
        PostView {
            id: self.id,
            image_name: self.image_name,
            caption: self.caption,
            url,
        }
    }
}

/// Insert payload; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub image_name: String,
    pub caption: String,
}

/// A post as returned by the listing endpoint. `url` is never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostView {
    pub id: i32,
    pub image_name: String,
    pub caption: String,
    pub url: String,
}

/// An uploaded file as received from the client.
#[derive(Debug, Clone)]
pub struct Upload {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

pub fn public_url(base_url: &str, image_name: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), image_name)
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub bucket_name: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    pub cdn_base_url: String,
    pub distribution_id: String,
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_upload_bytes: usize,
    /// Serve from in-memory stores. Listed URLs still point at
    /// `cdn_base_url`, so images do not render in the gallery.
    pub dry_run: bool,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// Outside of dry-run mode every AWS and database setting is required.
    /// In dry-run mode only `CLOUDFRONT_URL` is, since listings still need
    /// a base URL to derive from.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let dry_run = lookup("DRY_RUN")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let required = |key: &str| -> crate::Result<String> {
            match lookup(key).filter(|v| !v.trim().is_empty()) {
                Some(value) => Ok(value),
                None if dry_run => Ok(String::new()),
                None => Err(crate::Error::Config(format!("{} not set", key))),
            }
        };

        let cdn_base_url = lookup("CLOUDFRONT_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| crate::Error::Config("CLOUDFRONT_URL not set".to_string()))?;

        let bind_addr: SocketAddr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .map_err(|e| crate::Error::Config(format!("Invalid BIND_ADDR: {}", e)))?;

        let max_upload_bytes: usize = match lookup("MAX_UPLOAD_BYTES") {
            Some(raw) => raw
                .parse()
                .map_err(|e| crate::Error::Config(format!("Invalid MAX_UPLOAD_BYTES: {}", e)))?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Self {
            bucket_name: required("BUCKET_NAME")?,
            access_key_id: required("ACCESS_KEY_ID")?,
            secret_access_key: required("SECRET_ACCESS_KEY")?,
            region: lookup("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            cdn_base_url,
            distribution_id: required("DISTRIBUTION_ID")?,
            database_url: required("DATABASE_URL")?,
            bind_addr,
            max_upload_bytes,
            dry_run,
        })
    }
}
