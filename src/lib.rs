//! picboard - a small image-hosting API
//!
//! Accepts an image upload plus caption, stores the bytes in S3, records the
//! post in Postgres, lists posts with their CloudFront URLs and deletes them
//! again with a CDN purge.

pub mod app;
pub mod cdn;
pub mod db;
pub mod error;
pub mod keys;
pub mod mime;
pub mod models;
pub mod server;
pub mod storage;

pub use error::{Error, Result};
