//! Post lifecycle orchestration across the object store, metadata store and CDN.

use crate::cdn::{cdn_path, CdnInvalidator, CloudFrontInvalidator, MockCdnInvalidator};
use crate::db::{MockPostRepository, PgPostRepository, PostRepository};
use crate::keys::generate_image_name;
use crate::models::{Config, NewPost, Post, PostView, Upload};
use crate::storage::client::load_aws_config;
use crate::storage::{MockObjectStore, ObjectStore, S3ObjectStore};
use crate::{Error, Result};
use tracing::{error, info, warn};

/// Handles create/list/delete for posts. Holds long-lived client handles
/// only; every operation is independent of the others.
pub struct App {
    storage: Box<dyn ObjectStore>,
    posts: Box<dyn PostRepository>,
    cdn: Box<dyn CdnInvalidator>,
    cdn_base_url: String,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub storage: Box<dyn ObjectStore>,
    pub posts: Box<dyn PostRepository>,
    pub cdn: Box<dyn CdnInvalidator>,
}

impl App {
    pub fn with_services(services: AppServices, cdn_base_url: String) -> Self {
        Self {
            storage: services.storage,
            posts: services.posts,
            cdn: services.cdn,
            cdn_base_url,
        }
    }

    /// Construct an app from configuration, connecting to AWS and Postgres
    /// unless dry-run mode asks for in-memory stand-ins.
    pub async fn new(config: &Config) -> Result<Self> {
        let services = if config.dry_run {
            info!("DRY_RUN enabled, using in-memory storage, metadata and CDN");
            AppServices {
                storage: Box::new(MockObjectStore::new()),
                posts: Box::new(MockPostRepository::new()),
                cdn: Box::new(MockCdnInvalidator::new()),
            }
        } else {
            let aws = load_aws_config(
                config.access_key_id.clone(),
                config.secret_access_key.clone(),
                config.region.clone(),
            )
            .await;
            info!(
                "Using bucket {} and distribution {} in {}",
                config.bucket_name, config.distribution_id, config.region
            );

            AppServices {
                storage: Box::new(S3ObjectStore::new(&aws, config.bucket_name.clone())),
                posts: Box::new(PgPostRepository::connect(&config.database_url).await?),
                cdn: Box::new(CloudFrontInvalidator::new(
                    &aws,
                    config.distribution_id.clone(),
                )),
            }
        };

        Ok(Self::with_services(services, config.cdn_base_url.clone()))
    }

    /// Store the image under a fresh key, then record the post.
    ///
    /// If the row insert fails the uploaded object is deleted again so no
    /// unreferenced image is left behind; a failure of that cleanup is
    /// logged and the insert error is still returned.
    pub async fn create_post(
        &self,
        upload: Option<Upload>,
        caption: Option<String>,
    ) -> Result<Post> {
        let upload =
            upload.ok_or_else(|| Error::InvalidInput("image file is required".to_string()))?;
        if upload.bytes.is_empty() {
            return Err(Error::InvalidInput("image file is empty".to_string()));
        }
        let caption =
            caption.ok_or_else(|| Error::InvalidInput("caption is required".to_string()))?;

        let image_name = generate_image_name();

        self.storage
            .put_object(&image_name, &upload.bytes, &upload.content_type)
            .await?;
        info!(
            "Uploaded {} ({} bytes, {})",
            image_name,
            upload.bytes.len(),
            upload.content_type
        );

        let new_post = NewPost {
            image_name: image_name.clone(),
            caption,
        };

        match self.posts.insert(new_post).await {
            Ok(post) => {
                info!("Created post {} for {}", post.id, post.image_name);
                Ok(post)
            }
            Err(e) => {
                error!("Failed to record post for {}: {}", image_name, e);
                if let Err(cleanup) = self.storage.delete_object(&image_name).await {
                    warn!(
                        "Could not remove orphaned object {}: {}",
                        image_name, cleanup
                    );
                }
                Err(e)
            }
        }
    }

    /// All posts, each with its public URL.
    pub async fn list_posts(&self) -> Result<Vec<PostView>> {
        let posts = self.posts.find_all().await?;

        Ok(posts
            .into_iter()
            .map(|post| post.with_url(&self.cdn_base_url))
            .collect())
    }

    /// Delete the object, purge it from the CDN, then drop the row.
    ///
    /// An object-store failure aborts before the row is touched. A CDN
    /// failure does not: the object is already gone and any cached copy
    /// expires on its own, so it is only logged.
    pub async fn delete_post(&self, id: i32) -> Result<Post> {
        let post = self.posts.find_by_id(id).await?.ok_or(Error::NotFound(id))?;

        self.storage.delete_object(&post.image_name).await?;
        info!("Deleted object {}", post.image_name);

        let paths = vec![cdn_path(&post.image_name)];
        match self.cdn.invalidate(&paths).await {
            Ok(()) => info!("Requested CDN invalidation for {}", paths[0]),
            Err(e) => warn!("CDN invalidation failed for {}: {}", paths[0], e),
        }

        self.posts.delete_by_id(id).await?;
        info!("Deleted post {}", id);

        Ok(post)
    }
}

#[cfg(test)]
mod tests {
    use super::{App, AppServices};
    use crate::cdn::MockCdnInvalidator;
    use crate::db::MockPostRepository;
    use crate::models::Upload;
    use crate::storage::MockObjectStore;
    use crate::Error;
    use pretty_assertions::assert_eq;

    const TEST_CDN_BASE_URL: &str = "https://cdn.test";

    struct Probes {
        storage: MockObjectStore,
        posts: MockPostRepository,
        cdn: MockCdnInvalidator,
    }

    fn build_test_app(
        storage: MockObjectStore,
        posts: MockPostRepository,
        cdn: MockCdnInvalidator,
    ) -> (App, Probes) {
        let probes = Probes {
            storage: storage.clone(),
            posts: posts.clone(),
            cdn: cdn.clone(),
        };
        let app = App::with_services(
            AppServices {
                storage: Box::new(storage),
                posts: Box::new(posts),
                cdn: Box::new(cdn),
            },
            TEST_CDN_BASE_URL.to_string(),
        );
        (app, probes)
    }

    fn default_app() -> (App, Probes) {
        build_test_app(
            MockObjectStore::new(),
            MockPostRepository::new(),
            MockCdnInvalidator::new(),
        )
    }

    fn png_upload() -> Upload {
        Upload {
            bytes: vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A],
            content_type: "image/png".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_post_stores_object_and_row() {
        let (app, probes) = default_app();

        let post = app
            .create_post(Some(png_upload()), Some("c1".to_string()))
            .await
            .unwrap();

        assert_eq!(post.caption, "c1");
        assert_eq!(post.image_name.len(), 64);
        let stored = probes.storage.get_object(&post.image_name).unwrap();
        assert_eq!(stored.content_type, "image/png");
        assert_eq!(stored.data, png_upload().bytes);
        assert_eq!(probes.posts.len(), 1);
    }

    #[tokio::test]
    async fn test_create_post_requires_file() {
        let (app, probes) = default_app();

        let err = app
            .create_post(None, Some("c1".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(probes.storage.get_put_count(), 0);
        assert!(probes.posts.is_empty());
    }

    #[tokio::test]
    async fn test_create_post_rejects_empty_file() {
        let (app, probes) = default_app();
        let upload = Upload {
            bytes: Vec::new(),
            content_type: "image/png".to_string(),
        };

        let err = app
            .create_post(Some(upload), Some("c1".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(probes.storage.get_put_count(), 0);
    }

    #[tokio::test]
    async fn test_create_post_requires_caption_but_allows_empty() {
        let (app, _probes) = default_app();

        let err = app.create_post(Some(png_upload()), None).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let post = app
            .create_post(Some(png_upload()), Some(String::new()))
            .await
            .unwrap();
        assert_eq!(post.caption, "");
    }

    #[tokio::test]
    async fn test_create_post_upload_failure_writes_no_row() {
        let (app, probes) = build_test_app(
            MockObjectStore::new().with_put_failure(true),
            MockPostRepository::new(),
            MockCdnInvalidator::new(),
        );

        let err = app
            .create_post(Some(png_upload()), Some("c1".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Storage(_)));
        assert!(probes.posts.is_empty());
    }

    #[tokio::test]
    async fn test_create_post_insert_failure_removes_uploaded_object() {
        let (app, probes) = build_test_app(
            MockObjectStore::new(),
            MockPostRepository::new().with_insert_failure(true),
            MockCdnInvalidator::new(),
        );

        let err = app
            .create_post(Some(png_upload()), Some("c1".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Database(_)));
        assert_eq!(probes.storage.get_put_count(), 1);
        assert_eq!(probes.storage.get_delete_count(), 1);
        assert!(probes.storage.is_empty());
    }

    #[tokio::test]
    async fn test_list_posts_derives_urls() {
        let (app, _probes) = default_app();

        let first = app
            .create_post(Some(png_upload()), Some("one".to_string()))
            .await
            .unwrap();
        let second = app
            .create_post(Some(png_upload()), Some("two".to_string()))
            .await
            .unwrap();

        let posts = app.list_posts().await.unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(
            posts[0].url,
            format!("{}/{}", TEST_CDN_BASE_URL, first.image_name)
        );
        assert_eq!(
            posts[1].url,
            format!("{}/{}", TEST_CDN_BASE_URL, second.image_name)
        );
    }

    #[tokio::test]
    async fn test_delete_post_removes_object_row_and_purges_cdn() {
        let (app, probes) = default_app();
        let post = app
            .create_post(Some(png_upload()), Some("bye".to_string()))
            .await
            .unwrap();

        let deleted = app.delete_post(post.id).await.unwrap();

        assert_eq!(deleted, post);
        assert!(!probes.storage.contains(&post.image_name));
        assert!(probes.posts.is_empty());
        assert_eq!(
            probes.cdn.get_invalidated_paths(),
            vec![format!("/{}", post.image_name)]
        );
    }

    #[tokio::test]
    async fn test_delete_missing_post_is_not_found_and_mutates_nothing() {
        let (app, probes) = default_app();
        app.create_post(Some(png_upload()), Some("keep".to_string()))
            .await
            .unwrap();

        let err = app.delete_post(999_999).await.unwrap_err();

        assert!(matches!(err, Error::NotFound(999_999)));
        assert_eq!(probes.storage.get_delete_count(), 0);
        assert_eq!(probes.cdn.get_call_count(), 0);
        assert_eq!(probes.posts.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_post_storage_failure_keeps_row() {
        let storage = MockObjectStore::new();
        let (app, probes) = build_test_app(
            storage.clone(),
            MockPostRepository::new(),
            MockCdnInvalidator::new(),
        );
        let post = app
            .create_post(Some(png_upload()), Some("stay".to_string()))
            .await
            .unwrap();

        let failing = storage.with_delete_failure(true);
        let err = app.delete_post(post.id).await.unwrap_err();

        assert!(matches!(err, Error::Storage(_)));
        assert!(failing.contains(&post.image_name));
        assert_eq!(probes.posts.len(), 1);
        assert_eq!(probes.cdn.get_call_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_post_cdn_failure_still_deletes_row() {
        let (app, probes) = build_test_app(
            MockObjectStore::new(),
            MockPostRepository::new(),
            MockCdnInvalidator::new().with_failure(true),
        );
        let post = app
            .create_post(Some(png_upload()), Some("gone".to_string()))
            .await
            .unwrap();

        let deleted = app.delete_post(post.id).await.unwrap();

        assert_eq!(deleted.id, post.id);
        assert_eq!(probes.cdn.get_call_count(), 1);
        assert!(probes.posts.is_empty());
        assert!(probes.storage.is_empty());
    }
}
