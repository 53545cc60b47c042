//! HTTP surface: routes, multipart parsing and error responses.

use crate::app::App;
use crate::mime::detect_image_mime;
use crate::models::{Config, Post, PostView, Upload};
use crate::Error;
use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

const CLIENT_PAGE: &str = include_str!("../assets/index.html");

pub async fn run(app: App, config: &Config) -> crate::Result<()> {
    let router = build_router(Arc::new(app), config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "picboard listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

pub fn build_router(app: Arc<App>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/app", get(client_page))
        .route("/api/post", post(create_post))
        .route("/api/posts", get(list_posts))
        .route("/api/post/:id", delete(delete_post))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app)
}

async fn index() -> &'static str {
    "Hello World"
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn client_page() -> Html<&'static str> {
    Html(CLIENT_PAGE)
}

async fn create_post(
    State(app): State<Arc<App>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Post>, ApiError> {
    let mut multipart =
        multipart.map_err(|rejection| ApiError::new(rejection.status(), rejection.body_text()))?;

    let mut upload = None;
    let mut caption = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::new(e.status(), e.body_text()))?
    {
        match field.name() {
            Some("image") => {
                let declared = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::new(e.status(), e.body_text()))?;
                let content_type =
                    declared.unwrap_or_else(|| detect_image_mime(&bytes).to_string());
                upload = Some(Upload {
                    bytes: bytes.to_vec(),
                    content_type,
                });
            }
            Some("caption") => {
                caption = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::new(e.status(), e.body_text()))?,
                );
            }
            _ => {}
        }
    }

    let post = app.create_post(upload, caption).await?;
    Ok(Json(post))
}

async fn list_posts(State(app): State<Arc<App>>) -> Result<Json<Vec<PostView>>, ApiError> {
    Ok(Json(app.list_posts().await?))
}

async fn delete_post(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
) -> Result<Json<Post>, ApiError> {
    let id: i32 = id
        .parse()
        .map_err(|_| ApiError::bad_request(format!("invalid post id '{}'", id)))?;

    Ok(Json(app.delete_post(id).await?))
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match &err {
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            e if e.is_upstream() => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError::new(status, err.to_string())
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, message = %self.message, "api error");
        } else {
            info!(status = %self.status, message = %self.message, "request rejected");
        }
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}
