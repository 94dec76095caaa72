//! HTTP front end of the classifier.
//!
//! Routes:
//!
//! * `POST /recognize` - multipart upload, field `image`
//! * `GET /recognize?img=<url>` - fetch and classify a remote image
//! * `GET /health` - liveness and model summary
//!
//! Classification runs on the blocking thread pool; the async runtime only
//! moves bytes.

pub mod error;
pub mod handlers;

pub use error::ApiError;

use crate::core::{ClassifyError, ServerConfig};
use crate::models::Classifier;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use std::sync::Arc;
use tracing::{info, warn};

/// State shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The loaded classifier.
    pub classifier: Arc<Classifier>,
    /// Client used to fetch remote images.
    pub http: reqwest::Client,
    /// Server settings.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Creates the state, building an HTTP client with the configured
    /// fetch timeout.
    pub fn new(classifier: Arc<Classifier>, config: ServerConfig) -> Result<Self, ClassifyError> {
        let http = reqwest::Client::builder()
            .timeout(config.fetch_timeout())
            .build()
            .map_err(|e| ClassifyError::config_error(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            classifier,
            http,
            config: Arc::new(config),
        })
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    let body_limit = state.config.body_limit_bytes;
    Router::new()
        .route(
            "/recognize",
            post(handlers::recognize_upload).get(handlers::recognize_url),
        )
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Binds the configured address and serves until Ctrl-C or SIGTERM.
pub async fn serve(state: AppState) -> Result<(), ClassifyError> {
    let listener = tokio::net::TcpListener::bind(&state.config.bind).await?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::OpaqueError;
    use crate::core::{InferenceEngine, ProbabilityVector, Tensor4D};
    use crate::domain::LabelTable;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use serde_json::Value;
    use std::io::Cursor;
    use std::time::Duration;
    use tower::ServiceExt;

    const BOUNDARY: &str = "X-OAR-CLASSIFY-BOUNDARY";

    /// Returns a fixed descending distribution, optionally after a delay.
    #[derive(Debug)]
    struct StubEngine {
        outputs: usize,
        delay: Option<Duration>,
    }

    impl InferenceEngine for StubEngine {
        fn infer(&self, input: &Tensor4D) -> Result<ProbabilityVector, ClassifyError> {
            if let Some(delay) = self.delay {
                std::thread::sleep(delay);
            }
            if input.shape() != [1, 224, 224, 3] {
                return Err(ClassifyError::inference_failure(
                    "stub",
                    "infer",
                    input.shape(),
                    "unexpected input shape",
                    OpaqueError("shape".to_string()),
                ));
            }
            let total = (self.outputs * (self.outputs + 1) / 2) as f32;
            Ok((0..self.outputs)
                .map(|i| (self.outputs - i) as f32 / total)
                .collect())
        }

        fn engine_info(&self) -> String {
            "Stub".to_string()
        }
    }

    fn app_with(delay: Option<Duration>, deadline_ms: Option<u64>) -> Router {
        let labels =
            LabelTable::new((0..20).map(|i| format!("label{i}")).collect()).unwrap();
        let classifier = Classifier::builder()
            .labels(labels)
            .engine(Box::new(StubEngine { outputs: 20, delay }))
            .build()
            .unwrap();
        let config = ServerConfig {
            request_deadline_ms: deadline_ms,
            ..ServerConfig::default()
        };
        router(AppState::new(Arc::new(classifier), config).unwrap())
    }

    fn app() -> Router {
        app_with(None, Some(30_000))
    }

    fn png_bytes() -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 48, Rgb([255, 0, 0])))
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    fn multipart_request(field: &str, filename: &str, data: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; \
                 filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/recognize")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_upload_returns_ranked_labels() {
        let (status, body) = send(app(), multipart_request("image", "red.png", &png_bytes())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["filename"], "red.png");
        let labels = body["labels"].as_array().unwrap();
        assert_eq!(labels.len(), 5);
        assert_eq!(labels[0]["label"], "label0");
        let probs: Vec<f64> = labels
            .iter()
            .map(|l| l["probability"].as_f64().unwrap())
            .collect();
        assert!(probs.windows(2).all(|w| w[0] >= w[1]));
    }

    #[tokio::test]
    async fn test_upload_without_image_field_is_bad_request() {
        let (status, body) = send(app(), multipart_request("file", "red.png", &png_bytes())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("image"));
    }

    #[tokio::test]
    async fn test_garbage_upload_is_bad_request() {
        let (status, body) =
            send(app(), multipart_request("image", "junk.jpg", b"not an image at all")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_png_declared_as_jpeg_is_bad_request() {
        let (status, _) = send(app(), multipart_request("image", "red.jpg", &png_bytes())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_url_without_img_is_bad_request() {
        let request = Request::builder()
            .uri("/recognize")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("img"));
    }

    #[tokio::test]
    async fn test_url_with_unsupported_scheme_is_bad_request() {
        let request = Request::builder()
            .uri("/recognize?img=file:///etc/passwd")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_deadline_exceeded_is_gateway_timeout() {
        let app = app_with(Some(Duration::from_millis(500)), Some(10));
        let (status, body) = send(app, multipart_request("image", "red.png", &png_bytes())).await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_health_reports_model_summary() {
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["labels"], 20);
        assert_eq!(body["top_n"], 5);
    }
}
