//! Reusable test helpers for HTTP integration tests.
//!
//! Provides `TestApp` for building and sending requests through the full axum
//! router over a temporary upload directory and `SQLite` database, plus a
//! small multipart body builder.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use imagedrop_server::api::{create_router, AppState};
use imagedrop_server::config::Config;
use imagedrop_server::db::{self, ImageMetadata, MetadataRecorder};
use tempfile::TempDir;
use tower::ServiceExt;

/// Secret configured on every [`TestApp`].
pub const TEST_TOKEN: &str = "123qwe";

const BOUNDARY: &str = "----imagedrop-test-boundary";

// ============================================================================
// Test App
// ============================================================================

/// A test application wrapping the full axum router.
///
/// The upload directory and database live in a temporary directory that is
/// removed when the app is dropped.
pub struct TestApp {
    pub router: Router,
    pub config: Config,
    pub metadata: MetadataRecorder,
    _dir: TempDir,
}

impl TestApp {
    /// Create a test app with an existing, empty upload directory.
    pub async fn new() -> Self {
        Self::build(|_| {}).await
    }

    /// Create a test app after adjusting its config.
    ///
    /// The closure receives the config with temporary paths already filled in.
    pub async fn build(adjust: impl FnOnce(&mut Config)) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let upload_dir = dir.path().join("uploads");
        std::fs::create_dir(&upload_dir).expect("Failed to create upload dir");

        let mut config = Config::default_for_test();
        config.auth_token = TEST_TOKEN.into();
        config.upload_dir = upload_dir;
        config.database_url = format!("sqlite://{}", dir.path().join("images.db").display());
        adjust(&mut config);

        let pool = db::create_pool(&config.database_url)
            .await
            .expect("Failed to open test DB");
        let state = AppState::new(pool, config.clone());
        let metadata = state.metadata.clone();
        let router = create_router(state);

        Self {
            router,
            config,
            metadata,
            _dir: dir,
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.config.upload_dir
    }

    /// Path a file named `filename` is stored at.
    pub fn upload_path(&self, filename: &str) -> PathBuf {
        self.config.upload_dir.join(filename)
    }

    /// Files currently in the upload directory, sorted by name.
    pub fn stored_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.upload_dir())
            .map(|entries| {
                entries
                    .filter_map(Result::ok)
                    .map(|e| e.file_name().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }

    /// All metadata rows, oldest first.
    pub async fn rows(&self) -> Vec<ImageMetadata> {
        self.metadata.list().await.expect("Failed to list images")
    }

    /// Send a request through the router via `tower::ServiceExt::oneshot`.
    pub async fn oneshot(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("oneshot request failed")
    }

    /// `GET uri`.
    pub async fn get(&self, uri: &str) -> Response<Body> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");
        self.oneshot(request).await
    }

    /// `POST /upload` with the given multipart form.
    pub async fn upload(&self, form: MultipartForm) -> Response<Body> {
        self.oneshot(form.into_request("/upload")).await
    }
}

// ============================================================================
// Multipart
// ============================================================================

/// Builder for a `multipart/form-data` body.
#[derive(Default)]
pub struct MultipartForm {
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text field.
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    /// Add a file field. `content_type` of `None` omits the part header.
    pub fn file(
        mut self,
        name: &str,
        filename: &str,
        content_type: Option<&str>,
        data: &[u8],
    ) -> Self {
        let mut head = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n"
        );
        if let Some(ct) = content_type {
            head.push_str(&format!("Content-Type: {ct}\r\n"));
        }
        head.push_str("\r\n");

        self.body.extend_from_slice(head.as_bytes());
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Convenience for the usual `auth` + `data` form.
    pub fn upload(token: &str, filename: &str, content_type: &str, data: &[u8]) -> Self {
        Self::new()
            .text("auth", token)
            .file("data", filename, Some(content_type), data)
    }

    /// Finish the body and wrap it in a `POST` request to `uri`.
    pub fn into_request(mut self, uri: &str) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(self.body))
            .expect("Failed to build request")
    }
}

// ============================================================================
// Fixtures & response helpers
// ============================================================================

/// A GIF89a file of exactly `len` bytes.
pub fn gif(len: usize) -> Vec<u8> {
    let mut data = b"GIF89a\x01\x00\x01\x00\x80\x00\x00".to_vec();
    data.resize(len, 0x3B);
    data
}

/// A PNG file of exactly `len` bytes.
pub fn png(len: usize) -> Vec<u8> {
    let mut data = b"\x89PNG\x0D\x0A\x1A\x0A\x00\x00\x00\x0DIHDR".to_vec();
    data.resize(len, 0x00);
    data
}

/// A JPEG file of exactly `len` bytes.
pub fn jpeg(len: usize) -> Vec<u8> {
    let mut data = b"\xFF\xD8\xFF\xE0\x00\x10JFIF\x00".to_vec();
    data.resize(len, 0x11);
    data
}

/// Read a response body as a UTF-8 string.
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}

/// Assert status and body text in one go.
pub async fn assert_response(response: Response<Body>, status: StatusCode, body: &str) {
    assert_eq!(response.status(), status);
    assert_eq!(body_string(response).await, body);
}
