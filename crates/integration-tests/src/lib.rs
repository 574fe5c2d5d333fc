//! Shared harness for the integration suites: the real router wired to an
//! in-memory SQLite store, a temporary public directory and real auth.

#![cfg(feature = "web-axum")]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use api_adapters::{router, AppState, UploadLimit};
use auth_adapters::{Argon2Hasher, JwtTokenService};
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use domains::{CategoryId, CategoryRepository};
use services::{AccountService, CommentService, PostService};
use storage_adapters::{LocalMediaStore, SqliteStore};
use tempfile::TempDir;
use tower::ServiceExt;

pub const SECRET: &[u8] = b"integration-secret";
pub const BOUNDARY: &str = "gaceta-test-boundary";

/// Smallest byte sequence the media store recognises as a PNG.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01\0\0\0\x01\x08\x06\0\0\0";

pub struct TestApp {
    pub app: Router,
    pub store: Arc<SqliteStore>,
    pub tokens: Arc<JwtTokenService>,
    public_dir: TempDir,
}

impl TestApp {
    /// Fresh database seeded with both categories, empty upload directory,
    /// 2 MB upload ceiling.
    pub async fn spawn() -> Self {
        let store = Arc::new(SqliteStore::connect("sqlite::memory:", 1).await.unwrap());
        store.ensure_categories(&["Farandula", "Politica"]).await.unwrap();

        let public_dir = tempfile::tempdir().unwrap();
        let media = Arc::new(LocalMediaStore::new(
            public_dir.path().join("img"),
            "/public/img".to_string(),
        ));
        let tokens = Arc::new(JwtTokenService::new(SECRET, chrono::Duration::hours(2)));

        let state = AppState {
            accounts: Arc::new(AccountService::new(
                store.clone(),
                Arc::new(Argon2Hasher::new()),
                tokens.clone(),
            )),
            posts: Arc::new(PostService::new(
                store.clone(),
                store.clone(),
                store.clone(),
                media,
            )),
            comments: Arc::new(CommentService::new(store.clone())),
            upload_limit: UploadLimit { megabytes: 2 },
        };

        Self {
            app: router(state, public_dir.path()),
            store,
            tokens,
            public_dir,
        }
    }

    pub fn public_dir(&self) -> &Path {
        self.public_dir.path()
    }

    /// Files currently stored in the upload directory.
    pub fn uploaded_files(&self) -> Vec<PathBuf> {
        match std::fs::read_dir(self.public_dir.path().join("img")) {
            Ok(entries) => entries.map(|entry| entry.unwrap().path()).collect(),
            Err(_) => Vec::new(),
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.app.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(&self, uri: &str, body: serde_json::Value, token: Option<&str>) -> Response {
        let mut request = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(request.body(Body::from(body.to_string())).unwrap())
            .await
    }

    pub async fn post_multipart(&self, uri: &str, form: Vec<u8>, token: Option<&str>) -> Response {
        let mut request = Request::post(uri).header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(request.body(Body::from(form)).unwrap()).await
    }

    /// Registers an account and returns a token for it.
    pub async fn signed_in(&self, name: &str, email: &str, password: &str) -> String {
        let registered = self
            .post_json(
                "/api/v1/registro",
                serde_json::json!({"nombre": name, "email": email, "password": password}),
                None,
            )
            .await;
        assert_eq!(registered.status(), StatusCode::CREATED);

        let login = self
            .post_json(
                "/api/v1/login",
                serde_json::json!({"email": email, "password": password}),
                None,
            )
            .await;
        assert_eq!(login.status(), StatusCode::OK);
        body_json(login).await["token"]
            .as_str()
            .unwrap()
            .to_string()
    }

    pub async fn category_id(&self, name: &str) -> CategoryId {
        CategoryRepository::list(self.store.as_ref())
            .await
            .unwrap()
            .into_iter()
            .find(|category| category.name == name)
            .unwrap()
            .id
    }
}

pub async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

/// Hand-built `multipart/form-data` body delimited by [`BOUNDARY`].
#[derive(Default)]
pub struct MultipartForm {
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}

/// The complete publish form for `category_id` with a PNG attached.
pub fn publish_form(title: &str, category_id: CategoryId) -> Vec<u8> {
    MultipartForm::new()
        .text("titulo", title)
        .text("contenido", "Contenido de prueba")
        .text("idCategoria", &category_id.to_string())
        .file("imagen", "foto.png", "image/png", PNG_BYTES)
        .finish()
}
