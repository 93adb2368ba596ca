//! In-process fake of the catalog API for tests.

use axum::{
    extract::{Path, Query, RawQuery, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const PAGE_SIZE: usize = 2;

/// Query text that makes the fake server answer slowly.
pub const SLOW_QUERY: &str = "slow";

/// Query text that makes the fake server fail after a delay.
pub const SLOW_ERROR_QUERY: &str = "slow boom";

#[derive(Clone)]
struct FakeState {
    files: Arc<Vec<serde_json::Value>>,
    seen_queries: Arc<Mutex<Vec<String>>>,
}

pub struct FakeCatalog {
    pub base_url: String,
    seen_queries: Arc<Mutex<Vec<String>>>,
}

impl FakeCatalog {
    pub async fn start() -> Self {
        let seen_queries = Arc::new(Mutex::new(Vec::new()));
        let state = FakeState {
            files: Arc::new(fixture()),
            seen_queries: seen_queries.clone(),
        };

        let app = Router::new()
            .route("/api/list", get(list))
            .route("/api/preview/:filename", get(preview))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            seen_queries,
        }
    }

    /// Raw query strings received by `/api/list`, oldest first.
    pub fn seen_queries(&self) -> Vec<String> {
        self.seen_queries.lock().unwrap().clone()
    }

    pub fn config(&self) -> crate::config::Config {
        let mut config = crate::config::Config::default();
        config.apply_base_url(&self.base_url).unwrap();
        config.timeout_secs = 5;
        config
    }
}

/// Server order is deliberately not alphabetical.
fn fixture() -> Vec<serde_json::Value> {
    vec![
        json!({
            "name": "shoe red.jpg",
            "display_name": "Red sneaker",
            "preview_url": "/api/preview/shoe%20red.jpg",
            "https_url": "https://photos.example.com/extencion_photo/shoe%20red.jpg",
            "price": 990,
            "stock": 5
        }),
        json!({
            "name": "beach 01.jpg",
            "display_name": "Beach towel",
            "preview_url": "/api/preview/beach%2001.jpg",
            "https_url": "https://photos.example.com/extencion_photo/beach%2001.jpg",
            "price": "1 200 ₽",
            "stock": 2
        }),
        json!({
            "name": "shoe blue.jpg",
            "display_name": "Blue sneaker",
            "preview_url": "/api/preview/shoe%20blue.jpg",
            "https_url": "https://photos.example.com/extencion_photo/shoe%20blue.jpg",
            "price": "1 490 ₽",
            "stock": 0
        }),
        json!({
            "name": "city.jpg",
            "preview_url": "/api/preview/city.jpg",
            "https_url": "https://photos.example.com/extencion_photo/city.jpg"
        }),
        json!({
            "name": "shoe white.jpg",
            "display_name": "White sneaker",
            "preview_url": "/api/preview/shoe%20white.jpg",
            "https_url": "https://photos.example.com/extencion_photo/shoe%20white.jpg",
            "price": 19.5,
            "stock": 1
        }),
    ]
}

#[derive(Deserialize)]
struct ListParams {
    page: Option<u32>,
    #[serde(default)]
    query: String,
    in_stock: Option<bool>,
}

async fn list(
    State(state): State<FakeState>,
    RawQuery(raw): RawQuery,
    Query(params): Query<ListParams>,
) -> Response {
    state
        .seen_queries
        .lock()
        .unwrap()
        .push(raw.unwrap_or_default());

    match params.query.as_str() {
        "boom" => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "detail": "db down" })),
            )
                .into_response()
        }
        "html" => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "text/html")],
                "<html><body>Internal Server Error</body></html>",
            )
                .into_response()
        }
        SLOW_ERROR_QUERY => {
            tokio::time::sleep(Duration::from_millis(300)).await;
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "detail": "timed out reading photo directory" })),
            )
                .into_response();
        }
        "garbage" => return (StatusCode::OK, "{\"files\": \"nope\"").into_response(),
        SLOW_QUERY => tokio::time::sleep(Duration::from_millis(300)).await,
        _ => {}
    }

    let needle = params.query.to_lowercase();
    let matched: Vec<_> = state
        .files
        .iter()
        .filter(|f| {
            let name = f["name"].as_str().unwrap_or_default().to_lowercase();
            needle == SLOW_QUERY || name.contains(&needle)
        })
        .filter(|f| !params.in_stock.unwrap_or(false) || f["stock"].as_u64().unwrap_or(0) > 0)
        .cloned()
        .collect();

    let total_files = matched.len();
    let total_pages = total_files.div_ceil(PAGE_SIZE);
    let current_page = (params.page.unwrap_or(1) as usize).clamp(1, total_pages.max(1));
    let start = (current_page - 1) * PAGE_SIZE;
    let files: Vec<_> = matched.into_iter().skip(start).take(PAGE_SIZE).collect();

    Json(json!({
        "files": files,
        "total_files": total_files,
        "total_pages": total_pages,
        "current_page": current_page
    }))
    .into_response()
}

#[derive(Deserialize)]
struct PreviewParams {
    download: Option<bool>,
}

async fn preview(
    State(state): State<FakeState>,
    Path(filename): Path<String>,
    Query(params): Query<PreviewParams>,
) -> Response {
    let known = state
        .files
        .iter()
        .any(|f| f["name"].as_str() == Some(filename.as_str()));
    if !known {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "File not found" })),
        )
            .into_response();
    }

    let body = format!("jpeg:{}", filename).into_bytes();
    if params.download.unwrap_or(false) {
        (
            [
                (header::CONTENT_TYPE, "image/jpeg".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", filename),
                ),
            ],
            body,
        )
            .into_response()
    } else {
        ([(header::CONTENT_TYPE, "image/jpeg".to_string())], body).into_response()
    }
}
