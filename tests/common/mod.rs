//! In-process stand-ins for the TMDB and Appwrite HTTP APIs.

#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Path, RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch},
};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use reelscout::config::{AppwriteTarget, Config, StoreBackend};

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// A request the TMDB stub received.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub path: String,
    pub query: String,
    pub authorization: Option<String>,
}

#[derive(Clone, Default)]
pub struct TmdbStub {
    pub base_url: String,
    pub seen: Arc<Mutex<Vec<SeenRequest>>>,
}

pub const TMDB_KEY: &str = "test-token";

impl TmdbStub {
    /// Search behavior is keyed on the query text:
    /// `unauthorized` answers 401, `boom` answers 500, `envelope` answers an
    /// error envelope, `nothing` answers an empty list, anything else one
    /// movie titled after the query.
    pub async fn start() -> Self {
        let seen: Arc<Mutex<Vec<SeenRequest>>> = Arc::default();

        let app = Router::new()
            .route("/3/discover/movie", get(tmdb_handler))
            .route("/3/search/movie", get(tmdb_handler))
            .with_state(seen.clone());

        let base = serve(app).await;
        Self {
            base_url: format!("{base}/3"),
            seen,
        }
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }
}

async fn tmdb_handler(
    State(seen): State<Arc<Mutex<Vec<SeenRequest>>>>,
    uri: axum::http::Uri,
    headers: HeaderMap,
) -> Response {
    let authorization = headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .map(String::from);

    seen.lock().unwrap().push(SeenRequest {
        path: uri.path().to_string(),
        query: uri.query().unwrap_or_default().to_string(),
        authorization: authorization.clone(),
    });

    let expected = format!("Bearer {TMDB_KEY}");
    if authorization.as_deref() != Some(expected.as_str()) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "status_code": 7, "status_message": "Invalid API key" })),
        )
            .into_response();
    }

    if uri.path().ends_with("/discover/movie") {
        return Json(json!({
            "page": 1,
            "results": [
                { "id": 1, "title": "Popular One", "poster_path": "/pop1.jpg", "vote_average": 8.1, "release_date": "2024-03-01" },
                { "id": 2, "title": "Popular Two", "poster_path": null }
            ]
        }))
        .into_response();
    }

    let term: String = url::form_urlencoded::parse(uri.query().unwrap_or_default().as_bytes())
        .find(|(k, _)| k == "query")
        .map(|(_, v)| v.into_owned())
        .unwrap_or_default();

    match term.as_str() {
        "unauthorized" => (StatusCode::UNAUTHORIZED, "denied").into_response(),
        "boom" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        "envelope" => Json(json!({ "Response": "False", "Error": "Movie not found!" })).into_response(),
        "nothing" => Json(json!({ "page": 1, "results": [] })).into_response(),
        _ => Json(json!({
            "page": 1,
            "results": [
                { "id": 438_631, "title": term, "poster_path": "/top.jpg" },
                { "id": 2, "title": format!("{term} II"), "poster_path": "/second.jpg" }
            ]
        }))
        .into_response(),
    }
}

#[derive(Default)]
struct AppwriteState {
    documents: Mutex<Vec<Value>>,
    fail: AtomicBool,
}

#[derive(Clone)]
pub struct AppwriteStub {
    pub endpoint: String,
    state: Arc<AppwriteState>,
}

pub const PROJECT: &str = "proj";
pub const DATABASE: &str = "db";
pub const COLLECTION: &str = "metrics";

impl AppwriteStub {
    pub async fn start() -> Self {
        let state = Arc::new(AppwriteState::default());

        let app = Router::new()
            .route(
                "/v1/databases/{db}/collections/{col}/documents",
                get(list_documents).post(create_document),
            )
            .route(
                "/v1/databases/{db}/collections/{col}/documents/{id}",
                patch(update_document),
            )
            .with_state(state.clone());

        let base = serve(app).await;
        Self {
            endpoint: format!("{base}/v1"),
            state,
        }
    }

    pub fn target(&self) -> AppwriteTarget {
        AppwriteTarget {
            endpoint: self.endpoint.clone(),
            project_id: PROJECT.to_string(),
            database_id: DATABASE.to_string(),
            collection_id: COLLECTION.to_string(),
            api_key: None,
        }
    }

    /// Makes every subsequent request fail with 500.
    pub fn fail(&self, fail: bool) {
        self.state.fail.store(fail, Ordering::SeqCst);
    }

    pub fn documents(&self) -> Vec<Value> {
        self.state.documents.lock().unwrap().clone()
    }

    pub fn insert(&self, term: &str, count: i64) {
        self.state.documents.lock().unwrap().push(json!({
            "$id": format!("seed-{term}"),
            "searchTerm": term,
            "count": count,
            "movie_id": 1,
            "poster_url": "https://image.tmdb.org/t/p/w500/seed.jpg"
        }));
    }
}

fn check(state: &AppwriteState, headers: &HeaderMap, db: &str, col: &str) -> Option<Response> {
    if state.fail.load(Ordering::SeqCst) {
        return Some(
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Server Error", "code": 500 })),
            )
                .into_response(),
        );
    }
    if headers.get("x-appwrite-project").and_then(|h| h.to_str().ok()) != Some(PROJECT) {
        return Some(
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Project is not accessible", "code": 401 })),
            )
                .into_response(),
        );
    }
    if db != DATABASE || col != COLLECTION {
        return Some(
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": "Collection not found", "code": 404 })),
            )
                .into_response(),
        );
    }
    None
}

async fn list_documents(
    State(state): State<Arc<AppwriteState>>,
    Path((db, col)): Path<(String, String)>,
    headers: HeaderMap,
    RawQuery(raw): RawQuery,
) -> Response {
    if let Some(rejection) = check(&state, &headers, &db, &col) {
        return rejection;
    }

    let queries: Vec<Value> = url::form_urlencoded::parse(raw.unwrap_or_default().as_bytes())
        .filter(|(k, _)| k == "queries[]")
        .filter_map(|(_, v)| serde_json::from_str(&v).ok())
        .collect();

    let mut docs = state.documents.lock().unwrap().clone();
    let mut limit = 25;

    for q in &queries {
        match q["method"].as_str() {
            Some("equal") => {
                let attribute = q["attribute"].as_str().unwrap_or_default().to_string();
                let values = q["values"].as_array().cloned().unwrap_or_default();
                docs.retain(|d| values.contains(&d[&attribute]));
            }
            Some("orderDesc") => {
                let attribute = q["attribute"].as_str().unwrap_or_default().to_string();
                docs.sort_by_key(|d| std::cmp::Reverse(d[&attribute].as_i64().unwrap_or(0)));
            }
            Some("limit") => {
                limit = q["values"][0].as_u64().unwrap_or(25) as usize;
            }
            _ => {}
        }
    }

    docs.truncate(limit);
    Json(json!({ "total": docs.len(), "documents": docs })).into_response()
}

async fn create_document(
    State(state): State<Arc<AppwriteState>>,
    Path((db, col)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Some(rejection) = check(&state, &headers, &db, &col) {
        return rejection;
    }

    let mut doc = body["data"].clone();
    doc["$id"] = body["documentId"].clone();
    doc["$createdAt"] = json!("2026-10-19T00:00:00.000+00:00");
    state.documents.lock().unwrap().push(doc.clone());

    (StatusCode::CREATED, Json(doc)).into_response()
}

async fn update_document(
    State(state): State<Arc<AppwriteState>>,
    Path((db, col, id)): Path<(String, String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Some(rejection) = check(&state, &headers, &db, &col) {
        return rejection;
    }

    let mut docs = state.documents.lock().unwrap();
    let Some(doc) = docs.iter_mut().find(|d| d["$id"] == id.as_str()) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Document not found", "code": 404 })),
        )
            .into_response();
    };

    if let Some(fields) = body["data"].as_object() {
        for (key, value) in fields {
            doc[key] = value.clone();
        }
    }

    Json(doc.clone()).into_response()
}

/// Config pointing at the given stubs, with no file or environment input.
pub fn config_for(tmdb: &TmdbStub, appwrite: Option<&AppwriteStub>) -> Config {
    let mut config = Config::default();
    config.catalog.base_url = tmdb.base_url.clone();
    config.catalog.api_key = Some(TMDB_KEY.to_string());
    config.catalog.request_timeout_seconds = 5;
    config.search.debounce_ms = 50;

    match appwrite {
        Some(stub) => {
            config.store.backend = StoreBackend::Appwrite;
            config.store.endpoint = stub.endpoint.clone();
            config.store.project_id = Some(PROJECT.to_string());
            config.store.database_id = Some(DATABASE.to_string());
            config.store.collection_id = Some(COLLECTION.to_string());
            config.store.request_timeout_seconds = 5;
        }
        None => {
            config.store.backend = StoreBackend::Sqlite;
            config.store.database_path = "sqlite::memory:".to_string();
        }
    }

    config
}
