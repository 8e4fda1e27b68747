//! Shared integration-test server bootstrap helpers.

#![allow(dead_code)]

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use axum_test::TestServer;
use serde_json::{json, Value};
use snipstore_server::{create_app, AppState, Config, RestConfig, StorageBackend};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

pub const FAKE_API_KEY: &str = "test-service-key";

pub fn test_config(backend: StorageBackend) -> Config {
    Config {
        port: 0,
        bind: None,
        allow_public_access: false,
        max_snippet_size: 10_000_000,
        backend,
    }
}

pub fn embedded_config(db_path: &Path) -> Config {
    test_config(StorageBackend::Embedded {
        db_path: db_path.to_str().expect("db path").to_string(),
    })
}

pub fn test_server_for_config(config: Config) -> TestServer {
    let state = AppState::open(config).expect("open store");
    let app = create_app(state);
    TestServer::new(app).expect("server")
}

pub fn setup_test_server() -> (TestServer, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let db_path = temp_dir.path().join("db");
    let server = test_server_for_config(embedded_config(&db_path));
    (server, temp_dir)
}

/// How the fake PostgREST table answers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FakeMode {
    Healthy,
    /// Every request fails with 500 and a diagnostic body.
    Broken,
    /// Inserts succeed but echo an empty row set.
    EmptyInsert,
    /// Every request stalls far longer than any client timeout.
    Hung,
}

/// How long a `Hung` backend sits on a request.
pub const HUNG_DELAY: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct FakeRest {
    pub rows: Arc<Mutex<Vec<Value>>>,
    mode: FakeMode,
}

impl FakeRest {
    pub fn row_count(&self) -> usize {
        self.rows.lock().expect("rows").len()
    }

    pub fn push_row(&self, row: Value) {
        self.rows.lock().expect("rows").push(row);
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    let apikey = headers.get("apikey").and_then(|v| v.to_str().ok());
    let bearer = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok());
    apikey == Some(FAKE_API_KEY) && bearer == Some(format!("Bearer {}", FAKE_API_KEY).as_str())
}

async fn fake_insert(
    State(fake): State<FakeRest>,
    headers: HeaderMap,
    Json(mut row): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, "Invalid API key").into_response();
    }
    if fake.mode == FakeMode::Hung {
        tokio::time::sleep(HUNG_DELAY).await;
    }
    match fake.mode {
        FakeMode::Broken => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "relation \"public.snippets\" does not exist",
            )
                .into_response();
        }
        FakeMode::EmptyInsert => return (StatusCode::CREATED, Json(json!([]))).into_response(),
        FakeMode::Healthy | FakeMode::Hung => {}
    }
    if row.get("id").is_none() {
        let next = fake.row_count() + 1;
        row["id"] = json!(format!("srv-{}", next));
    }
    let prefers_representation = headers
        .get("prefer")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("return=representation"));
    fake.push_row(row.clone());
    if prefers_representation {
        (StatusCode::CREATED, Json(json!([row]))).into_response()
    } else {
        StatusCode::CREATED.into_response()
    }
}

async fn fake_select(
    State(fake): State<FakeRest>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, "Invalid API key").into_response();
    }
    if fake.mode == FakeMode::Hung {
        tokio::time::sleep(HUNG_DELAY).await;
    }
    if fake.mode == FakeMode::Broken {
        return (StatusCode::INTERNAL_SERVER_ERROR, "database is down").into_response();
    }
    let Some(id) = params.get("id").and_then(|f| f.strip_prefix("eq.")) else {
        return (StatusCode::BAD_REQUEST, "missing id filter").into_response();
    };
    let rows: Vec<Value> = fake
        .rows
        .lock()
        .expect("rows")
        .iter()
        .filter(|row| row["id"] == id)
        .cloned()
        .collect();
    Json(rows).into_response()
}

/// Start a fake PostgREST server on an ephemeral port.
pub async fn spawn_fake_rest(mode: FakeMode) -> (SocketAddr, FakeRest) {
    let fake = FakeRest {
        rows: Arc::new(Mutex::new(Vec::new())),
        mode,
    };
    let app = Router::new()
        .route("/rest/v1/snippets", post(fake_insert).get(fake_select))
        .with_state(fake.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake backend");
    let addr = listener.local_addr().expect("fake backend addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake backend");
    });
    (addr, fake)
}

pub fn rest_config(addr: SocketAddr, api_key: &str, server_assigned_ids: bool) -> Config {
    rest_config_with_timeout(addr, api_key, server_assigned_ids, Duration::from_secs(5))
}

pub fn rest_config_with_timeout(
    addr: SocketAddr,
    api_key: &str,
    server_assigned_ids: bool,
    timeout: Duration,
) -> Config {
    test_config(StorageBackend::Rest(RestConfig {
        url: format!("http://{}/", addr),
        api_key: api_key.to_string(),
        table: "snippets".to_string(),
        server_assigned_ids,
        timeout,
    }))
}
