//! Local HTTP server standing in for the Google APIs in tests
//!
//! Every request is recorded. Answers come from a per-path table; unlisted
//! paths get `200 {}`, and the token path issues `token-1`, `token-2`, ... in
//! order.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use super::auth::{AuthManager, SPREADSHEETS_SCOPE};
use super::models::ServiceAccountKey;

pub const TOKEN_PATH: &str = "/token";

const TEST_PRIVATE_KEY: &str = include_str!("../../testdata/service_account_key.pem");

/// A request as the server saw it
#[derive(Debug, Clone)]
pub struct Received {
    pub method: Method,
    /// Raw path, percent-encoding preserved
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: String,
}

impl Received {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }

    /// A field of a form-encoded body, still percent-encoded
    pub fn form_field(&self, name: &str) -> Option<&str> {
        self.body.split('&').find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            (key == name).then_some(value)
        })
    }
}

#[derive(Default)]
struct Shared {
    received: Mutex<Vec<Received>>,
    responses: Mutex<HashMap<String, (StatusCode, Value)>>,
}

pub struct StubServer {
    pub base_url: String,
    shared: Arc<Shared>,
}

impl StubServer {
    pub async fn start() -> Self {
        let shared = Arc::new(Shared::default());
        let app = Router::new().fallback(answer).with_state(shared.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, shared }
    }

    /// Answer every request to `path` with `status` and a JSON body
    pub fn respond(&self, path: &str, status: StatusCode, body: Value) {
        self.shared
            .responses
            .lock()
            .unwrap()
            .insert(path.to_string(), (status, body));
    }

    /// Requests other than token exchanges
    pub fn api_calls(&self) -> Vec<Received> {
        self.received()
            .into_iter()
            .filter(|r| r.path != TOKEN_PATH)
            .collect()
    }

    pub fn token_requests(&self) -> Vec<Received> {
        self.received()
            .into_iter()
            .filter(|r| r.path == TOKEN_PATH)
            .collect()
    }

    fn received(&self) -> Vec<Received> {
        self.shared.received.lock().unwrap().clone()
    }

    /// Service account key whose token URI points at this server
    pub fn service_account_key(&self) -> ServiceAccountKey {
        ServiceAccountKey {
            key_type: Some("service_account".into()),
            client_email: "intern-api@certsheet-test.iam.gserviceaccount.com".into(),
            private_key: TEST_PRIVATE_KEY.into(),
            private_key_id: Some("test-key-1".into()),
            token_uri: format!("{}{}", self.base_url, TOKEN_PATH),
        }
    }

    pub fn auth_manager(&self) -> AuthManager {
        AuthManager::new(
            self.service_account_key(),
            SPREADSHEETS_SCOPE,
            reqwest::Client::new(),
        )
        .unwrap()
    }
}

async fn answer(
    State(shared): State<Arc<Shared>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let received = Received {
        method,
        path: path.clone(),
        query: uri.query().map(str::to_string),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
        body: String::from_utf8_lossy(&body).into_owned(),
    };

    let issued = {
        let mut all = shared.received.lock().unwrap();
        all.push(received);
        all.iter().filter(|r| r.path == TOKEN_PATH).count()
    };

    let configured = shared.responses.lock().unwrap().get(&path).cloned();
    if let Some((status, body)) = configured {
        return (status, Json(body)).into_response();
    }

    if path == TOKEN_PATH {
        return Json(json!({
            "access_token": format!("token-{}", issued),
            "expires_in": 3600,
            "token_type": "Bearer"
        }))
        .into_response();
    }

    Json(json!({})).into_response()
}
