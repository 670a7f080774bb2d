//! A scripted stand-in for the coursebook backend, served over real HTTP.

#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use reqwest::Url;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct Recorded {
    pub route: String,
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone, Default)]
pub struct FakeBackend {
    requests: Arc<Mutex<Vec<Recorded>>>,
    replies: Arc<Mutex<HashMap<String, (StatusCode, String)>>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the reply for a route such as `"POST /api/auth/signup"`.
    pub fn reply(&self, route: &str, status: StatusCode, body: Value) -> &Self {
        self.reply_raw(route, status, &body.to_string())
    }

    pub fn reply_raw(&self, route: &str, status: StatusCode, body: &str) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .insert(route.to_string(), (status, body.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn routes(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.route).collect()
    }

    /// Serves the backend on an ephemeral local port and returns its base URL.
    pub async fn spawn(&self) -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().fallback(handle).with_state(self.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Url::parse(&format!("http://{}", addr)).unwrap()
    }
}

async fn handle(
    State(backend): State<FakeBackend>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let route = format!("{} {}", method, uri.path());
    backend.requests.lock().unwrap().push(Recorded {
        route: route.clone(),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });

    let (status, body) = backend
        .replies
        .lock()
        .unwrap()
        .get(&route)
        .cloned()
        .unwrap_or_else(|| (StatusCode::NOT_FOUND, json!({"detail": "Not Found"}).to_string()));
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

pub fn user_json(id: i64, email: &str, completed: bool) -> Value {
    json!({
        "id": id,
        "email": email,
        "full_name": "A B",
        "username": null,
        "is_active": true,
        "is_verified": false,
        "created_at": "2024-03-01T10:00:00",
        "has_completed_questionnaire": completed
    })
}

pub fn auth_json(token: &str, user: Value) -> Value {
    json!({"access_token": token, "token_type": "bearer", "user": user})
}

/// A local URL nothing is listening on.
pub async fn closed_port_url() -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{}", addr)).unwrap()
}
