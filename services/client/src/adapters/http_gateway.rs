//! services/client/src/adapters/http_gateway.rs
//!
//! This module contains the HTTP adapter for the coursebook backend.
//! It implements the `BackendGateway` port from the `core` crate with `reqwest`.

use async_trait::async_trait;
use coursebook_core::domain::{
    AuthResponse, ChatAnswer, PersonalizedChapter, PersonalizedDashboard, Token,
    TranslatedChapter, User,
};
use coursebook_core::forms::{QuestionnaireSubmission, SigninRequest, SignupRequest};
use coursebook_core::ports::{BackendGateway, PortError, PortResult};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

// Shown when a failed response carries no usable `detail`.
const SIGNUP_FAILED: &str = "Signup failed";
const SIGNIN_FAILED: &str = "Signin failed";
const CURRENT_USER_FAILED: &str = "Failed to get user profile";
const QUESTIONNAIRE_FAILED: &str = "Failed to submit questionnaire";
const DASHBOARD_FAILED: &str = "Failed to get dashboard";
const PERSONALIZE_FAILED: &str = "Failed to personalize content";
const TRANSLATE_FAILED: &str = "Translation failed";
const CHAT_FAILED: &str = "Failed to get response from chatbot";

//=========================================================================================
// Request Bodies
//=========================================================================================

#[derive(Serialize)]
struct PersonalizeBody<'a> {
    chapter_id: &'a str,
}

#[derive(Serialize)]
struct TranslateBody<'a> {
    chapter_id: &'a str,
    target_language: &'a str,
}

#[derive(Serialize)]
struct ChatBody<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    selected_text: Option<&'a str>,
    session_id: &'a str,
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `BackendGateway` over HTTP with JSON bodies.
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    /// Creates a new `HttpGateway` rooted at `base_url`.
    pub fn new(client: Client, base_url: &Url) -> Self {
        Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        }
    }

    /// Creates a gateway with its own client that gives up on requests after `timeout`.
    pub fn with_timeout(base_url: &Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::new(client, base_url))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends one request and decodes a successful body as `T`.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> PortResult<T> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;

        if !status.is_success() {
            let message = detail_message(&body).unwrap_or_else(|| fallback.to_string());
            warn!(status = status.as_u16(), "Backend rejected request: {}", message);
            return Err(PortError::backend(Some(status.as_u16()), message));
        }

        serde_json::from_slice(&body).map_err(|e| {
            PortError::backend(
                Some(status.as_u16()),
                format!("Malformed response from backend: {}", e),
            )
        })
    }
}

fn transport_error(e: reqwest::Error) -> PortError {
    warn!("Backend unreachable: {}", e);
    PortError::Transport(e.to_string())
}

/// Pulls the server's `detail` out of an error body. FastAPI validation failures
/// send a list of `{msg, ...}` items instead of a string.
fn detail_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    match value.get("detail")? {
        Value::String(detail) if !detail.trim().is_empty() => Some(detail.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}

//=========================================================================================
// `BackendGateway` Trait Implementation
//=========================================================================================

#[async_trait]
impl BackendGateway for HttpGateway {
    async fn signup(&self, request: &SignupRequest) -> PortResult<AuthResponse> {
        debug!("POST /api/auth/signup");
        let builder = self.client.post(self.endpoint("/api/auth/signup")).json(request);
        self.send(builder, SIGNUP_FAILED).await
    }

    async fn signin(&self, request: &SigninRequest) -> PortResult<AuthResponse> {
        debug!("POST /api/auth/signin");
        let builder = self.client.post(self.endpoint("/api/auth/signin")).json(request);
        self.send(builder, SIGNIN_FAILED).await
    }

    async fn get_current_user(&self, token: &Token) -> PortResult<User> {
        debug!("GET /api/auth/me");
        let builder = self
            .client
            .get(self.endpoint("/api/auth/me"))
            .bearer_auth(token.as_str());
        self.send(builder, CURRENT_USER_FAILED).await
    }

    async fn submit_questionnaire(
        &self,
        token: &Token,
        submission: &QuestionnaireSubmission,
    ) -> PortResult<Value> {
        debug!("POST /api/auth/questionnaire");
        let builder = self
            .client
            .post(self.endpoint("/api/auth/questionnaire"))
            .bearer_auth(token.as_str())
            .json(submission);
        self.send(builder, QUESTIONNAIRE_FAILED).await
    }

    async fn get_dashboard(&self, token: &Token) -> PortResult<PersonalizedDashboard> {
        debug!("GET /api/auth/dashboard");
        let builder = self
            .client
            .get(self.endpoint("/api/auth/dashboard"))
            .bearer_auth(token.as_str());
        self.send(builder, DASHBOARD_FAILED).await
    }

    async fn personalize_chapter(
        &self,
        token: &Token,
        chapter_id: &str,
    ) -> PortResult<PersonalizedChapter> {
        debug!(chapter_id, "POST /api/personalize/chapter");
        let builder = self
            .client
            .post(self.endpoint("/api/personalize/chapter"))
            .bearer_auth(token.as_str())
            .json(&PersonalizeBody { chapter_id });
        self.send(builder, PERSONALIZE_FAILED).await
    }

    async fn translate_chapter(
        &self,
        token: &Token,
        chapter_id: &str,
        language_code: &str,
    ) -> PortResult<TranslatedChapter> {
        debug!(chapter_id, language_code, "POST /api/translate/chapter");
        let builder = self
            .client
            .post(self.endpoint("/api/translate/chapter"))
            .bearer_auth(token.as_str())
            .json(&TranslateBody {
                chapter_id,
                target_language: language_code,
            });
        self.send(builder, TRANSLATE_FAILED).await
    }

    async fn chat(
        &self,
        query: &str,
        session_id: &str,
        selected_text: Option<&str>,
    ) -> PortResult<ChatAnswer> {
        let path = if selected_text.is_some() {
            "/api/chat/selected"
        } else {
            "/api/chat"
        };
        debug!(session_id, "POST {}", path);
        let builder = self.client.post(self.endpoint(path)).json(&ChatBody {
            query,
            selected_text,
            session_id,
        });
        self.send(builder, CHAT_FAILED).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_detail_is_used_verbatim() {
        let body = br#"{"detail": "Email already registered"}"#;
        assert_eq!(detail_message(body).as_deref(), Some("Email already registered"));
    }

    #[test]
    fn validation_detail_list_is_joined() {
        let body = br#"{"detail": [{"loc": ["body", "email"], "msg": "value is not a valid email address"}, {"msg": "field required"}]}"#;
        assert_eq!(
            detail_message(body).as_deref(),
            Some("value is not a valid email address; field required")
        );
    }

    #[test]
    fn missing_or_unreadable_detail_yields_none() {
        assert_eq!(detail_message(br#"{"error": "nope"}"#), None);
        assert_eq!(detail_message(br#"{"detail": ""}"#), None);
        assert_eq!(detail_message(b"<html>502 Bad Gateway</html>"), None);
    }

    #[test]
    fn endpoints_keep_a_base_path_prefix() {
        let base = Url::parse("https://api.example.com/coursebook/").unwrap();
        let gateway = HttpGateway::new(Client::new(), &base);
        assert_eq!(
            gateway.endpoint("/api/chat"),
            "https://api.example.com/coursebook/api/chat"
        );
    }
}
