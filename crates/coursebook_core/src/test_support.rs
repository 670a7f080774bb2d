//! A scripted `BackendGateway` that records every call it receives.

use crate::domain::{
    AuthResponse, ChatAnswer, PersonalizedChapter, PersonalizedDashboard, Token,
    TranslatedChapter, User,
};
use crate::forms::{QuestionnaireSubmission, SigninRequest, SignupRequest};
use crate::credentials::MemoryCredentialStore;
use crate::ports::{BackendGateway, CredentialStore, PortError, PortResult};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Signup,
    Signin,
    CurrentUser(Token),
    Questionnaire,
    Dashboard,
    Personalize(String),
    Translate(String, String),
    Chat {
        query: String,
        session_id: String,
        selected_text: Option<String>,
    },
}

pub struct FakeGateway {
    auth_reply: PortResult<AuthResponse>,
    current_user_reply: PortResult<User>,
    questionnaire_reply: PortResult<Value>,
    chat_reply: PortResult<ChatAnswer>,
    current_user_gate: Option<Arc<Notify>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        let unscripted = PortError::backend(Some(500), "unscripted call");
        Self {
            auth_reply: Err(unscripted.clone()),
            current_user_reply: Err(unscripted.clone()),
            questionnaire_reply: Ok(json!({})),
            chat_reply: Err(unscripted),
            current_user_gate: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_auth(mut self, reply: PortResult<AuthResponse>) -> Self {
        self.auth_reply = reply;
        self
    }

    pub fn with_current_user(mut self, reply: PortResult<User>) -> Self {
        self.current_user_reply = reply;
        self
    }

    pub fn with_questionnaire(mut self, reply: PortResult<Value>) -> Self {
        self.questionnaire_reply = reply;
        self
    }

    pub fn with_chat(mut self, reply: PortResult<ChatAnswer>) -> Self {
        self.chat_reply = reply;
        self
    }

    /// Holds `get_current_user` until the gate is notified.
    pub fn with_current_user_gate(mut self, gate: Arc<Notify>) -> Self {
        self.current_user_gate = Some(gate);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl BackendGateway for FakeGateway {
    async fn signup(&self, _request: &SignupRequest) -> PortResult<AuthResponse> {
        self.record(Call::Signup);
        self.auth_reply.clone()
    }

    async fn signin(&self, _request: &SigninRequest) -> PortResult<AuthResponse> {
        self.record(Call::Signin);
        self.auth_reply.clone()
    }

    async fn get_current_user(&self, token: &Token) -> PortResult<User> {
        self.record(Call::CurrentUser(token.clone()));
        if let Some(gate) = &self.current_user_gate {
            gate.notified().await;
        }
        self.current_user_reply.clone()
    }

    async fn submit_questionnaire(
        &self,
        _token: &Token,
        _submission: &QuestionnaireSubmission,
    ) -> PortResult<Value> {
        self.record(Call::Questionnaire);
        self.questionnaire_reply.clone()
    }

    async fn get_dashboard(&self, _token: &Token) -> PortResult<PersonalizedDashboard> {
        self.record(Call::Dashboard);
        Ok(PersonalizedDashboard::default())
    }

    async fn personalize_chapter(
        &self,
        _token: &Token,
        chapter_id: &str,
    ) -> PortResult<PersonalizedChapter> {
        self.record(Call::Personalize(chapter_id.to_string()));
        Ok(PersonalizedChapter {
            chapter_id: chapter_id.to_string(),
            ..Default::default()
        })
    }

    async fn translate_chapter(
        &self,
        _token: &Token,
        chapter_id: &str,
        language_code: &str,
    ) -> PortResult<TranslatedChapter> {
        self.record(Call::Translate(chapter_id.to_string(), language_code.to_string()));
        Ok(TranslatedChapter {
            chapter_id: chapter_id.to_string(),
            target_language: language_code.to_string(),
            ..Default::default()
        })
    }

    async fn chat(
        &self,
        query: &str,
        session_id: &str,
        selected_text: Option<&str>,
    ) -> PortResult<ChatAnswer> {
        self.record(Call::Chat {
            query: query.to_string(),
            session_id: session_id.to_string(),
            selected_text: selected_text.map(str::to_string),
        });
        self.chat_reply.clone()
    }
}

pub fn user(id: i64, email: &str, completed: bool) -> User {
    serde_json::from_value(json!({
        "id": id,
        "email": email,
        "has_completed_questionnaire": completed,
    }))
    .unwrap()
}

pub fn auth_response(token: &str, user: User) -> AuthResponse {
    AuthResponse {
        access_token: Token::new(token),
        token_type: Some("bearer".to_string()),
        user,
    }
}

/// A `MemoryCredentialStore` whose first `set` writes through, reports that it
/// got there, then waits to be released.
pub struct ParkingStore {
    inner: MemoryCredentialStore,
    entered: Mutex<Option<Sender<()>>>,
    release: Mutex<Receiver<()>>,
}

impl ParkingStore {
    pub fn new() -> (Self, Receiver<()>, Sender<()>) {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let store = Self {
            inner: MemoryCredentialStore::new(),
            entered: Mutex::new(Some(entered_tx)),
            release: Mutex::new(release_rx),
        };
        (store, entered_rx, release_tx)
    }
}

impl CredentialStore for ParkingStore {
    fn get(&self) -> Option<(Token, User)> {
        self.inner.get()
    }

    fn set(&self, token: &Token, user: &User) {
        self.inner.set(token, user);
        if let Some(entered) = self.entered.lock().unwrap().take() {
            entered.send(()).unwrap();
            self.release.lock().unwrap().recv().unwrap();
        }
    }

    fn remove(&self) {
        self.inner.remove();
    }
}
