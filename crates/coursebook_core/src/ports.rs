//! crates/coursebook_core/src/ports.rs
//!
//! Defines the service contracts (traits) the session logic depends on.
//! These traits form the boundary of the hexagonal architecture: the core never
//! knows whether it talks to a real HTTP backend or to a test fake, nor whether
//! credentials land on disk or nowhere at all.

use crate::domain::{
    AuthResponse, ChatAnswer, PersonalizedChapter, PersonalizedDashboard, Token,
    TranslatedChapter, User,
};
use crate::forms::{QuestionnaireSubmission, SigninRequest, SignupRequest};
use async_trait::async_trait;
use serde_json::Value;

//=========================================================================================
// Port Error and Result Types
//=========================================================================================

/// The error taxonomy shared by every port and every session read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    /// The backend could not be reached at all (DNS, refused connection, timeout).
    #[error("Could not reach the backend: {0}")]
    Transport(String),

    /// The backend answered with a non-success status. `message` is shown to users verbatim.
    #[error("{message}")]
    Backend { status: Option<u16>, message: String },

    /// The operation needs a session that does not exist.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// A client-side form or field check failed.
    #[error("{0}")]
    Validation(String),

    #[error("Please complete the background questionnaire first")]
    QuestionnaireRequired,
}

impl PortError {
    pub fn backend(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Backend {
            status,
            message: message.into(),
        }
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// One request per backend capability. Implementations issue exactly one HTTP
/// request per call and never retry.
///
/// Authenticated calls take a `&Token`; holding one is the caller's job, which is
/// why the session checks for it and this trait does not.
#[async_trait]
pub trait BackendGateway: Send + Sync {
    // --- Auth ---
    async fn signup(&self, request: &SignupRequest) -> PortResult<AuthResponse>;

    async fn signin(&self, request: &SigninRequest) -> PortResult<AuthResponse>;

    async fn get_current_user(&self, token: &Token) -> PortResult<User>;

    // --- Profile ---
    async fn submit_questionnaire(
        &self,
        token: &Token,
        submission: &QuestionnaireSubmission,
    ) -> PortResult<Value>;

    async fn get_dashboard(&self, token: &Token) -> PortResult<PersonalizedDashboard>;

    // --- Content ---
    async fn personalize_chapter(
        &self,
        token: &Token,
        chapter_id: &str,
    ) -> PortResult<PersonalizedChapter>;

    async fn translate_chapter(
        &self,
        token: &Token,
        chapter_id: &str,
        language_code: &str,
    ) -> PortResult<TranslatedChapter>;

    // --- Chat ---
    /// Asks the chatbot. With `selected_text` the question is scoped to that passage.
    async fn chat(
        &self,
        query: &str,
        session_id: &str,
        selected_text: Option<&str>,
    ) -> PortResult<ChatAnswer>;
}

/// Durable storage for the (token, user) pair that lets a session survive a restart.
///
/// Every method is infallible from the caller's point of view. Stores that cannot
/// persist behave as empty.
pub trait CredentialStore: Send + Sync {
    /// Returns the stored pair, or `None` unless both halves are present and readable.
    fn get(&self) -> Option<(Token, User)>;

    /// Overwrites any previous record.
    fn set(&self, token: &Token, user: &User);

    /// Clears both halves.
    fn remove(&self);
}
