//! crates/coursebook_core/src/session.rs
//!
//! The client-side session state machine.
//!
//! ```text
//! Initializing ──initialize()──▶ Unauthenticated ◀──signout()── Authenticated
//!       │                              │                          ▲   │
//!       └──────────initialize()────────┼───signup()/signin()──────┘   │
//!                                      └──────────────────────────────┘
//!                                          submit_questionnaire() keeps Authenticated
//! ```
//!
//! Memory and the `CredentialStore` are updated together before any operation
//! returns. Auth mutations resolve to an [`Outcome`]; reads reject with a
//! [`PortError`]. Consumers branch on that difference, so it is kept.

use crate::domain::{
    find_language, AuthResponse, PersonalizedChapter, PersonalizedDashboard, Token,
    TranslatedChapter, User,
};
use crate::forms::{QuestionnaireSubmission, SigninRequest, SignupRequest};
use crate::ports::{BackendGateway, CredentialStore, PortError, PortResult};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

//=========================================================================================
// Session State
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Initializing,
    Unauthenticated,
    Authenticated,
}

/// The current identity. `Authenticated` iff both `user` and `token` are present.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<Token>,
    pub status: SessionStatus,
    pub last_error: Option<String>,
}

impl Session {
    fn initializing() -> Self {
        Self {
            user: None,
            token: None,
            status: SessionStatus::Initializing,
            last_error: None,
        }
    }

    fn authenticated(token: Token, user: User) -> Self {
        Self {
            user: Some(user),
            token: Some(token),
            status: SessionStatus::Authenticated,
            last_error: None,
        }
    }

    fn unauthenticated(last_error: Option<String>) -> Self {
        Self {
            user: None,
            token: None,
            status: SessionStatus::Unauthenticated,
            last_error,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }
}

/// The tagged result of an auth mutation. Never carries a panic or an `Err` across
/// the session boundary; the message is meant to be rendered as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success(T),
    Failure(String),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(message) => Some(message),
        }
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Outcome::Success(value) => Some(value),
            Outcome::Failure(_) => None,
        }
    }
}

//=========================================================================================
// SessionStore
//=========================================================================================

/// Owns the session for one client instance. Construct one per process (or per
/// test) with the gateway and credential store it should use.
pub struct SessionStore {
    gateway: Arc<dyn BackendGateway>,
    credentials: Arc<dyn CredentialStore>,
    state: watch::Sender<Session>,
}

impl SessionStore {
    pub fn new(gateway: Arc<dyn BackendGateway>, credentials: Arc<dyn CredentialStore>) -> Self {
        let (state, _) = watch::channel(Session::initializing());
        Self {
            gateway,
            credentials,
            state,
        }
    }

    // --- Reads ---

    /// A receiver that observes every transition, for surfaces that re-render on change.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn status(&self) -> SessionStatus {
        self.state.borrow().status
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    pub fn token(&self) -> Option<Token> {
        self.state.borrow().token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// True until the startup transition has finished.
    pub fn is_loading(&self) -> bool {
        self.status() == SessionStatus::Initializing
    }

    // --- Startup ---

    /// Restores the session from the credential store, revalidating the stored token.
    ///
    /// Any revalidation failure clears the store and ends signed out. Runs once:
    /// later calls, or a call after signin/signup already settled the session,
    /// only report the current status.
    pub async fn initialize(&self) -> SessionStatus {
        if !self.is_loading() {
            return self.status();
        }

        let Some((token, stored_user)) = self.credentials.get() else {
            info!("No stored credentials; starting signed out.");
            self.finish_initializing(Session::unauthenticated(None), |_| {});
            return self.status();
        };

        debug!(user_id = stored_user.id, "Revalidating stored session...");
        match self.gateway.get_current_user(&token).await {
            Ok(user) => {
                info!(user_id = user.id, "Stored session revalidated.");
                let next = Session::authenticated(token.clone(), user.clone());
                self.finish_initializing(next, |store| store.set(&token, &user));
            }
            Err(e) => {
                warn!("Token validation failed, clearing stored credentials: {}", e);
                let next = Session::unauthenticated(Some(e.to_string()));
                self.finish_initializing(next, |store| store.remove());
            }
        }
        self.status()
    }

    /// Applies the startup result unless another operation got there first.
    fn finish_initializing(&self, next: Session, persist: impl FnOnce(&dyn CredentialStore)) {
        let applied = self.state.send_if_modified(|session| {
            if session.status != SessionStatus::Initializing {
                return false;
            }
            persist(self.credentials.as_ref());
            *session = next;
            true
        });
        if !applied {
            debug!("Session settled during startup; discarding the startup result.");
        }
    }

    // --- Auth Mutations ---

    pub async fn signup(&self, request: &SignupRequest) -> Outcome<User> {
        info!("Signing up {}", request.email);
        let result = self.gateway.signup(request).await;
        self.complete_authentication("Signup", result)
    }

    pub async fn signin(&self, request: &SigninRequest) -> Outcome<User> {
        info!("Signing in {}", request.email);
        let result = self.gateway.signin(request).await;
        self.complete_authentication("Signin", result)
    }

    fn complete_authentication(
        &self,
        operation: &str,
        result: PortResult<AuthResponse>,
    ) -> Outcome<User> {
        match result {
            Ok(AuthResponse {
                access_token, user, ..
            }) => {
                self.state.send_modify(|session| {
                    self.credentials.set(&access_token, &user);
                    *session = Session::authenticated(access_token, user.clone());
                });
                info!(user_id = user.id, "{} succeeded; session authenticated.", operation);
                Outcome::Success(user)
            }
            Err(e) => self.record_failure(operation, e),
        }
    }

    /// Synchronous and unconditional.
    pub fn signout(&self) {
        self.state.send_modify(|session| {
            self.credentials.remove();
            *session = Session::unauthenticated(None);
        });
        info!("Signed out.");
    }

    /// Submits the questionnaire, then marks the user as having completed it.
    ///
    /// The flag is patched locally; the response body is not merged and the user
    /// is not re-fetched.
    pub async fn submit_questionnaire(&self, submission: &QuestionnaireSubmission) -> Outcome<()> {
        let Some(token) = self.token() else {
            return Outcome::Failure(PortError::NotAuthenticated.to_string());
        };

        if let Err(e) = self.gateway.submit_questionnaire(&token, submission).await {
            return self.record_failure("Questionnaire submission", e);
        }

        let patched = self.state.send_if_modified(|session| {
            match (&session.token, &mut session.user) {
                (Some(current), Some(user)) if *current == token => {
                    user.has_completed_questionnaire = true;
                    self.credentials.set(current, user);
                    session.last_error = None;
                    true
                }
                _ => false,
            }
        });
        if patched {
            info!("Questionnaire submitted.");
        } else {
            warn!("Session changed while the questionnaire was in flight; local patch skipped.");
        }
        Outcome::Success(())
    }

    fn record_failure<T>(&self, operation: &str, error: PortError) -> Outcome<T> {
        warn!("{} failed: {}", operation, error);
        let message = error.to_string();
        self.state.send_modify(|session| session.last_error = Some(message.clone()));
        Outcome::Failure(message)
    }

    // --- Reads that reject ---

    pub async fn get_dashboard(&self) -> PortResult<PersonalizedDashboard> {
        let token = self.token().ok_or(PortError::NotAuthenticated)?;
        self.gateway.get_dashboard(&token).await
    }

    /// Requires a completed questionnaire on top of a session.
    pub async fn personalize_chapter(&self, chapter_id: &str) -> PortResult<PersonalizedChapter> {
        let session = self.snapshot();
        let (Some(token), Some(user)) = (session.token, session.user) else {
            return Err(PortError::NotAuthenticated);
        };
        if !user.has_completed_questionnaire {
            return Err(PortError::QuestionnaireRequired);
        }
        self.gateway.personalize_chapter(&token, chapter_id).await
    }

    /// `language` may be a supported language's code or English name.
    pub async fn translate_chapter(
        &self,
        chapter_id: &str,
        language: &str,
    ) -> PortResult<TranslatedChapter> {
        let token = self.token().ok_or(PortError::NotAuthenticated)?;
        let language = find_language(language).ok_or_else(|| {
            PortError::Validation(format!("Unsupported language: '{}'", language.trim()))
        })?;
        self.gateway
            .translate_chapter(&token, chapter_id, language.code)
            .await
    }
}
