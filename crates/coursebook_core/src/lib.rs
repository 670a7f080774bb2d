pub mod chat;
pub mod credentials;
pub mod domain;
pub mod forms;
pub mod navigation;
pub mod ports;
pub mod session;

#[cfg(test)]
mod test_support;

pub use chat::{ChatBackend, ChatMessage, ChatRole, ChatSession, ChatWidget};
pub use credentials::{MemoryCredentialStore, NoopCredentialStore};
pub use domain::{
    AuthResponse, ChatAnswer, Language, PersonalizedChapter, PersonalizedDashboard,
    RetrievedChunk, Token, TranslatedChapter, User, SUPPORTED_LANGUAGES,
};
pub use forms::{QuestionnaireSubmission, SigninRequest, SignupRequest};
pub use navigation::Route;
pub use ports::{BackendGateway, CredentialStore, PortError, PortResult};
pub use session::{Outcome, Session, SessionStatus, SessionStore};
