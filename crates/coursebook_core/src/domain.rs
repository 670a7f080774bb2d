//! crates/coursebook_core/src/domain.rs
//!
//! Defines the core data structures exchanged with the backend.
//! The backend's shapes are trusted: every field the client does not strictly
//! need is defaulted, and unknown user profile fields are carried along untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

//=========================================================================================
// Identity
//=========================================================================================

/// An opaque bearer credential. Never parsed or inspected by the client.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Tokens end up in log lines through `Debug`; keep them out.
impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(<redacted>)")
    }
}

/// Represents the signed-in user, exactly as the backend returned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub has_completed_questionnaire: bool,
    /// Every other profile field the backend sent (`is_active`, `created_at`, ...).
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl User {
    /// The label shown for a signed-in user: full name, falling back to email.
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.email,
        }
    }
}

/// The body returned by both signup and signin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: Token,
    #[serde(default)]
    pub token_type: Option<String>,
    pub user: User,
}

//=========================================================================================
// Personalization and Translation Payloads
//=========================================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalizedDashboard {
    pub welcome_message: String,
    pub recommended_chapters: Vec<Value>,
    pub learning_path: Vec<String>,
    pub skill_level_badge: String,
    pub quick_tips: Vec<String>,
    pub suggested_exercises: Vec<Value>,
}

/// A chapter rewritten for the user's profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalizedChapter {
    pub personalized_content: String,
    pub transformations_applied: Vec<Value>,
    pub user_profile_summary: Value,
    pub chapter_id: String,
    pub original_length: usize,
    pub personalized_length: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatedChapter {
    pub translated_content: String,
    pub source_language: String,
    pub target_language: String,
    pub chapter_id: String,
    pub original_length: usize,
    pub translated_length: usize,
}

/// A language the translation endpoint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
    pub native: &'static str,
}

pub const SUPPORTED_LANGUAGES: [Language; 7] = [
    Language { code: "urdu", name: "Urdu", native: "اردو" },
    Language { code: "arabic", name: "Arabic", native: "العربية" },
    Language { code: "spanish", name: "Spanish", native: "Español" },
    Language { code: "french", name: "French", native: "Français" },
    Language { code: "german", name: "German", native: "Deutsch" },
    Language { code: "hindi", name: "Hindi", native: "हिन्दी" },
    Language { code: "chinese", name: "Chinese", native: "中文" },
];

/// Looks up a supported language by code or English name, case-insensitively.
pub fn find_language(query: &str) -> Option<&'static Language> {
    let query = query.trim();
    SUPPORTED_LANGUAGES
        .iter()
        .find(|lang| lang.code.eq_ignore_ascii_case(query) || lang.name.eq_ignore_ascii_case(query))
}

//=========================================================================================
// Chat Payloads
//=========================================================================================

/// A document chunk the backend retrieved to ground its answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievedChunk {
    pub chunk_id: String,
    pub content: String,
    pub score: f64,
    pub metadata: Map<String, Value>,
}

impl RetrievedChunk {
    pub fn title(&self) -> &str {
        self.metadata
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or("Unknown")
    }

    /// Match score as a whole percentage.
    pub fn match_percent(&self) -> i64 {
        (self.score * 100.0).round() as i64
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatAnswer {
    pub answer: String,
    pub session_id: Option<String>,
    pub retrieved_chunks: Vec<RetrievedChunk>,
    pub model_used: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn backend_user() -> Value {
        json!({
            "id": 7,
            "email": "ada@example.com",
            "full_name": "Ada Lovelace",
            "username": null,
            "is_active": true,
            "is_verified": false,
            "created_at": "2024-03-01T10:00:00",
            "has_completed_questionnaire": false
        })
    }

    #[test]
    fn user_keeps_unknown_profile_fields() {
        let user: User = serde_json::from_value(backend_user()).unwrap();
        assert_eq!(user.profile.get("is_active"), Some(&json!(true)));
        assert_eq!(user.profile.get("created_at"), Some(&json!("2024-03-01T10:00:00")));

        let written = serde_json::to_string(&user).unwrap();
        let reread: User = serde_json::from_str(&written).unwrap();
        assert_eq!(reread, user);
    }

    #[test]
    fn minimal_user_defaults_questionnaire_flag() {
        let user: User =
            serde_json::from_value(json!({"id": 1, "email": "a@b.com"})).unwrap();
        assert!(!user.has_completed_questionnaire);
        assert_eq!(user.display_name(), "a@b.com");
    }

    #[test]
    fn token_debug_is_redacted() {
        let token = Token::new("secret-bearer");
        assert!(!format!("{:?}", token).contains("secret-bearer"));
        assert_eq!(token.as_str(), "secret-bearer");
    }

    #[test]
    fn languages_resolve_by_code_or_name() {
        assert_eq!(find_language("URDU").map(|l| l.native), Some("اردو"));
        assert_eq!(find_language("Spanish").map(|l| l.code), Some("spanish"));
        assert!(find_language("klingon").is_none());
    }

    #[test]
    fn chunk_title_falls_back_to_unknown() {
        let chunk = RetrievedChunk { score: 0.874, ..Default::default() };
        assert_eq!(chunk.title(), "Unknown");
        assert_eq!(chunk.match_percent(), 87);
    }
}
