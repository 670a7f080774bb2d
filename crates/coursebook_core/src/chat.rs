//! crates/coursebook_core/src/chat.rs
//!
//! The chat widget's logic, independent of how it is drawn.
//!
//! A widget lives as long as its surface. Its `ChatSession` is memory-only and
//! is gone when the widget is dropped.

use crate::domain::RetrievedChunk;
use crate::ports::BackendGateway;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};
use uuid::Uuid;

/// A selection must be strictly longer than this to be captured.
pub const MIN_SELECTION_CHARS: usize = 10;
const PREVIEW_CHARS: usize = 100;

pub const CHAT_ERROR_REPLY: &str = "Sorry, I encountered an error. Please try again.";

pub const DEMO_REPLY: &str = "Demo Mode Active\n\n\
The chatbot backend is not configured, so this is a demo reply. The chat \
interface is fully functional:\n\
  - conversational questions about the coursebook\n\
  - questions scoped to text selected on the page\n\
  - answers with the sources they were drawn from\n\n\
Configure a chat backend endpoint and restart to get real answers.";

const WELCOME_LIVE: [&str; 3] = [
    "Welcome! I'm your AI assistant for this coursebook.",
    "Ask me anything about Physical AI and Humanoid Robotics!",
    "Tip: Select any text on the page and ask me questions about it.",
];

const WELCOME_DEMO: [&str; 3] = [
    "Welcome! I'm your AI assistant for this coursebook.",
    "Demo Mode: the chat interface works, but no backend is configured.",
    "Try asking a question to see the demo response.",
];

//=========================================================================================
// Messages and Session
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Bot,
    System,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Chunks the answer was grounded on. Only bot replies carry any.
    pub sources: Vec<RetrievedChunk>,
}

impl ChatMessage {
    fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
            sources: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    session_id: String,
    messages: Vec<ChatMessage>,
    selected_text: Option<String>,
}

impl ChatSession {
    pub fn new() -> Self {
        let id = Uuid::new_v4().simple().to_string();
        Self {
            session_id: format!("session_{}", &id[..9]),
            messages: Vec::new(),
            selected_text: None,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn selected_text(&self) -> Option<&str> {
        self.selected_text.as_deref()
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================================
// Widget
//=========================================================================================

/// Where questions go. `Demo` is chosen when no chat endpoint is configured;
/// it is decided up front, never as a fallback from a failed request.
#[derive(Clone)]
pub enum ChatBackend {
    Live(Arc<dyn BackendGateway>),
    Demo { delay: Duration },
}

pub struct ChatWidget {
    backend: ChatBackend,
    session: ChatSession,
    is_open: bool,
}

impl ChatWidget {
    pub fn new(backend: ChatBackend) -> Self {
        Self {
            backend,
            session: ChatSession::new(),
            is_open: false,
        }
    }

    pub fn is_demo(&self) -> bool {
        matches!(self.backend, ChatBackend::Demo { .. })
    }

    pub fn welcome_lines(&self) -> &'static [&'static str] {
        if self.is_demo() {
            &WELCOME_DEMO
        } else {
            &WELCOME_LIVE
        }
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.session.messages()
    }

    pub fn selected_text(&self) -> Option<&str> {
        self.session.selected_text()
    }

    /// The banner text for the pending selection.
    pub fn selection_preview(&self) -> Option<String> {
        self.session.selected_text.as_deref().map(preview)
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn open(&mut self) {
        self.is_open = true;
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    pub fn toggle(&mut self) {
        self.is_open = !self.is_open;
    }

    /// Feeds a text selection made on the host page. Long enough selections are
    /// held for the next question and open the widget. Returns whether it was captured.
    pub fn on_selection(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.chars().count() <= MIN_SELECTION_CHARS {
            return false;
        }

        debug!(chars = text.chars().count(), "Captured page selection.");
        self.session.messages.push(ChatMessage::new(
            ChatRole::System,
            format!("Text selected: \"{}\"", preview(text)),
        ));
        self.session.selected_text = Some(text.to_string());
        self.is_open = true;
        true
    }

    /// Drops the pending selection along with the notices it produced.
    pub fn clear_selection(&mut self) {
        self.session.selected_text = None;
        self.session
            .messages
            .retain(|message| message.role != ChatRole::System);
    }

    /// Sends one question and returns the reply appended for it.
    ///
    /// Blank input is ignored. A pending selection is attached to this question
    /// only and is consumed whether or not the request succeeds.
    pub async fn send(&mut self, input: &str) -> Option<&ChatMessage> {
        let query = input.trim();
        if query.is_empty() {
            return None;
        }

        self.session
            .messages
            .push(ChatMessage::new(ChatRole::User, query));
        let selected_text = self.session.selected_text.take();

        let reply = match &self.backend {
            ChatBackend::Demo { delay } => {
                tokio::time::sleep(*delay).await;
                ChatMessage::new(ChatRole::Bot, DEMO_REPLY)
            }
            ChatBackend::Live(gateway) => {
                match gateway
                    .chat(query, &self.session.session_id, selected_text.as_deref())
                    .await
                {
                    Ok(answer) => ChatMessage {
                        sources: answer.retrieved_chunks,
                        ..ChatMessage::new(ChatRole::Bot, answer.answer)
                    },
                    Err(e) => {
                        error!("Error sending chat message: {}", e);
                        ChatMessage::new(ChatRole::Error, CHAT_ERROR_REPLY)
                    }
                }
            }
        };

        self.session.messages.push(reply);
        self.session.messages.last()
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        let head: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}
