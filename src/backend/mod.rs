/// Backend module for the Memoria sidebar
///
/// The controller, search modal and chat pane talk to the server only through
/// [`ConversationBackend`], so they can run against the real HTTP endpoints or
/// an in-process fake.
///
/// # Architecture
///
/// - `client` - `HttpBackend`, the `reqwest` implementation of the endpoints
///
/// # Usage
///
/// ```rust,no_run
/// use memoria_sidebar::backend::{ConversationBackend, HttpBackend};
/// use memoria_sidebar::csrf::CsrfSources;
///
/// # async fn example() -> Result<(), memoria_sidebar::backend::BackendError> {
/// let backend = HttpBackend::new("http://127.0.0.1:8000", CsrfSources::default());
/// let hits = backend.search_sessions("holiday").await?;
/// # Ok(())
/// # }
/// ```
mod client;

use crate::types::{ChatMessage, ConversationId, SessionHit};
use async_trait::async_trait;
use serde::Deserialize;

pub use client::HttpBackend;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned status {status}")]
    Status { status: u16 },

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Successful reply to an asynchronous message submit.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SendReply {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub session_id: Option<ConversationId>,
}

/// Server endpoints the sidebar layer depends on.
#[async_trait]
pub trait ConversationBackend: Send + Sync {
    /// `POST /chat/c/{id}/rename/` with form field `title`.
    async fn rename(&self, id: &ConversationId, title: &str) -> BackendResult<()>;

    /// `POST /chat/c/{id}/delete/`.
    async fn delete(&self, id: &ConversationId) -> BackendResult<()>;

    /// `GET /chat/api/sessions/?q=..`. Absent or empty results come back as
    /// an empty vector.
    async fn search_sessions(&self, query: &str) -> BackendResult<Vec<SessionHit>>;

    /// Submit a message to the conversation form's action URL.
    async fn send_message(&self, action: &str, message: &str) -> BackendResult<SendReply>;
}
