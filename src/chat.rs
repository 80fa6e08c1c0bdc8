use crate::backend::{BackendResult, ConversationBackend, SendReply};
use crate::events::SidebarEvent;
use crate::types::{ChatMessage, ConversationId, Role};
use std::sync::Arc;

pub const GREETING: &str = "Hello! I'm Memoria. Ask me anything or create a new memory.";

#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    /// Blank input; nothing was sent.
    Ignored,
    /// The backend replied; its messages were appended. The caller should
    /// record activity for `session_id` on the sidebar.
    Delivered { session_id: Option<ConversationId> },
    /// The asynchronous path failed and the host should submit the form
    /// natively (full page load).
    NativeFallback,
}

/// A message on its way to the backend, detached from the pane so the pane
/// is not borrowed while the request runs.
pub struct PendingSubmit {
    backend: Arc<dyn ConversationBackend>,
    action: String,
    message: String,
}

impl PendingSubmit {
    pub fn message(&self) -> &str {
        &self.message
    }

    pub async fn send(self) -> BackendResult<SendReply> {
        self.backend.send_message(&self.action, &self.message).await
    }
}

/// Append-only message list bound to one conversation form.
pub struct ChatPane {
    messages: Vec<ChatMessage>,
    input: String,
    action: String,
    backend: Arc<dyn ConversationBackend>,
}

impl ChatPane {
    /// Pane posting to `action`, seeded with server-rendered messages.
    pub fn new(
        action: impl Into<String>,
        backend: Arc<dyn ConversationBackend>,
        messages: Vec<ChatMessage>,
    ) -> Self {
        Self {
            messages,
            input: String::new(),
            action: action.into(),
            backend,
        }
    }

    /// Empty pane showing only the greeting.
    pub fn with_greeting(action: impl Into<String>, backend: Arc<dyn ConversationBackend>) -> Self {
        Self::new(action, backend, vec![greeting()])
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// URL the conversation form posts to.
    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn set_action(&mut self, action: impl Into<String>) {
        self.action = action.into();
    }

    /// Take the trimmed input for sending, or `None` when it is blank.
    pub fn prepare_submit(&self) -> Option<PendingSubmit> {
        let message = self.input.trim();
        if message.is_empty() {
            return None;
        }
        Some(PendingSubmit {
            backend: Arc::clone(&self.backend),
            action: self.action.clone(),
            message: message.to_string(),
        })
    }

    pub fn apply_reply(&mut self, result: BackendResult<SendReply>) -> SubmitOutcome {
        match result {
            Ok(reply) => {
                self.messages.extend(reply.messages);
                self.input.clear();
                SubmitOutcome::Delivered {
                    session_id: reply.session_id,
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "message submit failed; falling back to form post");
                SubmitOutcome::NativeFallback
            }
        }
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        let Some(pending) = self.prepare_submit() else {
            return SubmitOutcome::Ignored;
        };
        let result = pending.send().await;
        self.apply_reply(result)
    }

    pub fn handle_event(&mut self, event: &SidebarEvent) {
        match event {
            SidebarEvent::NewChatCreated { .. } => {
                self.messages = vec![greeting()];
                self.input.clear();
            }
        }
    }
}

fn greeting() -> ChatMessage {
    ChatMessage {
        role: Role::Assistant,
        content: GREETING.to_string(),
    }
}
