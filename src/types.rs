use serde::{Deserialize, Serialize};
use std::fmt;

/// Title applied when a rename is committed with nothing but whitespace.
pub const DEFAULT_TITLE: &str = "New Chat";

/// Activity label shown on items touched in this session.
pub const JUST_NOW: &str = "Just now";

/// Opaque conversation identifier. Server ids are numeric but placeholder
/// items carry client-generated ids, so the id is kept as text.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ConversationId(String);

// The backend sends primary keys as JSON numbers; accept either form.
impl<'de> Deserialize<'de> for ConversationId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(u64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => Self(n.to_string()),
            RawId::Text(s) => Self(s),
        })
    }
}

impl ConversationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConversationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ConversationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for ConversationId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConversationItem {
    pub id: ConversationId,
    pub title: String,
    pub last_activity_label: String,
    pub selected: bool,
}

impl ConversationItem {
    pub fn new(
        id: impl Into<ConversationId>,
        title: impl Into<String>,
        last_activity_label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            last_activity_label: last_activity_label.into(),
            selected: false,
        }
    }
}

/// Sidebar visibility as the renderer sees it. Only `collapsed` and
/// `scroll_offset` outlive a full navigation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SidebarViewState {
    pub collapsed: bool,
    pub open: bool,
    pub scroll_offset: f64,
}

/// Top-level navigation entries highlighted from the route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavSection {
    NewChat,
    Memory,
    Analytics,
}

impl NavSection {
    /// Value of the `data-nav` attribute for this section.
    pub fn key(self) -> &'static str {
        match self {
            NavSection::NewChat => "new-chat",
            NavSection::Memory => "memory",
            NavSection::Analytics => "analytics",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// One row of the session search endpoint.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SessionHit {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversation_id_accepts_number_or_text() {
        let numeric: ConversationId = serde_json::from_str("42").unwrap();
        let text: ConversationId = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(numeric, text);
        assert_eq!(serde_json::to_string(&numeric).unwrap(), "\"42\"");
    }

    #[test]
    fn test_session_hit_optional_fields() {
        let hit: SessionHit = serde_json::from_str(r#"{"url": "/chat/c/3/"}"#).unwrap();
        assert_eq!(hit.url, "/chat/c/3/");
        assert!(hit.title.is_none());
        assert!(hit.updated_at.is_none());
    }
}
