//! Event delegation for the sidebar.
//!
//! Rendered controls carry `data-action` and, for per-item controls,
//! `data-id`. One listener at the list root turns those attributes into a
//! [`SidebarAction`] and hands it to the controller.

use crate::types::ConversationId;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DispatchError {
    #[error("unknown sidebar action: {0}")]
    UnknownAction(String),

    #[error("action '{0}' requires a data-id")]
    MissingId(&'static str),
}

#[derive(Clone, Debug, PartialEq)]
pub enum SidebarAction {
    Select(ConversationId),
    Rename(ConversationId),
    Delete(ConversationId),
    ToggleCollapse,
    Open,
    Close,
    NewChat,
    OpenSearch,
}

impl SidebarAction {
    /// Parse the `data-action` / `data-id` pair of a clicked element.
    pub fn from_data_attrs(action: &str, id: Option<&str>) -> Result<Self, DispatchError> {
        let id = id.map(str::trim).filter(|id| !id.is_empty());
        let require_id = |name: &'static str| {
            id.map(ConversationId::from)
                .ok_or(DispatchError::MissingId(name))
        };

        match action.trim() {
            "select" => Ok(Self::Select(require_id("select")?)),
            "rename" => Ok(Self::Rename(require_id("rename")?)),
            "delete" => Ok(Self::Delete(require_id("delete")?)),
            "toggle-collapse" => Ok(Self::ToggleCollapse),
            "open" => Ok(Self::Open),
            "close" => Ok(Self::Close),
            "new-chat" => Ok(Self::NewChat),
            "search" => Ok(Self::OpenSearch),
            other => Err(DispatchError::UnknownAction(other.to_string())),
        }
    }
}

/// A keydown as delivered by the host: the DOM `key` value plus modifiers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyPress {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
}

impl KeyPress {
    pub fn plain(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn command(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ctrl: true,
            meta: false,
        }
    }
}

/// Global shortcuts recognised by the sidebar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shortcut {
    NewChat,
    Search,
    Escape,
}

impl Shortcut {
    pub fn from_key(press: &KeyPress) -> Option<Self> {
        let command = press.ctrl || press.meta;
        match press.key.as_str() {
            "n" if command => Some(Self::NewChat),
            "k" if command => Some(Self::Search),
            "Escape" => Some(Self::Escape),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item_actions() {
        assert_eq!(
            SidebarAction::from_data_attrs("rename", Some("7")),
            Ok(SidebarAction::Rename(ConversationId::from("7")))
        );
        assert_eq!(
            SidebarAction::from_data_attrs("delete", Some(" ")),
            Err(DispatchError::MissingId("delete"))
        );
        assert_eq!(
            SidebarAction::from_data_attrs("toggle-collapse", None),
            Ok(SidebarAction::ToggleCollapse)
        );
        assert!(matches!(
            SidebarAction::from_data_attrs("explode", None),
            Err(DispatchError::UnknownAction(_))
        ));
    }

    #[test]
    fn test_shortcuts_need_modifier() {
        assert_eq!(
            Shortcut::from_key(&KeyPress::command("n")),
            Some(Shortcut::NewChat)
        );
        let meta_k = KeyPress {
            key: "k".into(),
            ctrl: false,
            meta: true,
        };
        assert_eq!(Shortcut::from_key(&meta_k), Some(Shortcut::Search));
        assert_eq!(Shortcut::from_key(&KeyPress::plain("n")), None);
        assert_eq!(
            Shortcut::from_key(&KeyPress::plain("Escape")),
            Some(Shortcut::Escape)
        );
    }
}
