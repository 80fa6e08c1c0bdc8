//! Route parsing for the sidebar: which nav entry is active and which
//! conversation the current page shows.

use crate::types::{ConversationId, NavSection};

const CONVERSATION_PREFIX: &str = "/chat/c/";

pub fn active_section(path: &str) -> Option<NavSection> {
    if path == "/home/" || path == "/home" {
        Some(NavSection::NewChat)
    } else if is_memory_route(path) {
        Some(NavSection::Memory)
    } else if path.starts_with("/chat/analytics") {
        Some(NavSection::Analytics)
    } else {
        None
    }
}

/// Memory pages keep the icon rail visible when the sidebar is collapsed.
pub fn is_memory_route(path: &str) -> bool {
    path.starts_with("/chat/memory") || path.starts_with("/chat/m/")
}

/// First `/chat/c/{digits}/` occurrence anywhere in the path.
pub fn conversation_from_path(path: &str) -> Option<ConversationId> {
    path.match_indices(CONVERSATION_PREFIX).find_map(|(start, _)| {
        let rest = &path[start + CONVERSATION_PREFIX.len()..];
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits > 0 && rest[digits..].starts_with('/') {
            Some(ConversationId::new(&rest[..digits]))
        } else {
            None
        }
    })
}

pub fn conversation_path(id: &ConversationId) -> String {
    format!("{CONVERSATION_PREFIX}{id}/")
}

pub fn rename_path(id: &ConversationId) -> String {
    format!("{CONVERSATION_PREFIX}{id}/rename/")
}

pub fn delete_path(id: &ConversationId) -> String {
    format!("{CONVERSATION_PREFIX}{id}/delete/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_section() {
        assert_eq!(active_section("/home/"), Some(NavSection::NewChat));
        assert_eq!(active_section("/home"), Some(NavSection::NewChat));
        assert_eq!(active_section("/chat/memory/"), Some(NavSection::Memory));
        assert_eq!(active_section("/chat/m/3/"), Some(NavSection::Memory));
        assert_eq!(
            active_section("/chat/analytics/"),
            Some(NavSection::Analytics)
        );
        assert_eq!(active_section("/chat/c/4/"), None);
        assert_eq!(active_section("/homepage"), None);
    }

    #[test]
    fn test_conversation_from_path() {
        assert_eq!(
            conversation_from_path("/chat/c/42/"),
            Some(ConversationId::from("42"))
        );
        assert_eq!(
            conversation_from_path("/prefix/chat/c/7/rename/"),
            Some(ConversationId::from("7"))
        );
        assert_eq!(conversation_from_path("/chat/c/42"), None);
        assert_eq!(conversation_from_path("/chat/c/abc/"), None);
        assert_eq!(
            conversation_from_path("/chat/c/x/chat/c/9/"),
            Some(ConversationId::from("9"))
        );
    }

    #[test]
    fn test_endpoint_paths() {
        let id = ConversationId::from("12");
        assert_eq!(conversation_path(&id), "/chat/c/12/");
        assert_eq!(rename_path(&id), "/chat/c/12/rename/");
        assert_eq!(delete_path(&id), "/chat/c/12/delete/");
    }
}
