use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Bundled config for mobile builds (iOS/Android)
const BUNDLED_CONFIG: &str = include_str!("../assets/config.env");

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_HOME_PATH: &str = "/home/";
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(250);

/// What the new-chat action does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NewChatMode {
    /// Navigate to the composer; the server creates the session on first send.
    #[default]
    Navigate,
    /// Insert a local "New Chat" item at the top and select it.
    Placeholder,
}

impl NewChatMode {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "navigate" => Some(Self::Navigate),
            "placeholder" => Some(Self::Placeholder),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SidebarConfig {
    pub base_url: String,
    pub home_path: String,
    pub search_debounce: Duration,
    pub new_chat_mode: NewChatMode,
    pub csrf_token: Option<String>,
    pub session_cookie: Option<String>,
}

impl Default for SidebarConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            home_path: DEFAULT_HOME_PATH.to_string(),
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            new_chat_mode: NewChatMode::default(),
            csrf_token: None,
            session_cookie: None,
        }
    }
}

impl SidebarConfig {
    /// Read `MEMORIA_*` variables, keeping defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup("MEMORIA_BASE_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(home) = lookup("MEMORIA_HOME_PATH") {
            config.home_path = home;
        }
        if let Some(raw) = lookup("MEMORIA_SEARCH_DEBOUNCE_MS") {
            let millis: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("MEMORIA_SEARCH_DEBOUNCE_MS is not a number: {raw}"))?;
            config.search_debounce = Duration::from_millis(millis);
        }
        if let Some(raw) = lookup("MEMORIA_NEW_CHAT_MODE") {
            config.new_chat_mode = NewChatMode::parse(&raw).ok_or_else(|| {
                anyhow::anyhow!(
                    "MEMORIA_NEW_CHAT_MODE must be 'navigate' or 'placeholder', got '{raw}'"
                )
            })?;
        }
        config.csrf_token = lookup("MEMORIA_CSRF_TOKEN").filter(|t| !t.is_empty());
        config.session_cookie = lookup("MEMORIA_SESSION_COOKIE").filter(|c| !c.is_empty());

        Ok(config)
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load_dotenv() {
    // First try to load from .env file (desktop dev)
    if dotenvy::dotenv().is_ok() {
        return;
    }

    // Fall back to bundled config (mobile builds)
    load_bundled_config();
}

#[cfg(target_arch = "wasm32")]
pub fn load_dotenv() {
    load_bundled_config();
}

fn load_bundled_config() {
    for (key, value) in parse_env_lines(BUNDLED_CONFIG) {
        // Only set if not already set (allow env override)
        if env::var(key).is_err() {
            // SAFETY: called from main before any threads are spawned
            unsafe {
                env::set_var(key, value);
            }
        }
    }
}

fn parse_env_lines(source: &str) -> impl Iterator<Item = (&str, &str)> {
    source.lines().filter_map(|line| {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        let (key, value) = line.split_once('=')?;
        Some((key.trim(), value.trim()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = SidebarConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, SidebarConfig::default());
        assert_eq!(config.search_debounce, Duration::from_millis(250));
    }

    #[test]
    fn test_overrides() {
        let config = SidebarConfig::from_lookup(lookup_from(&[
            ("MEMORIA_BASE_URL", "https://memoria.example/"),
            ("MEMORIA_SEARCH_DEBOUNCE_MS", "400"),
            ("MEMORIA_NEW_CHAT_MODE", "Placeholder"),
            ("MEMORIA_CSRF_TOKEN", ""),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "https://memoria.example");
        assert_eq!(config.search_debounce, Duration::from_millis(400));
        assert_eq!(config.new_chat_mode, NewChatMode::Placeholder);
        assert_eq!(config.csrf_token, None);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(
            SidebarConfig::from_lookup(lookup_from(&[("MEMORIA_SEARCH_DEBOUNCE_MS", "soon")]))
                .is_err()
        );
        assert!(
            SidebarConfig::from_lookup(lookup_from(&[("MEMORIA_NEW_CHAT_MODE", "modal")])).is_err()
        );
    }

    #[test]
    fn test_parse_env_lines_skips_comments() {
        let parsed: Vec<_> = parse_env_lines("# comment\n\nA = 1\nB=two\nbroken\n").collect();
        assert_eq!(parsed, vec![("A", "1"), ("B", "two")]);
    }
}
