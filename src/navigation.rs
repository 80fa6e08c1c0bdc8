use std::sync::Mutex;
use tokio::sync::watch;

/// URL-based navigation as seen by the sidebar.
pub trait Navigator: Send + Sync {
    /// Path of the page currently shown, e.g. `/chat/c/42/`.
    fn current_path(&self) -> String;
    fn navigate(&self, path: &str);
}

/// In-app history: a stack of visited paths whose top is published on a
/// watch channel so views can follow it.
pub struct History {
    entries: Mutex<Vec<String>>,
    current: watch::Sender<String>,
}

impl History {
    pub fn new(initial: impl Into<String>) -> Self {
        let initial = initial.into();
        let (current, _) = watch::channel(initial.clone());
        Self {
            entries: Mutex::new(vec![initial]),
            current,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.current.subscribe()
    }

    /// Paths visited so far, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }
}

impl Navigator for History {
    fn current_path(&self) -> String {
        self.current.borrow().clone()
    }

    fn navigate(&self, path: &str) {
        tracing::debug!(path, "navigate");
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(path.to_string());
        }
        self.current.send_replace(path.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigate_publishes_path() {
        let history = History::new("/home/");
        let rx = history.subscribe();
        history.navigate("/chat/c/3/");
        assert_eq!(history.current_path(), "/chat/c/3/");
        assert_eq!(*rx.borrow(), "/chat/c/3/");
        assert_eq!(
            history.entries(),
            vec!["/home/".to_string(), "/chat/c/3/".to_string()]
        );
    }
}
