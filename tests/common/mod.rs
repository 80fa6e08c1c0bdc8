//! Shared fakes for the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use memoria_sidebar::backend::{BackendError, BackendResult, ConversationBackend, SendReply};
use memoria_sidebar::config::SidebarConfig;
use memoria_sidebar::navigation::{History, Navigator};
use memoria_sidebar::storage::MemorySessionStore;
use memoria_sidebar::types::{ConversationId, ConversationItem, SessionHit};
use memoria_sidebar::{Collaborators, ConversationListController};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Rename { id: String, title: String },
    Delete { id: String },
    Search { query: String },
    Send { action: String, message: String },
}

/// Backend that records every call and answers from canned responses.
#[derive(Default)]
pub struct FakeBackend {
    calls: Mutex<Vec<Call>>,
    rename_failure: Mutex<Option<u16>>,
    delete_failure: Mutex<Option<u16>>,
    search_hits: Mutex<HashMap<String, Vec<SessionHit>>>,
    search_delays: Mutex<HashMap<String, Duration>>,
    search_failures: Mutex<Vec<String>>,
    reply: Mutex<Option<SendReply>>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fail_renames(&self, status: u16) {
        *self.rename_failure.lock().unwrap() = Some(status);
    }

    pub fn fail_deletes(&self, status: u16) {
        *self.delete_failure.lock().unwrap() = Some(status);
    }

    pub fn with_hits(&self, query: &str, hits: Vec<SessionHit>) {
        self.search_hits
            .lock()
            .unwrap()
            .insert(query.to_string(), hits);
    }

    pub fn with_search_delay(&self, query: &str, delay: Duration) {
        self.search_delays
            .lock()
            .unwrap()
            .insert(query.to_string(), delay);
    }

    pub fn fail_search(&self, query: &str) {
        self.search_failures.lock().unwrap().push(query.to_string());
    }

    pub fn with_reply(&self, reply: SendReply) {
        *self.reply.lock().unwrap() = Some(reply);
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ConversationBackend for FakeBackend {
    async fn rename(&self, id: &ConversationId, title: &str) -> BackendResult<()> {
        self.record(Call::Rename {
            id: id.to_string(),
            title: title.to_string(),
        });
        match *self.rename_failure.lock().unwrap() {
            Some(status) => Err(BackendError::Status { status }),
            None => Ok(()),
        }
    }

    async fn delete(&self, id: &ConversationId) -> BackendResult<()> {
        self.record(Call::Delete { id: id.to_string() });
        match *self.delete_failure.lock().unwrap() {
            Some(status) => Err(BackendError::Status { status }),
            None => Ok(()),
        }
    }

    async fn search_sessions(&self, query: &str) -> BackendResult<Vec<SessionHit>> {
        self.record(Call::Search {
            query: query.to_string(),
        });
        let delay = self.search_delays.lock().unwrap().get(query).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.search_failures.lock().unwrap().iter().any(|q| q == query) {
            return Err(BackendError::Status { status: 500 });
        }
        Ok(self
            .search_hits
            .lock()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_default())
    }

    async fn send_message(&self, action: &str, message: &str) -> BackendResult<SendReply> {
        self.record(Call::Send {
            action: action.to_string(),
            message: message.to_string(),
        });
        self.reply
            .lock()
            .unwrap()
            .clone()
            .ok_or(BackendError::Status { status: 500 })
    }
}

pub fn hit(url: &str, title: &str) -> SessionHit {
    SessionHit {
        url: url.to_string(),
        title: Some(title.to_string()),
        updated_at: Some("2024-05-01T12:00:00Z".to_string()),
    }
}

pub fn sample_items() -> Vec<ConversationItem> {
    vec![
        ConversationItem::new("42", "Trip planning", "2 hours ago"),
        ConversationItem::new("7", "Old", "Yesterday"),
        ConversationItem::new("3", "Recipes", "Last week"),
    ]
}

/// Controller wired to fakes, with handles on every collaborator.
pub struct Harness {
    pub controller: ConversationListController,
    pub backend: Arc<FakeBackend>,
    pub store: MemorySessionStore,
    pub history: Arc<History>,
}

pub struct HarnessBuilder {
    path: String,
    width: f64,
    items: Vec<ConversationItem>,
    store: MemorySessionStore,
    config: SidebarConfig,
    backend: Arc<FakeBackend>,
}

impl HarnessBuilder {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            width: 1280.0,
            items: sample_items(),
            store: MemorySessionStore::new(),
            config: SidebarConfig::default(),
            backend: FakeBackend::new(),
        }
    }

    pub fn width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn store(mut self, store: MemorySessionStore) -> Self {
        self.store = store;
        self
    }

    pub fn config(mut self, config: SidebarConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Harness {
        let history = Arc::new(History::new(self.path));
        let navigator: Arc<dyn Navigator> = history.clone();
        let backend: Arc<dyn ConversationBackend> = self.backend.clone();
        let controller = ConversationListController::new(
            self.items,
            self.width,
            Collaborators {
                backend,
                store: Arc::new(self.store.clone()),
                navigator,
            },
            &self.config,
        );
        Harness {
            controller,
            backend: self.backend,
            store: self.store,
            history,
        }
    }
}

pub fn harness(path: &str) -> Harness {
    HarnessBuilder::new(path).build()
}

pub fn selected_ids(controller: &ConversationListController) -> Vec<String> {
    controller
        .items()
        .iter()
        .filter(|item| item.selected)
        .map(|item| item.id.to_string())
        .collect()
}
