use crate::backend::ConversationBackend;
use crate::types::SessionHit;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use time::format_description::FormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};
use tokio::sync::watch;
use tokio::task::JoinHandle;

const UNTITLED: &str = "Untitled";

const HIT_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[month padding:none]/[day padding:none]/[year]");

#[derive(Clone, Debug, PartialEq)]
pub struct SearchEntry {
    pub url: String,
    pub title: String,
    pub date_label: String,
}

impl From<SessionHit> for SearchEntry {
    fn from(hit: SessionHit) -> Self {
        let title = hit
            .title
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| UNTITLED.to_string());
        let date_label = hit
            .updated_at
            .as_deref()
            .and_then(format_hit_date)
            .unwrap_or_default();
        Self {
            url: hit.url,
            title,
            date_label,
        }
    }
}

fn format_hit_date(raw: &str) -> Option<String> {
    let mut datetime = OffsetDateTime::parse(raw, &Rfc3339).ok()?;
    if let Ok(offset) = UtcOffset::current_local_offset() {
        datetime = datetime.to_offset(offset);
    }
    datetime.format(HIT_DATE_FORMAT).ok()
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum SearchResults {
    /// Nothing typed yet; neither results nor the empty notice show.
    #[default]
    Idle,
    Empty,
    Matches(Vec<SearchEntry>),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchView {
    pub visible: bool,
    pub query: String,
    pub results: SearchResults,
}

#[derive(Default)]
struct SearchState {
    view: SearchView,
    /// Sequence number handed to the most recently dispatched request.
    next_seq: u64,
    /// Highest sequence number whose response has been applied or that was
    /// invalidated by clearing the query.
    last_applied: u64,
    /// Bumped on open/close so timers and responses from a previous session
    /// of the modal are ignored.
    generation: u64,
    /// Bumped whenever the pending timer is cancelled; a timer that woke
    /// before its abort landed sees a newer value and stands down.
    schedule: u64,
    pending: Option<JoinHandle<()>>,
}

impl SearchState {
    fn cancel_pending(&mut self) {
        self.schedule += 1;
        if let Some(timer) = self.pending.take() {
            timer.abort();
        }
    }

    fn invalidate_in_flight(&mut self) {
        self.last_applied = self.next_seq;
    }
}

/// Session search with a debounced query and stale-response suppression
pub struct SearchModal {
    backend: Arc<dyn ConversationBackend>,
    debounce: Duration,
    state: Arc<Mutex<SearchState>>,
    updates: Arc<watch::Sender<SearchView>>,
}

impl SearchModal {
    pub fn new(backend: Arc<dyn ConversationBackend>, debounce: Duration) -> Self {
        let (updates, _) = watch::channel(SearchView::default());
        Self {
            backend,
            debounce,
            state: Arc::default(),
            updates: Arc::new(updates),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchView> {
        self.updates.subscribe()
    }

    pub fn view(&self) -> SearchView {
        lock(&self.state).view.clone()
    }

    pub fn is_open(&self) -> bool {
        lock(&self.state).view.visible
    }

    pub fn open(&self) {
        self.reset(true);
    }

    pub fn close(&self) {
        self.reset(false);
    }

    fn reset(&self, visible: bool) {
        let mut state = lock(&self.state);
        state.cancel_pending();
        state.invalidate_in_flight();
        state.generation += 1;
        state.view = SearchView {
            visible,
            ..SearchView::default()
        };
        self.updates.send_replace(state.view.clone());
    }

    /// Handle a change of the query text. Returns whether a search was
    /// scheduled.
    pub fn input(&self, text: &str) -> bool {
        let query = text.trim().to_string();
        let mut state = lock(&self.state);
        state.cancel_pending();
        state.view.query = text.to_string();

        if query.is_empty() {
            state.invalidate_in_flight();
            state.view.results = SearchResults::Idle;
            self.updates.send_replace(state.view.clone());
            return false;
        }

        let timer = tokio::spawn(debounced_search(
            Arc::clone(&self.backend),
            Arc::clone(&self.state),
            Arc::clone(&self.updates),
            self.debounce,
            state.generation,
            state.schedule,
            query,
        ));
        state.pending = Some(timer);
        true
    }
}

fn lock(state: &Mutex<SearchState>) -> MutexGuard<'_, SearchState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn debounced_search(
    backend: Arc<dyn ConversationBackend>,
    state: Arc<Mutex<SearchState>>,
    updates: Arc<watch::Sender<SearchView>>,
    debounce: Duration,
    generation: u64,
    schedule: u64,
    query: String,
) {
    tokio::time::sleep(debounce).await;

    let seq = {
        let mut state = lock(&state);
        if state.generation != generation || state.schedule != schedule {
            return;
        }
        state.pending = None;
        state.next_seq += 1;
        state.next_seq
    };

    // The request runs in its own task so a later keystroke, which aborts
    // this timer, never cancels a request that is already in flight.
    tokio::spawn(async move {
        tracing::debug!(%query, seq, "session search dispatched");
        let outcome = backend.search_sessions(&query).await;

        let mut state = lock(&state);
        if state.generation != generation || seq <= state.last_applied {
            tracing::debug!(%query, seq, "discarding stale search response");
            return;
        }
        state.last_applied = seq;
        state.view.results = match outcome {
            Ok(hits) if hits.is_empty() => SearchResults::Empty,
            Ok(hits) => SearchResults::Matches(hits.into_iter().map(SearchEntry::from).collect()),
            Err(err) => {
                tracing::warn!(%query, error = %err, "session search failed");
                SearchResults::Empty
            }
        };
        updates.send_replace(state.view.clone());
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, BackendResult, SendReply};
    use crate::types::ConversationId;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingBackend {
        searches: AtomicUsize,
    }

    #[async_trait]
    impl ConversationBackend for CountingBackend {
        async fn rename(&self, _id: &ConversationId, _title: &str) -> BackendResult<()> {
            Ok(())
        }

        async fn delete(&self, _id: &ConversationId) -> BackendResult<()> {
            Ok(())
        }

        async fn search_sessions(&self, _query: &str) -> BackendResult<Vec<SessionHit>> {
            self.searches.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }

        async fn send_message(&self, _action: &str, _message: &str) -> BackendResult<SendReply> {
            Err(BackendError::Status { status: 500 })
        }
    }

    async fn fire_timer(modal: &SearchModal, schedule: u64) {
        let generation = lock(&modal.state).generation;
        debounced_search(
            Arc::clone(&modal.backend),
            Arc::clone(&modal.state),
            Arc::clone(&modal.updates),
            Duration::ZERO,
            generation,
            schedule,
            "foo".to_string(),
        )
        .await;
    }

    #[tokio::test]
    async fn test_superseded_timer_does_not_dispatch() {
        let modal = SearchModal::new(Arc::new(CountingBackend::default()), Duration::ZERO);
        modal.open();

        // Timer woke, then a keystroke cancelled it before it took the lock.
        let stale = lock(&modal.state).schedule;
        lock(&modal.state).cancel_pending();
        fire_timer(&modal, stale).await;
        assert_eq!(lock(&modal.state).next_seq, 0);

        let current = lock(&modal.state).schedule;
        fire_timer(&modal, current).await;
        assert_eq!(lock(&modal.state).next_seq, 1);
    }
}
