use crate::backend::ConversationBackend;
use crate::config::{NewChatMode, SidebarConfig};
use crate::dispatch::{KeyPress, Shortcut, SidebarAction};
use crate::events::{EventBus, SidebarEvent};
use crate::layout::{SidebarLayout, is_mobile};
use crate::navigation::Navigator;
use crate::route;
use crate::search::{SearchEntry, SearchModal};
use crate::storage::{SIDEBAR_COLLAPSED_KEY, SIDEBAR_SCROLL_KEY, SessionStore};
use crate::types::{
    ConversationId, ConversationItem, DEFAULT_TITLE, JUST_NOW, NavSection, SessionHit,
    SidebarViewState,
};
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this conversation?";

/// Path the placeholder flow lands on when it has to leave the current page.
const CHAT_PATH: &str = "/chat/";

/// Pages where an unsaved placeholder chat is the one being shown.
fn is_chat_start(path: &str) -> bool {
    path == "/" || path == CHAT_PATH
}

/// External services the controller talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub backend: Arc<dyn ConversationBackend>,
    pub store: Arc<dyn SessionStore>,
    pub navigator: Arc<dyn Navigator>,
}

/// An in-progress inline rename.
#[derive(Clone, Debug, PartialEq)]
pub struct RenameDraft {
    pub id: ConversationId,
    pub draft: String,
}

/// Owns the conversation list and the sidebar frame around it. Every
/// mutation happens here; views render from the accessors.
pub struct ConversationListController {
    items: Vec<ConversationItem>,
    view: SidebarViewState,
    viewport_width: f64,
    route_path: String,
    active_section: Option<NavSection>,
    editing: Option<RenameDraft>,
    pending_delete: Option<ConversationId>,
    pending_scroll: Option<f64>,
    /// Newest placeholder chat; routes to the chat start page select it.
    placeholder: Option<ConversationId>,
    home_path: String,
    new_chat_mode: NewChatMode,
    backend: Arc<dyn ConversationBackend>,
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    events: EventBus,
    search: SearchModal,
}

impl ConversationListController {
    /// Build the controller for a freshly loaded page: derive the frame from
    /// the viewport and persisted flag, mark the routed conversation and
    /// consume any stored scroll offset.
    pub fn new(
        items: Vec<ConversationItem>,
        viewport_width: f64,
        deps: Collaborators,
        config: &SidebarConfig,
    ) -> Self {
        let collapsed = !is_mobile(viewport_width)
            && deps.store.get(SIDEBAR_COLLAPSED_KEY).as_deref() == Some("true");
        let route_path = deps.navigator.current_path();
        let search = SearchModal::new(Arc::clone(&deps.backend), config.search_debounce);

        let mut controller = Self {
            items,
            view: SidebarViewState {
                collapsed,
                open: false,
                scroll_offset: 0.0,
            },
            viewport_width,
            route_path: String::new(),
            active_section: None,
            editing: None,
            pending_delete: None,
            pending_scroll: None,
            placeholder: None,
            home_path: config.home_path.clone(),
            new_chat_mode: config.new_chat_mode,
            backend: deps.backend,
            store: deps.store,
            navigator: deps.navigator,
            events: EventBus::default(),
            search,
        };
        controller.set_active_from_route(&route_path);
        controller.restore_scroll_position();
        tracing::debug!(
            items = controller.items.len(),
            collapsed,
            viewport_width,
            "sidebar initialised"
        );
        controller
    }

    // ============================================
    // Accessors
    // ============================================

    pub fn items(&self) -> &[ConversationItem] {
        &self.items
    }

    pub fn item(&self, id: &ConversationId) -> Option<&ConversationItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn selected(&self) -> Option<&ConversationItem> {
        self.items.iter().find(|item| item.selected)
    }

    pub fn view(&self) -> SidebarViewState {
        self.view
    }

    pub fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    pub fn active_section(&self) -> Option<NavSection> {
        self.active_section
    }

    pub fn layout(&self) -> SidebarLayout {
        SidebarLayout::compute(
            &self.view,
            self.viewport_width,
            route::is_memory_route(&self.route_path),
        )
    }

    pub fn editing(&self) -> Option<&RenameDraft> {
        self.editing.as_ref()
    }

    /// Conversation awaiting delete confirmation, if any.
    pub fn pending_delete(&self) -> Option<&ConversationId> {
        self.pending_delete.as_ref()
    }

    pub fn search(&self) -> &SearchModal {
        &self.search
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SidebarEvent> {
        self.events.subscribe()
    }

    /// Replace the list, e.g. after fetching it from the server, keeping
    /// the routed selection.
    pub fn load_items(&mut self, items: Vec<ConversationItem>) {
        self.items = items;
        let path = self.route_path.clone();
        self.set_active_from_route(&path);
    }

    // ============================================
    // Route and selection
    // ============================================

    /// Highlight the nav entry and conversation named by `path`. Purely
    /// local and idempotent.
    pub fn set_active_from_route(&mut self, path: &str) {
        self.route_path = path.to_string();
        self.active_section = route::active_section(path);
        match route::conversation_from_path(path) {
            Some(id) => self.select(&id, false),
            None => {
                let placeholder = self
                    .placeholder
                    .clone()
                    .filter(|id| is_chat_start(path) && self.item(id).is_some());
                match placeholder {
                    Some(id) => self.select(&id, false),
                    None => self.items.iter_mut().for_each(|item| item.selected = false),
                }
            }
        }
    }

    pub fn select(&mut self, id: &ConversationId, close_on_mobile: bool) {
        for item in &mut self.items {
            item.selected = &item.id == id;
        }
        if close_on_mobile && is_mobile(self.viewport_width) {
            self.close_sidebar();
        }
    }

    // ============================================
    // Frame: collapse, overlay, viewport
    // ============================================

    pub fn toggle_collapse(&mut self) {
        self.view.collapsed = !self.view.collapsed;
        let value = if self.view.collapsed { "true" } else { "false" };
        if let Err(err) = self.store.set(SIDEBAR_COLLAPSED_KEY, value) {
            tracing::warn!(error = %err, "failed to persist sidebar collapse state");
        }
    }

    /// Show the mobile overlay. The sidebar always opens expanded; that is
    /// not written back to session storage.
    pub fn open_sidebar(&mut self) {
        self.view.open = true;
        self.view.collapsed = false;
    }

    pub fn close_sidebar(&mut self) {
        if is_mobile(self.viewport_width) {
            self.view.open = false;
        }
    }

    pub fn resize(&mut self, viewport_width: f64) {
        self.viewport_width = viewport_width;
        if !is_mobile(viewport_width) {
            self.view.open = false;
        }
    }

    // ============================================
    // Rename
    // ============================================

    /// Enter edit mode for `id` with the current title pre-filled. Returns
    /// false when no such conversation is listed.
    pub fn begin_rename(&mut self, id: &ConversationId) -> bool {
        let Some(item) = self.item(id) else {
            return false;
        };
        self.editing = Some(RenameDraft {
            id: id.clone(),
            draft: item.title.trim().to_string(),
        });
        true
    }

    pub fn update_rename_draft(&mut self, text: &str) {
        if let Some(editing) = &mut self.editing {
            editing.draft = text.to_string();
        }
    }

    /// Apply the draft locally and send it to the backend without waiting.
    /// A failed request is logged; the new title stays.
    pub fn commit_rename(&mut self) -> Option<JoinHandle<()>> {
        let RenameDraft { id, draft, .. } = self.editing.take()?;
        let title = normalize_title(&draft);
        let item = self.items.iter_mut().find(|item| item.id == id)?;
        item.title = title.clone();

        let backend = Arc::clone(&self.backend);
        Some(tokio::spawn(async move {
            match backend.rename(&id, &title).await {
                Ok(()) => tracing::debug!(%id, %title, "conversation renamed"),
                Err(err) => tracing::warn!(%id, error = %err, "rename request failed"),
            }
        }))
    }

    /// Focus left the rename input. Moving to the save control is not a
    /// commit; the save click that follows is.
    pub fn rename_focus_lost(&mut self, to_save_control: bool) -> Option<JoinHandle<()>> {
        if to_save_control {
            return None;
        }
        self.commit_rename()
    }

    pub fn cancel_rename(&mut self) {
        self.editing = None;
    }

    /// Rename in one step: edit, set the draft, commit.
    pub fn rename(&mut self, id: &ConversationId, proposed_title: &str) -> Option<JoinHandle<()>> {
        if !self.begin_rename(id) {
            return None;
        }
        self.update_rename_draft(proposed_title);
        self.commit_rename()
    }

    // ============================================
    // Delete
    // ============================================

    /// Ask for confirmation before deleting `id`. The view shows
    /// [`DELETE_PROMPT`] until `confirm_remove` or `cancel_remove`.
    pub fn remove(&mut self, id: &ConversationId) {
        self.pending_delete = Some(id.clone());
    }

    pub fn cancel_remove(&mut self) {
        self.pending_delete = None;
    }

    /// Drop the confirmed conversation from the list, then delete it on the
    /// backend. When the backend accepts and the deleted conversation is the
    /// one on screen, navigate home. A failure leaves the list as it is.
    pub fn confirm_remove(&mut self) -> Option<JoinHandle<()>> {
        let id = self.pending_delete.take()?;
        self.items.retain(|item| item.id != id);
        if self.editing.as_ref().is_some_and(|editing| editing.id == id) {
            self.editing = None;
        }
        if self.placeholder.as_ref() == Some(&id) {
            self.placeholder = None;
        }

        let backend = Arc::clone(&self.backend);
        let navigator = Arc::clone(&self.navigator);
        let home = self.home_path.clone();
        Some(tokio::spawn(async move {
            match backend.delete(&id).await {
                Ok(()) => {
                    tracing::info!(%id, "conversation deleted");
                    let viewing = route::conversation_from_path(&navigator.current_path());
                    if viewing.as_ref() == Some(&id) {
                        navigator.navigate(&home);
                    }
                }
                Err(err) => tracing::warn!(%id, error = %err, "delete request failed"),
            }
        }))
    }

    // ============================================
    // New chat and activity
    // ============================================

    /// Start a new chat. Returns the placeholder id when one was inserted.
    pub fn create_new(&mut self) -> Option<ConversationId> {
        match self.new_chat_mode {
            NewChatMode::Navigate => {
                self.events
                    .emit(SidebarEvent::NewChatCreated { chat_id: None });
                self.navigator.navigate(&self.home_path);
                None
            }
            NewChatMode::Placeholder => {
                let id = self.fresh_placeholder_id();
                self.items
                    .insert(0, ConversationItem::new(id.clone(), DEFAULT_TITLE, JUST_NOW));
                self.select(&id, false);
                self.placeholder = Some(id.clone());
                self.events.emit(SidebarEvent::NewChatCreated {
                    chat_id: Some(id.clone()),
                });

                if !is_chat_start(&self.navigator.current_path()) {
                    self.navigator.navigate(CHAT_PATH);
                }
                Some(id)
            }
        }
    }

    fn fresh_placeholder_id(&self) -> ConversationId {
        let mut millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
        loop {
            let candidate = ConversationId::new(millis.to_string());
            if self.item(&candidate).is_none() {
                return candidate;
            }
            millis += 1;
        }
    }

    /// A message was delivered to `id`: relabel it and move it to the top.
    pub fn record_activity(&mut self, id: &ConversationId) {
        let Some(index) = self.items.iter().position(|item| &item.id == id) else {
            return;
        };
        let mut item = self.items.remove(index);
        item.last_activity_label = JUST_NOW.to_string();
        self.items.insert(0, item);
    }

    // ============================================
    // Scroll persistence
    // ============================================

    pub fn set_scroll_offset(&mut self, offset: f64) {
        self.view.scroll_offset = offset;
    }

    /// Consume the stored scroll offset, if any. A numeric value becomes the
    /// list's offset and is returned for the renderer to apply on its next
    /// frame.
    pub fn restore_scroll_position(&mut self) -> Option<f64> {
        let stored = self
            .store
            .get(SIDEBAR_SCROLL_KEY)
            .filter(|raw| !raw.is_empty())?;
        if let Err(err) = self.store.remove(SIDEBAR_SCROLL_KEY) {
            tracing::warn!(error = %err, "failed to clear stored sidebar scroll");
        }

        let offset = stored.trim().parse::<f64>().ok().filter(|o| o.is_finite())?;
        self.view.scroll_offset = offset;
        self.pending_scroll = Some(offset);
        Some(offset)
    }

    /// Offset waiting to be applied by the renderer, taken at most once.
    pub fn take_pending_scroll(&mut self) -> Option<f64> {
        self.pending_scroll.take()
    }

    pub fn persist_scroll_on_navigate(&self) {
        let value = self.view.scroll_offset.to_string();
        if let Err(err) = self.store.set(SIDEBAR_SCROLL_KEY, &value) {
            tracing::warn!(error = %err, "failed to persist sidebar scroll");
        }
    }

    /// Follow a link inside the list, remembering where the list was.
    pub fn follow_link(&self, href: &str) {
        self.persist_scroll_on_navigate();
        self.navigator.navigate(href);
    }

    // ============================================
    // Event routing
    // ============================================

    /// Route a delegated click to the matching operation.
    pub fn dispatch(&mut self, action: SidebarAction) {
        tracing::trace!(?action, "sidebar action");
        match action {
            SidebarAction::Select(id) => {
                self.select(&id, true);
                self.follow_link(&route::conversation_path(&id));
            }
            SidebarAction::Rename(id) => {
                self.begin_rename(&id);
            }
            SidebarAction::Delete(id) => self.remove(&id),
            SidebarAction::ToggleCollapse => self.toggle_collapse(),
            SidebarAction::Open => self.open_sidebar(),
            SidebarAction::Close => self.close_sidebar(),
            SidebarAction::NewChat => {
                self.create_new();
            }
            SidebarAction::OpenSearch => self.search.open(),
        }
    }

    /// Handle a document-level keydown. Returns true when the key was
    /// consumed and the host should prevent its default action.
    ///
    /// Escape unwinds the innermost open surface first: rename edit, delete
    /// confirmation, search modal, then the mobile overlay.
    pub fn handle_key(&mut self, press: &KeyPress) -> bool {
        match Shortcut::from_key(press) {
            Some(Shortcut::NewChat) => {
                self.create_new();
                true
            }
            Some(Shortcut::Search) => {
                self.search.open();
                true
            }
            Some(Shortcut::Escape) => {
                if self.editing.is_some() {
                    self.cancel_rename();
                } else if self.pending_delete.is_some() {
                    self.cancel_remove();
                } else if self.search.is_open() {
                    self.search.close();
                } else if self.layout().overlay_visible {
                    self.close_sidebar();
                } else {
                    return false;
                }
                true
            }
            None => false,
        }
    }
}

/// List entry for a search hit whose url names a conversation.
pub fn item_from_hit(hit: SessionHit) -> Option<ConversationItem> {
    let id = route::conversation_from_path(&hit.url)?;
    let entry = SearchEntry::from(hit);
    Some(ConversationItem::new(id, entry.title, entry.date_label))
}

fn normalize_title(proposed: &str) -> String {
    let trimmed = proposed.trim();
    if trimmed.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_from_hit() {
        let hit = SessionHit {
            url: "/chat/c/12/".to_string(),
            title: None,
            updated_at: None,
        };
        let item = item_from_hit(hit).unwrap();
        assert_eq!(item.id, ConversationId::from("12"));
        assert_eq!(item.title, "Untitled");
        assert!(!item.selected);

        let elsewhere = SessionHit {
            url: "/chat/memory/".to_string(),
            title: Some("Memory".to_string()),
            updated_at: None,
        };
        assert!(item_from_hit(elsewhere).is_none());
    }

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title("  New  "), "New");
        assert_eq!(normalize_title("   "), DEFAULT_TITLE);
        assert_eq!(normalize_title(""), DEFAULT_TITLE);
    }
}
