use crate::backend::{ConversationBackend, HttpBackend};
use crate::chat::ChatPane;
use crate::config::SidebarConfig;
use crate::controller::{Collaborators, ConversationListController, item_from_hit};
use crate::csrf::CsrfSources;
use crate::dispatch::{KeyPress, SidebarAction};
use crate::navigation::{History, Navigator};
use crate::search::SearchView;
use crate::storage::{SessionStore, open_session_store};
use crate::views::{ChatView, SearchModalView, SidebarView};
use dioxus::prelude::*;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

/// Assumed width until the first resize event reports the real one.
const INITIAL_VIEWPORT_WIDTH: f64 = 1280.0;

const SHELL_CSS: &str = r#"
.app-shell { position: relative; height: 100vh; overflow: hidden; }
#sidebar { position: fixed; top: 0; bottom: 0; left: 0; width: 20vw; overflow: hidden; }
#sidebar.collapsed { width: 80px; }
#sidebar-overlay { position: fixed; inset: 0; background: rgba(0, 0, 0, 0.3); }
#main-content { position: absolute; top: 0; right: 0; bottom: 0; }
.hidden { display: none; }
.is-active { font-weight: 600; }
"#;

/// Everything the shell wires into the controller, built once per launch.
#[derive(Clone)]
struct Shell {
    config: SidebarConfig,
    backend: Arc<dyn ConversationBackend>,
    store: Arc<dyn SessionStore>,
    history: Arc<History>,
}

impl Shell {
    fn from_env() -> Self {
        let config = SidebarConfig::from_env().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "invalid configuration; using defaults");
            SidebarConfig::default()
        });
        let csrf = CsrfSources {
            cookie_header: config.session_cookie.clone(),
            meta_token: config.csrf_token.clone(),
            form_field: None,
        };
        let backend: Arc<dyn ConversationBackend> =
            Arc::new(HttpBackend::new(config.base_url.clone(), csrf));
        let store = open_session_store(&config.base_url);
        let history = Arc::new(History::new(config.home_path.clone()));
        Self {
            config,
            backend,
            store,
            history,
        }
    }

    fn controller(&self) -> ConversationListController {
        let navigator: Arc<dyn Navigator> = self.history.clone();
        ConversationListController::new(
            Vec::new(),
            INITIAL_VIEWPORT_WIDTH,
            Collaborators {
                backend: Arc::clone(&self.backend),
                store: Arc::clone(&self.store),
                navigator,
            },
            &self.config,
        )
    }
}

#[component]
pub fn App() -> Element {
    let shell = use_hook(Shell::from_env);
    let mut controller = use_signal({
        let shell = shell.clone();
        move || shell.controller()
    });
    let chat = use_signal({
        let shell = shell.clone();
        move || ChatPane::with_greeting(shell.history.current_path(), Arc::clone(&shell.backend))
    });
    let search_view = use_signal(SearchView::default);

    use_hook(|| {
        follow_history(&shell, controller, chat);
        follow_search(controller, search_view);
        follow_events(controller, chat);
        load_conversations(&shell, controller);
    });

    let layout = controller.read().layout();

    rsx! {
        style { dangerous_inner_html: "{SHELL_CSS}" }
        div {
            class: "app-shell",
            tabindex: "0",
            onresize: move |ev: Event<ResizeData>| {
                if let Ok(size) = ev.get_border_box_size() {
                    controller.write().resize(size.width);
                }
            },
            onkeydown: move |ev: KeyboardEvent| {
                let press = KeyPress {
                    key: ev.key().to_string(),
                    ctrl: ev.modifiers().ctrl(),
                    meta: ev.modifiers().meta(),
                };
                if controller.write().handle_key(&press) {
                    ev.prevent_default();
                }
            },
            if layout.overlay_visible {
                div {
                    id: "sidebar-overlay",
                    onclick: move |_| controller.write().dispatch(SidebarAction::Close),
                }
            }
            SidebarView { controller }
            div {
                id: "main-content",
                style: "left: {layout.main_offset.css()};",
                if layout.menu_visible {
                    button {
                        class: "mobile-menu-btn",
                        title: "Open sidebar",
                        onclick: move |_| controller.write().dispatch(SidebarAction::Open),
                        "☰"
                    }
                }
                ChatView { chat, controller }
            }
            SearchModalView { controller, search: search_view, left: layout.search_modal_left }
        }
    }
}

fn follow_history(
    shell: &Shell,
    mut controller: Signal<ConversationListController>,
    mut chat: Signal<ChatPane>,
) {
    let mut paths = shell.history.subscribe();
    spawn(async move {
        while paths.changed().await.is_ok() {
            let path = paths.borrow_and_update().clone();
            controller.write().set_active_from_route(&path);
            chat.write().set_action(path);
        }
    });
}

fn follow_search(
    controller: Signal<ConversationListController>,
    mut search_view: Signal<SearchView>,
) {
    let mut updates = controller.read().search().subscribe();
    spawn(async move {
        while updates.changed().await.is_ok() {
            let view = updates.borrow_and_update().clone();
            search_view.set(view);
        }
    });
}

fn follow_events(controller: Signal<ConversationListController>, mut chat: Signal<ChatPane>) {
    let mut events = controller.read().subscribe();
    spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => chat.write().handle_event(&event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "sidebar event listener lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}

fn load_conversations(shell: &Shell, mut controller: Signal<ConversationListController>) {
    let backend = Arc::clone(&shell.backend);
    spawn(async move {
        match backend.search_sessions("").await {
            Ok(hits) => {
                let items = hits.into_iter().filter_map(item_from_hit).collect();
                controller.write().load_items(items);
            }
            Err(err) => tracing::warn!(error = %err, "failed to load conversations"),
        }
    });
}
