use crate::controller::{ConversationListController, DELETE_PROMPT, RenameDraft};
use crate::dispatch::SidebarAction;
use crate::types::{ConversationItem, NavSection};
use dioxus::events::Key;
use dioxus::prelude::*;

const SCROLL_CONTAINER_ID: &str = "sidebar-scroll";

const NAV_ENTRIES: &[(NavSection, &str, &str)] = &[
    (NavSection::NewChat, "/home/", "New chat"),
    (NavSection::Memory, "/chat/memory/", "Memory"),
    (NavSection::Analytics, "/chat/analytics/", "Analytics"),
];

/// Read the list's scroll offset into the model, then run `action`.
fn with_scroll_synced(
    mut controller: Signal<ConversationListController>,
    action: impl FnOnce(&mut ConversationListController) + 'static,
) {
    spawn(async move {
        let script = format!("return document.getElementById('{SCROLL_CONTAINER_ID}')?.scrollTop ?? 0;");
        if let Ok(value) = document::eval(&script).await {
            if let Some(top) = value.as_f64() {
                controller.write().set_scroll_offset(top);
            }
        }
        action(&mut *controller.write());
    });
}

fn nav_class(active: Option<NavSection>, section: NavSection) -> &'static str {
    if active == Some(section) {
        "sidebar-nav-item is-active"
    } else {
        "sidebar-nav-item"
    }
}

#[component]
pub fn SidebarView(controller: Signal<ConversationListController>) -> Element {
    let mut controller = controller;
    let (layout, active, items, editing, pending_delete) = {
        let state = controller.read();
        (
            state.layout(),
            state.active_section(),
            state.items().to_vec(),
            state.editing().cloned(),
            state.pending_delete().cloned(),
        )
    };
    let view = controller.read().view();
    let sidebar_class = match (view.collapsed, view.open) {
        (true, _) => "collapsed",
        (false, true) => "sidebar-open",
        (false, false) => "",
    };
    let labels_hidden = if layout.labels_visible { "" } else { "hidden" };

    rsx! {
        aside { id: "sidebar", class: "{sidebar_class}",
            div { class: "sidebar-header",
                button {
                    id: "collapse-btn",
                    title: layout.collapse_title,
                    onclick: move |_| controller.write().dispatch(SidebarAction::ToggleCollapse),
                    if layout.labels_visible { "«" } else { "»" }
                }
                button {
                    id: "new-chat-container",
                    class: "{labels_hidden}",
                    onclick: move |_| controller.write().dispatch(SidebarAction::NewChat),
                    "New chat"
                }
                button {
                    class: "sidebar-search-btn",
                    title: "Search",
                    onclick: move |_| controller.write().dispatch(SidebarAction::OpenSearch),
                    "⌕"
                }
            }
            nav { class: "sidebar-nav",
                for (section, href, label) in NAV_ENTRIES.iter().copied() {
                    a {
                        key: "{section.key()}",
                        class: "{nav_class(active, section)}",
                        "data-nav": section.key(),
                        onclick: move |ev| {
                            ev.prevent_default();
                            with_scroll_synced(controller, move |c| c.follow_link(href));
                        },
                        span { class: "sidebar-menu-label {labels_hidden}", "{label}" }
                    }
                }
            }
            div {
                id: SCROLL_CONTAINER_ID,
                class: "sidebar-content",
                onmounted: move |_| {
                    if let Some(top) = controller.write().take_pending_scroll() {
                        spawn(async move {
                            let script = format!(
                                "requestAnimationFrame(() => {{ const el = document.getElementById('{SCROLL_CONTAINER_ID}'); if (el) el.scrollTop = {top}; }});"
                            );
                            let _ = document::eval(&script).await;
                        });
                    }
                },
                span { class: "sidebar-section-label {labels_hidden}", "Conversations" }
                div { id: "conversations-list",
                    for item in items {
                        ConversationRow {
                            key: "{item.id}",
                            editing: editing.clone().filter(|draft| draft.id == item.id),
                            item: item.clone(),
                            labels_visible: layout.labels_visible,
                            controller,
                        }
                    }
                }
            }
        }
        if pending_delete.is_some() {
            div { class: "confirm-backdrop",
                div { class: "confirm-dialog", role: "alertdialog",
                    p { "{DELETE_PROMPT}" }
                    button { onclick: move |_| controller.write().cancel_remove(), "Cancel" }
                    button {
                        class: "danger",
                        onclick: move |_| {
                            controller.write().confirm_remove();
                        },
                        "Delete"
                    }
                }
            }
        }
    }
}

#[component]
fn ConversationRow(
    item: ConversationItem,
    editing: Option<RenameDraft>,
    labels_visible: bool,
    controller: Signal<ConversationListController>,
) -> Element {
    let mut controller = controller;
    let mut pointer_on_save = use_signal(|| false);
    let hidden = if labels_visible { "" } else { "hidden" };

    if let Some(draft) = editing {
        return rsx! {
            div { class: "conversation-item", "data-id": "{item.id}",
                div { class: "conversation-content flex items-center gap-2",
                    input {
                        r#type: "text",
                        value: "{draft.draft}",
                        autofocus: true,
                        oninput: move |ev| controller.write().update_rename_draft(&ev.value()),
                        onkeydown: move |ev: KeyboardEvent| match ev.key() {
                            Key::Enter => {
                                controller.write().commit_rename();
                            }
                            Key::Escape => controller.write().cancel_rename(),
                            _ => {}
                        },
                        onfocusout: move |_| {
                            controller.write().rename_focus_lost(pointer_on_save());
                        },
                    }
                    button {
                        class: "rename-save",
                        onmouseenter: move |_| pointer_on_save.set(true),
                        onmouseleave: move |_| pointer_on_save.set(false),
                        onclick: move |_| {
                            controller.write().commit_rename();
                        },
                        "✓"
                    }
                }
            }
        };
    }

    let select_id = item.id.clone();
    let rename_id = item.id.clone();
    let delete_id = item.id.clone();
    let content_class = if item.selected {
        "conversation-content bg-black/5"
    } else {
        "conversation-content hover:bg-black/5"
    };

    rsx! {
        div {
            class: "conversation-item group relative {hidden}",
            "data-id": "{item.id}",
            "data-selected": "{item.selected}",
            div {
                class: "{content_class}",
                onclick: move |_| {
                    let id = select_id.clone();
                    with_scroll_synced(controller, move |c| c.dispatch(SidebarAction::Select(id)));
                },
                span { class: "conversation-title", "{item.title}" }
                span { class: "conversation-time", "{item.last_activity_label}" }
            }
            div { class: "conversation-actions {hidden}",
                button {
                    title: "Rename",
                    onclick: move |_| controller.write().dispatch(SidebarAction::Rename(rename_id.clone())),
                    "✎"
                }
                button {
                    title: "Delete",
                    onclick: move |_| controller.write().dispatch(SidebarAction::Delete(delete_id.clone())),
                    "🗑"
                }
            }
        }
    }
}
