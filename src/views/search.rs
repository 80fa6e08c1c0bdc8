use crate::controller::ConversationListController;
use crate::search::{SearchResults, SearchView};
use dioxus::prelude::*;

#[component]
pub fn SearchModalView(
    controller: Signal<ConversationListController>,
    search: Signal<SearchView>,
    left: &'static str,
) -> Element {
    let view = search();
    if !view.visible {
        return rsx! {};
    }

    rsx! {
        div {
            id: "search-modal",
            class: "search-modal",
            onclick: move |_| controller.read().search().close(),
            div {
                id: "search-modal-panel",
                class: "search-modal-panel",
                style: "left: {left};",
                onclick: move |ev| ev.stop_propagation(),
                input {
                    id: "search-modal-input",
                    r#type: "search",
                    placeholder: "Search conversations",
                    autofocus: true,
                    value: "{view.query}",
                    oninput: move |ev| {
                        controller.read().search().input(&ev.value());
                    },
                }
                match view.results {
                    SearchResults::Idle => rsx! {},
                    SearchResults::Empty => rsx! {
                        p { id: "search-modal-empty", "No conversations found" }
                    },
                    SearchResults::Matches(entries) => rsx! {
                        div { id: "search-modal-results",
                            for entry in entries {
                                a {
                                    key: "{entry.url}",
                                    class: "search-hit",
                                    href: "{entry.url}",
                                    onclick: {
                                        let url = entry.url.clone();
                                        move |ev: MouseEvent| {
                                            ev.prevent_default();
                                            let state = controller.read();
                                            state.search().close();
                                            state.follow_link(&url);
                                        }
                                    },
                                    span { class: "search-hit-title", "{entry.title}" }
                                    span { class: "search-hit-date", "{entry.date_label}" }
                                }
                            }
                        }
                    },
                }
            }
        }
    }
}
