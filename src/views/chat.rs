use crate::chat::{ChatPane, SubmitOutcome};
use crate::controller::ConversationListController;
use crate::types::Role;
use dioxus::events::Key;
use dioxus::prelude::*;

fn role_class(role: &Role) -> &'static str {
    match role {
        Role::User => "is-user",
        Role::Assistant => "is-agent",
    }
}

#[component]
pub fn ChatView(chat: Signal<ChatPane>, controller: Signal<ConversationListController>) -> Element {
    let mut chat = chat;
    let mut controller = controller;
    let mut sending = use_signal(|| false);

    let mut send_message = move || {
        if sending() {
            return;
        }
        let Some(pending) = chat.read().prepare_submit() else {
            return;
        };
        sending.set(true);
        spawn(async move {
            let result = pending.send().await;
            let outcome = chat.write().apply_reply(result);
            match outcome {
                SubmitOutcome::Delivered {
                    session_id: Some(id),
                } => controller.write().record_activity(&id),
                SubmitOutcome::NativeFallback => {
                    // No native form to fall back to in the shell; reload the
                    // conversation so the server-side state is shown.
                    let action = chat.read().action().to_string();
                    controller.read().follow_link(&action);
                }
                _ => {}
            }
            sending.set(false);
        });
    };

    let (messages, input) = {
        let pane = chat.read();
        (pane.messages().to_vec(), pane.input().to_string())
    };

    rsx! {
        div { class: "conversation-messages",
            for (i, msg) in messages.iter().enumerate() {
                div { key: "{i}", class: "message-row {role_class(&msg.role)}",
                    div { class: "message-bubble", "{msg.content}" }
                }
            }
        }
        form { class: "conversation-input",
            onsubmit: move |ev| {
                ev.prevent_default();
                send_message();
            },
            textarea {
                name: "message",
                rows: "1",
                placeholder: "Type your message...",
                value: "{input}",
                disabled: sending(),
                oninput: move |ev| chat.write().set_input(ev.value()),
                onkeydown: move |ev: KeyboardEvent| {
                    if ev.key() == Key::Enter && !ev.modifiers().shift() {
                        ev.prevent_default();
                        send_message();
                    }
                },
            }
            button { r#type: "submit", disabled: sending() || input.trim().is_empty(), "Send" }
        }
    }
}
