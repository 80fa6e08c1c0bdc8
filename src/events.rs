use crate::types::ConversationId;
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 16;

/// Client-side notifications broadcast by the sidebar.
#[derive(Clone, Debug, PartialEq)]
pub enum SidebarEvent {
    /// The user started a new chat; listeners reset their message lists.
    /// Carries the placeholder id when one was inserted.
    NewChatCreated { chat_id: Option<ConversationId> },
}

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<SidebarEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self { sender }
    }
}

impl EventBus {
    pub fn subscribe(&self) -> broadcast::Receiver<SidebarEvent> {
        self.sender.subscribe()
    }

    pub fn emit(&self, event: SidebarEvent) {
        // No subscribers is fine; nobody is listening yet.
        let _ = self.sender.send(event);
    }
}
