pub mod chat;
pub mod search;
pub mod sidebar;

pub use chat::ChatView;
pub use search::SearchModalView;
pub use sidebar::SidebarView;
