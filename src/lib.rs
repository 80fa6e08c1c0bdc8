//! Memoria sidebar - conversation list state for the Memoria chat client
//!
//! The [`controller::ConversationListController`] owns the conversation list
//! and sidebar frame; backend, session storage and navigation sit behind
//! traits so the controller runs the same in the Dioxus shell and in tests.

pub mod backend;
pub mod chat;
pub mod config;
pub mod controller;
pub mod csrf;
pub mod dispatch;
pub mod events;
pub mod layout;
pub mod navigation;
pub mod route;
pub mod search;
pub mod storage;
pub mod types;

#[cfg(feature = "ui")]
pub mod ui;
#[cfg(feature = "ui")]
pub mod views;

pub use controller::{Collaborators, ConversationListController};
