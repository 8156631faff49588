//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules for better organization:
//! - `commands`: the menu command vocabulary and callback action ids
//! - `dispatcher`: the platform-free conversation dispatcher
//! - `message_handler`: adapts incoming text and contact messages
//! - `callback_handler`: adapts inline keyboard callback queries
//! - `ui_builder`: creates keyboard layouts

pub mod callback_handler;
pub mod commands;
pub mod dispatcher;
pub mod message_handler;
pub mod ui_builder;

use std::sync::Arc;

use crate::gateway::BankingGateway;
use crate::session::SessionStore;

// Re-export main handler functions for use in main.rs
pub use callback_handler::callback_handler;
pub use message_handler::message_handler;

/// Shared application state handed to every update handler
pub struct AppState {
    pub sessions: SessionStore,
    pub gateway: Arc<dyn BankingGateway>,
}
