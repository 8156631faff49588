//! Per-conversation session state.
//!
//! Each conversation owns one mutable [`Session`]. The store hands out a
//! dedicated async mutex per conversation id, so events for the same
//! conversation are processed one at a time while distinct conversations
//! stay independent.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::localization::LocaleTag;

/// The logical screen the user is viewing, derived from the last
/// recognized command. Recomputed on every dispatch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuContext {
    #[default]
    None,
    Accounts,
    Credits,
    Settings,
    Branches,
}

/// Mutable per-conversation state
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub locale: Option<LocaleTag>,
    pub phone_number: Option<String>,
    pub menu_context: MenuContext,
}

/// Authentication progress of a conversation, derived from the session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthState {
    NoLocale,
    LocaleNoPhone,
    LocaleWithPhone,
}

impl Session {
    pub fn auth_state(&self) -> AuthState {
        match (self.locale, &self.phone_number) {
            (None, _) => AuthState::NoLocale,
            (Some(_), None) => AuthState::LocaleNoPhone,
            (Some(_), Some(_)) => AuthState::LocaleWithPhone,
        }
    }
}

/// Normalize a shared phone number to a bare digit string
pub fn normalize_phone_number(raw: &str) -> String {
    raw.strip_prefix('+').unwrap_or(raw).to_string()
}

/// Store of per-conversation sessions, created lazily on first event
#[derive(Default)]
pub struct SessionStore {
    inner: Mutex<HashMap<i64, Arc<Mutex<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the session handle for a conversation, creating it lazily.
    ///
    /// Callers hold the returned lock for the whole dispatch so that
    /// concurrent events for one conversation never interleave.
    pub async fn session(&self, conversation_id: i64) -> Arc<Mutex<Session>> {
        let mut sessions = self.inner.lock().await;
        Arc::clone(sessions.entry(conversation_id).or_default())
    }
}
