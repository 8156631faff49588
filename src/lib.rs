//! # Banking Assistant Bot
//!
//! A Telegram bot front-end for a retail-banking service. Incoming chat
//! events (text commands, button taps, contact sharing) are mapped to
//! banking API calls and rendered as localized, menu-driven responses.

pub mod bot;
pub mod gateway;
pub mod localization;
pub mod session;
