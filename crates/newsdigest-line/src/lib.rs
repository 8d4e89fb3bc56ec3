//! LINE Messaging API push notifier.

pub mod client;
pub mod error;
pub mod message;

pub use client::LineClient;
pub use error::LineError;
pub use message::{digest_message, error_message, MAX_BUBBLES};
