//! Google News RSS search as a [`newsdigest_core::FeedSource`].

pub mod client;
pub mod error;
pub(crate) mod rss;

pub use client::GoogleNewsClient;
pub use error::FeedError;
