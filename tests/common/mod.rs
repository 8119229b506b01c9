//! Common test utilities, fixtures, and mocks shared by the integration tests.
#![allow(dead_code)]

pub mod fixtures;
pub mod mocks;

use std::sync::Once;
use tracing::Level;

use dmz_bot::chat::Conversation;
use dmz_bot::chat::completion::CompletionClient;

static INIT: Once = Once::new();

/// Initialize tracing once per test binary.
pub fn init() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_test_writer()
            .init();
    });
}

/// A conversation talking to the mock completion endpoint at `base_url`.
pub fn conversation(base_url: &str) -> Conversation {
    Conversation::new(CompletionClient::new(
        reqwest::Client::new(),
        base_url,
        fixtures::API_KEY,
        fixtures::MODEL,
    ))
}
