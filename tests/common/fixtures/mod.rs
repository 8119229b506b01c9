//! Sample payloads and identifiers used in tests.

use serde_json::{Value, json};

pub const API_KEY: &str = "gsk_test_key";
pub const MODEL: &str = "llama3-70b-8192";

/// Sample user ID for testing
pub const SAMPLE_USER_ID: u64 = 123456789;

pub const SAMPLE_GUILD_ID: u64 = 555555555;

/// A successful `/chat/completions` response carrying `content`.
pub fn completion_body(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": MODEL,
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

/// An OpenAI-style error response.
pub fn error_body(message: &str) -> Value {
    json!({ "error": { "message": message, "type": "rate_limit_exceeded" } })
}
