//! Detects "play this song" requests embedded in a chat question.

use regex::Regex;
use std::sync::LazyLock;

/// Phrases that mark a question as a song request.
const TRIGGERS: [&str; 2] = ["노래를 틀어줘", "노래 듣고 싶어"];

/// `"Title"` anywhere in the question, straight or curly quotes.
static QUOTED_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["“](.+?)["”]"#).unwrap());

/// `노래 듣고 싶어: Title` / `노래 듣고 싶어요 Title`
static TITLE_AFTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"노래(?:를)? 듣고 싶어(?:요)?(?:\s*:\s*|\s+)(\S.*)").unwrap()
});

/// Extracts the requested song title, if the question asks for one.
pub fn song_request(question: &str) -> Option<String> {
    if !TRIGGERS.iter().any(|t| question.contains(t)) {
        return None;
    }

    [&*QUOTED_TITLE, &*TITLE_AFTER]
        .into_iter()
        .find_map(|re| re.captures(question))
        .and_then(|caps| caps.get(1))
        .map(|m| clean_title(m.as_str()))
        .filter(|title| !title.is_empty())
}

fn clean_title(raw: &str) -> String {
    raw.trim()
        .trim_end_matches(['.', '!', '?', '~'])
        .trim()
        .to_string()
}
