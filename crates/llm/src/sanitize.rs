//! Response sanitization
//!
//! Reasoning models wrap their answer in `<think>` blocks and chat
//! frontends add markdown fences; both must go before JSON extraction.
//! Stage order matters: think blocks first (they may contain fences),
//! then fences, then line comments, then whitespace collapse.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

static THINK_BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(r"<think>.*?</think>\s*")
        .dot_matches_new_line(true)
        .case_insensitive(true)
        .build()
        .unwrap()
});

// Orphaned opening or closing tags left by truncated generations
static THINK_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(r"</?think[^>]*>\s*")
        .case_insensitive(true)
        .build()
        .unwrap()
});

static FENCE_OPEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```(?:json)?\s*").unwrap());

static LINE_COMMENT_RE: Lazy<Regex> =
    Lazy::new(|| RegexBuilder::new(r"//[^\n]*$").multi_line(true).build().unwrap());

static BLANK_LINES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Clean a raw model response down to its JSON payload surroundings
pub fn sanitize(response: &str) -> String {
    let cleaned = response.trim();
    let cleaned = THINK_BLOCK_RE.replace_all(cleaned, "");
    let cleaned = THINK_TAG_RE.replace_all(&cleaned, "");
    let cleaned = FENCE_OPEN_RE.replace_all(&cleaned, "");
    let cleaned = LINE_COMMENT_RE.replace_all(&cleaned, "");
    let cleaned = BLANK_LINES_RE.replace_all(&cleaned, "\n");
    cleaned.trim().to_string()
}
