//! Whiteboard: code and markup blocks extracted from discussion text.
//!
//! Fenced blocks are extracted first and removed from the text, then raw
//! `<html>`, `<script>` and `<style>` regions are scanned in what remains,
//! so a fenced HTML snippet is not reported twice. Exact duplicates are
//! dropped, keeping first occurrence order.

use regex::Regex;
use std::sync::LazyLock;

static FENCED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```[^\n`]*\n(.*?)```").expect("valid regex"));

static MARKUP: [LazyLock<Regex>; 3] = [
    LazyLock::new(|| Regex::new(r"(?is)<html\b.*?</html>").expect("valid regex")),
    LazyLock::new(|| Regex::new(r"(?is)<script\b.*?</script>").expect("valid regex")),
    LazyLock::new(|| Regex::new(r"(?is)<style\b.*?</style>").expect("valid regex")),
];

/// Deduplicated code/markup blocks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Whiteboard {
    blocks: Vec<String>,
}

impl Whiteboard {
    pub fn from_text(text: &str) -> Self {
        Self {
            blocks: extract_code(text),
        }
    }

    pub fn blocks(&self) -> &[String] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Blocks joined with a blank line
    pub fn render(&self) -> String {
        self.blocks.join("\n\n")
    }
}

/// Extract code/markup blocks from `text`, deduplicated.
pub fn extract_code(text: &str) -> Vec<String> {
    let mut found: Vec<(usize, String)> = Vec::new();

    for caps in FENCED.captures_iter(text) {
        if let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) {
            found.push((whole.start(), body.as_str().trim_end().to_string()));
        }
    }

    // Blank fenced regions out (keeping offsets) before scanning raw markup
    let mut remainder = text.to_string();
    for m in FENCED.find_iter(text) {
        remainder.replace_range(m.range(), &" ".repeat(m.len()));
    }

    for pattern in MARKUP.iter() {
        let mut consumed = remainder.clone();
        for m in pattern.find_iter(&remainder) {
            found.push((m.start(), m.as_str().trim().to_string()));
            consumed.replace_range(m.range(), &" ".repeat(m.len()));
        }
        remainder = consumed;
    }

    found.sort_by_key(|(pos, _)| *pos);

    let mut blocks: Vec<String> = Vec::new();
    for (_, block) in found {
        if !block.trim().is_empty() && !blocks.contains(&block) {
            blocks.push(block);
        }
    }
    blocks
}
