//! Deliverable extraction from a project-manager response.
//!
//! The first numbered list after a `Deliverables:` or `Key Deliverables:`
//! label (bold or plain) is taken as the deliverable list. The list ends at
//! the next labelled section or at the end of the text.

use regex::Regex;
use std::sync::LazyLock;

static NUMBERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+[.)]\s+(.+)$").expect("valid regex"));

static SECTION_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9 /&()'-]{0,60}:\s*$").expect("valid regex"));

const LABELS: [&str; 2] = ["key deliverables:", "deliverables:"];

/// Strip markdown emphasis and heading markers
fn plain(line: &str) -> String {
    line.replace("**", "")
        .replace("__", "")
        .trim()
        .trim_start_matches('#')
        .trim()
        .to_string()
}

fn is_deliverables_label(line: &str) -> bool {
    let lower = plain(line).to_lowercase();
    LABELS.iter().any(|label| lower.starts_with(label))
}

fn is_section_boundary(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with('#') || SECTION_LABEL.is_match(&plain(line))
}

/// Extract the deliverable texts, in order. Empty if no labelled list exists.
pub fn parse_deliverables(response: &str) -> Vec<String> {
    let mut lines = response.lines();

    if !lines.by_ref().any(is_deliverables_label) {
        return Vec::new();
    }

    let mut items = Vec::new();
    for line in lines {
        if let Some(caps) = NUMBERED_ITEM.captures(line) {
            let item = plain(&caps[1]);
            if !item.is_empty() {
                items.push(item);
            }
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }
        if is_section_boundary(line) && !items.is_empty() {
            break;
        }
        // Sub-bullets, sub-labels and prose around items are ignored
    }

    items
}
