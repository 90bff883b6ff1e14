//! Agent descriptor parsing from LLM responses.
//!
//! The team-generation LLM is asked for a JSON array of experts but tends to
//! wrap it in prose, fence it in markdown, or stop mid-object. Parsing is
//! therefore two-staged:
//!
//! 1. Slice from the first `[` to the last `]` and parse once as an array.
//! 2. If that fails, scan for balanced `{...}` objects and parse each one
//!    independently, keeping the ones that parse.
//!
//! Pure domain logic: diagnostics are returned, never logged or raised.

use super::value_objects::AgentDescriptor;
use serde_json::Value;

/// Result of parsing one LLM response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedAgents {
    /// Descriptors that passed validation, in response order
    pub descriptors: Vec<AgentDescriptor>,
    /// Human-readable notes about dropped elements
    pub diagnostics: Vec<String>,
}

impl ParsedAgents {
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

/// Parse agent descriptors out of free-form LLM text.
///
/// Never fails: malformed input degrades to an empty result.
pub fn parse_agent_descriptors(response: &str) -> ParsedAgents {
    let cleaned = strip_code_fences(response);
    let mut parsed = ParsedAgents::default();

    let candidates = match parse_array(&cleaned) {
        Some(values) => values,
        None => {
            let objects = scan_balanced_objects(&cleaned);
            if !objects.is_empty() {
                parsed.diagnostics.push(format!(
                    "JSON array did not parse; recovered {} object(s) individually",
                    objects.len()
                ));
            }
            objects
        }
    };

    for (index, value) in candidates.iter().enumerate() {
        match descriptor_from_value(value) {
            Some(descriptor) => parsed.descriptors.push(descriptor),
            None => parsed
                .diagnostics
                .push(format!("Dropped element {}: missing expert_name", index + 1)),
        }
    }

    parsed
}

/// Remove markdown fence lines (` ``` ` / ` ```json `), keeping their contents.
fn strip_code_fences(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn parse_array(text: &str) -> Option<Vec<Value>> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end <= start {
        return None;
    }
    serde_json::from_str::<Vec<Value>>(&text[start..=end]).ok()
}

/// Extract every top-level balanced `{...}` region and parse it on its own.
///
/// String literals are tracked so braces inside values do not affect depth.
/// Regions that fail to parse, and a trailing unbalanced region, are skipped.
fn scan_balanced_objects(text: &str) -> Vec<Value> {
    let mut objects = Vec::new();
    let mut depth = 0usize;
    let mut start = None;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, c) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = Some(idx);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0
                    && let Some(s) = start.take()
                    && let Ok(value) = serde_json::from_str::<Value>(&text[s..=idx])
                    && value.is_object()
                {
                    objects.push(value);
                }
            }
            _ => {}
        }
    }

    objects
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn string_list(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Validate one JSON object. `None` when `expert_name` is missing or blank.
pub fn descriptor_from_value(value: &Value) -> Option<AgentDescriptor> {
    let expert_name = string_field(value, "expert_name")?;
    Some(AgentDescriptor {
        expert_name,
        description: string_field(value, "description").unwrap_or_default(),
        role: string_field(value, "role"),
        goal: string_field(value, "goal"),
        backstory: string_field(value, "backstory"),
        skills: string_list(value, "skills"),
        tools: string_list(value, "tools"),
    })
}
