//! Slash commands of the interactive session

use teamforge_domain::{AgentKey, Roster};

/// One parsed REPL command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Let the moderator pick the next speaker
    Next,
    /// Run turns until done, stuck, interrupted or out of turns
    Run,
    /// Address an agent directly; the argument is "<agent> <prompt>"
    Say(String),
    /// "<agent>: <new name>"
    Rename(String),
    /// "<agent>: <tool>, <tool>"
    Tools(String),
    Remove(String),
    History,
    Whiteboard,
    Deliverables,
    Team,
    /// Re-run a rate-limited turn with a smaller token budget
    Retry,
    Export,
    Reset,
    Help,
    Quit,
    Unknown(String),
}

impl ReplCommand {
    /// Parse a line; `None` when the line is not a command
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let rest = line.strip_prefix('/')?;
        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        Some(match name.to_ascii_lowercase().as_str() {
            "next" | "n" => ReplCommand::Next,
            "run" => ReplCommand::Run,
            "say" => ReplCommand::Say(arg.to_string()),
            "rename" => ReplCommand::Rename(arg.to_string()),
            "tools" => ReplCommand::Tools(arg.to_string()),
            "remove" => ReplCommand::Remove(arg.to_string()),
            "history" => ReplCommand::History,
            "whiteboard" | "wb" => ReplCommand::Whiteboard,
            "deliverables" | "d" => ReplCommand::Deliverables,
            "team" => ReplCommand::Team,
            "retry" => ReplCommand::Retry,
            "export" => ReplCommand::Export,
            "reset" => ReplCommand::Reset,
            "help" | "h" | "?" => ReplCommand::Help,
            "quit" | "exit" | "q" => ReplCommand::Quit,
            _ => ReplCommand::Unknown(line.to_string()),
        })
    }
}

/// Tool names from a comma separated list
pub fn parse_tool_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|tool| !tool.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split "<agent> <prompt>" against the roster.
///
/// Agent names may contain spaces, so the longest name (or key) that
/// prefixes the argument wins. A `:` after the name is allowed.
pub fn resolve_say(roster: &Roster, arg: &str) -> Option<(AgentKey, String)> {
    let lower = arg.to_lowercase();
    let mut candidates: Vec<(String, &AgentKey)> = roster
        .iter()
        .flat_map(|agent| {
            [
                (agent.name().to_lowercase(), agent.key()),
                (agent.key().as_str().to_string(), agent.key()),
            ]
        })
        .collect();
    candidates.sort_by_key(|(label, _)| std::cmp::Reverse(label.len()));

    candidates.into_iter().find_map(|(label, key)| {
        let rest = lower.strip_prefix(&label)?;
        if !(rest.is_empty() || rest.starts_with(char::is_whitespace) || rest.starts_with(':')) {
            return None;
        }
        let prompt = arg
            .get(label.len()..)?
            .trim_start_matches(|c: char| c == ':' || c.is_whitespace())
            .trim_end()
            .to_string();
        Some((key.clone(), prompt))
    })
}

pub const HELP: &str = "\
Commands:
  <text>                 Start a project (no team yet) or talk to the last speaker
  /next                  Let the moderator pick the next speaker
  /run                   Run turns until done (Ctrl-C stops)
  /say <agent> <prompt>  Give an agent a direct instruction
  /history               Show the full discussion
  /whiteboard            Show the code collected so far
  /deliverables          Show the deliverable checklist
  /team                  Show the team
  /rename <agent>: <new name>
  /tools <agent>: <tool>, <tool>
  /remove <agent>        Edit the team
  /retry                 Re-run a rate-limited turn with a smaller budget
  /export                Write the agent, skill and workflow bundles
  /reset                 Forget the team and start over
  /quit                  Exit";

#[cfg(test)]
mod tests {
    use super::*;
    use teamforge_domain::{AgentDefaults, AgentDescriptor, AgentRecordBuilder};

    fn roster() -> Roster {
        let builder = AgentRecordBuilder::new(AgentDefaults::default());
        let mut roster = Roster::new();
        for name in ["QA", "QA Engineer", "Backend Developer"] {
            roster
                .add(builder.build_agent(&AgentDescriptor::new(name, "helps")).unwrap())
                .unwrap();
        }
        roster
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(ReplCommand::parse("/next"), Some(ReplCommand::Next));
        assert_eq!(ReplCommand::parse("  /QUIT "), Some(ReplCommand::Quit));
        assert_eq!(
            ReplCommand::parse("/say QA Engineer write tests"),
            Some(ReplCommand::Say("QA Engineer write tests".to_string()))
        );
        assert_eq!(
            ReplCommand::parse("/dance"),
            Some(ReplCommand::Unknown("/dance".to_string()))
        );
        assert_eq!(ReplCommand::parse("build a login API"), None);
    }

    #[test]
    fn test_parse_team_edits() {
        assert_eq!(
            ReplCommand::parse("/rename QA: Tester"),
            Some(ReplCommand::Rename("QA: Tester".to_string()))
        );
        assert_eq!(
            ReplCommand::parse("/remove qa"),
            Some(ReplCommand::Remove("qa".to_string()))
        );
        assert_eq!(parse_tool_list(" fetch_url, ,run_tests "), vec!["fetch_url", "run_tests"]);
    }

    #[test]
    fn test_resolve_say_prefers_longest_name() {
        let roster = roster();
        let (key, prompt) = resolve_say(&roster, "QA Engineer write the login tests").unwrap();
        assert_eq!(key.as_str(), "qa_engineer");
        assert_eq!(prompt, "write the login tests");

        let (key, prompt) = resolve_say(&roster, "qa: smoke test it").unwrap();
        assert_eq!(key.as_str(), "qa");
        assert_eq!(prompt, "smoke test it");
    }

    #[test]
    fn test_resolve_say_accepts_key_and_empty_prompt() {
        let roster = roster();
        let (key, prompt) = resolve_say(&roster, "backend_developer").unwrap();
        assert_eq!(key.as_str(), "backend_developer");
        assert!(prompt.is_empty());
    }

    #[test]
    fn test_resolve_say_requires_word_boundary() {
        let roster = roster();
        assert!(resolve_say(&roster, "QAX do something").is_none());
        assert!(resolve_say(&roster, "Designer draw").is_none());
    }
}
