//! Folds a roster into a [`WorkflowDocument`].
//!
//! The agent at roster index 0 is the coordinator. Its system message gains
//! an instruction to integrate the others' work and finish with
//! [`TERMINATE`].

use super::document::{
    CodeExecutionConfig, GroupChatConfig, ManagerInner, ProxyInner, ReceiverConfig, SenderConfig,
    WorkflowDocument,
};
use crate::agent::builder::{GRAPH_CACHE_SEED, GRAPH_TIMEOUT_SECS, graph_config};
use crate::agent::records::{GraphAgentConfig, GraphLlmConfig, GraphModelEntry};
use crate::agent::roster::Roster;
use crate::core::error::DomainError;
use crate::core::sanitize::{file_stem as stem_of, sanitize};

/// Sentinel the coordinator emits when the conversation is finished
pub const TERMINATE: &str = "TERMINATE";

/// Group chat rounds in the exported workflow
pub const MAX_ROUND: u32 = 10;

const SENDER_NAME: &str = "userproxy";
const MANAGER_NAME: &str = "group_chat_manager";

/// Assemble the workflow document for `roster`.
///
/// Fails on an empty roster: the receiver needs a coordinator.
pub fn assemble(
    roster: &Roster,
    name: &str,
    description: &str,
) -> Result<WorkflowDocument, DomainError> {
    let coordinator = roster.coordinator().ok_or(DomainError::EmptyRoster)?;

    let agents: Vec<GraphAgentConfig> = roster
        .iter()
        .enumerate()
        .map(|(index, agent)| {
            let mut config = graph_config(agent);
            if index == 0 {
                config.config.system_message = coordinator_message(
                    &config.config.system_message,
                    roster.iter().skip(1).map(|a| a.name()),
                );
            }
            config
        })
        .collect();

    let manager_llm = GraphLlmConfig {
        config_list: vec![GraphModelEntry {
            model: coordinator.model().to_string(),
            api_type: coordinator.provider().to_string(),
        }],
        temperature: coordinator.config().temperature,
        max_tokens: coordinator.config().max_tokens,
        top_p: coordinator.config().top_p,
        timeout: GRAPH_TIMEOUT_SECS,
        cache_seed: Some(GRAPH_CACHE_SEED),
    };

    let name = sanitize(name).trim().to_string();
    Ok(WorkflowDocument {
        name: if name.is_empty() { "Workflow".to_string() } else { name },
        description: sanitize(description).trim().to_string(),
        sender: SenderConfig {
            kind: "userproxy".to_string(),
            config: ProxyInner {
                name: SENDER_NAME.to_string(),
                human_input_mode: "NEVER".to_string(),
                max_consecutive_auto_reply: 5,
                system_message: String::new(),
                llm_config: false,
                code_execution_config: CodeExecutionConfig {
                    work_dir: None,
                    use_docker: false,
                },
            },
        },
        receiver: ReceiverConfig {
            kind: "groupchat".to_string(),
            config: ManagerInner {
                name: MANAGER_NAME.to_string(),
                llm_config: manager_llm,
                human_input_mode: "NEVER".to_string(),
                system_message: "Group chat manager".to_string(),
            },
            groupchat_config: GroupChatConfig {
                agents,
                admin_name: "Admin".to_string(),
                messages: Vec::new(),
                max_round: MAX_ROUND,
                speaker_selection_method: "auto".to_string(),
                allow_repeat_speaker: true,
            },
            description: "Group Chat Manager".to_string(),
        },
        kind: "groupchat".to_string(),
        user_id: "user".to_string(),
        summary_method: "last".to_string(),
    })
}

/// File stem for a workflow document (`workflows/<stem>.json`)
pub fn file_stem(document: &WorkflowDocument) -> String {
    let stem = stem_of(&document.name);
    if stem.is_empty() {
        "workflow".to_string()
    } else {
        stem
    }
}

fn coordinator_message<'a>(base: &str, others: impl Iterator<Item = &'a str>) -> String {
    let others: Vec<&str> = others.collect();
    let team = if others.is_empty() {
        "the other agents".to_string()
    } else {
        others.join(", ")
    };
    format!(
        "{base} You are the coordinator of this team. Integrate the contributions of {team} \
         into one coherent result. When you are satisfied with the final result, reply with \
         {TERMINATE}."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::entities::Agent;
    use crate::providers::{LlmParams, ProviderKind};

    fn roster(names: &[&str]) -> Roster {
        let mut roster = Roster::new();
        for name in names {
            roster
                .add(Agent::new(
                    *name,
                    "does things",
                    *name,
                    "g",
                    "b",
                    vec!["fetch_web_content".to_string()],
                    ProviderKind::Groq,
                    "llama-3.3-70b-versatile",
                    LlmParams::default(),
                ))
                .unwrap();
        }
        roster
    }

    #[test]
    fn test_agents_in_roster_order() {
        let doc = assemble(
            &roster(&["Project Manager", "Code Developer", "Code Tester"]),
            "Login API",
            "Build a login API",
        )
        .unwrap();
        let names: Vec<&str> = doc.agents().iter().map(|a| a.config.name.as_str()).collect();
        assert_eq!(names, vec!["project_manager", "code_developer", "code_tester"]);
        assert_eq!(doc.sender.kind, "userproxy");
        assert_eq!(doc.receiver.kind, "groupchat");
        assert!(!doc.sender.config.llm_config);
    }

    #[test]
    fn test_only_first_agent_is_coordinator() {
        let doc = assemble(&roster(&["Project Manager", "Code Developer"]), "w", "d").unwrap();
        let first = &doc.agents()[0].config.system_message;
        let second = &doc.agents()[1].config.system_message;
        assert!(first.ends_with("reply with TERMINATE."));
        assert!(first.contains("Code Developer"));
        assert!(!second.contains(TERMINATE));
    }

    #[test]
    fn test_empty_roster_rejected() {
        assert_eq!(
            assemble(&Roster::new(), "w", "d").unwrap_err(),
            DomainError::EmptyRoster
        );
    }

    #[test]
    fn test_serialized_shape() {
        let doc = assemble(&roster(&["Project Manager"]), "Login API!", "d").unwrap();
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["type"], "groupchat");
        assert_eq!(json["sender"]["type"], "userproxy");
        assert_eq!(json["sender"]["config"]["llm_config"], false);
        assert_eq!(
            json["receiver"]["groupchat_config"]["agents"][0]["type"],
            "assistant"
        );
        assert_eq!(file_stem(&doc), "login_api");
    }
}
