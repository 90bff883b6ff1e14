//! Prompt templates for each LLM call in a teamforge session

use crate::moderator::directive::{DELIVERABLE_COMPLETED, PHASE_COMPLETED};

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for the request rephrasing call
    pub fn rephrase_system() -> &'static str {
        r#"You are an expert prompt engineer. You turn loose user requests into precise,
actionable project briefs for a team of AI specialists.
Keep the user's intent intact. Do not answer the request yourself."#
    }

    /// User prompt for the request rephrasing call
    pub fn rephrase_prompt(request: &str) -> String {
        format!(
            r#"Rewrite the following user request as a clear, self-contained project brief.
State the goal, the expected outputs and any constraints the user mentioned.

User request:
{request}

Respond with the rewritten brief only."#
        )
    }

    /// Prompt asking the model for a JSON array of agent descriptors
    pub fn agent_generation_prompt(brief: &str) -> String {
        format!(
            r#"You are assembling a team of AI experts to deliver the following project:

{brief}

Design between 3 and 6 complementary experts. The first expert coordinates the
team and integrates everyone's work.

Respond with a JSON array only. Each element must have the fields:
- "expert_name": short human-readable name
- "description": one sentence describing the expert's responsibility
- "role": the expert's role title
- "goal": what the expert is trying to achieve
- "backstory": one or two sentences of relevant experience
- "skills": array of short skill identifiers
- "tools": array of tool names the expert needs (may be empty)

Example:
[{{"expert_name": "Code Developer", "description": "Implements the features.", "role": "Developer", "goal": "Ship working code", "backstory": "Ten years of backend work.", "skills": ["rust"], "tools": []}}]"#
        )
    }

    /// System prompt for the project manager call
    pub fn project_manager_system() -> &'static str {
        r#"You are an experienced project manager. You break projects into a short list of
concrete deliverables and explain how the team should approach them."#
    }

    /// Prompt for the project manager's kickoff plan
    pub fn project_manager_prompt(brief: &str, roster: &str) -> String {
        format!(
            r#"Project brief:
{brief}

Team:
{roster}

Write a kickoff plan for this team. Include a section labelled "Key Deliverables:"
followed by a numbered list (1., 2., ...) of concrete deliverables, one per line.
After the list, add a section "Approach:" describing how the team should work
through the phases Planning, Development, Testing and Deployment."#
        )
    }

    /// System prompt for the moderator role
    pub fn moderator_system() -> &'static str {
        r#"You are the moderator of a discussion between AI experts. You decide who speaks
next and what they should do. You never do the work yourself."#
    }

    /// Prompt for one moderator decision
    pub fn moderator_prompt(
        goal: &str,
        history: &str,
        last_speaker: &str,
        last_comment: &str,
        roster: &str,
        deliverable: &str,
        phase: &str,
    ) -> String {
        format!(
            r#"Project goal:
{goal}

Discussion so far:
{history}

Last speaker: {last_speaker}
Last comment:
{last_comment}

Available experts:
{roster}

Current deliverable: {deliverable}
Current phase: {phase}

Choose the expert who should speak next and tell them exactly what to do for the
current deliverable and phase.

Your response MUST begin with "To <Expert Name>:" using a name from the list above,
followed by the instruction.
If the current phase of the current deliverable is finished, include the word {PHASE_COMPLETED}.
If the whole current deliverable is finished, include the word {DELIVERABLE_COMPLETED}."#
        )
    }

    /// Prompt for an agent turn following a moderator directive
    pub fn agent_turn_prompt(
        goal: &str,
        history: &str,
        instruction: &str,
        deliverable: &str,
        phase: &str,
    ) -> String {
        format!(
            r#"Project goal:
{goal}

Discussion so far:
{history}

Current deliverable: {deliverable}
Current phase: {phase}

Your task:
{instruction}

Respond in your role. Put any code in fenced code blocks."#
        )
    }

    /// Instruction used when the moderator produced no usable directive
    pub fn continuation_prompt() -> &'static str {
        "Continue your previous work on the current deliverable and phase. Build on the latest discussion."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rephrase_prompt_format() {
        let prompt = PromptTemplate::rephrase_prompt("make a todo app");
        assert!(prompt.contains("make a todo app"));
    }

    #[test]
    fn test_agent_generation_prompt_requests_json() {
        let prompt = PromptTemplate::agent_generation_prompt("Build a login API");
        assert!(prompt.contains("Build a login API"));
        assert!(prompt.contains("\"expert_name\""));
        assert!(prompt.contains("[{\"expert_name\""));
    }

    #[test]
    fn test_project_manager_prompt_mentions_deliverables_label() {
        let prompt = PromptTemplate::project_manager_prompt("brief", "Code Developer: codes");
        assert!(prompt.contains("Key Deliverables:"));
        assert!(prompt.contains("Code Developer: codes"));
    }

    #[test]
    fn test_agent_turn_prompt_format() {
        let prompt = PromptTemplate::agent_turn_prompt(
            "goal",
            "history",
            "write the handler",
            "Build login API",
            "Development",
        );
        assert!(prompt.contains("write the handler"));
        assert!(prompt.contains("Development"));
    }
}
