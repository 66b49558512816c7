//! One-on-one conversations with each advisory role.
//!
//! The conversation itself is driven by the orchestrator; this module holds
//! the record it produces, the console seam it talks through, and the text
//! rendering the synthesis prompt receives.

use crate::role::Role;
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};

/// What happened with one role during an interactive run.
///
/// `skipped` means the remaining fields carry nothing for synthesis. A
/// `user_response` without an `agent_reply` means the reply failed or was
/// never requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentInteraction {
    pub agent_name: String,
    pub brief: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_reply: Option<String>,
    pub skipped: bool,
}

impl AgentInteraction {
    pub fn accepted(role: Role, brief: String) -> Self {
        Self {
            agent_name: role.display_name().to_string(),
            brief,
            user_response: None,
            agent_reply: None,
            skipped: false,
        }
    }

    pub fn skipped(role: Role, brief: String) -> Self {
        Self {
            skipped: true,
            ..Self::accepted(role, brief)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    /// Keep the brief and move on.
    Next,
    /// Answer the brief and get one reply.
    Respond,
    /// Leave this role out of the synthesis.
    Skip,
}

impl UserAction {
    fn from_answer(answer: &str) -> Option<Self> {
        match answer.trim().to_ascii_lowercase().as_str() {
            "" | "n" | "next" => Some(UserAction::Next),
            "r" | "respond" => Some(UserAction::Respond),
            "s" | "skip" => Some(UserAction::Skip),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Console
// ---------------------------------------------------------------------------

/// Line-oriented user I/O: one question, one answer, in order.
pub trait Console {
    fn show(&mut self, text: &str) -> io::Result<()>;

    /// Ask and return the trimmed answer. End of input is `UnexpectedEof`.
    fn ask(&mut self, question: &str) -> io::Result<String>;
}

/// A [`Console`] over any reader/writer pair, normally stdin/stdout.
pub struct StdConsole<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> StdConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Console for StdConsole<R, W> {
    fn show(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{text}")?;
        self.output.flush()
    }

    fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{question}\n> ")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for an answer",
            ));
        }
        Ok(line.trim().to_string())
    }
}

/// Ask what to do with `role`'s brief until the answer is recognised.
pub fn choose_action<C: Console + ?Sized>(console: &mut C, role: Role) -> io::Result<UserAction> {
    let question = format!(
        "Action for {role}? [n]ext: include these ideas / [r]espond / [s]kip: don't include"
    );
    loop {
        let answer = console.ask(&question)?;
        match UserAction::from_answer(&answer) {
            Some(action) => return Ok(action),
            None => console.show("Please answer n, r or s.")?,
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render interactions for the synthesis prompt. Skipped roles stay in the
/// list, marked as skipped, with their content left out.
pub fn render_interactions(interactions: &[AgentInteraction]) -> String {
    if interactions.is_empty() {
        return "No advisory roles ran today.".to_string();
    }
    interactions
        .iter()
        .map(render_one)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_one(interaction: &AgentInteraction) -> String {
    let mut lines = vec![format!("### {}", interaction.agent_name)];
    if interaction.skipped {
        lines.push("Status: skipped".to_string());
        return lines.join("\n");
    }
    lines.push("Status: included".to_string());
    lines.push(format!("Brief: {}", interaction.brief));
    if let Some(response) = &interaction.user_response {
        lines.push(format!("User response: {response}"));
    }
    if let Some(reply) = &interaction.agent_reply {
        lines.push(format!("Reply: {reply}"));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedConsole;

    #[test]
    fn serializes_camel_case_and_omits_absent_fields() {
        let value = serde_json::to_value(AgentInteraction::accepted(Role::Ethics, "b".into())).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"agentName": "Ethics", "brief": "b", "skipped": false})
        );
    }

    #[test]
    fn choose_action_reasks_until_valid() {
        let mut console = ScriptedConsole::new(["maybe", "R"]);
        assert_eq!(choose_action(&mut console, Role::Product).unwrap(), UserAction::Respond);
        assert_eq!(console.asked.len(), 2);
        assert!(console.shown.iter().any(|s| s.contains("n, r or s")));
    }

    #[test]
    fn choose_action_blank_is_next() {
        let mut console = ScriptedConsole::new([""]);
        assert_eq!(choose_action(&mut console, Role::Strategy).unwrap(), UserAction::Next);
    }

    #[test]
    fn choose_action_eof_is_error() {
        let mut console = ScriptedConsole::new(Vec::<&str>::new());
        let err = choose_action(&mut console, Role::Strategy).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn std_console_reads_lines_and_reports_eof() {
        let input = io::Cursor::new("  first answer \n");
        let mut output = Vec::new();
        let mut console = StdConsole::new(input, &mut output);
        assert_eq!(console.ask("Q1?").unwrap(), "first answer");
        assert!(console.ask("Q2?").is_err());
        drop(console);
        let written = String::from_utf8(output).unwrap();
        assert!(written.starts_with("Q1?\n> "));
    }

    #[test]
    fn render_marks_skipped_roles() {
        let interactions = vec![
            AgentInteraction {
                user_response: Some("Why?".into()),
                agent_reply: Some("Because.".into()),
                ..AgentInteraction::accepted(Role::Strategy, "Focus on v1.".into())
            },
            AgentInteraction::skipped(Role::Ethics, "Consider privacy.".into()),
        ];
        let text = render_interactions(&interactions);
        assert_eq!(
            text,
            "### Strategy\nStatus: included\nBrief: Focus on v1.\nUser response: Why?\nReply: Because.\n\n### Ethics\nStatus: skipped"
        );
        assert!(!text.contains("privacy"));
    }
}
