//! Prompt assembly.
//!
//! A template is either rendered in place, when it uses `{{placeholders}}`,
//! or followed by a labelled dump of the context the role may see and a
//! closing cue line naming the section the model should write. Output
//! depends only on the inputs; nothing reads the clock.

use crate::company::CompanyDocs;
use crate::interaction::{render_interactions, AgentInteraction};
use crate::parse::StructuredResponse;
use crate::pulse::Pulse;
use crate::role::{ContextScope, Role, RoleSpec};
use crate::template;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Reports from roles that already ran in a batch, keyed by role key.
pub type Reports = BTreeMap<String, StructuredResponse>;

/// Everything loaded for today's run, borrowed by every prompt.
#[derive(Debug, Clone, Copy)]
pub struct PromptContext<'a> {
    pub pulse: &'a Pulse,
    pub history: &'a [Pulse],
    pub company: Option<&'a CompanyDocs>,
    pub memo: Option<&'a Value>,
}

/// What the synthesis works from.
#[derive(Debug, Clone, Copy)]
pub enum SynthesisInput<'a> {
    Interactions(&'a [AgentInteraction]),
    Reports(&'a Reports),
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Appends labelled sections to a template.
#[derive(Debug)]
pub struct PromptBuilder {
    buf: String,
}

impl PromptBuilder {
    pub fn new(template: &str) -> Self {
        Self {
            buf: format!("{}\n\n", template.trim()),
        }
    }

    pub fn heading(mut self, title: &str) -> Self {
        self.buf.push_str(&format!("# {title}:\n\n"));
        self
    }

    pub fn section(mut self, title: &str, body: &str) -> Self {
        self.buf.push_str(&format!("## {title}:\n{}\n\n", body.trim_end()));
        self
    }

    /// Two-space indented JSON, stable for identical input.
    pub fn json_section<T: Serialize + ?Sized>(self, title: &str, value: &T) -> Self {
        let body = serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string());
        self.section(title, &body)
    }

    pub fn optional_json_section(self, title: &str, value: Option<&Value>) -> Self {
        match value {
            Some(value) => self.json_section(title, value),
            None => self.section(title, "Not available"),
        }
    }

    /// Unlabelled paragraph.
    pub fn text(mut self, text: &str) -> Self {
        self.buf.push_str(text.trim_end());
        self.buf.push_str("\n\n");
        self
    }

    pub fn finish(mut self, cue: &str) -> String {
        self.buf.push_str(&format!("# {cue}:\n"));
        self.buf
    }

    fn context(self, scope: ContextScope, ctx: &PromptContext<'_>) -> Self {
        let mut b = self.json_section("Pulse", ctx.pulse);
        if scope.history && !ctx.history.is_empty() {
            let title = format!("Pulse History ({} prior days)", ctx.history.len());
            b = b.json_section(&title, ctx.history);
        }
        if scope.company_summary {
            if let Some(docs) = ctx.company {
                b = b.section("Company Summary", docs.summary.trim());
            }
        }
        if scope.memo {
            b = b.optional_json_section("Company Memo (if available)", ctx.memo);
        }
        b
    }
}

// ---------------------------------------------------------------------------
// Per-phase prompts
// ---------------------------------------------------------------------------

pub fn brief_prompt(spec: &RoleSpec, template: &str, ctx: &PromptContext<'_>) -> String {
    if template::has_placeholders(template) {
        return template::render(template, &placeholder_values(ctx, Extras::default()));
    }
    let name = spec.role.display_name();
    PromptBuilder::new(template)
        .heading("Current Context")
        .context(spec.scope, ctx)
        .heading("Instructions")
        .text(&format!(
            "Generate a brief, concise (1-3 sentences) opening statement for the {name} agent based on the context above.\n\
             Focus on {}.\n\
             Do not ask questions, just provide your initial assessment.",
            spec.brief_focus
        ))
        .finish(&format!("{name} Agent Brief"))
}

pub fn reply_prompt(
    spec: &RoleSpec,
    template: &str,
    ctx: &PromptContext<'_>,
    brief: &str,
    user_response: &str,
) -> String {
    if template::has_placeholders(template) {
        let extras = Extras {
            brief: Some(brief),
            user_response: Some(user_response),
            ..Extras::default()
        };
        return template::render(template, &placeholder_values(ctx, extras));
    }
    let name = spec.role.display_name();
    PromptBuilder::new(template)
        .heading("Original Context")
        .context(spec.scope, ctx)
        .heading("Conversation History")
        .section("Your Initial Brief", brief)
        .section("User's Response", user_response)
        .heading("Instructions")
        .text(&format!(
            "Generate a concise (1-3 sentences) follow-up reply based on the user's response, considering the original context and your initial brief.\n\
             Acknowledge the user's input and provide {}.\n\
             Do not ask follow-up questions.",
            spec.reply_focus
        ))
        .finish(&format!("{name} Agent Reply"))
}

/// Batch analysis: the role sees reports from roles that ran before it.
pub fn analysis_prompt(
    spec: &RoleSpec,
    template: &str,
    ctx: &PromptContext<'_>,
    reports: &Reports,
) -> String {
    if template::has_placeholders(template) {
        let extras = Extras {
            agent_reports: Some(reports),
            ..Extras::default()
        };
        return template::render(template, &placeholder_values(ctx, extras));
    }
    PromptBuilder::new(template)
        .heading("Current Context")
        .context(spec.scope, ctx)
        .json_section("Other Agent Reports", reports)
        .finish(&format!("{} Agent Analysis", spec.role.display_name()))
}

pub fn synthesis_prompt(template: &str, ctx: &PromptContext<'_>, input: SynthesisInput<'_>) -> String {
    if template::has_placeholders(template) {
        let extras = match input {
            SynthesisInput::Interactions(interactions) => Extras {
                interactions: Some(interactions),
                ..Extras::default()
            },
            SynthesisInput::Reports(reports) => Extras {
                agent_reports: Some(reports),
                ..Extras::default()
            },
        };
        return template::render(template, &placeholder_values(ctx, extras));
    }
    let b = PromptBuilder::new(template)
        .heading("Current Context")
        .context(Role::ChiefOfStaff.spec().scope, ctx);
    let b = match input {
        SynthesisInput::Interactions(interactions) => {
            b.section("Agent Interactions", &render_interactions(interactions))
        }
        SynthesisInput::Reports(reports) => b.json_section("Agent Reports", reports),
    };
    b.finish("Chief of Staff Synthesis")
}

// ---------------------------------------------------------------------------
// Placeholder values
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Extras<'a> {
    brief: Option<&'a str>,
    user_response: Option<&'a str>,
    interactions: Option<&'a [AgentInteraction]>,
    agent_reports: Option<&'a Reports>,
}

fn pretty<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

fn placeholder_values(ctx: &PromptContext<'_>, extras: Extras<'_>) -> BTreeMap<&'static str, String> {
    let pulse = ctx.pulse;
    let mut values = BTreeMap::new();
    values.insert("goal", pulse.goal.clone());
    values.insert("date", pulse.date.clone());
    values.insert("blockers", pulse.blockers.join(", "));
    values.insert("user_feedback", pulse.user_feedback.join(", "));
    values.insert("energy_level", pulse.energy_level.clone());
    values.insert("emotional_state", pulse.emotional_state.clone());
    if !ctx.history.is_empty() {
        values.insert("history", pretty(ctx.history));
    }
    if let Some(docs) = ctx.company {
        values.insert("company_summary", docs.summary.trim().to_string());
    }
    if let Some(memo) = ctx.memo {
        values.insert("company_memo", pretty(memo));
    }
    if let Some(brief) = extras.brief {
        values.insert("brief", brief.to_string());
    }
    if let Some(response) = extras.user_response {
        values.insert("user_response", response.to_string());
    }
    if let Some(interactions) = extras.interactions {
        values.insert("interactions", render_interactions(interactions));
    }
    if let Some(reports) = extras.agent_reports {
        values.insert("agent_reports", pretty(reports));
    }
    values
}
