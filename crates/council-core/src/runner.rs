//! Role runners: template → prompt → generation → parse.
//!
//! Nothing here returns `Err`. Every failure becomes a degraded value plus a
//! [`RoleFailure`] tag, so the orchestrator only has to log and count.

use crate::config::AgentsConfig;
use crate::parse::{self, StructuredResponse, Turn};
use crate::paths::Layout;
use crate::prompt::{self, PromptContext, Reports, SynthesisInput};
use crate::role::Role;
use crate::template;
use council_llm::TextGenerator;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleFailure {
    TemplateMissing,
    NoResponse,
}

impl fmt::Display for RoleFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RoleFailure::TemplateMissing => "prompt template missing",
            RoleFailure::NoResponse => "no response from generator",
        })
    }
}

/// A role's output, degraded when `failure` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer<T> {
    pub value: T,
    pub failure: Option<RoleFailure>,
}

impl<T> Answer<T> {
    fn ok(value: T) -> Self {
        Self {
            value,
            failure: None,
        }
    }

    fn failed(value: T, failure: RoleFailure) -> Self {
        Self {
            value,
            failure: Some(failure),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.failure.is_some()
    }
}

pub struct Runner<'a, G> {
    generator: &'a G,
    layout: &'a Layout,
    context: PromptContext<'a>,
    config: &'a AgentsConfig,
}

impl<'a, G: TextGenerator> Runner<'a, G> {
    pub fn new(
        generator: &'a G,
        layout: &'a Layout,
        context: PromptContext<'a>,
        config: &'a AgentsConfig,
    ) -> Self {
        Self {
            generator,
            layout,
            context,
            config,
        }
    }

    async fn generate(&self, role: Role, prompt: &str) -> Option<String> {
        let model = self.config.model_for(role);
        tracing::info!(role = role.key(), model, "requesting generation");
        self.generator.generate(prompt, model).await
    }

    /// Opening statement for the interactive one-on-one.
    pub async fn brief(&self, role: Role) -> Answer<String> {
        let spec = role.spec();
        let Ok(template) = template::load(self.layout, &role.brief_template()) else {
            return Answer::failed(
                format!("Error: {role} Agent failed to load brief prompt template."),
                RoleFailure::TemplateMissing,
            );
        };
        let prompt = prompt::brief_prompt(spec, &template, &self.context);
        let raw = self.generate(role, &prompt).await;
        conversational(parse::parse_conversational(raw.as_deref(), &spec.shape, Turn::Brief))
    }

    /// One follow-up after the user answered the brief.
    pub async fn reply(&self, role: Role, brief: &str, user_response: &str) -> Answer<String> {
        let spec = role.spec();
        let Ok(template) = template::load(self.layout, &role.reply_template()) else {
            return Answer::failed(
                format!("Error: {role} Agent failed to load reply prompt template."),
                RoleFailure::TemplateMissing,
            );
        };
        let prompt = prompt::reply_prompt(spec, &template, &self.context, brief, user_response);
        let raw = self.generate(role, &prompt).await;
        conversational(parse::parse_conversational(raw.as_deref(), &spec.shape, Turn::Reply))
    }

    /// Non-interactive structured analysis, seeing earlier roles' reports.
    pub async fn analyze(&self, role: Role, reports: &Reports) -> Answer<StructuredResponse> {
        let spec = role.spec();
        let Ok(template) = template::load(self.layout, &role.analysis_template()) else {
            return Answer::failed(
                StructuredResponse::error(role.key(), "Error: Failed to load prompt template."),
                RoleFailure::TemplateMissing,
            );
        };
        let prompt = prompt::analysis_prompt(spec, &template, &self.context, reports);
        let raw = self.generate(role, &prompt).await;
        let parsed = parse::parse_structured(raw.as_deref(), &spec.shape);
        tracing::info!(role = role.key(), strategy = ?parsed.strategy, "analysis parsed");
        if parsed.strategy == parse::ParseStrategy::NoResponse {
            Answer::failed(parsed.value, RoleFailure::NoResponse)
        } else {
            Answer::ok(parsed.value)
        }
    }

    /// The day's directive. `None` when the synthesis could not run.
    pub async fn synthesize(&self, input: SynthesisInput<'_>) -> Answer<Option<String>> {
        let role = Role::ChiefOfStaff;
        let Ok(template) = template::load(self.layout, &role.analysis_template()) else {
            return Answer::failed(None, RoleFailure::TemplateMissing);
        };
        let prompt = prompt::synthesis_prompt(&template, &self.context, input);
        match self.generate(role, &prompt).await {
            Some(text) if !text.trim().is_empty() => Answer::ok(Some(text)),
            _ => {
                tracing::error!("synthesis produced no directive");
                Answer::failed(None, RoleFailure::NoResponse)
            }
        }
    }
}

fn conversational(parsed: parse::Parsed<String>) -> Answer<String> {
    if parsed.strategy == parse::ParseStrategy::NoResponse {
        Answer::failed(parsed.value, RoleFailure::NoResponse)
    } else {
        Answer::ok(parsed.value)
    }
}
