//! One run, start to finish.
//!
//! ```text
//! load pulse ─▶ load history/company/memo ─▶ load config
//!   ─▶ for each enabled advisor: brief ─▶ next | respond ─▶ reply | skip
//!   ─▶ synthesis (if enabled) ─▶ outputs/<date>.json [+ .summary.md]
//! ```
//!
//! Only a missing pulse, a broken config or a failed output write abort the
//! run. Role-level failures are absorbed and listed in [`RunReport::degraded`].

use crate::company::{self, CompanyDocs};
use crate::config::AgentsConfig;
use crate::error::Result;
use crate::interaction::{choose_action, AgentInteraction, Console, UserAction};
use crate::output::{ContextUsed, RunOutput};
use crate::paths::Layout;
use crate::prompt::{PromptContext, Reports, SynthesisInput};
use crate::pulse::{Pulse, HISTORY_DAYS};
use crate::role::Role;
use crate::runner::Runner;
use chrono::NaiveDate;
use council_llm::TextGenerator;
use serde_json::Value;
use std::io;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// One-on-one with each role through the console.
    Interactive,
    /// Structured analysis from every role, no questions asked.
    Batch,
}

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Names the output files and anchors the history window.
    pub today: NaiveDate,
    pub mode: RunMode,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub output: RunOutput,
    pub json_path: PathBuf,
    pub summary_path: Option<PathBuf>,
    /// Keys of roles whose output was degraded.
    pub degraded: Vec<String>,
}

impl RunReport {
    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }
}

/// Everything loaded before the first generation call.
struct Loaded {
    pulse: Pulse,
    history: Vec<Pulse>,
    company: Option<CompanyDocs>,
    memo: Option<Value>,
    config: AgentsConfig,
}

pub struct Orchestrator<'a, G, C: ?Sized> {
    layout: &'a Layout,
    generator: &'a G,
    console: &'a mut C,
}

impl<'a, G: TextGenerator, C: Console + ?Sized> Orchestrator<'a, G, C> {
    pub fn new(layout: &'a Layout, generator: &'a G, console: &'a mut C) -> Self {
        Self {
            layout,
            generator,
            console,
        }
    }

    pub async fn run(&mut self, options: RunOptions) -> Result<RunReport> {
        tracing::info!(date = %options.today, mode = ?options.mode, "starting run");
        let loaded = self.load(options.today)?;
        let ctx = PromptContext {
            pulse: &loaded.pulse,
            history: &loaded.history,
            company: loaded.company.as_ref(),
            memo: loaded.memo.as_ref(),
        };
        let runner = Runner::new(self.generator, self.layout, ctx, &loaded.config);
        let advisors = loaded.config.enabled_advisors();
        let mut degraded = Vec::new();

        let mut output = RunOutput::new(
            options.today,
            ContextUsed {
                current_pulse: loaded.pulse.clone(),
                pulse_history_count: loaded.history.len(),
                company_summary_loaded: loaded.company.is_some(),
                company_memo_loaded: loaded.memo.is_some(),
            },
        );

        match options.mode {
            RunMode::Interactive => {
                self.show("\n====== Agent One-on-Ones ======");
                let mut interactions = Vec::with_capacity(advisors.len());
                for role in advisors {
                    interactions.push(self.engage(&runner, role, &mut degraded).await);
                }
                self.show("===============================\n");
                output.interactions = Some(interactions);
            }
            RunMode::Batch => {
                let mut reports = Reports::new();
                for role in advisors {
                    let answer = runner.analyze(role, &reports).await;
                    if let Some(failure) = answer.failure {
                        tracing::error!(role = role.key(), %failure, "analysis degraded");
                        degraded.push(role.key().to_string());
                    }
                    reports.insert(role.key().to_string(), answer.value);
                }
                output.responses = Some(reports);
            }
        }
        let synthesis_input = match (&output.interactions, &output.responses) {
            (Some(interactions), _) => SynthesisInput::Interactions(interactions),
            (None, Some(reports)) => SynthesisInput::Reports(reports),
            (None, None) => SynthesisInput::Interactions(&[]),
        };

        let summary = if loaded.config.is_enabled(Role::ChiefOfStaff) {
            tracing::info!("running chief of staff synthesis");
            let answer = runner.synthesize(synthesis_input).await;
            if let Some(failure) = answer.failure {
                tracing::error!(%failure, "synthesis degraded");
                degraded.push(Role::ChiefOfStaff.key().to_string());
            }
            answer.value
        } else {
            tracing::info!("chief of staff disabled, skipping synthesis");
            None
        };
        if let Some(directive) = &summary {
            self.show("\n====== Chief of Staff Summary ======");
            self.show(directive.trim());
            self.show("====================================\n");
        }
        output.chief_of_staff_summary = summary;

        let saved = output.save(self.layout, options.today)?;
        tracing::info!(degraded = degraded.len(), "run finished");
        Ok(RunReport {
            output,
            json_path: saved.json,
            summary_path: saved.summary,
            degraded,
        })
    }

    fn load(&self, today: NaiveDate) -> Result<Loaded> {
        let pulse = Pulse::load_current(self.layout)?;
        let history = Pulse::load_history(self.layout, today, HISTORY_DAYS);
        let company = company::load_summary(self.layout);
        let memo = company::load_memo(self.layout);
        let config = AgentsConfig::load(self.layout)?;
        Ok(Loaded {
            pulse,
            history,
            company,
            memo,
            config,
        })
    }

    /// Run one role's one-on-one. Console failures count as a skip.
    async fn engage(
        &mut self,
        runner: &Runner<'_, G>,
        role: Role,
        degraded: &mut Vec<String>,
    ) -> AgentInteraction {
        self.show(&format!("\n--- Engaging {role} Agent ---"));
        let brief = runner.brief(role).await;
        let mut failed = brief.failure.is_some();
        if let Some(failure) = brief.failure {
            tracing::error!(role = role.key(), %failure, "brief degraded");
        }

        let interaction = match self.converse(runner, role, brief.value.clone()).await {
            Ok((interaction, reply_failed)) => {
                failed |= reply_failed;
                interaction
            }
            Err(e) => {
                tracing::warn!(role = role.key(), error = %e, "console failed, treating role as skipped");
                AgentInteraction::skipped(role, brief.value)
            }
        };
        if failed {
            degraded.push(role.key().to_string());
        }
        interaction
    }

    /// The console half of a one-on-one. Returns the record and whether the
    /// reply degraded.
    async fn converse(
        &mut self,
        runner: &Runner<'_, G>,
        role: Role,
        brief: String,
    ) -> io::Result<(AgentInteraction, bool)> {
        self.console.show(&format!("\n{role} says:\n{brief}"))?;
        match choose_action(&mut *self.console, role)? {
            UserAction::Next => {
                self.console.show(&format!("Continuing past {role} Agent."))?;
                Ok((AgentInteraction::accepted(role, brief), false))
            }
            UserAction::Skip => {
                self.console.show(&format!("Skipping {role} Agent."))?;
                Ok((AgentInteraction::skipped(role, brief), false))
            }
            UserAction::Respond => {
                let response = self.console.ask(&format!("Your response to {role}:"))?;
                if response.is_empty() {
                    self.console.show("(No response provided, continuing...)")?;
                    return Ok((AgentInteraction::accepted(role, brief), false));
                }
                let reply = runner.reply(role, &brief, &response).await;
                if let Some(failure) = reply.failure {
                    tracing::error!(role = role.key(), %failure, "reply degraded");
                }
                self.console.show(&format!("\n{role} replies:\n{}", reply.value))?;
                let failed = reply.is_degraded();
                Ok((
                    AgentInteraction {
                        user_response: Some(response),
                        agent_reply: Some(reply.value),
                        ..AgentInteraction::accepted(role, brief)
                    },
                    failed,
                ))
            }
        }
    }

    /// Progress text; a broken console here is logged, not fatal.
    fn show(&mut self, text: &str) {
        if let Err(e) = self.console.show(text) {
            tracing::warn!(error = %e, "failed to write to console");
        }
    }
}
