//! The persisted record of one run.
//!
//!   outputs/YYYY-MM-DD.json        — everything below, pretty-printed
//!   outputs/YYYY-MM-DD.summary.md  — the synthesis text alone
//!
//! A same-day rerun overwrites both.

use crate::error::Result;
use crate::interaction::AgentInteraction;
use crate::io;
use crate::paths::{date_stem, Layout};
use crate::prompt::Reports;
use crate::pulse::Pulse;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextUsed {
    pub current_pulse: Pulse,
    pub pulse_history_count: usize,
    pub company_summary_loaded: bool,
    pub company_memo_loaded: bool,
}

/// Interactive runs carry `interactions`; batch runs carry `responses`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutput {
    pub date: String,
    pub context_used: ContextUsed,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interactions: Option<Vec<AgentInteraction>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responses: Option<Reports>,
    /// Always written, `null` when synthesis was disabled or failed.
    pub chief_of_staff_summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedOutput {
    pub json: PathBuf,
    pub summary: Option<PathBuf>,
}

impl RunOutput {
    pub fn new(date: NaiveDate, context_used: ContextUsed) -> Self {
        Self {
            date: date_stem(date),
            context_used,
            interactions: None,
            responses: None,
            chief_of_staff_summary: None,
        }
    }

    /// Write the JSON record and, when there is a directive, the Markdown.
    /// Without one, any same-day Markdown from an earlier run is removed.
    pub fn save(&self, layout: &Layout, date: NaiveDate) -> Result<SavedOutput> {
        let json = layout.output_json(date);
        let data = serde_json::to_string_pretty(self)?;
        io::atomic_write(&json, data.as_bytes())?;
        tracing::info!(path = %json.display(), "wrote run output");

        let summary = match &self.chief_of_staff_summary {
            Some(directive) => {
                let path = layout.output_summary(date);
                io::atomic_write(&path, directive.as_bytes())?;
                tracing::info!(path = %path.display(), "wrote directive summary");
                Some(path)
            }
            None => {
                let path = layout.output_summary(date);
                match std::fs::remove_file(&path) {
                    Ok(()) => tracing::info!(path = %path.display(), "removed stale directive summary"),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(e) => return Err(e.into()),
                }
                tracing::warn!("no directive available, skipping summary file");
                None
            }
        };
        Ok(SavedOutput { json, summary })
    }
}
