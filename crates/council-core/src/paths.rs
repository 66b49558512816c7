use chrono::NaiveDate;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const CONTEXT_DIR: &str = "context";
pub const COMPANY_DIR: &str = "company";
pub const MEMORY_DIR: &str = "memory";
pub const CONFIG_DIR: &str = "config";
pub const PROMPTS_DIR: &str = "prompts";
pub const OUTPUTS_DIR: &str = "outputs";

pub const LATEST_PULSE_FILE: &str = "context/latest.json";
pub const INITIAL_PULSE_FILE: &str = "context/context.json";
pub const COMPANY_SUMMARY_FILE: &str = "company/summary.md";
pub const COMPANY_MEMO_FILE: &str = "memory/company-memo.json";
pub const AGENTS_CONFIG_FILE: &str = "config/agents.json";

/// `YYYY-MM-DD`, the stem of every dated file.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn date_stem(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Every file location the pipeline touches, anchored at one project root.
///
/// Built once at startup and passed by reference into every loader and
/// writer; nothing else in the crate knows about directory names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn context_dir(&self) -> PathBuf {
        self.root.join(CONTEXT_DIR)
    }

    pub fn latest_pulse(&self) -> PathBuf {
        self.root.join(LATEST_PULSE_FILE)
    }

    pub fn initial_pulse(&self) -> PathBuf {
        self.root.join(INITIAL_PULSE_FILE)
    }

    pub fn pulse_for(&self, date: NaiveDate) -> PathBuf {
        self.context_dir().join(format!("{}.json", date_stem(date)))
    }

    pub fn company_summary(&self) -> PathBuf {
        self.root.join(COMPANY_SUMMARY_FILE)
    }

    pub fn company_memo(&self) -> PathBuf {
        self.root.join(COMPANY_MEMO_FILE)
    }

    pub fn agents_config(&self) -> PathBuf {
        self.root.join(AGENTS_CONFIG_FILE)
    }

    pub fn prompts_dir(&self) -> PathBuf {
        self.root.join(PROMPTS_DIR)
    }

    pub fn prompt(&self, file: &str) -> PathBuf {
        self.prompts_dir().join(file)
    }

    pub fn outputs_dir(&self) -> PathBuf {
        self.root.join(OUTPUTS_DIR)
    }

    pub fn output_json(&self, date: NaiveDate) -> PathBuf {
        self.outputs_dir().join(format!("{}.json", date_stem(date)))
    }

    pub fn output_summary(&self, date: NaiveDate) -> PathBuf {
        self.outputs_dir()
            .join(format!("{}.summary.md", date_stem(date)))
    }

    /// Directories `council init` creates.
    pub fn scaffold_dirs(&self) -> [PathBuf; 6] {
        [
            self.context_dir(),
            self.root.join(COMPANY_DIR),
            self.root.join(MEMORY_DIR),
            self.root.join(CONFIG_DIR),
            self.prompts_dir(),
            self.outputs_dir(),
        ]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
