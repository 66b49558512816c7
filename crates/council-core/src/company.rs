//! Optional company context: a free-text summary and a JSON memo.
//!
//! Both are best-effort. Any failure is logged and treated as absent.

use crate::io;
use crate::paths::Layout;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyDocs {
    pub summary: String,
}

/// Load `company/summary.md`. Blank files count as absent.
pub fn load_summary(layout: &Layout) -> Option<CompanyDocs> {
    let path = layout.company_summary();
    match io::read_optional(&path) {
        Ok(Some(summary)) if !summary.trim().is_empty() => {
            tracing::info!(path = %path.display(), "loaded company summary");
            Some(CompanyDocs { summary })
        }
        Ok(Some(_)) => {
            tracing::warn!(path = %path.display(), "company summary is empty");
            None
        }
        Ok(None) => {
            tracing::warn!(path = %path.display(), "company summary not found");
            None
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to read company summary");
            None
        }
    }
}

/// Load `memory/company-memo.json`. A JSON `null` counts as absent.
pub fn load_memo(layout: &Layout) -> Option<Value> {
    let path = layout.company_memo();
    let data = match io::read_optional(&path) {
        Ok(Some(data)) => data,
        Ok(None) => {
            tracing::warn!(path = %path.display(), "company memo not found");
            return None;
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to read company memo");
            return None;
        }
    };
    match serde_json::from_str::<Value>(&data) {
        Ok(Value::Null) => None,
        Ok(memo) => {
            tracing::info!(path = %path.display(), "loaded company memo");
            Some(memo)
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "company memo is not valid JSON");
            None
        }
    }
}
