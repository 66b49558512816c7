//! Prompt template files and `{{placeholder}}` rendering.

use crate::error::{CouncilError, Result};
use crate::paths::Layout;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Placeholders a template may use instead of the appended context dump.
pub const PLACEHOLDERS: [&str; 13] = [
    "goal",
    "date",
    "blockers",
    "user_feedback",
    "energy_level",
    "emotional_state",
    "history",
    "company_summary",
    "company_memo",
    "brief",
    "user_response",
    "interactions",
    "agent_reports",
];

/// Read `prompts/<file>`.
pub fn load(layout: &Layout, file: &str) -> Result<String> {
    let path = layout.prompt(file);
    std::fs::read_to_string(&path).map_err(|source| {
        tracing::error!(path = %path.display(), error = %source, "failed to read prompt template");
        CouncilError::TemplateUnavailable {
            path: path.display().to_string(),
            source,
        }
    })
}

/// True when `template` references at least one known placeholder.
pub fn has_placeholders(template: &str) -> bool {
    PLACEHOLDERS
        .iter()
        .any(|key| template.contains(&format!("{{{{{key}}}}}")))
}

/// Replace every `{{key}}` with its value in one pass, so text inside a value
/// is never substituted again. Known keys without a value render empty and
/// unknown tokens are left alone; the blank-line runs that leaves behind
/// collapse to a single blank line.
pub fn render(template: &str, values: &BTreeMap<&str, String>) -> String {
    let re = TOKEN_RE.get_or_init(|| Regex::new(r"\{\{(\w+)\}\}").unwrap());
    let out = re.replace_all(template, |caps: &regex::Captures<'_>| {
        let key = &caps[1];
        if PLACEHOLDERS.contains(&key) {
            values.get(key).cloned().unwrap_or_default()
        } else {
            caps[0].to_string()
        }
    });
    squeeze_blank_lines(&out)
}

static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
static BLANK_RUN_RE: OnceLock<Regex> = OnceLock::new();

fn squeeze_blank_lines(text: &str) -> String {
    let re = BLANK_RUN_RE.get_or_init(|| Regex::new(r"\n(?:[ \t]*\n){2,}").unwrap());
    let squeezed = re.replace_all(text, "\n\n");
    format!("{}\n", squeezed.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io;
    use tempfile::TempDir;

    #[test]
    fn load_reads_template() {
        let dir = TempDir::new().unwrap();
        let layout = Layout::new(dir.path());
        io::atomic_write(&layout.prompt("ethicsBriefPrompt.txt"), b"You are the ethics advisor.").unwrap();
        assert_eq!(
            load(&layout, "ethicsBriefPrompt.txt").unwrap(),
            "You are the ethics advisor."
        );
    }

    #[test]
    fn missing_template_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let layout = Layout::new(dir.path());
        let err = load(&layout, "nopePrompt.txt").unwrap_err();
        assert!(matches!(err, CouncilError::TemplateUnavailable { .. }));
    }

    #[test]
    fn detects_placeholders() {
        assert!(has_placeholders("Goal: {{goal}}"));
        assert!(!has_placeholders("Goal: {{unknown}}"));
        assert!(!has_placeholders("plain template"));
    }

    #[test]
    fn render_substitutes_and_squeezes_empty_sections() {
        let template = "Goal: {{goal}}\n\n{{history}}\n\n\n{{company_summary}}\n\nBlockers: {{blockers}}";
        let values: BTreeMap<&str, String> = [
            ("goal", "Ship v1".to_string()),
            ("blockers", "flaky CI, review".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            render(template, &values),
            "Goal: Ship v1\n\nBlockers: flaky CI, review\n"
        );
    }

    #[test]
    fn render_leaves_unknown_tokens() {
        let values = BTreeMap::new();
        assert_eq!(render("{{mood}} {{goal}}", &values), "{{mood}}\n");
    }

    #[test]
    fn render_does_not_expand_tokens_inside_values() {
        let values: BTreeMap<&str, String> = [
            ("goal", "Document the {{brief}} field".to_string()),
            ("brief", "SECRET BRIEF".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            render("Goal: {{goal}}", &values),
            "Goal: Document the {{brief}} field\n"
        );
    }
}
