use anyhow::Context;
use council_core::{config::AgentsConfig, io, paths::Layout, role::Role};
use std::path::{Path, PathBuf};

const SYNTHESIS_TEMPLATE: &str = "\
You are the Chief of Staff for a one-person company. Several advisors have
spoken with the founder today; some of them were skipped on purpose. Weigh
what was said, resolve conflicts between advisors, and turn it into a short,
prioritized plan for the day. Account for skipped advisors by name.

Answer in exactly this format:

TODAY'S DIRECTIVE:

DO:
   1. ...

DELAY:
   1. ...

IGNORE:
   1. ...

DELEGATE:
   1. ...

Notes & Rationale:
- ...

Confidence: <number between 0 and 1>
";

pub fn run(root: &Path) -> anyhow::Result<crate::Outcome> {
    let layout = Layout::new(root);
    println!("Initializing council in: {}", layout.root().display());

    for dir in layout.scaffold_dirs() {
        io::ensure_dir(&dir).with_context(|| format!("failed to create {}", dir.display()))?;
    }

    let config_path = layout.agents_config();
    if config_path.exists() {
        report(&layout, &config_path, false);
    } else {
        AgentsConfig::default_roster()
            .save(&layout)
            .context("failed to write agent config")?;
        report(&layout, &config_path, true);
    }

    for (path, body) in default_templates(&layout) {
        let written = io::write_if_missing(&path, body.as_bytes())
            .with_context(|| format!("failed to write {}", path.display()))?;
        report(&layout, &path, written);
    }

    println!("\nNext: run 'council pulse', then 'council run'.");
    Ok(crate::Outcome::Done)
}

fn report(layout: &Layout, path: &Path, created: bool) {
    let shown = path.strip_prefix(layout.root()).unwrap_or(path);
    if created {
        println!("  created: {}", shown.display());
    } else {
        println!("  exists:  {}", shown.display());
    }
}

/// Every template the pipeline reads, with starter text.
fn default_templates(layout: &Layout) -> Vec<(PathBuf, String)> {
    let mut templates = Vec::new();
    for role in Role::ADVISORS {
        let spec = role.spec();
        templates.push((
            layout.prompt(&role.brief_template()),
            format!(
                "You are the {role} advisor on a small personal advisory council.\n\
                 You are opening a one-on-one with the founder about their day.\n\
                 Be direct and practical. Focus on {}.\n",
                spec.brief_focus
            ),
        ));
        templates.push((
            layout.prompt(&role.reply_template()),
            format!(
                "You are the {role} advisor continuing a one-on-one with the founder.\n\
                 Respond to what they just said and offer {}.\n",
                spec.reply_focus
            ),
        ));
        templates.push((
            layout.prompt(&role.analysis_template()),
            format!(
                "You are the {role} advisor. Review today's pulse and any reports from\n\
                 other advisors. Focus on {}.\n\n\
                 Respond with a fenced ```json block of the form:\n\
                 {{\"recommendations\": [\"...\"], \"concerns\": [\"...\"], \"flags\": [\"...\"], \"confidence\": 0.0}}\n\
                 where confidence is between 0 and 1.\n",
                spec.brief_focus
            ),
        ));
    }
    templates.push((
        layout.prompt(&Role::ChiefOfStaff.analysis_template()),
        SYNTHESIS_TEMPLATE.to_string(),
    ));
    templates
}
