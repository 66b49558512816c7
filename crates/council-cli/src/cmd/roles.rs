use anyhow::Context;
use council_core::{config::AgentsConfig, paths::Layout, role::Role};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct RoleRow {
    key: &'static str,
    name: &'static str,
    enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
}

pub fn run(root: &Path, json: bool) -> anyhow::Result<crate::Outcome> {
    let layout = Layout::new(root);
    let config = AgentsConfig::load(&layout).context("failed to load agent config")?;

    let rows: Vec<RoleRow> = Role::ALL
        .into_iter()
        .map(|role| RoleRow {
            key: role.key(),
            name: role.display_name(),
            enabled: config.is_enabled(role),
            model: config.model_for(role).map(str::to_string),
        })
        .collect();

    if json {
        crate::output::print_json(&rows)?;
        return Ok(crate::Outcome::Done);
    }

    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.key.to_string(),
                r.name.to_string(),
                if r.enabled { "yes" } else { "no" }.to_string(),
                r.model.clone().unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();
    crate::output::print_table(&["KEY", "ROLE", "ENABLED", "MODEL"], &table);

    for key in config.unknown_keys() {
        println!("\nnote: config/agents.json names unknown role '{key}'");
    }
    Ok(crate::Outcome::Done)
}
