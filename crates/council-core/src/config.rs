use crate::error::{CouncilError, Result};
use crate::io;
use crate::paths::Layout;
use crate::role::{normalize_key, Role};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// RoleToggle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleToggle {
    #[serde(default)]
    pub enabled: bool,
    /// Model override for this role's generation calls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl RoleToggle {
    pub fn on() -> Self {
        Self {
            enabled: true,
            model: None,
        }
    }
}

// ---------------------------------------------------------------------------
// AgentsConfig
// ---------------------------------------------------------------------------

/// `config/agents.json`: role key → toggle.
///
/// Roles are opt-in. A role the file does not mention is disabled, including
/// the synthesis role (`chiefOfStaff`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentsConfig {
    roles: BTreeMap<String, RoleToggle>,
}

impl AgentsConfig {
    /// Load the config. A missing file means the default roster (every role
    /// on); a file that does not parse is an error.
    pub fn load(layout: &Layout) -> Result<Self> {
        let path = layout.agents_config();
        let Some(data) = io::read_optional(&path)? else {
            tracing::warn!(
                path = %path.display(),
                "agent config not found, enabling every role"
            );
            return Ok(Self::default_roster());
        };
        let config: Self =
            serde_json::from_str(&data).map_err(|source| CouncilError::InvalidConfig {
                path: path.display().to_string(),
                source,
            })?;
        for key in config.unknown_keys() {
            tracing::warn!(key, "agent config names an unknown role, ignoring");
        }
        tracing::info!(
            enabled = config.enabled_roles().len(),
            "loaded agent config"
        );
        Ok(config)
    }

    pub fn save(&self, layout: &Layout) -> Result<()> {
        let data = serde_json::to_string_pretty(self)?;
        io::atomic_write(&layout.agents_config(), data.as_bytes())?;
        Ok(())
    }

    pub fn default_roster() -> Self {
        let roles = Role::ALL
            .iter()
            .map(|role| (role.key().to_string(), RoleToggle::on()))
            .collect();
        Self { roles }
    }

    /// Toggle for `role`, matching keys loosely (`chief_of_staff` works).
    pub fn toggle(&self, role: Role) -> Option<&RoleToggle> {
        let wanted = normalize_key(role.key());
        self.roles
            .iter()
            .find(|(key, _)| normalize_key(key) == wanted)
            .map(|(_, toggle)| toggle)
    }

    pub fn is_enabled(&self, role: Role) -> bool {
        self.toggle(role).is_some_and(|t| t.enabled)
    }

    pub fn model_for(&self, role: Role) -> Option<&str> {
        self.toggle(role)
            .and_then(|t| t.model.as_deref())
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }

    /// Enabled roles in run order, synthesis last.
    pub fn enabled_roles(&self) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|role| self.is_enabled(*role))
            .collect()
    }

    /// Enabled advisory roles in run order.
    pub fn enabled_advisors(&self) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|role| !role.is_synthesis() && self.is_enabled(*role))
            .collect()
    }

    pub fn unknown_keys(&self) -> Vec<&str> {
        self.roles
            .keys()
            .filter(|key| Role::from_key(key).is_none())
            .map(String::as_str)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
