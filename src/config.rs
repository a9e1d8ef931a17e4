//! Workflow configuration.
//!
//! Configuration is stored in `workflow.yaml` under the engine root and
//! declares the available actions plus the free-form options each operation
//! reads. A minimal example:
//!
//! ```yaml
//! hook_timeout: 30
//! actions:
//!   reopen:
//!     label: Reopen
//!     newstate: reopened
//!     operations: [reset_milestone]
//!   triage:
//!     label: Triage
//!     operations: [triage]
//!     triage_field: type
//!     triage_split: "defect -> new_defect, task -> new_task"
//! ```
//!
//! Operation-specific keys (`triage_field`, `clear_fields`, `xref_hint`, ...)
//! are not enumerated here; they are captured as free-form options and read
//! through [`WorkflowConfig::option`] / [`WorkflowConfig::option_list`] by
//! whichever operation needs them.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// File under the engine root that holds the workflow configuration.
pub const CONFIG_FILE: &str = "workflow.yaml";

/// Declarative configuration for the workflow engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Available actions, keyed by action name.
    #[serde(default)]
    pub actions: BTreeMap<String, ActionSpec>,

    /// Timeout in seconds for external hook scripts (default: 30, 0 = no
    /// timeout).
    #[serde(default = "default_hook_timeout")]
    pub hook_timeout: u64,
}

fn default_hook_timeout() -> u64 {
    30
}

/// One configured action: a named transition plus the operations attached
/// to it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionSpec {
    /// Programmatic label shown on the action control.
    pub label: String,

    /// Human-facing display name; falls back to the label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Status the action moves the ticket to, for operations that force
    /// state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub newstate: Option<String>,

    /// Operation kinds attached to this action, in execution order.
    #[serde(default)]
    pub operations: Vec<String>,

    /// Free-form operation options (`triage_field`, `clear_fields`, ...).
    #[serde(flatten)]
    pub options: BTreeMap<String, String>,
}

impl ActionSpec {
    /// The display name for hints, falling back to the label.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.label)
    }
}

impl WorkflowConfig {
    /// Load configuration from `workflow.yaml` under the given engine root.
    ///
    /// A missing file yields the default (empty) configuration; a malformed
    /// file is an error.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(WorkflowConfig::default());
        }
        let raw = fs::read_to_string(&path)?;
        Self::from_yaml(&raw)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(raw: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(raw)?)
    }

    /// Read a free-form option for an action, trimmed. Returns `None` when
    /// the action or key is absent, or the value is blank.
    pub fn option(&self, action: &str, key: &str) -> Option<&str> {
        self.actions
            .get(action)
            .and_then(|spec| spec.options.get(key))
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Read a comma-separated option as a list of trimmed, non-empty items.
    pub fn option_list(&self, action: &str, key: &str) -> Vec<String> {
        self.option(action, key)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
hook_timeout: 10
actions:
  reopen:
    label: Reopen
    newstate: reopened
    operations: [reset_milestone]
  cleanup:
    label: Clean up
    operations: [clear_fields]
    clear_fields: "cc , keywords,"
"#;

    #[test]
    fn test_parses_actions_and_options() {
        let config = WorkflowConfig::from_yaml(SAMPLE).unwrap();
        assert_eq!(config.hook_timeout, 10);
        let reopen = &config.actions["reopen"];
        assert_eq!(reopen.label, "Reopen");
        assert_eq!(reopen.newstate.as_deref(), Some("reopened"));
        assert_eq!(reopen.operations, vec!["reset_milestone"]);
    }

    #[test]
    fn test_option_list_trims_and_drops_empty() {
        let config = WorkflowConfig::from_yaml(SAMPLE).unwrap();
        assert_eq!(
            config.option_list("cleanup", "clear_fields"),
            vec!["cc".to_string(), "keywords".to_string()]
        );
        assert!(config.option_list("cleanup", "missing").is_empty());
    }

    #[test]
    fn test_display_name_falls_back_to_label() {
        let config = WorkflowConfig::from_yaml(SAMPLE).unwrap();
        assert_eq!(config.actions["reopen"].display_name(), "Reopen");
    }

    #[test]
    fn test_default_hook_timeout() {
        let config = WorkflowConfig::from_yaml("actions: {}").unwrap();
        assert_eq!(config.hook_timeout, 30);
    }
}
