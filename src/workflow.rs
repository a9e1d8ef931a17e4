//! The action registry: configured actions resolved into their operation
//! kinds.
//!
//! Which action is offered for a given ticket status is the host's workflow
//! definition's concern; this registry only answers what a named action does
//! and which actions carry a given operation.

use std::collections::BTreeMap;
use std::str::FromStr;

use crate::config::WorkflowConfig;
use crate::error::Result;
use crate::ops::OpKind;

/// A named transition with its attached operations, immutable for the
/// duration of one invocation.
#[derive(Debug, Clone)]
pub struct Action {
    /// Programmatic action name (the config key).
    pub name: String,
    /// Label shown on the action control.
    pub label: String,
    /// Human-facing display name.
    pub display_name: String,
    /// Status this action forces, when configured.
    pub newstate: Option<String>,
    /// Attached operations in execution order.
    pub operations: Vec<OpKind>,
}

/// Registry of configured actions.
#[derive(Debug, Clone, Default)]
pub struct Workflow {
    actions: BTreeMap<String, Action>,
}

impl Workflow {
    /// Resolve a configuration into a registry, validating every operation
    /// kind up front.
    pub fn from_config(config: &WorkflowConfig) -> Result<Self> {
        let mut actions = BTreeMap::new();
        for (name, spec) in &config.actions {
            let operations = spec
                .operations
                .iter()
                .map(|raw| OpKind::from_str(raw))
                .collect::<Result<Vec<_>>>()?;
            actions.insert(
                name.clone(),
                Action {
                    name: name.clone(),
                    label: spec.label.clone(),
                    display_name: spec.display_name().to_string(),
                    newstate: spec.newstate.clone(),
                    operations,
                },
            );
        }
        Ok(Workflow { actions })
    }

    /// Look up an action by name.
    pub fn action(&self, name: &str) -> Option<&Action> {
        self.actions.get(name)
    }

    /// All action names carrying the given operation, in registry order.
    pub fn actions_with_operation(&self, kind: OpKind) -> Vec<&str> {
        self.actions
            .values()
            .filter(|action| action.operations.contains(&kind))
            .map(|action| action.name.as_str())
            .collect()
    }

    /// Iterate over all configured actions.
    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.actions.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Workflow {
        let config = WorkflowConfig::from_yaml(
            r#"
actions:
  needinfo:
    label: Need info
    operations: [set_owner_to_reporter]
  reopen:
    label: Reopen
    newstate: reopened
    operations: [reset_milestone, set_state]
"#,
        )
        .unwrap();
        Workflow::from_config(&config).unwrap()
    }

    #[test]
    fn test_resolves_operation_kinds() {
        let workflow = sample();
        let reopen = workflow.action("reopen").unwrap();
        assert_eq!(
            reopen.operations,
            vec![OpKind::ResetMilestone, OpKind::SetState]
        );
    }

    #[test]
    fn test_actions_with_operation() {
        let workflow = sample();
        assert_eq!(
            workflow.actions_with_operation(OpKind::OwnerReporter),
            vec!["needinfo"]
        );
        assert!(workflow.actions_with_operation(OpKind::Triage).is_empty());
    }

    #[test]
    fn test_unknown_operation_is_rejected() {
        let config = WorkflowConfig::from_yaml(
            "actions:\n  bad:\n    label: Bad\n    operations: [no_such_op]\n",
        )
        .unwrap();
        assert!(Workflow::from_config(&config).is_err());
    }
}
