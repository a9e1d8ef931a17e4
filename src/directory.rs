//! Lookups for the entities tickets reference by name: components,
//! milestones, and user display names.
//!
//! These belong to the host's data model; the engine consumes them through
//! the [`Directory`] trait. [`Roster`] is a serde-loadable implementation for
//! hosts that keep the lists in a YAML file, and doubles as the test fixture.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A component with a default owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    /// Default owner assigned by the component-owner strategy.
    #[serde(default)]
    pub owner: String,
}

/// A milestone, possibly already completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    /// True once the milestone has been closed out.
    #[serde(default)]
    pub completed: bool,
}

/// Entity lookups scoped to one host installation.
pub trait Directory {
    /// The component with this name, if it exists.
    fn component(&self, name: &str) -> Option<Component>;

    /// The milestone with this name, if it exists.
    fn milestone(&self, name: &str) -> Option<Milestone>;

    /// Human-facing rendering of a username. The default is the username
    /// itself.
    fn display_name(&self, username: &str) -> String {
        username.to_string()
    }
}

/// Directory backed by in-memory maps, deserializable from YAML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub components: BTreeMap<String, Component>,
    #[serde(default)]
    pub milestones: BTreeMap<String, Milestone>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style component registration.
    pub fn with_component(mut self, name: &str, owner: &str) -> Self {
        self.components.insert(
            name.to_string(),
            Component {
                owner: owner.to_string(),
            },
        );
        self
    }

    /// Builder-style milestone registration.
    pub fn with_milestone(mut self, name: &str, completed: bool) -> Self {
        self.milestones
            .insert(name.to_string(), Milestone { completed });
        self
    }
}

impl Directory for Roster {
    fn component(&self, name: &str) -> Option<Component> {
        self.components.get(name).cloned()
    }

    fn milestone(&self, name: &str) -> Option<Milestone> {
        self.milestones.get(name).cloned()
    }
}
