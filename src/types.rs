use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::GantryError;

/// Directory under the engine root where action hook scripts live.
pub const HOOKS_DIR: &str = "hooks";

/// Field that holds the ticket's workflow state.
pub const FIELD_STATUS: &str = "status";
/// Field that holds the current assignee.
pub const FIELD_OWNER: &str = "owner";
/// Field that holds the user who filed the ticket.
pub const FIELD_REPORTER: &str = "reporter";
/// Field that names the component the ticket belongs to.
pub const FIELD_COMPONENT: &str = "component";
/// Field that names the milestone the ticket is scheduled for.
pub const FIELD_MILESTONE: &str = "milestone";

/// Status assigned when triage configuration fails to match.
pub const STATUS_NEW: &str = "new";

/// A set of pending field mutations. Empty string means "clear the field".
pub type ChangeSet = BTreeMap<String, String>;

/// Identity of a ticket record.
///
/// A ticket that has not been persisted yet has no number; everything else is
/// addressed by its integer id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TicketId {
    #[default]
    New,
    Existing(u64),
}

impl TicketId {
    /// Returns true once the ticket has been persisted.
    pub fn exists(&self) -> bool {
        matches!(self, TicketId::Existing(_))
    }

    /// The numeric id, if any.
    pub fn number(&self) -> Option<u64> {
        match self {
            TicketId::New => None,
            TicketId::Existing(n) => Some(*n),
        }
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TicketId::New => write!(f, "new"),
            TicketId::Existing(n) => write!(f, "#{}", n),
        }
    }
}

impl FromStr for TicketId {
    type Err = GantryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed == "new" {
            return Ok(TicketId::New);
        }
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        digits
            .parse::<u64>()
            .map(TicketId::Existing)
            .map_err(|_| GantryError::InvalidTicketId(s.to_string()))
    }
}
