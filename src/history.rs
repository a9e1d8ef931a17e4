//! Prior-value queries against the ticket change history.
//!
//! The previous-owner and previous-status strategies need the most recent
//! pre-change value of a single field. The host usually owns that history;
//! the engine consumes it through the [`History`] trait. An NDJSON-backed
//! implementation reading the change log at `<root>/changes.ndjson` is
//! provided, along with an in-memory one for tests.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// The file under the engine root that records field changes, one JSON
/// object per line, oldest first.
pub const CHANGES_FILE: &str = "changes.ndjson";

/// One recorded field change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldChange {
    /// Numeric id of the changed ticket.
    pub ticket: u64,
    /// Name of the changed field.
    pub field: String,
    /// Value the field held before the change.
    pub old_value: String,
    /// Value the field was changed to.
    pub new_value: String,
    /// ISO 8601 timestamp of the change.
    pub timestamp: String,
}

/// Query for the most recent prior value of a named ticket field.
pub trait History {
    /// The value the field held before its most recent change, or `None`
    /// when the field has never changed.
    fn last_field_value(&self, ticket: u64, field: &str) -> Option<String>;
}

/// History backed by the NDJSON change log.
#[derive(Debug, Clone)]
pub struct EventLogHistory {
    path: PathBuf,
}

impl EventLogHistory {
    /// Create a history reader for the change log under the given engine
    /// root.
    pub fn new(root: &Path) -> Self {
        EventLogHistory {
            path: root.join(CHANGES_FILE),
        }
    }
}

impl History for EventLogHistory {
    fn last_field_value(&self, ticket: u64, field: &str) -> Option<String> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("Failed to read change log {}: {e}", self.path.display());
                return None;
            }
        };

        // Lines are appended oldest-first; the last match is the most
        // recent change.
        let mut found = None;
        for (lineno, line) in raw.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<FieldChange>(line) {
                Ok(change) if change.ticket == ticket && change.field == field => {
                    found = Some(change.old_value);
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(
                        "Skipping malformed change log line {}: {e}",
                        lineno + 1
                    );
                }
            }
        }
        found
    }
}

/// In-memory history, ordered oldest-first.
#[derive(Debug, Clone, Default)]
pub struct MemoryHistory {
    rows: Vec<FieldChange>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a change row.
    pub fn record(&mut self, ticket: u64, field: &str, old_value: &str, new_value: &str) {
        self.rows.push(FieldChange {
            ticket,
            field: field.to_string(),
            old_value: old_value.to_string(),
            new_value: new_value.to_string(),
            timestamp: String::new(),
        });
    }
}

impl History for MemoryHistory {
    fn last_field_value(&self, ticket: u64, field: &str) -> Option<String> {
        self.rows
            .iter()
            .rev()
            .find(|row| row.ticket == ticket && row.field == field)
            .map(|row| row.old_value.clone())
    }
}
