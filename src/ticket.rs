//! The mutable ticket record that workflow operations act on.
//!
//! Tickets are loaded by the host before the engine is invoked; the engine
//! only reads fields and applies merged change-sets. The record keeps an
//! "old value" snapshot for each field changed during the current edit so
//! operations can distinguish the pre-edit state (e.g. the previous-status
//! strategy compares against the status the ticket arrived with).

use std::collections::{BTreeMap, HashMap};

use crate::types::{ChangeSet, TicketId};

/// A ticket record: identity plus an ordered mapping of field name to value.
#[derive(Debug, Clone, Default)]
pub struct Ticket {
    id: TicketId,
    fields: BTreeMap<String, String>,
    old: HashMap<String, String>,
}

impl Ticket {
    /// Create an empty, not-yet-persisted ticket.
    pub fn new() -> Self {
        Ticket {
            id: TicketId::New,
            fields: BTreeMap::new(),
            old: HashMap::new(),
        }
    }

    /// Create a persisted ticket with the given id.
    pub fn existing(number: u64) -> Self {
        Ticket {
            id: TicketId::Existing(number),
            fields: BTreeMap::new(),
            old: HashMap::new(),
        }
    }

    /// Builder-style field initialization; does not record an old value.
    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.fields.insert(name.to_string(), value.to_string());
        self
    }

    pub fn id(&self) -> TicketId {
        self.id
    }

    /// Whether this ticket has been persisted.
    pub fn exists(&self) -> bool {
        self.id.exists()
    }

    /// Read a field value. Absent fields read as the empty string.
    pub fn get(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    /// Whether the ticket carries a field of this name.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Set a field, recording its pre-edit value the first time it changes
    /// within this edit.
    pub fn set(&mut self, name: &str, value: &str) {
        let previous = self.get(name).to_string();
        if previous != value && !self.old.contains_key(name) {
            self.old.insert(name.to_string(), previous);
        }
        self.fields.insert(name.to_string(), value.to_string());
    }

    /// The value a field had before the current edit, falling back to the
    /// current value when the field is untouched.
    pub fn old_value(&self, name: &str) -> &str {
        self.old
            .get(name)
            .map(String::as_str)
            .unwrap_or_else(|| self.get(name))
    }

    /// Apply a merged change-set in field order.
    pub fn apply(&mut self, changes: &ChangeSet) {
        for (field, value) in changes {
            self.set(field, value);
        }
    }

    /// Iterate over fields in order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_reads_empty() {
        let ticket = Ticket::existing(1);
        assert_eq!(ticket.get("owner"), "");
    }

    #[test]
    fn test_set_records_old_value_once() {
        let mut ticket = Ticket::existing(1).with_field("status", "assigned");
        ticket.set("status", "closed");
        ticket.set("status", "reopened");
        assert_eq!(ticket.get("status"), "reopened");
        assert_eq!(ticket.old_value("status"), "assigned");
    }

    #[test]
    fn test_old_value_falls_back_to_current() {
        let ticket = Ticket::existing(1).with_field("owner", "alice");
        assert_eq!(ticket.old_value("owner"), "alice");
    }

    #[test]
    fn test_apply_change_set() {
        let mut ticket = Ticket::existing(1)
            .with_field("owner", "alice")
            .with_field("cc", "bob");
        let mut changes = ChangeSet::new();
        changes.insert("owner".to_string(), "carol".to_string());
        changes.insert("cc".to_string(), String::new());
        ticket.apply(&changes);
        assert_eq!(ticket.get("owner"), "carol");
        assert_eq!(ticket.get("cc"), "");
        assert_eq!(ticket.old_value("owner"), "alice");
    }
}
