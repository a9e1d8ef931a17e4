//! Change-notification dispatch.
//!
//! After the cross-reference operation mutates the referenced ticket, it
//! announces the change through the [`Notifier`] trait. Delivery is the
//! host's concern (mail, chat, whatever); the default implementation appends
//! the event to `<root>/notifications.ndjson` in the append-only style of
//! the change log, so external integrations can tail it.
//!
//! Notification failures are always caught and logged by the caller; they
//! must never fail an action that already succeeded.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::error::{GantryError, Result};

/// The file under the engine root where dispatched events are appended.
pub const NOTIFICATIONS_FILE: &str = "notifications.ndjson";

/// What happened to the ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Created,
    Changed,
}

enum_display!(ChangeKind, { Created => "created", Changed => "changed" });

/// A ticket change announcement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketChangeEvent {
    /// What happened.
    pub kind: ChangeKind,
    /// Numeric id of the affected ticket.
    pub ticket: u64,
    /// ISO 8601 timestamp of the change.
    pub timestamp: String,
    /// User who made the change.
    pub author: String,
}

impl TicketChangeEvent {
    /// Build a `changed` event stamped with the given time.
    pub fn changed(ticket: u64, time: Timestamp, author: &str) -> Self {
        TicketChangeEvent {
            kind: ChangeKind::Changed,
            ticket,
            timestamp: iso_timestamp(time),
            author: author.to_string(),
        }
    }
}

/// Format a timestamp as ISO 8601 without fractional seconds.
pub fn iso_timestamp(time: Timestamp) -> String {
    time.strftime("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Dispatch of ticket change events.
pub trait Notifier {
    /// Deliver one event. Errors are logged by the caller and never
    /// propagate past the side-effect phase.
    fn notify(&self, event: &TicketChangeEvent) -> Result<()>;
}

/// Notifier appending events to `notifications.ndjson`.
#[derive(Debug)]
pub struct EventLogNotifier {
    path: PathBuf,
}

impl EventLogNotifier {
    pub fn new(root: &Path) -> Self {
        EventLogNotifier {
            path: root.join(NOTIFICATIONS_FILE),
        }
    }
}

impl Notifier for EventLogNotifier {
    fn notify(&self, event: &TicketChangeEvent) -> Result<()> {
        let line = serde_json::to_string(event)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }
}

/// In-memory notifier recording every dispatched event, for tests and
/// embedding hosts that deliver out-of-band.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    events: Mutex<Vec<TicketChangeEvent>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every event dispatched so far.
    pub fn events(&self) -> Vec<TicketChangeEvent> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, event: &TicketChangeEvent) -> Result<()> {
        self.events
            .lock()
            .map_err(|_| GantryError::Notify("notifier mutex poisoned".to_string()))?
            .push(event.clone());
        Ok(())
    }
}
