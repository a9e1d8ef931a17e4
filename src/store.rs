//! The ticket persistence seam.
//!
//! Loading and saving tickets belongs to the host; the engine only needs to
//! check that a cross-referenced ticket exists and to append a comment to it
//! through the referenced ticket's own save path. [`MemoryStore`] backs the
//! test suite and embedding hosts without their own storage.

use std::collections::HashMap;
use std::sync::Mutex;

use jiff::Timestamp;

use crate::error::{GantryError, Result};
use crate::notify::iso_timestamp;
use crate::ticket::Ticket;

/// A comment attached to a ticket by the cross-reference side effect.
#[derive(Debug, Clone)]
pub struct Comment {
    pub author: String,
    pub text: String,
    /// ISO 8601 timestamp.
    pub timestamp: String,
}

/// Host-side ticket storage.
pub trait TicketStore {
    /// Load a ticket by numeric id.
    fn load(&self, id: u64) -> Result<Ticket>;

    /// Append a comment to a ticket via its own save path.
    fn add_comment(&self, id: u64, author: &str, comment: &str, time: Timestamp) -> Result<()>;
}

/// In-memory ticket storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    tickets: HashMap<u64, Ticket>,
    comments: HashMap<u64, Vec<Comment>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) a ticket.
    pub fn insert(&self, ticket: Ticket) {
        if let Some(id) = ticket.id().number() {
            self.lock().tickets.insert(id, ticket);
        }
    }

    /// Comments appended to a ticket so far.
    pub fn comments_for(&self, id: u64) -> Vec<Comment> {
        self.lock().comments.get(&id).cloned().unwrap_or_default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl TicketStore for MemoryStore {
    fn load(&self, id: u64) -> Result<Ticket> {
        self.lock()
            .tickets
            .get(&id)
            .cloned()
            .ok_or_else(|| GantryError::TicketNotFound(format!("#{id}")))
    }

    fn add_comment(&self, id: u64, author: &str, comment: &str, time: Timestamp) -> Result<()> {
        let mut inner = self.lock();
        if !inner.tickets.contains_key(&id) {
            return Err(GantryError::TicketNotFound(format!("#{id}")));
        }
        inner.comments.entry(id).or_default().push(Comment {
            author: author.to_string(),
            text: comment.to_string(),
            timestamp: iso_timestamp(time),
        });
        Ok(())
    }
}
