//! Gantry: a pluggable workflow operation engine for ticket transitions.
//!
//! Given a ticket, a requested action, and a declarative configuration,
//! the engine computes the field mutations to apply and executes any side
//! effects (external scripts, cross-ticket references). Persistence,
//! request handling, and notification delivery stay with the host; gantry
//! consumes them through small traits.

#[macro_use]
mod macros;

pub mod config;
pub mod directory;
pub mod engine;
pub mod error;
pub mod form;
pub mod history;
pub mod notify;
pub mod ops;
pub mod store;
pub mod ticket;
pub mod types;
pub mod workflow;

pub use config::{ActionSpec, WorkflowConfig};
pub use directory::{Component, Directory, Milestone, Roster};
pub use engine::{Engine, Transition};
pub use error::{GantryError, Result};
pub use form::{FormValues, xref_key};
pub use history::{EventLogHistory, FieldChange, History, MemoryHistory};
pub use notify::{ChangeKind, EventLogNotifier, MemoryNotifier, Notifier, TicketChangeEvent};
pub use ops::{ActionControl, ChangeOutcome, Control, OpContext, OpKind, TicketOperation, WorkflowOp};
pub use store::{Comment, MemoryStore, TicketStore};
pub use ticket::Ticket;
pub use types::{ChangeSet, TicketId};
pub use workflow::{Action, Workflow};
