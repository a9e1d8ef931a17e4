//! The pluggable workflow operations.
//!
//! Every operation is a self-contained strategy attached to an action by
//! configuration. The contract has three phases:
//!
//! 1. `render` — produce the action's label, an optional input control, and
//!    a hint describing the prospective effect. Read-only; safe to call
//!    repeatedly in preview mode.
//! 2. `compute_changes` — produce the field mutations this operation wants,
//!    or defer the submission with a user-facing warning. Pure given the
//!    context, with one documented exception: the cross-reference operation
//!    appends to the submitted comment in the form values.
//! 3. `apply_side_effects` — run after the primary ticket has been saved.
//!    Only the external-process and cross-reference operations have real
//!    side effects; failures here are logged by the engine and never roll
//!    back the primary change.
//!
//! The set is closed: operations are a tagged enum dispatched through the
//! shared trait, selected per-action by their configuration key.

mod external;
mod fields;
mod milestone;
mod owner;
mod status;
mod triage;
mod xref;

pub use external::RunExternal;
pub use fields::{ClearFields, FieldAuthor};
pub use milestone::ResetMilestone;
pub use owner::{OwnerComponent, OwnerField, OwnerPrevious, OwnerReporter};
pub use status::{SetState, StatusPrevious};
pub use triage::Triage;
pub use xref::XRef;

use std::path::Path;

use enum_dispatch::enum_dispatch;

use crate::config::WorkflowConfig;
use crate::directory::Directory;
use crate::error::{GantryError, Result};
use crate::form::FormValues;
use crate::history::History;
use crate::notify::Notifier;
use crate::store::TicketStore;
use crate::ticket::Ticket;
use crate::types::ChangeSet;
use crate::workflow::{Action, Workflow};

/// Configuration keys for the closed set of operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    OwnerReporter,
    OwnerComponent,
    OwnerField,
    OwnerPrevious,
    FieldAuthor,
    ClearFields,
    SetState,
    StatusPrevious,
    Triage,
    ResetMilestone,
    RunExternal,
    XRef,
}

enum_display_fromstr!(
    OpKind,
    GantryError::UnknownOperation,
    {
        OwnerReporter => "set_owner_to_reporter",
        OwnerComponent => "set_owner_to_component_owner",
        OwnerField => "set_owner_to_field",
        OwnerPrevious => "set_owner_to_previous",
        FieldAuthor => "set_field_to_author",
        ClearFields => "clear_fields",
        SetState => "set_state",
        StatusPrevious => "set_status_to_previous",
        Triage => "triage",
        ResetMilestone => "reset_milestone",
        RunExternal => "run_external",
        XRef => "xref",
    }
);

/// The input control an operation contributes to the action's form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Control {
    /// No input needed.
    #[default]
    None,
    /// A single-line text input.
    TextInput {
        /// Form key the submitted value arrives under.
        id: String,
        /// Pre-populated value, typically from a previous submission.
        value: String,
    },
}

/// What one operation renders for an action: label, control, hint.
#[derive(Debug, Clone)]
pub struct ActionControl {
    pub label: String,
    pub control: Control,
    pub hint: String,
}

/// Result of an operation's change computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// Field mutations to merge into the action's change-set.
    Applied(ChangeSet),
    /// The submission must not be persisted this round; the warning is
    /// surfaced to the user.
    Deferred { warning: String },
}

impl ChangeOutcome {
    /// An applied outcome with no field mutations.
    pub fn none() -> Self {
        ChangeOutcome::Applied(ChangeSet::new())
    }

    /// An applied outcome with a single field mutation.
    pub fn change(field: &str, value: &str) -> Self {
        let mut changes = ChangeSet::new();
        changes.insert(field.to_string(), value.to_string());
        ChangeOutcome::Applied(changes)
    }
}

/// Everything an operation may consult during one invocation.
///
/// All collaborators are threaded in explicitly; operations hold no state of
/// their own.
pub struct OpContext<'a> {
    /// The ticket being transitioned.
    pub ticket: &'a Ticket,
    /// The authenticated username performing the action.
    pub author: &'a str,
    /// Submitted form values, including the preview flag.
    pub form: &'a mut FormValues,
    pub config: &'a WorkflowConfig,
    pub workflow: &'a Workflow,
    pub store: &'a dyn TicketStore,
    pub history: &'a dyn History,
    pub directory: &'a dyn Directory,
    pub notifier: &'a dyn Notifier,
    /// Engine root under which `hooks/` scripts are resolved.
    pub root: &'a Path,
}

/// The shared operation contract.
#[enum_dispatch]
pub trait TicketOperation {
    /// This operation's configuration key.
    fn kind(&self) -> OpKind;

    /// Actions that carry this operation, in registry order.
    fn actions_using(&self, workflow: &Workflow) -> Vec<String> {
        workflow
            .actions_with_operation(self.kind())
            .into_iter()
            .map(String::from)
            .collect()
    }

    /// Render the action control for this operation. Read-only.
    fn render(&self, ctx: &OpContext, action: &Action) -> ActionControl {
        let _ = ctx;
        ActionControl {
            label: action.label.clone(),
            control: Control::None,
            hint: String::new(),
        }
    }

    /// Compute the field mutations this operation contributes, or defer the
    /// submission.
    fn compute_changes(&self, ctx: &mut OpContext, action: &Action) -> Result<ChangeOutcome>;

    /// Execute this operation's side effects, strictly after the primary
    /// ticket has been saved. Default: nothing to do.
    fn apply_side_effects(&self, ctx: &OpContext, action: &Action) -> Result<()> {
        let _ = (ctx, action);
        Ok(())
    }
}

/// The closed set of workflow operations.
#[enum_dispatch(TicketOperation)]
#[derive(Debug, Clone)]
pub enum WorkflowOp {
    OwnerReporter,
    OwnerComponent,
    OwnerField,
    OwnerPrevious,
    FieldAuthor,
    ClearFields,
    SetState,
    StatusPrevious,
    Triage,
    ResetMilestone,
    RunExternal,
    XRef,
}

impl WorkflowOp {
    /// Instantiate the operation for a configuration key.
    pub fn from_kind(kind: OpKind) -> Self {
        match kind {
            OpKind::OwnerReporter => WorkflowOp::OwnerReporter(OwnerReporter),
            OpKind::OwnerComponent => WorkflowOp::OwnerComponent(OwnerComponent),
            OpKind::OwnerField => WorkflowOp::OwnerField(OwnerField),
            OpKind::OwnerPrevious => WorkflowOp::OwnerPrevious(OwnerPrevious),
            OpKind::FieldAuthor => WorkflowOp::FieldAuthor(FieldAuthor),
            OpKind::ClearFields => WorkflowOp::ClearFields(ClearFields),
            OpKind::SetState => WorkflowOp::SetState(SetState),
            OpKind::StatusPrevious => WorkflowOp::StatusPrevious(StatusPrevious),
            OpKind::Triage => WorkflowOp::Triage(Triage),
            OpKind::ResetMilestone => WorkflowOp::ResetMilestone(ResetMilestone),
            OpKind::RunExternal => WorkflowOp::RunExternal(RunExternal),
            OpKind::XRef => WorkflowOp::XRef(XRef),
        }
    }
}

/// Hint for a prospective owner change. Empty new owner means the owner is
/// being deleted.
pub(crate) fn owner_change_hint(ctx: &OpContext, new_owner: &str) -> String {
    if new_owner.is_empty() {
        "The owner will be deleted.".to_string()
    } else {
        format!(
            "The owner will be changed from {} to {}.",
            ctx.directory
                .display_name(ctx.ticket.get(crate::types::FIELD_OWNER)),
            ctx.directory.display_name(new_owner)
        )
    }
}

/// Hint for a prospective status change, phrased for new vs existing
/// tickets.
pub(crate) fn status_change_hint(ctx: &OpContext, status: &str) -> String {
    if ctx.ticket.get(crate::types::FIELD_STATUS).is_empty() {
        format!("The status will be '{status}'")
    } else {
        format!("Next status will be '{status}'")
    }
}

/// Substitute the first `%s` in a configured template.
pub(crate) fn expand_template(template: &str, arg: &str) -> String {
    template.replacen("%s", arg, 1)
}
