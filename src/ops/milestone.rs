//! Milestone reset: detach the ticket from a milestone that has already been
//! completed. Typically attached to reopen actions so a reopened ticket does
//! not stay pinned to a closed milestone.

use crate::directory::Milestone;
use crate::error::Result;
use crate::types::FIELD_MILESTONE;
use crate::workflow::Action;

use super::{ActionControl, ChangeOutcome, Control, OpContext, OpKind, TicketOperation};

/// Resets the ticket milestone if it is assigned to a completed milestone.
///
/// ```yaml
/// reopened:
///   label: Reopen
///   newstate: reopened
///   operations: [reset_milestone]
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ResetMilestone;

impl ResetMilestone {
    /// The assigned milestone, tolerating "does not exist" by logging and
    /// treating it as absent.
    fn fetch_milestone(&self, ctx: &OpContext) -> Option<Milestone> {
        let name = ctx.ticket.get(FIELD_MILESTONE);
        if name.is_empty() {
            return None;
        }
        let milestone = ctx.directory.milestone(name);
        if milestone.is_none() {
            tracing::warn!("In {}, milestone '{name}' does not exist", self.kind());
        }
        milestone
    }
}

impl TicketOperation for ResetMilestone {
    fn kind(&self) -> OpKind {
        OpKind::ResetMilestone
    }

    fn render(&self, ctx: &OpContext, action: &Action) -> ActionControl {
        let hint = match self.fetch_milestone(ctx) {
            Some(milestone) if milestone.completed => "The milestone will be reset.".to_string(),
            _ => String::new(),
        };
        ActionControl {
            label: action.label.clone(),
            control: Control::None,
            hint,
        }
    }

    fn compute_changes(&self, ctx: &mut OpContext, _action: &Action) -> Result<ChangeOutcome> {
        match self.fetch_milestone(ctx) {
            Some(milestone) if milestone.completed => {
                Ok(ChangeOutcome::change(FIELD_MILESTONE, ""))
            }
            _ => Ok(ChangeOutcome::none()),
        }
    }
}
