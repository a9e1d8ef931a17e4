//! Status-forcing strategies: pushing the ticket into an action's configured
//! state, or back to its previous state.

use crate::error::Result;
use crate::types::{FIELD_STATUS, STATUS_NEW};
use crate::workflow::Action;

use super::{
    ActionControl, ChangeOutcome, Control, OpContext, OpKind, TicketOperation, status_change_hint,
};

/// Sets the ticket status to the action's configured `newstate`, for actions
/// whose other operations would otherwise leave the state untouched.
#[derive(Debug, Clone, Copy)]
pub struct SetState;

impl TicketOperation for SetState {
    fn kind(&self) -> OpKind {
        OpKind::SetState
    }

    fn render(&self, ctx: &OpContext, action: &Action) -> ActionControl {
        let hint = match action.newstate.as_deref() {
            Some(newstate) if newstate != ctx.ticket.get(FIELD_STATUS) => {
                status_change_hint(ctx, newstate)
            }
            _ => String::new(),
        };
        ActionControl {
            // This operation presents the action's display name, not its
            // programmatic label.
            label: action.display_name.clone(),
            control: Control::None,
            hint,
        }
    }

    fn compute_changes(&self, ctx: &mut OpContext, action: &Action) -> Result<ChangeOutcome> {
        match action.newstate.as_deref() {
            Some(newstate) if newstate != ctx.ticket.get(FIELD_STATUS) => {
                Ok(ChangeOutcome::change(FIELD_STATUS, newstate))
            }
            Some(_) => Ok(ChangeOutcome::none()),
            None => {
                tracing::error!("Action '{}' has no newstate for set_state", action.name);
                Ok(ChangeOutcome::none())
            }
        }
    }
}

/// Sets the status back to the previous status, per the change history.
///
/// With no history row for `status` the ticket falls back to `new`.
#[derive(Debug, Clone, Copy)]
pub struct StatusPrevious;

impl StatusPrevious {
    fn new_status(&self, ctx: &OpContext) -> String {
        ctx.ticket
            .id()
            .number()
            .and_then(|id| ctx.history.last_field_value(id, FIELD_STATUS))
            .unwrap_or_else(|| STATUS_NEW.to_string())
    }
}

impl TicketOperation for StatusPrevious {
    fn kind(&self) -> OpKind {
        OpKind::StatusPrevious
    }

    fn render(&self, ctx: &OpContext, action: &Action) -> ActionControl {
        let new_status = self.new_status(ctx);
        // Compare against the pre-edit status so a preview of this very
        // action does not hide the hint.
        let hint = if new_status != ctx.ticket.old_value(FIELD_STATUS) {
            format!("The status will be changed to {new_status}.")
        } else {
            String::new()
        };
        ActionControl {
            label: action.label.clone(),
            control: Control::None,
            hint,
        }
    }

    fn compute_changes(&self, ctx: &mut OpContext, _action: &Action) -> Result<ChangeOutcome> {
        Ok(ChangeOutcome::change(FIELD_STATUS, &self.new_status(ctx)))
    }
}
