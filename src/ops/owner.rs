//! Owner-resolution strategies: four interchangeable ways to compute a new
//! `owner` value when an action runs.

use crate::error::Result;
use crate::types::{FIELD_COMPONENT, FIELD_OWNER, FIELD_REPORTER};
use crate::workflow::Action;

use super::{
    ActionControl, ChangeOutcome, Control, OpContext, OpKind, TicketOperation, owner_change_hint,
};

/// Sets the owner to the reporter of the ticket.
///
/// ```yaml
/// needinfo:
///   label: Need info
///   operations: [set_owner_to_reporter]
/// ```
#[derive(Debug, Clone, Copy)]
pub struct OwnerReporter;

impl TicketOperation for OwnerReporter {
    fn kind(&self) -> OpKind {
        OpKind::OwnerReporter
    }

    fn render(&self, ctx: &OpContext, action: &Action) -> ActionControl {
        ActionControl {
            label: action.label.clone(),
            control: Control::None,
            hint: owner_change_hint(ctx, ctx.ticket.get(FIELD_REPORTER)),
        }
    }

    fn compute_changes(&self, ctx: &mut OpContext, _action: &Action) -> Result<ChangeOutcome> {
        Ok(ChangeOutcome::change(
            FIELD_OWNER,
            ctx.ticket.get(FIELD_REPORTER),
        ))
    }
}

/// Sets the owner to the default owner of the ticket's component.
///
/// A component that does not exist is logged as a warning and treated as
/// "delete the owner", never as an error.
#[derive(Debug, Clone, Copy)]
pub struct OwnerComponent;

impl OwnerComponent {
    fn new_owner(&self, ctx: &OpContext) -> String {
        let component = ctx.ticket.get(FIELD_COMPONENT);
        match ctx.directory.component(component) {
            Some(entry) => entry.owner,
            None => {
                tracing::warn!(
                    "In {}, component '{component}' does not exist",
                    self.kind()
                );
                String::new()
            }
        }
    }
}

impl TicketOperation for OwnerComponent {
    fn kind(&self) -> OpKind {
        OpKind::OwnerComponent
    }

    fn render(&self, ctx: &OpContext, action: &Action) -> ActionControl {
        ActionControl {
            label: action.label.clone(),
            control: Control::None,
            hint: owner_change_hint(ctx, &self.new_owner(ctx)),
        }
    }

    fn compute_changes(&self, ctx: &mut OpContext, _action: &Action) -> Result<ChangeOutcome> {
        Ok(ChangeOutcome::change(FIELD_OWNER, &self.new_owner(ctx)))
    }
}

/// Sets the owner to the value of an arbitrary ticket field.
///
/// ```yaml
/// handoff:
///   label: Hand off
///   operations: [set_owner_to_field]
///   set_owner_to_field: myfield
/// ```
#[derive(Debug, Clone, Copy)]
pub struct OwnerField;

impl OwnerField {
    fn new_owner(&self, ctx: &OpContext, action: &Action) -> String {
        let Some(field) = ctx.config.option(&action.name, "set_owner_to_field") else {
            tracing::error!(
                "Missing 'set_owner_to_field' option for action '{}'",
                action.name
            );
            return String::new();
        };
        ctx.ticket.get(field).to_string()
    }
}

impl TicketOperation for OwnerField {
    fn kind(&self) -> OpKind {
        OpKind::OwnerField
    }

    fn render(&self, ctx: &OpContext, action: &Action) -> ActionControl {
        ActionControl {
            label: action.label.clone(),
            control: Control::None,
            hint: owner_change_hint(ctx, &self.new_owner(ctx, action)),
        }
    }

    fn compute_changes(&self, ctx: &mut OpContext, action: &Action) -> Result<ChangeOutcome> {
        Ok(ChangeOutcome::change(
            FIELD_OWNER,
            &self.new_owner(ctx, action),
        ))
    }
}

/// Sets the owner back to the previous owner, per the change history.
///
/// With no history row for `owner` the current owner is kept (no change).
#[derive(Debug, Clone, Copy)]
pub struct OwnerPrevious;

impl OwnerPrevious {
    fn new_owner(&self, ctx: &OpContext) -> String {
        ctx.ticket
            .id()
            .number()
            .and_then(|id| ctx.history.last_field_value(id, FIELD_OWNER))
            .unwrap_or_else(|| ctx.ticket.get(FIELD_OWNER).to_string())
    }
}

impl TicketOperation for OwnerPrevious {
    fn kind(&self) -> OpKind {
        OpKind::OwnerPrevious
    }

    fn render(&self, ctx: &OpContext, action: &Action) -> ActionControl {
        ActionControl {
            label: action.label.clone(),
            control: Control::None,
            hint: owner_change_hint(ctx, &self.new_owner(ctx)),
        }
    }

    fn compute_changes(&self, ctx: &mut OpContext, _action: &Action) -> Result<ChangeOutcome> {
        Ok(ChangeOutcome::change(FIELD_OWNER, &self.new_owner(ctx)))
    }
}
