//! Triage: splitting one action into different resulting statuses based on
//! a ticket field.

use crate::error::Result;
use crate::types::{FIELD_STATUS, STATUS_NEW};
use crate::workflow::Action;

use super::{ActionControl, ChangeOutcome, Control, OpContext, OpKind, TicketOperation};

/// Splits a workflow on a field value.
///
/// ```yaml
/// triage:
///   label: Triage
///   operations: [triage]
///   triage_field: type
///   triage_split: "defect -> new_defect, task -> new_task"
/// ```
///
/// The transition table is a comma-separated list of `value -> status`
/// clauses, evaluated in declared order; the first exact match wins. An
/// unmatched value or a malformed table is a configuration error and
/// defaults to `new`.
#[derive(Debug, Clone, Copy)]
pub struct Triage;

impl Triage {
    fn new_status(&self, ctx: &OpContext, action: &Action) -> String {
        let field = ctx.config.option(&action.name, "triage_field").unwrap_or("");
        let table = ctx.config.option(&action.name, "triage_split").unwrap_or("");
        let current = ctx.ticket.get(field).trim();

        for clause in table.split(',').map(str::trim).filter(|c| !c.is_empty()) {
            let mut parts = clause.splitn(2, "->");
            let (Some(value), Some(status)) = (parts.next(), parts.next()) else {
                // Clause without an arrow; fall through to the config error
                // below rather than matching garbage.
                continue;
            };
            if value.trim() == current {
                return status.trim().to_string();
            }
        }

        tracing::error!(
            "Bad configuration for 'triage' operation in action '{}'",
            action.name
        );
        STATUS_NEW.to_string()
    }
}

impl TicketOperation for Triage {
    fn kind(&self) -> OpKind {
        OpKind::Triage
    }

    fn render(&self, ctx: &OpContext, action: &Action) -> ActionControl {
        let new_status = self.new_status(ctx, action);
        let hint = if !ctx.ticket.exists() {
            format!("The status will be '{new_status}'.")
        } else if new_status != ctx.ticket.get(FIELD_STATUS) {
            format!("Next status will be '{new_status}'.")
        } else {
            String::new()
        };
        ActionControl {
            label: action.label.clone(),
            control: Control::None,
            hint,
        }
    }

    fn compute_changes(&self, ctx: &mut OpContext, action: &Action) -> Result<ChangeOutcome> {
        Ok(ChangeOutcome::change(
            FIELD_STATUS,
            &self.new_status(ctx, action),
        ))
    }
}
