//! Field mutation strategies: stamping the acting user into a field and
//! clearing configured fields.

use crate::error::Result;
use crate::types::ChangeSet;
use crate::workflow::Action;

use super::{ActionControl, ChangeOutcome, Control, OpContext, OpKind, TicketOperation};

/// Sets a configured ticket field to the acting user.
///
/// ```yaml
/// review:
///   label: Request review
///   operations: [set_field_to_author]
///   set_field_to_author: reviewer
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FieldAuthor;

impl FieldAuthor {
    fn field_name<'a>(&self, ctx: &'a OpContext, action: &Action) -> Option<&'a str> {
        let field = ctx.config.option(&action.name, "set_field_to_author");
        if field.is_none() {
            tracing::error!(
                "Missing 'set_field_to_author' option for action '{}'",
                action.name
            );
        }
        field
    }
}

impl TicketOperation for FieldAuthor {
    fn kind(&self) -> OpKind {
        OpKind::FieldAuthor
    }

    fn render(&self, ctx: &OpContext, action: &Action) -> ActionControl {
        let hint = match self.field_name(ctx, action) {
            Some(field) => format!(
                "The '{field}' field will be set to '{}'.",
                ctx.author
            ),
            None => String::new(),
        };
        ActionControl {
            label: action.label.clone(),
            control: Control::None,
            hint,
        }
    }

    fn compute_changes(&self, ctx: &mut OpContext, action: &Action) -> Result<ChangeOutcome> {
        match self.field_name(ctx, action) {
            Some(field) => Ok(ChangeOutcome::change(field, ctx.author)),
            None => Ok(ChangeOutcome::none()),
        }
    }
}

/// Clears the configured ticket field(s).
///
/// ```yaml
/// cleanup:
///   label: Clean up
///   operations: [clear_fields]
///   clear_fields: myfield_one, myfield_two
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ClearFields;

impl TicketOperation for ClearFields {
    fn kind(&self) -> OpKind {
        OpKind::ClearFields
    }

    fn render(&self, ctx: &OpContext, action: &Action) -> ActionControl {
        let fields = ctx.config.option_list(&action.name, "clear_fields");
        let quoted: Vec<String> = fields.iter().map(|f| format!("'{f}'")).collect();
        let hint = if quoted.is_empty() {
            String::new()
        } else if quoted.len() == 1 {
            format!("The {} field will be cleared.", quoted[0])
        } else {
            format!("The {} fields will be cleared.", quoted.join(", "))
        };
        ActionControl {
            label: action.label.clone(),
            control: Control::None,
            hint,
        }
    }

    fn compute_changes(&self, ctx: &mut OpContext, action: &Action) -> Result<ChangeOutcome> {
        let mut changes = ChangeSet::new();
        for field in ctx.config.option_list(&action.name, "clear_fields") {
            changes.insert(field, String::new());
        }
        Ok(ChangeOutcome::Applied(changes))
    }
}
