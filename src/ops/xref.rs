//! Cross-reference: link two tickets by commenting on both and notifying
//! about the second.
//!
//! The contract spans two phases. `compute_changes` runs before the primary
//! ticket is saved: it validates the submitted reference and, when valid,
//! appends the local sentence to the submitted comment; invalid input defers
//! the whole submission so nothing is persisted that round.
//! `apply_side_effects` runs after the primary save: it re-reads the
//! reference from the form, comments on the referenced ticket through its
//! own save path, and dispatches a change notification for it.
//!
//! The side-effect phase deliberately re-parses the form value instead of
//! caching the validated id, so its correctness depends on the engine never
//! reaching phase two when phase one deferred (or was skipped in preview).
//! The engine guarantees that ordering; phase two still checks and logs
//! rather than assuming.

use jiff::Timestamp;

use crate::error::Result;
use crate::form::xref_key;
use crate::notify::TicketChangeEvent;
use crate::workflow::Action;

use super::{
    ActionControl, ChangeOutcome, Control, OpContext, OpKind, TicketOperation, expand_template,
};

const DEFAULT_HINT: &str = "The specified ticket will be cross-referenced with this ticket.";
const DEFAULT_LOCAL_TEMPLATE: &str = "Ticket %s was marked as related to this ticket";
const DEFAULT_REMOTE_TEMPLATE: &str = "Ticket %s is related to this ticket";

/// Adds a cross reference to another ticket.
///
/// ```yaml
/// relate:
///   label: Mark related
///   operations: [xref]
///   xref: "Ticket %s is related to this ticket"
///   xref_local: "Ticket %s was marked as related to this ticket"
///   xref_hint: "The specified ticket will be cross-referenced with this ticket"
/// ```
///
/// The values shown are the defaults. `%s` is replaced with the counterpart
/// ticket's display id.
#[derive(Debug, Clone, Copy)]
pub struct XRef;

impl XRef {
    /// Parse the submitted reference for an action, stripping one leading
    /// `#`. `None` when the value is absent or not a ticket number.
    fn submitted_reference(&self, ctx: &OpContext, action: &Action) -> Option<u64> {
        let raw = ctx.form.get(&xref_key(&action.name))?.trim();
        raw.strip_prefix('#').unwrap_or(raw).parse::<u64>().ok()
    }
}

impl TicketOperation for XRef {
    fn kind(&self) -> OpKind {
        OpKind::XRef
    }

    fn render(&self, ctx: &OpContext, action: &Action) -> ActionControl {
        let id = xref_key(&action.name);
        let value = ctx.form.get(&id).unwrap_or("").to_string();
        let hint = ctx
            .config
            .option(&action.name, "xref_hint")
            .unwrap_or(DEFAULT_HINT)
            .to_string();
        ActionControl {
            label: action.label.clone(),
            control: Control::TextInput { id, value },
            hint,
        }
    }

    fn compute_changes(&self, ctx: &mut OpContext, action: &Action) -> Result<ChangeOutcome> {
        // Preview must stay read-only: no validation, no comment append.
        if ctx.form.preview {
            return Ok(ChangeOutcome::none());
        }

        let raw = ctx
            .form
            .get(&xref_key(&action.name))
            .unwrap_or("")
            .trim()
            .to_string();
        let Ok(number) = raw.strip_prefix('#').unwrap_or(&raw).parse::<u64>() else {
            tracing::warn!("Cross-reference input '{raw}' is not a ticket number");
            return Ok(ChangeOutcome::Deferred {
                warning: format!(
                    "The cross-referenced ticket number \"{raw}\" was not a number."
                ),
            });
        };

        if let Err(e) = ctx.store.load(number) {
            tracing::warn!("Cross-referenced ticket #{number} could not be loaded: {e}");
            return Ok(ChangeOutcome::Deferred {
                warning: format!("Unable to cross-reference Ticket #{number} ({e})."),
            });
        }

        // Note on this ticket that the referenced one is related to it; the
        // sentence rides along in the submitted comment, not the change-set.
        let template = ctx
            .config
            .option(&action.name, "xref_local")
            .unwrap_or(DEFAULT_LOCAL_TEMPLATE);
        let sentence = expand_template(template, &format!("#{number}"));
        let existing = ctx.form.comment().to_string();
        let combined = if existing.is_empty() {
            sentence
        } else {
            format!("{existing}\n{sentence}")
        };
        ctx.form.set_comment(&combined);

        Ok(ChangeOutcome::none())
    }

    fn apply_side_effects(&self, ctx: &OpContext, action: &Action) -> Result<()> {
        // compute_changes validated this in the non-preview path; if the
        // engine ever gets here without that having happened, log and bail
        // instead of trusting the form blindly.
        let Some(number) = self.submitted_reference(ctx, action) else {
            tracing::error!(
                "Cross-reference side effect for action '{}' reached with an unvalidated reference",
                action.name
            );
            return Ok(());
        };
        if ctx.store.load(number).is_err() {
            tracing::error!(
                "Cross-reference side effect for action '{}' reached for missing ticket #{number}",
                action.name
            );
            return Ok(());
        }

        let template = ctx
            .config
            .option(&action.name, "xref")
            .unwrap_or(DEFAULT_REMOTE_TEMPLATE);
        let comment = expand_template(template, &ctx.ticket.id().to_string());
        let now = Timestamp::now();
        ctx.store.add_comment(number, ctx.author, &comment, now)?;

        let event = TicketChangeEvent::changed(number, now, ctx.author);
        if let Err(e) = ctx.notifier.notify(&event) {
            tracing::error!(
                "Failure sending notification on change to ticket #{number}: {e}"
            );
        }
        Ok(())
    }
}
