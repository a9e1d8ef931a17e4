//! The external-process side effect: run a per-action script after the
//! primary ticket has been saved.
//!
//! Scripts live at `<root>/hooks/<action>` and receive two positional
//! arguments: the ticket id and the acting username. A long-running script
//! should daemonize itself; the engine blocks the calling request until the
//! child exits or the configured timeout expires.

use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use wait_timeout::ChildExt;

use crate::error::Result;
use crate::types::HOOKS_DIR;
use crate::workflow::Action;

use super::{ActionControl, ChangeOutcome, Control, OpContext, OpKind, TicketOperation};

/// Suffixes probed when resolving the script, in order.
const SCRIPT_SUFFIXES: &[&str] = &["", ".exe", ".cmd", ".bat"];

/// Runs an external command as a side effect of an action.
///
/// ```yaml
/// escalate:
///   label: Escalate
///   operations: [run_external]
///   run_external: Pages the on-call engineer.
/// ```
///
/// The configured value, if any, is the hint shown to the user. A non-zero
/// exit code is logged as an error but never surfaced; the primary
/// transition is independent of the script's success.
#[derive(Debug, Clone, Copy)]
pub struct RunExternal;

impl RunExternal {
    /// Resolve the script for an action, probing each suffix and using the
    /// first that exists.
    fn resolve_script(&self, ctx: &OpContext, action: &Action) -> Option<PathBuf> {
        let base = ctx.root.join(HOOKS_DIR).join(&action.name);
        for suffix in SCRIPT_SUFFIXES {
            let candidate = if suffix.is_empty() {
                base.clone()
            } else {
                let mut name = base.as_os_str().to_os_string();
                name.push(suffix);
                PathBuf::from(name)
            };
            if candidate.exists() {
                return Some(candidate);
            }
        }
        None
    }
}

impl TicketOperation for RunExternal {
    fn kind(&self) -> OpKind {
        OpKind::RunExternal
    }

    fn render(&self, ctx: &OpContext, action: &Action) -> ActionControl {
        let hint = ctx
            .config
            .option(&action.name, "run_external")
            .unwrap_or("Will run external script.")
            .to_string();
        ActionControl {
            label: action.label.clone(),
            control: Control::None,
            hint,
        }
    }

    fn compute_changes(&self, _ctx: &mut OpContext, _action: &Action) -> Result<ChangeOutcome> {
        // No changes to the ticket; this operation is side effect only.
        Ok(ChangeOutcome::none())
    }

    fn apply_side_effects(&self, ctx: &OpContext, action: &Action) -> Result<()> {
        let Some(script) = self.resolve_script(ctx, action) else {
            tracing::error!(
                "Error in ticket workflow config; could not find external command to run for {} in {}",
                action.name,
                ctx.root.join(HOOKS_DIR).display()
            );
            return Ok(());
        };

        let ticket_id = match ctx.ticket.id().number() {
            Some(n) => n.to_string(),
            None => "new".to_string(),
        };

        let mut child = Command::new(&script)
            .arg(&ticket_id)
            .arg(ctx.author)
            .spawn()?;

        let timeout_secs = ctx.config.hook_timeout;
        let status = if timeout_secs == 0 {
            child.wait()?
        } else {
            match child.wait_timeout(Duration::from_secs(timeout_secs))? {
                Some(status) => status,
                None => {
                    if let Err(e) = child.kill() {
                        tracing::error!(
                            "Failed to kill timed-out script {}: {e}",
                            script.display()
                        );
                    }
                    let _ = child.wait();
                    tracing::error!(
                        "External script {} timed out after {timeout_secs}s.",
                        script.display()
                    );
                    return Ok(());
                }
            }
        };

        if !status.success() {
            tracing::error!(
                "External script {} exited with return code {}.",
                script.display(),
                status.code().unwrap_or(-1)
            );
        }
        Ok(())
    }
}
