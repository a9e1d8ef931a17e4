//! The operation dispatcher.
//!
//! One action submission triggers one synchronous pass over the action's
//! attached operations: render for the controls, compute for the merged
//! change-set, then side effects strictly after the primary mutation. The
//! engine manages no threads and no queues; it is invoked per request by the
//! host.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::WorkflowConfig;
use crate::directory::Directory;
use crate::error::{GantryError, Result};
use crate::form::FormValues;
use crate::history::{EventLogHistory, History};
use crate::notify::{EventLogNotifier, Notifier};
use crate::ops::{ActionControl, ChangeOutcome, OpContext, TicketOperation, WorkflowOp};
use crate::store::TicketStore;
use crate::ticket::Ticket;
use crate::types::ChangeSet;
use crate::workflow::{Action, Workflow};

/// Outcome of one action submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The merged change-set that was (or would be) applied.
    Applied(ChangeSet),
    /// At least one operation deferred the submission; nothing was applied
    /// and the warnings are for the user.
    Deferred { warnings: Vec<String> },
}

impl Transition {
    /// The change-set, if the submission went through.
    pub fn changes(&self) -> Option<&ChangeSet> {
        match self {
            Transition::Applied(changes) => Some(changes),
            Transition::Deferred { .. } => None,
        }
    }
}

/// The workflow operation engine.
pub struct Engine {
    root: PathBuf,
    config: WorkflowConfig,
    workflow: Workflow,
    store: Arc<dyn TicketStore>,
    history: Arc<dyn History>,
    directory: Arc<dyn Directory>,
    notifier: Arc<dyn Notifier>,
}

impl Engine {
    /// Build an engine from a configuration and explicit collaborators.
    ///
    /// `root` is the directory under which hook scripts (`hooks/`) are
    /// resolved.
    pub fn new(
        root: impl Into<PathBuf>,
        config: WorkflowConfig,
        store: Arc<dyn TicketStore>,
        history: Arc<dyn History>,
        directory: Arc<dyn Directory>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let workflow = Workflow::from_config(&config)?;
        Ok(Engine {
            root: root.into(),
            config,
            workflow,
            store,
            history,
            directory,
            notifier,
        })
    }

    /// Build an engine whose history and notifications are backed by the
    /// NDJSON logs under `root`.
    pub fn with_event_logs(
        root: impl Into<PathBuf>,
        config: WorkflowConfig,
        store: Arc<dyn TicketStore>,
        directory: Arc<dyn Directory>,
    ) -> Result<Self> {
        let root = root.into();
        let history = Arc::new(EventLogHistory::new(&root));
        let notifier = Arc::new(EventLogNotifier::new(&root));
        Engine::new(root, config, store, history, directory, notifier)
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    fn action(&self, name: &str) -> Result<&Action> {
        self.workflow
            .action(name)
            .ok_or_else(|| GantryError::UnknownAction(name.to_string()))
    }

    fn context<'a>(&'a self, ticket: &'a Ticket, author: &'a str, form: &'a mut FormValues) -> OpContext<'a> {
        OpContext {
            ticket,
            author,
            form,
            config: &self.config,
            workflow: &self.workflow,
            store: self.store.as_ref(),
            history: self.history.as_ref(),
            directory: self.directory.as_ref(),
            notifier: self.notifier.as_ref(),
            root: self.root.as_path(),
        }
    }

    /// Render every attached operation's control for an action. Read-only;
    /// safe to call repeatedly while the user previews.
    pub fn render(
        &self,
        ticket: &Ticket,
        action_name: &str,
        author: &str,
        form: &mut FormValues,
    ) -> Result<Vec<ActionControl>> {
        let action = self.action(action_name)?;
        let ctx = self.context(ticket, author, form);
        Ok(action
            .operations
            .iter()
            .map(|kind| WorkflowOp::from_kind(*kind).render(&ctx, action))
            .collect())
    }

    /// Run every attached operation's change computation and merge the
    /// results in attachment order (later operations win on key conflicts).
    ///
    /// If any operation defers, the whole submission is deferred: no changes
    /// are reported and `form.preview` is set so the side-effect phase is
    /// never reached this round.
    pub fn compute(
        &self,
        ticket: &Ticket,
        action_name: &str,
        author: &str,
        form: &mut FormValues,
    ) -> Result<Transition> {
        let action = self.action(action_name)?;
        let mut merged = ChangeSet::new();
        let mut warnings = Vec::new();

        let mut ctx = self.context(ticket, author, form);
        for kind in &action.operations {
            let op = WorkflowOp::from_kind(*kind);
            match op.compute_changes(&mut ctx, action)? {
                ChangeOutcome::Applied(changes) => merged.extend(changes),
                ChangeOutcome::Deferred { warning } => warnings.push(warning),
            }
        }

        if warnings.is_empty() {
            Ok(Transition::Applied(merged))
        } else {
            form.preview = true;
            Ok(Transition::Deferred { warnings })
        }
    }

    /// Compute, apply the merged change-set to the ticket, then run each
    /// operation's side effects in attachment order.
    ///
    /// Side effects run strictly after the primary mutation; their failures
    /// are logged and never disturb the already-applied changes. A deferred
    /// submission applies nothing and runs no side effects.
    pub fn apply(
        &self,
        ticket: &mut Ticket,
        action_name: &str,
        author: &str,
        form: &mut FormValues,
    ) -> Result<Transition> {
        let transition = self.compute(ticket, action_name, author, form)?;
        let changes = match &transition {
            Transition::Applied(changes) => changes.clone(),
            Transition::Deferred { .. } => return Ok(transition),
        };

        // A change-set key must name a field the ticket actually carries;
        // anything else is an operation misconfiguration.
        let mut valid = ChangeSet::new();
        for (field, value) in changes {
            if ticket.has_field(&field) {
                valid.insert(field, value);
            } else {
                tracing::warn!(
                    "Dropping change to unknown ticket field '{field}' for action '{action_name}'"
                );
            }
        }
        ticket.apply(&valid);

        let action = self.action(action_name)?;
        let ctx = self.context(ticket, author, form);
        for kind in &action.operations {
            let op = WorkflowOp::from_kind(*kind);
            if let Err(e) = op.apply_side_effects(&ctx, action) {
                tracing::error!(
                    "Side effect '{}' failed for action '{action_name}': {e}",
                    kind
                );
            }
        }

        Ok(Transition::Applied(valid))
    }
}
