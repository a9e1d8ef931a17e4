use std::fs;
use std::sync::Arc;

use tempfile::TempDir;

use gantry::{
    Engine, FormValues, MemoryHistory, MemoryNotifier, MemoryStore, Roster, Ticket,
    WorkflowConfig,
};

/// Helper struct holding an engine wired to memory collaborators in an
/// isolated temp root, with handles kept for assertions.
pub struct EngineTest {
    pub root: TempDir,
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<MemoryNotifier>,
    pub engine: Engine,
}

/// Builder for [`EngineTest`].
pub struct EngineTestBuilder {
    config_yaml: String,
    history: MemoryHistory,
    roster: Roster,
    tickets: Vec<Ticket>,
}

impl EngineTestBuilder {
    pub fn history(mut self, history: MemoryHistory) -> Self {
        self.history = history;
        self
    }

    pub fn roster(mut self, roster: Roster) -> Self {
        self.roster = roster;
        self
    }

    /// Seed a ticket into the store.
    pub fn ticket(mut self, ticket: Ticket) -> Self {
        self.tickets.push(ticket);
        self
    }

    pub fn build(self) -> EngineTest {
        let root = TempDir::new().expect("Failed to create temp directory");
        let config = WorkflowConfig::from_yaml(&self.config_yaml).expect("config should parse");
        let store = Arc::new(MemoryStore::new());
        for ticket in self.tickets {
            store.insert(ticket);
        }
        let notifier = Arc::new(MemoryNotifier::new());
        let engine = Engine::new(
            root.path(),
            config,
            store.clone(),
            Arc::new(self.history),
            Arc::new(self.roster),
            notifier.clone(),
        )
        .expect("engine should build");
        EngineTest {
            root,
            store,
            notifier,
            engine,
        }
    }
}

impl EngineTest {
    pub fn builder(config_yaml: &str) -> EngineTestBuilder {
        EngineTestBuilder {
            config_yaml: config_yaml.to_string(),
            history: MemoryHistory::new(),
            roster: Roster::new(),
            tickets: Vec::new(),
        }
    }

    pub fn new(config_yaml: &str) -> Self {
        Self::builder(config_yaml).build()
    }

    /// Write an executable hook script under `<root>/hooks/`.
    pub fn write_hook_script(&self, name: &str, content: &str) {
        let hooks_dir = self.root.path().join("hooks");
        fs::create_dir_all(&hooks_dir).expect("Failed to create hooks dir");
        let path = hooks_dir.join(name);
        fs::write(&path, content).expect("Failed to write hook script");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&path).expect("metadata").permissions();
            perms.set_mode(0o755);
            fs::set_permissions(&path, perms).expect("Failed to set permissions");
        }
    }
}

/// A persisted ticket carrying the standard field set.
pub fn sample_ticket(id: u64) -> Ticket {
    Ticket::existing(id)
        .with_field("status", "assigned")
        .with_field("owner", "alice")
        .with_field("reporter", "bob")
        .with_field("component", "web")
        .with_field("milestone", "")
        .with_field("type", "defect")
        .with_field("cc", "carol")
        .with_field("keywords", "regression")
}

/// Empty form values, non-preview.
pub fn empty_form() -> FormValues {
    FormValues::new()
}
