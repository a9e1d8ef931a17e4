mod common;

use common::{EngineTest, empty_form, sample_ticket};
use gantry::{MemoryHistory, Roster, Transition};

const CONFIG: &str = r#"
actions:
  needinfo:
    label: Need info
    operations: [set_owner_to_reporter]
  route:
    label: Route
    operations: [set_owner_to_component_owner]
  handoff:
    label: Hand off
    operations: [set_owner_to_field]
    set_owner_to_field: cc
  bounce:
    label: Bounce back
    operations: [set_owner_to_previous]
  review:
    label: Request review
    operations: [set_field_to_author]
    set_field_to_author: cc
  cleanup:
    label: Clean up
    operations: [clear_fields]
    clear_fields: cc, keywords
  resolve:
    label: Resolve
    name: Resolve it
    newstate: closed
    operations: [set_state]
  undo:
    label: Undo
    operations: [set_status_to_previous]
  reopen:
    label: Reopen
    operations: [reset_milestone]
"#;

fn applied(transition: Transition) -> gantry::ChangeSet {
    match transition {
        Transition::Applied(changes) => changes,
        Transition::Deferred { warnings } => panic!("unexpected deferral: {warnings:?}"),
    }
}

#[test]
fn test_owner_to_reporter() {
    let t = EngineTest::new(CONFIG);
    let ticket = sample_ticket(1);
    let mut form = empty_form();
    let changes = applied(t.engine.compute(&ticket, "needinfo", "dave", &mut form).unwrap());
    assert_eq!(changes.get("owner").map(String::as_str), Some("bob"));
    assert_eq!(changes.len(), 1);
}

#[test]
fn test_owner_to_component_owner() {
    let t = EngineTest::builder(CONFIG)
        .roster(Roster::new().with_component("web", "erin"))
        .build();
    let ticket = sample_ticket(1);
    let mut form = empty_form();
    let changes = applied(t.engine.compute(&ticket, "route", "dave", &mut form).unwrap());
    assert_eq!(changes.get("owner").map(String::as_str), Some("erin"));
}

#[test]
fn test_owner_to_missing_component_deletes_owner() {
    // No components registered: the lookup misses, the owner is cleared,
    // and the action still succeeds.
    let t = EngineTest::new(CONFIG);
    let ticket = sample_ticket(1);
    let mut form = empty_form();
    let changes = applied(t.engine.compute(&ticket, "route", "dave", &mut form).unwrap());
    assert_eq!(changes.get("owner").map(String::as_str), Some(""));
}

#[test]
fn test_owner_to_field_copies_configured_field() {
    let t = EngineTest::new(CONFIG);
    let ticket = sample_ticket(1);
    let mut form = empty_form();
    let changes = applied(t.engine.compute(&ticket, "handoff", "dave", &mut form).unwrap());
    assert_eq!(changes.get("owner").map(String::as_str), Some("carol"));
    assert_eq!(changes.len(), 1);
}

#[test]
fn test_owner_to_previous_with_history() {
    let mut history = MemoryHistory::new();
    history.record(1, "owner", "frank", "alice");
    let t = EngineTest::builder(CONFIG).history(history).build();
    let ticket = sample_ticket(1);
    let mut form = empty_form();
    let changes = applied(t.engine.compute(&ticket, "bounce", "dave", &mut form).unwrap());
    assert_eq!(changes.get("owner").map(String::as_str), Some("frank"));
}

#[test]
fn test_owner_to_previous_without_history_keeps_owner() {
    let t = EngineTest::new(CONFIG);
    let ticket = sample_ticket(1);
    let mut form = empty_form();
    let changes = applied(t.engine.compute(&ticket, "bounce", "dave", &mut form).unwrap());
    assert_eq!(changes.get("owner").map(String::as_str), Some("alice"));
}

#[test]
fn test_set_field_to_author() {
    let t = EngineTest::new(CONFIG);
    let ticket = sample_ticket(1);
    let mut form = empty_form();
    let changes = applied(t.engine.compute(&ticket, "review", "dave", &mut form).unwrap());
    assert_eq!(changes.get("cc").map(String::as_str), Some("dave"));
}

#[test]
fn test_clear_fields_maps_each_to_empty() {
    let t = EngineTest::new(CONFIG);
    let ticket = sample_ticket(1);
    let mut form = empty_form();
    let changes = applied(t.engine.compute(&ticket, "cleanup", "dave", &mut form).unwrap());
    assert_eq!(changes.len(), 2);
    assert_eq!(changes.get("cc").map(String::as_str), Some(""));
    assert_eq!(changes.get("keywords").map(String::as_str), Some(""));
}

#[test]
fn test_clear_fields_hint_pluralizes() {
    let t = EngineTest::new(CONFIG);
    let ticket = sample_ticket(1);
    let mut form = empty_form();
    let controls = t.engine.render(&ticket, "cleanup", "dave", &mut form).unwrap();
    assert_eq!(controls.len(), 1);
    assert_eq!(controls[0].hint, "The 'cc', 'keywords' fields will be cleared.");
}

#[test]
fn test_set_state_changes_status() {
    let t = EngineTest::new(CONFIG);
    let ticket = sample_ticket(1);
    let mut form = empty_form();
    let changes = applied(t.engine.compute(&ticket, "resolve", "dave", &mut form).unwrap());
    assert_eq!(changes.get("status").map(String::as_str), Some("closed"));

    let controls = t.engine.render(&ticket, "resolve", "dave", &mut form).unwrap();
    // set_state presents the display name, not the label.
    assert_eq!(controls[0].label, "Resolve it");
    assert_eq!(controls[0].hint, "Next status will be 'closed'");
}

#[test]
fn test_set_state_noop_when_already_there() {
    let t = EngineTest::new(CONFIG);
    let ticket = sample_ticket(1).with_field("status", "closed");
    let mut form = empty_form();
    let changes = applied(t.engine.compute(&ticket, "resolve", "dave", &mut form).unwrap());
    assert!(changes.is_empty());
    let controls = t.engine.render(&ticket, "resolve", "dave", &mut form).unwrap();
    assert_eq!(controls[0].hint, "");
}

#[test]
fn test_status_to_previous_defaults_to_new() {
    let t = EngineTest::new(CONFIG);
    let ticket = sample_ticket(1);
    let mut form = empty_form();
    let changes = applied(t.engine.compute(&ticket, "undo", "dave", &mut form).unwrap());
    assert_eq!(changes.get("status").map(String::as_str), Some("new"));
}

#[test]
fn test_status_to_previous_with_history() {
    let mut history = MemoryHistory::new();
    history.record(1, "status", "accepted", "assigned");
    let t = EngineTest::builder(CONFIG).history(history).build();
    let ticket = sample_ticket(1);
    let mut form = empty_form();
    let changes = applied(t.engine.compute(&ticket, "undo", "dave", &mut form).unwrap());
    assert_eq!(changes.get("status").map(String::as_str), Some("accepted"));
}

#[test]
fn test_reset_milestone_only_when_completed() {
    let roster = Roster::new()
        .with_milestone("1.0", true)
        .with_milestone("2.0", false);
    let t = EngineTest::builder(CONFIG).roster(roster).build();
    let mut form = empty_form();

    let completed = sample_ticket(1).with_field("milestone", "1.0");
    let changes = applied(t.engine.compute(&completed, "reopen", "dave", &mut form).unwrap());
    assert_eq!(changes.get("milestone").map(String::as_str), Some(""));

    let open = sample_ticket(2).with_field("milestone", "2.0");
    let changes = applied(t.engine.compute(&open, "reopen", "dave", &mut form).unwrap());
    assert!(changes.is_empty());
}

#[test]
fn test_reset_milestone_tolerates_missing_milestone() {
    let t = EngineTest::new(CONFIG);
    let ticket = sample_ticket(1).with_field("milestone", "ghost");
    let mut form = empty_form();
    let changes = applied(t.engine.compute(&ticket, "reopen", "dave", &mut form).unwrap());
    assert!(changes.is_empty());
    let controls = t.engine.render(&ticket, "reopen", "dave", &mut form).unwrap();
    assert_eq!(controls[0].hint, "");
}

#[test]
fn test_owner_hint_wording() {
    let t = EngineTest::new(CONFIG);
    let ticket = sample_ticket(1);
    let mut form = empty_form();
    let controls = t.engine.render(&ticket, "needinfo", "dave", &mut form).unwrap();
    assert_eq!(
        controls[0].hint,
        "The owner will be changed from alice to bob."
    );

    // An empty reporter means the owner gets deleted.
    let blank = sample_ticket(2).with_field("reporter", "");
    let controls = t.engine.render(&blank, "needinfo", "dave", &mut form).unwrap();
    assert_eq!(controls[0].hint, "The owner will be deleted.");
}

#[test]
fn test_compute_is_idempotent_for_pure_strategies() {
    let t = EngineTest::new(CONFIG);
    let ticket = sample_ticket(1);
    for action in ["needinfo", "handoff", "cleanup", "resolve", "undo", "reopen"] {
        let mut form_a = empty_form();
        let mut form_b = empty_form();
        let first = t.engine.compute(&ticket, action, "dave", &mut form_a).unwrap();
        let second = t.engine.compute(&ticket, action, "dave", &mut form_b).unwrap();
        assert_eq!(first, second, "compute for '{action}' should be idempotent");
    }
}

#[test]
fn test_unknown_action_is_an_error() {
    let t = EngineTest::new(CONFIG);
    let ticket = sample_ticket(1);
    let mut form = empty_form();
    assert!(t.engine.compute(&ticket, "nope", "dave", &mut form).is_err());
}
