mod common;

use std::sync::Arc;

use common::mock_transport::MockTransport;
use common::pages::{checkbox, engine, output, range, text};
use webgate_sync::page::classifier::build_element;
use webgate_sync::page::document::{Document, MemoryDocument};
use webgate_sync::page::element_model::ElementKind;
use webgate_sync::registry::binding::BindingDecl;
use webgate_sync::registry::registry::Registry;
use webgate_sync::sync::engine::SyncEngine;
use webgate_sync::trace::logger::TraceLogger;
use webgate_sync::protocol::message::ReadResponse;
use webgate_sync::sync::engine::{ApplyOutcome, ReadOutcome};
use webgate_sync::sync::events::{UiEvent, UiEventKind, UserAction};
use webgate_sync::transport::error::BridgeError;

// =========================================================================
// Read request
// =========================================================================

#[test]
fn read_request_lists_every_binding_in_order() {
    let engine = engine(
        &[text("t1", ""), text("t2", ""), text("t3", "")],
        &[("t1", "a"), ("t2", "b"), ("t3", "a")],
    );

    let request = engine.read_request().unwrap();
    assert_eq!(request.version, "1");
    let vars: Vec<&str> = request.read.iter().map(|v| v.var.as_str()).collect();
    assert_eq!(vars, vec!["a", "b", "a"]);
}

#[test]
fn read_request_is_none_without_bindings() {
    let engine = engine(&[text("t1", "")], &[]);
    assert!(engine.read_request().is_none());
    assert!(!engine.registry().polling_enabled());
}

// =========================================================================
// Reconcile
// =========================================================================

#[test]
fn end_to_end_response_sets_both_elements() {
    let mut engine = engine(&[text("t1", ""), text("t2", "")], &[("t1", "a"), ("t2", "b")]);
    let mock = MockTransport::new();
    mock.queue_values(&["10", "20"]);

    let outcome = engine.run_read_cycle(&mock);

    assert_eq!(
        outcome,
        ReadOutcome::Applied { applied: 2, suppressed: 0, skipped: 0 }
    );
    assert_eq!(engine.document().value("t1"), Some("10".into()));
    assert_eq!(engine.document().value("t2"), Some("20".into()));
    assert_eq!(engine.registry().interval().as_millis(), 1000);
}

#[test]
fn length_mismatch_discards_whole_response() {
    let mut engine = engine(&[text("t1", "x"), text("t2", "y")], &[("t1", "a"), ("t2", "b")]);

    let outcome = engine.reconcile(2, Ok(ReadResponse::from_values(["10"])));

    assert_eq!(outcome, ReadOutcome::Discarded { expected: 2, received: Some(1) });
    assert_eq!(engine.document().value("t1"), Some("x".into()));
    assert_eq!(engine.document().value("t2"), Some("y".into()));
}

#[test]
fn longer_response_is_also_discarded() {
    let mut engine = engine(&[text("t1", "x")], &[("t1", "a")]);

    let outcome = engine.reconcile(1, Ok(ReadResponse::from_values(["1", "2"])));

    assert!(matches!(outcome, ReadOutcome::Discarded { .. }));
    assert_eq!(engine.document().value("t1"), Some("x".into()));
}

#[test]
fn missing_read_field_discards_response() {
    let mut engine = engine(&[text("t1", "x")], &[("t1", "a")]);

    let outcome = engine.reconcile(1, Ok(ReadResponse { read: None }));

    assert_eq!(outcome, ReadOutcome::Discarded { expected: 1, received: None });
    assert_eq!(engine.document().value("t1"), Some("x".into()));
}

#[test]
fn transport_failure_leaves_page_unchanged() {
    let mut engine = engine(&[text("t1", "x")], &[("t1", "a")]);

    let outcome = engine.reconcile(
        1,
        Err(BridgeError::Timeout { endpoint: "e".into(), timeout_ms: 2000 }),
    );

    assert!(matches!(outcome, ReadOutcome::Failed(_)));
    assert_eq!(engine.document().value("t1"), Some("x".into()));
    assert_eq!(engine.cycles(), 1);
}

#[test]
fn missing_element_is_skipped_silently() {
    let mut engine = engine(&[text("t1", "")], &[("t1", "a"), ("ghost", "b")]);
    let mock = MockTransport::new();
    mock.queue_values(&["1", "2"]);

    let outcome = engine.run_read_cycle(&mock);

    assert_eq!(
        outcome,
        ReadOutcome::Applied { applied: 1, suppressed: 0, skipped: 1 }
    );
    assert_eq!(engine.document().value("t1"), Some("1".into()));
}

#[test]
fn element_removed_after_start_is_skipped() {
    let mut engine = engine(&[text("t1", "old")], &[("t1", "a")]);
    engine.document_mut().remove("t1");

    assert_eq!(engine.apply_update(0, "new"), ApplyOutcome::Skipped);
}

#[test]
fn element_inserted_after_start_is_updated() {
    let mut engine = engine(&[], &[("t1", "a")]);
    engine.document_mut().insert(build_element(&text("t1", "")));

    let outcome = engine.reconcile(1, Ok(ReadResponse::from_values(["10"])));

    assert_eq!(
        outcome,
        ReadOutcome::Applied { applied: 1, suppressed: 0, skipped: 0 }
    );
    assert_eq!(engine.document().value("t1"), Some("10".into()));
    assert_eq!(engine.registry().get(0).unwrap().kind(), Some(ElementKind::TextLike));
}

#[test]
fn element_replaced_with_other_control_uses_new_kind() {
    let mut engine = engine(&[text("x", "")], &[("x", "flag")]);
    engine.document_mut().insert(build_element(&checkbox("x", false)));

    let outcome = engine.reconcile(1, Ok(ReadResponse::from_values(["1"])));

    assert_eq!(
        outcome,
        ReadOutcome::Applied { applied: 1, suppressed: 0, skipped: 0 }
    );
    assert_eq!(engine.document().checked("x"), Some(true));
}

#[test]
fn change_on_element_inserted_after_start_is_written() {
    let mut engine = engine(&[], &[("r1", "drive")]);
    engine.document_mut().insert(build_element(&range("r1", "40")));

    let writes = engine.handle_event(&UiEvent::new("r1", UiEventKind::Input));

    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].write[0].var, "drive");
    assert_eq!(writes[0].write[0].val, "40");
}

#[test]
fn missing_element_is_traced_as_unknown() {
    let path = std::env::temp_dir().join(format!("webgate-sync-unknown-{}.jsonl", std::process::id()));
    let _ = std::fs::remove_file(&path);

    let mut registry = Registry::new();
    registry.initialize(vec![BindingDecl::new("ghost", "a")], 1000);
    let mut engine = SyncEngine::new(
        registry,
        MemoryDocument::new(),
        Arc::new(TraceLogger::new(path.to_str().unwrap())),
    );

    engine.reconcile(1, Ok(ReadResponse::from_values(["1"])));
    let writes = engine.handle_event(&UiEvent::new("ghost", UiEventKind::Change));
    assert!(writes.is_empty());

    let log = std::fs::read_to_string(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    let unknown: Vec<&str> = log.lines().filter(|l| l.contains("unknown_element")).collect();
    assert_eq!(unknown.len(), 2);
    assert!(unknown[0].contains("\"update_skipped\""));
    assert!(unknown[1].contains("\"write_failed\""));
}

#[test]
fn same_variable_mirrored_by_two_elements() {
    let mut engine = engine(&[text("t1", ""), output("o1", "")], &[("t1", "a"), ("o1", "a")]);

    engine.reconcile(2, Ok(ReadResponse::from_values(["7", "7"])));

    assert_eq!(engine.document().value("t1"), Some("7".into()));
    assert_eq!(engine.document().text_content("o1"), Some("7".into()));
}

// =========================================================================
// Apply-Update
// =========================================================================

#[test]
fn busy_binding_is_never_updated() {
    for value in ["", "0", "1", "hello", "99.5"] {
        let mut engine = engine(&[text("t1", "mine"), checkbox("c1", true)], &[("t1", "a"), ("c1", "b")]);
        engine.handle_event(&UiEvent::new("t1", UiEventKind::Focus));
        engine.handle_event(&UiEvent::new("c1", UiEventKind::Focus));

        assert_eq!(engine.apply_update(0, value), ApplyOutcome::Suppressed);
        assert_eq!(engine.apply_update(1, value), ApplyOutcome::Suppressed);
        assert_eq!(engine.document().value("t1"), Some("mine".into()));
        assert_eq!(engine.document().checked("c1"), Some(true));
    }
}

#[test]
fn apply_update_is_idempotent() {
    let mut engine = engine(
        &[text("t1", ""), checkbox("c1", false), range("r1", "10"), output("o1", "")],
        &[("t1", "a"), ("c1", "b"), ("r1", "c"), ("o1", "d")],
    );

    for value in ["5", "0", "150", "abc"] {
        for index in 0..4 {
            engine.apply_update(index, value);
        }
        let once = engine.document().clone();

        for index in 0..4 {
            engine.apply_update(index, value);
        }
        assert_eq!(engine.document().elements(), once.elements());
    }
}

#[test]
fn checkbox_zero_unchecks_anything_else_checks() {
    let mut engine = engine(&[checkbox("c1", true)], &[("c1", "flag")]);

    engine.apply_update(0, "0");
    assert_eq!(engine.document().checked("c1"), Some(false));

    engine.apply_update(0, "false");
    assert_eq!(engine.document().checked("c1"), Some(true));

    engine.apply_update(0, "0");
    engine.apply_update(0, "");
    assert_eq!(engine.document().checked("c1"), Some(true));
}

#[test]
fn generic_element_gets_text_content() {
    let mut engine = engine(&[output("o1", "-")], &[("o1", "APP_NAME")]);

    engine.apply_update(0, "OSC-webgate");

    assert_eq!(engine.document().text_content("o1"), Some("OSC-webgate".into()));
}

#[test]
fn range_value_is_passed_through_and_clamped_by_control() {
    let mut engine = engine(&[range("r1", "50")], &[("r1", "drive")]);

    engine.apply_update(0, "26");
    assert_eq!(engine.document().value("r1"), Some("26".into()));

    engine.apply_update(0, "400");
    assert_eq!(engine.document().value("r1"), Some("100".into()));
}

#[test]
fn non_numeric_range_value_counts_as_skipped() {
    let mut engine = engine(&[range("r1", "50"), text("t1", "")], &[("r1", "drive"), ("t1", "a")]);

    let outcome = engine.reconcile(2, Ok(ReadResponse::from_values(["fast", "ok"])));

    assert_eq!(
        outcome,
        ReadOutcome::Applied { applied: 1, suppressed: 0, skipped: 1 }
    );
    assert_eq!(engine.document().value("r1"), Some("50".into()));
    assert_eq!(engine.document().value("t1"), Some("ok".into()));
}

// =========================================================================
// Write path
// =========================================================================

#[test]
fn text_change_produces_single_write() {
    let mut engine = engine(&[text("X", "bar")], &[("X", "foo")]);

    let writes = engine.handle_event(&UiEvent::new("X", UiEventKind::Change));

    assert_eq!(writes.len(), 1);
    assert_eq!(
        serde_json::to_string(&writes[0]).unwrap(),
        r#"{"version":"1","write":[{"var":"foo","val":"bar"}]}"#
    );
}

#[test]
fn checked_checkbox_writes_one() {
    let mut engine = engine(&[checkbox("c1", false)], &[("c1", "flag")]);

    let writes = engine.perform(&UserAction::Check { id: "c1".into(), checked: true });
    assert_eq!(writes[0].write[0].var, "flag");
    assert_eq!(writes[0].write[0].val, "1");

    let writes = engine.perform(&UserAction::Toggle("c1".into()));
    assert_eq!(writes[0].write[0].val, "0");
}

#[test]
fn generic_element_write_sends_text_content() {
    let mut engine = engine(&[output("o1", "hello")], &[("o1", "msg")]);

    let writes = engine.handle_event(&UiEvent::new("o1", UiEventKind::Change));

    assert_eq!(writes[0].write[0].val, "hello");
}

#[test]
fn change_on_unbound_element_sends_nothing() {
    let mut engine = engine(&[text("t1", "v"), text("free", "x")], &[("t1", "a")]);

    assert!(engine.handle_event(&UiEvent::new("free", UiEventKind::Change)).is_empty());
}

#[test]
fn change_on_missing_element_sends_nothing() {
    let mut engine = engine(&[text("t1", "v")], &[("t1", "a")]);
    engine.document_mut().remove("t1");

    assert!(engine.handle_event(&UiEvent::new("t1", UiEventKind::Change)).is_empty());
}

#[test]
fn every_binding_sharing_an_id_is_written() {
    let mut engine = engine(&[text("t1", "v")], &[("t1", "a"), ("t1", "b")]);

    let writes = engine.handle_event(&UiEvent::new("t1", UiEventKind::Change));

    let vars: Vec<&str> = writes.iter().map(|w| w.write[0].var.as_str()).collect();
    assert_eq!(vars, vec!["a", "b"]);
    assert!(writes.iter().all(|w| w.write.len() == 1 && w.write[0].val == "v"));
}

#[test]
fn input_event_writes_only_for_range() {
    let mut engine = engine(&[text("t1", "v"), range("r1", "30")], &[("t1", "a"), ("r1", "b")]);

    assert!(engine.handle_event(&UiEvent::new("t1", UiEventKind::Input)).is_empty());

    let writes = engine.handle_event(&UiEvent::new("r1", UiEventKind::Input));
    assert_eq!(writes[0].write[0].val, "30");
}

#[test]
fn each_edit_issues_its_own_write() {
    let mut engine = engine(&[text("t1", "")], &[("t1", "a")]);

    let mut all = Vec::new();
    for v in ["1", "2", "3"] {
        all.extend(engine.perform(&UserAction::Set { id: "t1".into(), value: v.into() }));
    }

    let values: Vec<&str> = all.iter().map(|w| w.write[0].val.as_str()).collect();
    assert_eq!(values, vec!["1", "2", "3"]);
}

// =========================================================================
// Busy tracking
// =========================================================================

#[test]
fn focus_and_blur_toggle_busy() {
    let mut engine = engine(&[text("t1", "")], &[("t1", "a")]);

    engine.handle_event(&UiEvent::new("t1", UiEventKind::Focus));
    assert!(engine.registry().find_by_id("t1").unwrap().is_busy());

    engine.handle_event(&UiEvent::new("t1", UiEventKind::Blur));
    assert!(!engine.registry().find_by_id("t1").unwrap().is_busy());
}

#[test]
fn read_between_focus_and_blur_keeps_user_value() {
    let mut engine = engine(&[text("t1", "server")], &[("t1", "a")]);

    engine.perform(&UserAction::Focus("t1".into()));
    engine.document_mut().edit("t1", &webgate_sync::page::element_model::UserEdit::Value("typing".into()));

    let outcome = engine.reconcile(1, Ok(ReadResponse::from_values(["server"])));
    assert_eq!(outcome, ReadOutcome::Applied { applied: 0, suppressed: 1, skipped: 0 });
    assert_eq!(engine.document().value("t1"), Some("typing".into()));

    engine.perform(&UserAction::Blur("t1".into()));
    engine.reconcile(1, Ok(ReadResponse::from_values(["server"])));
    assert_eq!(engine.document().value("t1"), Some("server".into()));
}

#[test]
fn dragging_slider_suppresses_updates_until_release() {
    let mut engine = engine(&[range("r1", "10")], &[("r1", "drive")]);

    let writes = engine.perform(&UserAction::Drag { id: "r1".into(), value: "40".into() });
    assert_eq!(writes[0].write[0].val, "40");
    assert!(engine.registry().find_by_id("r1").unwrap().is_busy());

    engine.reconcile(1, Ok(ReadResponse::from_values(["10"])));
    assert_eq!(engine.document().value("r1"), Some("40".into()));

    let writes = engine.perform(&UserAction::Release("r1".into()));
    assert_eq!(writes.len(), 1);
    assert!(!engine.registry().find_by_id("r1").unwrap().is_busy());

    engine.reconcile(1, Ok(ReadResponse::from_values(["10"])));
    assert_eq!(engine.document().value("r1"), Some("10".into()));
}

#[test]
fn release_keeps_busy_while_still_focused() {
    let mut engine = engine(&[range("r1", "10")], &[("r1", "drive")]);

    engine.perform(&UserAction::Focus("r1".into()));
    engine.perform(&UserAction::Drag { id: "r1".into(), value: "20".into() });
    engine.perform(&UserAction::Release("r1".into()));

    assert!(engine.registry().find_by_id("r1").unwrap().is_busy());

    engine.perform(&UserAction::Blur("r1".into()));
    assert!(!engine.registry().find_by_id("r1").unwrap().is_busy());
}

#[test]
fn focus_on_unknown_id_is_ignored() {
    let mut engine = engine(&[text("t1", "")], &[("t1", "a")]);

    assert!(engine.handle_event(&UiEvent::new("nope", UiEventKind::Focus)).is_empty());
    assert!(!engine.registry().find_by_id("t1").unwrap().is_busy());
}

// =========================================================================
// Re-initialization
// =========================================================================

#[test]
fn initialize_with_empty_list_keeps_previous_bindings() {
    let mut engine = engine(&[text("t1", "")], &[("t1", "a")]);

    assert!(!engine.initialize(vec![], 500));
    assert_eq!(engine.registry().len(), 1);
    assert_eq!(engine.registry().interval().as_millis(), 1000);
}

#[test]
fn stale_response_after_reinitialize_is_discarded() {
    let mut engine = engine(&[text("t1", "x"), text("t2", "y")], &[("t1", "a")]);

    engine.initialize(
        vec![
            BindingDecl::new("t1", "a"),
            BindingDecl::new("t2", "b"),
        ],
        1000,
    );

    let outcome = engine.reconcile(1, Ok(ReadResponse::from_values(["1"])));
    assert!(matches!(outcome, ReadOutcome::Discarded { .. }));
    assert_eq!(engine.document().value("t1"), Some("x".into()));
}
