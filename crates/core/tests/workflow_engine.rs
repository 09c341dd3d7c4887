//! Integration tests for WorkflowEngine.
//!
//! These tests verify that the engine:
//! - Keeps the log append-only outside loading and edit operations
//! - Never holds more than one loading message or active customization
//! - Rewinds correctly on edit
//! - Treats references to missing messages as no-ops

use wk_core::engine::WorkflowEngine;
use wk_protocol::message_models::{ChatRole, Message, MessageId, MessageRole};
use wk_protocol::workflow_models::{WorkflowConfig, WorkflowStep};

fn create_test_config(initial: &str, steps: u32) -> WorkflowConfig<String> {
    WorkflowConfig::new(
        initial.to_string(),
        (1..=steps)
            .map(|id| WorkflowStep {
                id,
                title: format!("Step {}", id),
                description: String::new(),
            })
            .collect(),
    )
}

fn create_test_engine(steps: u32) -> WorkflowEngine<String> {
    let mut engine = WorkflowEngine::new(create_test_config("Welcome", steps));
    engine.initialize();
    engine
}

fn ids(messages: &[Message<String>]) -> Vec<MessageId> {
    messages.iter().map(|m| m.id).collect()
}

fn loading_count(engine: &WorkflowEngine<String>) -> usize {
    engine
        .messages()
        .iter()
        .filter(|m| m.role == MessageRole::Loading)
        .count()
}

#[test]
fn test_add_message_appends_in_call_order() {
    let mut engine = create_test_engine(3);

    let mut expected = ids(engine.messages());
    for (i, role) in [ChatRole::User, ChatRole::System, ChatRole::User, ChatRole::System]
        .into_iter()
        .enumerate()
    {
        let before = engine.messages().to_vec();
        let id = engine.add_message(role, format!("message {}", i), i % 2 == 1);
        expected.push(id);

        assert_eq!(&engine.messages()[..before.len()], before.as_slice());
        assert_eq!(engine.messages().last().unwrap().id, id);
    }

    assert_eq!(ids(engine.messages()), expected);
}

#[test]
fn test_at_most_one_loading_message() {
    let mut engine = create_test_engine(2);

    engine.add_loading_message("Fetching...".to_string());
    engine.add_loading_message("Parsing...".to_string());
    assert_eq!(loading_count(&engine), 1);

    engine.update_loading_message("Still parsing...".to_string());
    engine.add_message(ChatRole::User, "interrupt".to_string(), false);
    engine.add_loading_message("Again...".to_string());
    assert_eq!(loading_count(&engine), 1);
    // The replacement lands at the end
    assert_eq!(engine.messages().last().unwrap().content, "Again...");

    engine.remove_loading_message();
    engine.remove_loading_message();
    assert_eq!(loading_count(&engine), 0);

    engine.update_loading_message("ignored".to_string());
    assert_eq!(loading_count(&engine), 0);
}

#[test]
fn test_latest_customization_wins() {
    let mut engine = create_test_engine(3);

    let first = engine.add_message(ChatRole::System, "pick a company".to_string(), true);
    assert_eq!(engine.active_customization_id(), Some(first));

    engine.add_message(ChatRole::User, "Acme".to_string(), false);
    assert_eq!(engine.active_customization_id(), Some(first));

    let second = engine.add_message(ChatRole::System, "pick metrics".to_string(), true);
    assert_eq!(engine.active_customization_id(), Some(second));

    engine.clear_active_customization();
    assert_eq!(engine.active_customization_id(), None);
    // The flag on the message itself is history, not state
    assert!(engine.message(second).unwrap().show_customization);
}

#[test]
fn test_edit_truncates_and_restores_step() {
    let mut engine = WorkflowEngine::new(create_test_config("m1", 3));
    engine.initialize();
    let m1 = engine.messages()[0].id;
    let m2 = engine.add_message(ChatRole::User, "m2".to_string(), false);
    engine.advance_step();
    let m3 = engine.add_message(ChatRole::System, "m3".to_string(), true);
    engine.advance_step();
    engine.add_message(ChatRole::User, "m4".to_string(), false);

    let steps: Vec<usize> = engine.messages().iter().map(|m| m.step).collect();
    assert_eq!(steps, vec![1, 1, 2, 3]);

    engine.handle_edit_message(m3);

    assert_eq!(ids(engine.messages()), vec![m1, m2]);
    assert_eq!(engine.current_step(), 2);
    assert_eq!(engine.active_customization_id(), None);
}

#[test]
fn test_initialize_is_idempotent() {
    let mut engine = create_test_engine(2);
    engine.add_message(ChatRole::System, "control".to_string(), true);
    engine.advance_step();
    engine.add_loading_message("working".to_string());

    engine.initialize();
    let first: Vec<(MessageRole, String)> = engine
        .messages()
        .iter()
        .map(|m| (m.role, m.content.clone()))
        .collect();
    let first_step = engine.current_step();
    let first_active = engine.active_customization_id();

    engine.initialize();

    let second: Vec<(MessageRole, String)> = engine
        .messages()
        .iter()
        .map(|m| (m.role, m.content.clone()))
        .collect();
    assert_eq!(first, vec![(MessageRole::System, "Welcome".to_string())]);
    assert_eq!(first, second);
    assert_eq!(first_step, 1);
    assert_eq!(engine.current_step(), 1);
    assert_eq!(first_active, None);
    assert_eq!(engine.active_customization_id(), None);
}

#[test]
fn test_unknown_references_are_no_ops() {
    let mut engine = create_test_engine(3);
    engine.add_message(ChatRole::User, "Acme".to_string(), false);
    engine.advance_step();
    engine.add_message(ChatRole::System, "choose".to_string(), true);

    let messages = engine.messages().to_vec();
    let step = engine.current_step();
    let active = engine.active_customization_id();

    engine.handle_edit_message(MessageId::new());
    engine.update_loading_message("nothing to update".to_string());
    engine.remove_loading_message();

    assert_eq!(engine.messages(), messages.as_slice());
    assert_eq!(engine.current_step(), step);
    assert_eq!(engine.active_customization_id(), active);
}

#[test]
fn test_scenario_initialize() {
    let mut engine = WorkflowEngine::new(create_test_config("Welcome", 1));
    let messages = engine.initialize();

    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].content, "Welcome");
    assert_eq!(engine.current_step(), 1);
}

/// Runs the add / loading / response sequence, returning the ids of the
/// three remaining messages.
fn run_scenario_conversation(engine: &mut WorkflowEngine<String>) -> [MessageId; 3] {
    let a = engine.messages()[0].id;

    let b = engine.add_message(ChatRole::User, "Acme Corp".to_string(), false);
    assert_eq!(engine.messages().len(), 2);
    assert_eq!(engine.messages()[1].role, MessageRole::User);

    engine.add_loading_message("Fetching...".to_string());
    assert_eq!(engine.messages().len(), 3);
    let last = engine.messages().last().unwrap();
    assert_eq!(last.role, MessageRole::Loading);
    assert_eq!(last.content, "Fetching...");

    engine.update_loading_message("Still fetching...".to_string());
    assert_eq!(engine.messages().len(), 3);
    assert_eq!(engine.messages().last().unwrap().content, "Still fetching...");

    engine.remove_loading_message();
    assert_eq!(engine.messages().len(), 2);

    let c = engine.add_message(ChatRole::System, "Done".to_string(), true);
    assert_eq!(engine.messages().len(), 3);
    assert_eq!(engine.active_customization_id(), Some(c));

    [a, b, c]
}

#[test]
fn test_scenario_processing_sequence() {
    let mut engine = create_test_engine(1);
    run_scenario_conversation(&mut engine);
}

#[test]
fn test_scenario_edit_user_message() {
    let mut engine = create_test_engine(1);
    let [a, b, _c] = run_scenario_conversation(&mut engine);
    let b_step = engine.message(b).unwrap().step;

    engine.handle_edit_message(b);

    assert_eq!(ids(engine.messages()), vec![a]);
    assert_eq!(engine.active_customization_id(), None);
    assert_eq!(engine.current_step(), b_step);
}

#[test]
fn test_engine_is_generic_over_content() {
    #[derive(Debug, Clone, PartialEq)]
    enum Card {
        Text(&'static str),
        Table { rows: usize },
    }

    let config = WorkflowConfig::new(
        Card::Text("Upload a report"),
        vec![WorkflowStep {
            id: 1,
            title: "Upload".to_string(),
            description: String::new(),
        }],
    );
    let mut engine = WorkflowEngine::new(config);
    engine.initialize();
    let id = engine.add_message(ChatRole::System, Card::Table { rows: 14 }, true);

    assert_eq!(engine.message(id).unwrap().content, Card::Table { rows: 14 });
    assert_eq!(engine.messages()[0].content, Card::Text("Upload a report"));
}

#[test]
fn test_independent_engines_do_not_share_state() {
    let mut first = create_test_engine(2);
    let second = create_test_engine(2);

    first.add_message(ChatRole::User, "only here".to_string(), false);
    first.advance_step();

    assert_eq!(first.messages().len(), 2);
    assert_eq!(second.messages().len(), 1);
    assert_eq!(second.current_step(), 1);
}
