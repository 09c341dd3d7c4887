use wk_protocol::*;

#[test]
fn test_workflow_definition_deserialization_from_yaml() {
    let yaml_str = r#"
name: peer-comparison
description: Benchmark a company against listed peers
initial-message: "Which company should we analyse?"
steps:
  - id: 1
    title: Select Company
    description: Choose the company to benchmark
    processing:
      - message: "Fetching company profile..."
        delay-ms: 1200
      - message: "Identifying comparable peers..."
    response: "Found 6 peers. Choose the metrics to compare."
  - id: 2
    title: Review Results
    response: "Comparison ready."
    customization: false
"#;

    let definition: WorkflowDefinition =
        serde_yaml::from_str(yaml_str).expect("Failed to deserialize WorkflowDefinition");

    assert_eq!(definition.name, "peer-comparison");
    assert_eq!(definition.initial_message, "Which company should we analyse?");
    assert_eq!(definition.steps.len(), 2);

    let first = &definition.steps[0];
    assert_eq!(first.title, "Select Company");
    assert_eq!(first.processing.len(), 2);
    assert_eq!(first.processing[0].delay_ms, 1200);
    // Missing delay falls back to the default stage length
    assert_eq!(first.processing[1].delay_ms, 1000);
    // Customization defaults to true
    assert!(first.customization);
    assert_eq!(first.total_delay_ms(), 2200);

    let second = &definition.steps[1];
    assert!(second.processing.is_empty());
    assert!(!second.customization);
    assert_eq!(second.description, "");

    assert!(definition.validate().is_ok());
}

#[test]
fn test_workflow_definition_to_config() {
    let definition = WorkflowDefinition {
        name: "ipo-screening".to_string(),
        description: String::new(),
        initial_message: "Welcome".to_string(),
        steps: vec![ScriptedStep {
            id: 7,
            title: "Set Filters".to_string(),
            description: "Pick sectors".to_string(),
            processing: Vec::new(),
            response: "Done".to_string(),
            customization: true,
        }],
    };

    let config = definition.to_config();
    assert_eq!(config.initial_message, "Welcome");
    assert_eq!(config.steps.len(), 1);
    assert_eq!(
        config.steps[0],
        WorkflowStep {
            id: 7,
            title: "Set Filters".to_string(),
            description: "Pick sectors".to_string(),
        }
    );
    assert_eq!(definition.step(1).map(|s| s.id), Some(7));
    assert!(definition.step(0).is_none());
    assert!(definition.step(2).is_none());
}

#[test]
fn test_workflow_definition_validation() {
    let mut definition = WorkflowDefinition {
        name: "demo".to_string(),
        description: String::new(),
        initial_message: "Hi".to_string(),
        steps: Vec::new(),
    };
    let err = definition.validate().unwrap_err();
    assert!(err.contains("no steps"));

    let step = ScriptedStep {
        id: 1,
        title: "One".to_string(),
        description: String::new(),
        processing: Vec::new(),
        response: "ok".to_string(),
        customization: true,
    };
    definition.steps = vec![step.clone(), step];
    let err = definition.validate().unwrap_err();
    assert!(err.contains("duplicate step id 1"));

    definition.steps.truncate(1);
    definition.name = "  ".to_string();
    assert!(definition.validate().is_err());
}

#[test]
fn test_message_role_serialization() {
    let json = serde_json::to_value(MessageRole::Loading).expect("Failed to serialize role");
    assert_eq!(json, "loading");

    let role: MessageRole = serde_json::from_value(serde_json::json!("user")).unwrap();
    assert_eq!(role, MessageRole::User);

    assert_eq!(MessageRole::from(ChatRole::System), MessageRole::System);
    assert_eq!(MessageRole::System.to_string(), "system");
}

#[test]
fn test_message_serialization() {
    let message = Message::new(MessageRole::User, "Acme Corp".to_string(), false, 2);

    let json = serde_json::to_value(&message).expect("Failed to serialize Message");
    assert_eq!(json["role"], "user");
    assert_eq!(json["content"], "Acme Corp");
    assert_eq!(json["show_customization"], false);
    assert_eq!(json["step"], 2);
    // The id is a plain UUID string
    assert_eq!(json["id"], message.id.to_string());

    let deserialized: Message<String> =
        serde_json::from_value(json).expect("Failed to deserialize Message");
    assert_eq!(deserialized, message);
}

#[test]
fn test_message_id_parse() {
    let id = MessageId::new();
    let parsed: MessageId = id.to_string().parse().expect("Failed to parse MessageId");
    assert_eq!(parsed, id);
    assert_eq!(id.short().len(), 8);
    assert!("not-a-uuid".parse::<MessageId>().is_err());
}

#[test]
fn test_snapshot_helpers() {
    let system = Message::new(MessageRole::System, "Pick one".to_string(), true, 1);
    let loading = Message::new(MessageRole::Loading, "Working...".to_string(), false, 1);
    let snapshot = ConversationSnapshot {
        messages: vec![system.clone(), loading.clone()],
        current_step: 1,
        active_customization_id: Some(system.id),
    };

    assert_eq!(snapshot.loading_message().map(|m| m.id), Some(loading.id));
    assert_eq!(snapshot.active_customization().map(|m| m.id), Some(system.id));

    let empty: ConversationSnapshot<String> = ConversationSnapshot::default();
    assert_eq!(empty.current_step, 1);
    assert!(empty.loading_message().is_none());
    assert!(empty.active_customization().is_none());
}

#[test]
fn test_op_serialization() {
    let id = MessageId::new();
    let op = Op::EditMessage { message_id: id };
    let json = serde_json::to_value(&op).expect("Failed to serialize Op");

    assert_eq!(json["type"], "editMessage");
    assert_eq!(json["payload"]["message_id"], id.to_string());

    let submit: Op = serde_json::from_value(serde_json::json!({
        "type": "submitInput",
        "payload": { "content": "Acme Corp" }
    }))
    .expect("Failed to deserialize Op");
    assert!(matches!(submit, Op::SubmitInput { content } if content == "Acme Corp"));

    let restart = serde_json::to_value(Op::Restart).expect("Failed to serialize Op");
    assert_eq!(restart["type"], "restart");
}

#[test]
fn test_event_serialization() {
    let event = Event::ProcessingStarted { step: 2 };
    let json = serde_json::to_value(&event).expect("Failed to serialize Event");
    assert_eq!(json["type"], "processingStarted");
    assert_eq!(json["payload"]["step"], 2);

    let snapshot = ConversationSnapshot {
        messages: vec![Message::new(MessageRole::System, "Welcome".to_string(), false, 1)],
        current_step: 1,
        active_customization_id: None,
    };
    let event = Event::ConversationUpdated { snapshot };
    let json = serde_json::to_string(&event).expect("Failed to serialize Event");
    let back: Event = serde_json::from_str(&json).expect("Failed to deserialize Event");
    match back {
        Event::ConversationUpdated { snapshot } => {
            assert_eq!(snapshot.messages.len(), 1);
            assert_eq!(snapshot.messages[0].content, "Welcome");
            assert!(snapshot.active_customization_id.is_none());
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn test_global_config_defaults() {
    let config: GlobalConfig = serde_yaml::from_str("{}").expect("Failed to parse empty config");
    assert_eq!(config, GlobalConfig::default());
    assert!((config.time_scale - 1.0).abs() < f64::EPSILON);
    assert!(config.default_workflow.is_none());
    assert!(config.has_valid_time_scale());

    let negative = GlobalConfig {
        time_scale: -1.0,
        default_workflow: None,
    };
    assert!(!negative.has_valid_time_scale());
}
