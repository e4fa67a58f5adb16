use btdebug_protocol::{Command, CommandMessage, ProtocolError};

#[test]
fn test_spawn_mob_carries_path() {
    let command = Command::SpawnMob {
        path: "/mob/living/carbon/human".to_string(),
    };
    let line = command.to_message().to_json_line().unwrap();
    let value: serde_json::Value = serde_json::from_str(&line).unwrap();
    assert_eq!(value["action"], "spawn_mob");
    assert_eq!(value["params"]["path"], "/mob/living/carbon/human");
}

#[test]
fn test_command_names() {
    assert_eq!(Command::StartSelecting.action(), "start_selecting");
    assert_eq!(Command::DeleteSelected.action(), "delete_selected");
    assert_eq!(Command::ClearSelection.action(), "clear_selection");
}

#[test]
fn test_message_without_params_decodes() {
    let msg = CommandMessage::from_json(r#"{"action": "clear_selection"}"#).unwrap();
    assert_eq!(Command::from_message(&msg).unwrap(), Command::ClearSelection);
}

#[test]
fn test_unknown_action_rejected() {
    let msg = CommandMessage::from_json(r#"{"action": "edit_tree", "params": {}}"#).unwrap();
    match Command::from_message(&msg) {
        Err(ProtocolError::UnknownAction(action)) => assert_eq!(action, "edit_tree"),
        other => panic!("expected unknown action, got {other:?}"),
    }
}
