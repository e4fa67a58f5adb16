use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::ProtocolError;

/// Console → backend command.
///
/// Commands are fire-and-forget: the backend answers only by pushing its
/// next snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Spawn the catalog entry found at `path`.
    SpawnMob { path: String },
    /// Ask the backend to enter target-picking mode.
    StartSelecting,
    /// Delete whatever the backend currently has selected.
    DeleteSelected,
    /// Drop the backend's current selection.
    ClearSelection,
}

impl Command {
    pub fn action(&self) -> &'static str {
        match self {
            Command::SpawnMob { .. } => ACTION_SPAWN_MOB,
            Command::StartSelecting => ACTION_START_SELECTING,
            Command::DeleteSelected => ACTION_DELETE_SELECTED,
            Command::ClearSelection => ACTION_CLEAR_SELECTION,
        }
    }

    pub fn params(&self) -> serde_json::Value {
        match self {
            Command::SpawnMob { path } => {
                let mut params = serde_json::Map::new();
                params.insert(PARAM_PATH.to_string(), serde_json::Value::from(path.as_str()));
                serde_json::Value::Object(params)
            }
            _ => serde_json::json!({}),
        }
    }

    pub fn to_message(&self) -> CommandMessage {
        CommandMessage {
            action: self.action().to_string(),
            params: self.params(),
        }
    }

    pub fn from_message(message: &CommandMessage) -> Result<Self, ProtocolError> {
        match message.action.as_str() {
            ACTION_SPAWN_MOB => {
                let path = message
                    .params
                    .get(PARAM_PATH)
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| ProtocolError::MissingParam {
                        action: message.action.clone(),
                        param: PARAM_PATH,
                    })?;
                Ok(Command::SpawnMob {
                    path: path.to_string(),
                })
            }
            ACTION_START_SELECTING => Ok(Command::StartSelecting),
            ACTION_DELETE_SELECTED => Ok(Command::DeleteSelected),
            ACTION_CLEAR_SELECTION => Ok(Command::ClearSelection),
            other => Err(ProtocolError::UnknownAction(other.to_string())),
        }
    }
}

/// Wire envelope for a command: one JSON object per line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandMessage {
    pub action: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

impl CommandMessage {
    pub fn from_json(input: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Encode as a single JSON line (without the trailing newline).
    pub fn to_json_line(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameterless_commands_send_empty_params() {
        for command in [
            Command::StartSelecting,
            Command::DeleteSelected,
            Command::ClearSelection,
        ] {
            let msg = command.to_message();
            assert_eq!(msg.params, serde_json::json!({}));
            assert_eq!(Command::from_message(&msg).unwrap(), command);
        }
    }

    #[test]
    fn spawn_without_path_is_rejected() {
        let msg = CommandMessage {
            action: "spawn_mob".to_string(),
            params: serde_json::json!({}),
        };
        assert!(matches!(
            Command::from_message(&msg),
            Err(ProtocolError::MissingParam { param: "path", .. })
        ));
    }
}
