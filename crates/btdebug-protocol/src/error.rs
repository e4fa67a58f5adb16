use thiserror::Error;

/// Errors raised while decoding or encoding wire messages.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("action `{action}` is missing parameter `{param}`")]
    MissingParam {
        action: String,
        param: &'static str,
    },
}
