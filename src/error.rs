//! Bridge errors: one enum for every failure an action can hit.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// Provider denied access (reason kept) or returned no accounts (`None`).
    #[error("no account authorized by the wallet provider{}", reason_suffix(.0))]
    NoAccountAuthorized(Option<String>),
    #[error("remote call `{method}` failed: {message}")]
    RemoteCall { method: String, message: String },
    #[error("invalid bridge config: {0}")]
    Config(String),
    #[error("serialization failed: {0}")]
    Serialization(String),
    #[error("unknown action: {0}")]
    UnknownAction(String),
}

fn reason_suffix(reason: &Option<String>) -> String {
    reason.as_ref().map(|r| format!(": {}", r)).unwrap_or_default()
}

impl BridgeError {
    pub fn denied(reason: impl Into<String>) -> Self {
        BridgeError::NoAccountAuthorized(Some(reason.into()))
    }

    pub fn remote(method: &str, message: impl Into<String>) -> Self {
        BridgeError::RemoteCall {
            method: method.to_string(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        BridgeError::Serialization(err.to_string())
    }
}

impl From<serde_wasm_bindgen::Error> for BridgeError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        BridgeError::Serialization(err.to_string())
    }
}

/// Convert into a JS `Error` named `BridgeError`.
impl From<BridgeError> for JsValue {
    fn from(err: BridgeError) -> Self {
        let error = js_sys::Error::new(&err.to_string());
        error.set_name("BridgeError");
        error.into()
    }
}

/// Render a rejected promise value for log lines and error messages.
pub fn describe_js_error(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    if let Some(message) = js_sys::Reflect::get(value, &"message".into())
        .ok()
        .and_then(|m| m.as_string())
    {
        return message;
    }
    format!("{:?}", value)
}
