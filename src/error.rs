/// Error taxonomy shared by the bridge and the popup
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InspectorError {
    /// The requested domain does not belong to the page the bridge runs in
    #[error("Cross-domain access not implemented")]
    CrossDomainDenied,

    /// The page's storage API itself failed (quota, security restrictions)
    #[error("{0}")]
    Store(String),

    /// The request never reached the bridge, or came back without an answer
    #[error("Remote execution failed: {0}")]
    RemoteExecution(String),

    #[error("The active tab has no inspectable page")]
    NoInspectablePage,

    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl InspectorError {
    /// Rebuild an error from the `error` field of a bridge response
    pub fn from_bridge_message(message: Option<String>) -> Self {
        match message {
            Some(msg) if msg == InspectorError::CrossDomainDenied.to_string() => {
                InspectorError::CrossDomainDenied
            }
            Some(msg) => InspectorError::Store(msg),
            None => InspectorError::Store("Unknown storage error".to_string()),
        }
    }

    pub fn store(value: JsValue) -> Self {
        InspectorError::Store(js_error_message(&value))
    }

    pub fn remote(value: JsValue) -> Self {
        InspectorError::RemoteExecution(js_error_message(&value))
    }
}

impl From<serde_wasm_bindgen::Error> for InspectorError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        InspectorError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for InspectorError {
    fn from(err: serde_json::Error) -> Self {
        InspectorError::Serialization(err.to_string())
    }
}

/// Readable text for a thrown JS value: `Error.message`, a thrown string, or the debug form
pub fn js_error_message(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
