//! Errors crossing into JavaScript.

use sb_editor::DocumentError;
use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error("{0}")]
    Js(String),
}

impl BridgeError {
    /// Describe a value thrown or rejected on the JavaScript side.
    pub fn from_js(value: &JsValue) -> Self {
        let message = value
            .as_string()
            .or_else(|| {
                js_sys::Reflect::get(value, &JsValue::from_str("message"))
                    .ok()
                    .and_then(|m| m.as_string())
            })
            .unwrap_or_else(|| format!("{value:?}"));
        BridgeError::Js(message)
    }
}

impl From<BridgeError> for JsValue {
    fn from(err: BridgeError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
