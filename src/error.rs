use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Your browser is not VR ready")]
    NotReady,

    #[error("No VR device was detected")]
    NoDevice,

    #[error("no global window")]
    NoWindow,

    #[error("missing element #{0}")]
    MissingElement(&'static str),

    #[error("{0} missing")]
    MissingFunction(String),

    #[error("fullscreen API unsupported")]
    FullscreenUnsupported,

    #[error("js error: {0}")]
    Js(String),
}

pub fn js_value_to_string(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

impl From<JsValue> for BridgeError {
    fn from(value: JsValue) -> Self {
        BridgeError::Js(js_value_to_string(&value))
    }
}

impl From<BridgeError> for JsValue {
    fn from(err: BridgeError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
