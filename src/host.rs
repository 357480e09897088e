use std::fmt;

use crate::controller::CanvasSize;
use crate::flags::PageFlags;

#[derive(Debug, Clone, PartialEq)]
pub enum MessageValue {
    Number(f64),
    Text(String),
}

impl From<f64> for MessageValue {
    fn from(value: f64) -> Self {
        MessageValue::Number(value)
    }
}

impl From<f32> for MessageValue {
    fn from(value: f32) -> Self {
        MessageValue::Number(value as f64)
    }
}

impl From<&str> for MessageValue {
    fn from(value: &str) -> Self {
        MessageValue::Text(value.to_string())
    }
}

impl From<String> for MessageValue {
    fn from(value: String) -> Self {
        MessageValue::Text(value)
    }
}

impl fmt::Display for MessageValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageValue::Number(value) => write!(f, "{}", value),
            MessageValue::Text(value) => f.write_str(value),
        }
    }
}

/// Everything the bridge does to the page and the embedded application.
pub trait Host {
    /// `SendMessage(target, field, value)` into the embedded application.
    fn send_message(&self, target: &str, field: &str, value: MessageValue);

    fn publish_flags(&self, flags: &PageFlags);

    fn set_toggle_label(&self, presenting: bool);

    fn set_canvas_size(&self, size: CanvasSize);

    fn enter_fullscreen(&self);

    fn toggle_fullscreen(&self);
}
