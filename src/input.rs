/// Keyboard shortcuts the page reacts to on `keyup`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    /// `f`: toggle VR presentation, or fullscreen when VR is unsupported.
    ToggleMode,
    ExitPresent,
    ResetPose,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct KeyPress<'a> {
    pub key: &'a str,
    pub shift: bool,
    pub meta: bool,
    pub alt: bool,
    pub ctrl: bool,
    pub focus_on_body: bool,
}

impl KeyCommand {
    pub fn from_key_press(press: &KeyPress<'_>) -> Option<Self> {
        if press.shift || press.meta || press.alt || press.ctrl || !press.focus_on_body {
            return None;
        }
        match press.key {
            "f" | "F" => Some(KeyCommand::ToggleMode),
            "Escape" | "Esc" => Some(KeyCommand::ExitPresent),
            "z" | "Z" => Some(KeyCommand::ResetPose),
            _ => None,
        }
    }
}
