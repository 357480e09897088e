use crate::controller::CanvasSize;

#[derive(Debug, Clone, PartialEq)]
pub struct BridgeConfig {
    pub canvas_id: &'static str,
    pub fullscreen_button_id: &'static str,
    pub toggle_button_id: &'static str,
    pub reset_button_id: &'static str,
    pub send_message_global: &'static str,
    pub message_target: &'static str,
    /// Display reporting per-eye sizes the runtime can't honour; it gets a
    /// fixed stereo target instead.
    pub fixed_resolution_display: &'static str,
    pub fixed_resolution: CanvasSize,
    pub vr_disabled: bool,
    pub log_level: log::Level,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            canvas_id: "canvas",
            fullscreen_button_id: "btnFsEnter",
            toggle_button_id: "btnVrToggle",
            reset_button_id: "btnVrReset",
            send_message_global: "SendMessage",
            message_target: "WebVRCameraSet",
            fixed_resolution_display: "Oculus Rift CV1, Oculus VR",
            fixed_resolution: CanvasSize {
                width: 1080 * 2,
                height: 1200,
            },
            vr_disabled: false,
            log_level: log::Level::Info,
        }
    }
}

impl BridgeConfig {
    /// Applies `novr=1` and `vrlog=<level>` from a `location.search` string.
    pub fn from_query(search: &str) -> Self {
        let mut config = Self::default();

        for pair in search.trim_start_matches('?').split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "novr" => config.vr_disabled = value == "1" || value == "true",
                "vrlog" => {
                    if let Ok(level) = value.parse::<log::Level>() {
                        config.log_level = level;
                    }
                }
                _ => {}
            }
        }

        config
    }
}
