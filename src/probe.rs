use js_sys::Reflect;
use wasm_bindgen::JsValue;

use crate::flags::PageFlags;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub supports_vr: bool,
    pub supports_vr_chromium: bool,
    /// `VRFrameData` is available (WebVR 1.1); otherwise only the legacy
    /// `getPose`/`getEyeParameters` path works.
    pub frame_data: bool,
}

fn has(target: &JsValue, key: &str) -> bool {
    Reflect::has(target, &JsValue::from_str(key)).unwrap_or(false)
}

impl Capabilities {
    pub fn detect(window: &JsValue, navigator: &JsValue) -> Self {
        let supports_vr = has(navigator, "getVRDisplays");
        Self {
            supports_vr,
            supports_vr_chromium: supports_vr && has(window, "chrome"),
            frame_data: has(window, "VRFrameData"),
        }
    }

    pub fn apply(&self, flags: &mut PageFlags) {
        flags.supports_vr = self.supports_vr;
        flags.supports_vr_chromium = self.supports_vr_chromium;
    }
}
