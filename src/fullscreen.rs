use js_sys::{Array, Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};

use crate::error::BridgeError;

/// One vendor family of the Fullscreen API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullscreenApi {
    pub element: &'static str,
    pub change_event: &'static str,
    pub enter: &'static str,
    pub exit: &'static str,
}

/// Probe order: unprefixed first, then Gecko, WebKit, Trident.
pub static FULLSCREEN_APIS: [FullscreenApi; 4] = [
    FullscreenApi {
        element: "fullscreenElement",
        change_event: "fullscreenchange",
        enter: "requestFullscreen",
        exit: "exitFullscreen",
    },
    FullscreenApi {
        element: "mozFullScreenElement",
        change_event: "mozfullscreenchange",
        enter: "mozRequestFullScreen",
        exit: "mozCancelFullScreen",
    },
    FullscreenApi {
        element: "webkitFullscreenElement",
        change_event: "webkitfullscreenchange",
        enter: "webkitRequestFullscreen",
        exit: "webkitExitFullscreen",
    },
    FullscreenApi {
        element: "msFullscreenElement",
        change_event: "MSFullscreenChange",
        enter: "msRequestFullscreen",
        exit: "msExitFullscreen",
    },
];

impl FullscreenApi {
    pub fn resolve(mut has_method: impl FnMut(&str) -> bool) -> Option<&'static FullscreenApi> {
        FULLSCREEN_APIS.iter().find(|api| has_method(api.enter))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullscreenAdapter {
    api: Option<&'static FullscreenApi>,
}

impl FullscreenAdapter {
    /// Resolves against `element`, normally `document.body`.
    pub fn for_element(element: &JsValue) -> Self {
        let api = FullscreenApi::resolve(|name| {
            Reflect::get(element, &JsValue::from_str(name))
                .map(|value| value.is_truthy())
                .unwrap_or(false)
        });
        Self { api }
    }

    pub fn unsupported() -> Self {
        Self { api: None }
    }

    pub fn api(&self) -> Option<&'static FullscreenApi> {
        self.api
    }

    pub fn is_supported(&self) -> bool {
        self.api.is_some()
    }

    pub fn is_presenting(&self, document: &JsValue) -> bool {
        let Some(api) = self.api else {
            return false;
        };
        Reflect::get(document, &JsValue::from_str(api.element))
            .map(|value| value.is_truthy())
            .unwrap_or(false)
    }

    pub fn enter(&self, element: &JsValue, options: &JsValue) -> Result<JsValue, BridgeError> {
        let api = self.api.ok_or(BridgeError::FullscreenUnsupported)?;
        let method = method(element, api.enter)?;
        Ok(method.apply(element, &Array::of1(options))?)
    }

    pub fn exit(&self, document: &JsValue) -> Result<JsValue, BridgeError> {
        let api = self.api.ok_or(BridgeError::FullscreenUnsupported)?;
        let method = method(document, api.exit)?;
        Ok(method.call0(document)?)
    }
}

fn method(target: &JsValue, name: &str) -> Result<Function, BridgeError> {
    Reflect::get(target, &JsValue::from_str(name))?
        .dyn_into::<Function>()
        .map_err(|_| BridgeError::MissingFunction(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_vendor_family_resolves_to_its_own_names() {
        for expected in FULLSCREEN_APIS.iter() {
            let api = FullscreenApi::resolve(|name| name == expected.enter).expect("resolved");
            assert_eq!(api, expected);
        }
    }

    #[test]
    fn unprefixed_wins_over_prefixes() {
        let api = FullscreenApi::resolve(|_| true).expect("resolved");
        assert_eq!(api.enter, "requestFullscreen");
        assert_eq!(api.element, "fullscreenElement");
    }

    #[test]
    fn webkit_beats_ms_when_both_exist() {
        let api = FullscreenApi::resolve(|name| {
            name == "webkitRequestFullscreen" || name == "msRequestFullscreen"
        })
        .expect("resolved");
        assert_eq!(api.exit, "webkitExitFullscreen");
        assert_eq!(api.change_event, "webkitfullscreenchange");
    }

    #[test]
    fn nothing_found_is_unsupported() {
        assert!(FullscreenApi::resolve(|_| false).is_none());
        assert!(!FullscreenAdapter::unsupported().is_supported());
    }
}
