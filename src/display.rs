use js_sys::{Array, Function, Object, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::HtmlCanvasElement;

use crate::device::PresentationDevice;
use crate::error::{BridgeError, js_value_to_string};
use crate::frame::{Eye, EyeParameters, FieldOfView, FrameData, Pose};

fn get(target: &JsValue, key: &str) -> Option<JsValue> {
    Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .filter(|value| !value.is_null() && !value.is_undefined())
}

fn get_f64(target: &JsValue, key: &str) -> Option<f64> {
    get(target, key).and_then(|value| value.as_f64())
}

fn js_function(target: &JsValue, name: &str) -> Result<Function, BridgeError> {
    Reflect::get(target, &JsValue::from_str(name))?
        .dyn_into::<Function>()
        .map_err(|_| BridgeError::MissingFunction(name.to_string()))
}

fn read_floats<const N: usize>(value: &JsValue) -> Option<[f32; N]> {
    let values = Array::from(value);
    if values.length() < N as u32 {
        return None;
    }
    let mut out = [0.0f32; N];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = values.get(i as u32).as_f64()? as f32;
    }
    Some(out)
}

pub fn read_pose(pose: &JsValue) -> Pose {
    Pose {
        orientation: get(pose, "orientation").and_then(|v| read_floats::<4>(&v)),
        position: get(pose, "position").and_then(|v| read_floats::<3>(&v)),
    }
}

pub fn read_eye_parameters(params: &JsValue) -> EyeParameters {
    let fov = get(params, "fieldOfView").unwrap_or(JsValue::UNDEFINED);
    EyeParameters {
        offset: get(params, "offset")
            .and_then(|v| read_floats::<3>(&v))
            .unwrap_or_default(),
        render_width: get_f64(params, "renderWidth").unwrap_or(0.0) as u32,
        render_height: get_f64(params, "renderHeight").unwrap_or(0.0) as u32,
        field_of_view: FieldOfView {
            up_degrees: get_f64(&fov, "upDegrees").unwrap_or(0.0),
            right_degrees: get_f64(&fov, "rightDegrees").unwrap_or(0.0),
            down_degrees: get_f64(&fov, "downDegrees").unwrap_or(0.0),
            left_degrees: get_f64(&fov, "leftDegrees").unwrap_or(0.0),
        },
    }
}

/// Kicks off `navigator.getVRDisplays()`. Fails synchronously when the
/// browser has no such function.
pub fn get_displays(navigator: &JsValue) -> Result<Promise, BridgeError> {
    let get_displays = js_function(navigator, "getVRDisplays").map_err(|_| BridgeError::NotReady)?;
    Ok(Promise::from(get_displays.call0(navigator)?))
}

pub(crate) fn watch(label: &'static str, result: JsValue) {
    let Ok(promise) = result.dyn_into::<Promise>() else {
        return;
    };
    spawn_local(async move {
        if let Err(err) = JsFuture::from(promise).await {
            log::error!("[{}] {}", label, js_value_to_string(&err));
        }
    });
}

/// A WebVR `VRDisplay` plus the `VRFrameData` object it fills every frame.
pub struct WebVrDisplay {
    display: JsValue,
    frame_data: Option<JsValue>,
}

impl WebVrDisplay {
    pub fn new(display: JsValue, frame_data_ctor: Option<&Function>) -> Self {
        let frame_data = frame_data_ctor.and_then(|ctor| Reflect::construct(ctor, &Array::new()).ok());
        Self {
            display,
            frame_data,
        }
    }

    pub fn frame_data_constructor(window: &JsValue) -> Option<Function> {
        get(window, "VRFrameData").and_then(|ctor| ctor.dyn_into::<Function>().ok())
    }

    pub fn request_animation_frame(&self, callback: &Function) -> Result<JsValue, BridgeError> {
        let raf = js_function(&self.display, "requestAnimationFrame")?;
        Ok(raf.call1(&self.display, callback)?)
    }

    fn call(&self, name: &str, args: &Array) -> Result<JsValue, BridgeError> {
        let method = js_function(&self.display, name)?;
        Ok(method.apply(&self.display, args)?)
    }
}

impl PresentationDevice for WebVrDisplay {
    type Layer = HtmlCanvasElement;

    fn display_name(&self) -> String {
        get(&self.display, "displayName")
            .and_then(|v| v.as_string())
            .unwrap_or_default()
    }

    fn can_present(&self) -> bool {
        get(&self.display, "capabilities")
            .and_then(|caps| get(&caps, "canPresent"))
            .is_some_and(|v| v.is_truthy())
    }

    fn is_presenting(&self) -> bool {
        get(&self.display, "isPresenting").is_some_and(|v| v.is_truthy())
    }

    fn request_present(&self, layer: &HtmlCanvasElement) -> Result<(), BridgeError> {
        let source = Object::new();
        Reflect::set(&source, &JsValue::from_str("source"), layer)?;
        let result = self.call("requestPresent", &Array::of1(&Array::of1(&source)))?;
        watch("requestPresent", result);
        Ok(())
    }

    fn exit_present(&self) -> Result<(), BridgeError> {
        let result = self.call("exitPresent", &Array::new())?;
        watch("exitPresent", result);
        Ok(())
    }

    fn reset_pose(&self) -> Result<(), BridgeError> {
        self.call("resetPose", &Array::new()).map(|_| ())
    }

    fn submit_frame(&self) -> Result<(), BridgeError> {
        self.call("submitFrame", &Array::new()).map(|_| ())
    }

    fn has_frame_data(&self) -> bool {
        self.frame_data.is_some()
    }

    fn update_frame_data(&self, frame: &mut FrameData) -> bool {
        let Some(data) = &self.frame_data else {
            return false;
        };
        match self.call("getFrameData", &Array::of1(data)) {
            Ok(filled) if filled.as_bool() == Some(false) => return false,
            Ok(_) => {}
            Err(err) => {
                log::debug!("[getFrameData] {}", err);
                return false;
            }
        }

        if let Some(m) = get(data, "leftProjectionMatrix").and_then(|v| read_floats::<16>(&v)) {
            frame.left_projection_matrix = m;
        }
        if let Some(m) = get(data, "rightProjectionMatrix").and_then(|v| read_floats::<16>(&v)) {
            frame.right_projection_matrix = m;
        }
        frame.pose = get(data, "pose").map(|pose| read_pose(&pose)).unwrap_or_default();
        true
    }

    fn legacy_pose(&self) -> Option<Pose> {
        let pose = self.call("getPose", &Array::new()).ok()?;
        if pose.is_null() || pose.is_undefined() {
            return None;
        }
        Some(read_pose(&pose))
    }

    fn eye_parameters(&self, eye: Eye) -> Option<EyeParameters> {
        let params = self
            .call("getEyeParameters", &Array::of1(&JsValue::from_str(eye.as_str())))
            .ok()?;
        if params.is_null() || params.is_undefined() {
            return None;
        }
        Some(read_eye_parameters(&params))
    }

    fn has_own_frame_loop(&self) -> bool {
        get(&self.display, "requestAnimationFrame").is_some_and(|v| v.is_function())
    }
}
