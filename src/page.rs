use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Function, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{
    Document, Event, HtmlButtonElement, HtmlCanvasElement, HtmlElement, KeyboardEvent, Window,
};

use crate::bridge::Bridge;
use crate::config::BridgeConfig;
use crate::controller::CanvasSize;
use crate::display::{WebVrDisplay, get_displays, watch};
use crate::error::{BridgeError, js_value_to_string};
use crate::flags::PageFlags;
use crate::fullscreen::FullscreenAdapter;
use crate::host::{Host, MessageValue};
use crate::input::{KeyCommand, KeyPress};
use crate::probe::Capabilities;
use crate::shared::Shared;
use crate::telemetry::FrameSource;

type WebBridge = Bridge<WebVrDisplay, PageHost>;
type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

thread_local! {
    static BRIDGE: RefCell<Option<Shared<WebBridge>>> = const { RefCell::new(None) };
}

fn window() -> Result<Window, BridgeError> {
    web_sys::window().ok_or(BridgeError::NoWindow)
}

pub(crate) fn current_config() -> BridgeConfig {
    let search = web_sys::window()
        .and_then(|win| win.location().search().ok())
        .unwrap_or_default();
    BridgeConfig::from_query(&search)
}

pub struct PageHost {
    window: Window,
    document: JsValue,
    body: HtmlElement,
    canvas: HtmlCanvasElement,
    toggle_button: Option<HtmlButtonElement>,
    fullscreen: FullscreenAdapter,
    send_message_global: &'static str,
}

impl PageHost {
    /// `document` is only consulted for the fullscreen element and exit call.
    pub fn new(
        window: Window,
        document: JsValue,
        body: HtmlElement,
        canvas: HtmlCanvasElement,
        toggle_button: Option<HtmlButtonElement>,
        fullscreen: FullscreenAdapter,
        send_message_global: &'static str,
    ) -> Self {
        Self {
            window,
            document,
            body,
            canvas,
            toggle_button,
            fullscreen,
            send_message_global,
        }
    }
}

impl Host for PageHost {
    fn send_message(&self, target: &str, field: &str, value: MessageValue) {
        let send = Reflect::get(&self.window, &JsValue::from_str(self.send_message_global))
            .ok()
            .and_then(|f| f.dyn_into::<Function>().ok());
        let Some(send) = send else {
            log::debug!("[{}] not available, dropping {}", self.send_message_global, field);
            return;
        };

        let value = match value {
            MessageValue::Number(n) => JsValue::from_f64(n),
            MessageValue::Text(s) => JsValue::from_str(&s),
        };
        if let Err(err) = send.call3(
            &JsValue::NULL,
            &JsValue::from_str(target),
            &JsValue::from_str(field),
            &value,
        ) {
            log::error!("[{}] {}: {}", self.send_message_global, field, js_value_to_string(&err));
        }
    }

    fn publish_flags(&self, flags: &PageFlags) {
        let dataset = self.body.dataset();
        for (key, value) in flags.dataset_entries() {
            let result = match value {
                Some(value) => dataset.set(key, value),
                None => Reflect::delete_property(&dataset, &JsValue::from_str(key)).map(|_| ()),
            };
            if let Err(err) = result {
                log::debug!("[dataset] {}: {}", key, js_value_to_string(&err));
            }
        }
    }

    fn set_toggle_label(&self, presenting: bool) {
        let Some(button) = &self.toggle_button else {
            return;
        };
        let key = if presenting { "exitVrTitle" } else { "enterVrTitle" };
        if let Some(label) = button.dataset().get(key) {
            button.set_text_content(Some(&label));
            button.set_title(&label);
        }
    }

    fn set_canvas_size(&self, size: CanvasSize) {
        self.canvas.set_width(size.width);
        self.canvas.set_height(size.height);
    }

    fn enter_fullscreen(&self) {
        match self.fullscreen.enter(&self.canvas, &JsValue::UNDEFINED) {
            Ok(result) => watch("requestFullscreen", result),
            Err(err) => log::warn!("[fullscreen] {}", err),
        }
    }

    fn toggle_fullscreen(&self) {
        if self.fullscreen.is_presenting(&self.document) {
            match self.fullscreen.exit(&self.document) {
                Ok(result) => watch("exitFullscreen", result),
                Err(err) => log::warn!("[fullscreen] {}", err),
            }
        } else {
            self.enter_fullscreen();
        }
    }
}

fn element<T: JsCast>(document: &Document, id: &'static str) -> Result<T, BridgeError> {
    document
        .get_element_by_id(id)
        .ok_or(BridgeError::MissingElement(id))?
        .dyn_into::<T>()
        .map_err(|_| BridgeError::MissingElement(id))
}

fn optional_button(document: &Document, id: &'static str) -> Option<HtmlButtonElement> {
    let button = element::<HtmlButtonElement>(document, id);
    if let Err(err) = &button {
        log::warn!("[vrInit] {}", err);
    }
    button.ok()
}

/// Non-VR render size, as the embedding page recorded it in
/// `data-unity-width` / `data-unity-height`; the canvas as-is otherwise.
pub fn cached_app_size(body: &HtmlElement, canvas: &HtmlCanvasElement) -> CanvasSize {
    let dataset = body.dataset();
    let read = |key: &str| dataset.get(key).and_then(|v| v.trim().parse::<u32>().ok());
    CanvasSize {
        width: read("unityWidth").unwrap_or_else(|| canvas.width()),
        height: read("unityHeight").unwrap_or_else(|| canvas.height()),
    }
}

fn on_click(
    button: &HtmlButtonElement,
    bridge: &Shared<WebBridge>,
    blur: bool,
    action: fn(&WebBridge),
) -> Result<(), BridgeError> {
    let bridge = bridge.clone();
    let target = button.clone();
    let handler = Closure::wrap(Box::new(move |_event: Event| {
        if blur {
            if let Err(err) = target.blur() {
                log::debug!("[blur] {}", js_value_to_string(&err));
            }
        }
        bridge.with(move |bridge| action(bridge));
    }) as Box<dyn FnMut(_)>);

    button.add_event_listener_with_callback("click", handler.as_ref().unchecked_ref())?;
    handler.forget();
    Ok(())
}

fn on_window_event(
    win: &Window,
    event: &str,
    bridge: &Shared<WebBridge>,
    action: fn(&mut WebBridge),
) -> Result<(), BridgeError> {
    let bridge = bridge.clone();
    let handler = Closure::wrap(Box::new(move |_event: Event| {
        bridge.with(action);
    }) as Box<dyn FnMut(_)>);

    win.add_event_listener_with_callback(event, handler.as_ref().unchecked_ref())?;
    handler.forget();
    Ok(())
}

fn install_key_listener(
    win: &Window,
    document: &Document,
    bridge: &Shared<WebBridge>,
) -> Result<(), BridgeError> {
    let bridge = bridge.clone();
    let document = document.clone();
    let handler = Closure::wrap(Box::new(move |event: KeyboardEvent| {
        let focus_on_body = match document.active_element() {
            None => true,
            Some(active) => document
                .body()
                .is_some_and(|body| JsValue::from(active) == JsValue::from(body)),
        };
        let key = event.key();
        let press = KeyPress {
            key: &key,
            shift: event.shift_key(),
            meta: event.meta_key(),
            alt: event.alt_key(),
            ctrl: event.ctrl_key(),
            focus_on_body,
        };
        if let Some(command) = KeyCommand::from_key_press(&press) {
            bridge.with(move |bridge| bridge.handle_key(command));
        }
    }) as Box<dyn FnMut(KeyboardEvent)>);

    win.add_event_listener_with_callback("keyup", handler.as_ref().unchecked_ref())?;
    handler.forget();
    Ok(())
}

fn schedule(
    bridge: &Shared<WebBridge>,
    callback: &FrameCallback,
    source: FrameSource,
) -> Result<(), BridgeError> {
    let callback = callback.borrow();
    let Some(callback) = callback.as_ref() else {
        return Ok(());
    };
    let callback: &Function = callback.as_ref().unchecked_ref();

    match source {
        FrameSource::Device => bridge
            .try_with(|bridge| match bridge.device() {
                Some(device) => device.request_animation_frame(callback).map(|_| ()),
                None => Ok(()),
            })
            .unwrap_or_else(|| {
                window()?.request_animation_frame(callback)?;
                Ok(())
            }),
        FrameSource::Window => {
            window()?.request_animation_frame(callback)?;
            Ok(())
        }
    }
}

fn start_frame_loop(bridge: Shared<WebBridge>) {
    let holder: FrameCallback = Rc::new(RefCell::new(None));

    let bridge_cb = bridge.clone();
    let holder_cb = Rc::clone(&holder);
    let cb = Closure::wrap(Box::new(move |_ts: f64| {
        let next = bridge_cb.try_with(|bridge| {
            bridge.tick();
            bridge.next_frame_source()
        });
        // Busy means a handler further up the stack owns the bridge; skip this frame.
        let source = match next {
            Some(Some(source)) => source,
            Some(None) => {
                log::info!("[update] frame loop stopped");
                return;
            }
            None => FrameSource::Window,
        };
        if let Err(err) = schedule(&bridge_cb, &holder_cb, source) {
            log::error!("[update] {}", err);
        }
    }) as Box<dyn FnMut(f64)>);

    *holder.borrow_mut() = Some(cb);
    if let Err(err) = schedule(&bridge, &holder, FrameSource::Window) {
        log::error!("[update] {}", err);
    }
}

async fn attach_displays(
    bridge: Shared<WebBridge>,
    displays: js_sys::Promise,
    frame_data_ctor: Option<Function>,
) {
    let list = match JsFuture::from(displays).await {
        Ok(list) => list,
        Err(err) => {
            log::error!("[getVRDisplays] {}", js_value_to_string(&err));
            return;
        }
    };

    let devices: Vec<WebVrDisplay> = Array::from(&list)
        .iter()
        .map(|display| WebVrDisplay::new(display, frame_data_ctor.as_ref()))
        .collect();
    if bridge.try_with(|bridge| bridge.attach_devices(devices)) != Some(true) {
        return;
    }

    let wired = window().and_then(|win| {
        on_window_event(&win, "vrdisplaypresentchange", &bridge, |b| b.present_changed())?;
        on_window_event(&win, "resize", &bridge, |b| b.resized())?;
        on_window_event(&win, "beforeunload", &bridge, |b| b.unload())
    });
    if let Err(err) = wired {
        log::error!("[vrInit] {}", err);
    }

    start_frame_loop(bridge);
}

pub(crate) fn init() -> Result<(), BridgeError> {
    if BRIDGE.with(|slot| slot.borrow().is_some()) {
        log::warn!("[vrInit] already initialised");
        return Ok(());
    }

    let config = current_config();
    let win = window()?;
    let document = win.document().ok_or(BridgeError::NoWindow)?;
    let body = document.body().ok_or(BridgeError::MissingElement("body"))?;
    let canvas = element::<HtmlCanvasElement>(&document, config.canvas_id)?;
    let fullscreen_button = optional_button(&document, config.fullscreen_button_id);
    let toggle_button = optional_button(&document, config.toggle_button_id);
    let reset_button = optional_button(&document, config.reset_button_id);

    let capabilities = if config.vr_disabled {
        log::info!("[vrInit] VR disabled via novr=1");
        Capabilities::default()
    } else {
        Capabilities::detect(&win, &win.navigator())
    };

    let host = PageHost::new(
        win.clone(),
        document.clone().into(),
        body.clone(),
        canvas.clone(),
        toggle_button.clone(),
        FullscreenAdapter::for_element(&body),
        config.send_message_global,
    );
    let original_size = cached_app_size(&body, &canvas);
    let bridge = Shared::new(Bridge::new(
        &config,
        host,
        capabilities,
        canvas,
        original_size,
    ));
    BRIDGE.with(|slot| *slot.borrow_mut() = Some(bridge.clone()));

    bridge.with(|bridge| bridge.mark_app_loaded());

    if let Some(button) = &fullscreen_button {
        on_click(button, &bridge, false, WebBridge::fullscreen_clicked)?;
    }
    if let Some(button) = &toggle_button {
        on_click(button, &bridge, true, WebBridge::toggle_clicked)?;
    }
    if let Some(button) = &reset_button {
        on_click(button, &bridge, true, WebBridge::reset_clicked)?;
    }
    install_key_listener(&win, &document, &bridge)?;

    if !capabilities.supports_vr {
        log::warn!("WebVR is not supported");
        return Ok(());
    }

    let displays = get_displays(&win.navigator())?;
    let frame_data_ctor = if capabilities.frame_data {
        WebVrDisplay::frame_data_constructor(&win)
    } else {
        None
    };
    spawn_local(attach_displays(bridge, displays, frame_data_ctor));

    Ok(())
}

pub(crate) fn post_render() {
    let bridge = BRIDGE.with(|slot| slot.borrow().clone());
    if let Some(bridge) = bridge {
        bridge.with(|bridge| bridge.post_render());
    }
}

pub(crate) fn install_globals(vr_init: fn(), post_render: fn()) -> Result<(), BridgeError> {
    let win = window()?;
    for (name, entry) in [("vrInit", vr_init), ("postRender", post_render)] {
        let callback = Closure::wrap(Box::new(entry) as Box<dyn FnMut()>);
        Reflect::set(&win, &JsValue::from_str(name), callback.as_ref())?;
        callback.forget();
    }
    Ok(())
}
