use std::cell::{Cell, RefCell};
use std::ops::Deref;
use std::rc::Rc;
use std::sync::Once;

use crate::controller::CanvasSize;
use crate::device::PresentationDevice;
use crate::error::BridgeError;
use crate::flags::PageFlags;
use crate::frame::{Eye, EyeParameters, FieldOfView, FrameData, IDENTITY, Matrix4, Pose};
use crate::host::{Host, MessageValue};

pub struct MockState {
    pub name: String,
    pub can_present: Cell<bool>,
    pub presenting: Cell<bool>,
    pub frame_data: Cell<bool>,
    pub own_frame_loop: Cell<bool>,
    pub pose: Cell<Option<Pose>>,
    pub eyes: Cell<(EyeParameters, EyeParameters)>,
    pub matrices: Cell<(Matrix4, Matrix4)>,
    pub submits: Cell<u32>,
    pub resets: Cell<u32>,
    pub present_requests: Cell<u32>,
    pub exit_requests: Cell<u32>,
    pub frame_updates: Cell<u32>,
    present_change_hook: RefCell<Option<Box<dyn Fn()>>>,
}

#[derive(Clone)]
pub struct MockDevice(Rc<MockState>);

impl Deref for MockDevice {
    type Target = MockState;

    fn deref(&self) -> &MockState {
        &self.0
    }
}

pub fn eye(render_width: u32, render_height: u32, offset_x: f32) -> EyeParameters {
    EyeParameters {
        offset: [offset_x, 0.0, 0.0],
        render_width,
        render_height,
        field_of_view: FieldOfView {
            up_degrees: 45.0,
            right_degrees: 40.0,
            down_degrees: 50.0,
            left_degrees: 35.0,
        },
    }
}

impl MockDevice {
    pub fn new(name: &str) -> Self {
        Self(Rc::new(MockState {
            name: name.to_string(),
            can_present: Cell::new(true),
            presenting: Cell::new(false),
            frame_data: Cell::new(true),
            own_frame_loop: Cell::new(true),
            pose: Cell::new(None),
            eyes: Cell::new((eye(960, 1080, -0.03), eye(960, 1080, 0.03))),
            matrices: Cell::new((IDENTITY, IDENTITY)),
            submits: Cell::new(0),
            resets: Cell::new(0),
            present_requests: Cell::new(0),
            exit_requests: Cell::new(0),
            frame_updates: Cell::new(0),
            present_change_hook: RefCell::new(None),
        }))
    }

    pub fn with_eyes(self, left: EyeParameters, right: EyeParameters) -> Self {
        self.eyes.set((left, right));
        self
    }

    pub fn with_pose(self, pose: Pose) -> Self {
        self.pose.set(Some(pose));
        self
    }

    /// Called synchronously from `request_present` / `exit_present`.
    pub fn set_present_change_hook(&self, hook: impl Fn() + 'static) {
        *self.present_change_hook.borrow_mut() = Some(Box::new(hook));
    }

    fn notify_present_change(&self) {
        if let Some(hook) = self.present_change_hook.borrow().as_ref() {
            hook();
        }
    }
}

impl PresentationDevice for MockDevice {
    type Layer = ();

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn can_present(&self) -> bool {
        self.can_present.get()
    }

    fn is_presenting(&self) -> bool {
        self.presenting.get()
    }

    fn request_present(&self, _layer: &()) -> Result<(), BridgeError> {
        self.present_requests.set(self.present_requests.get() + 1);
        self.presenting.set(true);
        self.notify_present_change();
        Ok(())
    }

    fn exit_present(&self) -> Result<(), BridgeError> {
        self.exit_requests.set(self.exit_requests.get() + 1);
        self.presenting.set(false);
        self.notify_present_change();
        Ok(())
    }

    fn reset_pose(&self) -> Result<(), BridgeError> {
        self.resets.set(self.resets.get() + 1);
        Ok(())
    }

    fn submit_frame(&self) -> Result<(), BridgeError> {
        self.submits.set(self.submits.get() + 1);
        Ok(())
    }

    fn has_frame_data(&self) -> bool {
        self.frame_data.get()
    }

    fn update_frame_data(&self, frame: &mut FrameData) -> bool {
        if !self.frame_data.get() {
            return false;
        }
        self.frame_updates.set(self.frame_updates.get() + 1);
        let (left, right) = self.matrices.get();
        frame.left_projection_matrix = left;
        frame.right_projection_matrix = right;
        frame.pose = self.pose.get().unwrap_or_default();
        true
    }

    fn legacy_pose(&self) -> Option<Pose> {
        self.pose.get()
    }

    fn eye_parameters(&self, eye: Eye) -> Option<EyeParameters> {
        let (left, right) = self.eyes.get();
        Some(match eye {
            Eye::Left => left,
            Eye::Right => right,
        })
    }

    fn has_own_frame_loop(&self) -> bool {
        self.own_frame_loop.get()
    }
}

#[derive(Default)]
pub struct HostLog {
    pub messages: RefCell<Vec<(String, String, MessageValue)>>,
    pub flags: Cell<Option<PageFlags>>,
    pub labels: RefCell<Vec<bool>>,
    pub canvas: Cell<Option<CanvasSize>>,
    pub fullscreen_enters: Cell<u32>,
    pub fullscreen_toggles: Cell<u32>,
}

#[derive(Clone, Default)]
pub struct RecordingHost(Rc<HostLog>);

impl Deref for RecordingHost {
    type Target = HostLog;

    fn deref(&self) -> &HostLog {
        &self.0
    }
}

impl RecordingHost {
    pub fn fields(&self) -> Vec<String> {
        self.messages
            .borrow()
            .iter()
            .map(|(_, field, _)| field.clone())
            .collect()
    }

    pub fn count(&self, field: &str) -> usize {
        self.messages
            .borrow()
            .iter()
            .filter(|(_, f, _)| f == field)
            .count()
    }

    pub fn last(&self, field: &str) -> Option<MessageValue> {
        self.messages
            .borrow()
            .iter()
            .rev()
            .find(|(_, f, _)| f == field)
            .map(|(_, _, value)| value.clone())
    }

    pub fn clear_messages(&self) {
        self.messages.borrow_mut().clear();
    }
}

impl Host for RecordingHost {
    fn send_message(&self, target: &str, field: &str, value: MessageValue) {
        self.messages
            .borrow_mut()
            .push((target.to_string(), field.to_string(), value));
    }

    fn publish_flags(&self, flags: &PageFlags) {
        self.flags.set(Some(*flags));
    }

    fn set_toggle_label(&self, presenting: bool) {
        self.labels.borrow_mut().push(presenting);
    }

    fn set_canvas_size(&self, size: CanvasSize) {
        self.canvas.set(Some(size));
    }

    fn enter_fullscreen(&self) {
        self.fullscreen_enters.set(self.fullscreen_enters.get() + 1);
    }

    fn toggle_fullscreen(&self) {
        self.fullscreen_toggles.set(self.fullscreen_toggles.get() + 1);
    }
}

thread_local! {
    static CAPTURED: RefCell<Vec<(log::Level, String)>> = const { RefCell::new(Vec::new()) };
}

struct CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        CAPTURED.with(|captured| {
            captured
                .borrow_mut()
                .push((record.level(), record.args().to_string()));
        });
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static LOGGER_INIT: Once = Once::new();

pub fn capture_logs() {
    LOGGER_INIT.call_once(|| {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(log::LevelFilter::Trace);
    });
    CAPTURED.with(|captured| captured.borrow_mut().clear());
}

pub fn warnings() -> Vec<String> {
    CAPTURED.with(|captured| {
        captured
            .borrow()
            .iter()
            .filter(|(level, _)| *level == log::Level::Warn)
            .map(|(_, message)| message.clone())
            .collect()
    })
}
