use crate::config::BridgeConfig;
use crate::device::PresentationDevice;
use crate::error::BridgeError;
use crate::frame::{Eye, FrameData, join_matrix};
use crate::host::Host;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationState {
    NoDevice,
    Idle,
    Presenting,
}

pub struct PresentationController<D: PresentationDevice> {
    device: Option<D>,
    layer: D::Layer,
    original_size: CanvasSize,
    fixed_resolution_display: String,
    fixed_resolution: CanvasSize,
    message_target: String,
    last_presenting: bool,
}

impl<D: PresentationDevice> PresentationController<D> {
    pub fn new(config: &BridgeConfig, layer: D::Layer, original_size: CanvasSize) -> Self {
        Self {
            device: None,
            layer,
            original_size,
            fixed_resolution_display: config.fixed_resolution_display.to_string(),
            fixed_resolution: config.fixed_resolution,
            message_target: config.message_target.to_string(),
            last_presenting: false,
        }
    }

    /// Keeps the first device of an enumeration. Later enumerations never
    /// replace it. Returns whether a device is selected afterwards.
    pub fn select_device(&mut self, devices: impl IntoIterator<Item = D>) -> bool {
        if self.device.is_none() {
            self.device = devices.into_iter().next();
            if let Some(device) = &self.device {
                log::info!("[selectDevice] using {}", device.display_name());
            }
        }
        self.device.is_some()
    }

    pub fn device(&self) -> Option<&D> {
        self.device.as_ref()
    }

    pub fn state(&self) -> PresentationState {
        match &self.device {
            None => PresentationState::NoDevice,
            Some(device) if device.is_presenting() => PresentationState::Presenting,
            Some(_) => PresentationState::Idle,
        }
    }

    pub fn is_presenting(&self) -> bool {
        self.state() == PresentationState::Presenting
    }

    pub fn request_present(&self) -> Result<(), BridgeError> {
        let device = self.device.as_ref().ok_or(BridgeError::NoDevice)?;
        device.request_present(&self.layer)
    }

    pub fn exit_present(&self) -> Result<(), BridgeError> {
        match &self.device {
            Some(device) if device.is_presenting() => device.exit_present(),
            _ => Ok(()),
        }
    }

    pub fn toggle_present(&self) -> Result<(), BridgeError> {
        match self.state() {
            PresentationState::NoDevice => {
                log::warn!("[togglePresent] No VR device was detected");
                Ok(())
            }
            PresentationState::Presenting => self.exit_present(),
            PresentationState::Idle => self.request_present(),
        }
    }

    pub fn reset_pose(&self) -> Result<(), BridgeError> {
        match &self.device {
            Some(device) => device.reset_pose(),
            None => {
                log::warn!("[resetPose] No VR device was detected");
                Ok(())
            }
        }
    }

    pub fn target_canvas_size(&self) -> CanvasSize {
        let Some(device) = self.device.as_ref().filter(|d| d.is_presenting()) else {
            return self.original_size;
        };

        if device.display_name() == self.fixed_resolution_display {
            return self.fixed_resolution;
        }

        let left = device.eye_parameters(Eye::Left).unwrap_or_default();
        let right = device.eye_parameters(Eye::Right).unwrap_or_default();
        CanvasSize {
            width: left.render_width.max(right.render_width) * 2,
            height: left.render_height.max(right.render_height),
        }
    }

    pub fn resize_canvas(&self, host: &impl Host) {
        host.set_canvas_size(self.target_canvas_size());
    }

    /// Returns the new presenting value only when it actually flipped.
    pub fn observe_presentation(&mut self) -> Option<bool> {
        let presenting = self.is_presenting();
        if presenting == self.last_presenting {
            return None;
        }
        self.last_presenting = presenting;
        Some(presenting)
    }

    /// One-shot eye setup for the embedded camera rig. Projection matrices
    /// when frame data is available, field of view and offsets otherwise.
    pub fn send_eye_parameters(&self, host: &impl Host, frame: Option<&FrameData>) {
        let Some(device) = &self.device else {
            log::warn!("[getEyeParameters] No VR device was detected");
            return;
        };
        let target = self.message_target.as_str();

        if let Some(frame) = frame {
            host.send_message(
                target,
                "eyeL_projectionMatrix",
                join_matrix(&frame.left_projection_matrix).into(),
            );
            host.send_message(
                target,
                "eyeR_projectionMatrix",
                join_matrix(&frame.right_projection_matrix).into(),
            );
            return;
        }

        for eye in [Eye::Left, Eye::Right] {
            let params = device.eye_parameters(eye).unwrap_or_default();
            let prefix = eye.message_prefix();
            host.send_message(target, &format!("{prefix}_translation_x"), params.offset[0].into());
        }
        for eye in [Eye::Left, Eye::Right] {
            let fov = device.eye_parameters(eye).unwrap_or_default().field_of_view;
            let prefix = eye.message_prefix();
            host.send_message(target, &format!("{prefix}_fovUpDegrees"), fov.up_degrees.into());
            host.send_message(target, &format!("{prefix}_fovDownDegrees"), fov.down_degrees.into());
            host.send_message(target, &format!("{prefix}_fovLeftDegrees"), fov.left_degrees.into());
            host.send_message(
                target,
                &format!("{prefix}_fovRightDegrees"),
                fov.right_degrees.into(),
            );
        }
    }
}
