use crate::config::BridgeConfig;
use crate::controller::{CanvasSize, PresentationController};
use crate::device::PresentationDevice;
use crate::flags::PageFlags;
use crate::host::Host;
use crate::input::KeyCommand;
use crate::probe::Capabilities;
use crate::telemetry::{FrameSource, TelemetryPump};

pub struct Bridge<D: PresentationDevice, H: Host> {
    host: H,
    capabilities: Capabilities,
    flags: PageFlags,
    controller: PresentationController<D>,
    pump: TelemetryPump,
    message_target: String,
}

impl<D: PresentationDevice, H: Host> Bridge<D, H> {
    pub fn new(
        config: &BridgeConfig,
        host: H,
        capabilities: Capabilities,
        layer: D::Layer,
        original_size: CanvasSize,
    ) -> Self {
        let mut flags = PageFlags::default();
        capabilities.apply(&mut flags);
        host.publish_flags(&flags);

        Self {
            host,
            capabilities,
            flags,
            controller: PresentationController::new(config, layer, original_size),
            pump: TelemetryPump::new(config.message_target),
            message_target: config.message_target.to_string(),
        }
    }

    pub fn controller(&self) -> &PresentationController<D> {
        &self.controller
    }

    pub fn device(&self) -> Option<&D> {
        self.controller.device()
    }

    pub fn mark_app_loaded(&mut self) {
        self.flags.unity_loaded = true;
        self.host.publish_flags(&self.flags);
    }

    /// Returns false when enumeration produced nothing usable.
    pub fn attach_devices(&mut self, devices: impl IntoIterator<Item = D>) -> bool {
        if !self.controller.select_device(devices) {
            log::warn!("[getVRDisplays] No VR device was detected");
            return false;
        }
        let Some(device) = self.controller.device() else {
            return false;
        };

        if device.can_present() {
            self.flags.vr_loaded = true;
            self.host.publish_flags(&self.flags);
        }

        let refreshed = self.pump.refresh(device);
        let frame = (device.has_frame_data() && refreshed).then(|| self.pump.frame());
        self.controller.send_eye_parameters(&self.host, frame);
        self.controller.resize_canvas(&self.host);
        true
    }

    pub fn post_render(&mut self) {
        let presenting = self.controller.is_presenting();
        self.pump.mark_frame_ready(presenting);
    }

    pub fn tick(&mut self) {
        self.pump.tick(self.controller.device(), &self.host);
    }

    pub fn next_frame_source(&self) -> Option<FrameSource> {
        self.pump.next_source(self.controller.device())
    }

    pub fn handle_key(&mut self, command: KeyCommand) {
        let result = match command {
            KeyCommand::ToggleMode if self.capabilities.supports_vr => {
                self.controller.toggle_present()
            }
            KeyCommand::ToggleMode => {
                self.host.toggle_fullscreen();
                Ok(())
            }
            // Escape and z only exist once a display is attached.
            _ if self.controller.device().is_none() => Ok(()),
            KeyCommand::ExitPresent => self.controller.exit_present(),
            KeyCommand::ResetPose => self.controller.reset_pose(),
        };
        if let Err(err) = result {
            log::error!("[keyup] {}", err);
        }
    }

    pub fn fullscreen_clicked(&self) {
        self.host.enter_fullscreen();
    }

    pub fn toggle_clicked(&self) {
        if self.controller.device().is_none() {
            log::warn!("[vrToggle] No VR device was detected");
            return;
        }
        if let Err(err) = self.controller.toggle_present() {
            log::error!("[vrToggle] {}", err);
        }
    }

    pub fn reset_clicked(&self) {
        if self.controller.device().is_none() {
            log::warn!("[btnVrResetOnClick] No VR device was detected");
            return;
        }
        if let Err(err) = self.controller.reset_pose() {
            log::error!("[btnVrResetOnClick] {}", err);
        }
    }

    pub fn present_changed(&mut self) {
        let Some(presenting) = self.controller.observe_presentation() else {
            return;
        };

        let mode = if presenting { "vr" } else { "normal" };
        log::info!("[modeChange] {}", mode);
        self.host
            .send_message(&self.message_target, "changeMode", mode.into());
        self.flags.vr_presenting = presenting;
        self.host.publish_flags(&self.flags);
        self.host.set_toggle_label(presenting);
        self.controller.resize_canvas(&self.host);
    }

    pub fn resized(&self) {
        if self.controller.device().is_some() {
            self.controller.resize_canvas(&self.host);
        }
    }

    pub fn unload(&mut self) {
        if let Err(err) = self.controller.exit_present() {
            log::warn!("[beforeunload] {}", err);
        }
        self.pump.stop();
    }
}
