use crate::device::PresentationDevice;
use crate::frame::{FrameData, Pose};
use crate::host::Host;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSource {
    Device,
    Window,
}

pub struct TelemetryPump {
    target: String,
    frame: FrameData,
    frame_ready: bool,
    stopped: bool,
}

impl TelemetryPump {
    pub fn new(message_target: &str) -> Self {
        Self {
            target: message_target.to_string(),
            frame: FrameData::default(),
            frame_ready: false,
            stopped: false,
        }
    }

    pub fn frame(&self) -> &FrameData {
        &self.frame
    }

    pub fn is_frame_ready(&self) -> bool {
        self.frame_ready
    }

    pub fn mark_frame_ready(&mut self, presenting: bool) {
        if presenting {
            self.frame_ready = true;
        }
    }

    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn refresh<D: PresentationDevice>(&mut self, device: &D) -> bool {
        device.update_frame_data(&mut self.frame)
    }

    pub fn next_source<D: PresentationDevice>(&self, device: Option<&D>) -> Option<FrameSource> {
        if self.stopped {
            return None;
        }
        let device = device?;
        if device.is_presenting() && device.has_own_frame_loop() {
            Some(FrameSource::Device)
        } else {
            Some(FrameSource::Window)
        }
    }

    pub fn tick<D: PresentationDevice>(&mut self, device: Option<&D>, host: &impl Host) {
        let Some(device) = device else {
            return;
        };

        if device.is_presenting() && self.frame_ready {
            if let Err(err) = device.submit_frame() {
                log::error!("[submitFrame] {}", err);
            }
            self.frame_ready = false;
        }

        let refreshed = self.refresh(device);

        let pose = if device.has_frame_data() {
            refreshed.then_some(self.frame.pose)
        } else {
            device.legacy_pose()
        };

        if let Some(pose) = pose {
            self.forward_pose(&pose, host);
        }
    }

    fn forward_pose(&self, pose: &Pose, host: &impl Host) {
        let Some(euler) = pose.euler() else {
            return;
        };
        let target = self.target.as_str();
        host.send_message(target, "euler_x", euler.x.into());
        host.send_message(target, "euler_y", euler.y.into());
        host.send_message(target, "euler_z", euler.z.into());

        if let Some([x, y, z]) = pose.position {
            host.send_message(target, "position_x", x.into());
            host.send_message(target, "position_y", y.into());
            host.send_message(target, "position_z", z.into());
        }
    }
}
