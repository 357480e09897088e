use crate::error::BridgeError;
use crate::frame::{Eye, EyeParameters, FrameData, Pose};

/// A display that can take over presentation of the canvas.
pub trait PresentationDevice {
    type Layer;

    fn display_name(&self) -> String;

    fn can_present(&self) -> bool;

    fn is_presenting(&self) -> bool;

    fn request_present(&self, layer: &Self::Layer) -> Result<(), BridgeError>;

    fn exit_present(&self) -> Result<(), BridgeError>;

    fn reset_pose(&self) -> Result<(), BridgeError>;

    fn submit_frame(&self) -> Result<(), BridgeError>;

    fn has_frame_data(&self) -> bool;

    /// Overwrites `frame` with the latest snapshot. Returns false when the
    /// device had nothing to report.
    fn update_frame_data(&self, frame: &mut FrameData) -> bool;

    /// Pre-frame-data pose query; best effort.
    fn legacy_pose(&self) -> Option<Pose>;

    fn eye_parameters(&self, eye: Eye) -> Option<EyeParameters>;

    fn has_own_frame_loop(&self) -> bool;
}
