use glam::{EulerRot, Quat};

/// Column-major 4x4 matrix.
pub type Matrix4 = [f32; 16];

pub const IDENTITY: Matrix4 = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pose {
    /// Quaternion as (x, y, z, w). `None` until tracking has an orientation.
    pub orientation: Option<[f32; 4]>,
    pub position: Option<[f32; 3]>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EulerAngles {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Pose {
    /// Orientation as XYZ Euler angles in radians.
    pub fn euler(&self) -> Option<EulerAngles> {
        let (x, y, z) = Quat::from_array(self.orientation?).to_euler(EulerRot::XYZ);
        Some(EulerAngles { x, y, z })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameData {
    pub left_projection_matrix: Matrix4,
    pub right_projection_matrix: Matrix4,
    pub pose: Pose,
}

impl Default for FrameData {
    fn default() -> Self {
        Self {
            left_projection_matrix: IDENTITY,
            right_projection_matrix: IDENTITY,
            pose: Pose::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eye {
    Left,
    Right,
}

impl Eye {
    pub fn as_str(self) -> &'static str {
        match self {
            Eye::Left => "left",
            Eye::Right => "right",
        }
    }

    pub fn message_prefix(self) -> &'static str {
        match self {
            Eye::Left => "eyeL",
            Eye::Right => "eyeR",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FieldOfView {
    pub up_degrees: f64,
    pub right_degrees: f64,
    pub down_degrees: f64,
    pub left_degrees: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EyeParameters {
    /// Offset from the midpoint between the eyes, in meters.
    pub offset: [f32; 3],
    pub render_width: u32,
    pub render_height: u32,
    pub field_of_view: FieldOfView,
}

pub fn join_matrix(matrix: &Matrix4) -> String {
    matrix
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
