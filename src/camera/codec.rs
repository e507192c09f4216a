use glam::{Mat4, Vec3, Vec4};

/// Gimbal-lock threshold on `cos(orientation.y)`.
const GIMBAL_EPS: f32 = 1e-6;

/// One camera sample: vertical field of view plus a 4x4 camera matrix.
///
/// Timeline samples received from the host carry the matrix in the host's convention.
/// Setter samples recorded by the renderer carry the renderer's view-inverse matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraSample {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Camera-to-world transform.
    pub matrix: Mat4,
}

impl CameraSample {
    /// Build a sample from the 12 wire matrix scalars (four columns of three: x axis,
    /// y axis, z axis, translation).
    pub fn from_wire(fov_degrees: f32, m: &[f32; 12]) -> Self {
        let matrix = Mat4::from_cols(
            Vec4::new(m[0], m[1], m[2], 0.0),
            Vec4::new(m[3], m[4], m[5], 0.0),
            Vec4::new(m[6], m[7], m[8], 0.0),
            Vec4::new(m[9], m[10], m[11], 1.0),
        );
        Self {
            fov_degrees,
            matrix,
        }
    }
}

/// Renderer-side camera derived from a host sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraView {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Camera-to-world transform in renderer convention.
    pub view_inverse: Mat4,
    /// World-to-camera transform.
    pub view: Mat4,
}

/// Host-side camera encoding.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HostCamera {
    /// Translation column.
    pub position: Vec3,
    /// Euler angles in degrees.
    pub orientation: Vec3,
    /// Zoom in pixels for the output height.
    pub zoom: f32,
}

fn axis_flip(m: Mat4) -> Mat4 {
    m * Mat4::from_scale(Vec3::new(1.0, -1.0, -1.0))
}

#[inline]
fn at(m: &Mat4, row: usize, col: usize) -> f32 {
    m.col(col)[row]
}

/// Host sample to renderer camera.
pub fn decode_camera(sample: &CameraSample) -> CameraView {
    let view_inverse = axis_flip(sample.matrix);
    CameraView {
        fov_degrees: sample.fov_degrees,
        view_inverse,
        view: view_inverse.inverse(),
    }
}

/// Renderer camera (fov + view-inverse) to the host's position/orientation/zoom.
pub fn encode_camera(fov_degrees: f32, view_inverse: &Mat4, output_height: u32) -> HostCamera {
    let m = axis_flip(*view_inverse);

    let position = Vec3::new(at(&m, 0, 3), at(&m, 1, 3), at(&m, 2, 3));

    let mut orientation = Vec3::ZERO;
    orientation.y = at(&m, 0, 2).clamp(-1.0, 1.0).asin();
    let cos_y = orientation.y.cos();
    if cos_y.abs() >= GIMBAL_EPS {
        orientation.x = (-at(&m, 1, 2)).atan2(at(&m, 2, 2));
        orientation.z = (-at(&m, 0, 1) / cos_y).clamp(-1.0, 1.0).asin();
        if at(&m, 0, 0) < 0.0 {
            orientation.z = std::f32::consts::PI - orientation.z;
        }
    } else {
        orientation.x = at(&m, 2, 1).atan2(at(&m, 1, 1));
        orientation.y = std::f32::consts::FRAC_PI_2;
        orientation.z = 0.0;
    }
    let orientation = Vec3::new(
        orientation.x.to_degrees(),
        orientation.y.to_degrees(),
        orientation.z.to_degrees(),
    );

    HostCamera {
        position,
        orientation,
        zoom: zoom_for_fov(fov_degrees, output_height),
    }
}

/// `height / (2 * tan(fov / 2))`.
pub fn zoom_for_fov(fov_degrees: f32, output_height: u32) -> f32 {
    output_height as f32 / (2.0 * (fov_degrees.to_radians() / 2.0).tan())
}

/// Inverse of [`zoom_for_fov`].
pub fn fov_from_zoom(zoom: f32, output_height: u32) -> f32 {
    (2.0 * (output_height as f32 / (2.0 * zoom)).atan()).to_degrees()
}

#[cfg(test)]
#[path = "../../tests/unit/camera/codec.rs"]
mod tests;
