use glam::{Vec2, Vec3};

use crate::foundation::error::{BridgeError, BridgeResult};

/// Parameter type tag.
///
/// The order of the variants has no wire meaning; the host identifies types by
/// [`ParamKind::wire_name`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ParamKind {
    /// Boolean toggle, one int scalar on the wire.
    Checkbox,
    /// Single float.
    Slider,
    /// 2D point.
    Point2,
    /// 3D point.
    Point3,
    /// RGB color, three floats.
    Color,
}

impl ParamKind {
    /// Number of scalars one value occupies on the wire.
    pub fn arity(self) -> usize {
        match self {
            Self::Checkbox | Self::Slider => 1,
            Self::Point2 => 2,
            Self::Point3 | Self::Color => 3,
        }
    }

    /// Type name understood by the host.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Checkbox => "checkbox",
            Self::Slider => "slider",
            Self::Point2 => "point",
            Self::Point3 => "point3d",
            Self::Color => "color",
        }
    }
}

impl std::str::FromStr for ParamKind {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "checkbox" => Ok(Self::Checkbox),
            "slider" => Ok(Self::Slider),
            "point" => Ok(Self::Point2),
            "point3d" => Ok(Self::Point3),
            "color" => Ok(Self::Color),
            other => Err(BridgeError::validation(format!(
                "unknown parameter type '{other}'"
            ))),
        }
    }
}

/// A typed parameter value.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ParamValue {
    /// Boolean toggle.
    Checkbox(bool),
    /// Single float.
    Slider(f32),
    /// 2D point.
    Point2(Vec2),
    /// 3D point.
    Point3(Vec3),
    /// Linear RGB color.
    Color([f32; 3]),
}

impl ParamValue {
    /// Type tag of this value.
    pub fn kind(&self) -> ParamKind {
        match self {
            Self::Checkbox(_) => ParamKind::Checkbox,
            Self::Slider(_) => ParamKind::Slider,
            Self::Point2(_) => ParamKind::Point2,
            Self::Point3(_) => ParamKind::Point3,
            Self::Color(_) => ParamKind::Color,
        }
    }

    /// Build a value of `kind` from exactly `kind.arity()` scalars.
    pub fn from_scalars(kind: ParamKind, s: &[f32]) -> BridgeResult<Self> {
        if s.len() != kind.arity() {
            return Err(BridgeError::validation(format!(
                "{} expects {} scalars, got {}",
                kind.wire_name(),
                kind.arity(),
                s.len()
            )));
        }
        Ok(match kind {
            ParamKind::Checkbox => Self::Checkbox(s[0] != 0.0),
            ParamKind::Slider => Self::Slider(s[0]),
            ParamKind::Point2 => Self::Point2(Vec2::new(s[0], s[1])),
            ParamKind::Point3 => Self::Point3(Vec3::new(s[0], s[1], s[2])),
            ParamKind::Color => Self::Color([s[0], s[1], s[2]]),
        })
    }

    /// Return the checkbox state, or `None` for other kinds.
    pub fn as_checkbox(&self) -> Option<bool> {
        match *self {
            Self::Checkbox(v) => Some(v),
            _ => None,
        }
    }

    /// Return the slider value, or `None` for other kinds.
    pub fn as_slider(&self) -> Option<f32> {
        match *self {
            Self::Slider(v) => Some(v),
            _ => None,
        }
    }

    /// Return the 2D point, or `None` for other kinds.
    pub fn as_point2(&self) -> Option<Vec2> {
        match *self {
            Self::Point2(v) => Some(v),
            _ => None,
        }
    }

    /// Return the 3D point, or `None` for other kinds.
    pub fn as_point3(&self) -> Option<Vec3> {
        match *self {
            Self::Point3(v) => Some(v),
            _ => None,
        }
    }

    /// Return the color, or `None` for other kinds.
    pub fn as_color(&self) -> Option<[f32; 3]> {
        match *self {
            Self::Color(v) => Some(v),
            _ => None,
        }
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Checkbox(v)
    }
}

impl From<f32> for ParamValue {
    fn from(v: f32) -> Self {
        Self::Slider(v)
    }
}

impl From<Vec2> for ParamValue {
    fn from(v: Vec2) -> Self {
        Self::Point2(v)
    }
}

impl From<Vec3> for ParamValue {
    fn from(v: Vec3) -> Self {
        Self::Point3(v)
    }
}

impl From<[f32; 3]> for ParamValue {
    fn from(v: [f32; 3]) -> Self {
        Self::Color(v)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/params/value.rs"]
mod tests;
