use serde::Serialize;

/// Geometry primitives the browser renderer knows how to tessellate.
///
/// Only the parameters travel to the page; the vertex data is built there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Geometry {
    Sphere { radius: f32, segments: u32 },
    /// Flat annulus in the local XZ plane.
    Ring { inner: f32, outer: f32, segments: u32 },
    /// Static point cloud; positions come from a separate vertex buffer.
    Points { count: u32 },
    /// Dynamic point-sprite trails written every frame.
    Trail { capacity: u32 },
    SkyBox { size: f32 },
    SkySphere { radius: f32, segments: u32 },
}

impl Geometry {
    pub const MIN_SEGMENTS: u32 = 8;
    pub const MAX_SEGMENTS: u32 = 256;

    pub fn sphere(radius: f32, segments: u32) -> Self {
        Self::Sphere {
            radius,
            segments: segments.clamp(Self::MIN_SEGMENTS, Self::MAX_SEGMENTS),
        }
    }

    pub fn ring(inner: f32, outer: f32, segments: u32) -> Self {
        Self::Ring {
            inner,
            outer,
            segments: segments.clamp(Self::MIN_SEGMENTS, Self::MAX_SEGMENTS),
        }
    }

    /// Re-tessellate at a new level. Point clouds, trails, and boxes are unaffected.
    pub fn with_segments(self, segments: u32) -> Self {
        let segments = segments.clamp(Self::MIN_SEGMENTS, Self::MAX_SEGMENTS);
        match self {
            Self::Sphere { radius, .. } => Self::Sphere { radius, segments },
            Self::Ring { inner, outer, .. } => Self::Ring { inner, outer, segments },
            Self::SkySphere { radius, .. } => Self::SkySphere { radius, segments },
            other => other,
        }
    }

    /// Segment count for tessellated shapes.
    pub fn segments(&self) -> Option<u32> {
        match self {
            Self::Sphere { segments, .. }
            | Self::Ring { segments, .. }
            | Self::SkySphere { segments, .. } => Some(*segments),
            _ => None,
        }
    }

    /// Wire code used in the node instance flags.
    pub fn kind_code(&self) -> u32 {
        match self {
            Self::Sphere { .. } => 1,
            Self::Ring { .. } => 2,
            Self::Points { .. } => 3,
            Self::Trail { .. } => 4,
            Self::SkyBox { .. } => 5,
            Self::SkySphere { .. } => 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_segments_are_clamped() {
        assert_eq!(Geometry::sphere(1.0, 2).segments(), Some(Geometry::MIN_SEGMENTS));
        assert_eq!(Geometry::sphere(1.0, 10_000).segments(), Some(Geometry::MAX_SEGMENTS));
    }

    #[test]
    fn with_segments_keeps_shape_parameters() {
        let ring = Geometry::ring(3.0, 5.0, 32).with_segments(96);
        assert_eq!(ring, Geometry::Ring { inner: 3.0, outer: 5.0, segments: 96 });
    }

    #[test]
    fn with_segments_ignores_point_clouds() {
        let points = Geometry::Points { count: 500 };
        assert_eq!(points.with_segments(64), points);
        assert_eq!(points.segments(), None);
    }
}
