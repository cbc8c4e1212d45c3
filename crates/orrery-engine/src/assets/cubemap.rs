//! Equirectangular panorama → cube face math.
//!
//! Face order and orientation follow the usual cube-map convention
//! (+X, -X, +Y, -Y, +Z, -Z; image rows top to bottom), so the six outputs
//! load straight into a cube texture.

use glam::{Vec2, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeFace {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PosX,
        CubeFace::NegX,
        CubeFace::PosY,
        CubeFace::NegY,
        CubeFace::PosZ,
        CubeFace::NegZ,
    ];

    /// Output file stem ("px", "nx", ...).
    pub fn file_stem(self) -> &'static str {
        match self {
            CubeFace::PosX => "px",
            CubeFace::NegX => "nx",
            CubeFace::PosY => "py",
            CubeFace::NegY => "ny",
            CubeFace::PosZ => "pz",
            CubeFace::NegZ => "nz",
        }
    }

    /// Outward axis of the face.
    pub fn axis(self) -> Vec3 {
        match self {
            CubeFace::PosX => Vec3::X,
            CubeFace::NegX => Vec3::NEG_X,
            CubeFace::PosY => Vec3::Y,
            CubeFace::NegY => Vec3::NEG_Y,
            CubeFace::PosZ => Vec3::Z,
            CubeFace::NegZ => Vec3::NEG_Z,
        }
    }

    /// Unnormalised view direction for face coordinates `s`, `t` in [-1, 1]
    /// (`s` left to right, `t` top to bottom).
    pub fn direction(self, s: f32, t: f32) -> Vec3 {
        match self {
            CubeFace::PosX => Vec3::new(1.0, -t, -s),
            CubeFace::NegX => Vec3::new(-1.0, -t, s),
            CubeFace::PosY => Vec3::new(s, 1.0, t),
            CubeFace::NegY => Vec3::new(s, -1.0, -t),
            CubeFace::PosZ => Vec3::new(s, -t, 1.0),
            CubeFace::NegZ => Vec3::new(-s, -t, -1.0),
        }
    }

    /// View direction through the centre of pixel (`x`, `y`) of a `size`² face.
    pub fn pixel_direction(self, x: u32, y: u32, size: u32) -> Vec3 {
        let size = size.max(1) as f32;
        let s = 2.0 * (x as f32 + 0.5) / size - 1.0;
        let t = 2.0 * (y as f32 + 0.5) / size - 1.0;
        self.direction(s, t).normalize()
    }
}

/// Panorama coordinates of a direction. `u` wraps around the horizon,
/// `v` runs from the zenith (0) to the nadir (1).
pub fn equirect_uv(dir: Vec3) -> Vec2 {
    let d = dir.normalize_or_zero();
    let u = d.z.atan2(d.x) / std::f32::consts::TAU + 0.5;
    let v = 0.5 - d.y.clamp(-1.0, 1.0).asin() / std::f32::consts::PI;
    Vec2::new(u, v)
}

/// Bilinear sample at (`u`, `v`) of a `width`×`height` image.
/// Wraps horizontally and clamps vertically, matching a panorama's seams.
pub fn sample_bilinear<F>(width: u32, height: u32, uv: Vec2, fetch: F) -> [f32; 4]
where
    F: Fn(u32, u32) -> [f32; 4],
{
    if width == 0 || height == 0 {
        return [0.0; 4];
    }
    let fx = uv.x * width as f32 - 0.5;
    let fy = (uv.y * height as f32 - 0.5).clamp(0.0, (height - 1) as f32);
    let x0 = fx.floor();
    let y0 = fy.floor();
    let tx = fx - x0;
    let ty = fy - y0;

    let wrap = |x: f32| (x as i64).rem_euclid(width as i64) as u32;
    let (xa, xb) = (wrap(x0), wrap(x0 + 1.0));
    let ya = y0 as u32;
    let yb = (ya + 1).min(height - 1);

    let p00 = fetch(xa, ya);
    let p10 = fetch(xb, ya);
    let p01 = fetch(xa, yb);
    let p11 = fetch(xb, yb);

    let mut out = [0.0; 4];
    for c in 0..4 {
        let top = p00[c] + (p10[c] - p00[c]) * tx;
        let bottom = p01[c] + (p11[c] - p01[c]) * tx;
        out[c] = top + (bottom - top) * ty;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_centres_point_along_axes() {
        for face in CubeFace::ALL {
            let centre = face.direction(0.0, 0.0).normalize();
            assert!((centre - face.axis()).length() < 1e-6, "{:?}", face);
        }
    }

    #[test]
    fn adjacent_faces_share_edges() {
        // Right edge of +Z meets the left edge of +X.
        let a = CubeFace::PosZ.direction(1.0, 0.3).normalize();
        let b = CubeFace::PosX.direction(-1.0, 0.3).normalize();
        assert!((a - b).length() < 1e-6);
    }

    #[test]
    fn top_row_looks_up() {
        for face in [CubeFace::PosX, CubeFace::NegX, CubeFace::PosZ, CubeFace::NegZ] {
            assert!(face.pixel_direction(8, 0, 16).y > 0.0);
        }
    }

    #[test]
    fn equirect_poles_and_horizon() {
        assert!(equirect_uv(Vec3::Y).y.abs() < 1e-6);
        assert!((equirect_uv(Vec3::NEG_Y).y - 1.0).abs() < 1e-6);
        let uv = equirect_uv(Vec3::X);
        assert!((uv.x - 0.5).abs() < 1e-6);
        assert!((uv.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn bilinear_interpolates_between_pixels() {
        // 2x1 image: black, white.
        let fetch = |x: u32, _y: u32| if x == 0 { [0.0; 4] } else { [1.0; 4] };
        let mid = sample_bilinear(2, 1, Vec2::new(0.5, 0.5), fetch);
        assert!((mid[0] - 0.5).abs() < 1e-6);
        let centre_of_black = sample_bilinear(2, 1, Vec2::new(0.25, 0.5), fetch);
        assert!(centre_of_black[0].abs() < 1e-6);
    }

    #[test]
    fn bilinear_wraps_horizontally() {
        let fetch = |x: u32, _y: u32| if x == 0 { [1.0; 4] } else { [0.0; 4] };
        // Just left of u = 0 blends the last column with the first.
        let seam = sample_bilinear(4, 1, Vec2::new(0.0, 0.5), fetch);
        assert!((seam[0] - 0.5).abs() < 1e-6);
    }
}
