//! Decorative orbit kinematics. Pure math, no engine state.
//!
//! Orbits are parametric ellipses with the sun at the center, swept at a
//! constant angular rate. Nothing here conserves anything; it only has to
//! look right and close on itself.

use glam::{Quat, Vec3};

/// Vertical wobble of an inclined orbit, as a fraction of its semi-major axis.
pub const ORBIT_Y_SCALE: f32 = 0.05;

/// Largest per-body inclination, radians.
pub const MAX_TILT: f32 = 0.25;

/// Semi-minor axis for semi-major axis `a` and eccentricity `e`.
pub fn semi_minor(a: f32, e: f32) -> f32 {
    a * (1.0 - e * e).max(0.0).sqrt()
}

/// Position on the orbit at time `t` (seconds).
pub fn orbit_position(t: f32, omega: f32, a: f32, e: f32, tilt: f32) -> Vec3 {
    let angle = t * omega;
    let (sin, cos) = angle.sin_cos();
    let b = semi_minor(a, e);
    Vec3::new(a * cos, sin * tilt.sin() * a * ORBIT_Y_SCALE, b * sin)
}

/// 32-bit FNV-1a over the name's bytes.
pub fn fnv1a(name: &str) -> u32 {
    let mut hash: u32 = 0x811c_9dc5;
    for byte in name.bytes() {
        hash ^= byte as u32;
        hash = hash.wrapping_mul(0x0100_0193);
    }
    hash
}

/// Per-body inclination in [0, MAX_TILT), stable across sessions.
pub fn tilt_for(name: &str) -> f32 {
    (fnv1a(name) % 10_000) as f32 / 10_000.0 * MAX_TILT
}

/// Orbital angle of a moon's pivot at time `t`.
pub fn moon_angle(t: f32, omega: f32) -> f32 {
    (t * omega).rem_euclid(std::f32::consts::TAU)
}

/// Pivot rotation that carries a child sitting at `(r, 0, 0)` to `moon_offset`.
pub fn pivot_rotation(angle: f32) -> Quat {
    Quat::from_rotation_y(-angle)
}

/// Moon position relative to its parent: a circle of radius `r` in the XZ plane.
pub fn moon_offset(t: f32, omega: f32, r: f32) -> Vec3 {
    let (sin, cos) = moon_angle(t, omega).sin_cos();
    Vec3::new(r * cos, 0.0, r * sin)
}

/// Self-rotation accumulator. Wraps to keep precision over long sessions.
pub fn spin(angle: f32, rotation_speed: f32, dt: f32) -> f32 {
    (angle + rotation_speed * dt).rem_euclid(std::f32::consts::TAU)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bodies::{planets, BODIES};
    use std::f32::consts::TAU;

    const SAMPLES: usize = 360;

    #[test]
    fn angle_zero_is_on_the_x_axis() {
        for body in BODIES {
            let tilt = tilt_for(body.name);
            let p = orbit_position(0.0, body.orbital_speed, body.orbital_radius, body.eccentricity, tilt);
            assert_eq!(p, Vec3::new(body.orbital_radius, 0.0, 0.0), "{}", body.name);
        }
    }

    #[test]
    fn orbit_is_a_closed_ellipse() {
        for (_, body) in planets() {
            let a = body.orbital_radius;
            let b = semi_minor(a, body.eccentricity);
            for i in 0..SAMPLES {
                let t = i as f32 / SAMPLES as f32 * TAU;
                let p = orbit_position(t, 1.0, a, body.eccentricity, tilt_for(body.name));
                let r = (p.x / a).powi(2) + (p.z / b).powi(2);
                assert!((r - 1.0).abs() < 1e-4, "{} at {t}: {r}", body.name);
            }
        }
    }

    #[test]
    fn zero_eccentricity_is_a_circle() {
        let a = 15.0_f32;
        for i in 0..SAMPLES {
            let t = i as f32 / SAMPLES as f32 * TAU;
            let p = orbit_position(t, 1.0, a, 0.0, 0.0);
            assert!((p.x * p.x + p.z * p.z - a * a).abs() < 1e-3);
            assert_eq!(p.y, 0.0);
        }
    }

    #[test]
    fn tilt_is_deterministic_and_bounded() {
        assert_eq!(tilt_for("earth"), tilt_for("earth"));
        assert_ne!(tilt_for("earth"), tilt_for("mars"));
        for body in BODIES {
            let tilt = tilt_for(body.name);
            assert!((0.0..MAX_TILT).contains(&tilt));
        }
    }

    #[test]
    fn fnv1a_matches_reference_vectors() {
        assert_eq!(fnv1a(""), 0x811c_9dc5);
        assert_eq!(fnv1a("a"), 0xe40c_292c);
    }

    #[test]
    fn pivot_rotation_matches_moon_offset() {
        let r = 2.0;
        for i in 0..16 {
            let t = i as f32 * 0.4;
            let via_pivot = pivot_rotation(moon_angle(t, 1.0)) * Vec3::new(r, 0.0, 0.0);
            assert!((via_pivot - moon_offset(t, 1.0, r)).length() < 1e-4);
        }
    }

    #[test]
    fn spin_accumulates_and_wraps() {
        let mut angle = 0.0;
        for _ in 0..1000 {
            angle = spin(angle, 1.0, 0.1);
        }
        assert!((0.0..TAU).contains(&angle));
        assert!((angle - (100.0_f32).rem_euclid(TAU)).abs() < 1e-2);
    }
}
