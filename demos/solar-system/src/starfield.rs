use orrery_engine::{PointVertex, Rng};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarfieldConfig {
    pub count: usize,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub base_size: f32,
    pub seed: u64,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            count: 4000,
            inner_radius: 400.0,
            outer_radius: 900.0,
            base_size: 1.5,
            seed: 0x5eed_57a2,
        }
    }
}

/// Color of a star at normalized temperature `t` (0 = cool red, 1 = hot blue-white).
pub fn temperature_tint(t: f32) -> [f32; 3] {
    const COOL: [f32; 3] = [1.0, 0.72, 0.5];
    const WHITE: [f32; 3] = [1.0, 1.0, 1.0];
    const HOT: [f32; 3] = [0.66, 0.78, 1.0];
    let t = t.clamp(0.0, 1.0);
    let (from, to, k) = if t < 0.5 { (COOL, WHITE, t * 2.0) } else { (WHITE, HOT, (t - 0.5) * 2.0) };
    [
        from[0] + (to[0] - from[0]) * k,
        from[1] + (to[1] - from[1]) * k,
        from[2] + (to[2] - from[2]) * k,
    ]
}

/// Deterministic point cloud on a spherical shell around the origin.
pub fn build(config: &StarfieldConfig) -> Vec<PointVertex> {
    let mut rng = Rng::new(config.seed);
    (0..config.count)
        .map(|_| {
            let dir = rng.unit_vector();
            let radius = rng.range(config.inner_radius, config.outer_radius);
            let brightness = rng.range(0.35, 1.0);
            // Most stars are white-ish; the tails are rarer.
            let temperature = 0.5 + rng.signed() * rng.next_f32() * 0.5;
            PointVertex::new(
                (dir * radius).to_array(),
                temperature_tint(temperature),
                brightness,
                config.base_size * (0.5 + brightness),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn stars_sit_on_the_shell() {
        let config = StarfieldConfig { count: 500, ..Default::default() };
        let stars = build(&config);
        assert_eq!(stars.len(), 500);
        for star in &stars {
            let r = Vec3::from_array(star.position).length();
            assert!(r >= config.inner_radius - 1e-2 && r <= config.outer_radius + 1e-2);
            assert!((0.35..=1.0).contains(&star.alpha));
        }
    }

    #[test]
    fn same_seed_same_sky() {
        let config = StarfieldConfig { count: 50, ..Default::default() };
        assert_eq!(build(&config), build(&config));
        let other = StarfieldConfig { seed: 7, ..config };
        assert_ne!(build(&config), build(&other));
    }

    #[test]
    fn tint_runs_red_to_blue() {
        let close = |a: [f32; 3], b: [f32; 3]| a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-5);
        assert!(close(temperature_tint(0.0), [1.0, 0.72, 0.5]));
        assert!(close(temperature_tint(0.5), [1.0, 1.0, 1.0]));
        assert!(close(temperature_tint(1.0), [0.66, 0.78, 1.0]));
        assert!(temperature_tint(0.9)[2] > temperature_tint(0.1)[2]);
    }
}
