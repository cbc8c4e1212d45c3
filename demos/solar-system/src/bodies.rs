//! Body table: sizes, orbits, colors, texture names.
//!
//! Distances and sizes are scene units chosen for readability, not to scale.
//! Speeds are radians per second of wall-clock time.

/// What a body is, and what it hangs off.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyKind {
    /// Orbits the sun on its own ellipse.
    Planet,
    /// Circles `parent` on a pivot attached to the parent's transform.
    Moon { parent: &'static str },
    /// Flat annulus attached to `parent`; `inner` is the hole radius.
    Ring { parent: &'static str, inner: f32 },
}

/// Texture names looked up in the manifest. Any of them may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextureSet {
    pub map: Option<&'static str>,
    pub normal: Option<&'static str>,
    pub specular: Option<&'static str>,
    pub bump: Option<&'static str>,
    pub alpha: Option<&'static str>,
}

impl TextureSet {
    pub const NONE: TextureSet = TextureSet { map: None, normal: None, specular: None, bump: None, alpha: None };

    const fn map(name: &'static str) -> Self {
        TextureSet { map: Some(name), ..Self::NONE }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDef {
    pub name: &'static str,
    pub kind: BodyKind,
    /// Sphere radius, or outer radius for rings.
    pub radius: f32,
    /// Semi-major axis; distance from the parent for moons.
    pub orbital_radius: f32,
    pub orbital_speed: f32,
    pub eccentricity: f32,
    pub rotation_speed: f32,
    /// Flat color used until (or instead of) the color map.
    pub color: [f32; 3],
    pub textures: TextureSet,
}

impl BodyDef {
    pub fn parent(&self) -> Option<&'static str> {
        match self.kind {
            BodyKind::Planet => None,
            BodyKind::Moon { parent } | BodyKind::Ring { parent, .. } => Some(parent),
        }
    }

    /// Rings ride along with their parent and get no toggle of their own.
    pub fn is_toggleable(&self) -> bool {
        !matches!(self.kind, BodyKind::Ring { .. })
    }
}

pub const SUN_RADIUS: f32 = 5.0;
pub const SUN_COLOR: [f32; 3] = [1.0, 0.62, 0.18];
/// Corona shell radius relative to the sun at corona size 1.
pub const CORONA_SCALE: f32 = 1.35;

pub const BODIES: &[BodyDef] = &[
    BodyDef {
        name: "mercury",
        kind: BodyKind::Planet,
        radius: 0.4,
        orbital_radius: 8.0,
        orbital_speed: 0.48,
        eccentricity: 0.205,
        rotation_speed: 0.01,
        color: [0.55, 0.52, 0.5],
        textures: TextureSet::map("mercury"),
    },
    BodyDef {
        name: "venus",
        kind: BodyKind::Planet,
        radius: 0.9,
        orbital_radius: 11.0,
        orbital_speed: 0.35,
        eccentricity: 0.007,
        rotation_speed: 0.005,
        color: [0.9, 0.78, 0.52],
        textures: TextureSet::map("venus"),
    },
    BodyDef {
        name: "earth",
        kind: BodyKind::Planet,
        radius: 1.0,
        orbital_radius: 15.0,
        orbital_speed: 0.3,
        eccentricity: 0.017,
        rotation_speed: 0.02,
        color: [0.25, 0.45, 0.85],
        textures: TextureSet {
            map: Some("earth"),
            normal: Some("earth.normal"),
            specular: Some("earth.specular"),
            bump: None,
            alpha: None,
        },
    },
    BodyDef {
        name: "moon",
        kind: BodyKind::Moon { parent: "earth" },
        radius: 0.27,
        orbital_radius: 2.0,
        orbital_speed: 1.0,
        eccentricity: 0.0,
        rotation_speed: 0.01,
        color: [0.7, 0.7, 0.68],
        textures: TextureSet::map("moon"),
    },
    BodyDef {
        name: "mars",
        kind: BodyKind::Planet,
        radius: 0.5,
        orbital_radius: 19.0,
        orbital_speed: 0.24,
        eccentricity: 0.093,
        rotation_speed: 0.018,
        color: [0.8, 0.38, 0.22],
        textures: TextureSet {
            map: Some("mars"),
            normal: None,
            specular: None,
            bump: Some("mars.bump"),
            alpha: None,
        },
    },
    BodyDef {
        name: "jupiter",
        kind: BodyKind::Planet,
        radius: 2.5,
        orbital_radius: 27.0,
        orbital_speed: 0.13,
        eccentricity: 0.048,
        rotation_speed: 0.04,
        color: [0.82, 0.7, 0.55],
        textures: TextureSet::map("jupiter"),
    },
    BodyDef {
        name: "saturn",
        kind: BodyKind::Planet,
        radius: 2.1,
        orbital_radius: 35.0,
        orbital_speed: 0.1,
        eccentricity: 0.054,
        rotation_speed: 0.038,
        color: [0.9, 0.82, 0.6],
        textures: TextureSet::map("saturn"),
    },
    BodyDef {
        name: "saturn.ring",
        kind: BodyKind::Ring { parent: "saturn", inner: 2.6 },
        radius: 4.2,
        orbital_radius: 0.0,
        orbital_speed: 0.0,
        eccentricity: 0.0,
        rotation_speed: 0.0,
        color: [0.85, 0.78, 0.62],
        textures: TextureSet {
            map: Some("saturn.ring"),
            normal: None,
            specular: None,
            bump: None,
            alpha: Some("saturn.ring.alpha"),
        },
    },
    BodyDef {
        name: "uranus",
        kind: BodyKind::Planet,
        radius: 1.6,
        orbital_radius: 42.0,
        orbital_speed: 0.07,
        eccentricity: 0.047,
        rotation_speed: 0.03,
        color: [0.6, 0.85, 0.9],
        textures: TextureSet::map("uranus"),
    },
    BodyDef {
        name: "neptune",
        kind: BodyKind::Planet,
        radius: 1.5,
        orbital_radius: 48.0,
        orbital_speed: 0.054,
        eccentricity: 0.009,
        rotation_speed: 0.032,
        color: [0.3, 0.45, 0.9],
        textures: TextureSet::map("neptune"),
    },
];

pub fn find(name: &str) -> Option<(usize, &'static BodyDef)> {
    BODIES.iter().enumerate().find(|(_, b)| b.name == name)
}

/// Index into `BODIES` of every planet, in table order.
pub fn planets() -> impl Iterator<Item = (usize, &'static BodyDef)> {
    BODIES
        .iter()
        .enumerate()
        .filter(|(_, b)| b.kind == BodyKind::Planet)
}
