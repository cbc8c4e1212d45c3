//! Shooting stars: a fixed arena of slots recycled in place.
//!
//! Each star flies in a straight line from one face of the field cube towards
//! another and leaves a fading trail. A star that outlives `max_age` or leaves
//! the field is recycled: its trail is cleared before it gets a new position.

use glam::Vec3;
use orrery_engine::{PointVertex, Rng};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShootingStarConfig {
    pub count: usize,
    /// Units per second.
    pub speed: f32,
    /// Seconds before a star is recycled.
    pub max_age: f32,
    /// Half-extent of the field cube.
    pub field_radius: f32,
    /// Slack beyond `field_radius` before a star counts as gone.
    pub margin: f32,
    /// Trail samples kept per star.
    pub trail_len: usize,
    pub size: f32,
    pub color: [f32; 3],
}

impl Default for ShootingStarConfig {
    fn default() -> Self {
        Self {
            count: 12,
            speed: 60.0,
            max_age: 3.0,
            field_radius: 150.0,
            margin: 20.0,
            trail_len: 24,
            size: 1.2,
            color: [1.0, 0.95, 0.85],
        }
    }
}

/// Bounded ring of past positions, oldest first.
#[derive(Debug, Clone)]
pub struct TrailHistory {
    points: Vec<Vec3>,
    capacity: usize,
    /// Slot the next push writes once the ring is full.
    head: usize,
}

impl TrailHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
            capacity,
            head: 0,
        }
    }

    pub fn push(&mut self, point: Vec3) {
        if self.capacity == 0 {
            return;
        }
        if self.points.len() < self.capacity {
            self.points.push(point);
        } else {
            self.points[self.head] = point;
            self.head = (self.head + 1) % self.capacity;
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.head = 0;
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Vec3> {
        let (newer, older) = self.points.split_at(self.head);
        older.iter().chain(newer.iter())
    }

    pub fn newest(&self) -> Option<Vec3> {
        self.iter().last().copied()
    }
}

#[derive(Debug, Clone)]
pub struct ShootingStar {
    pub position: Vec3,
    pub velocity: Vec3,
    pub age: f32,
    pub max_age: f32,
    pub trail: TrailHistory,
}

/// The arena. Slots are never added or removed after construction.
pub struct ShootingStarPool {
    stars: Vec<ShootingStar>,
    config: ShootingStarConfig,
    recycled: u64,
}

impl ShootingStarPool {
    /// `config.count` stars, each launched with a staggered age.
    pub fn new(config: ShootingStarConfig, rng: &mut Rng) -> Self {
        let count = config.count;
        let blank = ShootingStar {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            age: 0.0,
            max_age: config.max_age,
            trail: TrailHistory::new(config.trail_len),
        };
        let mut pool = Self {
            stars: vec![blank; count],
            config,
            recycled: 0,
        };
        for index in 0..count {
            pool.recycle(index, rng);
            // Stagger so the whole pool does not expire on the same frame.
            pool.stars[index].age = rng.range(0.0, config.max_age * 0.5);
        }
        pool.recycled = 0;
        pool
    }

    pub fn config(&self) -> &ShootingStarConfig {
        &self.config
    }

    pub fn stars(&self) -> &[ShootingStar] {
        &self.stars
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    /// Total recycles since construction.
    pub fn recycled(&self) -> u64 {
        self.recycled
    }

    fn out_of_bounds(&self, p: Vec3) -> bool {
        let limit = self.config.field_radius + self.config.margin;
        p.abs().max_element() > limit
    }

    /// Advance every star by `dt`. Returns how many were recycled.
    pub fn update(&mut self, dt: f32, rng: &mut Rng) -> usize {
        let mut recycled = 0;
        for index in 0..self.stars.len() {
            let star = &mut self.stars[index];
            star.position += star.velocity * dt;
            star.age += dt;
            let expired = star.age > star.max_age;
            let position = star.position;
            if expired || self.out_of_bounds(position) {
                self.recycle(index, rng);
                recycled += 1;
            } else {
                self.stars[index].trail.push(position);
            }
        }
        recycled
    }

    /// Reset slot `index` in place: empty trail, new start and heading, age 0.
    pub fn recycle(&mut self, index: usize, rng: &mut Rng) {
        let config = self.config;
        let Some(star) = self.stars.get_mut(index) else { return };
        star.trail.clear();

        let start = random_face_point(config.field_radius, rng);
        let mut target = random_face_point(config.field_radius, rng);
        if (target - start).length_squared() < 1e-6 {
            target = -start;
        }
        star.position = start;
        star.velocity = (target - start).normalize_or(Vec3::X) * config.speed;
        star.age = 0.0;
        star.max_age = config.max_age;
        self.recycled += 1;
    }

    /// Opacity of trail sample `point` (0 = oldest) of star `index`.
    pub fn trail_alpha(&self, index: usize, point: usize) -> f32 {
        let Some(star) = self.stars.get(index) else { return 0.0 };
        let len = star.trail.len();
        if point >= len {
            return 0.0;
        }
        let along = (point + 1) as f32 / len as f32;
        let life = 1.0 - star.age / star.max_age;
        (along * life).clamp(0.0, 1.0)
    }

    /// Append every trail sample as a point-sprite vertex. Returns how many were written.
    pub fn write_trail_vertices(&self, out: &mut Vec<PointVertex>) -> usize {
        let before = out.len();
        for (index, star) in self.stars.iter().enumerate() {
            let len = star.trail.len();
            for (point, p) in star.trail.iter().enumerate() {
                let alpha = self.trail_alpha(index, point);
                let size = self.config.size * (0.4 + 0.6 * (point + 1) as f32 / len as f32);
                out.push(PointVertex::new(p.to_array(), self.config.color, alpha, size));
            }
        }
        out.len() - before
    }
}

/// Uniform point on a random face of the cube `[-r, r]³`.
fn random_face_point(r: f32, rng: &mut Rng) -> Vec3 {
    let axis = rng.next_int(3) as usize;
    let sign = if rng.next_int(2) == 0 { -1.0 } else { 1.0 };
    let mut p = Vec3::new(rng.range(-r, r), rng.range(-r, r), rng.range(-r, r));
    p[axis] = sign * r;
    p
}
