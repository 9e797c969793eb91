use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// A point / displacement in world space. Every snake segment, wall
/// endpoint, and powerup location is one of these.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector2D {
    pub x: f32,
    pub y: f32,
}

impl Vector2D {
    pub const ZERO: Vector2D = Vector2D { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn normalized(&self) -> Vector2D {
        let len = self.length();
        if len == 0.0 {
            Vector2D::ZERO
        } else {
            Vector2D::new(self.x / len, self.y / len)
        }
    }

    pub fn dot(&self, other: Vector2D) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Two unit vectors are cardinal-opposites iff their dot product is -1
    /// and both axes are aligned (spec: "Vector2D ... cardinal-opposite
    /// test").
    pub fn is_cardinal_opposite(&self, other: Vector2D) -> bool {
        (self.dot(other) - (-1.0)).abs() < f32::EPSILON
    }
}

impl std::ops::Add for Vector2D {
    type Output = Vector2D;
    fn add(self, rhs: Vector2D) -> Vector2D {
        Vector2D::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Vector2D {
    type Output = Vector2D;
    fn sub(self, rhs: Vector2D) -> Vector2D {
        Vector2D::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f32> for Vector2D {
    type Output = Vector2D;
    fn mul(self, rhs: f32) -> Vector2D {
        Vector2D::new(self.x * rhs, self.y * rhs)
    }
}

/// The four cardinal directions a snake can move in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn unit(self) -> Vector2D {
        match self {
            Direction::Up => Vector2D::new(0.0, -1.0),
            Direction::Down => Vector2D::new(0.0, 1.0),
            Direction::Left => Vector2D::new(-1.0, 0.0),
            Direction::Right => Vector2D::new(1.0, 0.0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }
}

/// An axis-aligned bounding box, inclusive on both ends (spec: "All AABBs
/// are inclusive: >= bl and <= tr").
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    pub bl: Vector2D,
    pub tr: Vector2D,
}

impl Aabb {
    pub fn from_points(a: Vector2D, b: Vector2D) -> Self {
        Self {
            bl: Vector2D::new(a.x.min(b.x), a.y.min(b.y)),
            tr: Vector2D::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Expand the box by `amount` on every side.
    pub fn inflate(&self, amount: f32) -> Aabb {
        Aabb {
            bl: Vector2D::new(self.bl.x - amount, self.bl.y - amount),
            tr: Vector2D::new(self.tr.x + amount, self.tr.y + amount),
        }
    }

    pub fn contains_point(&self, p: Vector2D) -> bool {
        p.x >= self.bl.x && p.x <= self.tr.x && p.y >= self.bl.y && p.y <= self.tr.y
    }
}

/// Seeded pseudo-random source. Each server instance seeds its own
/// generator independently (spec: "implementations should use a
/// pseudo-random source seeded independently per server start").
pub struct WorldRng {
    inner: SmallRng,
}

impl WorldRng {
    pub fn seeded_from_entropy() -> Self {
        Self {
            inner: SmallRng::from_entropy(),
        }
    }

    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            lo
        } else {
            self.inner.gen_range(lo..hi)
        }
    }

    pub fn range_u32(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            lo
        } else {
            self.inner.gen_range(lo..hi)
        }
    }
}

impl Default for WorldRng {
    fn default() -> Self {
        Self::seeded_from_entropy()
    }
}
