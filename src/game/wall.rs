use crate::game::geometry::{Aabb, Vector2D};
use crate::settings::WallSpec;

pub type WallId = u32;

/// An axis-aligned obstacle made of 50-pixel-wide blocks.
/// The outer AABB is cached at construction time from the padded endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Wall {
    pub id: WallId,
    pub p1: Vector2D,
    pub p2: Vector2D,
    aabb: Aabb,
}

impl Wall {
    const PAD: f32 = 25.0;

    pub fn new(id: WallId, p1: Vector2D, p2: Vector2D) -> Self {
        let aabb = Aabb::from_points(p1, p2).inflate(Self::PAD);
        Self { id, p1, p2, aabb }
    }

    pub fn from_spec(spec: &WallSpec) -> Self {
        Self::new(
            spec.id,
            Vector2D::new(spec.p1.x, spec.p1.y),
            Vector2D::new(spec.p2.x, spec.p2.y),
        )
    }

    /// The cached outer AABB, further inflated by half the query footprint.
    pub fn inflated_aabb(&self, query_size: f32) -> Aabb {
        self.aabb.inflate(query_size / 2.0)
    }

    pub fn to_frame(&self) -> WallFrame {
        WallFrame {
            wall: self.id,
            p1: [self.p1.x, self.p1.y],
            p2: [self.p2.x, self.p2.y],
        }
    }
}

/// Wire record sent once, during handshake.
#[derive(Debug, Clone, serde::Serialize)]
pub struct WallFrame {
    pub wall: WallId,
    pub p1: [f32; 2],
    pub p2: [f32; 2],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_block_wall() {
        let wall = Wall::new(1, Vector2D::new(100.0, 100.0), Vector2D::new(100.0, 100.0));
        assert_eq!(wall.p1, wall.p2);
        let aabb = wall.inflated_aabb(0.0);
        assert!(aabb.contains_point(Vector2D::new(100.0, 100.0)));
        assert!(aabb.contains_point(Vector2D::new(124.0, 124.0)));
        assert!(!aabb.contains_point(Vector2D::new(126.0, 100.0)));
    }

    #[test]
    fn horizontal_wall_aabb() {
        let wall = Wall::new(2, Vector2D::new(0.0, 0.0), Vector2D::new(200.0, 0.0));
        let aabb = wall.inflated_aabb(0.0);
        assert!(aabb.contains_point(Vector2D::new(100.0, 0.0)));
        assert!(aabb.contains_point(Vector2D::new(-25.0, -25.0)));
        assert!(aabb.contains_point(Vector2D::new(225.0, 25.0)));
    }
}
