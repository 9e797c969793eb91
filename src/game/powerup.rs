use crate::game::geometry::Vector2D;

pub type PowerupId = u32;

/// A consumable scattered through the universe, collected on contact.
#[derive(Debug, Clone, Copy)]
pub struct Powerup {
    pub id: PowerupId,
    pub loc: Vector2D,
    pub died: bool,
}

impl Powerup {
    pub fn new(id: PowerupId, loc: Vector2D) -> Self {
        Self {
            id,
            loc,
            died: false,
        }
    }

    pub fn to_frame(&self) -> PowerupFrame {
        PowerupFrame {
            power: self.id,
            loc: [self.loc.x, self.loc.y],
            died: self.died,
        }
    }
}

/// Wire record broadcast once per tick.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PowerupFrame {
    pub power: PowerupId,
    pub loc: [f32; 2],
    pub died: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_omits_no_public_fields() {
        let powerup = Powerup::new(1, Vector2D::new(5.0, 5.0));
        let frame = powerup.to_frame();
        assert_eq!(frame.power, 1);
        assert_eq!(frame.loc, [5.0, 5.0]);
        assert!(!frame.died);
    }
}
