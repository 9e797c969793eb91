pub mod collision;
pub mod geometry;
pub mod powerup;
pub mod snake;
pub mod wall;
pub mod world;

pub use powerup::Powerup;
pub use snake::Snake;
pub use wall::Wall;
pub use world::World;
