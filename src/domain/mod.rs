pub mod entity;
pub mod geometry;
pub mod mask;
pub mod physics;
pub mod tile;
pub mod tilemap;
pub mod traps;
