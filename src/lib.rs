//! Simulation core of a 2D tile platformer.
//!
//! Everything a frontend needs to run levels headlessly: a sparse tilemap
//! with autotiling and JSON persistence, axis-separated AABB collision
//! with actor physics, a trap engine (dash spikes, disappearing blocks),
//! and pixel-mask exact death tests. No rendering, audio or input
//! handling lives here; the embedding game loop feeds [`FrameInput`]s
//! into [`sim::step::step`] and polls the [`World`] for outcomes.

pub mod config;
pub mod domain;
pub mod sim;

pub use config::{GameConfig, PhysicsConfig, PlayfieldConfig};
pub use domain::entity::{Action, FrameInput, Player};
pub use domain::mask::{MaskTable, SpriteMask};
pub use domain::tile::{OffgridTile, Tile, TileKind};
pub use domain::tilemap::Tilemap;
pub use domain::traps::{Block, Spike, SpikeDir, Traps};
pub use sim::level::load_level;
pub use sim::save::{load_map, save_map, MapError};
pub use sim::step::step;
pub use sim::world::World;
