//! Map template generation library
//!
//! Builds a world graph of zones and connections for a strategy-game random
//! map template and writes it in the game's tab-separated template layout.

pub mod config;
pub mod connections;
pub mod error;
pub mod export;
pub mod generation;
pub mod graph;
pub mod random;
pub mod zones;

pub use config::{AiPlacementMode, GenerationConfig, ManualOverrides, MapStyle, SizeRange};
pub use error::{ConfigError, ExportError, GenerationError, GenerationResult};
pub use generation::generate_world;
pub use graph::{Connection, Region, RegionGraph, RegionId, ZoneType};
