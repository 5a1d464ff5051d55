//! Region graph primitives
//!
//! Regions, connections, the owning [`RegionGraph`] aggregate and the
//! random connected-graph builder every map area starts from.

pub mod builder;
pub mod region_graph;
pub mod types;

pub use builder::{build_connected_graph, target_links, IdGenerator};
pub use region_graph::{Link, RegionGraph, MAX_PAIR_CONNECTIONS};
pub use types::{AttrValue, Attributes, Connection, Region, RegionId, ZoneType};
