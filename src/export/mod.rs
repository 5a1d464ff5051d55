//! Template and JSON output

pub mod h3t;
pub mod json;
pub mod schema;

pub use h3t::{render_rows, write_template, ExportStats};
pub use json::write_world_json;
pub use schema::{CONNECTION_FIELDS, ZONE_FIELDS};
