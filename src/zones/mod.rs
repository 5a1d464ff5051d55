//! Zone typing and attribute generation
//!
//! Regions are first classified into zone types from cumulative tables,
//! then filled from ordered per-type rules.

pub mod attributes;
pub mod classify;
pub mod rules;

pub use attributes::{assign_zone_attributes, missing_keys, required_keys};
pub use classify::{classify_one, classify_regions, ZoneTable};
pub use rules::{base_rules, Rule};
