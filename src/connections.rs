//! Connection attribute assignment.
//!
//! Guard strength comes from the pair of endpoint zone types; the secondary
//! flags are independent draws. Assignment never touches a connection that
//! already carries attributes.

use std::collections::HashMap;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::export::schema::CONNECTION_FIELDS;
use crate::graph::{Attributes, Connection, RegionGraph, RegionId, ZoneType};
use crate::random::chance;

/// Upper bound on any guard strength.
pub const GUARD_CAP: i64 = 25000;

/// Extra guard strength range for links bridging a player area and the main area.
pub const PLAYER_TO_MAIN_BONUS: (i64, i64) = (3000, 6000);

/// Inclusive guard strength range before the player-to-main bonus.
pub fn guard_range(a: Option<ZoneType>, b: Option<ZoneType>) -> (i64, i64) {
    use ZoneType::*;

    if a == Some(Start) || b == Some(Start) {
        let other = if a == Some(Start) { b } else { a };
        return match other {
            Some(Neutral) | Some(Junction) => (3000, 4000),
            Some(Treasure) => (5000, 7000),
            Some(SuperTreasure) => (8000, 12000),
            _ => (2500, 3500),
        };
    }

    match (a, b) {
        (Some(Junction), Some(_)) | (Some(_), Some(Junction)) => (10000, 20000),
        (Some(x), Some(y)) => match sorted_pair(x, y) {
            (Treasure, Treasure) => (10000, 15000),
            (Treasure, SuperTreasure) => (14000, 22000),
            (SuperTreasure, SuperTreasure) => (20000, 30000),
            (Neutral, Neutral) => (5000, 8000),
            (Neutral, Treasure) => (8000, 12000),
            (Neutral, SuperTreasure) => (12000, 18000),
            _ => (5000, 8000),
        },
        _ => (5000, 8000),
    }
}

fn sorted_pair(x: ZoneType, y: ZoneType) -> (ZoneType, ZoneType) {
    if x <= y {
        (x, y)
    } else {
        (y, x)
    }
}

/// Guard strength roll, kept apart so the uncapped value can be inspected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GuardRoll {
    pub base: i64,
    pub bonus: i64,
}

impl GuardRoll {
    pub fn draw(a: Option<ZoneType>, b: Option<ZoneType>, is_player_to_main: bool, rng: &mut ChaCha8Rng) -> Self {
        let (low, high) = guard_range(a, b);
        let base = rng.gen_range(low..=high);
        let bonus = if is_player_to_main {
            rng.gen_range(PLAYER_TO_MAIN_BONUS.0..=PLAYER_TO_MAIN_BONUS.1)
        } else {
            0
        };
        Self { base, bonus }
    }

    pub fn uncapped(&self) -> i64 {
        self.base + self.bonus
    }

    pub fn strength(&self) -> i64 {
        self.uncapped().clamp(0, GUARD_CAP)
    }
}

/// Draw a full attribute set for a connection between zones `a` and `b`.
pub fn draw_connection_attributes(
    a: Option<ZoneType>,
    b: Option<ZoneType>,
    is_player_to_main: bool,
    rng: &mut ChaCha8Rng,
) -> Attributes {
    let roll = GuardRoll::draw(a, b, is_player_to_main, rng);
    let has = |zone: ZoneType| a == Some(zone) || b == Some(zone);

    let mut attrs = Attributes::new();
    for key in CONNECTION_FIELDS {
        attrs.set(key, "");
    }
    attrs.set("guard_strength", roll.strength());

    let wide = !has(ZoneType::SuperTreasure) && chance(rng, 0.9);
    attrs.set("connection_type_wide", wide);

    let roads = has(ZoneType::Start) || chance(rng, 0.75);
    attrs.set("roads", roads);

    attrs.set("monolith_repulsion", chance(rng, 0.2));
    attrs
}

/// Fill `conn` unless it already has attributes. Returns whether anything was drawn.
pub fn assign_connection_attributes(
    conn: &mut Connection,
    a: Option<ZoneType>,
    b: Option<ZoneType>,
    rng: &mut ChaCha8Rng,
) -> bool {
    if !conn.attributes.is_empty() {
        return false;
    }
    conn.attributes = draw_connection_attributes(a, b, conn.is_player_to_main, rng);
    true
}

/// Fill every unassigned connection of `graph`, in connection order.
/// Returns how many connections were assigned.
pub fn assign_all_connection_attributes(graph: &mut RegionGraph, rng: &mut ChaCha8Rng) -> usize {
    let zones: HashMap<RegionId, Option<ZoneType>> =
        graph.regions().iter().map(|r| (r.id, r.zone_type)).collect();
    let lookup = |id: RegionId| zones.get(&id).copied().flatten();

    let mut assigned = 0;
    for conn in graph.connections_mut() {
        let (a, b) = (lookup(conn.a), lookup(conn.b));
        if assign_connection_attributes(conn, a, b, rng) {
            assigned += 1;
        }
    }
    assigned
}
