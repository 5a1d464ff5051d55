//! Fixed column layout of the template file.

/// Blank columns ahead of every zone record.
pub const PRE_ZONE_COLUMNS: usize = 28;

/// Type flag columns after the region id.
pub const ZONE_FLAG_COLUMNS: usize = 4;

/// Zone attribute columns in file order.
#[rustfmt::skip]
pub const ZONE_FIELDS: [&str; 93] = [
    "zone_size",
    "res_parameter1", "res_parameter2", "res_parameter3", "res_parameter4",
    "player_control",
    "player_towns_min", "player_castles_min", "player_towns_density", "player_castles_density",
    "neutral_towns_min", "neutral_castle_min", "neutral_towns_density", "neutral_castle_density",
    "all_castle_same",
    "allowed_castle_1", "allowed_castle_2", "allowed_castle_3", "allowed_castle_4",
    "allowed_castle_5", "allowed_castle_6", "allowed_castle_7", "allowed_castle_8",
    "allowed_castle_9", "allowed_castle_10", "allowed_castle_11", "allowed_castle_12",
    "wood_min", "mercury_min", "ore_min", "sulfur_min", "crystals_min", "gems_min", "gold_min",
    "wood_density", "mercury_density", "ore_density", "sulfur_density", "crystals_density",
    "gems_density", "gold_density",
    "terrain_match_town",
    "allowed_terrain_1", "allowed_terrain_2", "allowed_terrain_3", "allowed_terrain_4",
    "allowed_terrain_5", "allowed_terrain_6", "allowed_terrain_7", "allowed_terrain_8",
    "allowed_terrain_9", "allowed_terrain_10",
    "monster_strength", "monster_match_town",
    "allowed_monster_type_1", "allowed_monster_type_2", "allowed_monster_type_3",
    "allowed_monster_type_4", "allowed_monster_type_5", "allowed_monster_type_6",
    "allowed_monster_type_7", "allowed_monster_type_8", "allowed_monster_type_9",
    "allowed_monster_type_10", "allowed_monster_type_11", "allowed_monster_type_12",
    "allowed_monster_type_13",
    "treasure1_low", "treasure1_high", "treasure1_density",
    "treasure2_low", "treasure2_high", "treasure2_density",
    "treasure3_low", "treasure3_high", "treasure3_density",
    "zone_placement", "objects_section",
    // Always blank.
    "blank_before_ui",
    "UI_position", "zone_faction_force_neutral", "allow_non_coherent_road", "zone_repulsion",
    "town_type_rules", "monster_disposition", "custom_monster_disposition", "joining_percent",
    "join_only_for_money", "shipyard_min", "shipyard_density", "terrain_type_rule",
    "customized_allowed_factions_bitmap", "zone_faction_rule",
];

/// Connection attribute columns, written after the two endpoint ids.
pub const CONNECTION_FIELDS: [&str; 11] = [
    "guard_strength",
    "connection_type_wide",
    "connection_type_borderguard",
    "roads",
    "placement_hint",
    "connection_type_fictive",
    "monolith_repulsion",
    "human_players_min",
    "human_players_max",
    "total_players_min",
    "total_players_max",
];

/// Columns of a zone record, lead-in included.
pub const ZONE_RECORD_COLUMNS: usize = PRE_ZONE_COLUMNS + 1 + ZONE_FLAG_COLUMNS + ZONE_FIELDS.len();

/// Columns of a connection record, endpoint ids included.
pub const CONNECTION_RECORD_COLUMNS: usize = 2 + CONNECTION_FIELDS.len();

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_zone_fields_are_unique_and_end_with_faction_rule() {
        let unique: HashSet<&str> = ZONE_FIELDS.iter().copied().collect();
        assert_eq!(unique.len(), ZONE_FIELDS.len());
        assert_eq!(ZONE_FIELDS[ZONE_FIELDS.len() - 1], "zone_faction_rule");
        assert_eq!(ZONE_RECORD_COLUMNS, 126);
        assert_eq!(CONNECTION_RECORD_COLUMNS, 13);
    }
}
