//! Generation configuration.
//!
//! Everything a run needs is carried by [`GenerationConfig`]; nothing is read
//! from global state. The binary loads it from TOML and lets CLI flags
//! override individual fields.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, GenerationError, GenerationResult};

/// Most players (human + AI) a template supports.
pub const MAX_PLAYERS: usize = 8;

/// Inclusive size range; a single draw picks the actual size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: usize,
    pub max: usize,
}

impl SizeRange {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn fixed(size: usize) -> Self {
        Self { min: size, max: size }
    }

    /// Uniform draw in `min..=max`.
    pub fn draw(&self, rng: &mut ChaCha8Rng) -> usize {
        if self.min >= self.max {
            self.min
        } else {
            rng.gen_range(self.min..=self.max)
        }
    }

    pub fn validate(&self, what: &'static str) -> GenerationResult<()> {
        if self.min == 0 || self.min > self.max {
            return Err(GenerationError::InvalidRange {
                what,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

impl FromStr for SizeRange {
    type Err = String;

    /// Accepts `"12"`, `"8-16"`, `"8..16"` and `"8..=16"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parse = |part: &str| {
            part.trim()
                .parse::<usize>()
                .map_err(|_| format!("invalid size '{}' in range '{}'", part.trim(), s))
        };

        let bounds = s
            .split_once("..=")
            .or_else(|| s.split_once(".."))
            .or_else(|| s.split_once('-'));
        match bounds {
            Some((lo, hi)) => Ok(Self::new(parse(lo)?, parse(hi)?)),
            None => parse(s).map(Self::fixed),
        }
    }
}

impl fmt::Display for SizeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}-{}", self.min, self.max)
        }
    }
}

/// Overall layout of the generated template.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapStyle {
    /// One shared random main area.
    #[default]
    Random,
    /// Main area cloned symmetrically per human player.
    Balanced,
}

impl MapStyle {
    pub fn all() -> &'static [Self] {
        &[Self::Random, Self::Balanced]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Balanced => "balanced",
        }
    }
}

impl FromStr for MapStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "random" => Ok(Self::Random),
            "balanced" => Ok(Self::Balanced),
            other => Err(format!("unknown map style '{}' (expected random or balanced)", other)),
        }
    }
}

impl fmt::Display for MapStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which candidate list embedded AIs connect through.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiPlacementMode {
    #[default]
    Main,
    Start,
    Both,
    /// Resolved once per run to one of the other three.
    Random,
}

impl AiPlacementMode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Start => "start",
            Self::Both => "both",
            Self::Random => "random",
        }
    }

    /// Replace [`AiPlacementMode::Random`] with a concrete mode; others are returned as-is.
    pub fn resolve(self, rng: &mut ChaCha8Rng) -> Self {
        match self {
            Self::Random => [Self::Main, Self::Start, Self::Both][rng.gen_range(0..3)],
            other => other,
        }
    }
}

impl FromStr for AiPlacementMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "main" => Ok(Self::Main),
            "start" => Ok(Self::Start),
            "both" => Ok(Self::Both),
            "random" => Ok(Self::Random),
            other => Err(format!(
                "unknown AI placement '{}' (expected main, start, both or random)",
                other
            )),
        }
    }
}

impl fmt::Display for AiPlacementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Values that replace the drawn defaults of every zone when set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManualOverrides {
    pub monster_disposition: Option<i64>,
    pub joining_percent: Option<i64>,
    pub join_only_for_money: Option<bool>,
}

/// Configuration parameters for a generation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Human players, 1..=8.
    pub human_players: usize,

    /// AI players; humans + AI must not exceed 8.
    pub ai_players: usize,

    pub map_style: MapStyle,

    /// Regions in the shared main area (split over players when balanced).
    pub main_area_size: SizeRange,

    /// Regions in each player's starting area.
    pub start_area_size: SizeRange,

    /// Average links per region inside the main area.
    pub avg_links_main: f64,

    /// Average links per region inside a starting area.
    pub avg_links_player: f64,

    /// Starting-area towns forced to the player's own faction.
    pub same_faction_towns: usize,

    /// Starting-area towns forced to a different faction.
    pub different_faction_towns: usize,

    pub ai_placement: AiPlacementMode,

    pub overrides: ManualOverrides,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            human_players: 3,
            ai_players: 0,
            map_style: MapStyle::Random,
            main_area_size: SizeRange::new(8, 16),
            start_area_size: SizeRange::new(3, 4),
            avg_links_main: 3.0,
            avg_links_player: 2.0,
            same_faction_towns: 1,
            different_faction_towns: 0,
            ai_placement: AiPlacementMode::Main,
            overrides: ManualOverrides::default(),
        }
    }
}

impl GenerationConfig {
    /// Load from a TOML file; missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: GenerationConfig = toml::from_str(contents)?;
        if config.avg_links_main < 0.0 || config.avg_links_player < 0.0 {
            return Err(ConfigError::Invalid("average links must not be negative".into()));
        }
        Ok(config)
    }

    /// Check player counts and ranges. Runs before any random draw.
    pub fn validate(&self) -> GenerationResult<()> {
        if self.human_players == 0 || self.human_players > MAX_PLAYERS {
            return Err(GenerationError::HumanPlayers(self.human_players));
        }
        if self.human_players + self.ai_players > MAX_PLAYERS {
            return Err(GenerationError::TotalPlayers {
                humans: self.human_players,
                ai: self.ai_players,
            });
        }
        self.main_area_size.validate("main area size")?;
        self.start_area_size.validate("starting area size")?;
        Ok(())
    }

    pub fn total_players(&self) -> usize {
        self.human_players + self.ai_players
    }

    /// `YYYYMMDD_{style}_H{h}_{a}CP.h3t` for today's date.
    pub fn default_output_name(&self) -> String {
        let date = chrono::Local::now().format("%Y%m%d");
        self.output_name_for(&date.to_string())
    }

    pub fn output_name_for(&self, date: &str) -> String {
        format!(
            "{}_{}_H{}_{}CP.h3t",
            date, self.map_style, self.human_players, self.ai_players
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_size_range_parsing() {
        assert_eq!("12".parse::<SizeRange>().unwrap(), SizeRange::fixed(12));
        assert_eq!("8-16".parse::<SizeRange>().unwrap(), SizeRange::new(8, 16));
        assert_eq!("8..16".parse::<SizeRange>().unwrap(), SizeRange::new(8, 16));
        assert_eq!("8..=16".parse::<SizeRange>().unwrap(), SizeRange::new(8, 16));
        assert!("eight".parse::<SizeRange>().is_err());
        assert!("3-x".parse::<SizeRange>().is_err());
    }

    #[test]
    fn test_size_range_draw_is_inclusive() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let range = SizeRange::new(3, 4);
        let mut seen = [false; 2];
        for _ in 0..100 {
            let v = range.draw(&mut rng);
            assert!((3..=4).contains(&v));
            seen[v - 3] = true;
        }
        assert!(seen[0] && seen[1]);
        assert_eq!(SizeRange::fixed(7).draw(&mut rng), 7);
    }

    #[test]
    fn test_validate_player_counts() {
        let mut config = GenerationConfig::default();
        assert!(config.validate().is_ok());

        config.human_players = 0;
        assert!(matches!(config.validate(), Err(GenerationError::HumanPlayers(0))));

        config.human_players = 5;
        config.ai_players = 4;
        assert!(matches!(
            config.validate(),
            Err(GenerationError::TotalPlayers { humans: 5, ai: 4 })
        ));

        config.ai_players = 3;
        config.start_area_size = SizeRange::new(4, 2);
        assert!(matches!(config.validate(), Err(GenerationError::InvalidRange { .. })));
    }

    #[test]
    fn test_toml_with_partial_fields() {
        let config = GenerationConfig::from_toml(
            r#"
            human_players = 4
            ai_players = 4
            map_style = "balanced"
            ai_placement = "both"

            [main_area_size]
            min = 12
            max = 20

            [overrides]
            joining_percent = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.human_players, 4);
        assert_eq!(config.map_style, MapStyle::Balanced);
        assert_eq!(config.ai_placement, AiPlacementMode::Both);
        assert_eq!(config.main_area_size, SizeRange::new(12, 20));
        assert_eq!(config.start_area_size, SizeRange::new(3, 4));
        assert_eq!(config.overrides.joining_percent, Some(3));
        assert_eq!(config.overrides.monster_disposition, None);
    }

    #[test]
    fn test_toml_rejects_unknown_style() {
        let err = GenerationConfig::from_toml("map_style = \"spiral\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_output_name() {
        let mut config = GenerationConfig::default();
        config.map_style = MapStyle::Balanced;
        config.human_players = 4;
        config.ai_players = 2;
        assert_eq!(config.output_name_for("20250101"), "20250101_balanced_H4_2CP.h3t");
        assert!(config.default_output_name().ends_with("_balanced_H4_2CP.h3t"));
    }

    #[test]
    fn test_random_placement_resolves_to_concrete_mode() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        for _ in 0..50 {
            assert_ne!(AiPlacementMode::Random.resolve(&mut rng), AiPlacementMode::Random);
        }
        assert_eq!(AiPlacementMode::Both.resolve(&mut rng), AiPlacementMode::Both);
    }

    #[test]
    fn test_enum_names_parse_back() {
        for style in MapStyle::all() {
            assert_eq!(style.name().parse::<MapStyle>().unwrap(), *style);
        }
        assert_eq!("BOTH".parse::<AiPlacementMode>().unwrap(), AiPlacementMode::Both);
    }
}
