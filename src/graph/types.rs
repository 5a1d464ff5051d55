use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Process-assigned region identifier, unique within a world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RegionId(pub u32);

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role a region plays in the template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ZoneType {
    Start,
    Neutral,
    Treasure,
    SuperTreasure,
    Junction,
}

impl ZoneType {
    pub fn all() -> &'static [Self] {
        &[
            Self::Start,
            Self::Neutral,
            Self::Treasure,
            Self::SuperTreasure,
            Self::Junction,
        ]
    }
}

impl fmt::Display for ZoneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::Neutral => write!(f, "neutral"),
            Self::Treasure => write!(f, "treasure"),
            Self::SuperTreasure => write!(f, "super-treasure"),
            Self::Junction => write!(f, "junction"),
        }
    }
}

/// A single attribute value. Integers, short tokens, or empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    Int(i64),
    Text(String),
    Empty,
}

impl AttrValue {
    /// Text written to the template file. Zero and empty are not distinguished.
    pub fn render(&self) -> String {
        match self {
            AttrValue::Int(0) | AttrValue::Empty => String::new(),
            AttrValue::Int(n) => n.to_string(),
            AttrValue::Text(s) => s.clone(),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttrValue::Int(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Int(v)
    }
}

impl From<i32> for AttrValue {
    fn from(v: i32) -> Self {
        AttrValue::Int(v as i64)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        if v.is_empty() {
            AttrValue::Empty
        } else {
            AttrValue::Text(v.to_string())
        }
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        if v.is_empty() {
            AttrValue::Empty
        } else {
            AttrValue::Text(v)
        }
    }
}

/// Flag columns: `true` renders as "x", `false` as blank.
impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        if v {
            AttrValue::Text("x".to_string())
        } else {
            AttrValue::Empty
        }
    }
}

/// Attribute map of a region or connection, keyed by column name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, AttrValue>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.0.get(key)
    }

    /// Integer value of `key`, treating missing or non-integer values as 0.
    pub fn int(&self, key: &str) -> i64 {
        self.0.get(key).and_then(AttrValue::as_int).unwrap_or(0)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn extend(&mut self, other: Attributes) {
        self.0.extend(other.0);
    }

    /// Rendered column value, blank when absent.
    pub fn render(&self, key: &str) -> String {
        self.0.get(key).map(AttrValue::render).unwrap_or_default()
    }
}

/// A placeable area of the generated map.
#[derive(Clone, Debug, Serialize)]
pub struct Region {
    pub id: RegionId,
    pub zone_type: Option<ZoneType>,
    /// Player index 1..=8, if the region belongs to a player.
    pub owner: Option<u8>,
    pub is_start: bool,
    pub attributes: Attributes,
}

impl Region {
    pub fn new(id: RegionId) -> Self {
        Self {
            id,
            zone_type: None,
            owner: None,
            is_start: false,
            attributes: Attributes::new(),
        }
    }

    pub fn with_owner(id: RegionId, owner: Option<u8>) -> Self {
        Self {
            owner,
            ..Self::new(id)
        }
    }

    /// Start region of a player, typed and flagged.
    pub fn start(id: RegionId, owner: u8) -> Self {
        Self {
            id,
            zone_type: Some(ZoneType::Start),
            owner: Some(owner),
            is_start: true,
            attributes: Attributes::new(),
        }
    }

    /// Whether the zone guarantees a neutral town or castle.
    pub fn has_town(&self) -> bool {
        self.attributes.int("neutral_towns_min") > 0 || self.attributes.int("neutral_castle_min") > 0
    }
}

/// An undirected link between two regions.
#[derive(Clone, Debug, Serialize)]
pub struct Connection {
    pub a: RegionId,
    pub b: RegionId,
    /// Set on links that bridge a player's starting area and the main area.
    pub is_player_to_main: bool,
    pub attributes: Attributes,
}

impl Connection {
    pub fn new(a: RegionId, b: RegionId, is_player_to_main: bool) -> Self {
        Self {
            a,
            b,
            is_player_to_main,
            attributes: Attributes::new(),
        }
    }

    /// Unordered endpoint pair, smaller id first.
    pub fn key(&self) -> (RegionId, RegionId) {
        if self.a <= self.b {
            (self.a, self.b)
        } else {
            (self.b, self.a)
        }
    }

    pub fn joins(&self, x: RegionId, y: RegionId) -> bool {
        (self.a == x && self.b == y) || (self.a == y && self.b == x)
    }

    pub fn touches(&self, id: RegionId) -> bool {
        self.a == id || self.b == id
    }

    /// Endpoint opposite to `id`.
    pub fn other(&self, id: RegionId) -> RegionId {
        if self.a == id {
            self.b
        } else {
            self.a
        }
    }

    /// Copy a pre-drawn attribute set onto an unassigned connection.
    /// Assigned attributes are never overwritten; returns whether the copy happened.
    pub fn apply_template(&mut self, template: &Attributes) -> bool {
        if !self.attributes.is_empty() {
            return false;
        }
        self.attributes = template.clone();
        true
    }
}
