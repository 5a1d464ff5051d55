use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use serde::Serialize;

use super::builder::IdGenerator;
use super::types::{Connection, Region, RegionId, ZoneType};

/// Most connections allowed between one unordered pair of regions.
pub const MAX_PAIR_CONNECTIONS: usize = 2;

/// Outcome of adding a connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Link {
    /// A new connection was created at this index.
    Created(usize),
    /// The pair was already saturated; index of the first existing connection.
    Existing(usize),
}

impl Link {
    pub fn index(self) -> usize {
        match self {
            Link::Created(i) | Link::Existing(i) => i,
        }
    }

    pub fn is_created(self) -> bool {
        matches!(self, Link::Created(_))
    }
}

/// Owning aggregate of regions and the connections between them.
///
/// Connections refer to regions by id, so a graph may temporarily hold
/// connections to regions owned by another graph; they resolve once both
/// graphs are merged into the same world.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RegionGraph {
    regions: Vec<Region>,
    connections: Vec<Connection>,
}

impl RegionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn regions_mut(&mut self) -> &mut [Region] {
        &mut self.regions
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn connections_mut(&mut self) -> &mut [Connection] {
        &mut self.connections
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn add_region(&mut self, region: Region) -> RegionId {
        let id = region.id;
        self.regions.push(region);
        id
    }

    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }

    pub fn region_mut(&mut self, id: RegionId) -> Option<&mut Region> {
        self.regions.iter_mut().find(|r| r.id == id)
    }

    pub fn zone_type_of(&self, id: RegionId) -> Option<ZoneType> {
        self.region(id).and_then(|r| r.zone_type)
    }

    pub fn connection(&self, index: usize) -> Option<&Connection> {
        self.connections.get(index)
    }

    pub fn connection_mut(&mut self, index: usize) -> Option<&mut Connection> {
        self.connections.get_mut(index)
    }

    /// Number of connections between the unordered pair `(a, b)`.
    pub fn connections_between(&self, a: RegionId, b: RegionId) -> usize {
        self.connections.iter().filter(|c| c.joins(a, b)).count()
    }

    pub fn are_connected(&self, a: RegionId, b: RegionId) -> bool {
        self.connections.iter().any(|c| c.joins(a, b))
    }

    /// Connect `a` and `b`.
    ///
    /// Without `allow_double` an already-connected pair is left alone; with it
    /// a second connection is created but never a third. In both saturated
    /// cases the first existing connection is returned.
    pub fn add_connection(
        &mut self,
        a: RegionId,
        b: RegionId,
        is_player_to_main: bool,
        allow_double: bool,
    ) -> Link {
        let existing: Vec<usize> = self
            .connections
            .iter()
            .enumerate()
            .filter(|(_, c)| c.joins(a, b))
            .map(|(i, _)| i)
            .collect();

        let limit = if allow_double { MAX_PAIR_CONNECTIONS } else { 1 };
        if existing.len() >= limit {
            return Link::Existing(existing[0]);
        }

        self.connections.push(Connection::new(a, b, is_player_to_main));
        Link::Created(self.connections.len() - 1)
    }

    /// Ids of regions directly connected to `id`, in connection order.
    pub fn neighbors(&self, id: RegionId) -> Vec<RegionId> {
        self.connections
            .iter()
            .filter(|c| c.touches(id))
            .map(|c| c.other(id))
            .collect()
    }

    /// Whether every region can reach every other region through connections
    /// between regions of this graph.
    pub fn is_connected(&self) -> bool {
        let Some(first) = self.regions.first() else {
            return true;
        };
        let known: HashSet<RegionId> = self.regions.iter().map(|r| r.id).collect();

        let mut adjacency: HashMap<RegionId, Vec<RegionId>> = HashMap::new();
        for c in &self.connections {
            if known.contains(&c.a) && known.contains(&c.b) {
                adjacency.entry(c.a).or_default().push(c.b);
                adjacency.entry(c.b).or_default().push(c.a);
            }
        }

        let mut visited = HashSet::from([first.id]);
        let mut queue = VecDeque::from([first.id]);
        while let Some(id) = queue.pop_front() {
            for &next in adjacency.get(&id).into_iter().flatten() {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        visited.len() == known.len()
    }

    /// Move every region and connection of `other` into this graph.
    ///
    /// Regions whose id is already present are dropped, and a connection is
    /// dropped when its pair already has [`MAX_PAIR_CONNECTIONS`] connections.
    pub fn merge(&mut self, other: RegionGraph) {
        let mut ids: HashSet<RegionId> = self.regions.iter().map(|r| r.id).collect();
        for region in other.regions {
            if ids.insert(region.id) {
                self.regions.push(region);
            }
        }

        let mut pair_counts: HashMap<(RegionId, RegionId), usize> = HashMap::new();
        for c in &self.connections {
            *pair_counts.entry(c.key()).or_default() += 1;
        }
        for c in other.connections {
            let count = pair_counts.entry(c.key()).or_default();
            if *count < MAX_PAIR_CONNECTIONS {
                *count += 1;
                self.connections.push(c);
            }
        }
    }

    /// Copy this graph with fresh region ids.
    ///
    /// Zone types, start flags and attribute values are copied verbatim, as
    /// are internal connections and their attributes. The returned id list
    /// is index-aligned with [`RegionGraph::regions`] of `self`.
    pub fn replicate(&self, ids: &mut IdGenerator, owner: Option<u8>) -> (RegionGraph, Vec<RegionId>) {
        let mut copy = RegionGraph::new();
        let mut mapping: HashMap<RegionId, RegionId> = HashMap::with_capacity(self.regions.len());
        let mut aligned = Vec::with_capacity(self.regions.len());

        for region in &self.regions {
            let id = ids.next_region();
            copy.add_region(Region {
                id,
                zone_type: region.zone_type,
                owner,
                is_start: region.is_start,
                attributes: region.attributes.clone(),
            });
            mapping.insert(region.id, id);
            aligned.push(id);
        }

        for c in &self.connections {
            let (Some(&a), Some(&b)) = (mapping.get(&c.a), mapping.get(&c.b)) else {
                continue;
            };
            let link = copy.add_connection(a, b, c.is_player_to_main, true);
            if let Link::Created(index) = link {
                copy.connections[index].attributes = c.attributes.clone();
            }
        }

        (copy, aligned)
    }

    /// Check structural well-formedness: unique ids, no dangling endpoints,
    /// no self-loops, and at most two connections per pair.
    pub fn validate_structure(&self) -> Result<(), String> {
        let mut ids = HashSet::new();
        for r in &self.regions {
            if !ids.insert(r.id) {
                return Err(format!("duplicate region id {}", r.id));
            }
        }

        let mut pair_counts: HashMap<(RegionId, RegionId), usize> = HashMap::new();
        for c in &self.connections {
            if c.a == c.b {
                return Err(format!("self-loop on region {}", c.a));
            }
            for end in [c.a, c.b] {
                if !ids.contains(&end) {
                    return Err(format!("connection {} <-> {} references missing region {}", c.a, c.b, end));
                }
            }
            let count = pair_counts.entry(c.key()).or_default();
            *count += 1;
            if *count > MAX_PAIR_CONNECTIONS {
                return Err(format!("more than {} connections between {} and {}", MAX_PAIR_CONNECTIONS, c.a, c.b));
            }
        }
        Ok(())
    }
}

impl fmt::Display for RegionGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Graph with {} regions and {} connections:", self.regions.len(), self.connections.len())?;
        for region in &self.regions {
            let neighbors: Vec<String> = self.neighbors(region.id).iter().map(|id| id.to_string()).collect();
            let owner = region.owner.map(|o| format!(" [Player{}]", o)).unwrap_or_default();
            let start = if region.is_start { " (Start)" } else { "" };
            let zone = region.zone_type.map(|z| z.to_string()).unwrap_or_else(|| "?".to_string());
            writeln!(
                f,
                "  Region {}{}{} {}: connected to [{}]",
                region.id,
                owner,
                start,
                zone,
                neighbors.join(", ")
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with(ids: &[u32]) -> RegionGraph {
        let mut g = RegionGraph::new();
        for &id in ids {
            g.add_region(Region::new(RegionId(id)));
        }
        g
    }

    #[test]
    fn test_single_link_is_idempotent() {
        let mut g = graph_with(&[1, 2]);
        let first = g.add_connection(RegionId(1), RegionId(2), false, false);
        let again = g.add_connection(RegionId(2), RegionId(1), false, false);
        assert_eq!(first, Link::Created(0));
        assert_eq!(again, Link::Existing(0));
        assert_eq!(g.connection_count(), 1);
    }

    #[test]
    fn test_double_link_caps_at_two() {
        let mut g = graph_with(&[1, 2]);
        assert!(g.add_connection(RegionId(1), RegionId(2), false, true).is_created());
        assert!(g.add_connection(RegionId(1), RegionId(2), false, true).is_created());
        let third = g.add_connection(RegionId(2), RegionId(1), false, true);
        assert_eq!(third, Link::Existing(0));
        assert_eq!(g.connections_between(RegionId(1), RegionId(2)), 2);
    }

    #[test]
    fn test_merge_dedups_regions_and_caps_pairs() {
        let mut a = graph_with(&[1, 2]);
        a.add_connection(RegionId(1), RegionId(2), false, true);
        a.add_connection(RegionId(1), RegionId(2), false, true);

        let mut b = graph_with(&[2, 3]);
        b.add_connection(RegionId(2), RegionId(1), false, false);
        b.add_connection(RegionId(2), RegionId(3), false, false);

        a.merge(b);
        assert_eq!(a.region_count(), 3);
        assert_eq!(a.connections_between(RegionId(1), RegionId(2)), 2);
        assert_eq!(a.connections_between(RegionId(2), RegionId(3)), 1);
        assert!(a.validate_structure().is_ok());
    }

    #[test]
    fn test_connectivity_detection() {
        let mut g = graph_with(&[1, 2, 3]);
        g.add_connection(RegionId(1), RegionId(2), false, false);
        assert!(!g.is_connected());
        g.add_connection(RegionId(3), RegionId(2), false, false);
        assert!(g.is_connected());
    }

    #[test]
    fn test_replicate_preserves_structure_and_attributes() {
        let mut g = graph_with(&[0, 1, 2]);
        g.regions_mut()[1].zone_type = Some(ZoneType::Treasure);
        g.regions_mut()[1].attributes.set("zone_size", 22);
        let link = g.add_connection(RegionId(0), RegionId(1), false, false);
        g.connections_mut()[link.index()].attributes.set("guard_strength", 7000);
        g.add_connection(RegionId(1), RegionId(2), false, false);

        let mut ids = IdGenerator::starting_at(10);
        let (copy, aligned) = g.replicate(&mut ids, Some(2));

        assert_eq!(aligned, vec![RegionId(10), RegionId(11), RegionId(12)]);
        assert_eq!(copy.zone_type_of(RegionId(11)), Some(ZoneType::Treasure));
        assert_eq!(copy.regions()[1].attributes, g.regions()[1].attributes);
        assert!(copy.regions().iter().all(|r| r.owner == Some(2)));
        assert_eq!(copy.connection_count(), 2);
        assert!(copy.connections()[0].joins(RegionId(10), RegionId(11)));
        assert_eq!(copy.connections()[0].attributes.int("guard_strength"), 7000);
    }

    #[test]
    fn test_validate_rejects_dangling_and_self_loops() {
        let mut g = graph_with(&[1]);
        g.add_connection(RegionId(1), RegionId(9), false, false);
        assert!(g.validate_structure().is_err());

        let mut loops = graph_with(&[1]);
        loops.add_connection(RegionId(1), RegionId(1), false, false);
        assert!(loops.validate_structure().is_err());
    }
}
