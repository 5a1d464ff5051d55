//! Random connected graph construction.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::region_graph::RegionGraph;
use super::types::{Region, RegionId};

/// Sequential id source for regions.
#[derive(Clone, Debug)]
pub struct IdGenerator {
    next: u32,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    /// Start from a specific value.
    pub fn starting_at(start: u32) -> Self {
        Self { next: start }
    }

    pub fn next_region(&mut self) -> RegionId {
        let id = self.next;
        self.next += 1;
        RegionId(id)
    }

    /// The id the next call to [`IdGenerator::next_region`] will return.
    pub fn peek(&self) -> RegionId {
        RegionId(self.next)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Number of connections to aim for: `size * avg_links / 2`, bounded by a complete graph.
pub fn target_links(size: usize, avg_links: f64) -> usize {
    let complete = size * size.saturating_sub(1) / 2;
    let wanted = (size as f64 * avg_links.max(0.0) / 2.0) as usize;
    wanted.min(complete)
}

/// Build a connected graph of exactly `size` untyped regions.
///
/// A random spanning tree comes first, attaching each unvisited region to a
/// uniformly chosen visited one, which makes the result connected whatever
/// happens next. Shuffled region pairs are then connected until the graph
/// holds [`target_links`] connections; already-connected pairs are skipped.
pub fn build_connected_graph(
    size: usize,
    avg_links: f64,
    ids: &mut IdGenerator,
    rng: &mut ChaCha8Rng,
) -> RegionGraph {
    let mut graph = RegionGraph::new();
    let region_ids: Vec<RegionId> = (0..size).map(|_| ids.next_region()).collect();
    for &id in &region_ids {
        graph.add_region(Region::new(id));
    }

    let mut unvisited = region_ids.clone();
    let mut visited = Vec::with_capacity(size);
    if let Some(root) = unvisited.pop() {
        visited.push(root);
    }
    while let Some(next) = unvisited.pop() {
        let anchor = visited[rng.gen_range(0..visited.len())];
        graph.add_connection(anchor, next, false, false);
        visited.push(next);
    }

    let target = target_links(size, avg_links);
    let mut pairs: Vec<(RegionId, RegionId)> = Vec::with_capacity(size * size.saturating_sub(1) / 2);
    for i in 0..size {
        for j in (i + 1)..size {
            pairs.push((region_ids[i], region_ids[j]));
        }
    }
    pairs.shuffle(rng);

    for (a, b) in pairs {
        if graph.connection_count() >= target {
            break;
        }
        graph.add_connection(a, b, false, false);
    }

    graph
}
