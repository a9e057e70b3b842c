use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use tracing::trace;

use crate::location::LocationId;
use crate::network::RoadNetwork;

/// Lowest-cost path produced by [`find_route`].
#[derive(Debug, Clone, PartialEq)]
pub struct FoundPath {
    /// Locations from start to goal, both inclusive.
    pub steps: Vec<LocationId>,
    /// Sum of the connection weights along `steps`.
    pub distance: f64,
}

/// Run Dijkstra's algorithm between `start` and `goal`.
///
/// Returns `None` when the goal cannot be reached from the start. The search
/// stops as soon as the goal is extracted from the queue. When two paths tie,
/// the predecessor discovered first is kept.
pub fn find_route(network: &RoadNetwork, start: LocationId, goal: LocationId) -> Option<FoundPath> {
    if start == goal {
        return Some(FoundPath {
            steps: vec![start],
            distance: 0.0,
        });
    }

    // Absence from `distances` means the location has not been reached yet.
    let mut distances: HashMap<LocationId, f64> = HashMap::new();
    let mut parents: HashMap<LocationId, LocationId> = HashMap::new();
    let mut queue = BinaryHeap::new();
    let mut sequence = 0_u64;
    let mut settled = 0_usize;

    distances.insert(start, 0.0);
    queue.push(QueueEntry::new(start, 0.0, sequence));

    while let Some(entry) = queue.pop() {
        let current_distance = match distances.get(&entry.node) {
            Some(distance) if *distance < entry.cost.0 => continue,
            Some(distance) => *distance,
            None => continue,
        };
        settled += 1;

        if entry.node == goal {
            trace!(settled, distance = current_distance, "dijkstra reached goal");
            return Some(FoundPath {
                steps: reconstruct_path(&parents, start, goal),
                distance: current_distance,
            });
        }

        for edge in network.neighbours(entry.node) {
            let next = edge.target;
            let next_cost = current_distance + edge.distance;
            // A total that overflows is not a usable distance.
            let improves = next_cost.is_finite()
                && match distances.get(&next) {
                    Some(&known) => next_cost < known,
                    None => true,
                };
            if improves {
                distances.insert(next, next_cost);
                parents.insert(next, entry.node);
                sequence += 1;
                queue.push(QueueEntry::new(next, next_cost, sequence));
            }
        }
    }

    trace!(settled, "dijkstra exhausted queue without reaching goal");
    None
}

fn reconstruct_path(
    parents: &HashMap<LocationId, LocationId>,
    start: LocationId,
    goal: LocationId,
) -> Vec<LocationId> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        match parents.get(&current) {
            Some(&parent) => {
                path.push(parent);
                current = parent;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    node: LocationId,
    cost: FloatOrd,
    sequence: u64,
}

impl QueueEntry {
    fn new(node: LocationId, cost: f64, sequence: u64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
            sequence,
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by cost; equal
        // costs pop in the order they were pushed.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
