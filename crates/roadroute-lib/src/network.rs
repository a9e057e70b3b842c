use std::collections::HashMap;
use std::iter::FusedIterator;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::location::{Location, LocationId};

/// Minimum Jaro-Winkler similarity for a name to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.7;

/// Directed edge within the road network.
///
/// Every logical road is stored twice, once from each endpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    pub target: LocationId,
    pub distance: f64,
}

#[derive(Debug, Clone)]
struct Node {
    location: Location,
    connections: Vec<Connection>,
}

#[derive(Debug, Default)]
struct NetworkData {
    nodes: Vec<Node>,
    name_to_id: HashMap<String, LocationId>,
}

/// Mutable staging area for a [`RoadNetwork`].
///
/// All validation happens here so the published network is always consistent:
/// names are unique, connection targets exist and weights are non-negative.
#[derive(Debug, Default)]
pub struct RoadNetworkBuilder {
    data: NetworkData,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a location keyed by its name.
    ///
    /// Duplicate names are rejected rather than overwritten.
    pub fn add_location(&mut self, location: Location) -> Result<LocationId> {
        if self.data.name_to_id.contains_key(&location.name) {
            return Err(Error::DuplicateLocation {
                name: location.name,
            });
        }

        let id = self.data.nodes.len();
        self.data.name_to_id.insert(location.name.clone(), id);
        self.data.nodes.push(Node {
            location,
            connections: Vec::new(),
        });
        Ok(id)
    }

    /// Connect two existing locations with a road of the given length.
    pub fn add_bidirectional_connection(&mut self, from: &str, to: &str, weight: f64) -> Result<()> {
        let from_id = self.resolve(from)?;
        let to_id = self.resolve(to)?;

        if !weight.is_finite() || weight < 0.0 {
            return Err(Error::InvalidWeight {
                from: from.to_string(),
                to: to.to_string(),
                weight,
            });
        }

        self.data.nodes[from_id].connections.push(Connection {
            target: to_id,
            distance: weight,
        });
        self.data.nodes[to_id].connections.push(Connection {
            target: from_id,
            distance: weight,
        });
        Ok(())
    }

    /// Freeze the staged data into an immutable, shareable network.
    pub fn build(self) -> RoadNetwork {
        let network = RoadNetwork {
            data: Arc::new(self.data),
        };
        debug!(
            locations = network.len(),
            roads = network.road_count(),
            "built road network"
        );
        network
    }

    fn resolve(&self, name: &str) -> Result<LocationId> {
        self.data
            .name_to_id
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownLocation {
                name: name.to_string(),
                suggestions: Vec::new(),
            })
    }
}

/// Immutable road network shared by route queries.
///
/// Cloning is cheap; all clones share the same underlying arena.
#[derive(Debug, Clone, Default)]
pub struct RoadNetwork {
    data: Arc<NetworkData>,
}

impl RoadNetwork {
    pub fn builder() -> RoadNetworkBuilder {
        RoadNetworkBuilder::new()
    }

    /// Lookup a location identifier by its case-sensitive name.
    pub fn location_id(&self, name: &str) -> Option<LocationId> {
        self.data.name_to_id.get(name).copied()
    }

    /// Resolve a name to its identifier, suggesting close matches on failure.
    pub fn resolve(&self, name: &str) -> Result<LocationId> {
        self.location_id(name).ok_or_else(|| Error::UnknownLocation {
            name: name.to_string(),
            suggestions: self.fuzzy_location_matches(name, 3),
        })
    }

    /// Return the location registered under `name`.
    pub fn get_location(&self, name: &str) -> Result<&Location> {
        let id = self.resolve(name)?;
        Ok(&self.data.nodes[id].location)
    }

    /// Lookup a location by identifier.
    pub fn location(&self, id: LocationId) -> Option<&Location> {
        self.data.nodes.get(id).map(|node| &node.location)
    }

    /// Lookup a location name by identifier.
    pub fn location_name(&self, id: LocationId) -> Option<&str> {
        self.location(id).map(|location| location.name.as_str())
    }

    /// Outgoing connections for a location in insertion order.
    ///
    /// Isolated or unknown identifiers yield an empty slice.
    pub fn neighbours(&self, id: LocationId) -> &[Connection] {
        self.data
            .nodes
            .get(id)
            .map(|node| node.connections.as_slice())
            .unwrap_or(&[])
    }

    /// Iterate over every location in insertion order.
    pub fn locations(&self) -> Locations<'_> {
        Locations {
            inner: self.data.nodes.iter(),
        }
    }

    /// Number of locations in the network.
    pub fn len(&self) -> usize {
        self.data.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.nodes.is_empty()
    }

    /// Number of logical (bidirectional) roads.
    pub fn road_count(&self) -> usize {
        let directed: usize = self
            .data
            .nodes
            .iter()
            .map(|node| node.connections.len())
            .sum();
        directed / 2
    }

    /// Summary counts used by listings and diagnostics.
    pub fn stats(&self) -> NetworkStats {
        let isolated = self
            .data
            .nodes
            .iter()
            .filter(|node| node.connections.is_empty())
            .map(|node| node.location.name.clone())
            .collect();

        NetworkStats {
            locations: self.len(),
            roads: self.road_count(),
            isolated,
        }
    }

    /// Rank location names by similarity to `name`, best match first.
    pub fn fuzzy_location_matches(&self, name: &str, limit: usize) -> Vec<String> {
        let needle = name.to_lowercase();
        let mut scored: Vec<(f64, &str)> = self
            .data
            .nodes
            .iter()
            .map(|node| {
                let candidate = node.location.name.as_str();
                let score = strsim::jaro_winkler(&needle, &candidate.to_lowercase());
                (score, candidate)
            })
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, candidate)| candidate.to_string())
            .collect()
    }
}

/// Restartable iterator over the locations of a [`RoadNetwork`].
#[derive(Debug, Clone)]
pub struct Locations<'a> {
    inner: std::slice::Iter<'a, Node>,
}

impl<'a> Iterator for Locations<'a> {
    type Item = &'a Location;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|node| &node.location)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Locations<'_> {}

impl FusedIterator for Locations<'_> {}

/// Aggregate counts describing a network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkStats {
    pub locations: usize,
    pub roads: usize,
    pub isolated: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> RoadNetwork {
        let mut builder = RoadNetwork::builder();
        for name in ["A", "B", "C", "D"] {
            builder.add_location(Location::new(name)).unwrap();
        }
        builder.add_bidirectional_connection("A", "B", 1.0).unwrap();
        builder.add_bidirectional_connection("B", "C", 2.0).unwrap();
        builder.add_bidirectional_connection("A", "C", 4.0).unwrap();
        builder.build()
    }

    #[test]
    fn connections_are_stored_in_both_directions() {
        let network = triangle();
        let a = network.location_id("A").unwrap();
        let b = network.location_id("B").unwrap();

        assert!(network
            .neighbours(a)
            .iter()
            .any(|edge| edge.target == b && edge.distance == 1.0));
        assert!(network
            .neighbours(b)
            .iter()
            .any(|edge| edge.target == a && edge.distance == 1.0));
    }

    #[test]
    fn neighbours_preserve_insertion_order() {
        let network = triangle();
        let a = network.location_id("A").unwrap();
        let targets: Vec<_> = network
            .neighbours(a)
            .iter()
            .map(|edge| network.location_name(edge.target).unwrap())
            .collect();
        assert_eq!(targets, vec!["B", "C"]);
    }

    #[test]
    fn isolated_and_unknown_ids_have_no_neighbours() {
        let network = triangle();
        let d = network.location_id("D").unwrap();
        assert!(network.neighbours(d).is_empty());
        assert!(network.neighbours(999).is_empty());
    }

    #[test]
    fn stats_count_logical_roads() {
        let stats = triangle().stats();
        assert_eq!(stats.locations, 4);
        assert_eq!(stats.roads, 3);
        assert_eq!(stats.isolated, vec!["D".to_string()]);
    }

    #[test]
    fn builder_rejects_non_finite_weights() {
        let mut builder = RoadNetwork::builder();
        builder.add_location(Location::new("A")).unwrap();
        builder.add_location(Location::new("B")).unwrap();
        let err = builder
            .add_bidirectional_connection("A", "B", f64::NAN)
            .expect_err("NaN rejected");
        assert!(matches!(err, Error::InvalidWeight { .. }));
    }

    #[test]
    fn clones_share_the_same_arena() {
        let network = triangle();
        let clone = network.clone();
        assert!(Arc::ptr_eq(&network.data, &clone.data));
    }
}
