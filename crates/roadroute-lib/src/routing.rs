use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::location::LocationId;
use crate::network::RoadNetwork;
use crate::path::find_route;

/// High-level route planning request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRequest {
    pub origin: String,
    pub destination: String,
}

impl RouteRequest {
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
        }
    }
}

/// Single traversed road within a route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RouteLeg {
    pub from: LocationId,
    pub to: LocationId,
    pub distance: f64,
}

/// Planned route returned by the library.
///
/// An empty `steps` list means the destination is unreachable from the
/// origin; `distance` is `None` in exactly that case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePlan {
    pub origin: LocationId,
    pub destination: LocationId,
    pub steps: Vec<LocationId>,
    legs: Vec<RouteLeg>,
    distance: Option<f64>,
}

impl RoutePlan {
    fn unreachable(origin: LocationId, destination: LocationId) -> Self {
        Self {
            origin,
            destination,
            steps: Vec::new(),
            legs: Vec::new(),
            distance: None,
        }
    }

    /// `true` when a path between origin and destination exists.
    pub fn has_path(&self) -> bool {
        !self.steps.is_empty()
    }

    /// Total road distance, or `None` when the destination is unreachable.
    pub fn distance(&self) -> Option<f64> {
        self.distance
    }

    /// Number of roads travelled.
    pub fn hop_count(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// Individual roads travelled, in order.
    pub fn legs(&self) -> &[RouteLeg] {
        &self.legs
    }
}

/// Compute the shortest route between two location names.
pub fn route(network: &RoadNetwork, origin: &str, destination: &str) -> Result<RoutePlan> {
    plan_route(network, &RouteRequest::new(origin, destination))
}

/// Compute the shortest route described by `request`.
///
/// Unknown names are the only failure; an unreachable destination produces a
/// plan without steps.
pub fn plan_route(network: &RoadNetwork, request: &RouteRequest) -> Result<RoutePlan> {
    let origin = network.resolve(&request.origin)?;
    let destination = network.resolve(&request.destination)?;

    let Some(found) = find_route(network, origin, destination) else {
        debug!(
            origin = %request.origin,
            destination = %request.destination,
            "no route between locations"
        );
        return Ok(RoutePlan::unreachable(origin, destination));
    };

    let legs = build_legs(network, &found.steps);
    debug!(
        origin = %request.origin,
        destination = %request.destination,
        hops = found.steps.len().saturating_sub(1),
        distance = found.distance,
        "planned route"
    );

    Ok(RoutePlan {
        origin,
        destination,
        steps: found.steps,
        legs,
        distance: Some(found.distance),
    })
}

fn build_legs(network: &RoadNetwork, steps: &[LocationId]) -> Vec<RouteLeg> {
    steps
        .windows(2)
        .map(|pair| {
            let (from, to) = (pair[0], pair[1]);
            // Parallel roads may exist; the search always relaxes through the
            // cheapest one, so report that.
            let distance = network
                .neighbours(from)
                .iter()
                .filter(|edge| edge.target == to)
                .map(|edge| edge.distance)
                .min_by(f64::total_cmp)
                .unwrap_or(0.0);
            RouteLeg { from, to, distance }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::location::Location;

    fn sample() -> RoadNetwork {
        let mut builder = RoadNetwork::builder();
        for name in ["São Paulo", "Rio de Janeiro", "Curitiba", "Manaus"] {
            builder.add_location(Location::new(name)).unwrap();
        }
        builder
            .add_bidirectional_connection("São Paulo", "Rio de Janeiro", 100.0)
            .unwrap();
        builder
            .add_bidirectional_connection("Rio de Janeiro", "Curitiba", 100.0)
            .unwrap();
        builder
            .add_bidirectional_connection("São Paulo", "Curitiba", 500.0)
            .unwrap();
        builder.build()
    }

    #[test]
    fn legs_sum_to_total_distance() {
        let network = sample();
        let plan = route(&network, "São Paulo", "Curitiba").unwrap();
        let total: f64 = plan.legs().iter().map(|leg| leg.distance).sum();
        assert_eq!(plan.legs().len(), plan.hop_count());
        assert_eq!(Some(total), plan.distance());
    }

    #[test]
    fn unreachable_plan_has_no_distance() {
        let network = sample();
        let plan = route(&network, "São Paulo", "Manaus").unwrap();
        assert!(!plan.has_path());
        assert!(plan.steps.is_empty());
        assert!(plan.legs().is_empty());
        assert_eq!(plan.distance(), None);
        assert_eq!(plan.hop_count(), 0);
    }

    #[test]
    fn overflowing_distance_is_never_reported_as_found() {
        let mut builder = RoadNetwork::builder();
        for name in ["A", "B", "C"] {
            builder.add_location(Location::new(name)).unwrap();
        }
        builder
            .add_bidirectional_connection("A", "B", f64::MAX)
            .unwrap();
        builder
            .add_bidirectional_connection("B", "C", f64::MAX)
            .unwrap();
        let network = builder.build();

        let plan = route(&network, "A", "C").unwrap();
        assert!(!plan.has_path());
        assert_eq!(plan.distance(), None);
    }

    #[test]
    fn unknown_destination_is_an_error() {
        let network = sample();
        let err = route(&network, "São Paulo", "Curitba").unwrap_err();
        match err {
            Error::UnknownLocation { name, suggestions } => {
                assert_eq!(name, "Curitba");
                assert_eq!(suggestions.first().map(String::as_str), Some("Curitiba"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
