//! Road route library entry points.
//!
//! This crate exposes helpers to build or load a road network, look up
//! locations by name, and compute the shortest route between two of them.
//! Higher-level consumers (the CLI) should only depend on the functions
//! exported here instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod dataset;
pub mod error;
pub mod location;
pub mod network;
pub mod output;
pub mod path;
pub mod routing;

pub use dataset::{brazil_capitals, load_network, load_network_from_readers, NetworkSource};
pub use error::{Error, Result};
pub use location::{Coordinates, Location, LocationId};
pub use network::{Connection, Locations, NetworkStats, RoadNetwork, RoadNetworkBuilder};
pub use output::{RouteEndpoint, RouteRenderMode, RouteStep, RouteSummary};
pub use path::{find_route, FoundPath};
pub use routing::{plan_route, route, RouteLeg, RoutePlan, RouteRequest};
