use std::fmt::Write;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::location::LocationId;
use crate::network::RoadNetwork;
use crate::routing::RoutePlan;

/// Average road speed used to estimate driving time.
pub const AVERAGE_SPEED_KMH: f64 = 80.0;

/// Presentation style for turning a [`RouteSummary`] into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRenderMode {
    PlainText,
    Basic,
    Json,
}

/// Endpoint within a planned route.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteEndpoint {
    pub id: LocationId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

/// Location visited along a planned route.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteStep {
    pub index: usize,
    pub id: LocationId,
    pub name: String,
    /// Length of the road arriving at this step; absent for the origin.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leg_distance: Option<f64>,
    /// Distance travelled from the origin up to this step.
    pub cumulative_distance: f64,
}

/// Structured representation of a planned route that consumers can serialise.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteSummary {
    pub origin: RouteEndpoint,
    pub destination: RouteEndpoint,
    pub found: bool,
    pub hops: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub straight_line_distance: Option<f64>,
    pub steps: Vec<RouteStep>,
}

impl RouteSummary {
    /// Convert a [`RoutePlan`] into a summary with resolved location names.
    pub fn from_plan(network: &RoadNetwork, plan: &RoutePlan) -> Result<Self> {
        let origin = endpoint(network, plan.origin)?;
        let destination = endpoint(network, plan.destination)?;

        let mut cumulative = 0.0;
        let mut steps = Vec::with_capacity(plan.steps.len());
        for (index, &id) in plan.steps.iter().enumerate() {
            let leg_distance = index
                .checked_sub(1)
                .and_then(|leg| plan.legs().get(leg))
                .map(|leg| leg.distance);
            cumulative += leg_distance.unwrap_or(0.0);
            steps.push(RouteStep {
                index,
                id,
                name: location_name(network, id)?,
                leg_distance,
                cumulative_distance: cumulative,
            });
        }

        let straight_line_distance = match (
            network.location(plan.origin),
            network.location(plan.destination),
        ) {
            (Some(a), Some(b)) => a.distance_to(b),
            _ => None,
        };

        Ok(Self {
            origin,
            destination,
            found: plan.has_path(),
            hops: plan.hop_count(),
            total_distance: plan.distance(),
            estimated_hours: plan.distance().map(|km| km / AVERAGE_SPEED_KMH),
            straight_line_distance,
            steps,
        })
    }

    /// Render the summary using the requested mode.
    pub fn render(&self, mode: RouteRenderMode) -> Result<String> {
        match mode {
            RouteRenderMode::PlainText => Ok(self.render_plain()),
            RouteRenderMode::Basic => Ok(self.render_basic()),
            RouteRenderMode::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        if !self.found {
            let _ = writeln!(
                buffer,
                "No route found between {} and {}.",
                self.origin.name, self.destination.name
            );
            return buffer;
        }

        let _ = writeln!(buffer, "Origin: {}", self.origin.name);
        let _ = writeln!(buffer, "Destination: {}", self.destination.name);
        let joined = self
            .steps
            .iter()
            .map(|step| step.name.as_str())
            .collect::<Vec<_>>()
            .join(" -> ");
        let _ = writeln!(buffer, "Route: {joined}");
        for step in &self.steps {
            match step.leg_distance {
                Some(leg) => {
                    let _ = writeln!(
                        buffer,
                        "{:>3}: {} (+{} km, {} km)",
                        step.index,
                        step.name,
                        format_km(leg),
                        format_km(step.cumulative_distance)
                    );
                }
                None => {
                    let _ = writeln!(buffer, "{:>3}: {}", step.index, step.name);
                }
            }
        }
        if let Some(total) = self.total_distance {
            let _ = writeln!(
                buffer,
                "Total distance: {} km ({} hops)",
                format_km(total),
                self.hops
            );
        }
        if let Some(hours) = self.estimated_hours {
            let _ = writeln!(
                buffer,
                "Estimated driving time: {} at {} km/h",
                format_duration(hours),
                AVERAGE_SPEED_KMH
            );
        }
        buffer
    }

    fn render_basic(&self) -> String {
        let mut buffer = String::new();
        if !self.found {
            let _ = writeln!(buffer, "No route found.");
            return buffer;
        }

        let last = self.steps.len().saturating_sub(1);
        for (position, step) in self.steps.iter().enumerate() {
            let marker = if position == 0 {
                '+'
            } else if position == last {
                '-'
            } else {
                '|'
            };
            let _ = writeln!(buffer, "{marker} {}", step.name);
        }
        if let Some(total) = self.total_distance {
            let _ = writeln!(buffer, "distance: {} km", format_km(total));
        }
        buffer
    }
}

/// Format a distance without trailing zeroes for whole kilometres.
pub fn format_km(km: f64) -> String {
    let rounded = (km * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.1}")
    }
}

/// Format fractional hours as `XhYYm`, truncating partial minutes.
pub fn format_duration(hours: f64) -> String {
    let whole_hours = hours.trunc();
    let minutes = ((hours - whole_hours) * 60.0).trunc();
    format!("{whole_hours:.0}h{minutes:02.0}m")
}

fn endpoint(network: &RoadNetwork, id: LocationId) -> Result<RouteEndpoint> {
    let location = network
        .location(id)
        .ok_or(Error::UnknownLocationId { id })?;
    Ok(RouteEndpoint {
        id,
        name: location.name.clone(),
        region: location.region.clone(),
    })
}

fn location_name(network: &RoadNetwork, id: LocationId) -> Result<String> {
    network
        .location_name(id)
        .map(str::to_string)
        .ok_or(Error::UnknownLocationId { id })
}
