//! Output formatting for route, location and statistics rendering.
//!
//! Renderers return `String`s so they can be exercised without a terminal;
//! `main` decides where they are written.

use std::fmt::Write;

use roadroute_lib::output::{format_duration, AVERAGE_SPEED_KMH};
use roadroute_lib::{NetworkStats, RoadNetwork, RouteStep, RouteSummary};
use serde::Serialize;

use crate::terminal::{format_with_separators, ColorPalette};

const NAME_COLUMN_WIDTH: usize = 24;

fn km(value: f64) -> String {
    format!("{} km", format_with_separators(value.round() as u64))
}

/// Render a route summary with colored STRT/ROAD/GOAL tags.
pub fn render_enhanced(summary: &RouteSummary, palette: &ColorPalette) -> String {
    let mut buffer = String::new();
    let p = palette;

    if !summary.found {
        let _ = writeln!(
            buffer,
            "{}No route found between {} and {}.{}",
            p.red, summary.origin.name, summary.destination.name, p.reset
        );
        return buffer;
    }

    let _ = writeln!(
        buffer,
        "Route from {}{}{} to {}{}{} ({} roads):",
        p.white_bold,
        summary.origin.name,
        p.reset,
        p.white_bold,
        summary.destination.name,
        p.reset,
        summary.hops
    );

    let last = summary.steps.len().saturating_sub(1);
    for (position, step) in summary.steps.iter().enumerate() {
        let (tag, label) = if position == 0 {
            (p.tag_start, "STRT")
        } else if position == last {
            (p.tag_goal, "GOAL")
        } else {
            (p.tag_road, "ROAD")
        };
        let _ = writeln!(buffer, "{tag} {label} {} {}", p.reset, render_step(step, p));
    }

    let _ = writeln!(buffer);
    if let Some(total) = summary.total_distance {
        let _ = writeln!(
            buffer,
            "Total distance:         {}{}{}",
            p.green,
            km(total),
            p.reset
        );
    }
    if let Some(straight) = summary.straight_line_distance {
        let _ = writeln!(
            buffer,
            "Straight-line distance: {}{}{}",
            p.gray,
            km(straight),
            p.reset
        );
    }
    if let Some(hours) = summary.estimated_hours {
        let _ = writeln!(
            buffer,
            "Estimated driving time: {} {}at {} km/h{}",
            format_duration(hours),
            p.gray,
            AVERAGE_SPEED_KMH,
            p.reset
        );
    }
    buffer
}

fn render_step(step: &RouteStep, p: &ColorPalette) -> String {
    let name = format!("{:<width$}", step.name, width = NAME_COLUMN_WIDTH);
    match step.leg_distance {
        Some(leg) => format!(
            "{}{}{} {}+{}{} {}({}){}",
            p.white_bold,
            name,
            p.reset,
            p.green,
            km(leg),
            p.reset,
            p.gray,
            km(step.cumulative_distance),
            p.reset
        ),
        None => format!("{}{}{}", p.white_bold, name.trim_end(), p.reset),
    }
}

/// Row used when listing locations.
#[derive(Debug, Clone, Serialize)]
pub struct LocationRow {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    pub roads: usize,
}

/// Collect listing rows in network order.
pub fn location_rows(network: &RoadNetwork) -> Vec<LocationRow> {
    network
        .locations()
        .enumerate()
        .map(|(id, location)| LocationRow {
            name: location.name.clone(),
            region: location.region.clone(),
            latitude: location.coordinates.map(|c| c.latitude),
            longitude: location.coordinates.map(|c| c.longitude),
            roads: network.neighbours(id).len(),
        })
        .collect()
}

/// Render location rows as an aligned text table.
pub fn render_locations(rows: &[LocationRow], palette: &ColorPalette) -> String {
    let p = palette;
    let mut buffer = String::new();
    for row in rows {
        let region = row.region.as_deref().unwrap_or("--");
        let coordinates = match (row.latitude, row.longitude) {
            (Some(lat), Some(lon)) => format!("{lat:>9.4}, {lon:>9.4}"),
            _ => String::new(),
        };
        let _ = writeln!(
            buffer,
            "{}{:<width$}{} {}{:<3}{} {:>2} roads  {}{}{}",
            p.white_bold,
            row.name,
            p.reset,
            p.cyan,
            region,
            p.reset,
            row.roads,
            p.gray,
            coordinates,
            p.reset,
            width = NAME_COLUMN_WIDTH
        );
    }
    buffer
}

/// Render network statistics.
pub fn render_stats(stats: &NetworkStats) -> String {
    let mut buffer = String::new();
    let _ = writeln!(buffer, "Locations: {}", stats.locations);
    let _ = writeln!(buffer, "Roads: {}", stats.roads);
    if stats.isolated.is_empty() {
        let _ = writeln!(buffer, "Isolated locations: none");
    } else {
        let _ = writeln!(
            buffer,
            "Isolated locations: {}",
            stats.isolated.join(", ")
        );
    }
    buffer
}
