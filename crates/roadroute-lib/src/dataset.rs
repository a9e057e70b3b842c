//! Road network sources.
//!
//! Networks come either from the built-in table of Brazilian state capitals or
//! from a pair of CSV files (locations and roads). Both paths go through
//! [`RoadNetworkBuilder`] so they share the same validation rules.

use std::env;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::location::Location;
use crate::network::{RoadNetwork, RoadNetworkBuilder};

/// Environment variable naming the locations CSV file.
pub const LOCATIONS_ENV: &str = "ROADROUTE_LOCATIONS";
/// Environment variable naming the roads CSV file.
pub const ROADS_ENV: &str = "ROADROUTE_ROADS";

/// State capitals as (name, latitude, longitude, state code).
const BRAZIL_CAPITALS: &[(&str, f64, f64, &str)] = &[
    ("Aracaju", -10.9167, -37.0500, "SE"),
    ("Belém", -1.4558, -48.5039, "PA"),
    ("Belo Horizonte", -19.9167, -43.9333, "MG"),
    ("Boa Vista", 2.8197, -60.6733, "RR"),
    ("Brasília", -15.7939, -47.8828, "DF"),
    ("Campo Grande", -20.4428, -54.6464, "MS"),
    ("Cuiabá", -15.5989, -56.0949, "MT"),
    ("Curitiba", -25.4297, -49.2719, "PR"),
    ("Florianópolis", -27.5969, -48.5495, "SC"),
    ("Fortaleza", -3.7172, -38.5431, "CE"),
    ("Goiânia", -16.6869, -49.2648, "GO"),
    ("João Pessoa", -7.1195, -34.8450, "PB"),
    ("Macapá", 0.0389, -51.0664, "AP"),
    ("Maceió", -9.6658, -35.7353, "AL"),
    ("Manaus", -3.1190, -60.0217, "AM"),
    ("Natal", -5.7945, -35.2110, "RN"),
    ("Palmas", -10.1689, -48.3319, "TO"),
    ("Porto Alegre", -30.0346, -51.2177, "RS"),
    ("Porto Velho", -8.7619, -63.9039, "RO"),
    ("Recife", -8.0578, -34.8829, "PE"),
    ("Rio Branco", -9.9747, -67.8100, "AC"),
    ("Rio de Janeiro", -22.9068, -43.1729, "RJ"),
    ("Salvador", -12.9747, -38.5108, "BA"),
    ("São Luís", -2.5297, -44.3028, "MA"),
    ("São Paulo", -23.5505, -46.6333, "SP"),
    ("Teresina", -5.0949, -42.8038, "PI"),
    ("Vitória", -20.3194, -40.3378, "ES"),
];

/// Highway distances between capitals, in kilometres.
const BRAZIL_HIGHWAYS: &[(&str, &str, f64)] = &[
    ("São Paulo", "Rio de Janeiro", 357.0),
    ("São Paulo", "Curitiba", 338.0),
    ("São Paulo", "Belo Horizonte", 489.0),
    ("São Paulo", "Campo Grande", 893.0),
    ("Rio de Janeiro", "Vitória", 418.0),
    ("Rio de Janeiro", "Belo Horizonte", 340.0),
    ("Belo Horizonte", "Goiânia", 705.0),
    ("Belo Horizonte", "Salvador", 971.0),
    ("Belo Horizonte", "Brasília", 625.0),
    ("Belo Horizonte", "Vitória", 376.0),
    ("Curitiba", "Campo Grande", 789.0),
    ("Curitiba", "Florianópolis", 250.0),
    ("Porto Alegre", "Florianópolis", 375.0),
    ("Salvador", "Aracaju", 277.0),
    ("Salvador", "Recife", 675.0),
    ("Aracaju", "Maceió", 199.0),
    ("Maceió", "Recife", 202.0),
    ("Maceió", "Salvador", 474.0),
    ("Recife", "João Pessoa", 104.0),
    ("João Pessoa", "Natal", 151.0),
    ("Natal", "Fortaleza", 435.0),
    ("Fortaleza", "Teresina", 496.0),
    ("Fortaleza", "Recife", 629.0),
    ("Teresina", "São Luís", 328.0),
    ("Teresina", "Salvador", 891.0),
    ("São Luís", "Belém", 482.0),
    ("São Luís", "Palmas", 894.0),
    ("Brasília", "Goiânia", 173.0),
    ("Palmas", "Belém", 973.0),
    ("Palmas", "Teresina", 745.0),
    ("Belém", "Macapá", 330.0),
    ("Belém", "Manaus", 1292.0),
    ("Manaus", "Boa Vista", 662.0),
    ("Manaus", "Porto Velho", 761.0),
    ("Porto Velho", "Rio Branco", 447.0),
    ("Porto Velho", "Cuiabá", 1152.0),
    ("Campo Grande", "Cuiabá", 553.0),
    ("Vitória", "Salvador", 837.0),
    ("Goiânia", "Campo Grande", 730.0),
    ("Goiânia", "Cuiabá", 739.0),
    ("Salvador", "Palmas", 973.0),
    ("Salvador", "Goiânia", 1199.0),
    ("Palmas", "Goiânia", 711.0),
    ("Palmas", "Cuiabá", 832.0),
    ("Cuiabá", "Manaus", 1448.0),
    ("Cuiabá", "Belém", 1555.0),
    ("Manaus", "Rio Branco", 1183.0),
    ("Boa Vista", "Belém", 1850.0),
];

/// Build the network of Brazilian state capitals and their main highways.
pub fn brazil_capitals() -> Result<RoadNetwork> {
    let mut builder = RoadNetwork::builder();
    for &(name, latitude, longitude, state) in BRAZIL_CAPITALS {
        builder.add_location(
            Location::new(name)
                .with_coordinates(latitude, longitude)
                .with_region(state),
        )?;
    }
    for &(from, to, km) in BRAZIL_HIGHWAYS {
        builder.add_bidirectional_connection(from, to, km)?;
    }
    Ok(builder.build())
}

/// Where the road network should be loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkSource {
    /// The compiled-in table of Brazilian capitals.
    BuiltIn,
    /// A locations CSV paired with a roads CSV.
    Csv { locations: PathBuf, roads: PathBuf },
}

impl NetworkSource {
    /// Resolve the source from explicit paths, falling back to
    /// `ROADROUTE_LOCATIONS`/`ROADROUTE_ROADS` and finally the built-in table.
    pub fn resolve(locations: Option<&Path>, roads: Option<&Path>) -> Result<Self> {
        let locations = locations
            .map(Path::to_path_buf)
            .or_else(|| env::var_os(LOCATIONS_ENV).map(PathBuf::from));
        let roads = roads
            .map(Path::to_path_buf)
            .or_else(|| env::var_os(ROADS_ENV).map(PathBuf::from));

        match (locations, roads) {
            (Some(locations), Some(roads)) => Ok(NetworkSource::Csv { locations, roads }),
            (None, None) => Ok(NetworkSource::BuiltIn),
            _ => Err(Error::IncompleteNetworkSource),
        }
    }

    /// Load the network described by this source.
    pub fn load(&self) -> Result<RoadNetwork> {
        match self {
            NetworkSource::BuiltIn => {
                debug!("loading built-in Brazilian capitals network");
                brazil_capitals()
            }
            NetworkSource::Csv { locations, roads } => load_network(locations, roads),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LocationRow {
    name: String,
    #[serde(default, alias = "lat")]
    latitude: Option<f64>,
    #[serde(default, alias = "lon", alias = "lng")]
    longitude: Option<f64>,
    #[serde(default, alias = "state")]
    region: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RoadRow {
    from: String,
    to: String,
    #[serde(alias = "distance", alias = "km")]
    distance_km: f64,
}

/// Load a network from a locations CSV and a roads CSV.
///
/// Locations need a `name` column and may carry `latitude`, `longitude` and
/// `region`. Roads need `from`, `to` and `distance_km`.
pub fn load_network(locations: &Path, roads: &Path) -> Result<RoadNetwork> {
    let mut builder = RoadNetwork::builder();
    read_locations(&mut builder, fs::File::open(locations)?, locations)?;
    read_roads(&mut builder, fs::File::open(roads)?, roads)?;
    let network = builder.build();
    info!(
        locations = network.len(),
        roads = network.road_count(),
        path = %locations.display(),
        "loaded road network"
    );
    Ok(network)
}

/// Load a network from in-memory CSV readers.
pub fn load_network_from_readers<L: Read, R: Read>(locations: L, roads: R) -> Result<RoadNetwork> {
    let mut builder = RoadNetwork::builder();
    read_locations(&mut builder, locations, Path::new("locations.csv"))?;
    read_roads(&mut builder, roads, Path::new("roads.csv"))?;
    Ok(builder.build())
}

fn read_locations<R: Read>(builder: &mut RoadNetworkBuilder, reader: R, source: &Path) -> Result<()> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = normalized_headers(&mut csv_reader)?;
    require_columns(&headers, &["name"], source)?;

    for record in csv_reader.records() {
        let record = record?;
        let line = record_line(&record);
        let row: LocationRow = record
            .deserialize(Some(&headers))
            .map_err(|err| data_error(source, line, err.to_string()))?;

        let mut location = Location::new(row.name);
        match (row.latitude, row.longitude) {
            (Some(latitude), Some(longitude)) => {
                location = location.with_coordinates(latitude, longitude);
            }
            (None, None) => {}
            _ => {
                return Err(data_error(
                    source,
                    line,
                    format!("location {} has only one coordinate", location.name),
                ));
            }
        }
        if let Some(region) = row.region.filter(|region| !region.is_empty()) {
            location = location.with_region(region);
        }

        builder.add_location(location).inspect_err(|err| {
            warn!(path = %source.display(), line, "rejected location row: {err}");
        })?;
    }
    Ok(())
}

fn read_roads<R: Read>(builder: &mut RoadNetworkBuilder, reader: R, source: &Path) -> Result<()> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = normalized_headers(&mut csv_reader)?;
    require_columns(&headers, &["from", "to"], source)?;

    for record in csv_reader.records() {
        let record = record?;
        let line = record_line(&record);
        let row: RoadRow = record
            .deserialize(Some(&headers))
            .map_err(|err| data_error(source, line, err.to_string()))?;

        builder
            .add_bidirectional_connection(&row.from, &row.to, row.distance_km)
            .inspect_err(|err| {
                warn!(path = %source.display(), line, "rejected road row: {err}");
            })?;
    }
    Ok(())
}

fn normalized_headers<R: Read>(reader: &mut csv::Reader<R>) -> Result<StringRecord> {
    let headers = reader
        .headers()?
        .iter()
        .map(|header| header.trim().to_ascii_lowercase())
        .collect::<StringRecord>();
    reader.set_headers(headers.clone());
    Ok(headers)
}

fn require_columns(headers: &StringRecord, required: &[&str], source: &Path) -> Result<()> {
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|header| header == *column))
        .collect();

    if missing.is_empty() {
        return Ok(());
    }

    Err(data_error(
        source,
        1,
        format!(
            "missing required columns: {}. Available: {}",
            missing.join(", "),
            headers.iter().collect::<Vec<_>>().join(", ")
        ),
    ))
}

fn record_line(record: &StringRecord) -> u64 {
    record.position().map(|pos| pos.line()).unwrap_or_default()
}

fn data_error(source: &Path, line: u64, message: String) -> Error {
    Error::NetworkData {
        path: source.to_path_buf(),
        line,
        message,
    }
}
