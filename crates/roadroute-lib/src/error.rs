use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the road routing library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a location name could not be found in the network.
    #[error("unknown location: {name}{}", format_suggestions(.suggestions))]
    UnknownLocation {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when a location with the same name was already added.
    #[error("duplicate location: {name}")]
    DuplicateLocation { name: String },

    /// Raised when a connection weight is negative or not a finite number.
    #[error("invalid weight {weight} for road {from} <-> {to}; distances must be finite and non-negative")]
    InvalidWeight { from: String, to: String, weight: f64 },

    /// Raised when a network data file contains a malformed row.
    #[error("invalid network data in {path} (line {line}): {message}")]
    NetworkData {
        path: PathBuf,
        line: u64,
        message: String,
    },

    /// Raised when only one half of a CSV network source was configured.
    #[error("incomplete network source: both a locations file and a roads file are required")]
    IncompleteNetworkSource,

    /// Raised when a route plan references an identifier from another network.
    #[error("location id {id} does not belong to this network")]
    UnknownLocationId { id: usize },

    /// Wrapper for CSV parsing errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Wrapper for JSON serialization errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_location_without_suggestions() {
        let err = Error::UnknownLocation {
            name: "Gotham".to_string(),
            suggestions: Vec::new(),
        };
        assert_eq!(err.to_string(), "unknown location: Gotham");
    }

    #[test]
    fn unknown_location_lists_suggestions() {
        let err = Error::UnknownLocation {
            name: "Curitba".to_string(),
            suggestions: vec!["Curitiba".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "unknown location: Curitba. Did you mean 'Curitiba'?"
        );

        let err = Error::UnknownLocation {
            name: "Sao".to_string(),
            suggestions: vec!["São Paulo".to_string(), "São Luís".to_string()],
        };
        assert!(err
            .to_string()
            .ends_with("Did you mean one of: 'São Paulo', 'São Luís'?"));
    }
}
