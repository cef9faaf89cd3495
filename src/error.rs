use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse topology or config JSON: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Failed to parse SNDlib topology (line {line}): {message}")]
    TopologyParseError { line: usize, message: String },

    #[error("Invalid network topology: {0}")]
    InvalidTopology(String),

    #[error("Node {0} does not exist in the topology")]
    NodeNotFound(usize),

    #[error("No link connects node {from} to node {to}")]
    LinkNotFound { from: usize, to: usize },

    #[error("Action {index} is not available, current node offers {available} actions")]
    ActionNotAvailable { index: usize, available: usize },

    #[error("Invalid traffic perturbation range: low {low}% is greater than high {high}%")]
    InvalidPerturbationRange { low: f64, high: f64 },

    #[error("Invalid environment configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to export episode statistics: {0}")]
    StatisticsExport(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
