use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("ensemble must contain at least one body")]
    Empty,

    #[error("{field} has {found} entries, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("body {index} has invalid mass {mass} (must be finite and positive)")]
    InvalidMass { index: usize, mass: f64 },

    #[error("timestep must be finite and positive, got {0}")]
    InvalidTimestep(f64),

    #[error("end time must be finite and non-negative, got {0}")]
    InvalidEndTime(f64),

    #[error("softening length squared must be finite and positive, got {0}")]
    InvalidSoftening(f64),

    #[error("snapshot interval must be at least one step")]
    ZeroSnapshotInterval,

    #[error("invalid mass distribution: {0}")]
    Distribution(#[from] rand_distr::NormalError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
