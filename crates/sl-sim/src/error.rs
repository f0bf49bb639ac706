use sl_cascade::CascadeError;
use sl_fragility::FragilityError;
use sl_wind::WindError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("study configuration error: {0}")]
    Config(String),

    /// A reproducible study has no seed-table entry for this (event, line).
    #[error("no seed for event '{event}', line '{line}' in a reproducible study")]
    MissingSeed { event: String, line: String },

    /// A tower of the line has no wind series for this event.
    #[error("no wind series for tower '{tower}'")]
    MissingWindSeries { tower: String },

    /// A tower's wind series does not share the line's time index.
    #[error("wind series for tower '{tower}' is not time-aligned within line '{line}'")]
    TimeMisaligned { line: String, tower: String },

    #[error("wind input: {0}")]
    Wind(#[from] WindError),

    #[error("fragility lookup: {0}")]
    Fragility(#[from] FragilityError),

    #[error("adjacency model: {0}")]
    Cascade(#[from] CascadeError),
}

pub type SimResult<T> = Result<T, SimError>;
