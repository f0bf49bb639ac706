use thiserror::Error;

#[derive(Debug, Error)]
pub enum WindError {
    /// Terrain category absent from the multiplier table.  Always fatal for
    /// the affected tower — never silently defaulted.
    #[error("terrain category '{0}' is not defined in the terrain multiplier table")]
    UnknownTerrainCategory(String),

    /// The 10 m reference height is not a grid point of the multiplier table.
    #[error("terrain multiplier table has no entry at the {0} m reference height")]
    MissingReferenceHeight(f64),

    #[error("terrain multiplier table is malformed: {0}")]
    MalformedTable(String),

    #[error("wind record parse error: {0}")]
    Parse(String),

    #[error("wind series is empty or out of order")]
    BadSeries,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type WindResult<T> = Result<T, WindError>;
