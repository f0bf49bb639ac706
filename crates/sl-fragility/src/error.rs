use thiserror::Error;

#[derive(Debug, Error)]
pub enum FragilityError {
    /// No fragility entry for this (structural type, function) combination.
    /// Always fatal for the affected tower — the pipeline must not fall back
    /// to skipping it.
    #[error("no fragility entry for type '{ttype}' function '{funct}'")]
    MissingEntry { ttype: String, funct: String },

    /// The tower's deviation angle is below every bracket threshold.
    #[error("deviation angle {dev_angle} matches no bracket for type '{ttype}' function '{funct}'")]
    NoBracket {
        ttype:     String,
        funct:     String,
        dev_angle: f64,
    },

    #[error("unknown fragility distribution family '{0}'")]
    UnknownFamily(String),

    #[error("unknown damage state '{0}' in fragility table")]
    UnknownState(String),

    #[error("fragility table is malformed: {0}")]
    MalformedTable(String),

    #[error("fragility record parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type FragilityResult<T> = Result<T, FragilityError>;
