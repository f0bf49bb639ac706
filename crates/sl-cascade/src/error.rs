use thiserror::Error;

#[derive(Debug, Error)]
pub enum CascadeError {
    /// Adjacency list inconsistent with the declared window width, or the
    /// center slot does not hold the tower itself.
    #[error("malformed adjacency window: {0}")]
    MalformedAdjacency(String),

    /// A raw pattern references an offset outside ±window.
    #[error("pattern offset {offset} outside adjacency window ±{window}")]
    OffsetOutOfWindow { offset: i32, window: usize },

    /// Sampling-invariant violations — rejected at model build time so no
    /// simulation can run against a silently wrong distribution.
    #[error("negative conditional probability {0}")]
    NegativeProbability(f64),

    #[error("conditional probability mass {0} exceeds 1")]
    MassExceedsOne(f64),
}

pub type CascadeResult<T> = Result<T, CascadeError>;
