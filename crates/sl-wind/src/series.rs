//! Per-tower wind time series.

use sl_core::TimeIndex;

use crate::{WindError, WindResult};

/// Ordered `(timestamp, speed, bearing)` samples recorded at one tower's
/// location for one storm event.
///
/// Bearings are stored in radians (converted at load time); speeds are in the
/// same unit as the towers' design speeds (m/s in the usual design tables —
/// the pipeline only ever uses ratios, so any consistent unit works).
#[derive(Clone, Debug, PartialEq)]
pub struct WindSeries {
    index: TimeIndex,
    speed: Vec<f64>,
    bearing_rad: Vec<f64>,
}

impl WindSeries {
    /// Build a series; the three columns must share one length and the
    /// timestamps must be strictly increasing.
    pub fn new(index: TimeIndex, speed: Vec<f64>, bearing_rad: Vec<f64>) -> WindResult<Self> {
        if index.is_empty()
            || !index.is_ordered()
            || speed.len() != index.len()
            || bearing_rad.len() != index.len()
        {
            return Err(WindError::BadSeries);
        }
        Ok(Self { index, speed, bearing_rad })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn index(&self) -> &TimeIndex {
        &self.index
    }

    pub fn speed(&self) -> &[f64] {
        &self.speed
    }

    pub fn bearing_rad(&self) -> &[f64] {
        &self.bearing_rad
    }
}
