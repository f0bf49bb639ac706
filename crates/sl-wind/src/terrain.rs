//! Terrain-category multiplier table and height correction.
//!
//! Design wind speeds are quoted at a 10 m reference height; a tower's
//! conductors attach at its drag height `z`.  The correction factor is
//!
//!   M(z, cat) / M(10, cat)
//!
//! where `M` is linearly interpolated from a height × terrain-category grid.
//! The reference height must be an exact grid point — design tables always
//! carry it, so its absence is a configuration defect, not something to
//! interpolate around.

use std::collections::BTreeMap;

use crate::{WindError, WindResult};

/// Height of the design reference level in metres.
pub const REFERENCE_HEIGHT_M: f64 = 10.0;

/// Height × terrain-category multiplier grid.
///
/// Categories are keyed by label ("tc1".."tc4" in the usual design tables,
/// but any label scheme works).  Heights are ascending.
#[derive(Clone, Debug)]
pub struct TerrainTable {
    heights: Vec<f64>,
    categories: BTreeMap<String, Vec<f64>>,
}

impl TerrainTable {
    /// Build a table; every category column must match the height axis.
    pub fn new(
        heights: Vec<f64>,
        categories: BTreeMap<String, Vec<f64>>,
    ) -> WindResult<Self> {
        if heights.is_empty() {
            return Err(WindError::MalformedTable("empty height axis".into()));
        }
        if !heights.windows(2).all(|w| w[0] < w[1]) {
            return Err(WindError::MalformedTable(
                "height axis must be strictly ascending".into(),
            ));
        }
        for (cat, col) in &categories {
            if col.len() != heights.len() {
                return Err(WindError::MalformedTable(format!(
                    "category '{cat}' has {} multipliers for {} heights",
                    col.len(),
                    heights.len()
                )));
            }
        }
        Ok(Self { heights, categories })
    }

    /// Multiplier at `height` for `category`, linearly interpolated and
    /// clamped at the grid's ends.
    pub fn multiplier(&self, category: &str, height: f64) -> WindResult<f64> {
        let col = self
            .categories
            .get(category)
            .ok_or_else(|| WindError::UnknownTerrainCategory(category.to_string()))?;
        Ok(interp(height, &self.heights, col))
    }

    /// Height-correction factor M(z)/M(10) for a tower's drag height.
    ///
    /// # Errors
    ///
    /// [`WindError::UnknownTerrainCategory`] for an undefined category and
    /// [`WindError::MissingReferenceHeight`] if 10 m is not a grid point.
    pub fn height_correction(&self, category: &str, drag_height: f64) -> WindResult<f64> {
        let col = self
            .categories
            .get(category)
            .ok_or_else(|| WindError::UnknownTerrainCategory(category.to_string()))?;

        let idx_ref = self
            .heights
            .iter()
            .position(|&h| h == REFERENCE_HEIGHT_M)
            .ok_or(WindError::MissingReferenceHeight(REFERENCE_HEIGHT_M))?;

        Ok(interp(drag_height, &self.heights, col) / col[idx_ref])
    }
}

/// Piecewise-linear interpolation of `x` over `(xs, ys)`, clamped to the
/// endpoint values outside the grid.  `xs` is strictly ascending.
pub(crate) fn interp(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[xs.len() - 1] {
        return ys[ys.len() - 1];
    }
    // partition_point: first index with xs[i] > x; x is strictly inside the grid.
    let hi = xs.partition_point(|&v| v <= x);
    let lo = hi - 1;
    let frac = (x - xs[lo]) / (xs[hi] - xs[lo]);
    ys[lo] + frac * (ys[hi] - ys[lo])
}
