//! Fragility parameter table.
//!
//! Parameters are keyed by (structural type, function); within an entry,
//! ascending deviation-angle thresholds partition towers into brackets, and
//! each bracket carries one curve per damage state.
//!
//! Bracket selection follows the design tables' convention: the applicable
//! bracket is the one with the greatest threshold not exceeding the tower's
//! deviation angle — i.e. index = (count of thresholds ≤ angle) − 1.

use std::collections::BTreeMap;

use sl_core::DamageScale;

use crate::{FragilityError, FragilityResult};

/// Distribution family of one fragility curve.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DistFamily {
    Lognormal,
}

impl DistFamily {
    /// Parse a family identifier as it appears in parameter files.
    pub fn parse(s: &str) -> FragilityResult<Self> {
        match s {
            "lognorm" | "lognormal" => Ok(DistFamily::Lognormal),
            other => Err(FragilityError::UnknownFamily(other.to_string())),
        }
    }
}

/// Parameters of one fragility curve: `median` is the load ratio at 50 %
/// exceedance probability, `shape` the log-space standard deviation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CurveParams {
    pub family: DistFamily,
    pub median: f64,
    pub shape:  f64,
}

/// One deviation-angle bracket: a curve per damage state, indexed `rank - 1`.
#[derive(Clone, Debug)]
pub struct Bracket {
    pub curves: Vec<CurveParams>,
}

impl Bracket {
    /// Curve for a damage state by 1-based rank.
    #[inline]
    pub fn curve(&self, rank: u8) -> &CurveParams {
        &self.curves[rank as usize - 1]
    }
}

#[derive(Clone, Debug)]
struct Entry {
    /// Ascending deviation-angle thresholds; `brackets[i]` applies when
    /// `thresholds[i]` is the greatest threshold ≤ the tower's angle.
    thresholds: Vec<f64>,
    brackets:   Vec<Bracket>,
}

/// The full fragility parameter table for a study.
#[derive(Clone, Debug, Default)]
pub struct FragilityTable {
    entries: BTreeMap<(String, String), Entry>,
}

impl FragilityTable {
    /// Assemble a table from per-key bracket lists.
    ///
    /// `rows`: for each (type, function) key, ascending `(threshold, bracket)`
    /// pairs where every bracket holds exactly one curve per state of `scale`.
    pub fn new(
        rows: BTreeMap<(String, String), Vec<(f64, Bracket)>>,
        scale: &DamageScale,
    ) -> FragilityResult<Self> {
        let mut entries = BTreeMap::new();
        for ((ttype, funct), pairs) in rows {
            if pairs.is_empty() {
                return Err(FragilityError::MalformedTable(format!(
                    "no brackets for type '{ttype}' function '{funct}'"
                )));
            }
            let mut thresholds = Vec::with_capacity(pairs.len());
            let mut brackets = Vec::with_capacity(pairs.len());
            for (threshold, bracket) in pairs {
                if bracket.curves.len() != scale.len() {
                    return Err(FragilityError::MalformedTable(format!(
                        "bracket at threshold {threshold} for '{ttype}'/'{funct}' has \
                         {} curves for {} damage states",
                        bracket.curves.len(),
                        scale.len()
                    )));
                }
                thresholds.push(threshold);
                brackets.push(bracket);
            }
            if !thresholds.windows(2).all(|w| w[0] < w[1]) {
                return Err(FragilityError::MalformedTable(format!(
                    "thresholds for '{ttype}'/'{funct}' are not strictly ascending"
                )));
            }
            entries.insert((ttype, funct), Entry { thresholds, brackets });
        }
        Ok(Self { entries })
    }

    /// Select the bracket for a tower's attributes.
    ///
    /// # Errors
    ///
    /// [`FragilityError::MissingEntry`] when the (type, function) key is
    /// absent; [`FragilityError::NoBracket`] when the deviation angle is
    /// below every threshold.
    pub fn select(&self, ttype: &str, funct: &str, dev_angle: f64) -> FragilityResult<&Bracket> {
        let entry = self
            .entries
            .get(&(ttype.to_string(), funct.to_string()))
            .ok_or_else(|| FragilityError::MissingEntry {
                ttype: ttype.to_string(),
                funct: funct.to_string(),
            })?;

        let count = entry.thresholds.iter().filter(|&&th| th <= dev_angle).count();
        if count == 0 {
            return Err(FragilityError::NoBracket {
                ttype:     ttype.to_string(),
                funct:     funct.to_string(),
                dev_angle,
            });
        }
        Ok(&entry.brackets[count - 1])
    }

    /// Number of (type, function) entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
