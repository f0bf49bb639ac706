//! CSV fragility-parameter loader.
//!
//! # CSV format
//!
//! One row per (type, function, bracket, damage state) curve:
//!
//! ```csv
//! type,function,dev_angle,damage_state,family,median,shape
//! Lattice Tower,suspension,0,minor,lognorm,1.02,0.02
//! Lattice Tower,suspension,0,collapse,lognorm,1.05,0.02
//! Lattice Tower,suspension,15,minor,lognorm,1.00,0.02
//! Lattice Tower,suspension,15,collapse,lognorm,1.03,0.02
//! ```
//!
//! `dev_angle` is the bracket's lower threshold in degrees.  Every bracket
//! must carry exactly one row per damage state of the study's scale.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use sl_core::DamageScale;

use crate::table::{Bracket, CurveParams, DistFamily, FragilityTable};
use crate::{FragilityError, FragilityResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct FragilityRecord {
    #[serde(rename = "type")]
    ttype:        String,
    function:     String,
    dev_angle:    f64,
    damage_state: String,
    family:       String,
    median:       f64,
    shape:        f64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a fragility table from a CSV file.
pub fn load_fragility_csv(path: &Path, scale: &DamageScale) -> FragilityResult<FragilityTable> {
    let file = std::fs::File::open(path).map_err(FragilityError::Io)?;
    load_fragility_reader(file, scale)
}

/// Like [`load_fragility_csv`] but accepts any `Read` source.
pub fn load_fragility_reader<R: Read>(
    reader: R,
    scale: &DamageScale,
) -> FragilityResult<FragilityTable> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    // (type, function) → threshold (integer-keyed for exact grouping) →
    // rank → params.  Thresholds in the design files are whole or half
    // degrees; keying by milli-degrees keeps grouping exact.
    type BracketRows = BTreeMap<i64, BTreeMap<u8, CurveParams>>;
    let mut grouped: BTreeMap<(String, String), BracketRows> = BTreeMap::new();

    for result in csv_reader.deserialize::<FragilityRecord>() {
        let row = result.map_err(|e| FragilityError::Parse(e.to_string()))?;
        let rank = scale
            .rank_of(&row.damage_state)
            .ok_or_else(|| FragilityError::UnknownState(row.damage_state.clone()))?;
        let params = CurveParams {
            family: DistFamily::parse(&row.family)?,
            median: row.median,
            shape:  row.shape,
        };
        let key_millideg = (row.dev_angle * 1000.0).round() as i64;
        let prev = grouped
            .entry((row.ttype, row.function))
            .or_default()
            .entry(key_millideg)
            .or_default()
            .insert(rank, params);
        if prev.is_some() {
            return Err(FragilityError::MalformedTable(format!(
                "duplicate curve for damage state '{}' at threshold {}",
                row.damage_state, row.dev_angle
            )));
        }
    }

    // ── Assemble brackets in rank order ───────────────────────────────────
    let mut rows = BTreeMap::new();
    for (key, by_threshold) in grouped {
        let mut pairs = Vec::with_capacity(by_threshold.len());
        for (millideg, by_rank) in by_threshold {
            let mut curves = Vec::with_capacity(scale.len());
            for state in scale.iter() {
                let params = by_rank.get(&state.rank).ok_or_else(|| {
                    FragilityError::MalformedTable(format!(
                        "bracket at threshold {} for '{}'/'{}' is missing state '{}'",
                        millideg as f64 / 1000.0,
                        key.0,
                        key.1,
                        state.name
                    ))
                })?;
                curves.push(*params);
            }
            pairs.push((millideg as f64 / 1000.0, Bracket { curves }));
        }
        rows.insert(key, pairs);
    }

    FragilityTable::new(rows, scale)
}
