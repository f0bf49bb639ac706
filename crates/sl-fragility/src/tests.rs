//! Unit tests for sl-fragility.

use std::collections::BTreeMap;

use sl_core::DamageScale;

use crate::table::{Bracket, CurveParams, DistFamily};
use crate::{FragilityError, FragilityTable, lognorm_cdf, norm_cdf, pc_wind};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn curve(median: f64, shape: f64) -> CurveParams {
    CurveParams { family: DistFamily::Lognormal, median, shape }
}

/// Two-bracket table for ("Lattice Tower", "suspension") with the usual
/// minor/collapse scale.
fn sample_table(scale: &DamageScale) -> FragilityTable {
    let mut rows = BTreeMap::new();
    rows.insert(
        ("Lattice Tower".to_string(), "suspension".to_string()),
        vec![
            (0.0, Bracket { curves: vec![curve(1.02, 0.02), curve(1.05, 0.02)] }),
            (15.0, Bracket { curves: vec![curve(0.98, 0.03), curve(1.01, 0.03)] }),
        ],
    );
    FragilityTable::new(rows, scale).unwrap()
}

// ── Log-normal CDF ────────────────────────────────────────────────────────────

#[cfg(test)]
mod lognorm_tests {
    use super::*;

    #[test]
    fn norm_cdf_reference_values() {
        // Φ(0) = 0.5, Φ(1.96) ≈ 0.975, Φ(−1.96) ≈ 0.025.
        assert!((norm_cdf(0.0) - 0.5).abs() < 1e-7);
        assert!((norm_cdf(1.96) - 0.975_002).abs() < 1e-5);
        assert!((norm_cdf(-1.96) - 0.024_998).abs() < 1e-5);
    }

    #[test]
    fn lognorm_median_is_half() {
        assert!((lognorm_cdf(1.05, 1.05, 0.2) - 0.5).abs() < 1e-7);
    }

    #[test]
    fn lognorm_zero_and_negative_ratio() {
        assert_eq!(lognorm_cdf(0.0, 1.0, 0.2), 0.0);
        assert_eq!(lognorm_cdf(-3.0, 1.0, 0.2), 0.0);
    }

    #[test]
    fn lognorm_monotonic_in_x() {
        let mut last = 0.0;
        for i in 1..50 {
            let v = lognorm_cdf(i as f64 * 0.05, 1.0, 0.3);
            assert!(v >= last);
            last = v;
        }
    }
}

// ── Bracket selection ─────────────────────────────────────────────────────────

#[cfg(test)]
mod table_tests {
    use super::*;

    #[test]
    fn selects_greatest_threshold_not_exceeding_angle() {
        let scale = DamageScale::minor_collapse();
        let table = sample_table(&scale);

        // Angle 5° → first bracket (threshold 0).
        let b = table.select("Lattice Tower", "suspension", 5.0).unwrap();
        assert_eq!(b.curve(2).median, 1.05);

        // Angle 15° (inclusive) and beyond → second bracket.
        let b = table.select("Lattice Tower", "suspension", 15.0).unwrap();
        assert_eq!(b.curve(2).median, 1.01);
        let b = table.select("Lattice Tower", "suspension", 40.0).unwrap();
        assert_eq!(b.curve(2).median, 1.01);
    }

    #[test]
    fn missing_entry_is_hard_error() {
        let scale = DamageScale::minor_collapse();
        let table = sample_table(&scale);
        match table.select("Steel Pole", "suspension", 5.0) {
            Err(FragilityError::MissingEntry { ttype, .. }) => {
                assert_eq!(ttype, "Steel Pole");
            }
            other => panic!("expected MissingEntry, got {other:?}"),
        }
    }

    #[test]
    fn angle_below_all_thresholds_errors() {
        let scale = DamageScale::minor_collapse();
        let mut rows = BTreeMap::new();
        rows.insert(
            ("Lattice Tower".to_string(), "terminal".to_string()),
            vec![(10.0, Bracket { curves: vec![curve(1.0, 0.02), curve(1.1, 0.02)] })],
        );
        let table = FragilityTable::new(rows, &scale).unwrap();
        assert!(matches!(
            table.select("Lattice Tower", "terminal", 5.0),
            Err(FragilityError::NoBracket { .. })
        ));
    }

    #[test]
    fn bracket_state_count_validated() {
        let scale = DamageScale::minor_collapse();
        let mut rows = BTreeMap::new();
        rows.insert(
            ("Lattice Tower".to_string(), "strainer".to_string()),
            vec![(0.0, Bracket { curves: vec![curve(1.0, 0.02)] })], // one curve, two states
        );
        assert!(matches!(
            FragilityTable::new(rows, &scale),
            Err(FragilityError::MalformedTable(_))
        ));
    }

    #[test]
    fn unknown_family_rejected() {
        assert!(matches!(
            DistFamily::parse("weibull"),
            Err(FragilityError::UnknownFamily(_))
        ));
        assert_eq!(DistFamily::parse("lognorm").unwrap(), DistFamily::Lognormal);
    }
}

// ── Evaluator ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod evaluator_tests {
    use super::*;

    #[test]
    fn pc_wind_matches_cdf_per_cell() {
        let scale = DamageScale::minor_collapse();
        let table = sample_table(&scale);
        let speeds = vec![50.0, 70.0, 80.0];
        let capacity = 75.0;

        let pc = pc_wind(&table, "Lattice Tower", "suspension", 5.0, capacity, &speeds, &scale)
            .unwrap();

        assert_eq!(pc.ntime(), 3);
        assert_eq!(pc.nstates(), 2);
        for (t, &speed) in speeds.iter().enumerate() {
            let ratio = speed / capacity;
            assert!((pc.at(t, 1) - lognorm_cdf(ratio, 1.02, 0.02)).abs() < 1e-12);
            assert!((pc.at(t, 2) - lognorm_cdf(ratio, 1.05, 0.02)).abs() < 1e-12);
        }
    }

    #[test]
    fn pc_wind_propagates_missing_entry() {
        let scale = DamageScale::minor_collapse();
        let table = sample_table(&scale);
        assert!(matches!(
            pc_wind(&table, "Steel Pole", "terminal", 5.0, 75.0, &[50.0], &scale),
            Err(FragilityError::MissingEntry { .. })
        ));
    }
}

// ── CSV loader ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader_tests {
    use super::*;
    use crate::load_fragility_reader;
    use std::io::Cursor;

    const SAMPLE: &str = "\
type,function,dev_angle,damage_state,family,median,shape
Lattice Tower,suspension,0,minor,lognorm,1.02,0.02
Lattice Tower,suspension,0,collapse,lognorm,1.05,0.02
Lattice Tower,suspension,15,minor,lognorm,0.98,0.03
Lattice Tower,suspension,15,collapse,lognorm,1.01,0.03
";

    #[test]
    fn loads_brackets_in_threshold_order() {
        let scale = DamageScale::minor_collapse();
        let table = load_fragility_reader(Cursor::new(SAMPLE), &scale).unwrap();
        assert_eq!(table.len(), 1);

        let low = table.select("Lattice Tower", "suspension", 3.0).unwrap();
        assert_eq!(low.curve(1).median, 1.02);
        let high = table.select("Lattice Tower", "suspension", 20.0).unwrap();
        assert_eq!(high.curve(1).median, 0.98);
    }

    #[test]
    fn missing_state_in_bracket_rejected() {
        let scale = DamageScale::minor_collapse();
        let partial = "type,function,dev_angle,damage_state,family,median,shape\n\
                       Lattice Tower,suspension,0,minor,lognorm,1.02,0.02\n";
        assert!(matches!(
            load_fragility_reader(Cursor::new(partial), &scale),
            Err(FragilityError::MalformedTable(_))
        ));
    }

    #[test]
    fn unknown_state_rejected() {
        let scale = DamageScale::minor_collapse();
        let bad = "type,function,dev_angle,damage_state,family,median,shape\n\
                   Lattice Tower,suspension,0,obliterated,lognorm,1.02,0.02\n";
        assert!(matches!(
            load_fragility_reader(Cursor::new(bad), &scale),
            Err(FragilityError::UnknownState(_))
        ));
    }

    #[test]
    fn duplicate_curve_rejected() {
        let scale = DamageScale::minor_collapse();
        let dup = "type,function,dev_angle,damage_state,family,median,shape\n\
                   Lattice Tower,suspension,0,minor,lognorm,1.02,0.02\n\
                   Lattice Tower,suspension,0,minor,lognorm,1.03,0.02\n";
        assert!(matches!(
            load_fragility_reader(Cursor::new(dup), &scale),
            Err(FragilityError::MalformedTable(_))
        ));
    }
}
