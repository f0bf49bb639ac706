//! Unit tests for topology, the conditional adjacency model, and both
//! propagation engines.

use sl_core::TowerId;

use crate::tower::{CircuitKind, Tower};

/// A window-2 tower at the left boundary of its line: offsets −2 and −1 are
/// sentinels, +1 and +2 are real neighbors.
fn boundary_tower(cond_table: Vec<(Vec<i32>, f64)>) -> Tower {
    Tower {
        id: TowerId(10),
        name: "T10".into(),
        position: 0,
        ttype: "Lattice Tower".into(),
        funct: "suspension".into(),
        strong_axis_deg: 90.0,
        dev_angle_deg: 0.0,
        height_m: 25.0,
        drag_height_m: 15.0,
        terrain_category: "tc2".into(),
        design_speed: 75.0,
        collapse_capacity: 75.0,
        window: 2,
        adjacency: vec![
            TowerId::INVALID,
            TowerId::INVALID,
            TowerId(10),
            TowerId(11),
            TowerId(12),
        ],
        cond_table,
    }
}

#[cfg(test)]
mod capacity {
    use super::*;
    use crate::tower::{TopoAdjustment, collapse_capacity};

    #[test]
    fn shorter_span_raises_capacity() {
        // u = 1 − 0.33·(1 − 300/400) = 0.9175
        let vc = collapse_capacity(75.0, 300.0, 400.0, CircuitKind::Single);
        assert!((vc - 75.0 / 0.9175_f64.sqrt()).abs() < 1e-12);
        assert!(vc > 75.0);
    }

    #[test]
    fn double_circuit_uses_larger_factor() {
        let single = collapse_capacity(75.0, 300.0, 400.0, CircuitKind::Single);
        let double = collapse_capacity(75.0, 300.0, 400.0, CircuitKind::Double);
        assert!(double > single);
    }

    #[test]
    fn long_span_caps_at_design_speed() {
        // Actual span beyond design span: u clamps to 1, Vc = Vd.
        let vc = collapse_capacity(75.0, 500.0, 400.0, CircuitKind::Single);
        assert_eq!(vc, 75.0);
    }

    #[test]
    fn topo_adjustment_brackets() {
        let topo = TopoAdjustment {
            thresholds: vec![1.05, 1.1],
            factors:    vec![1.0, 1.1, 1.2],
        };
        assert_eq!(topo.factor_for(1.0), 1.0);
        assert_eq!(topo.factor_for(1.05), 1.1);
        assert_eq!(topo.factor_for(1.3), 1.2);
        assert_eq!(topo.adjust(75.0, 1.2), 75.0 * 1.2);
    }
}

#[cfg(test)]
mod topology {
    use super::*;
    use sl_core::LineId;

    use crate::CascadeError;
    use crate::tower::Line;

    #[test]
    fn neighbor_lookup() {
        let tower = boundary_tower(vec![]);
        assert_eq!(tower.neighbor(0), Some(TowerId(10)));
        assert_eq!(tower.neighbor(1), Some(TowerId(11)));
        assert_eq!(tower.neighbor(2), Some(TowerId(12)));
        assert_eq!(tower.neighbor(-1), None);
        assert_eq!(tower.neighbor(-2), None);
        assert_eq!(tower.neighbor(3), None);
    }

    #[test]
    fn validate_accepts_boundary_tower() {
        assert!(boundary_tower(vec![]).validate().is_ok());
    }

    #[test]
    fn wrong_slot_count_rejected() {
        let mut tower = boundary_tower(vec![]);
        tower.adjacency.pop();
        assert!(matches!(
            tower.validate(),
            Err(CascadeError::MalformedAdjacency(_))
        ));
    }

    #[test]
    fn wrong_center_rejected() {
        let mut tower = boundary_tower(vec![]);
        tower.adjacency[2] = TowerId(99);
        assert!(tower.validate().is_err());
    }

    #[test]
    fn interior_sentinel_rejected() {
        // Sentinel at offset +1 with a real tower at +2 is a gap, not a
        // boundary.
        let mut tower = boundary_tower(vec![]);
        tower.adjacency[3] = TowerId::INVALID;
        assert!(tower.validate().is_err());
    }

    #[test]
    fn line_positions_must_match_order() {
        let mut tower = boundary_tower(vec![]);
        tower.position = 3;
        let line = Line { id: LineId(0), name: "LineA".into(), towers: vec![tower] };
        assert!(line.validate().is_err());
    }
}

#[cfg(test)]
mod model {
    use super::*;
    use crate::CascadeError;
    use crate::model::CondAdjacency;

    fn table() -> Vec<(Vec<i32>, f64)> {
        vec![
            // Trims to [1]; offsets −1 and 0 are outside the valid window.
            (vec![-1, 0, 1], 0.10),
            // Also trims to [1]; merges with the row above.
            (vec![0, 1], 0.05),
            // Trims to [1, 2].
            (vec![-2, -1, 0, 1, 2], 0.02),
            // Trims to nothing: carries no propagation mass.
            (vec![0], 0.50),
        ]
    }

    #[test]
    fn trims_and_merges_boundary_patterns() {
        let model = CondAdjacency::build(&boundary_tower(table())).unwrap();

        let patterns = model.patterns();
        assert_eq!(patterns.len(), 2);
        // Ascending by merged probability.
        assert_eq!(patterns[0].offsets, vec![1, 2]);
        assert!((patterns[0].probability - 0.02).abs() < 1e-12);
        assert_eq!(patterns[1].offsets, vec![1]);
        assert!((patterns[1].probability - 0.15).abs() < 1e-12);
    }

    #[test]
    fn thresholds_non_decreasing_and_bounded() {
        let model = CondAdjacency::build(&boundary_tower(table())).unwrap();
        let mut prev = 0.0;
        for p in model.patterns() {
            assert!(p.cumulative >= prev);
            prev = p.cumulative;
        }
        assert!(model.total_mass() <= 1.0);
        assert!((model.total_mass() - 0.17).abs() < 1e-12);
    }

    #[test]
    fn surviving_offsets_never_map_to_sentinels() {
        let tower = boundary_tower(table());
        let model = CondAdjacency::build(&tower).unwrap();
        for p in model.patterns() {
            for &off in &p.offsets {
                assert!(tower.neighbor(off).is_some(), "offset {off} is a sentinel");
            }
        }
    }

    #[test]
    fn marginal_cross_check() {
        // Per offset, the marginal must equal the sum over merged patterns
        // containing it.
        let model = CondAdjacency::build(&boundary_tower(table())).unwrap();
        for (&off, &marginal) in model.marginal() {
            let expect: f64 = model
                .patterns()
                .iter()
                .filter(|p| p.offsets.contains(&off))
                .map(|p| p.probability)
                .sum();
            assert!((marginal - expect).abs() < 1e-12);
        }
        assert!((model.marginal()[&1] - 0.17).abs() < 1e-12);
        assert!((model.marginal()[&2] - 0.02).abs() < 1e-12);
    }

    #[test]
    fn classify_counts_thresholds() {
        let model = CondAdjacency::build(&boundary_tower(table())).unwrap();
        // Thresholds: 0.02, 0.17.
        assert_eq!(model.classify(0.01).unwrap().offsets, vec![1, 2]);
        assert_eq!(model.classify(0.10).unwrap().offsets, vec![1]);
        // At or above the final threshold: no propagation.
        assert!(model.classify(0.17).is_none());
        assert!(model.classify(0.99).is_none());
    }

    #[test]
    fn interior_tower_distribution() {
        // Window-2 tower with real neighbors on both sides; nothing trims.
        let mut tower = boundary_tower(vec![
            (vec![-1, 1], 0.10),
            (vec![-2], 0.05),
            (vec![2], 0.05),
        ]);
        tower.adjacency = vec![
            TowerId(8),
            TowerId(9),
            TowerId(10),
            TowerId(11),
            TowerId(12),
        ];
        let model = CondAdjacency::build(&tower).unwrap();

        // Equal-probability patterns tie-break on their offsets.
        let thresholds: Vec<f64> =
            model.patterns().iter().map(|p| p.cumulative).collect();
        assert_eq!(thresholds, vec![0.05, 0.10, 0.20]);
        assert_eq!(model.patterns()[0].offsets, vec![-2]);
        assert_eq!(model.patterns()[1].offsets, vec![2]);
        assert_eq!(model.patterns()[2].offsets, vec![-1, 1]);

        assert!((model.marginal()[&-2] - 0.05).abs() < 1e-12);
        assert!((model.marginal()[&-1] - 0.10).abs() < 1e-12);
        assert!((model.marginal()[&1] - 0.10).abs() < 1e-12);
        assert!((model.marginal()[&2] - 0.05).abs() < 1e-12);

        assert_eq!(model.classify(0.03).unwrap().offsets, vec![-2]);
        assert_eq!(model.classify(0.07).unwrap().offsets, vec![2]);
        assert_eq!(model.classify(0.15).unwrap().offsets, vec![-1, 1]);
        assert!(model.classify(0.97).is_none());

        let pattern = model.classify(0.15).unwrap();
        assert_eq!(
            model.absolute_neighbors(&tower, pattern),
            vec![TowerId(9), TowerId(11)]
        );
    }

    #[test]
    fn self_only_table_is_trivial() {
        let model =
            CondAdjacency::build(&boundary_tower(vec![(vec![0], 0.8)])).unwrap();
        assert!(model.is_trivial());
        assert_eq!(model.total_mass(), 0.0);
        assert!(model.classify(0.0).is_none());
    }

    #[test]
    fn negative_probability_rejected() {
        let err = CondAdjacency::build(&boundary_tower(vec![(vec![1], -0.1)]));
        assert!(matches!(err, Err(CascadeError::NegativeProbability(_))));
    }

    #[test]
    fn mass_above_one_rejected() {
        let err = CondAdjacency::build(&boundary_tower(vec![
            (vec![1], 0.7),
            (vec![2], 0.7),
        ]));
        assert!(matches!(err, Err(CascadeError::MassExceedsOne(_))));
    }

    #[test]
    fn offset_outside_window_rejected() {
        let err = CondAdjacency::build(&boundary_tower(vec![(vec![3], 0.1)]));
        assert!(matches!(
            err,
            Err(CascadeError::OffsetOutOfWindow { offset: 3, window: 2 })
        ));
    }
}

#[cfg(test)]
mod analytic {
    use super::*;
    use sl_core::ProbTable;

    use crate::analytic::pull_probability;
    use crate::model::CondAdjacency;

    #[test]
    fn pull_scales_collapse_column_by_marginal() {
        let tower = boundary_tower(vec![(vec![0, 1], 0.10), (vec![0, 1, 2], 0.02)]);
        let model = CondAdjacency::build(&tower).unwrap();
        // Two timesteps, two states; collapse column is [0.4, 0.2].
        let pc = ProbTable::from_rows(2, 2, vec![0.8, 0.4, 0.5, 0.2]).unwrap();

        let pull = pull_probability(&tower, &model, &pc, 2);
        assert_eq!(pull.len(), 2);

        let to_11 = &pull[&TowerId(11)];
        assert!((to_11[0] - 0.4 * 0.12).abs() < 1e-12);
        assert!((to_11[1] - 0.2 * 0.12).abs() < 1e-12);

        let to_12 = &pull[&TowerId(12)];
        assert!((to_12[0] - 0.4 * 0.02).abs() < 1e-12);
    }

    #[test]
    fn trivial_model_pulls_nothing() {
        let tower = boundary_tower(vec![(vec![0], 1.0)]);
        let model = CondAdjacency::build(&tower).unwrap();
        let pc = ProbTable::from_rows(1, 2, vec![0.9, 0.5]).unwrap();
        assert!(pull_probability(&tower, &model, &pc, 2).is_empty());
    }
}

#[cfg(test)]
mod mc {
    use super::*;
    use sl_core::{DamageScale, DrawMatrix, LineRng, ProbTable, TowerRng};

    use crate::mc::{assign_ranks, simulate_tower};
    use crate::model::CondAdjacency;

    #[test]
    fn rank_is_count_of_satisfied_states() {
        let scale = DamageScale::minor_collapse();
        // t0: minor 0.6, collapse 0.3; t1: minor 0.2, collapse 0.1.
        let pc = ProbTable::from_rows(2, 2, vec![0.6, 0.3, 0.2, 0.1]).unwrap();
        let draws = DrawMatrix::from_raw(
            3,
            2,
            vec![0.05, 0.50, 0.40, 0.15, 0.90, 0.05],
        )
        .unwrap();

        let ranks = assign_ranks(&pc, &draws, &scale);
        assert_eq!(ranks.at(0, 0), 2);
        assert_eq!(ranks.at(0, 1), 0);
        assert_eq!(ranks.at(1, 0), 1);
        assert_eq!(ranks.at(1, 1), 1);
        assert_eq!(ranks.at(2, 0), 0);
        assert_eq!(ranks.at(2, 1), 2);
    }

    #[test]
    fn empirical_collapse_fraction_converges() {
        let scale = DamageScale::minor_collapse();
        let pc = ProbTable::from_rows(1, 2, vec![0.6, 0.3]).unwrap();

        let nsims = 20_000;
        let mut rng = LineRng::new(7);
        let draws = DrawMatrix::uniform(&mut rng, nsims, 1);
        let ranks = assign_ranks(&pc, &draws, &scale);

        let collapsed = ranks.sims_at(0, 2).len() as f64 / nsims as f64;
        let minor = ranks.sims_at(0, 1).len() as f64 / nsims as f64;
        assert!((collapsed - 0.3).abs() < 0.02, "collapse fraction {collapsed}");
        // Exactly-minor mass is 0.6 − 0.3.
        assert!((minor - 0.3).abs() < 0.02, "minor fraction {minor}");
    }

    #[test]
    fn cascade_records_only_collapsed_sims() {
        let tower = boundary_tower(vec![(vec![0, 1], 0.5)]);
        let model = CondAdjacency::build(&tower).unwrap();
        let scale = DamageScale::minor_collapse();
        // t0 never collapses, t1 always does.
        let pc = ProbTable::from_rows(2, 2, vec![0.0, 0.0, 1.0, 1.0]).unwrap();

        let mut line_rng = LineRng::new(42);
        let draws = DrawMatrix::uniform(&mut line_rng, 200, 2);
        let mut rng = TowerRng::new(42, tower.id);

        let outcome = simulate_tower(&tower, &model, &pc, &draws, &scale, &mut rng);
        assert!(outcome.cascade.neighbors_at(0).is_none());

        let at_t1 = outcome.cascade.neighbors_at(1).unwrap();
        let sims = &at_t1[&TowerId(11)];
        // Roughly half of the 200 collapsed sims select the pattern.
        assert!(sims.len() > 60 && sims.len() < 140, "{} sims", sims.len());
        for &sim in sims {
            assert_eq!(outcome.ranks.at(sim as usize, 1), 2);
        }
    }

    #[test]
    fn trivial_model_never_cascades() {
        let tower = boundary_tower(vec![(vec![0], 1.0)]);
        let model = CondAdjacency::build(&tower).unwrap();
        let scale = DamageScale::minor_collapse();
        let pc = ProbTable::from_rows(1, 2, vec![1.0, 1.0]).unwrap();

        let draws = DrawMatrix::from_raw(4, 1, vec![0.1, 0.2, 0.3, 0.4]).unwrap();
        let mut rng = TowerRng::new(1, tower.id);
        let outcome = simulate_tower(&tower, &model, &pc, &draws, &scale, &mut rng);
        assert!(outcome.cascade.is_empty());
    }

    #[test]
    fn identical_seeds_reproduce_bit_identically() {
        let tower = boundary_tower(vec![(vec![0, 1], 0.3), (vec![0, 1, 2], 0.1)]);
        let model = CondAdjacency::build(&tower).unwrap();
        let scale = DamageScale::minor_collapse();
        let pc = ProbTable::from_rows(3, 2, vec![0.9, 0.6, 0.5, 0.3, 0.8, 0.7]).unwrap();

        let run = || {
            let mut line_rng = LineRng::new(9001);
            let draws = DrawMatrix::uniform(&mut line_rng, 500, 3);
            let mut rng = TowerRng::new(9001, tower.id);
            simulate_tower(&tower, &model, &pc, &draws, &scale, &mut rng)
        };
        let a = run();
        let b = run();
        assert_eq!(a.ranks, b.ranks);
        assert_eq!(a.cascade, b.cascade);
    }

    #[test]
    fn cascade_map_iterates_in_order() {
        use crate::mc::CascadeMap;

        let mut map = CascadeMap::new();
        map.record(3, TowerId(5), &[0, 1]);
        map.record(1, TowerId(7), &[2]);
        map.record(1, TowerId(5), &[0]);

        let entries: Vec<_> = map.iter().map(|(t, id, s)| (t, id, s.to_vec())).collect();
        assert_eq!(
            entries,
            vec![
                (1, TowerId(5), vec![0]),
                (1, TowerId(7), vec![2]),
                (3, TowerId(5), vec![0, 1]),
            ]
        );
        assert_eq!(map.timestep_count(), 2);
    }
}
