//! Tower and line topology.
//!
//! A `Line` is an ordered sequence of `Tower`s sharing one design/terrain
//! specification; tower order defines the relative adjacency offsets used by
//! the cascade model.  Nothing here knows about global geometry — matching
//! towers to map features happens upstream.

use sl_core::{LineId, TowerId};

use crate::{CascadeError, CascadeResult};

// ── Collapse capacity ─────────────────────────────────────────────────────────

/// Circuit configuration, which sets the span-utilisation factor `k`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CircuitKind {
    Single,
    Double,
}

impl CircuitKind {
    #[inline]
    fn k_factor(self) -> f64 {
        match self {
            CircuitKind::Single => 0.33,
            CircuitKind::Double => 0.5,
        }
    }
}

/// Adjusted collapse wind speed for a tower:
///
///   Vc = Vd / sqrt(u),  u = min(1, 1 − k(1 − Sw/Sd))
///
/// where `Sw` is the actual wind span, `Sd` the design span of the line, and
/// `k` the circuit factor.  `u` caps at 1 when the actual span exceeds the
/// design span.
pub fn collapse_capacity(
    design_speed: f64,
    actual_span: f64,
    design_span: f64,
    circuits: CircuitKind,
) -> f64 {
    let u = (1.0 - circuits.k_factor() * (1.0 - actual_span / design_span)).min(1.0);
    design_speed / u.sqrt()
}

// ── Topographic adjustment ────────────────────────────────────────────────────

/// Optional design-speed adjustment by topographic multiplier.
///
/// The applicable factor is `factors[n]` where `n` is the count of thresholds
/// the tower's topographic multiplier reaches; `factors` therefore has one
/// more entry than `thresholds` (index 0 = flat terrain, no adjustment).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TopoAdjustment {
    pub thresholds: Vec<f64>,
    pub factors:    Vec<f64>,
}

impl TopoAdjustment {
    pub fn factor_for(&self, topo_multiplier: f64) -> f64 {
        let n = self
            .thresholds
            .iter()
            .filter(|&&th| topo_multiplier >= th)
            .count();
        self.factors[n.min(self.factors.len() - 1)]
    }

    /// Design speed after topographic adjustment.
    pub fn adjust(&self, design_speed: f64, topo_multiplier: f64) -> f64 {
        design_speed * self.factor_for(topo_multiplier)
    }
}

// ── Tower ─────────────────────────────────────────────────────────────────────

/// Static description of one tower — identity, structural attributes, wind
/// design figures, and the adjacency structures the cascade model consumes.
#[derive(Clone, Debug)]
pub struct Tower {
    pub id: TowerId,
    pub name: String,
    /// Index along the line (ascending line order).
    pub position: usize,

    /// Structural type, e.g. "Lattice Tower" or "Steel Pole".
    pub ttype: String,
    /// Function, e.g. "suspension", "terminal", "strainer".
    pub funct: String,

    /// Azimuth of the strong axis relative to North, degrees.
    pub strong_axis_deg: f64,
    /// Deviation angle, degrees — selects the fragility bracket.
    pub dev_angle_deg: f64,
    pub height_m: f64,
    /// Conductor drag height used for terrain height correction.
    pub drag_height_m: f64,
    /// Terrain category label of the line route ("tc1".."tc4").
    pub terrain_category: String,

    /// Design wind speed (after any topographic adjustment).
    pub design_speed: f64,
    /// Adjusted collapse-capacity speed (see [`collapse_capacity`]).
    pub collapse_capacity: f64,

    /// Max neighbors considered per side for cascading propagation.
    pub window: usize,
    /// Absolute tower IDs at relative offsets `−window..=window`
    /// (`2·window + 1` slots, self at the center, `TowerId::INVALID` at
    /// line-boundary slots).
    pub adjacency: Vec<TowerId>,
    /// Raw conditional-collapse table: pattern of relative offsets that
    /// collapse together → probability.
    pub cond_table: Vec<(Vec<i32>, f64)>,
}

impl Tower {
    /// Check the adjacency-window invariants.
    ///
    /// The list must hold exactly `2·window + 1` slots and the center slot
    /// must be the tower itself.  Sentinels may only appear in contiguous
    /// runs at the two ends (a gap inside a line is not representable).
    pub fn validate(&self) -> CascadeResult<()> {
        let expect = 2 * self.window + 1;
        if self.adjacency.len() != expect {
            return Err(CascadeError::MalformedAdjacency(format!(
                "tower {}: adjacency has {} slots, expected {expect}",
                self.id,
                self.adjacency.len()
            )));
        }
        if self.adjacency[self.window] != self.id {
            return Err(CascadeError::MalformedAdjacency(format!(
                "tower {}: center slot holds {}",
                self.id, self.adjacency[self.window]
            )));
        }
        let valid_run = |range: &mut dyn Iterator<Item = usize>| {
            let mut seen_sentinel = false;
            for slot in range {
                if self.adjacency[slot] == TowerId::INVALID {
                    seen_sentinel = true;
                } else if seen_sentinel {
                    return false;
                }
            }
            true
        };
        // Walk outward from the center on each side.
        if !valid_run(&mut (0..self.window).rev()) || !valid_run(&mut (self.window + 1..expect)) {
            return Err(CascadeError::MalformedAdjacency(format!(
                "tower {}: sentinel inside the adjacency window",
                self.id
            )));
        }
        Ok(())
    }

    /// Absolute tower at a relative offset, `None` for sentinel slots or
    /// offsets outside the window.
    pub fn neighbor(&self, offset: i32) -> Option<TowerId> {
        let slot = offset + self.window as i32;
        if slot < 0 || slot as usize >= self.adjacency.len() {
            return None;
        }
        match self.adjacency[slot as usize] {
            TowerId::INVALID => None,
            id => Some(id),
        }
    }
}

// ── Line ──────────────────────────────────────────────────────────────────────

/// An ordered run of towers sharing one design/terrain specification.
#[derive(Clone, Debug)]
pub struct Line {
    pub id: LineId,
    pub name: String,
    pub towers: Vec<Tower>,
}

impl Line {
    /// Validate every tower and the position ordering.
    pub fn validate(&self) -> CascadeResult<()> {
        for (i, tower) in self.towers.iter().enumerate() {
            if tower.position != i {
                return Err(CascadeError::MalformedAdjacency(format!(
                    "line {}: tower {} at index {i} claims position {}",
                    self.name, tower.id, tower.position
                )));
            }
            tower.validate()?;
        }
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.towers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.towers.is_empty()
    }

    /// Tower IDs in line order.
    pub fn tower_ids(&self) -> impl Iterator<Item = TowerId> + '_ {
        self.towers.iter().map(|t| t.id)
    }
}
