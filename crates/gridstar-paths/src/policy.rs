//! Heuristics, step costs and the tie-break policy.

use gridstar_core::{Coord, Dims};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

use crate::distance::{chebyshev, manhattan};
use crate::error::ConfigError;
use crate::neighbors::{Move, Topology};

/// Path cost unit. The default step costs are 10 (orthogonal) and 14
/// (diagonal, √2 scaled by 10 and rounded).
pub type Cost = u32;

/// Sentinel meaning "no known cost".
pub const UNREACHABLE: Cost = Cost::MAX;

/// Default tie-break bias applied to the heuristic term of `f`.
pub const DEFAULT_BIAS: f64 = 1.001;

/// Largest accepted [`SearchConfig::jitter`].
pub const MAX_JITTER: f64 = 0.01;

// ---------------------------------------------------------------------------
// StepCosts
// ---------------------------------------------------------------------------

/// Cost of a single orthogonal or diagonal step.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepCosts {
    pub orthogonal: Cost,
    pub diagonal: Cost,
}

impl Default for StepCosts {
    fn default() -> Self {
        Self {
            orthogonal: 10,
            diagonal: 14,
        }
    }
}

impl StepCosts {
    /// Create a cost table.
    pub const fn new(orthogonal: Cost, diagonal: Cost) -> Self {
        Self {
            orthogonal,
            diagonal,
        }
    }

    /// Cost of one step of kind `mv`.
    #[inline]
    pub fn cost(self, mv: Move) -> Cost {
        match mv {
            Move::Orthogonal => self.orthogonal,
            Move::Diagonal => self.diagonal,
        }
    }

    /// Smallest non-zero difference between two path costs under
    /// `topology`: the gcd of the step costs in use.
    pub fn resolution(self, topology: Topology) -> Cost {
        match topology {
            Topology::FourWay => self.orthogonal,
            Topology::EightWay => gcd(self.orthogonal, self.diagonal),
        }
    }

    fn validate(self) -> Result<(), ConfigError> {
        if self.orthogonal == 0 || self.diagonal == 0 {
            return Err(ConfigError::ZeroStepCost);
        }
        if self.diagonal < self.orthogonal {
            return Err(ConfigError::DiagonalBelowOrthogonal {
                orthogonal: self.orthogonal,
                diagonal: self.diagonal,
            });
        }
        Ok(())
    }

    /// Most expensive single step.
    #[inline]
    pub fn max_step(self) -> Cost {
        self.orthogonal.max(self.diagonal)
    }
}

fn gcd(mut a: Cost, mut b: Cost) -> Cost {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

// ---------------------------------------------------------------------------
// Heuristic
// ---------------------------------------------------------------------------

/// Distance estimator used to order the open set.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Heuristic {
    /// `orthogonal × (|Δrow| + |Δcol|)`. Exact on an open 4-way grid.
    #[default]
    Manhattan,
    /// `orthogonal × max(|Δrow|, |Δcol|)`. Admissible on 8-way grids.
    Chebyshev,
    /// `orthogonal × max + (diagonal − orthogonal) × min`. Exact on an open
    /// 8-way grid.
    Octile,
    /// Always 0: the search degenerates into Dijkstra.
    Zero,
}

impl Heuristic {
    /// The usual estimator for `topology`.
    pub fn for_topology(topology: Topology) -> Self {
        match topology {
            Topology::FourWay => Self::Manhattan,
            Topology::EightWay => Self::Chebyshev,
        }
    }

    /// Estimated cost from `from` to `to`, saturating at [`Cost::MAX`].
    #[inline]
    pub fn estimate(self, from: Coord, to: Coord, costs: StepCosts) -> Cost {
        match self {
            Self::Manhattan => costs.orthogonal.saturating_mul(manhattan(from, to) as Cost),
            Self::Chebyshev => costs.orthogonal.saturating_mul(chebyshev(from, to) as Cost),
            Self::Octile => {
                let (dr, dc) = from.delta(to);
                let (hi, lo) = (dr.max(dc) as Cost, dr.min(dc) as Cost);
                let extra = costs.diagonal.saturating_sub(costs.orthogonal);
                costs
                    .orthogonal
                    .saturating_mul(hi)
                    .saturating_add(extra.saturating_mul(lo))
            }
            Self::Zero => 0,
        }
    }

    /// Whether the estimate never exceeds the true cost under `topology`
    /// (assuming `diagonal ≥ orthogonal`).
    pub fn is_admissible_for(self, topology: Topology) -> bool {
        match self {
            Self::Manhattan => topology == Topology::FourWay,
            Self::Chebyshev | Self::Octile | Self::Zero => true,
        }
    }
}

// ---------------------------------------------------------------------------
// SearchConfig
// ---------------------------------------------------------------------------

/// Parameters of a single search.
///
/// `f = g + h × bias`. A `jitter` above zero adds a seeded random
/// perturbation of at most `jitter` (capped at [`MAX_JITTER`]) to the bias on
/// every edge relaxation; the resulting weight never drops below 1. With
/// `jitter = 0` the search is fully deterministic.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchConfig {
    pub topology: Topology,
    pub heuristic: Heuristic,
    pub costs: StepCosts,
    pub bias: f64,
    pub jitter: f64,
    pub seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::four_way()
    }
}

impl SearchConfig {
    /// 4-way movement with the Manhattan heuristic.
    pub fn four_way() -> Self {
        Self {
            topology: Topology::FourWay,
            heuristic: Heuristic::Manhattan,
            costs: StepCosts::default(),
            bias: DEFAULT_BIAS,
            jitter: 0.0,
            seed: 0,
        }
    }

    /// 8-way movement with the Chebyshev heuristic.
    pub fn eight_way() -> Self {
        Self {
            topology: Topology::EightWay,
            heuristic: Heuristic::Chebyshev,
            ..Self::four_way()
        }
    }

    /// Set the topology (builder).
    pub fn with_topology(mut self, topology: Topology) -> Self {
        self.topology = topology;
        self
    }

    /// Set the heuristic (builder).
    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    /// Set the step costs (builder).
    pub fn with_costs(mut self, costs: StepCosts) -> Self {
        self.costs = costs;
        self
    }

    /// Set the tie-break bias (builder).
    pub fn with_bias(mut self, bias: f64) -> Self {
        self.bias = bias;
        self
    }

    /// Enable the randomized tie-break with the given magnitude and seed
    /// (builder). A `jitter` of 0 disables it.
    pub fn with_jitter(mut self, jitter: f64, seed: u64) -> Self {
        self.jitter = jitter;
        self.seed = seed;
        self
    }

    /// Check the parameters for values that make the search meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.bias.is_finite() || self.bias < 1.0 {
            return Err(ConfigError::Bias(self.bias));
        }
        if !self.jitter.is_finite() || !(0.0..=MAX_JITTER).contains(&self.jitter) {
            return Err(ConfigError::Jitter(self.jitter));
        }
        self.costs.validate()
    }

    /// [`validate`](Self::validate), plus a check that no simple path on a
    /// grid of `dims` can overflow [`Cost`].
    pub fn validate_for(&self, dims: Dims) -> Result<(), ConfigError> {
        self.validate()?;
        let steps = dims.len() - 1;
        let max_step = self.costs.max_step();
        let fits = Cost::try_from(steps)
            .ok()
            .and_then(|n| max_step.checked_mul(n))
            .is_some_and(|worst| worst < UNREACHABLE);
        if !fits {
            return Err(ConfigError::CostOverflow { max_step, dims });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TieBreak
// ---------------------------------------------------------------------------

/// Source of the heuristic weight used for each relaxation.
pub(crate) struct TieBreak {
    bias: f64,
    jitter: Option<Jitter>,
}

struct Jitter {
    rng: StdRng,
    amount: f64,
    // Per-search preference, +1 or -1.
    sign: f64,
}

impl TieBreak {
    pub(crate) fn new(config: &SearchConfig) -> Self {
        let jitter = (config.jitter > 0.0).then(|| {
            let mut rng = StdRng::seed_from_u64(config.seed);
            let sign = if rng.random::<bool>() { 1.0 } else { -1.0 };
            Jitter {
                rng,
                amount: config.jitter,
                sign,
            }
        });
        Self {
            bias: config.bias,
            jitter,
        }
    }

    /// The unperturbed bias.
    #[inline]
    pub(crate) fn bias(&self) -> f64 {
        self.bias
    }

    /// Weight for the next relaxation.
    #[inline]
    pub(crate) fn weight(&mut self) -> f64 {
        match &mut self.jitter {
            None => self.bias,
            Some(j) => (self.bias + j.sign * j.amount * j.rng.random::<f64>()).max(1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristics_scale_with_costs() {
        let a = Coord::new(0, 0);
        let b = Coord::new(3, 5);
        let c = StepCosts::default();
        assert_eq!(Heuristic::Manhattan.estimate(a, b, c), 80);
        assert_eq!(Heuristic::Chebyshev.estimate(a, b, c), 50);
        assert_eq!(Heuristic::Octile.estimate(a, b, c), 50 + 4 * 3);
        assert_eq!(Heuristic::Zero.estimate(a, b, c), 0);
        assert_eq!(Heuristic::Manhattan.estimate(b, b, c), 0);
    }

    #[test]
    fn resolution_is_gcd_of_costs_in_use() {
        let c = StepCosts::default();
        assert_eq!(c.resolution(Topology::FourWay), 10);
        assert_eq!(c.resolution(Topology::EightWay), 2);
        assert_eq!(StepCosts::new(3, 5).resolution(Topology::EightWay), 1);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let cfg = SearchConfig::four_way();
        assert!(cfg.validate().is_ok());
        assert_eq!(
            cfg.with_bias(0.9).validate(),
            Err(ConfigError::Bias(0.9))
        );
        assert!(cfg.with_bias(f64::NAN).validate().is_err());
        assert_eq!(
            cfg.with_jitter(-0.1, 0).validate(),
            Err(ConfigError::Jitter(-0.1))
        );
        assert_eq!(
            cfg.with_costs(StepCosts::new(0, 14)).validate(),
            Err(ConfigError::ZeroStepCost)
        );
        assert_eq!(
            cfg.with_costs(StepCosts::new(10, 7)).validate(),
            Err(ConfigError::DiagonalBelowOrthogonal {
                orthogonal: 10,
                diagonal: 7
            })
        );
    }

    #[test]
    fn jitter_is_capped() {
        let cfg = SearchConfig::eight_way();
        assert!(cfg.with_jitter(MAX_JITTER, 1).validate().is_ok());
        assert_eq!(
            cfg.with_jitter(5.0, 1).validate(),
            Err(ConfigError::Jitter(5.0))
        );
        assert!(cfg.with_jitter(f64::INFINITY, 1).validate().is_err());
    }

    #[test]
    fn validate_for_checks_worst_case_path_cost() {
        let cfg = SearchConfig::four_way().with_costs(StepCosts::new(1 << 28, 1 << 28));
        let small = Dims::new(3, 5).unwrap();
        let large = Dims::new(5, 5).unwrap();
        assert!(cfg.validate_for(small).is_ok());
        assert_eq!(
            cfg.validate_for(large),
            Err(ConfigError::CostOverflow {
                max_step: 1 << 28,
                dims: large
            })
        );
        // Plain validation problems are still reported first.
        assert_eq!(
            cfg.with_bias(0.5).validate_for(small),
            Err(ConfigError::Bias(0.5))
        );
    }

    #[test]
    fn estimates_saturate() {
        let costs = StepCosts::new(Cost::MAX / 2, Cost::MAX);
        let a = Coord::new(0, 0);
        let b = Coord::new(4, 7);
        for h in [Heuristic::Manhattan, Heuristic::Chebyshev, Heuristic::Octile] {
            assert_eq!(h.estimate(a, b, costs), Cost::MAX);
        }
    }

    #[test]
    fn admissibility_table() {
        assert!(Heuristic::Manhattan.is_admissible_for(Topology::FourWay));
        assert!(!Heuristic::Manhattan.is_admissible_for(Topology::EightWay));
        assert!(Heuristic::Chebyshev.is_admissible_for(Topology::EightWay));
        assert!(Heuristic::Octile.is_admissible_for(Topology::EightWay));
    }

    #[test]
    fn tie_break_without_jitter_is_constant() {
        let mut tb = TieBreak::new(&SearchConfig::four_way());
        for _ in 0..10 {
            assert_eq!(tb.weight(), DEFAULT_BIAS);
        }
    }

    #[test]
    fn tie_break_jitter_is_bounded_and_seeded() {
        let cfg = SearchConfig::eight_way().with_jitter(0.001, 7);
        let mut a = TieBreak::new(&cfg);
        let mut b = TieBreak::new(&cfg);
        for _ in 0..100 {
            let w = a.weight();
            assert_eq!(w, b.weight());
            assert!((w - DEFAULT_BIAS).abs() < 0.001);
        }
    }

    #[test]
    fn tie_break_weight_never_drops_below_one() {
        for seed in 0..32 {
            let cfg = SearchConfig::four_way()
                .with_bias(1.0)
                .with_jitter(MAX_JITTER, seed);
            let mut tb = TieBreak::new(&cfg);
            for _ in 0..50 {
                let w = tb.weight();
                assert!((1.0..1.0 + MAX_JITTER).contains(&w), "weight {w}");
            }
        }
    }

    #[test]
    fn config_builders() {
        let cfg = SearchConfig::eight_way().with_bias(1.0);
        assert_eq!(cfg.topology, Topology::EightWay);
        assert_eq!(cfg.heuristic, Heuristic::Chebyshev);
        assert_eq!(cfg.bias, 1.0);
        assert_eq!(SearchConfig::default(), SearchConfig::four_way());
        assert_eq!(
            Heuristic::for_topology(Topology::EightWay),
            Heuristic::Chebyshev
        );
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn config_round_trip() {
        let cfg = SearchConfig::eight_way().with_jitter(0.001, 99);
        let json = serde_json::to_string(&cfg).unwrap();
        let back: SearchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let back: SearchConfig = serde_json::from_str(r#"{"topology":"EightWay"}"#).unwrap();
        assert_eq!(back.topology, Topology::EightWay);
        assert_eq!(back.bias, DEFAULT_BIAS);
        assert_eq!(back.costs, StepCosts::default());
    }
}
