//! Strategy descriptors.
//!
//! The three output variants share the whole pipeline; a strategy only
//! changes how the distributor scores candidate types, how units are ordered
//! within a segment, and how hard the alignment pass snaps walls.

use serde::{Deserialize, Serialize};

use crate::config::UnitTypeSpec;

/// Which variant a layout was generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyKind {
    /// Trade off mix fidelity against placement priority.
    Balanced,
    /// Chase the target mix as closely as possible.
    MixOptimized,
    /// Prefer wide units to cut wall count and raise NRSF.
    EfficiencyOptimized,
}

/// How unit widths are ordered along a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderingPattern {
    /// Widest first from the left.
    Descending,
    /// Narrowest first from the left.
    Ascending,
    /// Widest at both edges, narrowest in the middle.
    Valley,
    /// Wide and narrow interleaved.
    Alternating,
}

impl StrategyKind {
    /// All variants in their canonical run order.
    pub fn all() -> [StrategyKind; 3] {
        [
            StrategyKind::Balanced,
            StrategyKind::MixOptimized,
            StrategyKind::EfficiencyOptimized,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            StrategyKind::Balanced => "Balanced",
            StrategyKind::MixOptimized => "Mix-Optimized",
            StrategyKind::EfficiencyOptimized => "Efficiency-Optimized",
        }
    }

    pub fn pattern(self) -> OrderingPattern {
        match self {
            StrategyKind::Balanced => OrderingPattern::Valley,
            StrategyKind::MixOptimized => OrderingPattern::Descending,
            StrategyKind::EfficiencyOptimized => OrderingPattern::Descending,
        }
    }

    /// Alignment strictness actually applied for this variant.
    pub fn effective_strictness(self, configured: f64) -> f64 {
        let configured = configured.clamp(0.0, 1.0);
        match self {
            StrategyKind::Balanced => configured,
            // Looser snapping keeps unit widths closer to ideal.
            StrategyKind::MixOptimized => configured * 0.8,
            // Full snapping maximizes shared demising walls.
            StrategyKind::EfficiencyOptimized => 1.0,
        }
    }

    /// Score a candidate type for the next slot in a segment.
    ///
    /// `deviation` is the type's current share minus its target share, over
    /// the units placed so far. Higher score wins.
    pub fn score(self, spec: &UnitTypeSpec, ideal_width: f64, deviation: f64) -> f64 {
        match self {
            StrategyKind::Balanced => {
                spec.advanced.placement_priority as f64 * (1.0 - deviation.abs())
            }
            StrategyKind::MixOptimized => -deviation.abs(),
            StrategyKind::EfficiencyOptimized => ideal_width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::standard_mix;

    #[test]
    fn run_order_is_stable() {
        assert_eq!(
            StrategyKind::all(),
            [
                StrategyKind::Balanced,
                StrategyKind::MixOptimized,
                StrategyKind::EfficiencyOptimized,
            ]
        );
    }

    #[test]
    fn mix_strategy_prefers_most_underplaced() {
        let types = standard_mix();
        // one_bed further under target than studio
        let s = StrategyKind::MixOptimized;
        let score_studio = s.score(&types[0], 6.0, -0.05);
        let score_one_bed = s.score(&types[1], 9.0, -0.30);
        assert!(score_studio > score_one_bed);
    }

    #[test]
    fn efficiency_strategy_prefers_wider() {
        let types = standard_mix();
        let s = StrategyKind::EfficiencyOptimized;
        assert!(s.score(&types[3], 15.0, 0.0) > s.score(&types[0], 6.0, 0.0));
    }

    #[test]
    fn strictness_adjustments() {
        assert_eq!(StrategyKind::Balanced.effective_strictness(0.5), 0.5);
        assert!((StrategyKind::MixOptimized.effective_strictness(0.5) - 0.4).abs() < 1e-12);
        assert_eq!(StrategyKind::EfficiencyOptimized.effective_strictness(0.2), 1.0);
    }
}
