//! Layout statistics: gross/net areas, efficiency, and mix accounting.

use serde::{Deserialize, Serialize};

use crate::config::UnitTypeSpec;
use crate::footprint::FootprintAnalysis;
use crate::synthesis::UnitBlock;

/// Per-type mix accounting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixEntry {
    pub key: String,
    pub count: usize,
    /// Achieved share of the unit count, 0–1.
    pub actual: f64,
    /// Target share, 0–1.
    pub target: f64,
    /// actual − target.
    pub deviation: f64,
}

/// Aggregate numbers for one layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutStats {
    /// Gross floor area, L·D.
    pub gross_area: f64,
    /// Net rentable area: unit area only, utility space excluded.
    pub net_rentable_area: f64,
    pub efficiency: f64,
    pub total_units: usize,
    pub mix: Vec<MixEntry>,
}

/// Compute stats for a synthesized unit set. `shares` are the normalized
/// target fractions, parallel to `unit_types`.
pub fn compute_stats(
    analysis: &FootprintAnalysis,
    units: &[UnitBlock],
    unit_types: &[UnitTypeSpec],
    shares: &[f64],
) -> LayoutStats {
    let gross_area = analysis.length * analysis.depth;
    let net_rentable_area: f64 = units.iter().map(|u| u.area).sum();
    let total_units = units.len();

    let mix = unit_types
        .iter()
        .zip(shares)
        .map(|(spec, &target)| {
            let count = units.iter().filter(|u| u.type_key == spec.key).count();
            let actual = if total_units == 0 {
                0.0
            } else {
                count as f64 / total_units as f64
            };
            MixEntry {
                key: spec.key.clone(),
                count,
                actual,
                target,
                deviation: actual - target,
            }
        })
        .collect();

    LayoutStats {
        gross_area,
        net_rentable_area,
        efficiency: if gross_area > 0.0 {
            net_rentable_area / gross_area
        } else {
            0.0
        },
        total_units,
        mix,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{standard_mix, CoreConfig, CorridorConfig, Footprint, Side};
    use crate::footprint::analyze;
    use crate::geometry::{Rect, Region};
    use crate::synthesis::PlacementKind;

    fn analysis() -> FootprintAnalysis {
        analyze(
            &Footprint {
                length: 91.44,
                depth: 19.81,
                center_x: 0.0,
                center_y: 0.0,
                rotation: 0.0,
                floor_z: 0.0,
            },
            &CorridorConfig::default(),
            &CoreConfig::default(),
            &standard_mix(),
        )
        .unwrap()
    }

    fn unit(key: &str, width: f64) -> UnitBlock {
        let rect = Rect::new(0.0, 0.76, width, 9.145);
        UnitBlock {
            type_key: key.into(),
            region: Region::Rect(rect),
            area: rect.area(),
            side: Side::North,
            placement: PlacementKind::Standard,
        }
    }

    #[test]
    fn gross_and_net_areas() {
        let types = standard_mix();
        let shares = crate::config::normalized_shares(&types);
        let units = vec![unit("studio", 6.0), unit("one_bed", 9.0)];
        let stats = compute_stats(&analysis(), &units, &types, &shares);
        assert!((stats.gross_area - 91.44 * 19.81).abs() < 1e-9);
        assert!((stats.net_rentable_area - (6.0 + 9.0) * 9.145).abs() < 1e-9);
        assert!((stats.efficiency - stats.net_rentable_area / stats.gross_area).abs() < 1e-12);
    }

    #[test]
    fn mix_counts_and_deviation() {
        let types = standard_mix();
        let shares = crate::config::normalized_shares(&types);
        let units = vec![
            unit("studio", 6.0),
            unit("one_bed", 9.0),
            unit("one_bed", 9.0),
            unit("two_bed", 12.0),
        ];
        let stats = compute_stats(&analysis(), &units, &types, &shares);
        assert_eq!(stats.total_units, 4);
        let one_bed = stats.mix.iter().find(|m| m.key == "one_bed").unwrap();
        assert_eq!(one_bed.count, 2);
        assert!((one_bed.actual - 0.5).abs() < 1e-12);
        assert!((one_bed.deviation - (0.5 - 0.4)).abs() < 1e-12);
    }

    #[test]
    fn empty_layout_yields_zeroes() {
        let types = standard_mix();
        let shares = crate::config::normalized_shares(&types);
        let stats = compute_stats(&analysis(), &[], &types, &shares);
        assert_eq!(stats.total_units, 0);
        assert_eq!(stats.net_rentable_area, 0.0);
        assert!(stats.mix.iter().all(|m| m.count == 0 && m.actual == 0.0));
    }
}
