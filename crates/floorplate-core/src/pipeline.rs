//! Pipeline driver.
//!
//! Strictly left-to-right: each phase consumes the prior phase's output.
//!   1. validate_input      -- refuse unusable configuration
//!   2. analyze             -- local-frame usable interior
//!   3. build_corridor      -- central corridor + rentable bands
//!   4. place_cores         -- egress-driven core positions
//!   5. build_segments      -- spans between obstacles
//!   6. allocate            -- global largest-remainder unit counts
//! then per strategy variant:
//!   7. distribute / synthesize / align / egress / stats
//!
//! Footprint, corridor, cores, segments, and allocation are shared across
//! variants; everything downstream is strategy-specific.

use serde::{Deserialize, Serialize};

use crate::alignment::align_walls;
use crate::allocation::allocate;
use crate::config::{normalized_shares, validate_input, GenerateInput};
use crate::cores::{place_cores, CoreBlock};
use crate::corridor::{build_corridor, CorridorBlock};
use crate::egress::{validate_egress, EgressReport};
use crate::error::CoreError;
use crate::footprint::analyze;
use crate::geometry::HostTransform;
use crate::metrics::{compute_stats, LayoutStats};
use crate::segments::{build_segments, Segment};
use crate::strategy::StrategyKind;
use crate::synthesis::{synthesize, UnitBlock, UtilitySpace};

/// Mix deviation beyond this fraction is reported as a warning.
const MIX_DEVIATION_WARNING: f64 = 0.05;

/// One complete generated layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutOption {
    pub strategy: StrategyKind,
    pub building_length: f64,
    pub building_depth: f64,
    pub floor_elevation: f64,
    pub corridor: CorridorBlock,
    pub cores: Vec<CoreBlock>,
    pub units: Vec<UnitBlock>,
    pub utilities: Vec<UtilitySpace>,
    pub stats: LayoutStats,
    pub egress: EgressReport,
    /// Places the local frame into the host world.
    pub transform: HostTransform,
    pub warnings: Vec<String>,
}

/// Generate up to three layout variants for the input.
///
/// Deterministic: identical input produces identical output. Fatal input or
/// feasibility problems return an error; degraded outcomes surface as
/// warnings on the affected option.
pub fn generate(input: &GenerateInput) -> Result<Vec<LayoutOption>, CoreError> {
    let base_warnings = validate_input(input)?;

    let analysis = analyze(
        &input.footprint,
        &input.corridor,
        &input.cores,
        &input.unit_types,
    )?;
    let (corridor, bands) = build_corridor(&analysis, &input.corridor);
    let cores = place_cores(&analysis, &input.corridor, &input.cores, &input.egress)?;
    let segments = build_segments(&analysis, &bands, &cores, &input.unit_types);

    let frontage: f64 = segments
        .iter()
        .filter(|s| !s.utility)
        .map(Segment::length)
        .sum();
    let shares = normalized_shares(&input.unit_types);
    let allocation = allocate(&input.unit_types, &shares, frontage, analysis.band_depth)?;
    log::info!(
        "{:.1} m frontage over {} segments, {} units to place",
        frontage,
        segments.len(),
        allocation.total,
    );

    let kinds: Vec<StrategyKind> = if input.strategies.is_empty() {
        StrategyKind::all().to_vec()
    } else {
        input.strategies.clone()
    };

    let mut options = Vec::with_capacity(kinds.len());
    for strategy in kinds {
        let fills = crate::distribution::distribute(
            &segments,
            &input.unit_types,
            &shares,
            &allocation.counts,
            analysis.band_depth,
            input.cores.side,
            strategy,
        );

        let mut variant_corridor = corridor;
        let synthesis = synthesize(
            &analysis,
            &segments,
            &fills,
            &input.unit_types,
            &cores,
            &mut variant_corridor,
            strategy.pattern(),
        );
        let mut units = synthesis.units;

        let alignment = align_walls(
            &mut units,
            &input.unit_types,
            input.cores.side,
            strategy.effective_strictness(input.alignment_strictness),
        );

        let stats = compute_stats(&analysis, &units, &input.unit_types, &shares);
        let egress = validate_egress(&units, &cores, &variant_corridor, &input.egress);

        let mut warnings = base_warnings.clone();
        warnings.extend(synthesis.warnings);
        if alignment.walls_denied > 0 {
            warnings.push(format!(
                "alignment partially denied: {} of {} walls could not move",
                alignment.walls_denied, alignment.walls_considered
            ));
        }
        for entry in &stats.mix {
            if entry.deviation.abs() > MIX_DEVIATION_WARNING {
                warnings.push(format!(
                    "mix for '{}' off target by {:+.1} points",
                    entry.key,
                    entry.deviation * 100.0
                ));
            }
        }
        for (name, metric) in [
            ("travel distance", egress.travel_distance),
            ("dead end", egress.dead_end),
            ("common path", egress.common_path),
        ] {
            if !metric.pass {
                warnings.push(format!(
                    "egress {name} {:.1} m exceeds limit {:.1} m",
                    metric.measured, metric.limit
                ));
            }
        }

        log::info!(
            "{}: {} units, efficiency {:.3}, egress {}",
            strategy.label(),
            stats.total_units,
            stats.efficiency,
            if egress.all_pass() { "pass" } else { "FAIL" },
        );

        options.push(LayoutOption {
            strategy,
            building_length: analysis.length,
            building_depth: analysis.depth,
            floor_elevation: input.footprint.floor_z,
            corridor: variant_corridor,
            cores: cores.clone(),
            units,
            utilities: synthesis.utilities,
            stats,
            egress,
            transform: analysis.transform,
            warnings,
        });
    }

    Ok(options)
}
