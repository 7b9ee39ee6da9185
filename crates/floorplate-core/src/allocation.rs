//! Global unit-count allocation by the largest-remainder method.
//!
//! Decides how many units of each type the whole floor gets before any
//! geometry exists. Rounding never concentrates in one type and all
//! tiebreaks are total orderings, so the result is deterministic.

use crate::config::UnitTypeSpec;
use crate::error::CoreError;

/// Per-type counts, indexed parallel to the input unit types.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalAllocation {
    pub counts: Vec<usize>,
    pub total: usize,
}

/// Allocate unit counts for the available frontage.
///
/// `shares` are the normalized mix fractions, `frontage` the total
/// non-utility segment length over both sides.
pub fn allocate(
    unit_types: &[UnitTypeSpec],
    shares: &[f64],
    frontage: f64,
    band_depth: f64,
) -> Result<GlobalAllocation, CoreError> {
    let mean_width: f64 = unit_types
        .iter()
        .zip(shares)
        .map(|(t, share)| share * t.ideal_width(band_depth))
        .sum();
    if mean_width <= 0.0 {
        return Err(CoreError::Degenerate(
            "unit mix has no effective width".into(),
        ));
    }

    let total = (frontage / mean_width).floor() as usize;
    if total == 0 {
        return Err(CoreError::Degenerate(format!(
            "frontage {frontage:.2} m admits no unit at mean width {mean_width:.2} m"
        )));
    }

    let mut counts = Vec::with_capacity(unit_types.len());
    let mut fracs = Vec::with_capacity(unit_types.len());
    let mut assigned = 0usize;
    for share in shares {
        let raw = total as f64 * share;
        let floor = raw.floor() as usize;
        counts.push(floor);
        fracs.push(raw - floor as f64);
        assigned += floor;
    }

    // Hand out the residual by descending fraction, then priority, then key.
    let mut order: Vec<usize> = (0..unit_types.len()).collect();
    order.sort_by(|&a, &b| {
        fracs[b]
            .partial_cmp(&fracs[a])
            .unwrap_or(core::cmp::Ordering::Equal)
            .then(
                unit_types[b]
                    .advanced
                    .placement_priority
                    .cmp(&unit_types[a].advanced.placement_priority),
            )
            .then(unit_types[a].key.cmp(&unit_types[b].key))
    });
    for &i in order.iter().take(total - assigned) {
        counts[i] += 1;
    }

    log::info!(
        "allocated {} units across {} types for {:.1} m frontage",
        total,
        unit_types.len(),
        frontage,
    );
    Ok(GlobalAllocation { counts, total })
}
