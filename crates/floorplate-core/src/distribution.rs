//! Distribution of the global unit counts into segments.
//!
//! Two passes: a capacity-aware fill that respects each type's width
//! tolerance, then an overflow pass that force-places whatever the first
//! pass could not fit, preferring slack-rich segments that are not already
//! dense in rigid types.

use crate::config::{Side, UnitTypeSpec};
use crate::segments::Segment;
use crate::strategy::StrategyKind;

/// Penalty (meters of slack) per reciprocal-tolerance point when ranking
/// overflow targets.
const DENIAL_PENALTY: f64 = 0.1;

/// Unit-type indices assigned to one segment, in placement order.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentFill {
    pub unit_type_indices: Vec<usize>,
}

/// Assign the allocated counts to segments. Returns one fill per segment,
/// parallel to `segments` (utility segments stay empty).
pub fn distribute(
    segments: &[Segment],
    unit_types: &[UnitTypeSpec],
    shares: &[f64],
    counts: &[usize],
    band_depth: f64,
    core_side: Side,
    strategy: StrategyKind,
) -> Vec<SegmentFill> {
    let ideals: Vec<f64> = unit_types.iter().map(|t| t.ideal_width(band_depth)).collect();
    let mut remaining: Vec<usize> = counts.to_vec();
    let mut placed: Vec<usize> = vec![0; unit_types.len()];
    let mut placed_total = 0usize;
    let mut fills: Vec<SegmentFill> = segments
        .iter()
        .map(|_| SegmentFill {
            unit_type_indices: Vec::new(),
        })
        .collect();

    // ── Pass 1: capacity-aware fill, premium segments first ─────────────
    let mut order: Vec<usize> = (0..segments.len()).filter(|&i| !segments[i].utility).collect();
    order.sort_by(|&a, &b| {
        let sa = &segments[a];
        let sb = &segments[b];
        sa.priority_class()
            .cmp(&sb.priority_class())
            .then((sa.side != core_side).cmp(&(sb.side != core_side)))
            .then(
                sa.start_x
                    .partial_cmp(&sb.start_x)
                    .unwrap_or(core::cmp::Ordering::Equal),
            )
    });

    for &si in &order {
        let mut remaining_len = segments[si].length();
        while let Some(ti) = pick_best_unit(
            unit_types,
            &ideals,
            &remaining,
            &placed,
            placed_total,
            shares,
            remaining_len,
            strategy,
        ) {
            fills[si].unit_type_indices.push(ti);
            remaining_len -= ideals[ti];
            remaining[ti] -= 1;
            placed[ti] += 1;
            placed_total += 1;
        }
    }

    // ── Pass 2: overflow, most slack first ──────────────────────────────
    let leftover: usize = remaining.iter().sum();
    if leftover > 0 {
        log::warn!("{leftover} units did not fit in pass 1; force-placing");
    }
    let mut type_order: Vec<usize> = (0..unit_types.len()).collect();
    type_order.sort_by(|&a, &b| {
        unit_types[b]
            .advanced
            .placement_priority
            .cmp(&unit_types[a].advanced.placement_priority)
            .then(unit_types[a].key.cmp(&unit_types[b].key))
    });
    for &ti in &type_order {
        while remaining[ti] > 0 {
            let target = overflow_target(segments, unit_types, &ideals, &fills, ti);
            match target {
                Some(si) => {
                    fills[si].unit_type_indices.push(ti);
                    remaining[ti] -= 1;
                }
                None => {
                    // No segment at all (everything utility); drop the rest.
                    log::warn!(
                        "no segment can take remaining '{}' units",
                        unit_types[ti].key
                    );
                    remaining[ti] = 0;
                }
            }
        }
    }

    fills
}

/// Best type for the next slot of a segment, or None when nothing fits.
#[allow(clippy::too_many_arguments)]
fn pick_best_unit(
    unit_types: &[UnitTypeSpec],
    ideals: &[f64],
    remaining: &[usize],
    placed: &[usize],
    placed_total: usize,
    shares: &[f64],
    remaining_len: f64,
    strategy: StrategyKind,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (ti, spec) in unit_types.iter().enumerate() {
        if remaining[ti] == 0 {
            continue;
        }
        // The unit may compress down to (1 − tolerance)·ideal to squeeze in.
        let lower = (1.0 - spec.advanced.tolerance_fraction()) * ideals[ti];
        if remaining_len + 1e-9 < lower {
            continue;
        }
        let actual = if placed_total == 0 {
            0.0
        } else {
            placed[ti] as f64 / placed_total as f64
        };
        let score = strategy.score(spec, ideals[ti], actual - shares[ti]);
        let better = match best {
            None => true,
            Some((bi, bs)) => {
                let best_spec = &unit_types[bi];
                score > bs
                    || (score == bs
                        && (spec.advanced.placement_priority
                            > best_spec.advanced.placement_priority
                            || (spec.advanced.placement_priority
                                == best_spec.advanced.placement_priority
                                && spec.key < best_spec.key)))
            }
        };
        if better {
            best = Some((ti, score));
        }
    }
    best.map(|(ti, _)| ti)
}

/// Overflow target: the segment with the best slack-minus-denial score that
/// can still honor every assigned unit's hard minimum width.
fn overflow_target(
    segments: &[Segment],
    unit_types: &[UnitTypeSpec],
    ideals: &[f64],
    fills: &[SegmentFill],
    ti: usize,
) -> Option<usize> {
    let mut candidates: Vec<(f64, f64, usize)> = Vec::new();
    for (si, segment) in segments.iter().enumerate() {
        if segment.utility {
            continue;
        }
        let assigned = &fills[si].unit_type_indices;
        let ideal_sum: f64 = assigned.iter().map(|&t| ideals[t]).sum();
        let slack = segment.length() - ideal_sum;
        let denial: f64 = assigned
            .iter()
            .map(|&t| {
                let tol = unit_types[t].advanced.tolerance_fraction();
                if tol == 0.0 {
                    f64::INFINITY
                } else {
                    1.0 / tol
                }
            })
            .sum();
        let score = if denial.is_infinite() {
            f64::NEG_INFINITY
        } else {
            slack - DENIAL_PENALTY * denial
        };

        let min_sum: f64 = assigned
            .iter()
            .map(|&t| unit_types[t].advanced.min_width)
            .sum();
        if min_sum + unit_types[ti].advanced.min_width > segment.length() + 1e-9 {
            continue;
        }
        candidates.push((score, slack, si));
    }
    if candidates.is_empty() {
        // Hard bounds exclude everything; fall back to raw slack so the unit
        // still lands somewhere and synthesis reports the squeeze.
        for (si, segment) in segments.iter().enumerate() {
            if segment.utility {
                continue;
            }
            let ideal_sum: f64 = fills[si].unit_type_indices.iter().map(|&t| ideals[t]).sum();
            candidates.push((segment.length() - ideal_sum, segment.length() - ideal_sum, si));
        }
    }
    candidates
        .into_iter()
        .max_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(core::cmp::Ordering::Equal)
                .then(a.1.partial_cmp(&b.1).unwrap_or(core::cmp::Ordering::Equal))
                .then(b.2.cmp(&a.2))
        })
        .map(|(_, _, si)| si)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{normalized_shares, standard_mix, AdvancedSettings, UnitTypeSpec};

    fn segment(side: Side, start_x: f64, end_x: f64, ends: (bool, bool)) -> Segment {
        Segment {
            side,
            start_x,
            end_x,
            available_depth: 9.145,
            left_is_end: ends.0,
            right_is_end: ends.1,
            left_is_core: !ends.0,
            right_is_core: !ends.1,
            utility: false,
        }
    }

    fn studio_only(tolerance: f64) -> Vec<UnitTypeSpec> {
        vec![UnitTypeSpec {
            key: "studio".into(),
            display_name: "Studio".into(),
            target_area: 51.1,
            target_percentage: 100.0,
            color: "#8DA9C4".into(),
            advanced: AdvancedSettings {
                size_tolerance: tolerance,
                min_width: 4.5,
                max_width: 7.5,
                ..AdvancedSettings::default()
            },
        }]
    }

    fn scenario_segments() -> Vec<Segment> {
        vec![
            segment(Side::North, -22.86, -11.28, (true, false)),
            segment(Side::North, -7.62, 7.62, (false, false)),
            segment(Side::North, 11.28, 22.86, (false, true)),
            segment(Side::South, -22.86, 22.86, (true, true)),
        ]
    }

    #[test]
    fn all_allocated_units_are_placed() {
        let types = studio_only(0.0);
        let shares = normalized_shares(&types);
        let fills = distribute(
            &scenario_segments(),
            &types,
            &shares,
            &[15],
            9.145,
            Side::North,
            StrategyKind::Balanced,
        );
        let placed: usize = fills.iter().map(|f| f.unit_type_indices.len()).sum();
        assert_eq!(placed, 15);
    }

    #[test]
    fn premium_segments_fill_first() {
        let types = studio_only(0.0);
        let shares = normalized_shares(&types);
        // Only 8 units: the both-ends south segment takes all of them.
        let fills = distribute(
            &scenario_segments(),
            &types,
            &shares,
            &[8],
            9.145,
            Side::North,
            StrategyKind::Balanced,
        );
        assert_eq!(fills[3].unit_type_indices.len(), 8);
        assert!(fills[0].unit_type_indices.is_empty());
    }

    #[test]
    fn overflow_lands_in_most_slack() {
        let types = studio_only(0.0);
        let shares = normalized_shares(&types);
        let fills = distribute(
            &scenario_segments(),
            &types,
            &shares,
            &[15],
            9.145,
            Side::North,
            StrategyKind::Balanced,
        );
        // Ideal width 51.1/9.145 ≈ 5.59: south takes 8, each end segment 2,
        // the middle fits 2 in pass 1 and absorbs the 15th by force.
        assert_eq!(fills[3].unit_type_indices.len(), 8);
        assert_eq!(fills[0].unit_type_indices.len(), 2);
        assert_eq!(fills[2].unit_type_indices.len(), 2);
        assert_eq!(fills[1].unit_type_indices.len(), 3);
    }

    #[test]
    fn tolerance_admits_a_tight_fit() {
        // One segment barely short of two ideal widths: rigid studios fit
        // one, tolerant studios fit two.
        let seg = vec![segment(Side::South, 0.0, 10.8, (true, true))];
        let shares = vec![1.0];

        let rigid = studio_only(0.0);
        let fills = distribute(
            &seg,
            &rigid,
            &shares,
            &[2],
            9.145,
            Side::North,
            StrategyKind::Balanced,
        );
        // Second unit force-placed by pass 2 instead of fitting.
        assert_eq!(fills[0].unit_type_indices.len(), 2);

        let tolerant = studio_only(10.0);
        let fills = distribute(
            &seg,
            &tolerant,
            &shares,
            &[2],
            9.145,
            Side::North,
            StrategyKind::Balanced,
        );
        assert_eq!(fills[0].unit_type_indices.len(), 2);
    }

    #[test]
    fn full_mix_distributes_every_count() {
        let types = standard_mix();
        let shares = normalized_shares(&types);
        let fills = distribute(
            &scenario_segments(),
            &types,
            &shares,
            &[2, 3, 2, 1],
            9.145,
            Side::North,
            StrategyKind::MixOptimized,
        );
        let placed: usize = fills.iter().map(|f| f.unit_type_indices.len()).sum();
        assert_eq!(placed, 8);
    }

    #[test]
    fn deterministic_across_runs() {
        let types = standard_mix();
        let shares = normalized_shares(&types);
        let a = distribute(
            &scenario_segments(),
            &types,
            &shares,
            &[3, 7, 5, 2],
            9.145,
            Side::North,
            StrategyKind::Balanced,
        );
        let b = distribute(
            &scenario_segments(),
            &types,
            &shares,
            &[3, 7, 5, 2],
            9.145,
            Side::North,
            StrategyKind::Balanced,
        );
        assert_eq!(a, b);
    }
}
