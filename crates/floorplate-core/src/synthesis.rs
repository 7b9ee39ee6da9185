//! Geometry synthesis — per-segment unit lists become concrete rectangles.
//!
//! Each segment's length error against the ideal widths is spread across its
//! units by the flexibility weights, clamped to hard bounds. The strategy's
//! ordering pattern decides which types land at the premium extremes, then
//! L-shape tabs wrap eligible end units around the corridor and fill the
//! strips behind shallow cores.

use serde::{Deserialize, Serialize};

use crate::config::{Side, UnitTypeSpec};
use crate::cores::CoreBlock;
use crate::corridor::CorridorBlock;
use crate::distribution::SegmentFill;
use crate::footprint::FootprintAnalysis;
use crate::geometry::{Point, Rect, Region};
use crate::segments::Segment;
use crate::strategy::OrderingPattern;

/// Fraction of an end unit's width claimed by its corridor-wrap tab.
const END_TAB_RATIO: f64 = 0.5;

const EPS: f64 = 1e-6;

/// Where a unit sits relative to the premium slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementKind {
    Standard,
    /// Adjacent to a building end.
    End,
    /// Adjacent to a core.
    Corner,
}

/// A synthesized apartment unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitBlock {
    pub type_key: String,
    pub region: Region,
    pub area: f64,
    pub side: Side,
    pub placement: PlacementKind,
}

/// Leftover floor area that takes no unit (short segments, unclaimed core
/// strips, residual gaps).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilitySpace {
    pub rect: Rect,
    pub side: Side,
    pub area: f64,
}

/// Synthesis output for one strategy variant.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisResult {
    pub units: Vec<UnitBlock>,
    pub utilities: Vec<UtilitySpace>,
    pub warnings: Vec<String>,
}

// Working record: keeps segment context until tabs are resolved.
struct PlacedUnit {
    type_index: usize,
    rect: Rect,
    region: Option<Vec<Point>>,
    side: Side,
    placement: PlacementKind,
}

/// Turn segment fills into unit geometry. May shorten the corridor when an
/// end unit wraps around it.
pub fn synthesize(
    analysis: &FootprintAnalysis,
    segments: &[Segment],
    fills: &[SegmentFill],
    unit_types: &[UnitTypeSpec],
    cores: &[CoreBlock],
    corridor: &mut CorridorBlock,
    pattern: OrderingPattern,
) -> SynthesisResult {
    let mut placed: Vec<PlacedUnit> = Vec::new();
    let mut utilities: Vec<UtilitySpace> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    for (si, segment) in segments.iter().enumerate() {
        let band_y = band_min_y(segment, corridor);
        if segment.utility || fills[si].unit_type_indices.is_empty() {
            if segment.length() > EPS {
                let rect = Rect::new(
                    segment.start_x,
                    band_y,
                    segment.length(),
                    segment.available_depth,
                );
                utilities.push(UtilitySpace {
                    rect,
                    side: segment.side,
                    area: rect.area(),
                });
            }
            continue;
        }

        let assigned = &fills[si].unit_type_indices;
        let ideals: Vec<f64> = assigned
            .iter()
            .map(|&ti| unit_types[ti].ideal_width(segment.available_depth))
            .collect();
        let (mut widths, residual) = fit_widths(&ideals, assigned, unit_types, segment.length());

        if residual < -EPS {
            // Even the hard minimums overflow the segment; scale to fit so
            // the geometry stays sound and report the squeeze.
            let sum: f64 = widths.iter().sum();
            let factor = segment.length() / sum;
            for w in &mut widths {
                *w *= factor;
            }
            warnings.push(format!(
                "segment at x {:.1} on {:?} overfull by {:.2} m; units compressed below minimum",
                segment.start_x, segment.side, -residual
            ));
        } else if residual > EPS {
            warnings.push(format!(
                "segment at x {:.1} on {:?} underfilled by {:.2} m",
                segment.start_x, segment.side, residual
            ));
        }

        let mut order = arrange(&widths, assigned, unit_types, pattern);
        fixup_corner_slots(&mut order, assigned, unit_types, segment, &mut warnings);

        let mut cursor = segment.start_x;
        let last = order.len() - 1;
        for (pos, &slot) in order.iter().enumerate() {
            let width = widths[slot];
            let placement = if (pos == 0 && segment.left_is_end)
                || (pos == last && segment.right_is_end)
            {
                PlacementKind::End
            } else if (pos == 0 && segment.left_is_core)
                || (pos == last && segment.right_is_core)
            {
                PlacementKind::Corner
            } else {
                PlacementKind::Standard
            };
            placed.push(PlacedUnit {
                type_index: assigned[slot],
                rect: Rect::new(cursor, band_y, width, segment.available_depth),
                region: None,
                side: segment.side,
                placement,
            });
            cursor += width;
        }

        let gap = segment.end_x - cursor;
        if gap > EPS {
            let rect = Rect::new(cursor, band_y, gap, segment.available_depth);
            utilities.push(UtilitySpace {
                rect,
                side: segment.side,
                area: rect.area(),
            });
        }
    }

    apply_end_tabs(analysis, unit_types, corridor, &mut placed);
    apply_core_tabs(analysis, unit_types, cores, &mut placed, &mut utilities);

    let units = placed
        .into_iter()
        .map(|p| {
            let region = match p.region {
                Some(vertices) => Region::Polygon(vertices),
                None => Region::Rect(p.rect),
            };
            let area = region.area();
            UnitBlock {
                type_key: unit_types[p.type_index].key.clone(),
                region,
                area,
                side: p.side,
                placement: p.placement,
            }
        })
        .collect();

    SynthesisResult {
        units,
        utilities,
        warnings,
    }
}

fn band_min_y(segment: &Segment, corridor: &CorridorBlock) -> f64 {
    match segment.side {
        Side::North => corridor.rect.top(),
        Side::South => corridor.rect.y - segment.available_depth,
    }
}

/// Spread the segment's length error across its units by flexibility weight,
/// clamped to hard bounds. Returns widths and the unabsorbed residual.
fn fit_widths(
    ideals: &[f64],
    assigned: &[usize],
    unit_types: &[UnitTypeSpec],
    segment_length: f64,
) -> (Vec<f64>, f64) {
    let n = ideals.len();
    let mut widths = ideals.to_vec();
    let mut pinned = vec![false; n];
    let mut diff = segment_length - ideals.iter().sum::<f64>();
    let expanding = diff > 0.0;

    for _ in 0..=n {
        if diff.abs() < EPS {
            break;
        }
        let free: Vec<usize> = (0..n).filter(|&i| !pinned[i]).collect();
        if free.is_empty() {
            break;
        }
        let weight = |i: usize| {
            let adv = &unit_types[assigned[i]].advanced;
            if expanding {
                adv.expansion_weight
            } else {
                adv.compression_weight
            }
        };
        let weight_sum: f64 = free.iter().map(|&i| weight(i)).sum();
        let equal = weight_sum <= 0.0;

        let round_diff = diff;
        let mut moved = false;
        for &i in &free {
            let share = if equal {
                round_diff / free.len() as f64
            } else {
                round_diff * weight(i) / weight_sum
            };
            let adv = &unit_types[assigned[i]].advanced;
            let target = widths[i] + share;
            let bounded = target.clamp(adv.min_width, adv.max_width);
            if (bounded - target).abs() > EPS {
                pinned[i] = true;
            }
            let absorbed = bounded - widths[i];
            if absorbed.abs() > EPS {
                moved = true;
            }
            widths[i] = bounded;
            diff -= absorbed;
        }
        if !moved {
            break;
        }
    }
    (widths, diff)
}

/// Slot order for the segment per the strategy's pattern. Returns indices
/// into the assigned/widths arrays, left to right.
fn arrange(
    widths: &[f64],
    assigned: &[usize],
    unit_types: &[UnitTypeSpec],
    pattern: OrderingPattern,
) -> Vec<usize> {
    let n = widths.len();
    // Widest first, with total tiebreak for determinism.
    let mut desc: Vec<usize> = (0..n).collect();
    desc.sort_by(|&a, &b| {
        widths[b]
            .partial_cmp(&widths[a])
            .unwrap_or(core::cmp::Ordering::Equal)
            .then(unit_types[assigned[a]].key.cmp(&unit_types[assigned[b]].key))
            .then(a.cmp(&b))
    });

    match pattern {
        OrderingPattern::Descending => desc,
        OrderingPattern::Ascending => {
            desc.reverse();
            desc
        }
        OrderingPattern::Valley => {
            let mut out = vec![0usize; n];
            let mut lo = 0;
            let mut hi = n - 1;
            for (i, &slot) in desc.iter().enumerate() {
                if i % 2 == 0 {
                    out[lo] = slot;
                    lo += 1;
                } else {
                    out[hi] = slot;
                    hi -= 1;
                }
            }
            out
        }
        OrderingPattern::Alternating => {
            let mut out = Vec::with_capacity(n);
            let mut front = 0;
            let mut back = n;
            while front < back {
                out.push(desc[front]);
                front += 1;
                if front < back {
                    back -= 1;
                    out.push(desc[back]);
                }
            }
            out
        }
    }
}

/// Ensure corridor-end slots hold corner-eligible types, swapping the
/// nearest eligible unit in when needed.
fn fixup_corner_slots(
    order: &mut [usize],
    assigned: &[usize],
    unit_types: &[UnitTypeSpec],
    segment: &Segment,
    warnings: &mut Vec<String>,
) {
    let eligible =
        |slot: usize| unit_types[assigned[slot]].advanced.corner_eligible;
    let n = order.len();

    if segment.left_is_end && !eligible(order[0]) {
        if let Some(j) = (1..n).find(|&j| eligible(order[j])) {
            order.swap(0, j);
        } else {
            warnings.push(format!(
                "no corner-eligible type for the end slot at x {:.1} on {:?}",
                segment.start_x, segment.side
            ));
        }
    }
    // The left slot's occupant is settled by now; don't steal it back.
    let lo = if segment.left_is_end { 1 } else { 0 };
    if segment.right_is_end && n > 1 && !eligible(order[n - 1]) {
        if let Some(j) = (lo..n - 1).rev().find(|&j| eligible(order[j])) {
            order.swap(n - 1, j);
        } else {
            warnings.push(format!(
                "no corner-eligible type for the end slot at x {:.1} on {:?}",
                segment.end_x, segment.side
            ));
        }
    }
}

/// Wrap eligible end units around the corridor ends.
fn apply_end_tabs(
    analysis: &FootprintAnalysis,
    unit_types: &[UnitTypeSpec],
    corridor: &mut CorridorBlock,
    placed: &mut [PlacedUnit],
) {
    for left_end in [true, false] {
        let end_x = if left_end {
            -analysis.half_length()
        } else {
            analysis.half_length()
        };
        let at_end = |p: &PlacedUnit| {
            if left_end {
                (p.rect.x - end_x).abs() < EPS
            } else {
                (p.rect.right() - end_x).abs() < EPS
            }
        };

        // Both sides may present an eligible end unit; the premium slot goes
        // to the higher priority, north on a tie.
        let mut winner: Option<usize> = None;
        for (i, p) in placed.iter().enumerate() {
            if !at_end(p)
                || p.region.is_some()
                || !unit_types[p.type_index].advanced.l_shape_eligible
            {
                continue;
            }
            winner = match winner {
                None => Some(i),
                Some(w) => {
                    let (cur, prev) = (&placed[i], &placed[w]);
                    let cur_pri = unit_types[cur.type_index].advanced.placement_priority;
                    let prev_pri = unit_types[prev.type_index].advanced.placement_priority;
                    if cur_pri > prev_pri || (cur_pri == prev_pri && cur.side == Side::North) {
                        Some(i)
                    } else {
                        Some(w)
                    }
                }
            };
        }
        let Some(wi) = winner else { continue };

        let winner_side = placed[wi].side;
        let mut tab_width = placed[wi].rect.width * END_TAB_RATIO;
        // Leave the facing end unit its corridor access.
        if let Some(opposite) = placed
            .iter()
            .position(|p| at_end(p) && p.side != winner_side)
        {
            tab_width = tab_width.min(placed[opposite].rect.width * END_TAB_RATIO);
        }
        if tab_width < EPS {
            continue;
        }

        let tab = if left_end {
            Rect::new(end_x, corridor.rect.y, tab_width, corridor.rect.depth)
        } else {
            Rect::new(
                end_x - tab_width,
                corridor.rect.y,
                tab_width,
                corridor.rect.depth,
            )
        };
        placed[wi].region = Some(wrap_polygon(placed[wi].rect, tab, placed[wi].side, left_end));
        if left_end {
            corridor.shorten_left(tab_width);
        } else {
            corridor.shorten_right(tab_width);
        }
    }
}

/// Fill the strip between a shallow core and the facade with the adjacent
/// eligible unit, or emit it as utility space.
fn apply_core_tabs(
    analysis: &FootprintAnalysis,
    unit_types: &[UnitTypeSpec],
    cores: &[CoreBlock],
    placed: &mut [PlacedUnit],
    utilities: &mut Vec<UtilitySpace>,
) {
    for core in cores {
        let strip = match core.side {
            Side::North => {
                let top = analysis.half_depth();
                Rect::new(
                    core.rect.x,
                    core.rect.top(),
                    core.rect.width,
                    top - core.rect.top(),
                )
            }
            Side::South => {
                let bottom = -analysis.half_depth();
                Rect::new(core.rect.x, bottom, core.rect.width, core.rect.y - bottom)
            }
        };
        if strip.depth < EPS {
            continue;
        }

        let eligible = |p: &PlacedUnit| {
            p.side == core.side
                && p.region.is_none()
                && unit_types[p.type_index].advanced.l_shape_eligible
        };
        let left = placed
            .iter()
            .position(|p| eligible(p) && (p.rect.right() - core.rect.x).abs() < EPS);
        let right = placed
            .iter()
            .position(|p| eligible(p) && (p.rect.x - core.rect.right()).abs() < EPS);

        match left.or(right) {
            Some(i) => {
                let is_left = left.is_some();
                placed[i].region =
                    Some(corner_polygon(placed[i].rect, strip, placed[i].side, is_left));
                placed[i].placement = PlacementKind::Corner;
            }
            None => utilities.push(UtilitySpace {
                rect: strip,
                side: core.side,
                area: strip.area(),
            }),
        }
    }
}

/// Polygon for an end unit plus its corridor-wrap tab.
fn wrap_polygon(rect: Rect, tab: Rect, side: Side, left_end: bool) -> Vec<Point> {
    match (side, left_end) {
        (Side::North, true) => vec![
            Point::new(tab.x, tab.y),
            Point::new(tab.right(), tab.y),
            Point::new(tab.right(), rect.y),
            Point::new(rect.right(), rect.y),
            Point::new(rect.right(), rect.top()),
            Point::new(rect.x, rect.top()),
        ],
        (Side::North, false) => vec![
            Point::new(tab.x, tab.y),
            Point::new(tab.right(), tab.y),
            Point::new(tab.right(), rect.top()),
            Point::new(rect.x, rect.top()),
            Point::new(rect.x, rect.y),
            Point::new(tab.x, rect.y),
        ],
        (Side::South, true) => vec![
            Point::new(rect.x, rect.y),
            Point::new(rect.right(), rect.y),
            Point::new(rect.right(), rect.top()),
            Point::new(tab.right(), rect.top()),
            Point::new(tab.right(), tab.top()),
            Point::new(tab.x, tab.top()),
        ],
        (Side::South, false) => vec![
            Point::new(rect.x, rect.y),
            Point::new(rect.right(), rect.y),
            Point::new(rect.right(), tab.top()),
            Point::new(tab.x, tab.top()),
            Point::new(tab.x, rect.top()),
            Point::new(rect.x, rect.top()),
        ],
    }
}

/// Polygon for a core-adjacent unit plus the facade strip behind the core.
fn corner_polygon(rect: Rect, strip: Rect, side: Side, neighbor_is_left: bool) -> Vec<Point> {
    match (side, neighbor_is_left) {
        (Side::North, true) => vec![
            Point::new(rect.x, rect.y),
            Point::new(rect.right(), rect.y),
            Point::new(rect.right(), strip.y),
            Point::new(strip.right(), strip.y),
            Point::new(strip.right(), rect.top()),
            Point::new(rect.x, rect.top()),
        ],
        (Side::North, false) => vec![
            Point::new(rect.x, rect.y),
            Point::new(rect.right(), rect.y),
            Point::new(rect.right(), rect.top()),
            Point::new(strip.x, rect.top()),
            Point::new(strip.x, strip.y),
            Point::new(rect.x, strip.y),
        ],
        (Side::South, true) => vec![
            Point::new(rect.x, rect.y),
            Point::new(strip.right(), rect.y),
            Point::new(strip.right(), strip.top()),
            Point::new(rect.right(), strip.top()),
            Point::new(rect.right(), rect.top()),
            Point::new(rect.x, rect.top()),
        ],
        (Side::South, false) => vec![
            Point::new(strip.x, rect.y),
            Point::new(rect.right(), rect.y),
            Point::new(rect.right(), rect.top()),
            Point::new(rect.x, rect.top()),
            Point::new(rect.x, strip.top()),
            Point::new(strip.x, strip.top()),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{standard_mix, AdvancedSettings, CorridorConfig, UnitTypeSpec};
    use crate::geometry::Region;

    fn analysis_91() -> FootprintAnalysis {
        crate::footprint::analyze(
            &crate::config::Footprint {
                length: 91.44,
                depth: 19.81,
                center_x: 0.0,
                center_y: 0.0,
                rotation: 0.0,
                floor_z: 0.0,
            },
            &CorridorConfig::default(),
            &crate::config::CoreConfig::default(),
            &standard_mix(),
        )
        .unwrap()
    }

    fn corridor_91() -> CorridorBlock {
        CorridorBlock {
            rect: Rect::new(-45.72, -0.76, 91.44, 1.52),
        }
    }

    fn south_segment(start_x: f64, end_x: f64) -> Segment {
        Segment {
            side: Side::South,
            start_x,
            end_x,
            available_depth: 9.145,
            left_is_end: true,
            right_is_end: true,
            left_is_core: false,
            right_is_core: false,
            utility: false,
        }
    }

    fn flexible_type(key: &str, area: f64, corner: bool, l_shape: bool) -> UnitTypeSpec {
        UnitTypeSpec {
            key: key.into(),
            display_name: key.into(),
            target_area: area,
            target_percentage: 50.0,
            color: "#777777".into(),
            advanced: AdvancedSettings {
                corner_eligible: corner,
                l_shape_eligible: l_shape,
                ..AdvancedSettings::default()
            },
        }
    }

    #[test]
    fn widths_absorb_expansion_by_weight() {
        let mut a = flexible_type("a", 72.0, true, false);
        let mut b = flexible_type("b", 72.0, true, false);
        a.advanced.expansion_weight = 1.0;
        b.advanced.expansion_weight = 3.0;
        let types = vec![a, b];
        // ideals 8+8, segment 20 → diff 4 split 1:3
        let (widths, residual) = fit_widths(&[8.0, 8.0], &[0, 1], &types, 20.0);
        assert!((widths[0] - 9.0).abs() < 1e-9);
        assert!((widths[1] - 11.0).abs() < 1e-9);
        assert!(residual.abs() < 1e-9);
    }

    #[test]
    fn zero_weights_fall_back_to_equal_shares() {
        let mut a = flexible_type("a", 72.0, true, false);
        a.advanced.expansion_weight = 0.0;
        let types = vec![a];
        let (widths, residual) = fit_widths(&[8.0, 8.0], &[0, 0], &types, 21.0);
        assert!((widths[0] - 10.5).abs() < 1e-9);
        assert!((widths[1] - 10.5).abs() < 1e-9);
        assert!(residual.abs() < 1e-9);
    }

    #[test]
    fn clamped_unit_sheds_to_the_rest() {
        let mut a = flexible_type("a", 72.0, true, false);
        a.advanced.max_width = 8.5; // clamps quickly
        let b = flexible_type("b", 72.0, true, false);
        let types = vec![a, b];
        let (widths, residual) = fit_widths(&[8.0, 8.0], &[0, 1], &types, 20.0);
        assert!((widths[0] - 8.5).abs() < 1e-9);
        assert!((widths[1] - 11.5).abs() < 1e-9);
        assert!(residual.abs() < 1e-9);
    }

    #[test]
    fn all_clamped_reports_residual() {
        let mut a = flexible_type("a", 72.0, true, false);
        a.advanced.max_width = 8.5;
        let types = vec![a];
        let (widths, residual) = fit_widths(&[8.0, 8.0], &[0, 0], &types, 20.0);
        assert!((widths[0] - 8.5).abs() < 1e-9);
        assert!((residual - 3.0).abs() < 1e-9);
    }

    #[test]
    fn valley_puts_widest_at_edges() {
        let order = arrange(
            &[5.0, 9.0, 7.0, 6.0],
            &[0, 0, 0, 0],
            &[flexible_type("a", 72.0, true, false)],
            OrderingPattern::Valley,
        );
        // widest (index 1) leftmost, second widest (index 2) rightmost
        assert_eq!(order[0], 1);
        assert_eq!(order[3], 2);
    }

    #[test]
    fn descending_sorts_by_width() {
        let order = arrange(
            &[5.0, 9.0, 7.0],
            &[0, 0, 0],
            &[flexible_type("a", 72.0, true, false)],
            OrderingPattern::Descending,
        );
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn ineligible_type_swapped_out_of_end_slot() {
        let types = vec![
            flexible_type("big", 100.0, true, false),
            flexible_type("small", 60.0, false, false),
        ];
        let mut segment = south_segment(-10.0, 10.0);
        segment.right_is_end = false;
        segment.right_is_core = true;
        let mut warnings = Vec::new();
        // ascending order would put the small (ineligible) unit first
        let mut order = arrange(
            &[11.0, 6.5],
            &[0, 1],
            &types,
            OrderingPattern::Ascending,
        );
        assert_eq!(order[0], 1);
        fixup_corner_slots(&mut order, &[0, 1], &types, &segment, &mut warnings);
        assert_eq!(order[0], 0);
        assert!(warnings.is_empty());
    }

    #[test]
    fn lone_eligible_unit_cannot_serve_both_ends() {
        let types = vec![
            flexible_type("big", 100.0, true, false),
            flexible_type("small", 60.0, false, false),
        ];
        let segment = south_segment(-10.0, 10.0);
        let mut warnings = Vec::new();
        let mut order = vec![1, 0];
        fixup_corner_slots(&mut order, &[0, 1], &types, &segment, &mut warnings);
        // the eligible unit went to the left slot; the right slot warns
        assert_eq!(order, vec![0, 1]);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn end_wrap_produces_polygon_and_shortens_corridor() {
        let analysis = analysis_91();
        let mut corridor = corridor_91();
        let types = vec![flexible_type("wrap", 100.0, true, true)];
        let segments = vec![south_segment(-45.72, 45.72)];
        let fills = vec![SegmentFill {
            unit_type_indices: vec![0; 8],
        }];
        let result = synthesize(
            &analysis,
            &segments,
            &fills,
            &types,
            &[],
            &mut corridor,
            OrderingPattern::Descending,
        );
        assert_eq!(result.units.len(), 8);

        let left = result
            .units
            .iter()
            .find(|u| u.region.bounds().x < -45.0)
            .unwrap();
        assert!(matches!(left.region, Region::Polygon(_)));
        // wrapped area = band rectangle + corridor tab
        let width = left.region.bounds().width;
        let expected = width * 9.145 + width * END_TAB_RATIO * 1.52;
        assert!((left.area - expected).abs() < 1e-6);
        // corridor pulled in from both ends (both end units eligible)
        assert!(corridor.start_x() > -45.72);
        assert!(corridor.end_x() < 45.72);
    }

    #[test]
    fn ineligible_end_units_leave_corridor_alone() {
        let analysis = analysis_91();
        let mut corridor = corridor_91();
        let types = vec![flexible_type("plain", 100.0, true, false)];
        let segments = vec![south_segment(-45.72, 45.72)];
        let fills = vec![SegmentFill {
            unit_type_indices: vec![0; 8],
        }];
        let result = synthesize(
            &analysis,
            &segments,
            &fills,
            &types,
            &[],
            &mut corridor,
            OrderingPattern::Descending,
        );
        assert!(result
            .units
            .iter()
            .all(|u| matches!(u.region, Region::Rect(_))));
        assert!((corridor.start_x() - -45.72).abs() < 1e-9);
    }

    #[test]
    fn unclaimed_core_strip_becomes_utility() {
        let analysis = analysis_91();
        let mut corridor = corridor_91();
        let types = vec![flexible_type("plain", 100.0, true, false)];
        // A shallow core with no adjacent units at all.
        let core = CoreBlock {
            rect: Rect::new(-1.83, 0.76, 3.66, 7.62),
            side: Side::North,
            kind: crate::cores::CoreKind::Middle,
        };
        let result = synthesize(
            &analysis,
            &[],
            &[],
            &types,
            &[core],
            &mut corridor,
            OrderingPattern::Descending,
        );
        assert_eq!(result.utilities.len(), 1);
        let strip = &result.utilities[0];
        assert!((strip.rect.y - 8.38).abs() < 1e-9);
        assert!((strip.rect.top() - 9.905).abs() < 1e-9);
    }

    #[test]
    fn utility_segment_emitted_as_space() {
        let analysis = analysis_91();
        let mut corridor = corridor_91();
        let types = vec![flexible_type("plain", 100.0, true, false)];
        let mut segment = south_segment(-45.72, -43.0);
        segment.utility = true;
        let fills = vec![SegmentFill {
            unit_type_indices: Vec::new(),
        }];
        let result = synthesize(
            &analysis,
            &[segment],
            &fills,
            &types,
            &[],
            &mut corridor,
            OrderingPattern::Descending,
        );
        assert!(result.units.is_empty());
        assert_eq!(result.utilities.len(), 1);
        assert!((result.utilities[0].rect.width - 2.72).abs() < 1e-9);
    }

    #[test]
    fn trailing_gap_becomes_utility() {
        let analysis = analysis_91();
        let mut corridor = corridor_91();
        let mut spec = flexible_type("rigid", 100.0, true, false);
        spec.advanced.max_width = 11.0; // ideal 10.93, barely expandable
        let types = vec![spec];
        let segments = vec![south_segment(-45.72, 45.72)];
        let fills = vec![SegmentFill {
            unit_type_indices: vec![0; 7],
        }];
        let result = synthesize(
            &analysis,
            &segments,
            &fills,
            &types,
            &[],
            &mut corridor,
            OrderingPattern::Descending,
        );
        assert_eq!(result.units.len(), 7);
        assert_eq!(result.utilities.len(), 1);
        assert!(!result.warnings.is_empty());
        let total: f64 = result.units.iter().map(|u| u.region.bounds().width).sum();
        assert!((total + result.utilities[0].rect.width - 91.44).abs() < 1e-6);
    }
}
