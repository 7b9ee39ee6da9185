//! Vertical-circulation core placement under egress constraints.
//!
//! Deterministic, fewest-cores-first: two end cores tucked inside the
//! dead-end allowance, then middle cores inserted into the widest gap until
//! the worst unaided travel distance clears the limit or the core cap is hit.
//!
//! State transitions: {no cores} → {two end cores} → {+middle cores…} →
//! satisfied | infeasible.

use serde::{Deserialize, Serialize};

use crate::config::{CoreConfig, CorridorConfig, EgressConfig, Side};
use crate::error::CoreError;
use crate::footprint::FootprintAnalysis;
use crate::geometry::{Point, Rect};

/// Whether a core anchors a building end or backfills the middle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoreKind {
    End,
    Middle,
}

/// A placed stair/elevator core.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoreBlock {
    pub rect: Rect,
    pub side: Side,
    pub kind: CoreKind,
}

impl CoreBlock {
    pub fn center(&self) -> Point {
        self.rect.center()
    }

    pub fn center_x(&self) -> f64 {
        self.rect.center().x
    }
}

/// Place cores satisfying separation and travel limits.
///
/// Returns cores sorted by x. Fails with `EgressInfeasible` carrying the
/// measured overrun when the limits cannot be met.
pub fn place_cores(
    analysis: &FootprintAnalysis,
    corridor: &CorridorConfig,
    cores: &CoreConfig,
    egress: &EgressConfig,
) -> Result<Vec<CoreBlock>, CoreError> {
    let half_l = analysis.half_length();
    let core_w = cores.width;

    // Cores sit against the corridor on the configured side.
    let core_y = match cores.side {
        Side::North => corridor.width / 2.0,
        Side::South => -corridor.width / 2.0 - cores.depth,
    };

    // End cores: the inward edge lands at the dead-end allowance so the
    // corridor stub past the core stays within the limit.
    let mut left_x = -half_l + egress.dead_end_limit - core_w;
    if left_x < -half_l {
        left_x = -half_l;
    }
    let mut right_x = half_l - egress.dead_end_limit;
    if right_x + core_w > half_l {
        right_x = half_l - core_w;
    }

    let make = |x: f64, kind: CoreKind| CoreBlock {
        rect: Rect::new(x, core_y, core_w, cores.depth),
        side: cores.side,
        kind,
    };
    let mut placed = vec![make(left_x, CoreKind::End), make(right_x, CoreKind::End)];

    let gap = placed[1].rect.x - placed[0].rect.right();
    if gap < corridor.width {
        return Err(CoreError::EgressInfeasible {
            constraint: "core separation",
            measured: gap,
            limit: corridor.width,
            cores: placed.len(),
        });
    }

    // Exit separation against the floor diagonal.
    let separation = placed[1].center_x() - placed[0].center_x();
    let diagonal = (analysis.length * analysis.length + analysis.depth * analysis.depth).sqrt();
    let required = diagonal * egress.separation_fraction();
    if separation < required {
        return Err(CoreError::EgressInfeasible {
            constraint: "exit separation",
            measured: separation,
            limit: required,
            cores: placed.len(),
        });
    }

    // Backfill middle cores until the farthest band point is within reach.
    loop {
        let worst = max_unaided_travel(&placed, analysis);
        if worst <= egress.travel_distance_limit {
            break;
        }
        if placed.len() >= egress.max_cores {
            return Err(CoreError::EgressInfeasible {
                constraint: "travel distance",
                measured: worst,
                limit: egress.travel_distance_limit,
                cores: placed.len(),
            });
        }
        let middle = insert_position(&placed, corridor.width, core_w).ok_or(
            CoreError::EgressInfeasible {
                constraint: "core placement",
                measured: worst,
                limit: egress.travel_distance_limit,
                cores: placed.len(),
            },
        )?;
        placed.push(make(middle, CoreKind::Middle));
        placed.sort_by(|a, b| {
            a.rect
                .x
                .partial_cmp(&b.rect.x)
                .unwrap_or(core::cmp::Ordering::Equal)
        });
    }

    log::info!(
        "placed {} cores ({} end, {} middle) on {:?} side",
        placed.len(),
        placed.iter().filter(|c| c.kind == CoreKind::End).count(),
        placed.iter().filter(|c| c.kind == CoreKind::Middle).count(),
        cores.side,
    );
    Ok(placed)
}

/// Min-x of a middle core inserted into the widest inter-core gap, keeping a
/// corridor-width clearance to its neighbors. None when no gap can take one.
fn insert_position(placed: &[CoreBlock], min_gap: f64, core_w: f64) -> Option<f64> {
    // Widest gap by center distance; leftmost wins ties.
    let mut best: Option<(f64, usize)> = None;
    for i in 0..placed.len() - 1 {
        let span = placed[i + 1].center_x() - placed[i].center_x();
        if best.is_none() || span > best.unwrap().0 {
            best = Some((span, i));
        }
    }
    let (_, i) = best?;

    let lo = placed[i].rect.right() + min_gap;
    let hi = placed[i + 1].rect.x - min_gap - core_w;
    if hi < lo {
        return None;
    }
    let midpoint = (placed[i].center_x() + placed[i + 1].center_x()) / 2.0 - core_w / 2.0;
    Some(midpoint.clamp(lo, hi))
}

/// Worst-case Manhattan distance from any rentable band point to the nearest
/// core center. Candidate points sit at the facades, at the building ends and
/// at the midpoints between adjacent cores.
pub(crate) fn max_unaided_travel(placed: &[CoreBlock], analysis: &FootprintAnalysis) -> f64 {
    let mut xs = vec![-analysis.half_length(), analysis.half_length()];
    for i in 0..placed.len().saturating_sub(1) {
        xs.push((placed[i].center_x() + placed[i + 1].center_x()) / 2.0);
    }
    let ys = [analysis.half_depth(), -analysis.half_depth()];

    let mut worst = 0.0_f64;
    for &x in &xs {
        for &y in &ys {
            let nearest = placed
                .iter()
                .map(|c| {
                    let center = c.center();
                    (x - center.x).abs() + (y - center.y).abs()
                })
                .fold(f64::MAX, f64::min);
            worst = worst.max(nearest);
        }
    }
    worst
}
