//! Cross-corridor demising-wall alignment.
//!
//! The core side is the master; slave-side walls shift toward their nearest
//! master wall, each by at most its neighbors' tolerance share and never past
//! hard width bounds. One left-to-right pass, no iteration — shifting a wall
//! moves only that wall, so passes do not interact.

use crate::config::{Side, UnitTypeSpec};
use crate::geometry::Region;
use crate::synthesis::UnitBlock;

const EPS: f64 = 1e-6;

/// What the pass did, for warnings and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AlignmentReport {
    pub walls_considered: usize,
    pub walls_moved: usize,
    /// Walls that wanted to move but were fully blocked by rigidity or
    /// width bounds.
    pub walls_denied: usize,
}

/// Align slave-side walls to the master side in place.
///
/// `strictness` is the strategy-adjusted factor in [0, 1].
pub fn align_walls(
    units: &mut [UnitBlock],
    unit_types: &[UnitTypeSpec],
    master_side: Side,
    strictness: f64,
) -> AlignmentReport {
    let mut report = AlignmentReport::default();
    let strictness = strictness.clamp(0.0, 1.0);
    if strictness == 0.0 {
        return report;
    }

    let master_walls = interior_walls(units, master_side);
    if master_walls.is_empty() {
        return report;
    }

    // Slave-side rectangular units, left to right. Polygon units are pinned.
    let slave_side = master_side.opposite();
    let mut slave: Vec<usize> = (0..units.len())
        .filter(|&i| units[i].side == slave_side)
        .collect();
    slave.sort_by(|&a, &b| {
        units[a]
            .region
            .bounds()
            .x
            .partial_cmp(&units[b].region.bounds().x)
            .unwrap_or(core::cmp::Ordering::Equal)
    });

    for w in 0..slave.len().saturating_sub(1) {
        let li = slave[w];
        let ri = slave[w + 1];
        let (Region::Rect(left), Region::Rect(right)) = (&units[li].region, &units[ri].region)
        else {
            continue;
        };
        // Only a shared wall can move.
        if (left.right() - right.x).abs() > EPS {
            continue;
        }
        let wall = left.right();
        report.walls_considered += 1;

        let nearest = master_walls
            .iter()
            .copied()
            .min_by(|a, b| {
                (a - wall)
                    .abs()
                    .partial_cmp(&(b - wall).abs())
                    .unwrap_or(core::cmp::Ordering::Equal)
            })
            .unwrap_or(wall);
        let d = nearest - wall;
        if d.abs() < EPS {
            continue;
        }

        let left_adv = &type_of(unit_types, &units[li].type_key).advanced;
        let right_adv = &type_of(unit_types, &units[ri].type_key).advanced;
        let max_shift = (left.width * left_adv.tolerance_fraction())
            .min(right.width * right_adv.tolerance_fraction())
            .min(d.abs());
        let desired = strictness * max_shift;

        // Stay inside both neighbors' hard bounds.
        let cap = if d > 0.0 {
            (left_adv.max_width - left.width).min(right.width - right_adv.min_width)
        } else {
            (left.width - left_adv.min_width).min(right_adv.max_width - right.width)
        };
        let applied = desired.min(cap.max(0.0));
        if applied < EPS {
            report.walls_denied += 1;
            continue;
        }

        let shift = applied * d.signum();
        let (new_left, new_right) = {
            let mut l = *left;
            let mut r = *right;
            l.width += shift;
            r.x += shift;
            r.width -= shift;
            (l, r)
        };
        units[li].region = Region::Rect(new_left);
        units[li].area = new_left.area();
        units[ri].region = Region::Rect(new_right);
        units[ri].area = new_right.area();
        report.walls_moved += 1;
    }

    report
}

/// Shared-wall x positions between adjacent rectangular units on one side.
pub fn interior_walls(units: &[UnitBlock], side: Side) -> Vec<f64> {
    let mut rects: Vec<(f64, f64)> = units
        .iter()
        .filter(|u| u.side == side)
        .map(|u| {
            let b = u.region.bounds();
            (b.x, b.right())
        })
        .collect();
    rects.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(core::cmp::Ordering::Equal));
    rects
        .windows(2)
        .filter(|pair| (pair[0].1 - pair[1].0).abs() < EPS)
        .map(|pair| pair[0].1)
        .collect()
}

/// Sum of each slave wall's distance to its nearest master wall.
pub fn total_offset(units: &[UnitBlock], master_side: Side) -> f64 {
    let master = interior_walls(units, master_side);
    if master.is_empty() {
        return 0.0;
    }
    interior_walls(units, master_side.opposite())
        .iter()
        .map(|&s| {
            master
                .iter()
                .map(|&m| (m - s).abs())
                .fold(f64::MAX, f64::min)
        })
        .sum()
}

fn type_of<'a>(unit_types: &'a [UnitTypeSpec], key: &str) -> &'a UnitTypeSpec {
    unit_types
        .iter()
        .find(|t| t.key == key)
        .unwrap_or(&unit_types[0])
}
