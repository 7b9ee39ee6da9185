//! Segmentation of the rentable bands.
//!
//! Each corridor side is cut into contiguous spans between obstacles
//! (building ends and cores). The boundary flags recorded here drive corner
//! eligibility and L-shape synthesis later; spans too short for any unit are
//! flagged utility.

use serde::{Deserialize, Serialize};

use crate::config::{Side, UnitTypeSpec};
use crate::cores::CoreBlock;
use crate::corridor::RentableBand;
use crate::footprint::FootprintAnalysis;

/// A maximal obstacle-free span of one rentable band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub side: Side,
    pub start_x: f64,
    pub end_x: f64,
    pub available_depth: f64,
    pub left_is_end: bool,
    pub right_is_end: bool,
    pub left_is_core: bool,
    pub right_is_core: bool,
    /// Too short for any configured unit; eligible for utility space only.
    pub utility: bool,
}

impl Segment {
    pub fn length(&self) -> f64 {
        self.end_x - self.start_x
    }

    /// Placement priority class: both building ends, one end, interior.
    pub fn priority_class(&self) -> u8 {
        match (self.left_is_end, self.right_is_end) {
            (true, true) => 0,
            (true, false) | (false, true) => 1,
            (false, false) => 2,
        }
    }
}

/// Cut both bands into segments around the cores.
///
/// Output order is deterministic: north band first, then south, left to
/// right within each.
pub fn build_segments(
    analysis: &FootprintAnalysis,
    bands: &[RentableBand; 2],
    cores: &[CoreBlock],
    unit_types: &[UnitTypeSpec],
) -> Vec<Segment> {
    // Anything shorter than the narrowest legal unit can only be utility.
    let utility_threshold = unit_types
        .iter()
        .filter(|t| t.target_percentage > 0.0)
        .map(|t| t.advanced.min_width)
        .fold(f64::MAX, f64::min);

    let half_l = analysis.half_length();
    let mut segments = Vec::new();

    for band in bands {
        let mut side_cores: Vec<&CoreBlock> =
            cores.iter().filter(|c| c.side == band.side).collect();
        side_cores.sort_by(|a, b| {
            a.rect
                .x
                .partial_cmp(&b.rect.x)
                .unwrap_or(core::cmp::Ordering::Equal)
        });

        let mut cursor = -half_l;
        let mut left_is_core = false;
        for core in &side_cores {
            push_segment(
                &mut segments,
                band,
                cursor,
                core.rect.x,
                left_is_core,
                true,
                half_l,
                utility_threshold,
            );
            cursor = core.rect.right();
            left_is_core = true;
        }
        push_segment(
            &mut segments,
            band,
            cursor,
            half_l,
            left_is_core,
            false,
            half_l,
            utility_threshold,
        );
    }

    segments
}

#[allow(clippy::too_many_arguments)]
fn push_segment(
    segments: &mut Vec<Segment>,
    band: &RentableBand,
    start_x: f64,
    end_x: f64,
    left_is_core: bool,
    right_is_core: bool,
    half_l: f64,
    utility_threshold: f64,
) {
    let length = end_x - start_x;
    if length < 1e-9 {
        return;
    }
    segments.push(Segment {
        side: band.side,
        start_x,
        end_x,
        available_depth: band.depth,
        left_is_end: (start_x + half_l).abs() < 1e-9,
        right_is_end: (end_x - half_l).abs() < 1e-9,
        left_is_core,
        right_is_core,
        utility: length < utility_threshold,
    });
}
