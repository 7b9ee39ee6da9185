//! Corridor placement.
//!
//! One straight double-loaded corridor centered on y=0 running the full
//! building length. L-shape synthesis may later shorten it at the ends when
//! an end unit wraps around it.

use serde::{Deserialize, Serialize};

use crate::config::{CorridorConfig, Side};
use crate::footprint::FootprintAnalysis;
use crate::geometry::Rect;

/// The central corridor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorridorBlock {
    pub rect: Rect,
}

impl CorridorBlock {
    pub fn start_x(&self) -> f64 {
        self.rect.x
    }

    pub fn end_x(&self) -> f64 {
        self.rect.right()
    }

    /// Pull the left end in by `amount` (end-wrap tab).
    pub fn shorten_left(&mut self, amount: f64) {
        self.rect.x += amount;
        self.rect.width -= amount;
    }

    /// Pull the right end in by `amount`.
    pub fn shorten_right(&mut self, amount: f64) {
        self.rect.width -= amount;
    }
}

/// One rentable strip beside the corridor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RentableBand {
    pub side: Side,
    /// Min-y of the band.
    pub y: f64,
    pub depth: f64,
}

/// Build the corridor and its two rentable bands.
pub fn build_corridor(
    analysis: &FootprintAnalysis,
    corridor: &CorridorConfig,
) -> (CorridorBlock, [RentableBand; 2]) {
    let half_w = corridor.width / 2.0;
    let block = CorridorBlock {
        rect: Rect::new(
            -analysis.half_length(),
            -half_w,
            analysis.length,
            corridor.width,
        ),
    };
    let bands = [
        RentableBand {
            side: Side::North,
            y: half_w,
            depth: analysis.band_depth,
        },
        RentableBand {
            side: Side::South,
            y: -analysis.half_depth(),
            depth: analysis.band_depth,
        },
    ];
    (block, bands)
}
