//! Footprint analysis — derive the usable local-frame interior.
//!
//! Everything downstream works on this analysis rather than the raw host
//! footprint: the building centered at the origin, corridor axis along x.

use crate::config::{CoreConfig, CorridorConfig, Footprint, UnitTypeSpec};
use crate::error::CoreError;
use crate::geometry::{HostTransform, Rect};

/// Usable interior derived from the outer rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct FootprintAnalysis {
    /// Building extent along the corridor.
    pub length: f64,
    /// Building extent across the corridor.
    pub depth: f64,
    /// Depth of each rentable band beside the corridor.
    pub band_depth: f64,
    /// Shallowest band any configured unit type can live in.
    pub min_rentable_depth: f64,
    /// Local-frame outer bounds, centered at the origin.
    pub bounds: Rect,
    /// Transform placing the local frame back into the host world.
    pub transform: HostTransform,
}

impl FootprintAnalysis {
    pub fn half_length(&self) -> f64 {
        self.length / 2.0
    }

    pub fn half_depth(&self) -> f64 {
        self.depth / 2.0
    }
}

/// Analyze the footprint against the corridor, core, and mix configuration.
pub fn analyze(
    footprint: &Footprint,
    corridor: &CorridorConfig,
    cores: &CoreConfig,
    unit_types: &[UnitTypeSpec],
) -> Result<FootprintAnalysis, CoreError> {
    if footprint.length <= 0.0 || footprint.depth <= 0.0 {
        return Err(CoreError::InvalidFootprint(format!(
            "dimensions must be positive, got {:.2}×{:.2}",
            footprint.length, footprint.depth
        )));
    }

    // The shallowest band that still yields a legal unit: smallest area at
    // its widest legal frontage.
    let min_rentable_depth = unit_types
        .iter()
        .filter(|t| t.target_percentage > 0.0)
        .map(|t| t.target_area / t.advanced.max_width)
        .fold(f64::MAX, f64::min);
    if min_rentable_depth == f64::MAX {
        return Err(CoreError::InvalidUnitMix(
            "no unit type has a positive percentage".into(),
        ));
    }

    let band_depth = (footprint.depth - corridor.width) / 2.0;
    let required = 2.0 * min_rentable_depth + corridor.width;
    if footprint.depth < required {
        return Err(CoreError::InvalidFootprint(format!(
            "depth {:.2} too shallow for a double-loaded corridor; needs {:.2}",
            footprint.depth, required
        )));
    }
    if cores.depth > band_depth {
        return Err(CoreError::InvalidFootprint(format!(
            "core depth {:.2} exceeds rentable band depth {:.2}",
            cores.depth, band_depth
        )));
    }

    Ok(FootprintAnalysis {
        length: footprint.length,
        depth: footprint.depth,
        band_depth,
        min_rentable_depth,
        bounds: Rect::from_center(0.0, 0.0, footprint.length, footprint.depth),
        transform: HostTransform {
            translate_x: footprint.center_x,
            translate_y: footprint.center_y,
            rotation: footprint.rotation,
            floor_z: footprint.floor_z,
        },
    })
}
