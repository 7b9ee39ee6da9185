//! Post-layout geometry validation.
//!
//! Pure checks over a finished layout returning all problems found. These
//! back the engine's invariants in tests and give hosts a structured report;
//! generation itself never depends on them.

use crate::config::UnitTypeSpec;
use crate::cores::CoreBlock;
use crate::corridor::CorridorBlock;
use crate::footprint::FootprintAnalysis;
use crate::geometry::{Rect, Region};
use crate::synthesis::{UnitBlock, UtilitySpace};

const TOUCH_TOLERANCE: f64 = 0.01;

/// A layout validation finding.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub category: &'static str,
    pub severity: Severity,
    pub message: String,
}

/// Finding severity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Error,
    Warning,
}

/// Decompose a region into horizontal slab rectangles. Rectilinear polygons
/// only, which is all the engine produces.
fn region_slabs(region: &Region) -> Vec<Rect> {
    match region {
        Region::Rect(r) => vec![*r],
        Region::Polygon(vertices) => {
            let mut ys: Vec<f64> = vertices.iter().map(|v| v.y).collect();
            ys.sort_by(|a, b| a.partial_cmp(b).unwrap_or(core::cmp::Ordering::Equal));
            ys.dedup_by(|a, b| (*a - *b).abs() < 1e-9);

            let mut slabs = Vec::new();
            for pair in ys.windows(2) {
                let (y0, y1) = (pair[0], pair[1]);
                let mid = (y0 + y1) / 2.0;
                let mut xs = Vec::new();
                for i in 0..vertices.len() {
                    let a = vertices[i];
                    let b = vertices[(i + 1) % vertices.len()];
                    if (a.x - b.x).abs() < 1e-9 {
                        let (lo, hi) = (a.y.min(b.y), a.y.max(b.y));
                        if lo < mid && mid < hi {
                            xs.push(a.x);
                        }
                    }
                }
                xs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(core::cmp::Ordering::Equal));
                for span in xs.chunks(2) {
                    if span.len() == 2 && span[1] - span[0] > 1e-9 {
                        slabs.push(Rect::new(span[0], y0, span[1] - span[0], y1 - y0));
                    }
                }
            }
            slabs
        }
    }
}

/// Interior overlap between two regions, with a touching tolerance.
pub fn regions_overlap(a: &Region, b: &Region) -> bool {
    let sa = region_slabs(a);
    let sb = region_slabs(b);
    sa.iter()
        .any(|ra| sb.iter().any(|rb| ra.overlaps(rb, TOUCH_TOLERANCE)))
}

// ── A. Per-unit geometry ────────────────────────────────────────────────

/// Non-positive dimensions and per-type width bound violations.
pub fn check_unit_dimensions(
    units: &[UnitBlock],
    unit_types: &[UnitTypeSpec],
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (i, unit) in units.iter().enumerate() {
        let bounds = unit.region.bounds();
        if bounds.width <= 0.0 || bounds.depth <= 0.0 || unit.area <= 0.0 {
            errors.push(ValidationError {
                category: "unit_geometry",
                severity: Severity::Error,
                message: format!(
                    "unit #{i} ('{}') has non-positive extent {:.2}×{:.2}",
                    unit.type_key, bounds.width, bounds.depth
                ),
            });
            continue;
        }
        // L-shapes were bounded before their tabs were attached; only plain
        // rectangles are re-checked against the hard width bounds.
        if let Region::Rect(rect) = &unit.region {
            if let Some(spec) = unit_types.iter().find(|t| t.key == unit.type_key) {
                if rect.width < spec.advanced.min_width - TOUCH_TOLERANCE
                    || rect.width > spec.advanced.max_width + TOUCH_TOLERANCE
                {
                    errors.push(ValidationError {
                        category: "unit_geometry",
                        severity: Severity::Warning,
                        message: format!(
                            "unit #{i} ('{}') width {:.2} outside [{:.2}, {:.2}]",
                            unit.type_key,
                            rect.width,
                            spec.advanced.min_width,
                            spec.advanced.max_width
                        ),
                    });
                }
            }
        }
    }
    errors
}

/// Every unit stays inside the footprint.
pub fn check_units_within_bounds(
    units: &[UnitBlock],
    analysis: &FootprintAnalysis,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let outer = analysis.bounds;
    for (i, unit) in units.iter().enumerate() {
        let b = unit.region.bounds();
        if b.x < outer.x - TOUCH_TOLERANCE
            || b.y < outer.y - TOUCH_TOLERANCE
            || b.right() > outer.right() + TOUCH_TOLERANCE
            || b.top() > outer.top() + TOUCH_TOLERANCE
        {
            errors.push(ValidationError {
                category: "bounds",
                severity: Severity::Error,
                message: format!(
                    "unit #{i} ('{}') leaves the footprint: ({:.1},{:.1})→({:.1},{:.1})",
                    unit.type_key,
                    b.x,
                    b.y,
                    b.right(),
                    b.top()
                ),
            });
        }
    }
    errors
}

// ── B. Pairwise overlap ─────────────────────────────────────────────────

/// No two placed elements share interior area.
pub fn check_overlaps(
    units: &[UnitBlock],
    cores: &[CoreBlock],
    corridor: &CorridorBlock,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut regions: Vec<(String, Region)> = Vec::new();
    regions.push(("corridor".to_string(), Region::Rect(corridor.rect)));
    for (i, core) in cores.iter().enumerate() {
        regions.push((format!("core #{i}"), Region::Rect(core.rect)));
    }
    for (i, unit) in units.iter().enumerate() {
        regions.push((format!("unit #{i} ('{}')", unit.type_key), unit.region.clone()));
    }

    for i in 0..regions.len() {
        for j in (i + 1)..regions.len() {
            if regions_overlap(&regions[i].1, &regions[j].1) {
                errors.push(ValidationError {
                    category: "overlap",
                    severity: Severity::Error,
                    message: format!("{} overlaps {}", regions[i].0, regions[j].0),
                });
            }
        }
    }
    errors
}

// ── C. Coverage ─────────────────────────────────────────────────────────

/// Placed area accounts for the whole floor within the utility threshold.
pub fn check_coverage(
    units: &[UnitBlock],
    utilities: &[UtilitySpace],
    cores: &[CoreBlock],
    corridor: &CorridorBlock,
    analysis: &FootprintAnalysis,
    unit_types: &[UnitTypeSpec],
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let gross = analysis.length * analysis.depth;
    let covered: f64 = units.iter().map(|u| u.area).sum::<f64>()
        + utilities.iter().map(|u| u.area).sum::<f64>()
        + cores.iter().map(|c| c.rect.area()).sum::<f64>()
        + corridor.rect.area();

    if covered > gross + 0.5 {
        errors.push(ValidationError {
            category: "coverage",
            severity: Severity::Error,
            message: format!("placed area {covered:.1} m² exceeds gross {gross:.1} m²"),
        });
    }

    let threshold = unit_types
        .iter()
        .filter(|t| t.target_percentage > 0.0)
        .map(|t| t.advanced.min_width)
        .fold(f64::MAX, f64::min)
        * analysis.band_depth;
    let gap = gross - covered;
    if gap > threshold {
        errors.push(ValidationError {
            category: "coverage",
            severity: Severity::Warning,
            message: format!("{gap:.1} m² of the floor is unaccounted for"),
        });
    }
    errors
}

// ── Master validation ───────────────────────────────────────────────────

/// Run every layout check and return the combined findings.
pub fn validate_layout(
    units: &[UnitBlock],
    utilities: &[UtilitySpace],
    cores: &[CoreBlock],
    corridor: &CorridorBlock,
    analysis: &FootprintAnalysis,
    unit_types: &[UnitTypeSpec],
) -> Vec<ValidationError> {
    let mut all = Vec::new();
    all.extend(check_unit_dimensions(units, unit_types));
    all.extend(check_units_within_bounds(units, analysis));
    all.extend(check_overlaps(units, cores, corridor));
    all.extend(check_coverage(
        units, utilities, cores, corridor, analysis, unit_types,
    ));
    all
}
