//! Generation input: footprint, unit mix, corridor/core dimensions, egress
//! limits.
//!
//! Plain serde structs with no host dependency. `validate_input` checks the
//! whole configuration up front and reports every problem it can find:
//! unusable input becomes a [`CoreError`], recoverable oddities become
//! warnings carried onto the generated layouts.
//!
//! All lengths are meters, areas m². The engine treats unit types uniformly
//! through their string keys; nothing downstream knows about studios or
//! bedrooms.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::strategy::StrategyKind;

/// Which side of the corridor an element sits on. North is +y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    North,
    South,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::North => Side::South,
            Side::South => Side::North,
        }
    }
}

/// Rectangular building footprint as supplied by the host.
///
/// `length` runs along the corridor (local x), `depth` across it (local y).
/// Center, rotation, and elevation only feed the output transform; the whole
/// pipeline works in the centered, axis-aligned local frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub length: f64,
    pub depth: f64,
    pub center_x: f64,
    pub center_y: f64,
    /// Rotation about Z in radians.
    pub rotation: f64,
    pub floor_z: f64,
}

/// Per-type placement behavior knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedSettings {
    /// May occupy a corridor-end or outer-corner slot.
    pub corner_eligible: bool,
    /// May be synthesized as an L-shape at ends.
    pub l_shape_eligible: bool,
    /// Max permissible width deviation from ideal, percent (0–50).
    pub size_tolerance: f64,
    /// Hard width bounds, meters.
    pub min_width: f64,
    pub max_width: f64,
    /// Tiebreak score, 1–100; higher is placed first into premium slots.
    pub placement_priority: u32,
    /// Relative share absorbed when a segment must be stretched.
    pub expansion_weight: f64,
    /// Relative share absorbed when a segment must be compressed.
    pub compression_weight: f64,
}

impl Default for AdvancedSettings {
    fn default() -> Self {
        Self {
            corner_eligible: true,
            l_shape_eligible: false,
            size_tolerance: 15.0,
            min_width: 3.0,
            max_width: 20.0,
            placement_priority: 50,
            expansion_weight: 1.0,
            compression_weight: 1.0,
        }
    }
}

impl AdvancedSettings {
    /// Tolerance as a fraction of ideal width, clamped into the legal range.
    pub fn tolerance_fraction(&self) -> f64 {
        self.size_tolerance.clamp(0.0, 50.0) / 100.0
    }
}

/// One apartment type in the mix, identified by a stable string key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitTypeSpec {
    pub key: String,
    pub display_name: String,
    /// Target floor area, m².
    pub target_area: f64,
    /// Target share of the unit count, 0–100.
    pub target_percentage: f64,
    /// Opaque display color for the host (e.g. "#4C9F70").
    pub color: String,
    pub advanced: AdvancedSettings,
}

impl UnitTypeSpec {
    /// Ideal corridor frontage for a band of the given depth.
    pub fn ideal_width(&self, band_depth: f64) -> f64 {
        self.target_area / band_depth
    }
}

/// Fire-egress limits, meters. Defaults are the common sprinklered values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EgressConfig {
    pub sprinklered: bool,
    pub dead_end_limit: f64,
    pub travel_distance_limit: f64,
    pub common_path_limit: f64,
    /// Multiplier on unit depth in the common-path heuristic. Jurisdictions
    /// differ; 1.2 is the customary value.
    pub common_path_depth_factor: f64,
    /// Hard cap on total cores before giving up as infeasible.
    pub max_cores: usize,
}

impl Default for EgressConfig {
    fn default() -> Self {
        Self {
            sprinklered: true,
            dead_end_limit: 15.24,
            travel_distance_limit: 76.2,
            common_path_limit: 38.1,
            common_path_depth_factor: 1.2,
            max_cores: 5,
        }
    }
}

impl EgressConfig {
    /// Required exit separation as a fraction of the floor diagonal.
    pub fn separation_fraction(&self) -> f64 {
        if self.sprinklered {
            1.0 / 3.0
        } else {
            1.0 / 2.0
        }
    }
}

/// Corridor dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorridorConfig {
    pub width: f64,
}

impl Default for CorridorConfig {
    fn default() -> Self {
        Self { width: 1.52 }
    }
}

/// Vertical-circulation core dimensions and side preference.
///
/// `width` runs along the corridor, `depth` perpendicular into the rentable
/// band on the chosen side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoreConfig {
    pub width: f64,
    pub depth: f64,
    pub side: Side,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            width: 3.66,
            depth: 7.62,
            side: Side::North,
        }
    }
}

/// Everything `generate` consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateInput {
    pub footprint: Footprint,
    pub unit_types: Vec<UnitTypeSpec>,
    pub corridor: CorridorConfig,
    pub cores: CoreConfig,
    pub egress: EgressConfig,
    /// How aggressively the alignment pass snaps walls, 0–1.
    pub alignment_strictness: f64,
    /// Strategies to run; empty means all three.
    pub strategies: Vec<StrategyKind>,
}

// ── Input validation ────────────────────────────────────────────────────

/// Validate the full input. Fatal problems return an error; survivable ones
/// come back as warnings for the layouts to carry.
pub fn validate_input(input: &GenerateInput) -> Result<Vec<String>, CoreError> {
    if input.footprint.length <= 0.0 || input.footprint.depth <= 0.0 {
        return Err(CoreError::InvalidFootprint(format!(
            "dimensions must be positive, got {:.2}×{:.2}",
            input.footprint.length, input.footprint.depth
        )));
    }
    if input.corridor.width <= 0.0 {
        return Err(CoreError::InvalidFootprint(format!(
            "corridor width must be positive, got {:.2}",
            input.corridor.width
        )));
    }
    if input.cores.width <= 0.0 || input.cores.depth <= 0.0 {
        return Err(CoreError::InvalidFootprint(format!(
            "core dimensions must be positive, got {:.2}×{:.2}",
            input.cores.width, input.cores.depth
        )));
    }

    if input.unit_types.is_empty() {
        return Err(CoreError::InvalidUnitMix("no unit types configured".into()));
    }
    let mut seen = std::collections::HashSet::new();
    for spec in &input.unit_types {
        if !seen.insert(spec.key.as_str()) {
            return Err(CoreError::InvalidUnitMix(format!(
                "duplicate unit type key '{}'",
                spec.key
            )));
        }
        if spec.target_area <= 0.0 {
            return Err(CoreError::InvalidUnitMix(format!(
                "type '{}' has non-positive area {:.2}",
                spec.key, spec.target_area
            )));
        }
        if spec.target_percentage < 0.0 {
            return Err(CoreError::InvalidUnitMix(format!(
                "type '{}' has negative percentage {:.2}",
                spec.key, spec.target_percentage
            )));
        }
        if spec.advanced.min_width <= 0.0 || spec.advanced.min_width > spec.advanced.max_width {
            return Err(CoreError::InvalidUnitMix(format!(
                "type '{}' has invalid width bounds [{:.2}, {:.2}]",
                spec.key, spec.advanced.min_width, spec.advanced.max_width
            )));
        }
    }
    let total_pct: f64 = input.unit_types.iter().map(|t| t.target_percentage).sum();
    if total_pct <= 0.0 {
        return Err(CoreError::InvalidUnitMix(
            "no unit type has a positive percentage".into(),
        ));
    }

    let mut warnings = Vec::new();
    if (total_pct - 100.0).abs() > 0.01 {
        warnings.push(format!(
            "unit mix percentages sum to {total_pct:.1}, not 100; using proportional shares"
        ));
    }
    for spec in &input.unit_types {
        if spec.advanced.size_tolerance < 0.0 || spec.advanced.size_tolerance > 50.0 {
            warnings.push(format!(
                "type '{}' tolerance {:.1}% outside 0–50%, clamped",
                spec.key, spec.advanced.size_tolerance
            ));
        }
    }
    if !(0.0..=1.0).contains(&input.alignment_strictness) {
        warnings.push(format!(
            "alignment strictness {:.2} outside 0–1, clamped",
            input.alignment_strictness
        ));
    }
    Ok(warnings)
}

/// Percentages normalized to fractions summing to 1, in input order.
///
/// Callers must have validated that at least one percentage is positive.
pub fn normalized_shares(unit_types: &[UnitTypeSpec]) -> Vec<f64> {
    let total: f64 = unit_types.iter().map(|t| t.target_percentage.max(0.0)).sum();
    unit_types
        .iter()
        .map(|t| t.target_percentage.max(0.0) / total)
        .collect()
}

// ── Standard mix preset ─────────────────────────────────────────────────

/// The conventional four-type rental mix. Convenience for hosts and the
/// harness; the engine itself never special-cases these keys.
pub fn standard_mix() -> Vec<UnitTypeSpec> {
    vec![
        UnitTypeSpec {
            key: "studio".into(),
            display_name: "Studio".into(),
            target_area: 54.8,
            target_percentage: 20.0,
            color: "#8DA9C4".into(),
            advanced: AdvancedSettings {
                corner_eligible: false,
                l_shape_eligible: false,
                size_tolerance: 10.0,
                min_width: 4.5,
                max_width: 7.5,
                placement_priority: 20,
                expansion_weight: 1.0,
                compression_weight: 0.5,
            },
        },
        UnitTypeSpec {
            key: "one_bed".into(),
            display_name: "1 Bedroom".into(),
            target_area: 82.2,
            target_percentage: 40.0,
            color: "#60935D".into(),
            advanced: AdvancedSettings {
                corner_eligible: true,
                l_shape_eligible: false,
                size_tolerance: 15.0,
                min_width: 6.5,
                max_width: 12.0,
                placement_priority: 40,
                expansion_weight: 1.2,
                compression_weight: 1.0,
            },
        },
        UnitTypeSpec {
            key: "two_bed".into(),
            display_name: "2 Bedroom".into(),
            target_area: 109.6,
            target_percentage: 30.0,
            color: "#BB7E5D".into(),
            advanced: AdvancedSettings {
                corner_eligible: true,
                l_shape_eligible: true,
                size_tolerance: 15.0,
                min_width: 9.0,
                max_width: 15.0,
                placement_priority: 60,
                expansion_weight: 1.5,
                compression_weight: 1.5,
            },
        },
        UnitTypeSpec {
            key: "three_bed".into(),
            display_name: "3 Bedroom".into(),
            target_area: 137.0,
            target_percentage: 10.0,
            color: "#A63A50".into(),
            advanced: AdvancedSettings {
                corner_eligible: true,
                l_shape_eligible: true,
                size_tolerance: 20.0,
                min_width: 11.0,
                max_width: 18.5,
                placement_priority: 80,
                expansion_weight: 2.0,
                compression_weight: 2.0,
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_input() -> GenerateInput {
        GenerateInput {
            footprint: Footprint {
                length: 91.44,
                depth: 19.81,
                center_x: 0.0,
                center_y: 0.0,
                rotation: 0.0,
                floor_z: 0.0,
            },
            unit_types: standard_mix(),
            corridor: CorridorConfig::default(),
            cores: CoreConfig::default(),
            egress: EgressConfig::default(),
            alignment_strictness: 0.5,
            strategies: Vec::new(),
        }
    }

    #[test]
    fn standard_input_is_valid() {
        let warnings = validate_input(&base_input()).expect("valid input");
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    }

    #[test]
    fn negative_footprint_rejected() {
        let mut input = base_input();
        input.footprint.depth = -1.0;
        assert!(matches!(
            validate_input(&input),
            Err(CoreError::InvalidFootprint(_))
        ));
    }

    #[test]
    fn empty_mix_rejected() {
        let mut input = base_input();
        input.unit_types.clear();
        assert!(matches!(
            validate_input(&input),
            Err(CoreError::InvalidUnitMix(_))
        ));
    }

    #[test]
    fn zero_percentages_rejected() {
        let mut input = base_input();
        for t in &mut input.unit_types {
            t.target_percentage = 0.0;
        }
        assert!(matches!(
            validate_input(&input),
            Err(CoreError::InvalidUnitMix(_))
        ));
    }

    #[test]
    fn inverted_width_bounds_rejected() {
        let mut input = base_input();
        input.unit_types[0].advanced.min_width = 9.0;
        input.unit_types[0].advanced.max_width = 5.0;
        assert!(matches!(
            validate_input(&input),
            Err(CoreError::InvalidUnitMix(_))
        ));
    }

    #[test]
    fn duplicate_keys_rejected() {
        let mut input = base_input();
        let clone = input.unit_types[0].clone();
        input.unit_types.push(clone);
        assert!(matches!(
            validate_input(&input),
            Err(CoreError::InvalidUnitMix(_))
        ));
    }

    #[test]
    fn off_hundred_mix_warns_but_passes() {
        let mut input = base_input();
        input.unit_types[0].target_percentage = 35.0; // sum = 115
        let warnings = validate_input(&input).expect("still valid");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("115"));
    }

    #[test]
    fn shares_normalize_off_hundred_sums() {
        let mut types = standard_mix();
        types[0].target_percentage = 35.0; // 35/115
        let shares = normalized_shares(&types);
        assert!((shares.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!((shares[0] - 35.0 / 115.0).abs() < 1e-12);
    }

    #[test]
    fn tolerance_fraction_clamps() {
        let mut adv = AdvancedSettings::default();
        adv.size_tolerance = 80.0;
        assert_eq!(adv.tolerance_fraction(), 0.5);
        adv.size_tolerance = -3.0;
        assert_eq!(adv.tolerance_fraction(), 0.0);
    }

    #[test]
    fn separation_fraction_by_sprinkler() {
        let mut egress = EgressConfig::default();
        assert!((egress.separation_fraction() - 1.0 / 3.0).abs() < 1e-12);
        egress.sprinklered = false;
        assert!((egress.separation_fraction() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn standard_mix_sums_to_hundred() {
        let total: f64 = standard_mix().iter().map(|t| t.target_percentage).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }
}
