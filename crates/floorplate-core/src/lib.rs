//! Pure floorplate generation engine for multifamily residential buildings.
//!
//! This crate contains the whole layout pipeline, independent of any host,
//! renderer, or runtime. Functions take plain data and return results,
//! making them unit-testable and portable: the host hands over a footprint
//! and a unit mix, and gets back up to three complete corridor/core/unit
//! layouts with compliance metrics.
//!
//! ```
//! use floorplate_core::{generate, standard_mix, Footprint, GenerateInput};
//! use floorplate_core::{CoreConfig, CorridorConfig, EgressConfig};
//!
//! let input = GenerateInput {
//!     footprint: Footprint {
//!         length: 91.44,
//!         depth: 19.81,
//!         center_x: 0.0,
//!         center_y: 0.0,
//!         rotation: 0.0,
//!         floor_z: 0.0,
//!     },
//!     unit_types: standard_mix(),
//!     corridor: CorridorConfig::default(),
//!     cores: CoreConfig::default(),
//!     egress: EgressConfig::default(),
//!     alignment_strictness: 0.5,
//!     strategies: Vec::new(), // all three
//! };
//! let options = generate(&input).expect("feasible layout");
//! assert_eq!(options.len(), 3);
//! ```

pub mod alignment;
pub mod allocation;
pub mod config;
pub mod cores;
pub mod corridor;
pub mod distribution;
pub mod egress;
pub mod error;
pub mod footprint;
pub mod geometry;
pub mod metrics;
pub mod pipeline;
pub mod segments;
pub mod strategy;
pub mod synthesis;
pub mod validation;

pub use config::{
    standard_mix, AdvancedSettings, CoreConfig, CorridorConfig, EgressConfig, Footprint,
    GenerateInput, Side, UnitTypeSpec,
};
pub use cores::{CoreBlock, CoreKind};
pub use corridor::CorridorBlock;
pub use egress::{EgressMetric, EgressReport};
pub use error::CoreError;
pub use geometry::{HostTransform, Point, Rect, Region};
pub use metrics::{LayoutStats, MixEntry};
pub use pipeline::{generate, LayoutOption};
pub use strategy::{OrderingPattern, StrategyKind};
pub use synthesis::{PlacementKind, UnitBlock, UtilitySpace};
