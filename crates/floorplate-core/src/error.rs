//! Engine error type.
//!
//! All failures are returned, never panicked. Category 1 (refused input) and
//! category 2 (infeasible) short-circuit generation; degraded-but-produced
//! outcomes are warnings on the layout instead.

use thiserror::Error;

/// Fatal generation error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// Footprint dimensions non-positive or too narrow for a double-loaded
    /// corridor.
    #[error("invalid footprint: {0}")]
    InvalidFootprint(String),

    /// Unit mix unusable: no positive-percentage type, non-positive area, or
    /// inverted width bounds.
    #[error("invalid unit mix: {0}")]
    InvalidUnitMix(String),

    /// Egress limits cannot be satisfied within the core-count cap.
    #[error(
        "egress infeasible: {constraint} measured {measured:.2} m against limit {limit:.2} m \
         with {cores} cores"
    )]
    EgressInfeasible {
        /// Which limit failed ("exit separation" or "travel distance").
        constraint: &'static str,
        measured: f64,
        limit: f64,
        cores: usize,
    },

    /// Building too small to admit a single unit of any configured type.
    #[error("degenerate layout: {0}")]
    Degenerate(String),
}
