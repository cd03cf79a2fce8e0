//! Errors surfaced while building a simulation.

use thiserror::Error;

/// Rejected configuration. Construction produces no partial state when this
/// is returned.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    /// The domain needs at least one raster cell in each direction.
    #[error("invalid domain dimensions {width}x{height}: both must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// A radius, force limit or speed limit is negative or not finite.
    #[error("invalid configuration: {name} = {value} (must be finite and non-negative)")]
    InvalidParameter { name: &'static str, value: f32 },

    /// A strength or scale factor is not finite.
    #[error("invalid configuration: {name} = {value} (must be finite)")]
    NonFinite { name: &'static str, value: f32 },

    #[error("invalid hotzone #{index}: {reason}")]
    InvalidHotzone { index: usize, reason: &'static str },
}
