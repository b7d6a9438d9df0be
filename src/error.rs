//! Errors raised while constructing the attack tables.
//!
//! Every variant describes a construction defect. Once a build has returned
//! `Ok`, lookups cannot fail.

use crate::types::Slider;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// Two different attack sets hashed to the same bucket
    #[error("{slider} magic for square {square} maps distinct attack sets to bucket {bucket}")]
    MagicCollision { slider: Slider, square: u8, bucket: usize },

    #[error("{slider} square {square} produced more than {capacity} distinct attack sets")]
    PatternOverflow { slider: Slider, square: u8, capacity: usize },

    #[error("{slider} square {square} has {found} distinct attack sets, expected {expected}")]
    PatternCount {
        slider: Slider,
        square: u8,
        expected: usize,
        found: usize,
    },

    #[error("{slider} lookup on square {square} with occupancy {occupancy:#018x} returned {found:#018x}, expected {expected:#018x}")]
    VerificationFailed {
        slider: Slider,
        square: u8,
        occupancy: u64,
        expected: u64,
        found: u64,
    },

    #[error("no {slider} magic found for square {square} after {attempts} candidates")]
    MagicNotFound { slider: Slider, square: u8, attempts: u64 },

    #[error("{slider} table on square {square} was built with mask {found:#018x}, expected {expected:#018x}")]
    MaskMismatch {
        slider: Slider,
        square: u8,
        expected: u64,
        found: u64,
    },
}

/// Result type alias for table construction
pub type BuildResult<T> = Result<T, BuildError>;
