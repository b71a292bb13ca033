//! Feature extraction and aggregation modules
//!
//! This module contains the per-block analysis pipeline:
//! - Feature records and the offline feature extractor
//! - Spectral flux (onset activity)
//! - Autocorrelation pitch estimation
//! - Per-measure slice buffering
//! - Key and mode detection

pub mod buffer;
pub mod extractor;
pub mod frame;
pub mod key;
pub mod onset;
pub mod pitch;

pub use buffer::{FeatureBuffer, SealedMeasure, SliceAverages};
pub use extractor::FeatureExtractor;
pub use frame::{FeatureFrame, FeatureRecord, FeatureSet};
pub use pitch::PitchEstimator;
