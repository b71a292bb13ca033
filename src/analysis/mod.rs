//! Musical vocabulary and transcription results
//!
//! - Pitch classes, modes and frequency conversions
//! - Instrument identifiers and families
//! - Notes, measures and layers

pub mod instrument;
pub mod pitch_class;
pub mod result;
