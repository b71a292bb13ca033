//! Key and mode detection
//!
//! - Song tonic from a running pitch-class histogram
//! - Per-measure mode from binary modal templates

pub mod detector;
pub mod templates;

pub use detector::{detect_mode, KeyModeDetector};
pub use templates::ModeTemplates;
