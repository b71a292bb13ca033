//! Onset/activity features
//!
//! - Spectral flux (streaming, one spectrum at a time)

pub mod spectral_flux;

pub use spectral_flux::SpectralFlux;
