//! Audio preprocessing modules
//!
//! This module contains utilities for preparing audio for analysis:
//! - Window normalization (peak, 8-bit analyser bytes)
//! - Silence gating and edge trimming
//! - Channel mixing (multichannel to mono)

pub mod channel_mixer;
pub mod normalization;
pub mod silence;
