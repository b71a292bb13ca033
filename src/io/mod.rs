//! Audio I/O modules
//!
//! File decoding with Symphonia and the rolling waveform window used for pitch
//! estimation.

pub mod decoder;
pub mod sample_buffer;

pub use decoder::decode_audio;
pub use sample_buffer::RollingWaveform;
