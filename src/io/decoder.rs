//! Audio decoding using Symphonia

use crate::error::TranscriptionError;
use crate::preprocessing::channel_mixer::{downmix, ChannelMixMode};
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Decode an audio file to mono `f32` samples
///
/// Multichannel audio is averaged to mono. Corrupted packets are skipped.
///
/// # Arguments
///
/// * `path` - Path to audio file (format probed from content, extension used as hint)
///
/// # Returns
///
/// Tuple of (mono samples, sample_rate)
///
/// # Errors
///
/// `DecodingError` if the file cannot be opened, probed or decoded
pub fn decode_audio(path: impl AsRef<Path>) -> Result<(Vec<f32>, u32), TranscriptionError> {
    let path = path.as_ref();
    log::debug!("Decoding audio file: {}", path.display());

    let file = File::open(path).map_err(|e| {
        TranscriptionError::DecodingError(format!("Cannot open {}: {}", path.display(), e))
    })?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| TranscriptionError::DecodingError(format!("Unsupported format: {}", e)))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| {
            TranscriptionError::DecodingError("No supported audio tracks found".to_string())
        })?;
    let track_id = track.id;
    let sample_rate = track.codec_params.sample_rate.ok_or_else(|| {
        TranscriptionError::DecodingError("Track has no sample rate".to_string())
    })?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| TranscriptionError::DecodingError(format!("Unsupported codec: {}", e)))?;

    let mut samples: Vec<f32> = Vec::new();
    let mut interleaved: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(_)) => break,
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => {
                return Err(TranscriptionError::DecodingError(format!(
                    "Failed to read packet: {}",
                    e
                )))
            }
        };
        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                let buffer = interleaved.get_or_insert_with(|| {
                    SampleBuffer::new(decoded.capacity() as u64, spec)
                });
                if buffer.capacity() < decoded.capacity() * spec.channels.count() {
                    *buffer = SampleBuffer::new(decoded.capacity() as u64, spec);
                }
                buffer.copy_interleaved_ref(decoded);
                samples.extend(downmix(
                    buffer.samples(),
                    spec.channels.count(),
                    ChannelMixMode::Mono,
                ));
            }
            Err(SymphoniaError::DecodeError(msg)) => {
                log::warn!("Skipping corrupted packet: {}", msg);
            }
            Err(e) => {
                return Err(TranscriptionError::DecodingError(format!(
                    "Decode failed: {}",
                    e
                )))
            }
        }
    }

    log::debug!(
        "Decoded {} samples at {} Hz ({:.2}s)",
        samples.len(),
        sample_rate,
        samples.len() as f64 / sample_rate as f64
    );
    Ok((samples, sample_rate))
}
