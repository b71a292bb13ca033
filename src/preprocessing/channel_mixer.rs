//! Channel mixing utilities (multichannel to mono conversion)

/// Channel mixing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelMixMode {
    /// Average of all channels
    #[default]
    Mono,
    /// Keep the first channel only
    First,
    /// Per frame, keep the sample with the largest magnitude
    Dominant,
}

/// Convert interleaved multichannel samples to mono
///
/// # Arguments
///
/// * `interleaved` - Samples laid out frame by frame (`L R L R …` for stereo)
/// * `channels` - Channel count (a trailing partial frame is dropped)
/// * `mode` - Mixing mode
pub fn downmix(interleaved: &[f32], channels: usize, mode: ChannelMixMode) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| match mode {
            ChannelMixMode::Mono => frame.iter().sum::<f32>() / channels as f32,
            ChannelMixMode::First => frame[0],
            ChannelMixMode::Dominant => frame
                .iter()
                .copied()
                .fold(0.0f32, |acc, x| if x.abs() > acc.abs() { x } else { acc }),
        })
        .collect()
}
