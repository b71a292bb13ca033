//! Feature records delivered by the feature-extraction collaborator

use serde::{Deserialize, Serialize};

/// Feature fields requested from the extraction collaborator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureSet {
    /// RMS loudness
    pub loudness: bool,
    /// Magnitude spectrum (needed for spectral flux)
    pub amplitude_spectrum: bool,
    /// Spectral centroid in Hz
    pub spectral_centroid: bool,
    /// 12-bin chroma
    pub chroma: bool,
    /// Zero-crossing rate
    pub zero_crossing_rate: bool,
    /// Spectral rolloff in Hz
    pub spectral_rolloff: bool,
    /// Perceptual sharpness
    pub perceptual_sharpness: bool,
    /// Timbre descriptor; requested by keys/wind/strings but not consumed here
    pub timbre: bool,
}

/// One feature record for one audio processing block
///
/// Fields absent from the category's requested set are `None`. The JSON shape uses
/// the collaborator's camelCase keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeatureFrame {
    /// RMS loudness
    pub loudness: Option<f32>,

    /// Magnitude spectrum
    pub amplitude_spectrum: Option<Vec<f32>>,

    /// Spectral centroid in Hz
    pub spectral_centroid: Option<f32>,

    /// 12-bin chroma (C … B)
    pub chroma: Option<[f32; 12]>,

    /// Zero crossings per sample
    pub zero_crossing_rate: Option<f32>,

    /// Spectral rolloff in Hz
    pub spectral_rolloff: Option<f32>,

    /// Perceptual sharpness
    pub perceptual_sharpness: Option<f32>,
}

/// A feature frame together with the pitch estimate taken at the same moment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureRecord {
    /// Spectral/timbral features
    pub frame: FeatureFrame,

    /// Fundamental frequency in Hz, when the waveform had a detectable pitch
    pub fundamental_hz: Option<f32>,
}

impl FeatureRecord {
    /// Pair a frame with an optional pitch estimate
    pub fn new(frame: FeatureFrame, fundamental_hz: Option<f32>) -> Self {
        Self {
            frame,
            fundamental_hz,
        }
    }
}

/// Index of the strongest chroma bin (first bin wins ties)
pub fn dominant_chroma_bin(chroma: &[f32; 12]) -> usize {
    let mut best = 0;
    for (i, &value) in chroma.iter().enumerate() {
        if value > chroma[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dominant_chroma_bin_first_wins() {
        let mut chroma = [0.0; 12];
        chroma[4] = 1.0;
        chroma[9] = 1.0;
        assert_eq!(dominant_chroma_bin(&chroma), 4);
        assert_eq!(dominant_chroma_bin(&[0.0; 12]), 0);
    }

    #[test]
    fn test_frame_deserializes_camel_case_subset() {
        let json = r#"{"loudness":0.2,"spectralCentroid":850.0,"zeroCrossingRate":0.1}"#;
        let frame: FeatureFrame = serde_json::from_str(json).unwrap();
        assert_eq!(frame.loudness, Some(0.2));
        assert_eq!(frame.spectral_centroid, Some(850.0));
        assert_eq!(frame.zero_crossing_rate, Some(0.1));
        assert!(frame.chroma.is_none());
        assert!(frame.amplitude_spectrum.is_none());
    }
}
