//! Time-quantized feature accumulation
//!
//! Every feature record lands in the (measure, subdivision) slice selected by the
//! playback clock. When the clock crosses into a new measure, the previous measure's
//! slices are averaged and handed out for classification.

use super::frame::{FeatureFrame, FeatureRecord};
use super::onset::SpectralFlux;
use std::collections::BTreeMap;

/// Grid position of a moment in playback time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlicePosition {
    /// Zero-based measure index
    pub measure: usize,
    /// Subdivision within the measure, in `[0, subdivisions)`
    pub subdivision: usize,
}

/// Quantize elapsed seconds into a measure/subdivision position
///
/// # Example
///
/// ```
/// use scorelens::features::buffer::locate;
///
/// // 120 BPM, 4 beats → 2 s measures
/// let pos = locate(2.1, 2.0, 8);
/// assert_eq!((pos.measure, pos.subdivision), (1, 0));
/// ```
pub fn locate(elapsed: f64, measure_duration: f64, subdivisions: usize) -> SlicePosition {
    let elapsed = elapsed.max(0.0);
    let measure = (elapsed / measure_duration).floor() as usize;
    let time_in_measure = elapsed - measure as f64 * measure_duration;
    let raw = ((time_in_measure / measure_duration) * subdivisions as f64).floor();
    let subdivision = (raw.max(0.0) as usize).min(subdivisions.saturating_sub(1));
    SlicePosition {
        measure,
        subdivision,
    }
}

/// Raw feature samples collected for one subdivision slice
#[derive(Debug, Clone, Default)]
pub struct SliceAccumulator {
    loudness: Vec<f32>,
    centroid: Vec<f32>,
    chroma: Vec<[f32; 12]>,
    rolloff: Vec<f32>,
    zero_crossing_rate: Vec<f32>,
    sharpness: Vec<f32>,
    flux: Vec<f32>,
    pitch_hz: Vec<f32>,
}

impl SliceAccumulator {
    /// Append every present field of a frame
    pub fn push_frame(&mut self, frame: &FeatureFrame) {
        if let Some(v) = frame.loudness {
            self.loudness.push(v);
        }
        if let Some(v) = frame.spectral_centroid {
            self.centroid.push(v);
        }
        if let Some(v) = frame.spectral_rolloff {
            self.rolloff.push(v);
        }
        if let Some(v) = frame.chroma {
            self.chroma.push(v);
        }
        if let Some(v) = frame.zero_crossing_rate {
            self.zero_crossing_rate.push(v);
        }
        if let Some(v) = frame.perceptual_sharpness {
            self.sharpness.push(v);
        }
    }

    /// Append a spectral flux value
    pub fn push_flux(&mut self, flux: f32) {
        self.flux.push(flux);
    }

    /// Append a fundamental frequency estimate
    pub fn push_pitch(&mut self, hz: f32) {
        self.pitch_hz.push(hz);
    }

    /// Whether nothing has been collected
    pub fn is_empty(&self) -> bool {
        self.loudness.is_empty()
            && self.centroid.is_empty()
            && self.chroma.is_empty()
            && self.rolloff.is_empty()
            && self.zero_crossing_rate.is_empty()
            && self.sharpness.is_empty()
            && self.flux.is_empty()
            && self.pitch_hz.is_empty()
    }

    /// Reduce the collected samples to per-slice averages
    ///
    /// Empty scalar lists average to 0; pitch and chroma are `None` when nothing
    /// was collected.
    pub fn averages(&self, slice_index: usize) -> SliceAverages {
        SliceAverages {
            slice_index,
            loudness: average(&self.loudness),
            centroid: average(&self.centroid),
            flux: average(&self.flux),
            zero_crossing_rate: average(&self.zero_crossing_rate),
            sharpness: average(&self.sharpness),
            rolloff: average(&self.rolloff),
            fundamental_hz: if self.pitch_hz.is_empty() {
                None
            } else {
                Some(average(&self.pitch_hz))
            },
            chroma: average_chroma(&self.chroma),
        }
    }
}

/// Averaged features of one subdivision slice, the classifier input
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SliceAverages {
    /// Subdivision index
    pub slice_index: usize,
    /// Mean RMS loudness
    pub loudness: f32,
    /// Mean spectral centroid (Hz)
    pub centroid: f32,
    /// Mean spectral flux
    pub flux: f32,
    /// Mean zero-crossing rate
    pub zero_crossing_rate: f32,
    /// Mean perceptual sharpness
    pub sharpness: f32,
    /// Mean spectral rolloff (Hz)
    pub rolloff: f32,
    /// Mean fundamental frequency, if any estimate arrived
    pub fundamental_hz: Option<f32>,
    /// Mean chroma vector, if any chroma arrived
    pub chroma: Option<[f32; 12]>,
}

/// Averaged slices of a measure whose boundary has been crossed
#[derive(Debug, Clone)]
pub struct SealedMeasure {
    /// Zero-based measure index
    pub index: usize,
    /// One entry per subdivision, ascending
    pub slices: Vec<SliceAverages>,
}

/// Per-measure, per-subdivision feature accumulator
#[derive(Debug, Clone)]
pub struct FeatureBuffer {
    measure_duration: f64,
    subdivisions: usize,
    measures: BTreeMap<usize, Vec<SliceAccumulator>>,
    flux: SpectralFlux,
    last_sealed: Option<usize>,
    current_measure: usize,
}

impl FeatureBuffer {
    /// Create an empty buffer for the given grid
    pub fn new(measure_duration: f64, subdivisions: usize) -> Self {
        Self {
            measure_duration,
            subdivisions: subdivisions.max(1),
            measures: BTreeMap::new(),
            flux: SpectralFlux::new(),
            last_sealed: None,
            current_measure: 0,
        }
    }

    /// Measure length in seconds
    pub fn measure_duration(&self) -> f64 {
        self.measure_duration
    }

    /// Change the measure length (tempo change); applies from the next record
    pub fn set_measure_duration(&mut self, measure_duration: f64) {
        self.measure_duration = measure_duration;
    }

    /// Subdivisions per measure
    pub fn subdivisions(&self) -> usize {
        self.subdivisions
    }

    /// Measure index of the most recent record
    pub fn current_measure(&self) -> usize {
        self.current_measure
    }

    /// Accumulate one record at `elapsed` seconds
    ///
    /// Returns the averaged slices of the previous measure when this record is the
    /// first to land past its boundary. Only the immediately preceding measure is
    /// sealed; measures skipped entirely by a jump are never sealed.
    pub fn push(&mut self, elapsed: f64, record: &FeatureRecord) -> Option<SealedMeasure> {
        let position = locate(elapsed, self.measure_duration, self.subdivisions);
        let subdivisions = self.subdivisions;

        let slice = &mut self
            .measures
            .entry(position.measure)
            .or_insert_with(|| vec![SliceAccumulator::default(); subdivisions])[position.subdivision];

        slice.push_frame(&record.frame);
        if let Some(hz) = record.fundamental_hz.filter(|hz| *hz > 0.0) {
            slice.push_pitch(hz);
        }
        if let Some(spectrum) = &record.frame.amplitude_spectrum {
            if let Some(flux) = self.flux.update(spectrum) {
                slice.push_flux(flux);
            }
        }

        self.current_measure = position.measure;

        if position.measure == 0 {
            return None;
        }
        let target = position.measure - 1;
        if self.last_sealed.is_some_and(|sealed| sealed >= target) {
            return None;
        }
        self.seal(target)
    }

    fn seal(&mut self, index: usize) -> Option<SealedMeasure> {
        self.last_sealed = Some(index);

        // Everything at or before `index` is consumed; later measures stay open.
        let open = self.measures.split_off(&(index + 1));
        let mut consumed = std::mem::replace(&mut self.measures, open);
        let slices = consumed.remove(&index)?;

        log::debug!(
            "Sealing measure {} ({} slices, {} skipped buffers dropped)",
            index,
            slices.len(),
            consumed.len()
        );

        Some(SealedMeasure {
            index,
            slices: slices
                .iter()
                .enumerate()
                .map(|(i, slice)| slice.averages(i))
                .collect(),
        })
    }

    /// Discard all buffered slices, sealing progress and spectral history
    pub fn reset(&mut self) {
        self.measures.clear();
        self.flux.reset();
        self.last_sealed = None;
        self.current_measure = 0;
    }
}

fn average(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f32>() / values.len() as f32
}

fn average_chroma(vectors: &[[f32; 12]]) -> Option<[f32; 12]> {
    if vectors.is_empty() {
        return None;
    }
    let mut sum = [0.0f32; 12];
    for chroma in vectors {
        for (acc, value) in sum.iter_mut().zip(chroma) {
            *acc += value;
        }
    }
    let n = vectors.len() as f32;
    Some(sum.map(|v| v / n))
}
