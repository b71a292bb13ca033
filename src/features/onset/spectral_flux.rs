//! Streaming spectral flux
//!
//! Onset/activity proxy computed from consecutive magnitude spectra:
//! `flux = Σ max(0, current[i] − previous[i])`.

/// Frame-to-frame positive spectral change tracker
///
/// The first spectrum after construction (or [`SpectralFlux::reset`]) has no
/// predecessor and yields no flux value.
#[derive(Debug, Clone, Default)]
pub struct SpectralFlux {
    previous: Option<Vec<f32>>,
}

impl SpectralFlux {
    /// Create a tracker with no spectral history
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next magnitude spectrum
    ///
    /// Returns the positive flux against the previous spectrum, or `None` on the first
    /// call. Spectra of different lengths are compared over their common bins.
    pub fn update(&mut self, spectrum: &[f32]) -> Option<f32> {
        let flux = self.previous.as_ref().map(|previous| {
            spectrum
                .iter()
                .zip(previous.iter())
                .map(|(&current, &prev)| (current - prev).max(0.0))
                .sum()
        });
        match &mut self.previous {
            Some(previous) => {
                previous.clear();
                previous.extend_from_slice(spectrum);
            }
            None => self.previous = Some(spectrum.to_vec()),
        }
        flux
    }

    /// Forget the spectral history
    pub fn reset(&mut self) {
        self.previous = None;
    }
}
