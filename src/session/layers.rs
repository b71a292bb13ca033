//! Finished layers of a session

use crate::analysis::result::Layer;

/// Ordered store of finished recording layers
///
/// Layers survive the end of a recording and are discarded only by a full session reset.
#[derive(Debug, Clone, Default)]
pub struct LayerStore {
    layers: Vec<Layer>,
}

impl LayerStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finished layer
    pub fn push(&mut self, layer: Layer) {
        log::info!(
            "Layer saved: {}, {} measures. Total layers: {}",
            layer.category,
            layer.measures.len(),
            self.layers.len() + 1
        );
        self.layers.push(layer);
    }

    /// Layers in recording order
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Most recently saved layer
    pub fn last(&self) -> Option<&Layer> {
        self.layers.last()
    }

    /// Number of saved layers
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether no layer has been saved
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Drop every layer
    pub fn clear(&mut self) {
        self.layers.clear();
    }
}
