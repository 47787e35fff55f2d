//! Quantized raster to depth-ordered shape layers.
//!
//! Umbrella crate for the workspace: re-exports the core types, the
//! segmenter and the depth orderer, and wires them into [`build_layers`].
//!
//! ```no_run
//! use layerize::{Cancel, LabelMap, LayerizeConfig, RgbColor, build_layers};
//!
//! let palette = vec![RgbColor::new(0, 0, 0), RgbColor::new(255, 255, 255)];
//! let labels = LabelMap::from_vec(2, 1, vec![0, 1], palette)?;
//! let stack = build_layers(&labels, &LayerizeConfig::default(), &Cancel::new())?;
//! for (layer, depth) in stack.back_to_front() {
//!     println!("{depth}: {}", layer.id());
//! }
//! # Ok::<(), layerize::Error>(())
//! ```

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

pub use lz_core::*;
pub use lz_depth::{
    DepthOrderingOptions, DepthSortedLayer, LayerGraph, build_dominance_graph, order_depth,
    select_by_depth, shared_boundary, strongly_connected_components,
};
pub use lz_segment::{
    ComponentBoundary, SegmentationResult, ShapeLayerBuilderOptions, segment,
    segment_with_cancel, simplify_loop, trace_component, trace_loops,
};

/// Options for both pipeline stages. Every field is optional in serialized
/// form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerizeConfig {
    pub segment: ShapeLayerBuilderOptions,
    pub depth: DepthOrderingOptions,
}

/// Segmentation output with the depth order of its shape layers.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerStack {
    pub segmentation: SegmentationResult,
    pub order: DepthOrder,
}

impl LayerStack {
    pub fn shape_layers(&self) -> &[ShapeLayer] {
        &self.segmentation.shape_layers
    }

    pub fn noisy_layers(&self) -> &[NoisyLayer] {
        &self.segmentation.noisy_layers
    }

    /// Shape layers from farthest to nearest, with their depths.
    pub fn back_to_front(&self) -> impl Iterator<Item = (&ShapeLayer, usize)> {
        let by_id = self
            .shape_layers()
            .iter()
            .map(|l| (l.id(), l))
            .collect::<HashMap<_, _>>();
        self.order
            .iter_back_to_front()
            .filter_map(move |(id, depth)| by_id.get(id).map(|&l| (l, depth)))
    }
}

/// Segments `labels` and orders the resulting shape layers.
///
/// Fails with [`Error::EmptyLayerSet`] when every component ends up as
/// noise.
pub fn build_layers(
    labels: &LabelMap,
    config: &LayerizeConfig,
    cancel: &Cancel,
) -> Result<LayerStack, Error> {
    let segmentation = segment_with_cancel(labels, &config.segment, cancel)?;
    if segmentation.shape_layers.is_empty() {
        return Err(Error::EmptyLayerSet);
    }

    let order = order_depth(&segmentation.shape_layers, &config.depth)?;
    debug!(
        "layer stack: {} shapes, {} noise",
        segmentation.shape_layers.len(),
        segmentation.noisy_layers.len()
    );

    Ok(LayerStack {
        segmentation,
        order,
    })
}
