//! Depth ordering of shape layers.
//!
//! Layers that share a boundary are related by area: when the relative area
//! difference exceeds `delta`, the larger layer is placed behind the smaller
//! one. The resulting dominance graph may contain cycles; it is condensed
//! into strongly connected components and topologically sorted with a
//! deterministic priority, so every input yields a dense, total
//! [`lz_core::DepthOrder`].

mod graph;
mod options;
mod order;
mod scc;
mod select;

pub use graph::{
    DominanceEdge, EdgeId, LayerGraph, LayerNode, NodeId, area_difference_ratio,
    build_dominance_graph, shared_boundary,
};
pub use options::{DEFAULT_DELTA, DepthOrderingOptions};
pub use order::order_depth;
pub use scc::{Component, ComponentId, strongly_connected_components};
pub use select::{DepthSortedLayer, select_by_depth};

#[cfg(test)]
pub(crate) mod test_support {
    use lz_core::{Point2f, RasterMask, RgbColor, ShapeLayer};

    /// Axis-aligned rectangle layer on a `mask_w x mask_h` canvas.
    pub(crate) fn rect_layer(
        id: &str,
        x0: usize,
        y0: usize,
        w: usize,
        h: usize,
        mask_w: usize,
        mask_h: usize,
    ) -> ShapeLayer {
        let indices = (y0..y0 + h)
            .flat_map(|y| (x0..x0 + w).map(move |x| y * mask_w + x))
            .collect::<Vec<_>>();
        let mask = RasterMask::from_indices(mask_w, mask_h, &indices).expect("valid mask");

        let (x0, y0, x1, y1) = (x0 as f32, y0 as f32, (x0 + w) as f32, (y0 + h) as f32);
        let boundary = vec![
            Point2f::new(x0, y0),
            Point2f::new(x1, y0),
            Point2f::new(x1, y1),
            Point2f::new(x0, y1),
        ];
        ShapeLayer::new(id, RgbColor::new(0, 0, 0), mask, boundary, Vec::new(), w * h)
            .expect("valid layer")
    }
}
