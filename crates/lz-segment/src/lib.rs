//! Connected-region extraction from label maps.
//!
//! A label map is split into maximal 4-connected same-label components in
//! row-major discovery order. Each component gets:
//! - a bit-packed [`lz_core::RasterMask`];
//! - an outer boundary traced along pixel corners, with collinear vertices
//!   removed;
//! - hole loops for enclosed regions of other labels.
//!
//! Components that pass the admission thresholds in
//! [`ShapeLayerBuilderOptions`] become shape layers (`layer-0001`, ...);
//! the rest become noise layers (`noise-0001`, ...). Together the masks of
//! both families partition the image.

mod options;
mod segment;
mod trace;

pub use options::ShapeLayerBuilderOptions;
pub use segment::{
    Admission, IdSequence, SegmentationResult, admission, segment, segment_with_cancel,
};
pub use trace::{ComponentBoundary, simplify_loop, trace_component, trace_loops};
