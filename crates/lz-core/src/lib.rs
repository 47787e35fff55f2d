//! Value types shared by the segmentation and depth-ordering stages.
//!
//! ## Coordinates
//! Label maps and masks are row-major with `y` growing downwards. Polygon
//! vertices live on the pixel-corner lattice: pixel `(x, y)` is the unit
//! square with corners `(x, y)` and `(x + 1, y + 1)`.
//!
//! ## Winding
//! Outer boundaries have positive shoelace area and holes negative, so
//! every [`ShapeLayer`] renders correctly with an even-odd fill rule.
//!
//! ## Immutability
//! Layers and depth orders are built once per run and only read afterwards.

mod cancel;
mod color;
mod depth;
mod error;
mod geom;
mod image;
mod labels;
mod layer;
mod mask;

pub use cancel::Cancel;
pub use color::RgbColor;
pub use depth::DepthOrder;
pub use error::Error;
pub use geom::{Point2f, Vec2f, perimeter, signed_area};
pub use image::Image;
pub use labels::LabelMap;
pub use layer::{NoisyLayer, ShapeLayer};
pub use mask::{PixelBounds, RasterMask};
