use crate::geom::perimeter;
use crate::{Error, Point2f, RasterMask, RgbColor};

/// An admitted connected region, ready for vectorization.
///
/// The outer boundary has positive signed area (see [`crate::signed_area`]);
/// holes have negative signed area, so the polygon set fills correctly under
/// the even-odd rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeLayer {
    id: String,
    color: RgbColor,
    mask: RasterMask,
    boundary: Vec<Point2f>,
    holes: Vec<Vec<Point2f>>,
    area: usize,
    perimeter: f32,
}

impl ShapeLayer {
    pub fn new(
        id: impl Into<String>,
        color: RgbColor,
        mask: RasterMask,
        boundary: Vec<Point2f>,
        holes: Vec<Vec<Point2f>>,
        area: usize,
    ) -> Result<Self, Error> {
        let id = id.into();
        validate_common(&id, &boundary, area)?;
        if holes.iter().any(|h| h.len() < 3) {
            return Err(Error::InvalidLayer(format!(
                "hole of '{id}' must contain at least three points"
            )));
        }

        Ok(Self {
            perimeter: perimeter(&boundary),
            id,
            color,
            mask,
            boundary,
            holes,
            area,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn color(&self) -> RgbColor {
        self.color
    }

    pub fn mask(&self) -> &RasterMask {
        &self.mask
    }

    pub fn boundary(&self) -> &[Point2f] {
        &self.boundary
    }

    pub fn holes(&self) -> &[Vec<Point2f>] {
        &self.holes
    }

    /// Pixel count.
    pub fn area(&self) -> usize {
        self.area
    }

    /// Length of the outer boundary.
    pub fn perimeter(&self) -> f32 {
        self.perimeter
    }
}

/// A component rejected by the admission thresholds or the layer cap. Kept
/// for diagnostics only.
#[derive(Debug, Clone, PartialEq)]
pub struct NoisyLayer {
    id: String,
    color: RgbColor,
    mask: RasterMask,
    boundary: Vec<Point2f>,
    area: usize,
    perimeter: f32,
}

impl NoisyLayer {
    pub fn new(
        id: impl Into<String>,
        color: RgbColor,
        mask: RasterMask,
        boundary: Vec<Point2f>,
        area: usize,
    ) -> Result<Self, Error> {
        let id = id.into();
        validate_common(&id, &boundary, area)?;

        Ok(Self {
            perimeter: perimeter(&boundary),
            id,
            color,
            mask,
            boundary,
            area,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn color(&self) -> RgbColor {
        self.color
    }

    pub fn mask(&self) -> &RasterMask {
        &self.mask
    }

    pub fn boundary(&self) -> &[Point2f] {
        &self.boundary
    }

    pub fn area(&self) -> usize {
        self.area
    }

    pub fn perimeter(&self) -> f32 {
        self.perimeter
    }
}

fn validate_common(id: &str, boundary: &[Point2f], area: usize) -> Result<(), Error> {
    if id.trim().is_empty() {
        return Err(Error::InvalidLayer("layer id must be non-empty".to_string()));
    }
    if boundary.len() < 3 {
        return Err(Error::InvalidLayer(format!(
            "boundary of '{id}' must contain at least three points"
        )));
    }
    if area == 0 {
        return Err(Error::InvalidLayer(format!("area of '{id}' must be positive")));
    }
    Ok(())
}
