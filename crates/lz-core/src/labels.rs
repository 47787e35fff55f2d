use crate::{Error, Image, RgbColor};

/// Per-pixel palette indices produced by color quantization.
///
/// Every label indexes validly into a non-empty palette; the label grid is at
/// least one pixel in each dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelMap {
    labels: Image<u32>,
    palette: Vec<RgbColor>,
}

impl LabelMap {
    pub fn new(labels: Image<u32>, palette: Vec<RgbColor>) -> Result<Self, Error> {
        if labels.width() == 0 || labels.height() == 0 {
            return Err(Error::InvalidDimensions {
                width: labels.width(),
                height: labels.height(),
            });
        }

        if palette.is_empty() {
            return Err(Error::EmptyPalette);
        }

        if let Some((index, &label)) = labels
            .data()
            .iter()
            .enumerate()
            .find(|&(_, &l)| l as usize >= palette.len())
        {
            return Err(Error::LabelOutOfRange {
                index,
                label,
                palette_len: palette.len(),
            });
        }

        Ok(Self { labels, palette })
    }

    pub fn from_vec(
        width: usize,
        height: usize,
        labels: Vec<u32>,
        palette: Vec<RgbColor>,
    ) -> Result<Self, Error> {
        Self::new(Image::from_vec(width, height, labels)?, palette)
    }

    pub fn width(&self) -> usize {
        self.labels.width()
    }

    pub fn height(&self) -> usize {
        self.labels.height()
    }

    pub fn labels(&self) -> &[u32] {
        self.labels.data()
    }

    pub fn palette(&self) -> &[RgbColor] {
        &self.palette
    }

    /// Palette color for a label known to be valid.
    pub fn color_of(&self, label: u32) -> RgbColor {
        self.palette[label as usize]
    }
}
