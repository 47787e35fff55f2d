use crate::Error;

/// Inclusive pixel bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBounds {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl PixelBounds {
    pub fn width(&self) -> usize {
        self.x1 - self.x0 + 1
    }

    pub fn height(&self) -> usize {
        self.y1 - self.y0 + 1
    }

    /// Grows the box by one pixel on every side, clipped to the image.
    pub fn dilate1(&self, width: usize, height: usize) -> Self {
        Self {
            x0: self.x0.saturating_sub(1),
            y0: self.y0.saturating_sub(1),
            x1: (self.x1 + 1).min(width - 1),
            y1: (self.y1 + 1).min(height - 1),
        }
    }

    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let x0 = self.x0.max(other.x0);
        let y0 = self.y0.max(other.y0);
        let x1 = self.x1.min(other.x1);
        let y1 = self.y1.min(other.y1);
        (x0 <= x1 && y0 <= y1).then_some(Self { x0, y0, x1, y1 })
    }
}

/// Immutable row-major bitmap over the full image, one bit per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterMask {
    width: usize,
    height: usize,
    words: Vec<u64>,
    ones: usize,
    bounds: Option<PixelBounds>,
}

impl RasterMask {
    pub fn new(width: usize, height: usize, bits: &[bool]) -> Result<Self, Error> {
        let len = checked_len(width, height)?;
        if bits.len() != len {
            return Err(Error::SizeMismatch {
                expected: len,
                actual: bits.len(),
            });
        }

        let indices = bits
            .iter()
            .enumerate()
            .filter_map(|(i, &b)| b.then_some(i))
            .collect::<Vec<_>>();
        Self::from_indices(width, height, &indices)
    }

    /// Builds a mask with exactly the given row-major pixel indices set.
    pub fn from_indices(width: usize, height: usize, indices: &[usize]) -> Result<Self, Error> {
        let len = checked_len(width, height)?;
        let mut words = vec![0_u64; len.div_ceil(64)];
        let mut ones = 0_usize;
        let mut bounds: Option<PixelBounds> = None;

        for &i in indices {
            if i >= len {
                return Err(Error::SizeMismatch {
                    expected: len,
                    actual: i + 1,
                });
            }

            let bit = 1_u64 << (i & 63);
            if words[i >> 6] & bit != 0 {
                continue;
            }
            words[i >> 6] |= bit;
            ones += 1;

            let (x, y) = (i % width, i / width);
            bounds = Some(match bounds {
                None => PixelBounds {
                    x0: x,
                    y0: y,
                    x1: x,
                    y1: y,
                },
                Some(b) => PixelBounds {
                    x0: b.x0.min(x),
                    y0: b.y0.min(y),
                    x1: b.x1.max(x),
                    y1: b.y1.max(y),
                },
            });
        }

        Ok(Self {
            width,
            height,
            words,
            ones,
            bounds,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Number of set pixels.
    pub fn count_ones(&self) -> usize {
        self.ones
    }

    /// Bounding box of the set pixels, `None` for an empty mask.
    pub fn bounds(&self) -> Option<PixelBounds> {
        self.bounds
    }

    pub fn get(&self, x: usize, y: usize) -> Option<bool> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.bit(y * self.width + x))
    }

    /// Like [`RasterMask::get`] but treats out-of-range pixels as unset.
    #[inline]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.bit(y * self.width + x)
    }

    #[inline]
    pub fn bit(&self, idx: usize) -> bool {
        self.words
            .get(idx >> 6)
            .is_some_and(|w| w & (1_u64 << (idx & 63)) != 0)
    }

    /// Every pixel in row-major order.
    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.width * self.height).map(|i| self.bit(i))
    }

    /// Row-major indices of the set pixels.
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        let len = self.width * self.height;
        self.words.iter().enumerate().flat_map(move |(wi, &w)| {
            let mut rest = w;
            core::iter::from_fn(move || {
                if rest == 0 {
                    return None;
                }
                let tz = rest.trailing_zeros() as usize;
                rest &= rest - 1;
                Some((wi << 6) + tz)
            })
            .filter(move |&i| i < len)
        })
    }
}

fn checked_len(width: usize, height: usize) -> Result<usize, Error> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(Error::InvalidDimensions { width, height })
}

#[cfg(test)]
mod tests {
    use super::{PixelBounds, RasterMask};
    use crate::Error;

    #[test]
    fn rejects_zero_dimensions_and_wrong_length() {
        assert_eq!(
            RasterMask::new(0, 3, &[]).unwrap_err(),
            Error::InvalidDimensions {
                width: 0,
                height: 3
            }
        );
        assert!(matches!(
            RasterMask::new(2, 2, &[true, false, true]),
            Err(Error::SizeMismatch {
                expected: 4,
                actual: 3
            })
        ));
        assert!(RasterMask::from_indices(2, 2, &[4]).is_err());
    }

    #[test]
    fn indexing_bounds_and_counts() {
        let bits = [
            false, false, false, false, //
            false, true, true, false, //
            false, false, true, false, //
        ];
        let mask = RasterMask::new(4, 3, &bits).expect("valid mask");

        assert_eq!(mask.count_ones(), 3);
        assert_eq!(mask.get(1, 1), Some(true));
        assert_eq!(mask.get(0, 0), Some(false));
        assert_eq!(mask.get(4, 0), None);
        assert!(!mask.contains(9, 9));
        assert_eq!(
            mask.bounds(),
            Some(PixelBounds {
                x0: 1,
                y0: 1,
                x1: 2,
                y1: 2
            })
        );
        assert_eq!(mask.iter_ones().collect::<Vec<_>>(), vec![5, 6, 10]);
        assert_eq!(mask.bits().collect::<Vec<_>>(), bits.to_vec());
    }

    #[test]
    fn wide_masks_span_words() {
        let mask = RasterMask::from_indices(100, 2, &[0, 63, 64, 199, 64]).expect("valid mask");
        assert_eq!(mask.count_ones(), 4);
        assert_eq!(mask.iter_ones().collect::<Vec<_>>(), vec![0, 63, 64, 199]);
        assert!(mask.contains(99, 1));
    }

    #[test]
    fn bounds_dilate_and_intersect() {
        let a = PixelBounds {
            x0: 0,
            y0: 0,
            x1: 1,
            y1: 1,
        };
        let b = PixelBounds {
            x0: 3,
            y0: 0,
            x1: 4,
            y1: 1,
        };
        assert!(a.intersect(&b).is_none());

        let grown = a.dilate1(5, 5);
        assert_eq!(grown.x1, 2);
        assert_eq!(grown.x0, 0);
        assert!(grown.dilate1(5, 5).intersect(&b).is_some());
        assert_eq!(b.width(), 2);
        assert_eq!(b.height(), 2);
    }
}
