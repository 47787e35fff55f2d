use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    SizeMismatch {
        expected: usize,
        actual: usize,
    },
    InvalidDimensions {
        width: usize,
        height: usize,
    },
    EmptyPalette,
    LabelOutOfRange {
        index: usize,
        label: u32,
        palette_len: usize,
    },
    EmptyLayerSet,
    MaskDimensionMismatch {
        layer: String,
        expected: (usize, usize),
        actual: (usize, usize),
    },
    InvalidLayer(String),
    InvalidOptions(&'static str),
    InvalidDepthOrder(&'static str),
    UnknownLayer(String),
    /// The segmentation graph of a component is malformed. This is a defect in
    /// mask construction or tracing, never a property of the input.
    MalformedBoundary(&'static str),
    Cancelled,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeMismatch { expected, actual } => {
                write!(f, "size mismatch: expected {expected}, got {actual}")
            }
            Self::InvalidDimensions { width, height } => {
                write!(f, "invalid dimensions {width}x{height}")
            }
            Self::EmptyPalette => write!(f, "palette must contain at least one color"),
            Self::LabelOutOfRange {
                index,
                label,
                palette_len,
            } => write!(
                f,
                "label {label} at pixel {index} is out of range for palette of {palette_len}"
            ),
            Self::EmptyLayerSet => write!(f, "at least one shape layer is required"),
            Self::MaskDimensionMismatch {
                layer,
                expected,
                actual,
            } => write!(
                f,
                "layer '{layer}' mask is {}x{}, expected {}x{}",
                actual.0, actual.1, expected.0, expected.1
            ),
            Self::InvalidLayer(msg) => write!(f, "invalid layer: {msg}"),
            Self::InvalidOptions(msg) => write!(f, "invalid options: {msg}"),
            Self::InvalidDepthOrder(msg) => write!(f, "invalid depth order: {msg}"),
            Self::UnknownLayer(id) => write!(f, "layer '{id}' does not exist in the depth order"),
            Self::MalformedBoundary(msg) => write!(f, "malformed segmentation boundary: {msg}"),
            Self::Cancelled => write!(f, "operation cancelled"),
        }
    }
}

impl std::error::Error for Error {}
