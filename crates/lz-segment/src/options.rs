use lz_core::Error;
use serde::{Deserialize, Serialize};

/// Admission thresholds for extracted components.
///
/// A component whose pixel count or outer perimeter falls strictly below a
/// non-zero threshold becomes a noise layer instead of a shape layer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeLayerBuilderOptions {
    /// Minimum pixel count. `0` disables the check.
    pub noisy_component_min_pixel_count: usize,
    /// Minimum outer perimeter in pixels. `0.0` disables the check.
    pub noisy_component_min_perimeter: f32,
    /// Cap on the number of shape layers. `None` or `Some(0)` disables it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_primary_layer_count: Option<usize>,
}

impl ShapeLayerBuilderOptions {
    pub fn validate(&self) -> Result<(), Error> {
        let p = self.noisy_component_min_perimeter;
        if !p.is_finite() || p < 0.0 {
            return Err(Error::InvalidOptions(
                "perimeter threshold must be finite and non-negative",
            ));
        }
        Ok(())
    }

    pub(crate) fn layer_cap(&self) -> Option<usize> {
        self.max_primary_layer_count.filter(|&cap| cap > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::ShapeLayerBuilderOptions;

    #[test]
    fn default_disables_every_check() {
        let opts = ShapeLayerBuilderOptions::default();
        assert_eq!(opts.noisy_component_min_pixel_count, 0);
        assert_eq!(opts.noisy_component_min_perimeter, 0.0);
        assert_eq!(opts.layer_cap(), None);
        assert!(opts.validate().is_ok());

        let zero_cap = ShapeLayerBuilderOptions {
            max_primary_layer_count: Some(0),
            ..Default::default()
        };
        assert_eq!(zero_cap.layer_cap(), None);
    }

    #[test]
    fn rejects_bad_perimeter_threshold() {
        for p in [f32::NAN, -1.0, f32::INFINITY] {
            let opts = ShapeLayerBuilderOptions {
                noisy_component_min_perimeter: p,
                ..Default::default()
            };
            assert!(opts.validate().is_err(), "{p} should be rejected");
        }
    }
}
