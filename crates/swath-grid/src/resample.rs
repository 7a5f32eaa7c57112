//! Layer resampling and value normalization.

use crate::correspondence::Correspondence;
use crate::error::{Result, SwathGridError};

/// Fill sentinel for layers that define no fill value of their own
/// (the CF-conventions default for 32-bit floats).
pub const DEFAULT_FILL_F32: f32 = 9.96921e36;

/// One named data layer of a scene.
///
/// Transient: read from the container, resampled, written out, discarded.
#[derive(Debug, Clone)]
pub struct Layer {
    pub name: String,
    pub data: Vec<f32>,
    pub height: usize,
    pub width: usize,
    /// Fill sentinel resolved once from the container attributes.
    pub fill_value: Option<f64>,
    /// Scale factor resolved once from the container attributes; 1 is a
    /// no-op.
    pub scale_factor: f64,
}

impl Layer {
    /// The fill value that marks unmatched cells in this layer's output:
    /// its own fill value, or the generic sentinel.
    pub fn output_fill(&self) -> f32 {
        self.fill_value.map(|v| v as f32).unwrap_or(DEFAULT_FILL_F32)
    }
}

/// Apply a correspondence to one layer.
///
/// Matched cells copy the nearest swath pixel's value; unmatched cells get
/// the layer's fill value (or the generic sentinel). Fails with
/// `DimensionMismatch` when the layer does not share the geolocation
/// field's shape; callers skip the layer and continue.
pub fn resample_layer(layer: &Layer, corr: &Correspondence) -> Result<Vec<f32>> {
    if layer.data.len() != corr.swath_len() {
        return Err(SwathGridError::DimensionMismatch {
            expected: corr.swath_len(),
            actual: layer.data.len(),
        });
    }

    let fill = layer.output_fill();
    Ok(corr
        .targets()
        .iter()
        .map(|t| match t {
            Some(i) => layer.data[*i as usize],
            None => fill,
        })
        .collect())
}

/// Apply a layer's scale factor to a resampled (or passthrough) array.
///
/// Scaling runs after resampling. Fill cells must not turn into plausible
/// physical values, so any cell equal to the scaled fill is restored to the
/// original unscaled sentinel afterwards.
pub fn apply_scale(data: &mut [f32], scale_factor: f64, fill_value: Option<f64>) {
    if scale_factor == 1.0 {
        return;
    }
    let sf = scale_factor as f32;
    for v in data.iter_mut() {
        *v *= sf;
    }
    if let Some(fv) = fill_value {
        let fv = fv as f32;
        let scaled_fill = fv * sf;
        for v in data.iter_mut() {
            if *v == scaled_fill {
                *v = fv;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResampleConfig;
    use crate::grid::GridDefinition;
    use crate::swath::GeolocationField;
    use swath_common::OutputMode;
    use test_utils::{constant_layer, gradient_swath, ramp_layer};

    fn one_to_one_setup() -> (GeolocationField, GridDefinition, Correspondence) {
        // Swath pixel spacing well inside the search radius so every cell
        // finds a neighbor.
        let (lats, lons) = gradient_swath(10, 10, 40.0, -0.0005, -105.0, 0.0005);
        let field = GeolocationField::new(lats, lons, 10, 10).unwrap();
        let config = ResampleConfig::default();
        let grid = GridDefinition::from_swath(&field, OutputMode::Geo, &config).unwrap();
        let corr = Correspondence::build(&field, &grid, &config).unwrap();
        (field, grid, corr)
    }

    #[test]
    fn test_matched_cells_copy_source_values() {
        let (_, _, corr) = one_to_one_setup();
        let layer = Layer {
            name: "LST".to_string(),
            data: ramp_layer(10, 10),
            height: 10,
            width: 10,
            fill_value: None,
            scale_factor: 1.0,
        };
        let out = resample_layer(&layer, &corr).unwrap();
        for (cell, target) in out.iter().zip(corr.targets()) {
            match target {
                Some(i) => assert_eq!(*cell, layer.data[*i as usize]),
                None => assert_eq!(*cell, DEFAULT_FILL_F32),
            }
        }
    }

    #[test]
    fn test_unmatched_cells_use_layer_fill() {
        let (_, _, corr) = one_to_one_setup();
        let layer = Layer {
            name: "QC".to_string(),
            data: constant_layer(10, 10, 1.0),
            height: 10,
            width: 10,
            fill_value: Some(-9999.0),
            scale_factor: 1.0,
        };
        let out = resample_layer(&layer, &corr).unwrap();
        for (cell, target) in out.iter().zip(corr.targets()) {
            if target.is_none() {
                assert_eq!(*cell, -9999.0);
            }
        }
    }

    #[test]
    fn test_shape_mismatch_skips_layer() {
        let (_, _, corr) = one_to_one_setup();
        let layer = Layer {
            name: "bad".to_string(),
            data: vec![0.0; 64],
            height: 8,
            width: 8,
            fill_value: None,
            scale_factor: 1.0,
        };
        assert!(matches!(
            resample_layer(&layer, &corr),
            Err(SwathGridError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_scale_is_noop_at_one() {
        let mut data = vec![1.0f32, 2.0, -9999.0];
        apply_scale(&mut data, 1.0, Some(-9999.0));
        assert_eq!(data, vec![1.0, 2.0, -9999.0]);
    }

    #[test]
    fn test_fill_survives_scaling_unscaled() {
        // A raw -9999 with scale 0.01 must come out as -9999, not -99.99.
        let mut data = vec![100.0f32, -9999.0, 250.0];
        apply_scale(&mut data, 0.01, Some(-9999.0));
        assert_eq!(data[0], 1.0);
        assert_eq!(data[1], -9999.0);
        assert_eq!(data[2], 2.5);
    }

    #[test]
    fn test_scaling_without_fill_value() {
        let mut data = vec![100.0f32, 200.0];
        apply_scale(&mut data, 0.5, None);
        assert_eq!(data, vec![50.0, 100.0]);
    }
}
