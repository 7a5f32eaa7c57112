//! Test data generators for synthetic swaths and layers.
//!
//! These generators create predictable, verifiable test data patterns
//! that can be used across the test suite.

/// Creates a pair of geolocation arrays describing a regular swath.
///
/// Latitude varies by row, longitude by column:
///
/// - `lat(row, col) = lat0 + row * lat_step`
/// - `lon(row, col) = lon0 + col * lon_step`
///
/// A descending satellite pass is the usual shape, so `lat_step` is
/// typically negative.
///
/// # Returns
///
/// `(lats, lons)` as row-major `Vec<f64>` of length `height * width`.
///
/// # Example
///
/// ```
/// use test_utils::gradient_swath;
///
/// let (lats, lons) = gradient_swath(2, 3, 40.0, -0.01, -105.0, 0.01);
/// assert_eq!(lats[0], 40.0);
/// assert_eq!(lats[3], 39.99);  // row 1
/// assert_eq!(lons[2], -104.98); // col 2
/// ```
pub fn gradient_swath(
    height: usize,
    width: usize,
    lat0: f64,
    lat_step: f64,
    lon0: f64,
    lon_step: f64,
) -> (Vec<f64>, Vec<f64>) {
    let mut lats = Vec::with_capacity(height * width);
    let mut lons = Vec::with_capacity(height * width);
    for row in 0..height {
        for col in 0..width {
            lats.push(lat0 + row as f64 * lat_step);
            lons.push(lon0 + col as f64 * lon_step);
        }
    }
    (lats, lons)
}

/// Creates a data layer with predictable values.
///
/// Each cell value is calculated as: `col * 1000 + row`
///
/// This makes it easy to verify that data survives a resampling pass by
/// checking that layer[row][col] == col * 1000 + row.
///
/// # Example
///
/// ```
/// use test_utils::ramp_layer;
///
/// let layer = ramp_layer(5, 10);
/// assert_eq!(layer.len(), 50);  // 5 * 10
/// assert_eq!(layer[0], 0.0);    // col=0, row=0
/// assert_eq!(layer[1], 1000.0); // col=1, row=0
/// assert_eq!(layer[10], 1.0);   // col=0, row=1
/// ```
pub fn ramp_layer(height: usize, width: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(height * width);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 1000 + row) as f32);
        }
    }
    data
}

/// Creates a layer filled with a constant value.
pub fn constant_layer(height: usize, width: usize, value: f32) -> Vec<f32> {
    vec![value; height * width]
}

/// Creates a layer with fill values at specified `(row, col)` positions
/// and a ramp everywhere else.
pub fn layer_with_fill(
    height: usize,
    width: usize,
    fill: f32,
    fill_positions: &[(usize, usize)],
) -> Vec<f32> {
    let mut data = ramp_layer(height, width);
    for &(row, col) in fill_positions {
        if row < height && col < width {
            data[row * width + col] = fill;
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_swath() {
        let (lats, lons) = gradient_swath(3, 4, 40.0, -0.01, -105.0, 0.01);
        assert_eq!(lats.len(), 12);
        assert_eq!(lons.len(), 12);
        assert_eq!(lats[0], 40.0);
        assert_eq!(lons[0], -105.0);
        // row 2, col 3
        assert!((lats[11] - 39.98).abs() < 1e-12);
        assert!((lons[11] + 104.97).abs() < 1e-12);
    }

    #[test]
    fn test_ramp_layer() {
        let layer = ramp_layer(5, 10);
        assert_eq!(layer.len(), 50);
        assert_eq!(layer[0], 0.0); // col=0, row=0
        assert_eq!(layer[1], 1000.0); // col=1, row=0
        assert_eq!(layer[10], 1.0); // col=0, row=1
        assert_eq!(layer[11], 1001.0); // col=1, row=1
    }

    #[test]
    fn test_constant_layer() {
        let layer = constant_layer(10, 10, 42.0);
        assert_eq!(layer.len(), 100);
        assert!(layer.iter().all(|&v| v == 42.0));
    }

    #[test]
    fn test_layer_with_fill() {
        let layer = layer_with_fill(10, 10, -9999.0, &[(5, 5), (0, 0)]);
        assert_eq!(layer[0], -9999.0);
        assert_eq!(layer[55], -9999.0);
        assert_eq!(layer[1], 1000.0);
    }
}
