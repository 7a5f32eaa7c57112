//! Nearest-neighbor warp from a projected raster to geographic coordinates.
//!
//! Reprojects a UTM raster onto a lat/lon grid of the same dimensions. The
//! inverse transform is approximated per output row: exact at sampled
//! columns, linear in between, subdividing wherever the interpolation error
//! exceeds the tolerance (in source pixels).

use std::path::Path;

use tracing::{debug, info};

use projection::{UtmProjection, EPSG_WGS84};
use swath_common::{BoundingBox, GeoTransform};

use crate::error::{RasterError, Result};
use crate::geotiff::{read_geotiff, GeoTiffRaster, RasterCrs};

/// Maximum approximation error of the warp transform, in source pixels.
pub const DEFAULT_WARP_TOLERANCE: f64 = 0.125;

/// Warp a projected raster to EPSG:4326, preserving its dimensions.
pub fn warp_to_geographic(src: &GeoTiffRaster, tolerance: f64) -> Result<GeoTiffRaster> {
    let epsg = src.crs.epsg().ok_or_else(|| {
        RasterError::UnsupportedSourceCrs("CRS carries no EPSG authority".to_string())
    })?;
    if epsg == EPSG_WGS84 {
        let mut out = src.clone();
        out.crs = RasterCrs::Epsg(EPSG_WGS84);
        return Ok(out);
    }
    let proj = UtmProjection::from_epsg(epsg)
        .map_err(|e| RasterError::UnsupportedSourceCrs(e.to_string()))?;
    if src.width == 0 || src.height == 0 {
        return Err(RasterError::InvalidData(
            "cannot warp a raster with zero dimensions".to_string(),
        ));
    }

    let extent = geographic_extent(src, &proj);
    if extent.is_degenerate() {
        return Err(RasterError::InvalidData(
            "warped extent has zero span".to_string(),
        ));
    }

    let cols = src.width;
    let rows = src.height;
    let ps_x = extent.width() / cols as f64;
    let ps_y = extent.height() / rows as f64;
    let geotransform =
        GeoTransform::from_array([extent.min_x, ps_x, 0.0, extent.max_y, 0.0, -ps_y]);

    let fill = src.nodata.map(|v| v as f32).unwrap_or(f32::NAN);
    let mut pixels = vec![fill; cols * rows];
    let mut row_coords = vec![(0.0f64, 0.0f64); cols];

    for row in 0..rows {
        let lat = extent.max_y - (row as f64 + 0.5) * ps_y;
        let lon_at = |col: usize| extent.min_x + (col as f64 + 0.5) * ps_x;
        let exact = |col: usize| source_pixel(&proj, src, lat, lon_at(col));

        row_coords[0] = exact(0);
        row_coords[cols - 1] = exact(cols - 1);
        approximate_span(&exact, 0, cols - 1, tolerance, &mut row_coords);

        for (col, &(fx, fy)) in row_coords.iter().enumerate() {
            if fx < 0.0 || fy < 0.0 {
                continue;
            }
            let sc = fx as usize;
            let sr = fy as usize;
            if sc < src.width && sr < src.height {
                pixels[row * cols + col] = src.pixels[sr * src.width + sc];
            }
        }
    }

    debug!(rows, cols, ps_x, ps_y, "warped raster to geographic");

    Ok(GeoTiffRaster {
        pixels,
        width: cols,
        height: rows,
        geotransform,
        crs: RasterCrs::Epsg(EPSG_WGS84),
        nodata: src.nodata,
    })
}

/// Read a projected GeoTIFF, warp it to EPSG:4326 and write the result.
pub fn warp_file_to_geographic<P: AsRef<Path>, Q: AsRef<Path>>(
    src_path: P,
    dst_path: Q,
    tolerance: f64,
) -> Result<()> {
    let src = read_geotiff(src_path.as_ref())?;
    let dst = warp_to_geographic(&src, tolerance)?;
    dst.write(dst_path.as_ref())?;
    info!(
        src = %src_path.as_ref().display(),
        dst = %dst_path.as_ref().display(),
        "warped to geographic coordinates"
    );
    Ok(())
}

/// Fractional source pixel position of a geographic coordinate, or
/// `(-1, -1)` when the position is not representable.
fn source_pixel(proj: &UtmProjection, src: &GeoTiffRaster, lat: f64, lon: f64) -> (f64, f64) {
    let (x, y) = proj.forward(lat, lon);
    src.geotransform.world_to_pixel(x, y).unwrap_or((-1.0, -1.0))
}

/// Geographic bounding box of a projected raster, sampled at the corners
/// and edge midpoints of its extent.
fn geographic_extent(src: &GeoTiffRaster, proj: &UtmProjection) -> BoundingBox {
    let gt = &src.geotransform;
    let w = src.width as f64;
    let h = src.height as f64;
    let samples = [
        (0.0, 0.0),
        (w / 2.0, 0.0),
        (w, 0.0),
        (0.0, h / 2.0),
        (w, h / 2.0),
        (0.0, h),
        (w / 2.0, h),
        (w, h),
    ];

    let mut min_lon = f64::INFINITY;
    let mut max_lon = f64::NEG_INFINITY;
    let mut min_lat = f64::INFINITY;
    let mut max_lat = f64::NEG_INFINITY;
    for (col, row) in samples {
        let (x, y) = gt.pixel_to_world(col, row);
        let (lat, lon) = proj.inverse(x, y);
        min_lon = min_lon.min(lon);
        max_lon = max_lon.max(lon);
        min_lat = min_lat.min(lat);
        max_lat = max_lat.max(lat);
    }
    BoundingBox::new(min_lon, min_lat, max_lon, max_lat)
}

/// Fill `out[lo..=hi]` with source pixel coordinates, assuming `out[lo]`
/// and `out[hi]` already hold exact values. Interpolates linearly when the
/// midpoint error stays within `tolerance` source pixels, otherwise splits.
fn approximate_span(
    exact: &dyn Fn(usize) -> (f64, f64),
    lo: usize,
    hi: usize,
    tolerance: f64,
    out: &mut [(f64, f64)],
) {
    if hi - lo <= 1 {
        return;
    }
    let mid = lo + (hi - lo) / 2;
    let t = (mid - lo) as f64 / (hi - lo) as f64;
    let est_x = out[lo].0 + t * (out[hi].0 - out[lo].0);
    let est_y = out[lo].1 + t * (out[hi].1 - out[lo].1);
    let (ex, ey) = exact(mid);
    out[mid] = (ex, ey);

    if (est_x - ex).abs() <= tolerance && (est_y - ey).abs() <= tolerance {
        for col in lo + 1..hi {
            if col == mid {
                continue;
            }
            let t = (col - lo) as f64 / (hi - lo) as f64;
            out[col] = (
                out[lo].0 + t * (out[hi].0 - out[lo].0),
                out[lo].1 + t * (out[hi].1 - out[lo].1),
            );
        }
    } else {
        approximate_span(exact, lo, mid, tolerance, out);
        approximate_span(exact, mid, hi, tolerance, out);
    }
}
