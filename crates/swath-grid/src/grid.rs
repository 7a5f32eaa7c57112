//! Output grid definition.

use serde::{Deserialize, Serialize};
use tracing::debug;

use projection::{utm_zone_epsg, AzimuthalEquidistant, UtmProjection, EPSG_WGS84};
use swath_common::{BoundingBox, GeoTransform, OutputMode};

use crate::config::ResampleConfig;
use crate::error::{Result, SwathGridError};
use crate::swath::GeolocationField;

/// Which projection family the grid lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectionFamily {
    /// Universal Transverse Mercator; `south` marks the 327xx zone series.
    Utm { south: bool },
    /// Geographic lat/lon degrees.
    Geographic,
}

/// A fully specified output grid: projection, pixel size, dimensions,
/// extent in projected units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridDefinition {
    /// EPSG code of the output CRS.
    pub epsg: u32,
    pub family: ProjectionFamily,
    /// Single scalar pixel size (square pixels): meters for UTM, degrees
    /// for geographic grids.
    pub pixel_size: f64,
    pub rows: usize,
    pub cols: usize,
    /// Grid extent in projected units (meters or degrees).
    pub extent: BoundingBox,
}

impl GridDefinition {
    /// Compute the output grid for a swath in the requested mode.
    ///
    /// UTM mode projects the extent corners into the zone of the scene
    /// center and applies the configured pixel size directly, truncating
    /// the row/column counts. Geographic mode equalizes the pixel size in
    /// two passes: a provisional grid in an azimuthal equidistant
    /// projection centered on the scene measures true ground pixel size on
    /// both axes, the smaller one is converted to degrees over the raw
    /// geographic bounding box, and the final counts are re-derived from
    /// that scalar with rounding (truncation would systematically
    /// under-cover the grid edge).
    pub fn from_swath(
        field: &GeolocationField,
        mode: OutputMode,
        config: &ResampleConfig,
    ) -> Result<Self> {
        config.validate()?;
        let extent = field.extent()?;
        let bbox = extent.bbox;

        let def = match mode {
            OutputMode::Utm => {
                let epsg = utm_zone_epsg(extent.center_lat, extent.center_lon);
                let proj = UtmProjection::from_epsg(epsg)?;
                let (min_x, min_y) = proj.forward(bbox.min_y, bbox.min_x);
                let (max_x, max_y) = proj.forward(bbox.max_y, bbox.max_x);
                let projected = BoundingBox::new(min_x, min_y, max_x, max_y);
                if projected.is_degenerate() {
                    return Err(SwathGridError::DegenerateExtent(
                        "projected UTM extent has zero span".to_string(),
                    ));
                }

                let ps = config.pixel_size_m;
                let cols = ((projected.width() / ps) as usize).max(1);
                let rows = ((projected.height() / ps) as usize).max(1);

                Self {
                    epsg,
                    family: ProjectionFamily::Utm {
                        south: proj.south,
                    },
                    pixel_size: ps,
                    rows,
                    cols,
                    extent: projected,
                }
            }
            OutputMode::Geo => {
                // Pass 1: provisional grid in azimuthal equidistant meters.
                let staging =
                    AzimuthalEquidistant::centered_on(extent.center_lat, extent.center_lon);
                let (min_x, min_y) = staging.forward(bbox.min_y, bbox.min_x);
                let (max_x, max_y) = staging.forward(bbox.max_y, bbox.max_x);
                let staged = BoundingBox::new(min_x, min_y, max_x, max_y);
                if staged.is_degenerate() {
                    return Err(SwathGridError::DegenerateExtent(
                        "staging projection extent has zero span".to_string(),
                    ));
                }

                let ps_m = config.pixel_size_m;
                let cols = ((staged.width() / ps_m).round() as usize).max(1);
                let rows = ((staged.height() / ps_m).round() as usize).max(1);

                // Pass 2: translate to degrees over the raw geographic
                // bounding box and keep the smaller axis pixel size so the
                // final grid has square degree-pixels.
                let ps_x = bbox.width() / cols as f64;
                let ps_y = bbox.height() / rows as f64;
                let ps = ps_x.min(ps_y);

                let cols = ((bbox.width() / ps).round() as usize).max(1);
                let rows = ((bbox.height() / ps).round() as usize).max(1);

                Self {
                    epsg: EPSG_WGS84,
                    family: ProjectionFamily::Geographic,
                    pixel_size: ps,
                    rows,
                    cols,
                    extent: bbox,
                }
            }
        };

        debug!(
            epsg = def.epsg,
            rows = def.rows,
            cols = def.cols,
            pixel_size = def.pixel_size,
            "computed grid definition"
        );
        Ok(def)
    }

    /// Number of output cells.
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Projected coordinates of a cell center. Row 0 is the top row.
    pub fn cell_center(&self, row: usize, col: usize) -> (f64, f64) {
        let x = self.extent.min_x + (col as f64 + 0.5) * self.pixel_size;
        let y = self.extent.max_y - (row as f64 + 0.5) * self.pixel_size;
        (x, y)
    }

    /// The affine geotransform of this grid (upper-left origin, negative
    /// pixel height).
    pub fn geotransform(&self) -> GeoTransform {
        GeoTransform::north_up(self.extent.min_x, self.extent.max_y, self.pixel_size)
    }
}
