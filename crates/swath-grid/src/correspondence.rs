//! Nearest-neighbor correspondence between output cells and swath pixels.

use kiddo::{KdTree, SquaredEuclidean};
use tracing::debug;

use projection::geocentric::geo_to_xyz;
use projection::UtmProjection;

use crate::config::ResampleConfig;
use crate::error::{Result, SwathGridError};
use crate::grid::{GridDefinition, ProjectionFamily};
use crate::swath::GeolocationField;

/// For every output grid cell, the flat index of the nearest swath pixel
/// within the search radius, or unmatched.
///
/// Built once per scene and shared read-only across that scene's layers;
/// the geometry does not depend on layer values.
#[derive(Debug, Clone)]
pub struct Correspondence {
    targets: Vec<Option<u32>>,
    rows: usize,
    cols: usize,
    /// Length of the swath arrays this correspondence indexes into, used to
    /// reject layers of the wrong shape.
    swath_len: usize,
}

impl Correspondence {
    /// Build the correspondence for a scene.
    ///
    /// Swath pixels with valid geolocation go into a 3-D geocentric k-d
    /// tree; every cell center queries its single nearest neighbor and
    /// keeps it only within `config.max_distance_m`. Cell centers of UTM
    /// grids are inverse-projected to geographic coordinates first.
    pub fn build(
        field: &GeolocationField,
        grid: &GridDefinition,
        config: &ResampleConfig,
    ) -> Result<Self> {
        config.validate()?;

        let mut tree: KdTree<f64, 3> = KdTree::new();
        let mut valid = 0u64;
        for i in 0..field.len() {
            if !field.is_valid(i) {
                continue;
            }
            let (lat, lon) = field.coord(i);
            tree.add(&geo_to_xyz(lat, lon), i as u64);
            valid += 1;
        }
        if valid == 0 {
            return Err(SwathGridError::ResampleGeometry(
                "no valid geolocation pixels to index".to_string(),
            ));
        }

        let utm = match grid.family {
            ProjectionFamily::Utm { .. } => Some(UtmProjection::from_epsg(grid.epsg)?),
            ProjectionFamily::Geographic => None,
        };

        let max_sq = config.max_distance_m * config.max_distance_m;
        let mut targets = Vec::with_capacity(grid.len());
        let mut matched = 0usize;

        for row in 0..grid.rows {
            for col in 0..grid.cols {
                let (x, y) = grid.cell_center(row, col);
                let (lat, lon) = match &utm {
                    Some(proj) => proj.inverse(x, y),
                    None => (y, x),
                };
                let nearest = tree.nearest_one::<SquaredEuclidean>(&geo_to_xyz(lat, lon));
                if nearest.distance <= max_sq {
                    targets.push(Some(nearest.item as u32));
                    matched += 1;
                } else {
                    targets.push(None);
                }
            }
        }

        if matched == 0 {
            return Err(SwathGridError::ResampleGeometry(format!(
                "no grid cell within {} m of any swath pixel",
                config.max_distance_m
            )));
        }

        debug!(
            matched,
            total = targets.len(),
            swath_pixels = valid,
            "built correspondence"
        );

        Ok(Self {
            targets,
            rows: grid.rows,
            cols: grid.cols,
            swath_len: field.len(),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Length of the swath arrays this correspondence was built against.
    pub fn swath_len(&self) -> usize {
        self.swath_len
    }

    /// Per-cell matches in row-major order.
    pub fn targets(&self) -> &[Option<u32>] {
        &self.targets
    }

    /// Number of matched cells.
    pub fn matched(&self) -> usize {
        self.targets.iter().filter(|t| t.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swath_common::OutputMode;
    use test_utils::gradient_swath;

    fn field(h: usize, w: usize) -> GeolocationField {
        let (lats, lons) = gradient_swath(h, w, 40.0, -0.001, -105.0, 0.001);
        GeolocationField::new(lats, lons, h, w).unwrap()
    }

    #[test]
    fn test_build_matches_cells_over_swath() {
        let field = field(10, 10);
        let config = ResampleConfig::default();
        let grid = GridDefinition::from_swath(&field, OutputMode::Geo, &config).unwrap();
        let corr = Correspondence::build(&field, &grid, &config).unwrap();
        assert_eq!(corr.targets().len(), grid.len());
        assert!(corr.matched() > 0);
        assert_eq!(corr.swath_len(), 100);
    }

    #[test]
    fn test_all_invalid_geolocation_fails() {
        let f = GeolocationField::new(vec![f64::NAN; 4], vec![f64::NAN; 4], 2, 2).unwrap();
        let good = field(10, 10);
        let config = ResampleConfig::default();
        let grid = GridDefinition::from_swath(&good, OutputMode::Geo, &config).unwrap();
        assert!(matches!(
            Correspondence::build(&f, &grid, &config),
            Err(SwathGridError::ResampleGeometry(_))
        ));
    }

    #[test]
    fn test_distant_swath_leaves_grid_unmatched() {
        // Grid over Colorado, swath pixels on another continent: every
        // nearest neighbor is far beyond the cutoff, which must be an error
        // rather than a silently all-fill result.
        let near = field(10, 10);
        let config = ResampleConfig::default();
        let grid = GridDefinition::from_swath(&near, OutputMode::Geo, &config).unwrap();

        let (lats, lons) = gradient_swath(10, 10, 48.0, -0.001, 11.0, 0.001);
        let far = GeolocationField::new(lats, lons, 10, 10).unwrap();
        assert!(matches!(
            Correspondence::build(&far, &grid, &config),
            Err(SwathGridError::ResampleGeometry(_))
        ));
    }

    #[test]
    fn test_utm_grid_cells_match_too() {
        let field = field(10, 10);
        let config = ResampleConfig::default();
        let grid = GridDefinition::from_swath(&field, OutputMode::Utm, &config).unwrap();
        let corr = Correspondence::build(&field, &grid, &config).unwrap();
        assert!(corr.matched() > 0);
    }
}
