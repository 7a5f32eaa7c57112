//! Per-scene processing: grid definition, correspondence, layer loop,
//! raster emission.

use std::path::Path;

use anyhow::{anyhow, bail, Result};
use tracing::{debug, info, warn};

use hdf_reader::{resolve_fill_value, resolve_scale_factor, ContainerReader};
use raster_writer::{
    warp_file_to_geographic, GeoTiffRaster, RasterCrs, RasterError, DEFAULT_WARP_TOLERANCE,
};
use swath_common::{GeoTransform, OutputMode, ProductKind};
use swath_grid::{
    apply_scale, resample_layer, Correspondence, GeolocationField, GridDefinition, Layer,
    ResampleConfig, SwathGridError, DEFAULT_FILL_F32,
};

use crate::scenes::{Scene, SceneFamily};

/// Open a scene's containers and process it.
#[cfg(feature = "netcdf")]
pub fn process_scene_file(
    scene: &Scene,
    mode: OutputMode,
    config: &ResampleConfig,
    out_dir: &Path,
) -> Result<usize> {
    use anyhow::Context;
    use hdf_reader::FileContainer;

    let data = FileContainer::open(&scene.data_path)
        .with_context(|| format!("opening {}", scene.data_path.display()))?;
    let geo = match &scene.geo_path {
        Some(path) => Some(
            FileContainer::open(path).with_context(|| format!("opening {}", path.display()))?,
        ),
        None => None,
    };
    process_scene(
        &data,
        geo.as_ref().map(|g| g as &dyn ContainerReader),
        &scene.name,
        scene.family,
        mode,
        config,
        out_dir,
    )
}

#[cfg(not(feature = "netcdf"))]
pub fn process_scene_file(
    scene: &Scene,
    _mode: OutputMode,
    _config: &ResampleConfig,
    _out_dir: &Path,
) -> Result<usize> {
    bail!(
        "built without the netcdf feature, cannot open {}",
        scene.data_path.display()
    )
}

/// Process one scene from already-open containers.
///
/// `geo` supplies the geolocation datasets for paired scenes; self-located
/// scenes read them from the data container itself. Returns the number of
/// layers written. Scene-level failures (missing geolocation datasets,
/// degenerate extent, nothing within the search radius) are errors; the
/// caller logs and moves on to the next scene.
pub fn process_scene(
    data: &dyn ContainerReader,
    geo: Option<&dyn ContainerReader>,
    scene_name: &str,
    family: SceneFamily,
    mode: OutputMode,
    config: &ResampleConfig,
    out_dir: &Path,
) -> Result<usize> {
    let kind = resolve_scene(data, geo, family, mode, config)?;

    let mut written = 0usize;
    for path in data.dataset_paths() {
        if !data.is_dataset(&path) {
            continue;
        }
        let shape = match data.dataset_shape(&path) {
            Ok(shape) => shape,
            Err(_) => continue,
        };
        if !layer_shape_matches(&shape, &kind) {
            continue;
        }

        let layer = Layer {
            name: path.rsplit('/').next().unwrap_or(&path).to_string(),
            data: data.read_f32(&path)?,
            height: shape[0],
            width: shape[1],
            fill_value: resolve_fill_value(data, &path),
            scale_factor: resolve_scale_factor(data, &path),
        };

        match emit_layer(&layer, &kind, scene_name, mode, out_dir) {
            Ok(()) => written += 1,
            Err(LayerError::Skip(reason)) => {
                warn!(scene = scene_name, layer = %layer.name, %reason, "skipping layer");
            }
            Err(LayerError::Fatal(e)) => return Err(e),
        }
    }

    info!(scene = scene_name, layers = written, "scene complete");
    Ok(written)
}

/// The gridded geometry of a scene, resolved once before the layer loop.
enum ResolvedKind {
    Swath {
        grid: GridDefinition,
        correspondence: Correspondence,
    },
    PreGridded {
        geotransform: GeoTransform,
        projection_wkt: String,
        dims: (usize, usize),
    },
}

enum LayerError {
    Skip(String),
    Fatal(anyhow::Error),
}

fn resolve_scene(
    data: &dyn ContainerReader,
    geo: Option<&dyn ContainerReader>,
    family: SceneFamily,
    mode: OutputMode,
    config: &ResampleConfig,
) -> Result<ResolvedKind> {
    match classify(data, family)? {
        ProductKind::Swath => {
            let geo_reader = geo.unwrap_or(data);
            let field = read_geolocation(geo_reader)?;
            let grid = GridDefinition::from_swath(&field, mode, config)?;
            let correspondence = Correspondence::build(&field, &grid, config)?;
            Ok(ResolvedKind::Swath {
                grid,
                correspondence,
            })
        }
        ProductKind::PreGridded {
            geotransform,
            projection_wkt,
        } => {
            let dims = pre_gridded_dims(data)?;
            Ok(ResolvedKind::PreGridded {
                geotransform,
                projection_wkt,
                dims,
            })
        }
    }
}

/// Decide how a scene's layers are georeferenced, once, before the layer
/// loop.
fn classify(data: &dyn ContainerReader, family: SceneFamily) -> Result<ProductKind> {
    match family {
        SceneFamily::PreGridded => read_embedded_georeference(data),
        SceneFamily::Paired | SceneFamily::SelfLocated => Ok(ProductKind::Swath),
    }
}

/// Find and read the per-pixel latitude/longitude datasets.
fn read_geolocation(reader: &dyn ContainerReader) -> Result<GeolocationField> {
    let paths = reader.dataset_paths();
    let lat_path = paths
        .iter()
        .find(|p| p.contains("/latitude"))
        .ok_or_else(|| anyhow!("no latitude dataset in geolocation container"))?;
    let lon_path = paths
        .iter()
        .find(|p| p.contains("/longitude"))
        .ok_or_else(|| anyhow!("no longitude dataset in geolocation container"))?;

    let shape = reader.dataset_shape(lat_path)?;
    if shape.len() != 2 {
        bail!("latitude dataset {} is not 2-D", lat_path);
    }
    let lats = reader.read_f64(lat_path)?;
    let lons = reader.read_f64(lon_path)?;
    debug!(lat = %lat_path, lon = %lon_path, height = shape[0], width = shape[1], "read geolocation");
    Ok(GeolocationField::new(lats, lons, shape[0], shape[1])?)
}

/// Read the geotransform and projection text embedded in a pre-gridded
/// container's metadata group.
fn read_embedded_georeference(data: &dyn ContainerReader) -> Result<ProductKind> {
    let paths = data.dataset_paths();
    let gt_path = paths
        .iter()
        .find(|p| p.ends_with("/Geotransform"))
        .ok_or_else(|| anyhow!("pre-gridded container has no Geotransform dataset"))?;
    let wkt_path = paths
        .iter()
        .find(|p| p.ends_with("/OGC_Well_Known_Text"))
        .ok_or_else(|| anyhow!("pre-gridded container has no OGC_Well_Known_Text dataset"))?;

    let gt = data.read_f64(gt_path)?;
    if gt.len() != 6 {
        bail!("Geotransform has {} elements, expected 6", gt.len());
    }
    let projection_wkt = data.read_text(wkt_path)?;
    Ok(ProductKind::PreGridded {
        geotransform: GeoTransform::from_array([gt[0], gt[1], gt[2], gt[3], gt[4], gt[5]]),
        projection_wkt,
    })
}

/// Dimensions of a pre-gridded scene: the shape shared by its 2-D layers.
fn pre_gridded_dims(data: &dyn ContainerReader) -> Result<(usize, usize)> {
    for path in data.dataset_paths() {
        if let Ok(shape) = data.dataset_shape(&path) {
            if shape.len() == 2 {
                return Ok((shape[0], shape[1]));
            }
        }
    }
    bail!("pre-gridded container has no 2-D layer")
}

fn layer_shape_matches(shape: &[usize], kind: &ResolvedKind) -> bool {
    if shape.len() != 2 {
        return false;
    }
    match kind {
        // Resampling needs the swath shape; the grid shape is the output.
        ResolvedKind::Swath { correspondence, .. } => {
            shape[0] * shape[1] == correspondence.swath_len()
        }
        ResolvedKind::PreGridded { dims, .. } => (shape[0], shape[1]) == *dims,
    }
}

fn emit_layer(
    layer: &Layer,
    kind: &ResolvedKind,
    scene_name: &str,
    mode: OutputMode,
    out_dir: &Path,
) -> std::result::Result<(), LayerError> {
    match kind {
        ResolvedKind::Swath {
            grid,
            correspondence,
        } => {
            let mut pixels = match resample_layer(layer, correspondence) {
                Ok(pixels) => pixels,
                Err(SwathGridError::DimensionMismatch { expected, actual }) => {
                    return Err(LayerError::Skip(format!(
                        "shape mismatch: expected {expected} values, got {actual}"
                    )));
                }
                Err(e) => return Err(LayerError::Fatal(e.into())),
            };
            apply_scale(&mut pixels, layer.scale_factor, layer.fill_value);

            let raster = GeoTiffRaster {
                pixels,
                width: grid.cols,
                height: grid.rows,
                geotransform: grid.geotransform(),
                crs: RasterCrs::Epsg(grid.epsg),
                // Unmatched cells hold the sentinel, so nodata is always known.
                nodata: Some(layer.fill_value.unwrap_or(DEFAULT_FILL_F32 as f64)),
            };
            let out_path = out_dir.join(format!("{}_{}_{}.tif", scene_name, layer.name, mode));
            raster.write(&out_path).map_err(|e| {
                LayerError::Fatal(anyhow::Error::new(e).context("writing output raster"))
            })?;
            Ok(())
        }
        ResolvedKind::PreGridded {
            geotransform,
            projection_wkt,
            dims,
        } => {
            let mut pixels = layer.data.clone();
            apply_scale(&mut pixels, layer.scale_factor, layer.fill_value);

            let raster = GeoTiffRaster {
                pixels,
                width: dims.1,
                height: dims.0,
                geotransform: *geotransform,
                crs: RasterCrs::Wkt(projection_wkt.clone()),
                nodata: layer.fill_value,
            };
            let out_path = out_dir.join(format!("{}_{}_{}.tif", scene_name, layer.name, mode));

            if mode == OutputMode::Geo {
                // Non-native mode for this family: write the native raster
                // to a temp file, warp it to EPSG:4326, remove the temp.
                let temp_path =
                    out_dir.join(format!("{}_{}_TEMP.tif", scene_name, layer.name));
                raster.write(&temp_path).map_err(|e| {
                    LayerError::Fatal(anyhow::Error::new(e).context("writing native raster"))
                })?;
                match warp_file_to_geographic(&temp_path, &out_path, DEFAULT_WARP_TOLERANCE) {
                    Ok(()) => {
                        std::fs::remove_file(&temp_path).map_err(|e| {
                            LayerError::Fatal(anyhow::Error::new(e).context("removing temp file"))
                        })?;
                        Ok(())
                    }
                    Err(RasterError::UnsupportedSourceCrs(reason)) => {
                        // No usable EPSG authority: keep the native raster.
                        warn!(layer = %layer.name, %reason, "cannot warp, keeping native projection");
                        std::fs::rename(&temp_path, &out_path).map_err(|e| {
                            LayerError::Fatal(anyhow::Error::new(e).context("renaming temp file"))
                        })?;
                        Ok(())
                    }
                    Err(e) => Err(LayerError::Fatal(
                        anyhow::Error::new(e).context("warping to geographic"),
                    )),
                }
            } else {
                raster.write(&out_path).map_err(|e| {
                    LayerError::Fatal(anyhow::Error::new(e).context("writing output raster"))
                })?;
                Ok(())
            }
        }
    }
}
