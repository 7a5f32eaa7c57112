//! Input directory scanning and data/geolocation file pairing.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Length of the filename suffix shared between a data file and its
/// geolocation companion (orbit, scene ID, acquisition timestamp, build and
/// version fields).
const GEO_SUFFIX_LEN: usize = 37;

/// How a scene's geolocation is supplied, decided once from the filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneFamily {
    /// Data file plus a companion geolocation file.
    Paired,
    /// The data file carries its own lat/lon datasets (mapped L1B products).
    SelfLocated,
    /// Already gridded with an embedded geotransform (ALEXI products).
    PreGridded,
}

/// One processable scene found in the input directory.
#[derive(Debug, Clone)]
pub struct Scene {
    /// Filename up to the container extension; prefixes every output name.
    pub name: String,
    pub data_path: PathBuf,
    /// Companion geolocation file, for [`SceneFamily::Paired`] scenes only.
    pub geo_path: Option<PathBuf>,
    pub family: SceneFamily,
}

/// Scan a directory for scenes.
///
/// `.h5` files with `GEO` in the name are geolocation companions; the rest
/// are data files. A paired data file matches the companion sharing its
/// trailing filename suffix; data files with no companion are skipped with
/// a warning.
pub fn scan(input_dir: &Path) -> Result<Vec<Scene>> {
    let mut geo_files = Vec::new();
    let mut data_files = Vec::new();

    for entry in WalkDir::new(input_dir).max_depth(1).min_depth(1) {
        let entry = entry.with_context(|| format!("listing {}", input_dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if !name.ends_with(".h5") {
            continue;
        }
        if name.contains("GEO") {
            geo_files.push((name, entry.path().to_path_buf()));
        } else {
            data_files.push((name, entry.path().to_path_buf()));
        }
    }
    data_files.sort();

    let mut scenes = Vec::new();
    for (name, path) in data_files {
        let scene_name = name.split(".h5").next().unwrap_or(&name).to_string();

        if name.contains("ALEXI_USDA") {
            scenes.push(Scene {
                name: scene_name,
                data_path: path,
                geo_path: None,
                family: SceneFamily::PreGridded,
            });
            continue;
        }
        if name.contains("L1B_MAP") {
            scenes.push(Scene {
                name: scene_name,
                data_path: path,
                geo_path: None,
                family: SceneFamily::SelfLocated,
            });
            continue;
        }

        let suffix: String = if name.len() >= GEO_SUFFIX_LEN {
            name.chars().skip(name.chars().count() - GEO_SUFFIX_LEN).collect()
        } else {
            name.clone()
        };
        match geo_files.iter().find(|(g, _)| g.contains(&suffix)) {
            Some((_, geo_path)) => scenes.push(Scene {
                name: scene_name,
                data_path: path,
                geo_path: Some(geo_path.clone()),
                family: SceneFamily::Paired,
            }),
            None => {
                warn!(file = %name, "geolocation file not found, skipping scene");
            }
        }
    }

    debug!(
        scenes = scenes.len(),
        geolocation_files = geo_files.len(),
        "scanned input directory"
    );
    Ok(scenes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    fn touch(dir: &Path, name: &str) {
        File::create(dir.join(name)).unwrap();
    }

    #[test]
    fn test_pairs_data_with_geo_by_suffix() {
        let dir = tempfile::tempdir().unwrap();
        touch(
            dir.path(),
            "ECOSTRESS_L2_LSTE_03617_002_20190504T022352_0601_02.h5",
        );
        touch(
            dir.path(),
            "ECOSTRESS_L1B_GEO_03617_002_20190504T022352_0601_02.h5",
        );

        let scenes = scan(dir.path()).unwrap();
        assert_eq!(scenes.len(), 1);
        let scene = &scenes[0];
        assert_eq!(scene.family, SceneFamily::Paired);
        assert_eq!(
            scene.name,
            "ECOSTRESS_L2_LSTE_03617_002_20190504T022352_0601_02"
        );
        assert!(scene
            .geo_path
            .as_ref()
            .unwrap()
            .to_string_lossy()
            .contains("L1B_GEO"));
    }

    #[test]
    fn test_unpaired_data_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        touch(
            dir.path(),
            "ECOSTRESS_L2_LSTE_03617_002_20190504T022352_0601_02.h5",
        );
        touch(
            dir.path(),
            "ECOSTRESS_L1B_GEO_99999_001_20190101T000000_0601_02.h5",
        );

        let scenes = scan(dir.path()).unwrap();
        assert!(scenes.is_empty());
    }

    #[test]
    fn test_mapped_product_locates_itself() {
        let dir = tempfile::tempdir().unwrap();
        touch(
            dir.path(),
            "ECOSTRESS_L1B_MAP_03617_002_20190504T022352_0601_02.h5",
        );

        let scenes = scan(dir.path()).unwrap();
        assert_eq!(scenes.len(), 1);
        assert_eq!(scenes[0].family, SceneFamily::SelfLocated);
        assert!(scenes[0].geo_path.is_none());
    }

    #[test]
    fn test_alexi_product_is_pre_gridded() {
        let dir = tempfile::tempdir().unwrap();
        touch(
            dir.path(),
            "ECOSTRESS_L3_ET_ALEXI_USDA_03617_002_20190504T022352_0601_02.h5",
        );

        let scenes = scan(dir.path()).unwrap();
        assert_eq!(scenes.len(), 1);
        assert_eq!(scenes[0].family, SceneFamily::PreGridded);
    }

    #[test]
    fn test_non_h5_files_ignored() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "README.txt");
        touch(dir.path(), "scene.tif");

        let scenes = scan(dir.path()).unwrap();
        assert!(scenes.is_empty());
    }
}
