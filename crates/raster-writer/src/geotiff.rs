//! GeoTIFF encoding and decoding.
//!
//! Single-band 32-bit float rasters with georeferencing carried in the
//! GeoTIFF tags: pixel scale, tiepoint, geokey directory and the GDAL
//! nodata convention. Pure Rust, no GDAL dependency.

use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Read, Seek, Write};
use std::path::Path;

use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::encoder::colortype::Gray32Float;
use tiff::encoder::{Compression, TiffEncoder};
use tiff::tags::Tag;
use tracing::debug;

use projection::epsg_from_wkt;
use swath_common::GeoTransform;

use crate::error::{RasterError, Result};

// GeoTIFF tag IDs (not in the standard tiff crate)
const TAG_MODEL_PIXEL_SCALE: u16 = 33550;
const TAG_MODEL_TIEPOINT: u16 = 33922;
const TAG_GEO_KEY_DIRECTORY: u16 = 34735;
const TAG_GEO_ASCII_PARAMS: u16 = 34737;
const TAG_GDAL_NODATA: u16 = 42113;

// GeoKey IDs
const KEY_GT_MODEL_TYPE: u16 = 1024;
const KEY_GT_RASTER_TYPE: u16 = 1025;
const KEY_GEOGRAPHIC_TYPE: u16 = 2048;
const KEY_PROJECTED_CS_TYPE: u16 = 3072;

// GeoKey values
const MODEL_TYPE_PROJECTED: u16 = 1;
const MODEL_TYPE_GEOGRAPHIC: u16 = 2;
const RASTER_PIXEL_IS_AREA: u16 = 1;
const CS_USER_DEFINED: u16 = 32767;

/// Compression method for GeoTIFF output.
#[derive(Debug, Clone, Copy, Default)]
pub enum GeoTiffCompression {
    /// No compression.
    #[default]
    None,
    /// LZW compression.
    Lzw,
    /// Deflate (zlib) compression.
    Deflate,
}

/// Coordinate reference system of a raster.
///
/// Products carry either a plain EPSG code or, for pre-gridded inputs, an
/// embedded well-known-text definition. A WKT CRS is written as a
/// user-defined geokey with the text in the ASCII params tag.
#[derive(Debug, Clone, PartialEq)]
pub enum RasterCrs {
    Epsg(u32),
    Wkt(String),
}

impl RasterCrs {
    /// The EPSG code of this CRS, extracted from the WKT authority when not
    /// given directly.
    pub fn epsg(&self) -> Option<u32> {
        match self {
            Self::Epsg(code) => Some(*code),
            Self::Wkt(wkt) => epsg_from_wkt(wkt),
        }
    }

    fn is_geographic(&self) -> bool {
        self.epsg() == Some(projection::EPSG_WGS84)
    }
}

/// A single-band f32 raster with georeferencing, ready to encode.
#[derive(Debug, Clone)]
pub struct GeoTiffRaster {
    /// Row-major pixel values, row 0 at the top.
    pub pixels: Vec<f32>,
    pub width: usize,
    pub height: usize,
    pub geotransform: GeoTransform,
    pub crs: RasterCrs,
    pub nodata: Option<f64>,
}

impl GeoTiffRaster {
    /// Write to a file path, uncompressed.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())?;
        self.write_to(BufWriter::new(file), GeoTiffCompression::None)?;
        debug!(path = %path.as_ref().display(), width = self.width, height = self.height, "wrote geotiff");
        Ok(())
    }

    /// Encode into an in-memory buffer.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        self.write_to(&mut buffer, GeoTiffCompression::None)?;
        Ok(buffer.into_inner())
    }

    /// Write to any writer that implements `Write + Seek`.
    pub fn write_to<W: Write + Seek>(
        &self,
        writer: W,
        compression: GeoTiffCompression,
    ) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RasterError::InvalidData(
                "raster has zero dimensions".to_string(),
            ));
        }
        if self.pixels.len() != self.width * self.height {
            return Err(RasterError::InvalidData(format!(
                "pixel count {} does not match {}x{}",
                self.pixels.len(),
                self.width,
                self.height
            )));
        }
        let gt = &self.geotransform;
        if gt.row_rotation != 0.0 || gt.col_rotation != 0.0 {
            return Err(RasterError::InvalidData(
                "rotated geotransforms are not encodable".to_string(),
            ));
        }
        if gt.pixel_width <= 0.0 || gt.pixel_height >= 0.0 {
            return Err(RasterError::InvalidData(
                "geotransform must be north-up with positive pixel width".to_string(),
            ));
        }

        let compression = match compression {
            GeoTiffCompression::None => Compression::Uncompressed,
            GeoTiffCompression::Lzw => Compression::Lzw,
            GeoTiffCompression::Deflate => {
                Compression::Deflate(tiff::encoder::DeflateLevel::Fast)
            }
        };

        let mut encoder = TiffEncoder::new(writer)?.with_compression(compression);
        let mut image =
            encoder.new_image::<Gray32Float>(self.width as u32, self.height as u32)?;
        self.write_geo_tags(image.encoder())?;
        image.write_data(&self.pixels)?;
        Ok(())
    }

    fn write_geo_tags<W: Write + Seek, K: tiff::encoder::TiffKind>(
        &self,
        dir: &mut tiff::encoder::DirectoryEncoder<W, K>,
    ) -> Result<()> {
        let gt = &self.geotransform;

        // ModelPixelScale: [ScaleX, ScaleY, ScaleZ]
        let pixel_scale = [gt.pixel_width, -gt.pixel_height, 0.0];
        dir.write_tag(Tag::Unknown(TAG_MODEL_PIXEL_SCALE), pixel_scale.as_slice())?;

        // ModelTiepoint ties pixel (0, 0) to the upper-left origin.
        let tiepoint = [0.0, 0.0, 0.0, gt.origin_x, gt.origin_y, 0.0];
        dir.write_tag(Tag::Unknown(TAG_MODEL_TIEPOINT), tiepoint.as_slice())?;

        dir.write_tag(
            Tag::Unknown(TAG_GEO_KEY_DIRECTORY),
            self.build_geokey_directory().as_slice(),
        )?;

        if let RasterCrs::Wkt(wkt) = &self.crs {
            // GeoAsciiParams entries are pipe-delimited.
            let ascii_params = format!("{wkt}|");
            dir.write_tag(Tag::Unknown(TAG_GEO_ASCII_PARAMS), ascii_params.as_str())?;
        }

        if let Some(nodata) = self.nodata {
            dir.write_tag(Tag::Unknown(TAG_GDAL_NODATA), format!("{nodata}").as_str())?;
        }

        Ok(())
    }

    fn build_geokey_directory(&self) -> Vec<u16> {
        // [KeyDirectoryVersion, KeyRevision, MinorRevision, NumberOfKeys,
        //  KeyID, TIFFTagLocation, Count, ValueOffset, ...]
        let mut keys = vec![1, 1, 0, 3];

        let is_geographic = self.crs.is_geographic();
        keys.extend_from_slice(&[
            KEY_GT_MODEL_TYPE,
            0,
            1,
            if is_geographic {
                MODEL_TYPE_GEOGRAPHIC
            } else {
                MODEL_TYPE_PROJECTED
            },
        ]);
        keys.extend_from_slice(&[KEY_GT_RASTER_TYPE, 0, 1, RASTER_PIXEL_IS_AREA]);

        let code = match &self.crs {
            RasterCrs::Epsg(code) => *code as u16,
            RasterCrs::Wkt(_) => CS_USER_DEFINED,
        };
        if is_geographic {
            keys.extend_from_slice(&[KEY_GEOGRAPHIC_TYPE, 0, 1, code]);
        } else {
            keys.extend_from_slice(&[KEY_PROJECTED_CS_TYPE, 0, 1, code]);
        }

        keys
    }
}

/// Decode a GeoTIFF file written by this crate (or any compatible
/// single-band f32 GeoTIFF).
pub fn read_geotiff<P: AsRef<Path>>(path: P) -> Result<GeoTiffRaster> {
    let file = File::open(path)?;
    read_geotiff_from(BufReader::new(file))
}

/// Decode a GeoTIFF from any reader that implements `Read + Seek`.
pub fn read_geotiff_from<R: Read + Seek>(reader: R) -> Result<GeoTiffRaster> {
    let mut decoder = Decoder::new(reader)?.with_limits(Limits::unlimited());
    let (width, height) = decoder.dimensions()?;

    let scale = decoder.get_tag_f64_vec(Tag::Unknown(TAG_MODEL_PIXEL_SCALE))?;
    let tiepoint = decoder.get_tag_f64_vec(Tag::Unknown(TAG_MODEL_TIEPOINT))?;
    if scale.len() < 2 || tiepoint.len() < 6 {
        return Err(RasterError::MissingGeoreference(
            "pixel scale or tiepoint tag malformed".to_string(),
        ));
    }
    // Back out the upper-left origin from an arbitrary tiepoint.
    let origin_x = tiepoint[3] - tiepoint[0] * scale[0];
    let origin_y = tiepoint[4] + tiepoint[1] * scale[1];
    let geotransform =
        GeoTransform::from_array([origin_x, scale[0], 0.0, origin_y, 0.0, -scale[1]]);

    let crs = decode_crs(&mut decoder)?;

    let nodata = decoder
        .get_tag_ascii_string(Tag::Unknown(TAG_GDAL_NODATA))
        .ok()
        .and_then(|s| s.trim().trim_end_matches('\0').parse::<f64>().ok());

    let pixels = match decoder.read_image()? {
        DecodingResult::F32(data) => data,
        _ => {
            return Err(RasterError::InvalidData(
                "expected a 32-bit float raster".to_string(),
            ))
        }
    };
    if pixels.len() != (width as usize) * (height as usize) {
        return Err(RasterError::InvalidData(format!(
            "decoded {} pixels for a {}x{} image",
            pixels.len(),
            width,
            height
        )));
    }

    Ok(GeoTiffRaster {
        pixels,
        width: width as usize,
        height: height as usize,
        geotransform,
        crs,
        nodata,
    })
}

fn decode_crs<R: Read + Seek>(decoder: &mut Decoder<R>) -> Result<RasterCrs> {
    let keys = decoder.get_tag_u64_vec(Tag::Unknown(TAG_GEO_KEY_DIRECTORY))?;

    let mut code = None;
    for entry in keys[4.min(keys.len())..].chunks_exact(4) {
        let key = entry[0] as u16;
        if key == KEY_GEOGRAPHIC_TYPE || key == KEY_PROJECTED_CS_TYPE {
            code = Some(entry[3] as u16);
        }
    }

    match code {
        Some(CS_USER_DEFINED) => {
            let ascii = decoder
                .get_tag_ascii_string(Tag::Unknown(TAG_GEO_ASCII_PARAMS))
                .map_err(|_| {
                    RasterError::MissingGeoreference(
                        "user-defined CRS without ASCII params".to_string(),
                    )
                })?;
            let wkt = ascii.trim_end_matches('\0').trim_end_matches('|').to_string();
            Ok(RasterCrs::Wkt(wkt))
        }
        Some(code) => Ok(RasterCrs::Epsg(code as u32)),
        None => Err(RasterError::MissingGeoreference(
            "no CRS geokey present".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::ramp_layer;

    fn utm_raster() -> GeoTiffRaster {
        GeoTiffRaster {
            pixels: ramp_layer(16, 16),
            width: 16,
            height: 16,
            geotransform: GeoTransform::north_up(500000.0, 4427000.0, 70.0),
            crs: RasterCrs::Epsg(32613),
            nodata: Some(-9999.0),
        }
    }

    #[test]
    fn test_encode_magic_bytes() {
        let bytes = utm_raster().to_bytes().unwrap();
        assert!(bytes.len() > 8);
        assert!(bytes[0] == b'I' && bytes[1] == b'I' || bytes[0] == b'M' && bytes[1] == b'M');
    }

    #[test]
    fn test_roundtrip_preserves_georeferencing() {
        let raster = utm_raster();
        let bytes = raster.to_bytes().unwrap();
        let decoded = read_geotiff_from(Cursor::new(bytes)).unwrap();

        assert_eq!(decoded.width, 16);
        assert_eq!(decoded.height, 16);
        assert_eq!(decoded.pixels, raster.pixels);
        assert_eq!(decoded.crs, RasterCrs::Epsg(32613));
        assert_eq!(decoded.nodata, Some(-9999.0));
        let gt = decoded.geotransform;
        assert!((gt.origin_x - 500000.0).abs() < 1e-6);
        assert!((gt.origin_y - 4427000.0).abs() < 1e-6);
        assert!((gt.pixel_width - 70.0).abs() < 1e-9);
        assert!((gt.pixel_height + 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_compressed_output_decodes_identically() {
        let raster = utm_raster();
        for compression in [GeoTiffCompression::Lzw, GeoTiffCompression::Deflate] {
            let mut buffer = Cursor::new(Vec::new());
            raster.write_to(&mut buffer, compression).unwrap();
            let decoded = read_geotiff_from(Cursor::new(buffer.into_inner())).unwrap();
            assert_eq!(decoded.pixels, raster.pixels, "{compression:?}");
            assert_eq!(decoded.crs, RasterCrs::Epsg(32613));
            assert_eq!(decoded.nodata, Some(-9999.0));
        }
    }

    #[test]
    fn test_geokeys_projected() {
        let keys = utm_raster().build_geokey_directory();
        assert_eq!(keys[3], 3);
        assert_eq!(keys[4], KEY_GT_MODEL_TYPE);
        assert_eq!(keys[7], MODEL_TYPE_PROJECTED);
        assert_eq!(keys[12], KEY_PROJECTED_CS_TYPE);
        assert_eq!(keys[15], 32613);
    }

    #[test]
    fn test_geokeys_geographic() {
        let mut raster = utm_raster();
        raster.crs = RasterCrs::Epsg(4326);
        raster.geotransform = GeoTransform::north_up(-105.0, 40.0, 0.0007);
        let keys = raster.build_geokey_directory();
        assert_eq!(keys[7], MODEL_TYPE_GEOGRAPHIC);
        assert_eq!(keys[12], KEY_GEOGRAPHIC_TYPE);
        assert_eq!(keys[15], 4326);
    }

    #[test]
    fn test_wkt_crs_roundtrip() {
        let wkt = r#"PROJCS["WGS 84 / UTM zone 13N",AUTHORITY["EPSG","32613"]]"#;
        let mut raster = utm_raster();
        raster.crs = RasterCrs::Wkt(wkt.to_string());
        let bytes = raster.to_bytes().unwrap();
        let decoded = read_geotiff_from(Cursor::new(bytes)).unwrap();
        match &decoded.crs {
            RasterCrs::Wkt(w) => assert_eq!(w, wkt),
            other => panic!("expected WKT CRS, got {other:?}"),
        }
        assert_eq!(decoded.crs.epsg(), Some(32613));
    }

    #[test]
    fn test_missing_nodata_decodes_as_none() {
        let mut raster = utm_raster();
        raster.nodata = None;
        let decoded = read_geotiff_from(Cursor::new(raster.to_bytes().unwrap())).unwrap();
        assert_eq!(decoded.nodata, None);
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let raster = GeoTiffRaster {
            pixels: vec![],
            width: 0,
            height: 0,
            geotransform: GeoTransform::north_up(0.0, 0.0, 1.0),
            crs: RasterCrs::Epsg(4326),
            nodata: None,
        };
        assert!(matches!(
            raster.to_bytes(),
            Err(RasterError::InvalidData(_))
        ));
    }

    #[test]
    fn test_pixel_count_mismatch_rejected() {
        let mut raster = utm_raster();
        raster.pixels.pop();
        assert!(matches!(
            raster.to_bytes(),
            Err(RasterError::InvalidData(_))
        ));
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene_LST_UTM.tif");
        utm_raster().write(&path).unwrap();
        let decoded = read_geotiff(&path).unwrap();
        assert_eq!(decoded.width, 16);
    }
}
