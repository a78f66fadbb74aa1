//! Dataset configuration files
//!
//! A dataset is described in TOML:
//!
//! ```toml
//! [dataset]
//! name = "elevation"
//! cell_type = "16bit_u"
//! bands = 1
//! tile_width = 256
//! tile_height = 256
//! crs = "EPSG:3857"
//!
//! [dataset.colormap]     # optional, value = "#RRGGBB[AA]"
//! 1 = "#ff0000"
//!
//! [[raster]]
//! id = 1
//! tiles = "tiles/r1"     # relative to the configuration file
//! compression = "deflate"
//! byte_order = "big"
//! no_data = [0]          # optional, per band
//! stats = [[1, 4000]]    # optional, per band min/max used to derive no-data
//!
//! [[raster.level]]
//! width = 512
//! height = 512
//! offset = [0, 0]
//! envelope = [0.0, 0.0, 5120.0, 5120.0]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use toml::Value;

use crate::coordinate::{CoordinateSystem, Envelope};
use crate::io::byte_order::ByteOrder;
use crate::raster::catalog::{DatasetInfo, PyramidLevel, RasterInfo};
use crate::raster::cell_type::{suggest_no_data_value, CellType};
use crate::raster::colormap::{ColorMap, RgbaColor};
use crate::raster::errors::{MosaicError, MosaicResult};
use crate::store::{DirectoryTileStore, RasterTileDirectory};

/// A parsed dataset: its catalog and the store holding its tiles
pub struct DatasetConfig {
    pub catalog: DatasetInfo,
    pub store: DirectoryTileStore,
}

impl DatasetConfig {
    /// Load a dataset file; tile directories resolve against its folder
    pub fn from_file(path: impl AsRef<Path>) -> MosaicResult<Self> {
        let path = path.as_ref();
        info!("Loading dataset configuration {}", path.display());
        let content = fs::read_to_string(path)?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self::from_str(&content, &base_dir)
    }

    /// Parse a dataset description
    pub fn from_str(content: &str, base_dir: &Path) -> MosaicResult<Self> {
        let root: Value = content
            .parse()
            .map_err(|e| MosaicError::InvalidConfig(format!("Failed to parse TOML: {}", e)))?;

        let dataset = root
            .get("dataset")
            .and_then(Value::as_table)
            .ok_or_else(|| invalid("missing [dataset] table"))?;

        let name = dataset.get("name").and_then(Value::as_str).unwrap_or("dataset");
        let cell_type: CellType = required_str(dataset, "cell_type", "dataset")?.parse()?;
        let num_bands = required_int(dataset, "bands", "dataset")? as usize;
        let tile_width = required_int(dataset, "tile_width", "dataset")? as usize;
        let tile_height = required_int(dataset, "tile_height", "dataset")? as usize;
        let crs = match dataset.get("crs").and_then(Value::as_str) {
            Some(crs) => CoordinateSystem::parse(crs)?,
            None => CoordinateSystem::WGS84,
        };
        let color_map = match dataset.get("colormap") {
            Some(value) => Some(parse_color_map(value)?),
            None => None,
        };

        let mut catalog = DatasetInfo::new(name, cell_type, num_bands, crs);
        let mut store = DirectoryTileStore::new();

        let rasters = root
            .get("raster")
            .and_then(Value::as_array)
            .ok_or_else(|| invalid("at least one [[raster]] table is required"))?;

        for raster in rasters {
            let table = raster.as_table().ok_or_else(|| invalid("[[raster]] entries must be tables"))?;
            let raster_id = required_int(table, "id", "raster")? as u64;
            let context = format!("raster {}", raster_id);

            let raster_tile_width = optional_int(table, "tile_width")?.map_or(tile_width, |v| v as usize);
            let raster_tile_height = optional_int(table, "tile_height")?.map_or(tile_height, |v| v as usize);
            let mut info = RasterInfo::new(raster_id, raster_tile_width, raster_tile_height, num_bands);

            if let Some(band_ids) = table.get("band_ids") {
                info = info.with_band_ids(int_list(band_ids, &context)?.into_iter().map(|v| v as u64).collect());
            }
            info = info.with_no_data(parse_no_data(table, cell_type, num_bands, &context)?);
            if let Some(color_map) = &color_map {
                info = info.with_color_map(color_map.clone());
            }

            let levels = table
                .get("level")
                .and_then(Value::as_array)
                .ok_or_else(|| invalid(&format!("{} has no [[raster.level]] tables", context)))?;
            for level in levels {
                info = info.with_level(parse_level(level, &context)?);
            }

            let tiles_dir = table.get("tiles").and_then(Value::as_str).map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(format!("raster_{}", raster_id)));
            let compression = table.get("compression").and_then(Value::as_str).unwrap_or("none");
            let byte_order = match table.get("byte_order").and_then(Value::as_str) {
                Some(order) => ByteOrder::from_name(order)?,
                None => ByteOrder::BigEndian,
            };
            let directory = RasterTileDirectory::new(
                base_dir.join(tiles_dir),
                compression,
                raster_tile_width * raster_tile_height,
            )?
            .with_byte_order(byte_order, cell_type.bytes_per_sample());

            debug!("{}: tiles in {} ({}, {} byte order)",
                   context, directory.root.display(), compression, byte_order.name());
            store.add_raster(raster_id, directory);
            catalog.add_raster(info)?;
        }

        info!("Dataset {} loaded: {} rasters of {} x {} bands",
              catalog.name, catalog.rasters().len(), cell_type, num_bands);
        Ok(DatasetConfig { catalog, store })
    }
}

fn invalid(msg: &str) -> MosaicError {
    MosaicError::InvalidConfig(msg.to_string())
}

fn required_str<'v>(table: &'v toml::value::Table, key: &str, context: &str) -> MosaicResult<&'v str> {
    table
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| invalid(&format!("{}: missing string '{}'", context, key)))
}

fn required_int(table: &toml::value::Table, key: &str, context: &str) -> MosaicResult<i64> {
    optional_int(table, key)?.ok_or_else(|| invalid(&format!("{}: missing integer '{}'", context, key)))
}

fn optional_int(table: &toml::value::Table, key: &str) -> MosaicResult<Option<i64>> {
    match table.get(key) {
        None => Ok(None),
        Some(Value::Integer(v)) if *v >= 0 => Ok(Some(*v)),
        Some(other) => Err(invalid(&format!("'{}' must be a non-negative integer, got {}", key, other))),
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Integer(v) => Some(*v as f64),
        Value::Float(v) => Some(*v),
        Value::String(s) if s.eq_ignore_ascii_case("nan") => Some(f64::NAN),
        _ => None,
    }
}

fn number_list(value: &Value, context: &str) -> MosaicResult<Vec<f64>> {
    value
        .as_array()
        .ok_or_else(|| invalid(&format!("{}: expected an array of numbers", context)))?
        .iter()
        .map(|v| as_number(v).ok_or_else(|| invalid(&format!("{}: {} is not a number", context, v))))
        .collect()
}

fn int_list(value: &Value, context: &str) -> MosaicResult<Vec<i64>> {
    value
        .as_array()
        .ok_or_else(|| invalid(&format!("{}: expected an array of integers", context)))?
        .iter()
        .map(|v| v.as_integer().ok_or_else(|| invalid(&format!("{}: {} is not an integer", context, v))))
        .collect()
}

fn parse_level(value: &Value, context: &str) -> MosaicResult<PyramidLevel> {
    let table = value.as_table().ok_or_else(|| invalid(&format!("{}: level must be a table", context)))?;
    let width = required_int(table, "width", context)?;
    let height = required_int(table, "height", context)?;

    let envelope = number_list(
        table.get("envelope").ok_or_else(|| invalid(&format!("{}: level without envelope", context)))?,
        context,
    )?;
    if envelope.len() != 4 {
        return Err(invalid(&format!("{}: envelope needs 4 values", context)));
    }
    let envelope = Envelope::new(envelope[0], envelope[1], envelope[2], envelope[3]);

    let mut level = PyramidLevel::new(width, height, envelope);
    if let Some(offset) = table.get("offset") {
        let offset = int_list(offset, context)?;
        if offset.len() != 2 {
            return Err(invalid(&format!("{}: offset needs 2 values", context)));
        }
        level = level.with_offset(offset[0], offset[1]);
    }
    Ok(level)
}

/// Explicit no-data values win; otherwise derive one from band statistics
fn parse_no_data(
    table: &toml::value::Table,
    cell_type: CellType,
    num_bands: usize,
    context: &str,
) -> MosaicResult<Vec<Option<f64>>> {
    if let Some(values) = table.get("no_data") {
        let values = number_list(values, context)?;
        if values.len() != num_bands {
            return Err(invalid(&format!("{}: {} no-data values for {} bands", context, values.len(), num_bands)));
        }
        return Ok(values.into_iter().map(Some).collect());
    }

    let Some(stats) = table.get("stats").and_then(Value::as_array) else {
        return Ok(vec![None; num_bands]);
    };
    if stats.len() != num_bands {
        return Err(invalid(&format!("{}: {} stats entries for {} bands", context, stats.len(), num_bands)));
    }

    stats
        .iter()
        .map(|band_stats| {
            let range = number_list(band_stats, context)?;
            if range.len() != 2 {
                return Err(invalid(&format!("{}: stats entries are [min, max]", context)));
            }
            let value = suggest_no_data_value(cell_type, range[0], range[1]);
            if !cell_type.can_represent(value) {
                warn!("{}: statistics span all of {}, no-data {} forces promotion", context, cell_type, value);
            }
            Ok(Some(value))
        })
        .collect()
}

fn parse_color_map(value: &Value) -> MosaicResult<ColorMap> {
    let table = value.as_table().ok_or_else(|| invalid("colormap must be a table"))?;
    let mut color_map = ColorMap::new();
    for (key, color) in table {
        let index: u32 = key
            .trim()
            .parse()
            .map_err(|_| invalid(&format!("colormap key '{}' is not a sample value", key)))?;
        let hex = color
            .as_str()
            .ok_or_else(|| invalid(&format!("colormap entry {} must be a hex string", key)))?;
        color_map.insert(index, RgbaColor::from_hex(hex)?);
    }
    Ok(color_map)
}
