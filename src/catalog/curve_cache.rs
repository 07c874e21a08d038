//! Bincode cache of interpolated occupancy curves.
//!
//! Interpolating every street is the slowest part of loading, so the gridded curves are
//! written next to other cached data and reused while they are newer than the CSV they
//! were built from.

use crate::catalog::error::CatalogError;
use crate::occupancy::curve::OccupancyCurve;
use crate::occupancy::model::OccupancyModel;
use bincode::config::{Configuration, Fixint, LittleEndian};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const CACHE_FILE_PREFIX: &str = "occupancy_curves_";
const BINCODE_CONFIG: Configuration<LittleEndian, Fixint> =
    bincode::config::standard().with_fixed_int_encoding();

#[derive(Serialize, Deserialize)]
struct CachedCurves {
    curves: Vec<(String, Vec<f64>)>,
    rejected: Vec<String>,
}

/// Cache file for curves built from `source`, e.g. `occupancy_curves_Occupancy_per_hour.bin`.
pub fn cache_path(cache_dir: &Path, source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().replace(|c: char| !c.is_ascii_alphanumeric(), "_"))
        .unwrap_or_default();
    cache_dir.join(format!("{}{}.bin", CACHE_FILE_PREFIX, stem))
}

/// Whether `cache` exists and was modified no earlier than `source`.
pub fn is_fresh(cache: &Path, source: &Path) -> Result<bool, CatalogError> {
    let cache_modified = match std::fs::metadata(cache) {
        Ok(metadata) => metadata
            .modified()
            .map_err(|e| CatalogError::Metadata(cache.to_path_buf(), e))?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(CatalogError::Metadata(cache.to_path_buf(), e)),
    };
    let source_modified = std::fs::metadata(source)
        .and_then(|m| m.modified())
        .map_err(|e| CatalogError::Metadata(source.to_path_buf(), e))?;
    Ok(cache_modified >= source_modified)
}

/// Decodes a cached model. Returns `Ok(None)` when a cached curve is not a valid grid,
/// which makes the caller rebuild it.
pub fn read_cached_model(path: &Path) -> Result<Option<OccupancyModel>, CatalogError> {
    let bytes = std::fs::read(path).map_err(|e| CatalogError::CacheRead(path.to_path_buf(), e))?;
    let (cached, _) = bincode::serde::decode_from_slice::<CachedCurves, _>(&bytes, BINCODE_CONFIG)
        .map_err(|e| CatalogError::CacheDecode(path.to_path_buf(), Box::new(e)))?;

    let mut curves = HashMap::with_capacity(cached.curves.len());
    for (street, values) in cached.curves {
        let Some(curve) = OccupancyCurve::from_grid(values) else {
            warn!("Cached curve of '{}' in {:?} is not a valid grid", street, path);
            return Ok(None);
        };
        curves.insert(street, curve);
    }
    debug!("Decoded {} cached curves from {:?}", curves.len(), path);
    Ok(Some(OccupancyModel::from_parts(curves, cached.rejected)))
}

/// Encodes the model and replaces `path` atomically.
pub fn write_cached_model(model: &OccupancyModel, path: &Path) -> Result<usize, CatalogError> {
    let mut curves: Vec<(String, Vec<f64>)> = model
        .curves()
        .map(|(street, curve)| (street.to_string(), curve.values().to_vec()))
        .collect();
    curves.sort_by(|a, b| a.0.cmp(&b.0));
    let cached = CachedCurves {
        curves,
        rejected: model.rejected().to_vec(),
    };
    let bytes = bincode::serde::encode_to_vec(&cached, BINCODE_CONFIG)
        .map_err(|e| CatalogError::CacheEncode(Box::new(e)))?;

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp_file =
        NamedTempFile::new_in(dir).map_err(|e| CatalogError::CacheWrite(path.to_path_buf(), e))?;
    temp_file
        .write_all(&bytes)
        .and_then(|_| temp_file.flush())
        .map_err(|e| CatalogError::CacheWrite(path.to_path_buf(), e))?;
    temp_file
        .persist(path)
        .map_err(|e| CatalogError::CacheWrite(path.to_path_buf(), e.error))?;
    Ok(bytes.len())
}
