use crate::types::data_source::Dataset;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read {dataset} file '{path}'")]
    ReadIo {
        dataset: Dataset,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {dataset} CSV file '{path}'")]
    CsvRead {
        dataset: Dataset,
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("Required column '{column}' not found in {dataset} data")]
    MissingColumn {
        dataset: Dataset,
        column: String,
        #[source]
        source: PolarsError,
    },

    #[error("Column '{column}' in {dataset} data has an unexpected type")]
    ColumnType {
        dataset: Dataset,
        column: String,
        #[source]
        source: PolarsError,
    },

    #[error("Failed to parse {dataset} GeoJSON file '{path}'")]
    GeoJsonParse {
        dataset: Dataset,
        path: PathBuf,
        #[source]
        source: Box<geojson::Error>,
    },

    #[error("{dataset} GeoJSON must be a FeatureCollection")]
    NotAFeatureCollection { dataset: Dataset },

    #[error("Failed to read metadata for '{0}'")]
    Metadata(PathBuf, #[source] std::io::Error),

    #[error("Failed to read cache file '{0}'")]
    CacheRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to write cache file '{0}'")]
    CacheWrite(PathBuf, #[source] std::io::Error),

    #[error("Failed to decode cache data from '{0}'")]
    CacheDecode(PathBuf, #[source] Box<bincode::error::DecodeError>),

    #[error("Failed to encode cache data")]
    CacheEncode(#[source] Box<bincode::error::EncodeError>),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
