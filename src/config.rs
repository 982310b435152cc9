// In: src/config.rs

//! Static configuration for building a selective column reader.
//!
//! `ColumnReaderConfig` describes what a stripe's metadata says about one
//! integer column: its declared physical type, how its value stream is
//! encoded, and how many rows the batch holds. It is created once at the
//! application boundary (typically deserialized from JSON) and turned into a
//! reader with [`ColumnReaderConfig::build_reader`].
//!
//! Per-call behavior (predicate, hook, keep-values) is not configured here;
//! see [`crate::scan_spec::ScanSpec`].

use arrow::buffer::NullBuffer;
use serde::{Deserialize, Serialize};

use crate::backend::EncodedColumn;
use crate::error::TambakError;
use crate::kernels::ColumnEncoding;
use crate::reader::SelectiveIntegerColumnReader;
use crate::types::PhysicalType;

/// The complete static description of one integer column in one batch.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ColumnReaderConfig {
    /// Declared physical type. `Int8` loads, but decoding it fails.
    pub physical_type: PhysicalType,

    /// Encoding of the value stream.
    #[serde(default)]
    pub encoding: ColumnEncoding,

    /// Number of rows in the batch, nulls included.
    #[serde(default)]
    pub num_rows: usize,
}

impl ColumnReaderConfig {
    pub fn new(physical_type: PhysicalType, encoding: ColumnEncoding, num_rows: usize) -> Self {
        Self {
            physical_type,
            encoding,
            num_rows,
        }
    }

    /// Parses a config from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, TambakError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, TambakError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Builds a reader over `data`, the encoded non-null values of the batch.
    pub fn build_reader(
        &self,
        data: Vec<u8>,
        nulls: Option<NullBuffer>,
    ) -> Result<SelectiveIntegerColumnReader<EncodedColumn>, TambakError> {
        log::debug!(
            "building {} reader: {:?} encoding, {} rows, nulls: {}",
            self.physical_type,
            self.encoding,
            self.num_rows,
            nulls.is_some()
        );
        SelectiveIntegerColumnReader::new(
            EncodedColumn::new(self.encoding, data),
            self.physical_type,
            self.num_rows,
            nulls,
        )
    }
}
