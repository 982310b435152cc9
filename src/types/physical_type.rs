//! This module defines the canonical, type-safe representation of the physical
//! integer types a selective column reader can be declared with.

use crate::error::TambakError;
use arrow::datatypes::DataType as ArrowDataType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The declared physical type of an integer column in a stripe.
///
/// `Int8` is representable so that stripe metadata can be loaded faithfully,
/// but the selective decode path rejects it at dispatch time.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PhysicalType {
    Int8,
    Int16,
    Int32,
    Int64,
}

impl PhysicalType {
    /// Converts an Arrow `DataType` into a `PhysicalType`.
    pub fn from_arrow_type(arrow_type: &ArrowDataType) -> Result<Self, TambakError> {
        match arrow_type {
            ArrowDataType::Int8 => Ok(Self::Int8),
            ArrowDataType::Int16 => Ok(Self::Int16),
            ArrowDataType::Int32 => Ok(Self::Int32),
            ArrowDataType::Int64 => Ok(Self::Int64),
            dt => Err(TambakError::UnsupportedType(format!(
                "Cannot convert Arrow type {:?} to PhysicalType",
                dt
            ))),
        }
    }

    /// Converts a `PhysicalType` back into an Arrow `DataType`.
    pub fn to_arrow_type(&self) -> ArrowDataType {
        match self {
            Self::Int8 => ArrowDataType::Int8,
            Self::Int16 => ArrowDataType::Int16,
            Self::Int32 => ArrowDataType::Int32,
            Self::Int64 => ArrowDataType::Int64,
        }
    }

    /// Size in bytes of one value of this type.
    pub fn value_size(&self) -> usize {
        match self {
            Self::Int8 => 1,
            Self::Int16 => 2,
            Self::Int32 => 4,
            Self::Int64 => 8,
        }
    }
}

impl fmt::Display for PhysicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Matches the Arrow `DataType` string representation.
        write!(f, "{:?}", self)
    }
}
