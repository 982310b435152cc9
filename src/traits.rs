//! This module defines shared traits used across the kernels, the visitor and
//! the column reader.

use arrow::datatypes::{ArrowPrimitiveType, Int16Type, Int32Type, Int64Type};
use num_traits::PrimInt;
use std::fmt::Debug;

use crate::types::PhysicalType;

/// A signed integer type a selective reader can decode a column as.
///
/// Every decoded value is widened to `i64` before it reaches a predicate or an
/// extraction strategy, so the per-width code is confined to the kernels.
pub trait DecodedInt: PrimInt + bytemuck::Pod + Into<i64> + Debug + Send + Sync + 'static {
    /// The Arrow primitive type used when materializing values of this width.
    type ArrowType: ArrowPrimitiveType<Native = Self>;

    /// The physical type this Rust type decodes.
    const PHYSICAL_TYPE: PhysicalType;
}

// Implement the trait for the supported primitive integer widths.
macro_rules! impl_decoded_int {
    ($T:ty, $A:ty, $P:expr) => {
        impl DecodedInt for $T {
            type ArrowType = $A;
            const PHYSICAL_TYPE: PhysicalType = $P;
        }
    };
}

impl_decoded_int!(i16, Int16Type, PhysicalType::Int16);
impl_decoded_int!(i32, Int32Type, PhysicalType::Int32);
impl_decoded_int!(i64, Int64Type, PhysicalType::Int64);
