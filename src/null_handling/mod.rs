//! This module serves as the public API for all null-handling logic within the
//! selective decode engine.
//!
//! Null bitmaps are produced upstream and only consumed here: the decode loop
//! asks whether a row is null and how many valid rows a range holds, and the
//! output assembly re-applies validity to the materialized values.

//==================================================================================
// 1. Module Declarations
//==================================================================================

/// Null bitmap queries and Arrow array assembly.
pub mod bitmap;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================

pub use bitmap::{assemble_primitive, count_valid, is_null, null_buffer_from_validity};

//==================================================================================
// 3. Unit Tests (Module-level integration tests)
//==================================================================================
