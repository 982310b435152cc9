//! This file is the root of the `tambak_select` Rust crate.
//!
//! The crate is a selective decode engine for integer columns: given a batch's
//! encoded value stream, its null bitmap and a set of requested rows, a
//! `SelectiveIntegerColumnReader` filters, materializes or aggregates those
//! rows in a single fused pass.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of our library (`reader`, `kernels`, etc.)
//!     so the Rust compiler knows they exist.
//! 2.  Re-exporting the types a caller needs to configure and run a read.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
mod observability; // Make macros available throughout the crate

#[doc(hidden)]
pub use log as __log;

pub mod backend;
pub mod config;
pub mod error;
pub mod extract;
pub mod hook;
pub mod kernels;
pub mod null_handling;
pub mod predicate;
pub mod reader;
pub mod row_set;
pub mod scan_spec;
pub mod traits;
pub mod types;
pub mod utils;
pub mod visitor;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================
pub use backend::{DecodingBackend, EncodedColumn};
pub use config::ColumnReaderConfig;
pub use error::TambakError;
pub use extract::{ExtractionMode, ReaderOutput};
pub use hook::{AggregateHook, HookKind, MaxHook, MinHook, SumHook};
pub use kernels::ColumnEncoding;
pub use observability::enable_verbose_logging;
pub use predicate::{Predicate, PredicateKind, ALWAYS_TRUE};
pub use reader::SelectiveIntegerColumnReader;
pub use row_set::RowSet;
pub use scan_spec::ScanSpec;
pub use types::PhysicalType;
