//! This module defines the core, strongly-typed data representations used
//! throughout the selective decode engine.
//!
//! It currently includes the canonical `PhysicalType` enum describing the
//! declared width of an integer column.

pub mod physical_type;

// Re-export the main type(s) for easier access.
pub use physical_type::PhysicalType;
