//! TISS document assembly
//!
//! - [`builder`] - lote XML serialization
//! - [`money`] - exact two-digit monetary formatting
//! - [`lote`] - lote number generation

pub mod builder;
pub mod lote;
pub mod money;

pub use builder::{build_document, build_group_document, DocumentOptions, DEFAULT_SCHEMA_VERSION};
pub use lote::next_lote_number;
pub use money::format_money;
