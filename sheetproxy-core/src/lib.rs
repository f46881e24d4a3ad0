//! # sheetproxy Core
//!
//! Core types, errors, and constants shared by the sheetproxy crates.
//!
//! - **Types**: raw sheet values and the header/label format mapping
//! - **Errors**: a single error enum with classification helpers
//! - **Constants**: cache timings, default ranges and endpoints
//!
//! ## Example
//!
//! ```rust
//! use sheetproxy_core::FormatMapping;
//!
//! let format = FormatMapping::from_json_str(r#"[{"name": "Full name"}]"#).unwrap();
//! assert_eq!(format.output_key_for("Full name"), Some("name"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{Result, SheetError};
pub use types::*;
