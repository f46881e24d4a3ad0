//! Domain types for sheetproxy.
//!
//! - [`ValueRange`]: raw cells returned by the Sheets values API
//! - [`FormatMapping`]: renames sheet headers/labels to output keys

mod format;
mod sheet;

pub use format::*;
pub use sheet::*;
