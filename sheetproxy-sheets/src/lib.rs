//! Google Sheets access for sheetproxy.
//!
//! Fetches raw cell values through the Sheets v4 values API and reshapes
//! them into JSON:
//!
//! - [`SheetsClient::array_data_from_sheet`]: header row + data rows → array of objects
//! - [`SheetsClient::object_from_sheet`]: label/value rows → one object

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod address;
mod client;
mod reshape;

pub use address::{sheet_range, spreadsheet_id};
pub use client::{SheetsClient, SheetsConfig};
pub use reshape::{labelled_object, rows_to_objects};
