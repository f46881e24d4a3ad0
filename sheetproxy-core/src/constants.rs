//! Constants for sheetproxy.

// ═══════════════════════════════════════════════════════════════════════════════
// PROXY CACHE
// ═══════════════════════════════════════════════════════════════════════════════

/// How long a memoized result stays fresh, in seconds.
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 60;

/// Shortest period the expiry sweep may run at, in seconds.
pub const MIN_SWEEP_INTERVAL_SECONDS: u64 = 1;

// ═══════════════════════════════════════════════════════════════════════════════
// GOOGLE SHEETS
// ═══════════════════════════════════════════════════════════════════════════════

/// Base URL of the Google Sheets API.
pub const DEFAULT_SHEETS_API_BASE_URL: &str = "https://sheets.googleapis.com";

/// Column span requested from every sheet.
pub const DEFAULT_SHEET_COLUMNS: &str = "A:Z";

/// Path segment that precedes the spreadsheet id in a sheet URL.
pub const SPREADSHEET_ID_MARKER: &str = "/d/";

/// Timeout for a single upstream request, in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

// ═══════════════════════════════════════════════════════════════════════════════
// SERVER
// ═══════════════════════════════════════════════════════════════════════════════

/// Port the HTTP server listens on when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 3000;
