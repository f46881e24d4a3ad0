//! Spreadsheet URL parsing and A1 ranges.

use url::Url;

use sheetproxy_core::constants::{DEFAULT_SHEET_COLUMNS, SPREADSHEET_ID_MARKER};
use sheetproxy_core::error::{Result, SheetError};

/// Extracts the spreadsheet id from a Google Sheets URL.
///
/// `https://docs.google.com/spreadsheets/d/<id>/edit#gid=0` yields `<id>`.
pub fn spreadsheet_id(spreadsheet_url: &str) -> Result<String> {
    let not_a_sheet = || SheetError::InvalidSpreadsheetUrl("Invalid Google spreadsheet URL".into());

    let parsed = Url::parse(spreadsheet_url.trim()).map_err(|_| not_a_sheet())?;
    let path = parsed.path();

    let (_, after) = path.split_once(SPREADSHEET_ID_MARKER).ok_or_else(not_a_sheet)?;
    let id = after.split('/').next().unwrap_or_default();

    if id.is_empty() {
        return Err(SheetError::InvalidSpreadsheetUrl("Invalid spreadsheet URL".into()));
    }
    Ok(id.to_string())
}

/// A1 range covering the fixed column span of a sheet.
///
/// An empty or missing sheet name targets the first sheet.
pub fn sheet_range(sheet: Option<&str>) -> String {
    match sheet.map(str::trim) {
        Some(name) if !name.is_empty() => format!("{}!{}", name, DEFAULT_SHEET_COLUMNS),
        _ => DEFAULT_SHEET_COLUMNS.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("https://docs.google.com/spreadsheets/d/1", "1" ; "bare id")]
    #[test_case("https://docs.google.com/spreadsheets/d/abc-DEF_123/edit#gid=0", "abc-DEF_123" ; "edit link")]
    #[test_case("https://docs.google.com/spreadsheets/d/xyz/edit?usp=sharing", "xyz" ; "share link")]
    fn test_spreadsheet_id(url: &str, expected: &str) {
        assert_eq!(spreadsheet_id(url).unwrap(), expected);
    }

    #[test_case("https://google.com", "Invalid Google spreadsheet URL" ; "no id segment")]
    #[test_case("not a url", "Invalid Google spreadsheet URL" ; "unparseable")]
    #[test_case("https://docs.google.com/spreadsheets/d/", "Invalid spreadsheet URL" ; "empty id")]
    fn test_invalid_spreadsheet_url(url: &str, message: &str) {
        let err = spreadsheet_id(url).unwrap_err();
        assert!(matches!(err, SheetError::InvalidSpreadsheetUrl(_)));
        assert_eq!(err.to_string(), message);
    }

    #[test]
    fn test_sheet_range() {
        assert_eq!(sheet_range(Some("sheet1")), "sheet1!A:Z");
        assert_eq!(sheet_range(Some("")), "A:Z");
        assert_eq!(sheet_range(None), "A:Z");
    }
}
