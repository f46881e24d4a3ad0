//! Raw sheet content as returned by the Sheets values API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One row of cells. Trailing empty cells are omitted by the API.
pub type SheetRow = Vec<Value>;

/// Body of a `GET /v4/spreadsheets/{id}/values/{range}` response.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    /// The A1 range the values cover
    #[serde(default)]
    pub range: String,
    /// `ROWS` or `COLUMNS`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_dimension: Option<String>,
    /// Cell values, absent for an empty sheet
    #[serde(default)]
    pub values: Vec<SheetRow>,
}

impl ValueRange {
    /// Returns the header row, if any.
    pub fn header(&self) -> Option<&SheetRow> {
        self.values.first()
    }

    /// Returns every row after the header.
    pub fn body(&self) -> &[SheetRow] {
        self.values.get(1..).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_values_is_empty_sheet() {
        let range: ValueRange = serde_json::from_value(json!({
            "range": "Sheet1!A1:Z1000",
            "majorDimension": "ROWS"
        }))
        .unwrap();

        assert!(range.values.is_empty());
        assert!(range.header().is_none());
        assert!(range.body().is_empty());
    }

    #[test]
    fn test_header_and_body() {
        let range: ValueRange = serde_json::from_value(json!({
            "range": "Sheet1!A1:B3",
            "values": [["name", "url"], ["a", "https://a"], ["b"]]
        }))
        .unwrap();

        assert_eq!(range.header().unwrap(), &vec![json!("name"), json!("url")]);
        assert_eq!(range.body().len(), 2);
        assert_eq!(range.body()[1], vec![json!("b")]);
    }
}
