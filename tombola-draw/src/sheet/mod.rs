//! Spreadsheet import and export.
//!
//! Reading goes through `calamine` into a plain [`SheetTable`] so the
//! header mapping can be tested without a workbook on disk.

pub mod export;
pub mod import;

pub use export::{default_export_name, export_results, export_results_to_buffer, results_workbook};
pub use import::{read_workbook, read_workbook_bytes};

use crate::participant::Participant;
use crate::prize::PrizeSpec;
use crate::{DrawError, Result};

pub const NAME_HEADERS: &[&str] = &["姓名", "name"];
pub const DEPARTMENT_HEADERS: &[&str] = &["部门", "department"];
pub const PRIZE_HEADERS: &[&str] = &["奖品名称", "奖品", "prize"];
pub const COUNT_HEADERS: &[&str] = &["数量", "count"];

/// First row as headers, remaining rows as optional trimmed cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl SheetTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self { headers, rows }
    }

    /// Index of the first header matching one of `aliases`, ignoring
    /// case and surrounding whitespace
    pub fn column(&self, aliases: &[&str]) -> Option<usize> {
        self.headers.iter().position(|header| {
            let header = header.trim();
            aliases
                .iter()
                .any(|alias| header.eq_ignore_ascii_case(alias))
        })
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .and_then(|cell| cell.as_deref())
    }

    /// Rows with at least one non-empty cell
    pub fn data_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, cells)| cells.iter().any(Option::is_some))
            .map(|(index, _)| index)
    }
}

/// Result of reading a roster workbook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedWorkbook {
    pub participants: Vec<Participant>,
    pub prizes: Option<Vec<PrizeSpec>>,
}

/// Map the first sheet to participants. Any row without a name fails the
/// whole import.
pub fn parse_roster(table: &SheetTable) -> Result<Vec<Participant>> {
    let rows: Vec<usize> = table.data_rows().collect();
    if rows.is_empty() {
        return Err(DrawError::import("No participants found in the first sheet"));
    }

    let name_column = table.column(NAME_HEADERS).ok_or_else(|| {
        DrawError::import("Name column not found, expected a \"name\" or \"姓名\" header")
    })?;
    let department_column = table.column(DEPARTMENT_HEADERS);

    rows.into_iter()
        .map(|row| {
            let name = table.cell(row, name_column).ok_or_else(|| {
                // +2: header row and 1-based numbering
                DrawError::import(format!("Row {} has no name", row + 2))
            })?;
            let department = department_column
                .and_then(|column| table.cell(row, column))
                .map(str::to_string);

            Ok(Participant::new(name, department))
        })
        .collect()
}

/// Map the optional second sheet to prize specs. Rows without a prize
/// name are skipped, a missing or unreadable count means one.
pub fn parse_prizes(table: &SheetTable) -> Vec<PrizeSpec> {
    let Some(prize_column) = table.column(PRIZE_HEADERS) else {
        return Vec::new();
    };
    let count_column = table.column(COUNT_HEADERS);

    table
        .data_rows()
        .filter_map(|row| {
            let name = table.cell(row, prize_column)?;
            let count = count_column
                .and_then(|column| table.cell(row, column))
                .and_then(|count| count.parse::<u32>().ok())
                .filter(|count| *count > 0)
                .unwrap_or(1);

            Some(PrizeSpec::new(name, count))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[Option<&str>]]) -> SheetTable {
        SheetTable::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|cells| cells.iter().map(|c| c.map(str::to_string)).collect())
                .collect(),
        )
    }

    #[test]
    fn test_roster_headers_in_either_language() {
        let english = table(
            &["Department", "NAME"],
            &[&[Some("Sales"), Some("Ana")], &[None, Some("Bo")]],
        );
        let roster = parse_roster(&english).unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].name(), "Ana");
        assert_eq!(roster[0].department(), "Sales");
        assert_eq!(roster[1].department(), "unknown");

        let chinese = table(&["姓名", "部门"], &[&[Some("张三"), Some("研发")]]);
        assert_eq!(parse_roster(&chinese).unwrap()[0].department(), "研发");
    }

    #[test]
    fn test_roster_failures() {
        let empty = table(&["name"], &[&[None]]);
        assert!(matches!(parse_roster(&empty), Err(DrawError::Import(_))));

        let no_name_column = table(&["email"], &[&[Some("a@b.c")]]);
        assert!(parse_roster(&no_name_column).is_err());

        let missing_name = table(
            &["name", "department"],
            &[&[Some("Ana"), None], &[None, Some("Ops")]],
        );
        let err = parse_roster(&missing_name).unwrap_err();
        assert!(err.to_string().contains("Row 3"));
    }

    #[test]
    fn test_blank_rows_ignored() {
        let sheet = table(&["name"], &[&[Some("Ana")], &[None], &[Some("Bo")]]);
        assert_eq!(parse_roster(&sheet).unwrap().len(), 2);
    }

    #[test]
    fn test_prize_sheet() {
        let sheet = table(
            &["奖品名称", "数量"],
            &[
                &[Some("Laptop"), Some("2")],
                &[Some("Mug"), None],
                &[None, Some("9")],
                &[Some("Pen"), Some("lots")],
            ],
        );

        let prizes = parse_prizes(&sheet);
        assert_eq!(
            prizes,
            vec![
                PrizeSpec::new("Laptop", 2),
                PrizeSpec::new("Mug", 1),
                PrizeSpec::new("Pen", 1),
            ]
        );

        assert!(parse_prizes(&table(&["item"], &[&[Some("x")]])).is_empty());
    }
}
