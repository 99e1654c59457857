use crate::sheet::{parse_prizes, parse_roster, ImportedWorkbook, SheetTable};
use crate::{DrawError, Result};
use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// Read a roster workbook (xlsx, xls, ods) from disk
pub fn read_workbook(path: &Path) -> Result<ImportedWorkbook> {
    let workbook = open_workbook_auto(path)?;
    let imported = read_sheets(workbook)?;

    tracing::info!(
        "Read {} participants from {}",
        imported.participants.len(),
        path.display()
    );
    Ok(imported)
}

pub fn read_workbook_bytes(bytes: Vec<u8>) -> Result<ImportedWorkbook> {
    let workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    read_sheets(workbook)
}

fn read_sheets<RS: Read + Seek>(mut workbook: Sheets<RS>) -> Result<ImportedWorkbook> {
    let names = workbook.sheet_names();
    let first = names
        .first()
        .ok_or_else(|| DrawError::import("Workbook has no sheets"))?;

    let roster = table_from_range(&workbook.worksheet_range(first)?);
    let participants = parse_roster(&roster)?;

    let prizes = match names.get(1) {
        Some(name) => {
            let specs = parse_prizes(&table_from_range(&workbook.worksheet_range(name)?));
            (!specs.is_empty()).then_some(specs)
        }
        None => None,
    };

    Ok(ImportedWorkbook {
        participants,
        prizes,
    })
}

fn table_from_range(range: &Range<Data>) -> SheetTable {
    let mut rows = range.rows();

    let headers = rows
        .next()
        .map(|cells| {
            cells
                .iter()
                .map(|cell| cell_text(cell).unwrap_or_default())
                .collect()
        })
        .unwrap_or_default();

    let rows = rows
        .map(|cells| cells.iter().map(cell_text).collect())
        .collect();

    SheetTable::new(headers, rows)
}

fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty => return None,
        Data::String(s) => s.trim().to_string(),
        // whole numbers come back as floats from most writers
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        other => other.to_string().trim().to_string(),
    };

    (!text.is_empty()).then_some(text)
}
