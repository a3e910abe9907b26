//! Recipient list ingestion from spreadsheet files
//!
//! Reads the first column of the first sheet of a CSV or Excel/OpenDocument
//! workbook and keeps every cell that looks like an address. Row 0 is treated
//! as data; a header such as "Email" only survives if it contains an "@".

use crate::error::{SenderError, SenderResult};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;
use tracing::{debug, info, warn};

/// Extensions accepted by the file input
pub const SUPPORTED_EXTENSIONS: &[&str] = &["csv", "xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Ordered list of recipient addresses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipientList {
    addresses: Vec<String>,
}

impl RecipientList {
    /// Build a list from raw first-column cells, keeping only usable addresses
    pub fn from_cells<I>(cells: I) -> Self
    where
        I: IntoIterator<Item = Option<String>>,
    {
        let addresses = cells
            .into_iter()
            .flatten()
            .filter(|cell| is_candidate_address(cell))
            .collect();
        Self { addresses }
    }

    pub fn addresses(&self) -> &[String] {
        &self.addresses
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.addresses.iter()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.addresses
    }
}

/// A cell is kept when it is non-empty text containing "@"
fn is_candidate_address(cell: &str) -> bool {
    !cell.is_empty() && cell.contains('@')
}

/// Spreadsheet flavours the ingestor can read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Csv,
    Workbook,
}

impl SheetFormat {
    /// Detect the format from a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> SenderResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(SheetFormat::Csv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(SheetFormat::Workbook),
            "" => Err(SenderError::UnsupportedFormat(format!(
                "{} has no extension",
                path.display()
            ))),
            other => Err(SenderError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Read a spreadsheet and extract the recipient list
pub fn ingest_file(path: &Path) -> SenderResult<RecipientList> {
    let format = SheetFormat::from_path(path)?;
    debug!("Ingesting {} as {:?}", path.display(), format);

    let cells = match format {
        SheetFormat::Csv => read_csv_first_column(path)?,
        SheetFormat::Workbook => read_workbook_first_column(path)?,
    };
    let row_count = cells.len();
    let list = RecipientList::from_cells(cells);

    info!(
        "Loaded {} recipients from {} rows in {}",
        list.len(),
        row_count,
        path.display()
    );
    Ok(list)
}

const UTF8_BOM: char = '\u{feff}';

fn read_csv_first_column(path: &Path) -> SenderResult<Vec<Option<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    // Only the first field is decoded; other columns may be any encoding
    let mut cells = Vec::new();
    for (row, record) in reader.byte_records().enumerate() {
        let record = record?;
        let cell = record.get(0).and_then(|field| match std::str::from_utf8(field) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(
                    "Skipping row {} of {}: first cell is not UTF-8 ({})",
                    row + 1,
                    path.display(),
                    e
                );
                None
            }
        });

        let cell = match (row, cell) {
            // Leading byte order mark from spreadsheet exports
            (0, Some(text)) => Some(text.strip_prefix(UTF8_BOM).unwrap_or(text)),
            (_, cell) => cell,
        };
        cells.push(cell.map(str::to_string));
    }
    Ok(cells)
}

fn read_workbook_first_column(path: &Path) -> SenderResult<Vec<Option<String>>> {
    let mut workbook = open_workbook_auto(path)?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range?,
        None => return Err(SenderError::spreadsheet("workbook has no sheets")),
    };

    // Ranges start at the first used cell, so column A may be absent entirely
    match range.start() {
        Some((_, 0)) => {}
        _ => return Ok(Vec::new()),
    }

    Ok(range
        .rows()
        .map(|row| row.first().and_then(text_cell))
        .collect())
}

/// Only text cells can hold an address; numbers, dates and errors never match
fn text_cell(cell: &Data) -> Option<String> {
    match cell {
        Data::String(value) => Some(value.clone()),
        _ => None,
    }
}
