use rust_xlsxwriter::{Format, Workbook, XlsxError};

use super::{excel_filename, require, Artifact};
use crate::core::metadata::join_tags;
use crate::core::{CoreError, Metadata, Result};

pub const SHEET_NAME: &str = "File Metadata";
pub const HEADER: [&str; 4] = ["Folder Title", "Filename", "Description", "Tags"];
const COLUMN_WIDTHS: [u16; 4] = [25, 30, 50, 30];

/// The worksheet contents, header row first.
///
/// With per-file records there is one row per file; otherwise a single
/// fallback row describes the folder as a whole.
pub fn excel_rows(metadata: &Metadata) -> Vec<[String; 4]> {
    let folder_title = metadata.title_or("Unknown Folder");
    let mut rows = vec![HEADER.map(String::from)];

    if metadata.files().is_empty() {
        rows.push([
            folder_title.to_string(),
            "No files found".to_string(),
            metadata
                .description_or("No description available")
                .to_string(),
            join_tags(metadata.tags(), "No tags"),
        ]);
    } else {
        rows.extend(metadata.files().iter().map(|file| {
            [
                folder_title.to_string(),
                file.filename_or("Unknown File").to_string(),
                file.description_or("No description").to_string(),
                join_tags(file.tags(), "No tags"),
            ]
        }));
    }

    rows
}

/// Writes the metadata as a single-sheet XLSX workbook.
pub fn export_to_excel(metadata: Option<&Metadata>) -> Result<Artifact> {
    let metadata = require(metadata)?;
    let rows = excel_rows(metadata);
    let bytes = write_workbook(&rows).map_err(|e| CoreError::Render(e.to_string()))?;
    tracing::debug!("Wrote workbook with {} data row(s)", rows.len() - 1);
    Ok(Artifact::new(
        excel_filename(metadata.title.as_deref()),
        bytes,
    ))
}

fn write_workbook(rows: &[[String; 4]]) -> std::result::Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
        worksheet.set_column_width(col as u16, *width)?;
    }

    for (row, cells) in rows.iter().enumerate() {
        for (col, value) in cells.iter().enumerate() {
            if row == 0 {
                worksheet.write_string_with_format(0, col as u16, value, &header_format)?;
            } else {
                worksheet.write_string(row as u32, col as u16, value)?;
            }
        }
    }

    workbook.save_to_buffer()
}
