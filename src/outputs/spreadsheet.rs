//! The `.xlsx` workbook: one worksheet, a bold header row, one row per
//! exported article.

use crate::models::ExportRow;
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::path::Path;
use tracing::{info, instrument};

pub const HEADERS: [&str; 6] = [
    "Title",
    "Date",
    "Description",
    "Image",
    "Phrase Count",
    "Has Amount",
];

pub struct SpreadsheetWriter {
    workbook: Workbook,
    next_row: u32,
}

impl SpreadsheetWriter {
    pub fn new() -> Result<Self, XlsxError> {
        let mut workbook = Workbook::new();
        let bold = Format::new().set_bold();
        let sheet = workbook.add_worksheet();
        for (col, header) in HEADERS.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, *header, &bold)?;
        }
        Ok(Self {
            workbook,
            next_row: 1,
        })
    }

    pub fn append(&mut self, row: &ExportRow) -> Result<(), XlsxError> {
        let r = self.next_row;
        let sheet = self.workbook.worksheet_from_index(0)?;
        sheet.write_string(r, 0, row.title.as_str())?;
        sheet.write_string(r, 1, row.date.as_str())?;
        sheet.write_string(r, 2, row.description.as_str())?;
        sheet.write_string(r, 3, row.image_filename.as_str())?;
        sheet.write_number(r, 4, row.phrase_count as f64)?;
        sheet.write_boolean(r, 5, row.has_amount)?;
        self.next_row += 1;
        Ok(())
    }

    /// Data rows written so far, header excluded.
    pub fn rows(&self) -> usize {
        (self.next_row - 1) as usize
    }

    /// Write the workbook to `path`. Consumes the writer: a workbook is saved once.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn save(mut self, path: &Path) -> Result<(), XlsxError> {
        let rows = self.rows();
        self.workbook.save(path)?;
        info!(rows, "Saved workbook");
        Ok(())
    }
}
