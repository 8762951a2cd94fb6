//! Shared XLSX export models and error type.

use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////
// #region CellStyle

/// Horizontal alignment of a text cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumCellAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Style of header or body cells. Every exported cell is text, vertically centered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecCellStyle {
    /// Font family name.
    pub font_name: String,
    /// Font size in points.
    pub font_size: u16,
    pub if_bold: bool,
    pub align: EnumCellAlign,
    /// Thin border on all sides.
    pub if_border: bool,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WriteOptions

/// Column width policy applied after a sheet is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecColumnWidthPolicy {
    /// Size columns from their header and body text.
    pub if_autofit: bool,
    /// Body rows measured per sheet; `None` measures all.
    pub n_rows_inspected_max: Option<usize>,
    pub width_min: usize,
    pub width_max: usize,
    /// Added to the measured width before clamping.
    pub width_padding: usize,
}

impl Default for SpecColumnWidthPolicy {
    fn default() -> Self {
        Self {
            if_autofit: true,
            n_rows_inspected_max: Some(20_000),
            width_min: 8,
            width_max: 60,
            width_padding: 2,
        }
    }
}

/// Writer-wide options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecXlsxWriteOptions {
    pub policy_width: SpecColumnWidthPolicy,
    /// Freeze the header row.
    pub if_freeze_header: bool,
    /// Text written for null cells; blank cells when `None`.
    pub missing_value_str: Option<String>,
}

impl Default for SpecXlsxWriteOptions {
    fn default() -> Self {
        Self {
            policy_width: SpecColumnWidthPolicy::default(),
            if_freeze_header: true,
            missing_value_str: None,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Report

/// One worksheet emitted by a write call, covering a range of source rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSheetPart {
    /// Final sheet name in the workbook.
    pub sheet_name: String,
    pub row_start_inclusive: usize,
    pub row_end_exclusive: usize,
}

impl SpecSheetPart {
    pub fn n_rows(&self) -> usize {
        self.row_end_exclusive - self.row_start_inclusive
    }
}

/// Per-write call report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecXlsxReport {
    pub sheets: Vec<SpecSheetPart>,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecXlsxReport {
    pub fn warn(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    /// Data rows written across all sheets of the call.
    pub fn rows_written(&self) -> usize {
        self.sheets.iter().map(SpecSheetPart::n_rows).sum()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Export failures. Export only borrows records, so a failure never touches
/// the registry.
#[derive(Debug, Error)]
pub enum XlsxExportError {
    /// Workbook assembly or save failed.
    #[error("xlsx write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    /// DataFrame construction or cell access failed.
    #[error("dataframe error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
    /// Write options are inconsistent.
    #[error("invalid policy: {0}")]
    InvalidPolicy(String),
    /// Input frame cannot be written (duplicate columns, too wide, no sheets).
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_written_sums_every_part() {
        let report = SpecXlsxReport {
            sheets: vec![
                SpecSheetPart {
                    sheet_name: "SKUs_1".to_string(),
                    row_start_inclusive: 0,
                    row_end_exclusive: 10,
                },
                SpecSheetPart {
                    sheet_name: "SKUs_2".to_string(),
                    row_start_inclusive: 10,
                    row_end_exclusive: 12,
                },
            ],
            warnings: vec![],
        };
        assert_eq!(report.rows_written(), 12);
    }

    #[test]
    fn test_default_options_freeze_header_and_blank_nulls() {
        let options = SpecXlsxWriteOptions::default();
        assert!(options.if_freeze_header);
        assert!(options.policy_width.if_autofit);
        assert_eq!(options.missing_value_str, None);
    }
}
