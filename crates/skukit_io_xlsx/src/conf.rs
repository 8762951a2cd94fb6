//! XLSX limits and default preset factories.

use crate::spec::{EnumCellAlign, SpecCellStyle, SpecXlsxWriteOptions};

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [char; 7] = ['*', ':', '?', '/', '\\', '[', ']'];

/// Sheet name used by the one-call export helpers.
pub const C_SHEET_NAME_DEFAULT: &str = "Sheet1";
/// File name offered to users downloading the export.
pub const C_FILE_NAME_DEFAULT: &str = "sku_records.xlsx";
/// MIME type of the export.
pub const C_XLSX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Body cells: Calibri 11, left aligned.
pub fn derive_default_text_style() -> SpecCellStyle {
    SpecCellStyle {
        font_name: "Calibri".to_string(),
        font_size: 11,
        if_bold: false,
        align: EnumCellAlign::Left,
        if_border: false,
    }
}

/// Header cells: body style, bold, centered, thin border.
pub fn derive_default_header_style() -> SpecCellStyle {
    SpecCellStyle {
        if_bold: true,
        align: EnumCellAlign::Center,
        if_border: true,
        ..derive_default_text_style()
    }
}

pub fn derive_default_xlsx_write_options() -> SpecXlsxWriteOptions {
    SpecXlsxWriteOptions::default()
}
