//! `skukit_io_xlsx` v1:
//! XLSX export for SKU records.
//!
//! Layout:
//! - `conf`   : Excel limits and default presets
//! - `spec`   : styles/options/report/errors
//! - `util`   : pure helper functions
//! - `writer` : workbook writer kernel
//! - `export` : record-level entry points
pub mod conf;
pub mod export;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    C_FILE_NAME_DEFAULT, C_SHEET_NAME_DEFAULT, C_XLSX_MIME_TYPE, N_LEN_EXCEL_SHEET_NAME_MAX,
    N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, TUP_EXCEL_ILLEGAL,
};
pub use export::{
    derive_dataframe_from_records, export_records_to_xlsx, export_records_to_xlsx_bytes,
};
pub use spec::{
    EnumCellAlign, SpecCellStyle, SpecColumnWidthPolicy, SpecSheetPart, SpecXlsxReport,
    SpecXlsxWriteOptions, XlsxExportError,
};
pub use util::{plan_sheet_parts, sanitize_sheet_name};
pub use writer::SkuXlsxWriter;
