//! Record-level export entry points.

use std::path::Path;

use polars::prelude::{Column, DataFrame, NamedFrom, PlSmallStr};
use skukit_registry::{SkuRecord, TUP_SKU_RECORD_COLUMNS};

use crate::conf::{C_SHEET_NAME_DEFAULT, derive_default_xlsx_write_options};
use crate::spec::XlsxExportError;
use crate::writer::SkuXlsxWriter;

/// Build a string DataFrame with columns `sku, category, color, size, material`.
pub fn derive_dataframe_from_records(records: &[SkuRecord]) -> Result<DataFrame, XlsxExportError> {
    let l_rows: Vec<[&str; 5]> = records.iter().map(SkuRecord::to_row).collect();
    let l_columns: Vec<Column> = TUP_SKU_RECORD_COLUMNS
        .iter()
        .enumerate()
        .map(|(n_idx_col, c_name)| {
            let l_values: Vec<&str> = l_rows.iter().map(|row| row[n_idx_col]).collect();
            Column::new(PlSmallStr::from_static(*c_name), l_values)
        })
        .collect();
    Ok(DataFrame::new(l_columns)?)
}

/// Write `records` to a single-sheet workbook at `path`.
pub fn export_records_to_xlsx(
    path: impl AsRef<Path>,
    records: &[SkuRecord],
) -> Result<(), XlsxExportError> {
    let mut writer = SkuXlsxWriter::new(derive_default_xlsx_write_options());
    writer.write_records(records, C_SHEET_NAME_DEFAULT)?;
    writer.save(path)
}

/// Render `records` to `.xlsx` bytes (for a download button).
pub fn export_records_to_xlsx_bytes(records: &[SkuRecord]) -> Result<Vec<u8>, XlsxExportError> {
    let mut writer = SkuXlsxWriter::new(derive_default_xlsx_write_options());
    writer.write_records(records, C_SHEET_NAME_DEFAULT)?;
    writer.save_to_buffer()
}
