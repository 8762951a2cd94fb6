//! XLSX writer kernel that turns DataFrames of SKU records into workbook output.

use std::collections::BTreeSet;
use std::path::Path;

use polars::prelude::{AnyValue, DataFrame};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use skukit_registry::SkuRecord;

use crate::conf::{
    N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, derive_default_header_style,
    derive_default_text_style,
};
use crate::export::derive_dataframe_from_records;
use crate::spec::{
    EnumCellAlign, SpecCellStyle, SpecSheetPart, SpecXlsxReport, SpecXlsxWriteOptions,
    XlsxExportError,
};
use crate::util::{
    calculate_column_width, estimate_text_width, plan_sheet_parts, sanitize_sheet_name,
    validate_unique_columns, validate_width_policy,
};

/// Stateful workbook writer.
///
/// Sheets are buffered in memory; nothing touches disk until [`Self::save`].
/// Each write call either adds all of its sheets or leaves the workbook as it was.
pub struct SkuXlsxWriter {
    workbook: Workbook,
    style_text: SpecCellStyle,
    style_header: SpecCellStyle,
    write_options: SpecXlsxWriteOptions,
    /// Lowercased names of sheets already in the workbook; Excel compares
    /// sheet names case-insensitively.
    set_sheet_keys: BTreeSet<String>,
    l_reports: Vec<SpecXlsxReport>,
}

impl SkuXlsxWriter {
    /// Writer with default cell styles.
    pub fn new(write_options: SpecXlsxWriteOptions) -> Self {
        Self::with_styles(
            derive_default_text_style(),
            derive_default_header_style(),
            write_options,
        )
    }

    pub fn with_styles(
        style_text: SpecCellStyle,
        style_header: SpecCellStyle,
        write_options: SpecXlsxWriteOptions,
    ) -> Self {
        Self {
            workbook: Workbook::new(),
            style_text,
            style_header,
            write_options,
            set_sheet_keys: BTreeSet::new(),
            l_reports: Vec::new(),
        }
    }

    /// Reports of successful write calls, in call order.
    pub fn report(&self) -> Vec<SpecXlsxReport> {
        self.l_reports.clone()
    }

    /// Write records as one sheet: header row, then one row per record.
    pub fn write_records(
        &mut self,
        records: &[SkuRecord],
        sheet_name: &str,
    ) -> Result<(), XlsxExportError> {
        let df_records = derive_dataframe_from_records(records)?;
        self.write_sheet_from_dataframe(&df_records, sheet_name)
    }

    /// Write one sheet from a DataFrame; column names become the header row and
    /// every cell is written as text.
    pub fn write_sheet_from_dataframe(
        &mut self,
        df_data: &DataFrame,
        sheet_name: &str,
    ) -> Result<(), XlsxExportError> {
        validate_width_policy(&self.write_options.policy_width)?;

        let l_colnames: Vec<String> = df_data
            .get_column_names_str()
            .into_iter()
            .map(ToString::to_string)
            .collect();
        validate_unique_columns(&l_colnames)?;
        if l_colnames.len() > N_NCOLS_EXCEL_MAX {
            return Err(XlsxExportError::InvalidInput(format!(
                "{} columns exceed the Excel column limit of {N_NCOLS_EXCEL_MAX}.",
                l_colnames.len()
            )));
        }

        let mut report = SpecXlsxReport::default();
        let l_parts = plan_sheet_parts(
            df_data.height(),
            &sanitize_sheet_name(sheet_name),
            &mut report,
        );

        let fmt_text = derive_rust_xlsx_format(&self.style_text);
        let fmt_header = derive_rust_xlsx_format(&self.style_header);

        let mut set_sheet_keys_pending = BTreeSet::new();
        let mut l_worksheets = Vec::with_capacity(l_parts.len());
        for part in l_parts {
            let c_sheet_name =
                self.derive_unique_sheet_name(&part.sheet_name, &set_sheet_keys_pending);
            let mut worksheet = Worksheet::new();
            worksheet.set_name(&c_sheet_name)?;
            self.write_sheet_part(
                &mut worksheet,
                df_data,
                &l_colnames,
                &part,
                &fmt_header,
                &fmt_text,
            )?;

            tracing::debug!(
                sheet = %c_sheet_name,
                n_rows = part.n_rows(),
                n_cols = l_colnames.len(),
                "wrote sheet"
            );
            set_sheet_keys_pending.insert(c_sheet_name.to_lowercase());
            report.sheets.push(SpecSheetPart {
                sheet_name: c_sheet_name,
                ..part
            });
            l_worksheets.push(worksheet);
        }

        for worksheet in l_worksheets {
            self.workbook.push_worksheet(worksheet);
        }
        self.set_sheet_keys.extend(set_sheet_keys_pending);
        for c_warning in &report.warnings {
            tracing::warn!(sheet = sheet_name, "{c_warning}");
        }
        self.l_reports.push(report);
        Ok(())
    }

    /// Save the workbook to `path`.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<(), XlsxExportError> {
        let path = path.as_ref();
        self.ensure_sheet()?;
        self.workbook.save(path)?;
        tracing::info!(path = %path.display(), "saved xlsx workbook");
        Ok(())
    }

    /// Assemble the workbook into an in-memory `.xlsx` payload.
    pub fn save_to_buffer(&mut self) -> Result<Vec<u8>, XlsxExportError> {
        self.ensure_sheet()?;
        let v_bytes = self.workbook.save_to_buffer()?;
        tracing::info!(n_bytes = v_bytes.len(), "assembled xlsx workbook");
        Ok(v_bytes)
    }

    fn ensure_sheet(&self) -> Result<(), XlsxExportError> {
        if self.set_sheet_keys.is_empty() {
            return Err(XlsxExportError::InvalidInput(
                "Cannot save a workbook without sheets.".to_string(),
            ));
        }
        Ok(())
    }

    fn write_sheet_part(
        &self,
        worksheet: &mut Worksheet,
        df_data: &DataFrame,
        l_colnames: &[String],
        part: &SpecSheetPart,
        fmt_header: &Format,
        fmt_text: &Format,
    ) -> Result<(), XlsxExportError> {
        let policy = &self.write_options.policy_width;
        let c_missing_value = self.write_options.missing_value_str.as_deref();
        let n_rows_inspected = policy.n_rows_inspected_max.unwrap_or(usize::MAX);
        let mut l_widths: Vec<usize> = l_colnames
            .iter()
            .map(|c_name| estimate_text_width(c_name))
            .collect();

        for (n_idx_col, c_name) in l_colnames.iter().enumerate() {
            worksheet.write_string_with_format(0, cast_col_num(n_idx_col)?, c_name, fmt_header)?;
        }
        if self.write_options.if_freeze_header {
            worksheet.set_freeze_panes(1, 0)?;
        }

        for (n_idx_col, col) in df_data.get_columns().iter().enumerate() {
            let n_col = cast_col_num(n_idx_col)?;
            let col_part = col.slice(part.row_start_inclusive as i64, part.n_rows());
            for n_row_local in 0..part.n_rows() {
                let n_row = cast_row_num(n_row_local + 1)?;
                let c_text = derive_cell_text(col_part.get(n_row_local)?);
                match c_text.as_deref().or(c_missing_value) {
                    Some(val) => {
                        worksheet.write_string_with_format(n_row, n_col, val, fmt_text)?;
                        if n_row_local < n_rows_inspected {
                            l_widths[n_idx_col] =
                                usize::max(l_widths[n_idx_col], estimate_text_width(val));
                        }
                    }
                    None => {
                        worksheet.write_blank(n_row, n_col, fmt_text)?;
                    }
                }
            }
        }

        if policy.if_autofit {
            for (n_idx_col, n_width) in l_widths.into_iter().enumerate() {
                worksheet.set_column_width(
                    cast_col_num(n_idx_col)?,
                    calculate_column_width(n_width, policy) as f64,
                )?;
            }
        }
        Ok(())
    }

    /// `name`, or `name__2`, `name__3`, ... when taken by the workbook or by an
    /// earlier sheet of the current call. Comparison ignores case.
    fn derive_unique_sheet_name(
        &self,
        name: &str,
        set_sheet_keys_pending: &BTreeSet<String>,
    ) -> String {
        let if_taken = |candidate: &str| {
            let c_key = candidate.to_lowercase();
            self.set_sheet_keys.contains(&c_key) || set_sheet_keys_pending.contains(&c_key)
        };
        if !if_taken(name) {
            return name.to_string();
        }

        let mut n_idx = 2usize;
        loop {
            let c_suffix = format!("__{n_idx}");
            let c_base: String = name
                .chars()
                .take(N_LEN_EXCEL_SHEET_NAME_MAX.saturating_sub(c_suffix.len()))
                .collect();
            let candidate = format!("{c_base}{c_suffix}");
            if !if_taken(&candidate) {
                return candidate;
            }
            n_idx += 1;
        }
    }
}

/// Cell text for one frame value; `None` for nulls.
fn derive_cell_text(value: AnyValue<'_>) -> Option<String> {
    match value {
        AnyValue::Null => None,
        AnyValue::String(val) => Some(val.to_string()),
        AnyValue::StringOwned(val) => Some(val.to_string()),
        other => Some(other.to_string()),
    }
}

fn derive_rust_xlsx_format(style: &SpecCellStyle) -> Format {
    let mut format = Format::new()
        .set_font_name(style.font_name.as_str())
        .set_font_size(style.font_size)
        .set_align(derive_format_align(style.align))
        .set_align(FormatAlign::VerticalCenter);
    if style.if_bold {
        format = format.set_bold();
    }
    if style.if_border {
        format = format.set_border(FormatBorder::Thin);
    }
    format
}

fn derive_format_align(align: EnumCellAlign) -> FormatAlign {
    match align {
        EnumCellAlign::Left => FormatAlign::Left,
        EnumCellAlign::Center => FormatAlign::Center,
        EnumCellAlign::Right => FormatAlign::Right,
    }
}

fn cast_row_num(value: usize) -> Result<u32, XlsxExportError> {
    u32::try_from(value)
        .map_err(|_| XlsxExportError::InvalidInput(format!("row index overflow: {value}")))
}

fn cast_col_num(value: usize) -> Result<u16, XlsxExportError> {
    u16::try_from(value)
        .map_err(|_| XlsxExportError::InvalidInput(format!("column index overflow: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::SpecColumnWidthPolicy;
    use polars::prelude::Column;

    fn sample_records() -> Vec<SkuRecord> {
        vec![
            SkuRecord::from_row("BR-BLK-S-ST-001", "Bracelet", "Black", "Small", "Stone"),
            SkuRecord::from_row("NK-WHT-M-GL-001", "Necklace", "White", "Medium", "Glass"),
        ]
    }

    fn sheet_names(writer: &SkuXlsxWriter) -> Vec<String> {
        writer
            .report()
            .into_iter()
            .flat_map(|report| report.sheets)
            .map(|sheet| sheet.sheet_name)
            .collect()
    }

    #[test]
    fn test_write_records_reports_one_sheet() {
        let mut writer = SkuXlsxWriter::new(SpecXlsxWriteOptions::default());
        writer.write_records(&sample_records(), "SKUs").unwrap();

        let l_reports = writer.report();
        assert_eq!(l_reports.len(), 1);
        assert_eq!(
            l_reports[0].sheets,
            vec![SpecSheetPart {
                sheet_name: "SKUs".to_string(),
                row_start_inclusive: 0,
                row_end_exclusive: 2,
            }]
        );
        assert_eq!(l_reports[0].rows_written(), 2);
    }

    #[test]
    fn test_repeated_sheet_names_are_made_unique() {
        let mut writer = SkuXlsxWriter::new(SpecXlsxWriteOptions::default());
        writer.write_records(&sample_records(), "SKUs").unwrap();
        writer.write_records(&sample_records(), "SKUs").unwrap();
        writer.write_records(&[], "SKU?s").unwrap();

        assert_eq!(sheet_names(&writer), vec!["SKUs", "SKUs__2", "SKU_s"]);
        assert!(writer.save_to_buffer().is_ok());
    }

    #[test]
    fn test_sheet_names_differing_only_in_case_do_not_collide_at_save() {
        let mut writer = SkuXlsxWriter::new(SpecXlsxWriteOptions::default());
        writer.write_records(&sample_records(), "SKUs").unwrap();
        writer.write_records(&sample_records(), "skus").unwrap();
        writer.write_records(&sample_records(), "SKUS__2").unwrap();

        assert_eq!(sheet_names(&writer), vec!["SKUs", "skus__2", "SKUS__2__2"]);
        assert!(writer.save_to_buffer().is_ok());
    }

    #[test]
    fn test_apostrophe_sheet_name_is_sanitized_before_write() {
        let mut writer = SkuXlsxWriter::new(SpecXlsxWriteOptions::default());
        writer.write_records(&sample_records(), "'bad").unwrap();
        writer.write_records(&sample_records(), "Sheet1").unwrap();

        assert_eq!(sheet_names(&writer), vec!["bad", "Sheet1"]);
        assert!(writer.save_to_buffer().is_ok());
    }

    #[test]
    fn test_non_string_and_null_cells_are_written_as_text() {
        let df_stock = DataFrame::new(vec![
            Column::new("sku".into(), ["BR-BLK-S-ST-001", "NK-WHT-M-GL-001"]),
            Column::new("qty".into(), [3i64, 12]),
            Column::new("note".into(), [Some("restock"), None]),
        ])
        .unwrap();
        let mut writer = SkuXlsxWriter::new(SpecXlsxWriteOptions {
            missing_value_str: Some("NA".to_string()),
            ..Default::default()
        });
        writer.write_sheet_from_dataframe(&df_stock, "Stock").unwrap();

        assert_eq!(writer.report()[0].rows_written(), 2);
        assert!(writer.save_to_buffer().is_ok());
        assert_eq!(derive_cell_text(AnyValue::Int64(12)).as_deref(), Some("12"));
        assert_eq!(derive_cell_text(AnyValue::String("BR")).as_deref(), Some("BR"));
        assert_eq!(derive_cell_text(AnyValue::Null), None);
    }

    #[test]
    fn test_save_without_sheets_fails() {
        let mut writer = SkuXlsxWriter::new(SpecXlsxWriteOptions::default());
        assert!(matches!(
            writer.save_to_buffer(),
            Err(XlsxExportError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_invalid_width_policy_is_rejected() {
        let mut writer = SkuXlsxWriter::new(SpecXlsxWriteOptions {
            policy_width: SpecColumnWidthPolicy {
                width_min: 10,
                width_max: 5,
                ..Default::default()
            },
            ..Default::default()
        });
        assert!(matches!(
            writer.write_records(&sample_records(), "SKUs"),
            Err(XlsxExportError::InvalidPolicy(_))
        ));
        assert!(writer.report().is_empty());
        assert!(matches!(
            writer.save_to_buffer(),
            Err(XlsxExportError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_format_alignment_mapping() {
        assert_eq!(derive_format_align(EnumCellAlign::Left), FormatAlign::Left);
        assert_eq!(derive_format_align(EnumCellAlign::Center), FormatAlign::Center);
        assert_eq!(derive_format_align(EnumCellAlign::Right), FormatAlign::Right);
    }
}
