//! Stateless helpers used by the XLSX export writer.

use std::collections::BTreeMap;

use crate::conf::{
    C_SHEET_NAME_DEFAULT, N_LEN_EXCEL_SHEET_NAME_MAX, N_NROWS_EXCEL_MAX, TUP_EXCEL_ILLEGAL,
};
use crate::spec::{SpecColumnWidthPolicy, SpecSheetPart, SpecXlsxReport, XlsxExportError};

////////////////////////////////////////////////////////////////////////////////
// #region Validation

/// Reject frames whose header would repeat a column name.
pub fn validate_unique_columns(columns: &[String]) -> Result<(), XlsxExportError> {
    let mut dict_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for c_name in columns {
        *dict_counts.entry(c_name.as_str()).or_insert(0) += 1;
    }
    let l_dups: Vec<&str> = dict_counts
        .into_iter()
        .filter(|(_, n_count)| *n_count > 1)
        .map(|(c_name, _)| c_name)
        .collect();
    if l_dups.is_empty() {
        return Ok(());
    }
    Err(XlsxExportError::InvalidInput(format!(
        "Duplicate column names: {l_dups:?}"
    )))
}

pub fn validate_width_policy(policy: &SpecColumnWidthPolicy) -> Result<(), XlsxExportError> {
    if policy.width_min == 0 {
        return Err(XlsxExportError::InvalidPolicy(
            "width_min must be >= 1.".to_string(),
        ));
    }
    if policy.width_max < policy.width_min {
        return Err(XlsxExportError::InvalidPolicy(format!(
            "width_max ({}) must be >= width_min ({}).",
            policy.width_max, policy.width_min
        )));
    }
    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetNames

/// Make `name` acceptable to Excel: illegal characters become `_`, surrounding
/// whitespace and apostrophes are dropped, length is capped.
pub fn sanitize_sheet_name(name: &str) -> String {
    let c_replaced: String = name
        .chars()
        .map(|chr| if TUP_EXCEL_ILLEGAL.contains(&chr) { '_' } else { chr })
        .collect();
    let c_capped: String = c_replaced
        .trim()
        .trim_matches('\'')
        .chars()
        .take(N_LEN_EXCEL_SHEET_NAME_MAX)
        .collect();
    let c_name = c_capped.trim_end().trim_end_matches('\'');
    if c_name.is_empty() {
        return C_SHEET_NAME_DEFAULT.to_string();
    }
    c_name.to_string()
}

/// `base_1`, `base_2`, ... with the base shortened to fit the length cap.
pub fn create_sheet_identifier(base_name: &str, part_idx_1based: usize) -> String {
    let c_suffix = format!("_{part_idx_1based}");
    let c_base: String = base_name
        .chars()
        .take(N_LEN_EXCEL_SHEET_NAME_MAX.saturating_sub(c_suffix.len()))
        .collect();
    format!("{c_base}{c_suffix}")
}

/// Split `n_rows` data rows into sheets that fit under one header row each.
///
/// A frame that fits keeps `sheet_name`, even when empty; larger frames become
/// `sheet_name_1`, `sheet_name_2`, ... and a warning is added to `report`.
pub fn plan_sheet_parts(
    n_rows: usize,
    sheet_name: &str,
    report: &mut SpecXlsxReport,
) -> Vec<SpecSheetPart> {
    let n_rows_per_sheet = N_NROWS_EXCEL_MAX - 1;
    if n_rows <= n_rows_per_sheet {
        return vec![SpecSheetPart {
            sheet_name: sheet_name.to_string(),
            row_start_inclusive: 0,
            row_end_exclusive: n_rows,
        }];
    }

    let l_parts: Vec<SpecSheetPart> = (0..n_rows)
        .step_by(n_rows_per_sheet)
        .enumerate()
        .map(|(n_idx, n_row_start)| SpecSheetPart {
            sheet_name: create_sheet_identifier(sheet_name, n_idx + 1),
            row_start_inclusive: n_row_start,
            row_end_exclusive: usize::min(n_rows, n_row_start + n_rows_per_sheet),
        })
        .collect();
    report.warn(format!(
        "{n_rows} rows exceed the Excel row limit; split into {} sheets.",
        l_parts.len()
    ));
    l_parts
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Widths

/// Displayed width: ASCII counts one unit, other characters 1.6 units.
pub fn estimate_text_width(s: &str) -> usize {
    let n_ascii = s.chars().filter(char::is_ascii).count();
    let n_wide = s.chars().count() - n_ascii;
    n_ascii + (n_wide as f64 * 1.6).round() as usize
}

/// Pad a measured width and clamp it into the policy bounds (Excel caps at 255).
pub fn calculate_column_width(n_width_measured: usize, policy: &SpecColumnWidthPolicy) -> usize {
    let n_min = usize::max(1, policy.width_min);
    let n_max = usize::min(255, usize::max(n_min, policy.width_max));
    (n_width_measured + policy.width_padding).clamp(n_min, n_max)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
