//! Stateless SKU string helpers used by the registry.

use crate::conf::{C_SKU_SEPARATOR, N_WIDTH_SERIAL};
use crate::spec::{EnumPrefixMatchRule, SkuRecord, SpecSkuCodes};

////////////////////////////////////////////////////////////////////////////////
// #region SkuComposition

/// Join the four codes into the SKU prefix `CAT-COL-SIZE-MAT`.
pub fn derive_sku_base(codes: &SpecSkuCodes) -> String {
    [
        codes.category.as_str(),
        codes.color.as_str(),
        codes.size.as_str(),
        codes.material.as_str(),
    ]
    .join(C_SKU_SEPARATOR)
}

/// Zero-pad `serial` to [`N_WIDTH_SERIAL`] digits; wider values keep all digits.
pub fn format_serial(serial: u64) -> String {
    format!("{serial:0width$}", width = N_WIDTH_SERIAL)
}

/// Append the formatted serial to a prefix.
pub fn compose_sku(base: &str, serial: u64) -> String {
    format!("{base}{C_SKU_SEPARATOR}{}", format_serial(serial))
}

/// Split a SKU into `(prefix, serial)` at the last separator.
///
/// Returns `None` when there is no separator or the tail is not a base-10 number.
pub fn split_sku_serial(sku: &str) -> Option<(&str, u64)> {
    let (c_prefix, c_serial) = sku.rsplit_once(C_SKU_SEPARATOR)?;
    if c_serial.is_empty() || !c_serial.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    c_serial.parse::<u64>().ok().map(|n| (c_prefix, n))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region PrefixMatching

/// Whether `record` shares the prefix `base` (built from `codes`) under `rule`.
pub fn is_prefix_match(
    record: &SkuRecord,
    base: &str,
    codes: &SpecSkuCodes,
    rule: EnumPrefixMatchRule,
) -> bool {
    match rule {
        EnumPrefixMatchRule::Literal => record.sku.starts_with(base),
        EnumPrefixMatchRule::Structural => match &record.codes {
            Some(record_codes) => record_codes == codes,
            None => split_sku_serial(&record.sku).is_some_and(|(c_prefix, _)| c_prefix == base),
        },
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
