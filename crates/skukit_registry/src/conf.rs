//! SKU constants and default code-table presets.

use crate::spec::EnumCodeDomain;

/// Separator between SKU segments.
pub const C_SKU_SEPARATOR: &str = "-";
/// Minimum rendered width of the serial segment (wider values are not truncated).
pub const N_WIDTH_SERIAL: usize = 3;
/// Export column order (header row).
pub const TUP_SKU_RECORD_COLUMNS: [&str; 5] = ["sku", "category", "color", "size", "material"];

/// Default category table `(label, code)`.
pub const TUP_CATEGORY_CODES: [(&str, &str); 3] =
    [("Bracelet", "BR"), ("Necklace", "NK"), ("Ring", "RL")];
/// Default color table `(label, code)`.
pub const TUP_COLOR_CODES: [(&str, &str); 3] =
    [("Black", "BLK"), ("White", "WHT"), ("Red", "RED")];
/// Default size table `(label, code)`.
pub const TUP_SIZE_CODES: [(&str, &str); 3] = [("Small", "S"), ("Medium", "M"), ("Large", "L")];
/// Default material table `(label, code)`.
pub const TUP_MATERIAL_CODES: [(&str, &str); 3] =
    [("Stone", "ST"), ("Glass", "GL"), ("Silver", "SL")];

/// Compiled-in `(label, code)` table for one domain.
pub fn derive_default_code_table(domain: EnumCodeDomain) -> &'static [(&'static str, &'static str)] {
    match domain {
        EnumCodeDomain::Category => &TUP_CATEGORY_CODES,
        EnumCodeDomain::Color => &TUP_COLOR_CODES,
        EnumCodeDomain::Size => &TUP_SIZE_CODES,
        EnumCodeDomain::Material => &TUP_MATERIAL_CODES,
    }
}
