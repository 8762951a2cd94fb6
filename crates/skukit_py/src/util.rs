//! Argument parsing and error classification shared by the Python bindings.

use skukit_io_xlsx::XlsxExportError;
use skukit_registry::{EnumPrefixMatchRule, EnumSerialRule, LookupError, RegistryError};

/// Python exception class an error is raised as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumPyErrorKind {
    Index,
    Key,
    Value,
    Runtime,
}

/// Python ints are signed; negative indexes are rejected rather than wrapped.
pub fn cast_index(index: i64, len: usize) -> Result<usize, String> {
    usize::try_from(index)
        .map_err(|_| format!("Index out of range: {index} (registry holds {len} records)"))
}

pub fn parse_rule_prefix_match(value: &str) -> Result<EnumPrefixMatchRule, String> {
    match value {
        "literal" => Ok(EnumPrefixMatchRule::Literal),
        "structural" => Ok(EnumPrefixMatchRule::Structural),
        _ => Err(format!(
            "Invalid prefix match rule: `{value}`. Expected one of: ['literal', 'structural']"
        )),
    }
}

pub fn parse_rule_serial(value: &str) -> Result<EnumSerialRule, String> {
    match value {
        "prefix_count" => Ok(EnumSerialRule::PrefixCount),
        "monotonic" => Ok(EnumSerialRule::Monotonic),
        _ => Err(format!(
            "Invalid serial rule: `{value}`. Expected one of: ['prefix_count', 'monotonic']"
        )),
    }
}

pub fn derive_registry_error_kind(exception: &RegistryError) -> EnumPyErrorKind {
    match exception {
        RegistryError::OutOfRange { .. } => EnumPyErrorKind::Index,
        RegistryError::InvalidOptions(_) => EnumPyErrorKind::Value,
    }
}

pub fn derive_lookup_error_kind(exception: &LookupError) -> EnumPyErrorKind {
    match exception {
        LookupError::UnknownLabel { .. } => EnumPyErrorKind::Key,
        LookupError::UnknownDomain(_) | LookupError::InvalidRow { .. } | LookupError::Parse(_) => {
            EnumPyErrorKind::Value
        }
    }
}

pub fn derive_export_error_kind(exception: &XlsxExportError) -> EnumPyErrorKind {
    match exception {
        XlsxExportError::InvalidPolicy(_) | XlsxExportError::InvalidInput(_) => {
            EnumPyErrorKind::Value
        }
        XlsxExportError::Xlsx(_) | XlsxExportError::Polars(_) => EnumPyErrorKind::Runtime,
    }
}
