//! SKU record models, registry options and error types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////
// #region CodeDomain

/// Lookup table a short code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumCodeDomain {
    /// Product category (e.g. `Bracelet` -> `BR`).
    Category,
    /// Color (e.g. `Black` -> `BLK`).
    Color,
    /// Size (e.g. `Small` -> `S`).
    Size,
    /// Material (e.g. `Stone` -> `ST`).
    Material,
}

impl EnumCodeDomain {
    /// All domains in SKU segment order.
    pub const ALL: [EnumCodeDomain; 4] = [
        EnumCodeDomain::Category,
        EnumCodeDomain::Color,
        EnumCodeDomain::Size,
        EnumCodeDomain::Material,
    ];

    /// Lowercase domain name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Color => "color",
            Self::Size => "size",
            Self::Material => "material",
        }
    }
}

impl fmt::Display for EnumCodeDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnumCodeDomain {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "category" => Ok(Self::Category),
            "color" | "colour" => Ok(Self::Color),
            "size" => Ok(Self::Size),
            "material" => Ok(Self::Material),
            _ => Err(LookupError::UnknownDomain(s.to_string())),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region RecordSpecification

/// The four short codes that make up a SKU prefix.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct SpecSkuCodes {
    /// Category short code.
    pub category: String,
    /// Color short code.
    pub color: String,
    /// Size short code.
    pub size: String,
    /// Material short code.
    pub material: String,
}

impl SpecSkuCodes {
    /// Build codes from anything string-like.
    pub fn new(
        category: impl Into<String>,
        color: impl Into<String>,
        size: impl Into<String>,
        material: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            color: color.into(),
            size: size.into(),
            material: material.into(),
        }
    }

    /// Code for one domain.
    pub fn get(&self, domain: EnumCodeDomain) -> &str {
        match domain {
            EnumCodeDomain::Category => &self.category,
            EnumCodeDomain::Color => &self.color,
            EnumCodeDomain::Size => &self.size,
            EnumCodeDomain::Material => &self.material,
        }
    }
}

/// The four human-readable labels shown next to a SKU.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SpecSkuLabels {
    /// Category label.
    pub category: String,
    /// Color label.
    pub color: String,
    /// Size label.
    pub size: String,
    /// Material label.
    pub material: String,
}

impl SpecSkuLabels {
    /// Build labels from anything string-like.
    pub fn new(
        category: impl Into<String>,
        color: impl Into<String>,
        size: impl Into<String>,
        material: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            color: color.into(),
            size: size.into(),
            material: material.into(),
        }
    }

    /// Label for one domain.
    pub fn get(&self, domain: EnumCodeDomain) -> &str {
        match domain {
            EnumCodeDomain::Category => &self.category,
            EnumCodeDomain::Color => &self.color,
            EnumCodeDomain::Size => &self.size,
            EnumCodeDomain::Material => &self.material,
        }
    }
}

/// One generated SKU row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkuRecord {
    /// Full SKU string, `<CAT>-<COL>-<SIZE>-<MAT>-<NNN>`.
    pub sku: String,
    /// Category label.
    pub category: String,
    /// Color label.
    pub color: String,
    /// Size label.
    pub size: String,
    /// Material label.
    pub material: String,
    /// Codes `sku` was minted from. Absent for records imported from plain rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codes: Option<SpecSkuCodes>,
}

impl SkuRecord {
    /// Build a record from a minted SKU, its labels and its codes.
    pub fn new(sku: impl Into<String>, labels: SpecSkuLabels, codes: SpecSkuCodes) -> Self {
        Self {
            sku: sku.into(),
            category: labels.category,
            color: labels.color,
            size: labels.size,
            material: labels.material,
            codes: Some(codes),
        }
    }

    /// Build a record without structured codes (e.g. rows read back from an export).
    pub fn from_row(
        sku: impl Into<String>,
        category: impl Into<String>,
        color: impl Into<String>,
        size: impl Into<String>,
        material: impl Into<String>,
    ) -> Self {
        Self {
            sku: sku.into(),
            category: category.into(),
            color: color.into(),
            size: size.into(),
            material: material.into(),
            codes: None,
        }
    }

    /// Labels as a single value.
    pub fn labels(&self) -> SpecSkuLabels {
        SpecSkuLabels {
            category: self.category.clone(),
            color: self.color.clone(),
            size: self.size.clone(),
            material: self.material.clone(),
        }
    }

    /// Export row in [`crate::conf::TUP_SKU_RECORD_COLUMNS`] order.
    pub fn to_row(&self) -> [&str; 5] {
        [
            &self.sku,
            &self.category,
            &self.color,
            &self.size,
            &self.material,
        ]
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region RegistryOptions

/// How existing records are matched against a new prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumPrefixMatchRule {
    /// `sku.starts_with(base)` on the raw string. `BR-BLK-S-ST` also matches
    /// `BR-BLK-S-ST2-001`. Compatible with existing exports (default).
    #[default]
    Literal,
    /// Exact equality of the four codes.
    Structural,
}

/// How the serial of a new SKU is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumSerialRule {
    /// `count(matching records) + 1`. Serials can repeat after a delete or
    /// edit (default).
    #[default]
    PrefixCount,
    /// One past the highest serial ever stored for the prefix in this
    /// registry. Never reuses a serial after delete or edit.
    Monotonic,
}

/// Registry-wide minting policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecRegistryOptions {
    /// Prefix matching policy.
    pub rule_prefix_match: EnumPrefixMatchRule,
    /// Serial derivation policy.
    pub rule_serial: EnumSerialRule,
}

impl SpecRegistryOptions {
    /// Parse options from a TOML document with top-level keys
    /// `rule_prefix_match` and `rule_serial`.
    pub fn from_toml_str(text: &str) -> Result<Self, RegistryError> {
        toml::from_str(text).map_err(|err| RegistryError::InvalidOptions(err.to_string()))
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Registry mutation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// `update`/`remove` index outside `[0, len)`.
    #[error("Index out of range: {index} (registry holds {len} records)")]
    OutOfRange {
        /// Requested index.
        index: usize,
        /// Registry length at call time.
        len: usize,
    },
    /// Options document could not be parsed.
    #[error("Failed to parse registry options: {0}")]
    InvalidOptions(String),
}

/// Code lookup and code-book loading failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// Domain name is not one of category/color/size/material.
    #[error("Unknown code domain: {0:?}")]
    UnknownDomain(String),
    /// Label has no code in the given domain.
    #[error("No {domain} code for label {label:?}")]
    UnknownLabel {
        /// Domain searched.
        domain: EnumCodeDomain,
        /// Label requested.
        label: String,
    },
    /// Tabular row could not be interpreted.
    #[error("Invalid code row {row_idx}: {message}")]
    InvalidRow {
        /// Zero-based row index in the source.
        row_idx: usize,
        /// What was wrong.
        message: String,
    },
    /// TOML document could not be parsed.
    #[error("Failed to parse code book: {0}")]
    Parse(String),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_domain_parses_case_insensitively() {
        assert_eq!(
            "Category".parse::<EnumCodeDomain>(),
            Ok(EnumCodeDomain::Category)
        );
        assert_eq!(" colour ".parse::<EnumCodeDomain>(), Ok(EnumCodeDomain::Color));
        assert_eq!(
            "weight".parse::<EnumCodeDomain>(),
            Err(LookupError::UnknownDomain("weight".to_string()))
        );
    }

    #[test]
    fn test_registry_options_from_toml() {
        let opts = SpecRegistryOptions::from_toml_str(
            "rule_prefix_match = \"structural\"\nrule_serial = \"monotonic\"\n",
        )
        .unwrap();
        assert_eq!(opts.rule_prefix_match, EnumPrefixMatchRule::Structural);
        assert_eq!(opts.rule_serial, EnumSerialRule::Monotonic);

        let opts_default = SpecRegistryOptions::from_toml_str("").unwrap();
        assert_eq!(opts_default, SpecRegistryOptions::default());

        let err = SpecRegistryOptions::from_toml_str("rule_serial = \"random\"").unwrap_err();
        assert!(matches!(err, RegistryError::InvalidOptions(_)));
        assert!(err.to_string().starts_with("Failed to parse registry options: "));
    }

    #[test]
    fn test_out_of_range_message() {
        let err = RegistryError::OutOfRange { index: 4, len: 2 };
        assert_eq!(
            err.to_string(),
            "Index out of range: 4 (registry holds 2 records)"
        );
    }
}
