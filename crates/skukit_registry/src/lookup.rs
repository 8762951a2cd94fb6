//! Label -> short-code lookup tables.
//!
//! The registry never resolves labels itself; callers turn the four labels a
//! user picked into [`SpecSkuCodes`] through a [`CodeLookup`] and pass the
//! codes to [`crate::SkuRegistry::mint`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::conf::derive_default_code_table;
use crate::spec::{EnumCodeDomain, LookupError, SpecSkuCodes, SpecSkuLabels};

/// `(domain, label) -> code` mapping consumed by the UI shell.
pub trait CodeLookup {
    /// Short code for `label` in `domain`, if known.
    fn lookup_code(&self, domain: EnumCodeDomain, label: &str) -> Option<&str>;

    /// Like [`Self::lookup_code`] but reports the missing label.
    fn resolve_code(&self, domain: EnumCodeDomain, label: &str) -> Result<String, LookupError> {
        self.lookup_code(domain, label)
            .map(ToString::to_string)
            .ok_or_else(|| LookupError::UnknownLabel {
                domain,
                label: label.to_string(),
            })
    }

    /// Resolve all four labels at once.
    fn resolve_codes(&self, labels: &SpecSkuLabels) -> Result<SpecSkuCodes, LookupError> {
        Ok(SpecSkuCodes {
            category: self.resolve_code(EnumCodeDomain::Category, &labels.category)?,
            color: self.resolve_code(EnumCodeDomain::Color, &labels.color)?,
            size: self.resolve_code(EnumCodeDomain::Size, &labels.size)?,
            material: self.resolve_code(EnumCodeDomain::Material, &labels.material)?,
        })
    }
}

/// One row of a tabular code source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecCodeRow {
    /// Domain name (`category`, `color`, `size`, `material`).
    pub domain: String,
    /// Human-readable label.
    pub label: String,
    /// Short code.
    pub code: String,
}

#[derive(Debug, Deserialize)]
struct SpecCodeBookDocument {
    #[serde(default)]
    codes: Vec<SpecCodeRow>,
}

/// In-memory code tables, one ordered `(label, code)` list per domain.
///
/// Label order is insertion order, which is the order a form shows options in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeBook {
    dict_tables: BTreeMap<EnumCodeDomain, Vec<(String, String)>>,
}

impl CodeBook {
    /// Empty code book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Code book holding the compiled-in tables.
    pub fn builtin() -> Self {
        let mut book = Self::new();
        for domain in EnumCodeDomain::ALL {
            for (label, code) in derive_default_code_table(domain) {
                book.insert(domain, *label, *code);
            }
        }
        book
    }

    /// Insert or replace the code for `label` in `domain`.
    pub fn insert(
        &mut self,
        domain: EnumCodeDomain,
        label: impl Into<String>,
        code: impl Into<String>,
    ) {
        let c_label = label.into();
        let c_code = code.into();
        let l_entries = self.dict_tables.entry(domain).or_default();
        match l_entries.iter_mut().find(|(lbl, _)| *lbl == c_label) {
            Some(entry) => entry.1 = c_code,
            None => l_entries.push((c_label, c_code)),
        }
    }

    /// Build from typed rows; the first row naming an unknown domain fails.
    pub fn from_rows<I>(rows: I) -> Result<Self, LookupError>
    where
        I: IntoIterator<Item = SpecCodeRow>,
    {
        let mut book = Self::new();
        for (row_idx, row) in rows.into_iter().enumerate() {
            let domain = row
                .domain
                .parse::<EnumCodeDomain>()
                .map_err(|err| LookupError::InvalidRow {
                    row_idx,
                    message: err.to_string(),
                })?;
            let c_label = row.label.trim();
            let c_code = row.code.trim();
            if c_label.is_empty() {
                return Err(LookupError::InvalidRow {
                    row_idx,
                    message: "label is empty".to_string(),
                });
            }
            if c_code.is_empty() {
                return Err(LookupError::InvalidRow {
                    row_idx,
                    message: format!("code for {c_label:?} is empty"),
                });
            }
            book.insert(domain, c_label, c_code);
        }
        tracing::debug!(n_rows = book.len(), "loaded code book from rows");
        Ok(book)
    }

    /// Build from raw spreadsheet rows `[domain, label, code]`.
    ///
    /// A first row equal to `domain, label, code` (any case) is treated as a
    /// header and skipped. Cells beyond the third are ignored.
    pub fn from_string_rows<S: AsRef<str>>(rows: &[Vec<S>]) -> Result<Self, LookupError> {
        let mut l_rows = Vec::new();
        for (row_idx, cells) in rows.iter().enumerate() {
            if cells.len() < 3 {
                return Err(LookupError::InvalidRow {
                    row_idx,
                    message: format!("expected 3 cells, got {}", cells.len()),
                });
            }
            let c_domain = cells[0].as_ref();
            if row_idx == 0
                && c_domain.trim().eq_ignore_ascii_case("domain")
                && cells[1].as_ref().trim().eq_ignore_ascii_case("label")
            {
                continue;
            }
            l_rows.push(SpecCodeRow {
                domain: c_domain.to_string(),
                label: cells[1].as_ref().to_string(),
                code: cells[2].as_ref().to_string(),
            });
        }
        Self::from_rows(l_rows)
    }

    /// Parse a TOML document made of `[[codes]]` tables with `domain`,
    /// `label` and `code` keys.
    pub fn from_toml_str(text: &str) -> Result<Self, LookupError> {
        let doc: SpecCodeBookDocument =
            toml::from_str(text).map_err(|err| LookupError::Parse(err.to_string()))?;
        Self::from_rows(doc.codes)
    }

    /// Labels for `domain` in insertion order.
    pub fn labels(&self, domain: EnumCodeDomain) -> Vec<&str> {
        self.dict_tables
            .get(&domain)
            .map(|l_entries| l_entries.iter().map(|(lbl, _)| lbl.as_str()).collect())
            .unwrap_or_default()
    }

    /// First label mapped to `code` in `domain`.
    pub fn label_for_code(&self, domain: EnumCodeDomain, code: &str) -> Option<&str> {
        self.dict_tables
            .get(&domain)?
            .iter()
            .find(|(_, cd)| cd == code)
            .map(|(lbl, _)| lbl.as_str())
    }

    /// Total number of `(label, code)` entries across domains.
    pub fn len(&self) -> usize {
        self.dict_tables.values().map(Vec::len).sum()
    }

    /// Whether no domain has any entry.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CodeLookup for CodeBook {
    fn lookup_code(&self, domain: EnumCodeDomain, label: &str) -> Option<&str> {
        self.dict_tables
            .get(&domain)?
            .iter()
            .find(|(lbl, _)| lbl == label)
            .map(|(_, code)| code.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_resolves_every_default_label() {
        let book = CodeBook::builtin();
        assert_eq!(book.len(), 12);
        assert_eq!(
            book.labels(EnumCodeDomain::Category),
            vec!["Bracelet", "Necklace", "Ring"]
        );

        let codes = book
            .resolve_codes(&SpecSkuLabels::new("Ring", "Red", "Large", "Silver"))
            .unwrap();
        assert_eq!(codes, SpecSkuCodes::new("RL", "RED", "L", "SL"));
        assert_eq!(
            book.label_for_code(EnumCodeDomain::Color, "WHT"),
            Some("White")
        );
    }

    #[test]
    fn test_unknown_label_is_reported_with_domain() {
        let book = CodeBook::builtin();
        let err = book
            .resolve_codes(&SpecSkuLabels::new("Bracelet", "Green", "Small", "Stone"))
            .unwrap_err();
        assert_eq!(
            err,
            LookupError::UnknownLabel {
                domain: EnumCodeDomain::Color,
                label: "Green".to_string()
            }
        );
        assert_eq!(err.to_string(), "No color code for label \"Green\"");
    }

    #[test]
    fn test_from_string_rows_skips_header_and_keeps_order() {
        let rows = vec![
            vec!["domain", "label", "code"],
            vec!["category", "Earring", "ER"],
            vec!["category", "Anklet", "AK"],
            vec!["material", "Gold", "GD"],
            vec!["category", "Earring", "EA"],
        ];
        let book = CodeBook::from_string_rows(&rows).unwrap();

        assert_eq!(book.labels(EnumCodeDomain::Category), vec!["Earring", "Anklet"]);
        assert_eq!(
            book.lookup_code(EnumCodeDomain::Category, "Earring"),
            Some("EA")
        );
        assert_eq!(book.lookup_code(EnumCodeDomain::Material, "Gold"), Some("GD"));
        assert!(book.labels(EnumCodeDomain::Size).is_empty());
    }

    #[test]
    fn test_from_string_rows_rejects_short_and_unknown_rows() {
        let err = CodeBook::from_string_rows(&[vec!["category", "Ring"]]).unwrap_err();
        assert!(matches!(err, LookupError::InvalidRow { row_idx: 0, .. }));

        let err = CodeBook::from_string_rows(&[
            vec!["category", "Ring", "RL"],
            vec!["finish", "Matte", "MT"],
        ])
        .unwrap_err();
        assert!(matches!(err, LookupError::InvalidRow { row_idx: 1, .. }));

        let err = CodeBook::from_string_rows(&[vec!["size", "Small", "  "]]).unwrap_err();
        assert!(matches!(err, LookupError::InvalidRow { row_idx: 0, .. }));
    }

    #[test]
    fn test_from_toml_str() {
        let text = r#"
[[codes]]
domain = "color"
label = "Blue"
code = "BLU"

[[codes]]
domain = "size"
label = "XL"
code = "XL"
"#;
        let book = CodeBook::from_toml_str(text).unwrap();
        assert_eq!(book.lookup_code(EnumCodeDomain::Color, "Blue"), Some("BLU"));
        assert_eq!(book.lookup_code(EnumCodeDomain::Size, "XL"), Some("XL"));

        assert!(matches!(
            CodeBook::from_toml_str("codes = 3"),
            Err(LookupError::Parse(_))
        ));
        assert!(CodeBook::from_toml_str("").unwrap().is_empty());
    }
}
