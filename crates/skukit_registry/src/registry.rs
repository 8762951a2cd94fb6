//! Ordered SKU record registry and serial minting.

use std::collections::BTreeMap;

use crate::spec::{
    EnumPrefixMatchRule, EnumSerialRule, RegistryError, SkuRecord, SpecRegistryOptions,
    SpecSkuCodes, SpecSkuLabels,
};
use crate::util::{compose_sku, derive_sku_base, is_prefix_match, split_sku_serial};

/// Session-scoped, ordered list of generated SKU records.
///
/// Insertion order is display order and the addressing scheme for
/// [`Self::update`] and [`Self::remove`]. All operations are synchronous and
/// single-writer; independent sessions own independent registries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkuRegistry {
    records: Vec<SkuRecord>,
    options: SpecRegistryOptions,
    /// Highest serial ever stored per key; only read under
    /// [`EnumSerialRule::Monotonic`].
    dict_serial_high_water: BTreeMap<EnumSerialKey, u64>,
}

/// High-water keys. Every stored SKU is tracked under its text prefix for
/// literal matching, and under its codes (or, lacking codes, its prefix) for
/// structural matching.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum EnumSerialKey {
    Prefix(String),
    Codes(SpecSkuCodes),
    UncodedPrefix(String),
}

impl SkuRegistry {
    /// Empty registry with default (export-compatible) minting rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty registry with explicit minting rules.
    pub fn with_options(options: SpecRegistryOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Registry pre-filled with `records`, e.g. rows read back from an export.
    pub fn from_records(records: Vec<SkuRecord>, options: SpecRegistryOptions) -> Self {
        let mut registry = Self::with_options(options);
        for record in records {
            registry.append(record);
        }
        registry
    }

    /// Minting rules in effect.
    pub fn options(&self) -> SpecRegistryOptions {
        self.options
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the registry holds no record.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&SkuRecord> {
        self.records.get(index)
    }

    /// All records in display order.
    pub fn records(&self) -> &[SkuRecord] {
        &self.records
    }

    /// Iterate records in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, SkuRecord> {
        self.records.iter()
    }

    /// Drop every record and forget serial history.
    pub fn clear(&mut self) {
        self.records.clear();
        self.dict_serial_high_water.clear();
    }

    /// Consume the registry, returning the records in display order.
    pub fn into_records(self) -> Vec<SkuRecord> {
        self.records
    }

    /// Derive the next SKU for `codes` against the current records.
    ///
    /// Does not modify the registry; store the result with [`Self::append`]
    /// or [`Self::update`].
    pub fn mint(&self, codes: &SpecSkuCodes) -> String {
        let base = derive_sku_base(codes);
        let rule_match = self.options.rule_prefix_match;
        let matches = self
            .records
            .iter()
            .filter(|record| is_prefix_match(record, &base, codes, rule_match));

        let serial = match self.options.rule_serial {
            EnumSerialRule::PrefixCount => matches.count() as u64 + 1,
            EnumSerialRule::Monotonic => {
                let n_max_stored = matches
                    .filter_map(|record| split_sku_serial(&record.sku).map(|(_, n)| n))
                    .max()
                    .unwrap_or(0);
                let n_high_water = self.derive_high_water(&base, codes);
                u64::max(n_max_stored, n_high_water).saturating_add(1)
            }
        };

        let sku = compose_sku(&base, serial);
        tracing::debug!(%base, serial, %sku, "minted sku");
        sku
    }

    /// Mint a SKU for `codes` and wrap it with `labels` into a record.
    pub fn mint_record(&self, labels: SpecSkuLabels, codes: SpecSkuCodes) -> SkuRecord {
        let sku = self.mint(&codes);
        SkuRecord::new(sku, labels, codes)
    }

    /// Add `record` at the end.
    pub fn append(&mut self, record: SkuRecord) {
        self.track_serial(&record);
        tracing::info!(sku = %record.sku, index = self.records.len(), "appended sku record");
        self.records.push(record);
    }

    /// Replace the record at `index` in place.
    pub fn update(&mut self, index: usize, record: SkuRecord) -> Result<(), RegistryError> {
        self.check_index(index)?;
        self.track_serial(&record);
        tracing::info!(
            index,
            sku_old = %self.records[index].sku,
            sku_new = %record.sku,
            "updated sku record"
        );
        self.records[index] = record;
        Ok(())
    }

    /// Delete the record at `index`, shifting later records one position down.
    pub fn remove(&mut self, index: usize) -> Result<SkuRecord, RegistryError> {
        self.check_index(index)?;
        let record = self.records.remove(index);
        tracing::info!(index, sku = %record.sku, "removed sku record");
        Ok(record)
    }

    /// Mint and append in one step (the form's generate action).
    pub fn submit(&mut self, labels: SpecSkuLabels, codes: SpecSkuCodes) -> &SkuRecord {
        let record = self.mint_record(labels, codes);
        self.append(record);
        let n_idx_last = self.records.len() - 1;
        &self.records[n_idx_last]
    }

    /// Re-mint the record at `index` from new labels and codes, then replace it.
    ///
    /// The record being edited still counts while the new serial is derived,
    /// so saving a record unchanged under [`EnumSerialRule::PrefixCount`]
    /// moves it to the next serial.
    pub fn edit(
        &mut self,
        index: usize,
        labels: SpecSkuLabels,
        codes: SpecSkuCodes,
    ) -> Result<&SkuRecord, RegistryError> {
        self.check_index(index)?;
        let record = self.mint_record(labels, codes);
        self.update(index, record)?;
        Ok(&self.records[index])
    }

    fn check_index(&self, index: usize) -> Result<(), RegistryError> {
        if index < self.records.len() {
            return Ok(());
        }
        tracing::warn!(index, len = self.records.len(), "rejected out-of-range index");
        Err(RegistryError::OutOfRange {
            index,
            len: self.records.len(),
        })
    }

    fn derive_high_water(&self, base: &str, codes: &SpecSkuCodes) -> u64 {
        let get = |key: EnumSerialKey| {
            self.dict_serial_high_water
                .get(&key)
                .copied()
                .unwrap_or(0)
        };
        match self.options.rule_prefix_match {
            EnumPrefixMatchRule::Literal => get(EnumSerialKey::Prefix(base.to_string())),
            EnumPrefixMatchRule::Structural => u64::max(
                get(EnumSerialKey::Codes(codes.clone())),
                get(EnumSerialKey::UncodedPrefix(base.to_string())),
            ),
        }
    }

    fn track_serial(&mut self, record: &SkuRecord) {
        let Some((c_prefix, n_serial)) = split_sku_serial(&record.sku) else {
            return;
        };
        let key_structural = match &record.codes {
            Some(codes) => EnumSerialKey::Codes(codes.clone()),
            None => EnumSerialKey::UncodedPrefix(c_prefix.to_string()),
        };
        for key in [EnumSerialKey::Prefix(c_prefix.to_string()), key_structural] {
            let n_high_water = self.dict_serial_high_water.entry(key).or_insert(0);
            *n_high_water = u64::max(*n_high_water, n_serial);
        }
    }
}

impl<'a> IntoIterator for &'a SkuRegistry {
    type Item = &'a SkuRecord;
    type IntoIter = std::slice::Iter<'a, SkuRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
