use proptest::prelude::*;
use skukit_registry::{
    CodeBook, CodeLookup, EnumPrefixMatchRule, EnumSerialRule, RegistryError, SkuRecord,
    SkuRegistry, SpecRegistryOptions, SpecSkuCodes, SpecSkuLabels, derive_sku_base,
    split_sku_serial,
};

fn arb_code() -> impl Strategy<Value = String> {
    "[A-Z0-9]{1,3}"
}

fn arb_codes() -> impl Strategy<Value = SpecSkuCodes> {
    (arb_code(), arb_code(), arb_code(), arb_code())
        .prop_map(|(c1, c2, c3, c4)| SpecSkuCodes::new(c1, c2, c3, c4))
}

fn arb_record() -> impl Strategy<Value = SkuRecord> {
    arb_codes().prop_map(|codes| {
        let sku = format!(
            "{}-{}-{}-{}-001",
            codes.category, codes.color, codes.size, codes.material
        );
        SkuRecord::new(sku, SpecSkuLabels::default(), codes)
    })
}

#[test]
fn test_form_session_scenario() {
    let book = CodeBook::builtin();
    let labels = SpecSkuLabels::new("Bracelet", "Black", "Small", "Stone");
    let codes = book.resolve_codes(&labels).unwrap();
    let mut registry = SkuRegistry::new();

    assert_eq!(registry.mint(&codes), "BR-BLK-S-ST-001");
    registry.submit(labels.clone(), codes.clone());
    assert_eq!(registry.mint(&codes), "BR-BLK-S-ST-002");
    registry.submit(labels.clone(), codes.clone());

    registry.remove(0).unwrap();
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get(0).unwrap().sku, "BR-BLK-S-ST-002");

    // Serial repeats after a delete under the default rule.
    assert_eq!(registry.mint(&codes), "BR-BLK-S-ST-002");
}

#[test]
fn test_serial_widens_past_999() {
    let codes = SpecSkuCodes::new("BR", "BLK", "S", "ST");
    let mut registry = SkuRegistry::new();
    for _ in 0..999 {
        registry.submit(SpecSkuLabels::default(), codes.clone());
    }
    assert_eq!(registry.get(998).unwrap().sku, "BR-BLK-S-ST-999");
    assert_eq!(registry.mint(&codes), "BR-BLK-S-ST-1000");
}

proptest! {
    #[test]
    fn prop_empty_registry_mints_serial_one(codes in arb_codes()) {
        let registry = SkuRegistry::new();
        let expected = format!(
            "{}-{}-{}-{}-001",
            codes.category, codes.color, codes.size, codes.material
        );
        prop_assert_eq!(registry.mint(&codes), expected);
    }

    #[test]
    fn prop_repeated_mints_are_contiguous(codes in arb_codes(), k in 1usize..40) {
        for rule_prefix_match in [EnumPrefixMatchRule::Literal, EnumPrefixMatchRule::Structural] {
            for rule_serial in [EnumSerialRule::PrefixCount, EnumSerialRule::Monotonic] {
                let mut registry = SkuRegistry::with_options(SpecRegistryOptions {
                    rule_prefix_match,
                    rule_serial,
                });
                let base = derive_sku_base(&codes);
                for n_idx in 1..=k {
                    let record = registry.submit(SpecSkuLabels::default(), codes.clone());
                    prop_assert_eq!(
                        split_sku_serial(&record.sku),
                        Some((base.as_str(), n_idx as u64))
                    );
                    let c_suffix = format!("-{n_idx:03}");
                    prop_assert!(record.sku.ends_with(&c_suffix));
                }
            }
        }
    }

    #[test]
    fn prop_other_prefixes_do_not_affect_new_prefix(
        others in proptest::collection::vec(arb_codes(), 0..20),
        codes in arb_codes(),
    ) {
        let mut registry = SkuRegistry::with_options(SpecRegistryOptions {
            rule_prefix_match: EnumPrefixMatchRule::Structural,
            ..Default::default()
        });
        for other in others.into_iter().filter(|other| *other != codes) {
            registry.submit(SpecSkuLabels::default(), other);
        }
        prop_assert!(registry.mint(&codes).ends_with("-001"));
    }

    #[test]
    fn prop_update_touches_only_target(
        records in proptest::collection::vec(arb_record(), 1..20),
        replacement in arb_record(),
        seed in any::<usize>(),
    ) {
        let mut registry = SkuRegistry::from_records(records.clone(), Default::default());
        let index = seed % records.len();
        registry.update(index, replacement.clone()).unwrap();

        for (n_idx, record) in registry.iter().enumerate() {
            if n_idx == index {
                prop_assert_eq!(record, &replacement);
            } else {
                prop_assert_eq!(record, &records[n_idx]);
            }
        }
    }

    #[test]
    fn prop_remove_shifts_tail(
        records in proptest::collection::vec(arb_record(), 1..20),
        seed in any::<usize>(),
    ) {
        let mut registry = SkuRegistry::from_records(records.clone(), Default::default());
        let index = seed % records.len();
        let removed = registry.remove(index).unwrap();

        prop_assert_eq!(&removed, &records[index]);
        prop_assert_eq!(registry.len(), records.len() - 1);
        prop_assert_eq!(&registry.records()[..index], &records[..index]);
        prop_assert_eq!(&registry.records()[index..], &records[index + 1..]);
    }

    #[test]
    fn prop_out_of_range_is_rejected(
        records in proptest::collection::vec(arb_record(), 0..10),
        overshoot in 0usize..5,
    ) {
        let mut registry = SkuRegistry::from_records(records.clone(), Default::default());
        let index = records.len() + overshoot;
        let expected = RegistryError::OutOfRange { index, len: records.len() };

        prop_assert_eq!(registry.remove(index), Err(expected.clone()));
        prop_assert_eq!(
            registry.update(index, SkuRecord::from_row("A-B-C-D-001", "", "", "", "")),
            Err(expected)
        );
        prop_assert_eq!(registry.records(), records.as_slice());
    }
}
