//! `skukit_registry` v1:
//! SKU minting and session registry kernel.
//!
//! Layout:
//! - `conf`     : constants and default code tables
//! - `spec`     : records/options/errors
//! - `util`     : pure SKU string helpers
//! - `lookup`   : label -> code tables
//! - `registry` : ordered record registry and serial minting
pub mod conf;
pub mod lookup;
pub mod registry;
pub mod spec;
pub mod util;

pub use conf::{C_SKU_SEPARATOR, N_WIDTH_SERIAL, TUP_SKU_RECORD_COLUMNS};
pub use lookup::{CodeBook, CodeLookup, SpecCodeRow};
pub use registry::SkuRegistry;
pub use spec::{
    EnumCodeDomain, EnumPrefixMatchRule, EnumSerialRule, LookupError, RegistryError, SkuRecord,
    SpecRegistryOptions, SpecSkuCodes, SpecSkuLabels,
};
pub use util::{compose_sku, derive_sku_base, format_serial, split_sku_serial};
