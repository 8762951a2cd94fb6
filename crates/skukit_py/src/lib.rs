use std::collections::BTreeMap;
use std::path::PathBuf;

use pyo3::exceptions::{PyIndexError, PyKeyError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyBytes;
use skukit_io_xlsx::{
    C_FILE_NAME_DEFAULT, C_XLSX_MIME_TYPE, XlsxExportError, export_records_to_xlsx,
    export_records_to_xlsx_bytes,
};
use skukit_registry::{
    CodeBook, CodeLookup, EnumCodeDomain, EnumPrefixMatchRule, EnumSerialRule, LookupError,
    RegistryError, SkuRecord, SkuRegistry, SpecRegistryOptions, SpecSkuCodes, SpecSkuLabels,
};

use crate::util::{
    EnumPyErrorKind, derive_export_error_kind, derive_lookup_error_kind,
    derive_registry_error_kind,
};

mod util;

const N_BRIDGE_ABI_VERSION: u64 = 1;
const C_BRIDGE_CONTRACT_VERSION: &str = "skukit.registry.v1";
const C_BRIDGE_TRANSPORT: &str = "rust_native";

#[pyclass(name = "SkuRecord")]
#[derive(Debug, Clone)]
struct PySkuRecord {
    inner: SkuRecord,
}

impl From<SkuRecord> for PySkuRecord {
    fn from(record: SkuRecord) -> Self {
        Self { inner: record }
    }
}

#[pymethods]
impl PySkuRecord {
    #[new]
    fn new(sku: String, category: String, color: String, size: String, material: String) -> Self {
        Self {
            inner: SkuRecord::from_row(sku, category, color, size, material),
        }
    }

    #[getter]
    fn sku(&self) -> &str {
        &self.inner.sku
    }

    #[getter]
    fn category(&self) -> &str {
        &self.inner.category
    }

    #[getter]
    fn color(&self) -> &str {
        &self.inner.color
    }

    #[getter]
    fn size(&self) -> &str {
        &self.inner.size
    }

    #[getter]
    fn material(&self) -> &str {
        &self.inner.material
    }

    fn to_dict(&self) -> BTreeMap<String, String> {
        let mut dict_record = BTreeMap::new();
        dict_record.insert("sku".to_string(), self.inner.sku.clone());
        dict_record.insert("category".to_string(), self.inner.category.clone());
        dict_record.insert("color".to_string(), self.inner.color.clone());
        dict_record.insert("size".to_string(), self.inner.size.clone());
        dict_record.insert("material".to_string(), self.inner.material.clone());
        dict_record
    }

    fn __eq__(&self, other: &Self) -> bool {
        self.inner == other.inner
    }

    fn __repr__(&self) -> String {
        format!(
            "SkuRecord(sku={:?}, category={:?}, color={:?}, size={:?}, material={:?})",
            self.inner.sku,
            self.inner.category,
            self.inner.color,
            self.inner.size,
            self.inner.material
        )
    }
}

#[pyclass(name = "CodeBook")]
#[derive(Debug, Clone)]
struct PyCodeBook {
    inner: CodeBook,
}

#[pymethods]
impl PyCodeBook {
    /// Compiled-in tables.
    #[new]
    fn new() -> Self {
        Self {
            inner: CodeBook::builtin(),
        }
    }

    /// Rows of `[domain, label, code]`, optional header row first.
    #[staticmethod]
    fn from_rows(rows: Vec<Vec<String>>) -> PyResult<Self> {
        let inner = CodeBook::from_string_rows(&rows).map_err(map_lookup_error)?;
        Ok(Self { inner })
    }

    #[staticmethod]
    fn from_toml(text: &str) -> PyResult<Self> {
        let inner = CodeBook::from_toml_str(text).map_err(map_lookup_error)?;
        Ok(Self { inner })
    }

    fn labels(&self, domain: &str) -> PyResult<Vec<String>> {
        let domain = parse_domain(domain)?;
        Ok(self
            .inner
            .labels(domain)
            .into_iter()
            .map(ToString::to_string)
            .collect())
    }

    fn lookup_code(&self, domain: &str, label: &str) -> PyResult<Option<String>> {
        let domain = parse_domain(domain)?;
        Ok(self.inner.lookup_code(domain, label).map(ToString::to_string))
    }

    fn resolve_codes(
        &self,
        category: &str,
        color: &str,
        size: &str,
        material: &str,
    ) -> PyResult<(String, String, String, String)> {
        let codes = self
            .inner
            .resolve_codes(&SpecSkuLabels::new(category, color, size, material))
            .map_err(map_lookup_error)?;
        Ok((codes.category, codes.color, codes.size, codes.material))
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }
}

#[pyclass(name = "SkuRegistry")]
#[derive(Debug)]
struct PySkuRegistry {
    inner: SkuRegistry,
}

#[pymethods]
impl PySkuRegistry {
    #[new]
    #[pyo3(signature = (rule_prefix_match = "literal", rule_serial = "prefix_count"))]
    fn new(rule_prefix_match: &str, rule_serial: &str) -> PyResult<Self> {
        let options = SpecRegistryOptions {
            rule_prefix_match: parse_rule_prefix_match(rule_prefix_match)?,
            rule_serial: parse_rule_serial(rule_serial)?,
        };
        Ok(Self {
            inner: SkuRegistry::with_options(options),
        })
    }

    /// Registry configured from a TOML document (`rule_prefix_match`, `rule_serial`).
    #[staticmethod]
    fn from_options_toml(text: &str) -> PyResult<Self> {
        let options = SpecRegistryOptions::from_toml_str(text).map_err(map_registry_error)?;
        Ok(Self {
            inner: SkuRegistry::with_options(options),
        })
    }

    fn mint(&self, category_code: &str, color_code: &str, size_code: &str, material_code: &str) -> String {
        self.inner.mint(&SpecSkuCodes::new(
            category_code,
            color_code,
            size_code,
            material_code,
        ))
    }

    fn append(&mut self, record: PySkuRecord) {
        self.inner.append(record.inner);
    }

    fn update(&mut self, index: i64, record: PySkuRecord) -> PyResult<()> {
        let n_idx = cast_index(index, self.inner.len())?;
        self.inner
            .update(n_idx, record.inner)
            .map_err(map_registry_error)
    }

    fn remove(&mut self, index: i64) -> PyResult<PySkuRecord> {
        let n_idx = cast_index(index, self.inner.len())?;
        self.inner
            .remove(n_idx)
            .map(PySkuRecord::from)
            .map_err(map_registry_error)
    }

    /// Resolve labels through `code_book` (built-in tables when omitted), mint and append.
    #[pyo3(signature = (category, color, size, material, code_book = None))]
    fn submit(
        &mut self,
        category: &str,
        color: &str,
        size: &str,
        material: &str,
        code_book: Option<PyRef<'_, PyCodeBook>>,
    ) -> PyResult<PySkuRecord> {
        let labels = SpecSkuLabels::new(category, color, size, material);
        let codes = resolve_codes_with(code_book.as_deref(), &labels)?;
        Ok(PySkuRecord::from(self.inner.submit(labels, codes).clone()))
    }

    /// Re-mint the record at `index` from new labels and replace it.
    #[pyo3(signature = (index, category, color, size, material, code_book = None))]
    fn edit(
        &mut self,
        index: i64,
        category: &str,
        color: &str,
        size: &str,
        material: &str,
        code_book: Option<PyRef<'_, PyCodeBook>>,
    ) -> PyResult<PySkuRecord> {
        let n_idx = cast_index(index, self.inner.len())?;
        let labels = SpecSkuLabels::new(category, color, size, material);
        let codes = resolve_codes_with(code_book.as_deref(), &labels)?;
        self.inner
            .edit(n_idx, labels, codes)
            .map(|record| PySkuRecord::from(record.clone()))
            .map_err(map_registry_error)
    }

    fn records(&self) -> Vec<PySkuRecord> {
        self.inner
            .iter()
            .cloned()
            .map(PySkuRecord::from)
            .collect()
    }

    fn clear(&mut self) {
        self.inner.clear();
    }

    #[pyo3(signature = (file_out = None))]
    fn export_xlsx(&self, py: Python<'_>, file_out: Option<PathBuf>) -> PyResult<String> {
        let path_file_out = file_out.unwrap_or_else(|| PathBuf::from(C_FILE_NAME_DEFAULT));
        let records = self.inner.records();
        py.allow_threads(|| export_records_to_xlsx(&path_file_out, records))
            .map_err(map_export_error)?;
        Ok(path_file_out.to_string_lossy().to_string())
    }

    fn export_xlsx_bytes<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyBytes>> {
        let records = self.inner.records();
        let v_bytes = py
            .allow_threads(|| export_records_to_xlsx_bytes(records))
            .map_err(map_export_error)?;
        Ok(PyBytes::new(py, &v_bytes))
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }
}

fn resolve_codes_with(
    code_book: Option<&PyCodeBook>,
    labels: &SpecSkuLabels,
) -> PyResult<SpecSkuCodes> {
    match code_book {
        Some(book) => book.inner.resolve_codes(labels),
        None => CodeBook::builtin().resolve_codes(labels),
    }
    .map_err(map_lookup_error)
}

fn cast_index(index: i64, len: usize) -> PyResult<usize> {
    util::cast_index(index, len).map_err(PyIndexError::new_err)
}

fn parse_domain(value: &str) -> PyResult<EnumCodeDomain> {
    value.parse::<EnumCodeDomain>().map_err(map_lookup_error)
}

fn parse_rule_prefix_match(value: &str) -> PyResult<EnumPrefixMatchRule> {
    util::parse_rule_prefix_match(value).map_err(PyValueError::new_err)
}

fn parse_rule_serial(value: &str) -> PyResult<EnumSerialRule> {
    util::parse_rule_serial(value).map_err(PyValueError::new_err)
}

fn new_py_err(kind: EnumPyErrorKind, message: String) -> PyErr {
    match kind {
        EnumPyErrorKind::Index => PyIndexError::new_err(message),
        EnumPyErrorKind::Key => PyKeyError::new_err(message),
        EnumPyErrorKind::Value => PyValueError::new_err(message),
        EnumPyErrorKind::Runtime => PyRuntimeError::new_err(message),
    }
}

fn map_registry_error(exception: RegistryError) -> PyErr {
    new_py_err(derive_registry_error_kind(&exception), exception.to_string())
}

fn map_lookup_error(exception: LookupError) -> PyErr {
    new_py_err(derive_lookup_error_kind(&exception), exception.to_string())
}

fn map_export_error(exception: XlsxExportError) -> PyErr {
    new_py_err(derive_export_error_kind(&exception), exception.to_string())
}

#[pyfunction(name = "init_logging")]
#[pyo3(signature = (default_directive = None))]
fn init_logging_py(default_directive: Option<&str>) -> bool {
    skukit_log::init_logging(default_directive)
}

#[pymodule]
fn _skukit_rs(module: &Bound<'_, PyModule>) -> PyResult<()> {
    module.add_class::<PySkuRecord>()?;
    module.add_class::<PyCodeBook>()?;
    module.add_class::<PySkuRegistry>()?;
    module.add_function(wrap_pyfunction!(init_logging_py, module)?)?;
    module.add("XLSX_FILE_NAME", C_FILE_NAME_DEFAULT)?;
    module.add("XLSX_MIME_TYPE", C_XLSX_MIME_TYPE)?;
    module.add("__bridge_abi__", N_BRIDGE_ABI_VERSION)?;
    module.add("__bridge_contract__", C_BRIDGE_CONTRACT_VERSION)?;
    module.add("__bridge_transport__", C_BRIDGE_TRANSPORT)?;
    Ok(())
}
