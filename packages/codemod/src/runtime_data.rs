//! Runtime Usage Data
//!
//! Facts captured while the application was running (which properties are
//! computed, observed, overridden, ...). The transform only reads this data;
//! it is loaded once, before any file is processed.

use crate::error::{Result, TransformError};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Usage data recorded for one module.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuntimeData {
    /// Object kind, e.g. `Component` or `Service`.
    #[serde(rename = "type")]
    pub object_type: Option<String>,
    pub computed_properties: Vec<String>,
    /// Property name to the arguments of its `off` listener.
    pub off_properties: IndexMap<String, Value>,
    /// Property name to the arguments of its `unobserves` listener.
    pub unobserved_properties: IndexMap<String, Value>,
    pub overridden_properties: Vec<String>,
    pub overridden_actions: Vec<String>,
}

impl RuntimeData {
    /// The object kind, when one was recorded.
    pub fn object_type(&self) -> Option<&str> {
        self.object_type.as_deref().filter(|t| !t.is_empty())
    }

    pub fn is_computed(&self, name: &str) -> bool {
        self.computed_properties.iter().any(|p| p == name)
    }

    pub fn is_overridden(&self, name: &str) -> bool {
        self.overridden_properties.iter().any(|p| p == name)
    }

    pub fn is_overridden_action(&self, name: &str) -> bool {
        self.overridden_actions.iter().any(|p| p == name)
    }
}

/// Read-only lookup of usage data by absolute file path.
pub trait RuntimeDataProvider {
    fn runtime_data_for(&self, path: &Path) -> Option<&RuntimeData>;
}

/// Usage data keyed by module path, held in memory.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRuntimeData {
    entries: HashMap<PathBuf, RuntimeData>,
}

impl InMemoryRuntimeData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, data: RuntimeData) {
        self.entries.insert(path.into(), data);
    }

    pub fn with(mut self, path: impl Into<PathBuf>, data: RuntimeData) -> Self {
        self.insert(path, data);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RuntimeDataProvider for InMemoryRuntimeData {
    fn runtime_data_for(&self, path: &Path) -> Option<&RuntimeData> {
        self.entries
            .get(path)
            .or_else(|| self.entries.get(&path.with_extension("")))
    }
}

/// Usage data loaded from a JSON telemetry file.
///
/// The file holds one object whose keys are absolute module paths, with or
/// without the `.js`/`.ts` extension.
#[derive(Debug, Default, Clone)]
pub struct JsonRuntimeData {
    inner: InMemoryRuntimeData,
}

impl JsonRuntimeData {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content).map_err(|source| TransformError::RuntimeData {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let entries: IndexMap<String, RuntimeData> = serde_json::from_str(json)?;
        let mut inner = InMemoryRuntimeData::new();
        for (module, data) in entries {
            inner.insert(module, data);
        }
        Ok(Self { inner })
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl RuntimeDataProvider for JsonRuntimeData {
    fn runtime_data_for(&self, path: &Path) -> Option<&RuntimeData> {
        self.inner.runtime_data_for(path)
    }
}
