//! Request parameters and scope

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::model::Value;

/// Parameters passed to a loader function.
///
/// Compared deeply: two `Params` built separately with the same entries are
/// equal, and setting equal params on a [`DataLoader`](super::DataLoader) does
/// not trigger a reload.
///
/// # Example
///
/// ```
/// use crudlist_lib::loader::Params;
///
/// let a = Params::new().with("clusterId", "c1").with("namespace", "default");
/// let b = Params::new().with("namespace", "default").with("clusterId", "c1");
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, Value>);

impl Params {
    /// Creates empty params.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter (builder pattern).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Inserts a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Returns a parameter value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Iterates over the parameters in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Returns `true` if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Canonical string form, stable across insertion order.
    pub fn cache_key(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_default()
    }
}

/// The tenant/region a list is scoped to.
///
/// Switching tenant or region reloads every list, even when its params are
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    /// Current tenant.
    pub tenant: Option<String>,
    /// Current region.
    pub region: Option<String>,
}

impl Scope {
    /// Creates an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tenant.
    pub fn with_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = Some(tenant.into());
        self
    }

    /// Sets the region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Key fragment for caching.
    pub fn cache_key(&self) -> String {
        format!(
            "{}/{}",
            self.tenant.as_deref().unwrap_or_default(),
            self.region.as_deref().unwrap_or_default()
        )
    }
}
