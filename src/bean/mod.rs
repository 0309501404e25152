// ============================================================================
// Bean
// ============================================================================
//
// One row of an arbitrary kind. Properties live in a PropertyBag keyed by
// snake_case names; typed reads convert on demand and degrade to a default
// when the stored value cannot be read as the requested type.
//
// A Bean is plain mutable data. It performs no locking: one logical caller
// owns and mutates an instance at a time. Share bean *types* freely, move
// bean *instances* between threads rather than aliasing them.
//
// ============================================================================

pub mod hooks;
pub mod lifecycle;
pub mod property_bag;

pub use hooks::{AsBean, BeanType, Lifecycle};
pub use property_bag::PropertyBag;

use crate::core::{BeanError, FromValue, IntoValue, Result, Value, validate_name};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Property name conventionally holding the row's numeric identity.
pub const ID_PROP_NAME: &str = "id";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BeanRecord")]
pub struct Bean {
    kind: Option<String>,
    properties: PropertyBag,
}

#[derive(Deserialize)]
struct BeanRecord {
    kind: Option<String>,
    #[serde(default)]
    properties: PropertyBag,
}

impl TryFrom<BeanRecord> for Bean {
    type Error = BeanError;

    fn try_from(record: BeanRecord) -> Result<Self> {
        if let Some(kind) = &record.kind {
            validate_name(kind)?;
        }
        Ok(Self {
            kind: record.kind,
            properties: record.properties,
        })
    }
}

impl Bean {
    /// Creates a detached bean with no kind.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty bean of `kind`; the kind is fixed from here on.
    pub fn with_kind(kind: impl Into<String>) -> Result<Self> {
        let kind = kind.into();
        validate_name(&kind)?;
        Ok(Self {
            kind: Some(kind),
            properties: PropertyBag::new(),
        })
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn id(&self) -> Option<i64> {
        self.get_nullable(ID_PROP_NAME)
    }

    /// Assigns or clears the identity; normally called by the storage layer.
    pub fn set_id(&mut self, id: Option<i64>) -> &mut Self {
        self.properties
            .set_trusted(ID_PROP_NAME, id.map(Value::Integer));
        self
    }

    // ------------------------------------------------------------------------
    // Raw access
    // ------------------------------------------------------------------------

    /// The stored value for `name`, with no conversion.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Stores `value` as-is, or removes `name` when `value` is `None`.
    pub fn set_value(&mut self, name: &str, value: impl Into<Option<Value>>) -> Result<()> {
        self.properties.set(name, value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.properties.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains(name)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.properties.names()
    }

    // ------------------------------------------------------------------------
    // Typed access
    // ------------------------------------------------------------------------

    /// Reads `name` as `T`, falling back to `T::default()`.
    ///
    /// Never fails: a missing property and a value that cannot be converted
    /// both yield the default.
    ///
    /// ```
    /// let mut bean = rustbean::Bean::new();
    /// bean.put("count", "42").unwrap();
    /// assert_eq!(bean.get::<i64>("count"), 42);
    /// assert_eq!(bean.get::<bool>("count"), false);
    /// assert_eq!(bean.get::<String>("missing"), "");
    /// ```
    pub fn get<T: FromValue + Default>(&self, name: &str) -> T {
        self.get_core(name).unwrap_or_default()
    }

    /// Reads `name` as `T`, or `None` when absent or not convertible.
    pub fn get_nullable<T: FromValue>(&self, name: &str) -> Option<T> {
        self.get_core(name)
    }

    fn get_core<T: FromValue>(&self, name: &str) -> Option<T> {
        let value = self.properties.get(name)?;
        match T::from_value(value) {
            Ok(converted) => Some(converted),
            Err(err) => {
                debug!(
                    "Bean read of '{}' on {} degraded to default: {}",
                    name,
                    self.kind().unwrap_or("detached bean"),
                    err
                );
                None
            }
        }
    }

    /// Stores `value` under `name` without widening or narrowing its member.
    ///
    /// `None` (for `Option` inputs) removes the property.
    pub fn put<V: IntoValue>(&mut self, name: &str, value: V) -> Result<&mut Self> {
        self.properties.set(name, value.into_value())?;
        Ok(self)
    }

    // ------------------------------------------------------------------------
    // Import / Export
    // ------------------------------------------------------------------------

    /// Independent copy of all properties, ordered by name.
    pub fn export(&self) -> Vec<(String, Value)> {
        self.properties.export()
    }

    /// Bulk-populates the bean; see [`PropertyBag::import`].
    pub fn import<I, K, V>(&mut self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoValue,
    {
        self.properties.import(pairs)
    }
}

impl fmt::Display for Bean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            None => f.write_str(std::any::type_name::<Self>()),
            Some(kind) => match self
                .value(ID_PROP_NAME)
                .and_then(|v| i64::from_value(v).ok())
            {
                Some(id) => write!(f, "{} #{}", kind, id),
                None => f.write_str(kind),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_kind_validates() {
        assert!(Bean::with_kind("note").is_ok());
        assert!(matches!(Bean::with_kind(""), Err(BeanError::EmptyName)));
        assert!(matches!(Bean::with_kind("Note"), Err(BeanError::InvalidName(_))));
    }

    #[test]
    fn test_display() {
        let mut bean = Bean::with_kind("note").unwrap();
        assert_eq!(bean.to_string(), "note");

        bean.set_id(Some(12));
        assert_eq!(bean.to_string(), "note #12");

        let detached = Bean::new();
        assert_eq!(detached.to_string(), "rustbean::bean::Bean");
    }

    #[test]
    fn test_id_is_a_property() {
        let mut bean = Bean::new();
        assert_eq!(bean.id(), None);

        bean.put("id", "15").unwrap();
        assert_eq!(bean.id(), Some(15));

        bean.set_id(None);
        assert!(!bean.contains("id"));
    }

    #[test]
    fn test_put_chains() {
        let mut bean = Bean::new();
        bean.put("a", 1i64).unwrap().put("b", true).unwrap();
        assert_eq!(bean.len(), 2);
        assert_eq!(bean.names().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_put_none_removes() {
        let mut bean = Bean::new();
        bean.put("score", Some(1.5)).unwrap();
        assert_eq!(bean.value("score"), Some(&Value::Float(1.5)));

        bean.put("score", None::<f64>).unwrap();
        assert_eq!(bean.value("score"), None);
    }

    #[test]
    fn test_serde_revalidates_names() {
        let mut bean = Bean::with_kind("note").unwrap();
        bean.put("title", "hi").unwrap();

        let json = serde_json::to_string(&bean).unwrap();
        let back: Bean = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bean);

        let bad = r#"{"kind":"note","properties":{"Title":{"Text":"hi"}}}"#;
        assert!(serde_json::from_str::<Bean>(bad).is_err());

        let bad_kind = r#"{"kind":"Note","properties":{}}"#;
        assert!(serde_json::from_str::<Bean>(bad_kind).is_err());
    }
}
