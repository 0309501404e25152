use crate::core::{BeanError, IntoValue, Result, Value, validate_name};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping from validated property name to [`Value`].
///
/// An absent key is the only representation of null: no name ever maps to an
/// explicit "no value".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, Value>",
    into = "BTreeMap<String, Value>"
)]
pub struct PropertyBag {
    props: BTreeMap<String, Value>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.props.get(name)
    }

    /// Stores `value` under `name`, or removes `name` when `value` is `None`.
    ///
    /// The name is validated only when something is stored; removal of an
    /// unknown or malformed name is a no-op.
    pub fn set(&mut self, name: &str, value: Option<Value>) -> Result<()> {
        match value {
            None => {
                self.props.remove(name);
            }
            Some(value) => {
                validate_name(name)?;
                self.props.insert(name.to_string(), value);
            }
        }
        Ok(())
    }

    /// Stores a value under a name the caller guarantees is valid.
    pub(crate) fn set_trusted(&mut self, name: &'static str, value: Option<Value>) {
        debug_assert!(validate_name(name).is_ok(), "trusted name must be valid");
        match value {
            None => self.props.remove(name),
            Some(value) => self.props.insert(name.to_string(), value),
        };
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.props.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.props.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.props.keys().map(String::as_str)
    }

    /// Independent copy of every pair, ordered by name.
    pub fn export(&self) -> Vec<(String, Value)> {
        self.props
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Applies each pair as [`set`](Self::set) would, later duplicates winning.
    ///
    /// All names are validated before anything is applied, so a rejected
    /// import leaves the bag untouched.
    pub fn import<I, K, V>(&mut self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoValue,
    {
        let staged: Vec<(String, Option<Value>)> = pairs
            .into_iter()
            .map(|(name, value)| (name.into(), value.into_value()))
            .collect();

        for (name, value) in &staged {
            if value.is_some() {
                validate_name(name)?;
            }
        }

        for (name, value) in staged {
            match value {
                None => {
                    self.props.remove(&name);
                }
                Some(value) => {
                    self.props.insert(name, value);
                }
            }
        }
        Ok(())
    }
}

impl TryFrom<BTreeMap<String, Value>> for PropertyBag {
    type Error = BeanError;

    fn try_from(props: BTreeMap<String, Value>) -> Result<Self> {
        for name in props.keys() {
            validate_name(name)?;
        }
        Ok(Self { props })
    }
}

impl From<PropertyBag> for BTreeMap<String, Value> {
    fn from(bag: PropertyBag) -> Self {
        bag.props
    }
}
