use crate::bean::BeanType;
use crate::core::{BeanError, Result};
use lazy_static::lazy_static;
use log::debug;
use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

lazy_static! {
    static ref GLOBAL_KIND_REGISTRY: Arc<KindRegistry> = Arc::new(KindRegistry::new());
}

/// Cache from a typed entity to the kind its constructor assigns.
///
/// Each type is resolved at most once per registry. Concurrent first lookups
/// may both construct a throwaway instance, but only the first stored kind is
/// kept and every caller observes that same value.
#[derive(Debug, Default)]
pub struct KindRegistry {
    kinds: RwLock<HashMap<TypeId, Arc<str>>>,
}

impl KindRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the process-wide registry
    ///
    /// Starts empty. Prefer passing an explicit registry where one is at hand;
    /// this exists for callers that have no natural place to keep one.
    pub fn global() -> &'static Arc<KindRegistry> {
        &GLOBAL_KIND_REGISTRY
    }

    /// Returns the kind of `T`, constructing one throwaway instance on first use.
    pub fn resolve<T: BeanType>(&self) -> Result<Arc<str>> {
        let key = TypeId::of::<T>();
        if let Some(kind) = self.kinds.read()?.get(&key) {
            return Ok(Arc::clone(kind));
        }

        let probe = T::construct()?;
        let computed: Arc<str> = probe
            .bean()
            .kind()
            .ok_or(BeanError::KindUnset(type_name::<T>()))?
            .into();
        debug!("Resolved kind '{}' for {}", computed, type_name::<T>());

        let mut kinds = self.kinds.write()?;
        let stored = kinds.entry(key).or_insert(computed);
        Ok(Arc::clone(stored))
    }

    pub fn contains<T: BeanType>(&self) -> Result<bool> {
        Ok(self.kinds.read()?.contains_key(&TypeId::of::<T>()))
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.kinds.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.kinds.read()?.is_empty())
    }
}
