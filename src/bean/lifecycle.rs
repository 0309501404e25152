//! Hook ordering for storage coordinators.
//!
//! Each helper runs the `before_*` hook, then the caller's storage callback,
//! then the `after_*` hook only if the callback succeeded. None of them touch
//! storage themselves.

use crate::bean::{AsBean, Bean, BeanType, Lifecycle};
use crate::core::{Result, Value};
use log::{trace, warn};

fn run_hook<T, F>(entity: &mut T, hook: &'static str, f: F) -> Result<()>
where
    T: AsBean,
    F: FnOnce(&mut T) -> Result<()>,
{
    trace!("Running {} on {}", hook, entity.bean());
    f(&mut *entity).inspect_err(|err| {
        warn!("{} on {} failed: {}", hook, entity.bean(), err);
    })
}

/// Creates a fresh, empty entity of type `T` and fires `after_dispense`.
pub fn dispense<T: BeanType>() -> Result<T> {
    let mut entity = T::construct()?;
    run_hook(&mut entity, "after_dispense", T::after_dispense)?;
    Ok(entity)
}

/// Creates a fresh, empty plain bean of `kind` and fires `after_dispense`.
pub fn dispense_kind(kind: &str) -> Result<Bean> {
    let mut bean = Bean::with_kind(kind)?;
    run_hook(&mut bean, "after_dispense", Bean::after_dispense)?;
    Ok(bean)
}

/// Populates `entity` from the row returned by `fetch`.
///
/// Returns `false` without firing `after_load` when no row exists.
pub fn load_into<T, F>(entity: &mut T, fetch: F) -> Result<bool>
where
    T: AsBean + Lifecycle,
    F: FnOnce() -> Result<Option<Vec<(String, Value)>>>,
{
    run_hook(entity, "before_load", T::before_load)?;
    let Some(row) = fetch()? else {
        return Ok(false);
    };
    entity.bean_mut().import(row)?;
    run_hook(entity, "after_load", T::after_load)?;
    Ok(true)
}

/// Loads a `T` from the row returned by `fetch`, or `None` when missing.
pub fn load<T, F>(fetch: F) -> Result<Option<T>>
where
    T: BeanType,
    F: FnOnce() -> Result<Option<Vec<(String, Value)>>>,
{
    let mut entity = T::construct()?;
    if load_into(&mut entity, fetch)? {
        Ok(Some(entity))
    } else {
        Ok(None)
    }
}

/// Persists `entity` through `persist`, which returns the row's id.
///
/// The id is written back to the bean before `after_store` fires.
pub fn store<T, F>(entity: &mut T, persist: F) -> Result<i64>
where
    T: AsBean + Lifecycle,
    F: FnOnce(&Bean) -> Result<i64>,
{
    run_hook(entity, "before_store", T::before_store)?;
    let id = persist(entity.bean())?;
    entity.bean_mut().set_id(Some(id));
    run_hook(entity, "after_store", T::after_store)?;
    Ok(id)
}

/// Deletes `entity` through `delete`.
///
/// A bean without an id was never persisted: nothing runs and `Ok(false)` is
/// returned.
pub fn trash<T, F>(entity: &mut T, delete: F) -> Result<bool>
where
    T: AsBean + Lifecycle,
    F: FnOnce(&Bean) -> Result<()>,
{
    if entity.bean().id().is_none() {
        return Ok(false);
    }
    run_hook(entity, "before_trash", T::before_trash)?;
    delete(entity.bean())?;
    run_hook(entity, "after_trash", T::after_trash)?;
    Ok(true)
}
