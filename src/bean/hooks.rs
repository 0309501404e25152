use crate::bean::Bean;
use crate::core::Result;

/// Extension points a storage coordinator invokes around each operation.
///
/// Every hook defaults to a no-op. A coordinator calls `before_*` before it
/// touches persisted state and `after_*` only once the operation succeeded.
/// Returning an error from a `before_*` hook aborts the operation.
pub trait Lifecycle {
    fn after_dispense(&mut self) -> Result<()> {
        Ok(())
    }

    fn before_load(&mut self) -> Result<()> {
        Ok(())
    }

    fn after_load(&mut self) -> Result<()> {
        Ok(())
    }

    fn before_store(&mut self) -> Result<()> {
        Ok(())
    }

    fn after_store(&mut self) -> Result<()> {
        Ok(())
    }

    fn before_trash(&mut self) -> Result<()> {
        Ok(())
    }

    fn after_trash(&mut self) -> Result<()> {
        Ok(())
    }
}

impl Lifecycle for Bean {}

/// Access to the [`Bean`] wrapped by a typed entity.
pub trait AsBean {
    fn bean(&self) -> &Bean;
    fn bean_mut(&mut self) -> &mut Bean;
}

impl AsBean for Bean {
    fn bean(&self) -> &Bean {
        self
    }

    fn bean_mut(&mut self) -> &mut Bean {
        self
    }
}

/// A statically typed entity bound to one storage kind.
///
/// `construct` is the zero-argument constructor; the kind of the bean it
/// returns is what [`KindRegistry`](crate::kind::KindRegistry) caches for the
/// type.
///
/// ```
/// use rustbean::{AsBean, Bean, BeanType, Lifecycle, Result};
///
/// struct Note(Bean);
///
/// impl AsBean for Note {
///     fn bean(&self) -> &Bean { &self.0 }
///     fn bean_mut(&mut self) -> &mut Bean { &mut self.0 }
/// }
///
/// impl Lifecycle for Note {}
///
/// impl BeanType for Note {
///     fn construct() -> Result<Self> {
///         Ok(Note(Bean::with_kind("note")?))
///     }
/// }
///
/// assert_eq!(Note::construct().unwrap().bean().kind(), Some("note"));
/// ```
pub trait BeanType: AsBean + Lifecycle + Sized + 'static {
    fn construct() -> Result<Self>;
}
