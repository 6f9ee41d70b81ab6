//! Type-erased values and the positional argument list handed to factories.

use crate::error::{Error, Result};
use std::any::{self, Any};
use std::fmt;
use std::rc::Rc;

/// A resolved value. Singletons hand out clones of the same `Rc`, so callers
/// share one instance rather than receiving copies.
pub type Instance = Rc<dyn Any>;

/// Wraps an owned value into an [`Instance`].
pub fn instance<T: Any>(value: T) -> Instance {
  Rc::new(value)
}

/// Downcasts an [`Instance`] to a concrete type.
///
/// `name` is only used for the error message.
pub fn downcast<T: Any>(name: &str, value: Instance) -> Result<Rc<T>> {
  value.downcast::<T>().map_err(|_| Error::TypeMismatch {
    name: name.to_owned(),
    expected: any::type_name::<T>(),
  })
}

/// The resolved dependencies of a factory, in declaration order.
#[derive(Clone, Default)]
pub struct Args {
  names: Vec<String>,
  values: Vec<Instance>,
}

impl Args {
  pub(crate) fn new(names: Vec<String>, values: Vec<Instance>) -> Self {
    debug_assert_eq!(names.len(), values.len());
    Self { names, values }
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  /// The dependency names the arguments were resolved from.
  pub fn names(&self) -> &[String] {
    &self.names
  }

  /// Returns the untyped argument at `index`.
  pub fn raw(&self, index: usize) -> Result<Instance> {
    self
      .values
      .get(index)
      .cloned()
      .ok_or(Error::MissingArgument {
        index,
        len: self.values.len(),
      })
  }

  /// Returns the argument at `index`, downcast to `T`.
  pub fn get<T: Any>(&self, index: usize) -> Result<Rc<T>> {
    let value = self.raw(index)?;
    downcast(&self.names[index], value)
  }

  pub fn iter(&self) -> impl Iterator<Item = &Instance> {
    self.values.iter()
  }
}

impl fmt::Debug for Args {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Args").field("names", &self.names).finish_non_exhaustive()
  }
}
