//! Factories: a callable, optionally annotated with the names of the
//! dependencies it expects as positional arguments.

use crate::error::{Error, Result};
use crate::value::{instance, Args, Instance};
use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// A type-erased factory function.
///
/// It receives the resolved dependencies and returns the produced value, or
/// `None` when it produced nothing.
#[derive(Clone)]
pub struct Callable(Rc<dyn Fn(&Args) -> Result<Option<Instance>>>);

impl Callable {
  pub fn new<F>(f: F) -> Self
  where
    F: Fn(&Args) -> Result<Option<Instance>> + 'static,
  {
    Self(Rc::new(f))
  }

  pub fn call(&self, args: &Args) -> Result<Option<Instance>> {
    (self.0)(args)
  }
}

impl fmt::Debug for Callable {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Callable({:p})", Rc::as_ptr(&self.0) as *const ())
  }
}

/// Something that can produce an instance.
#[derive(Clone, Debug)]
pub enum Factory {
  /// A callable taking no declared dependencies.
  Plain(Callable),
  /// A callable preceded by the names of its dependencies, resolved in order.
  Annotated(Vec<String>, Callable),
}

impl Factory {
  /// A factory that always produces an owned `T`.
  pub fn new<T, F>(f: F) -> Self
  where
    T: Any,
    F: Fn(&Args) -> Result<T> + 'static,
  {
    Factory::Plain(Callable::new(move |args| f(args).map(|v| Some(instance(v)))))
  }

  /// A factory that may produce nothing. A `None` result makes the owning
  /// binding fail with [`Error::NoValue`].
  pub fn optional<T, F>(f: F) -> Self
  where
    T: Any,
    F: Fn(&Args) -> Result<Option<T>> + 'static,
  {
    Factory::Plain(Callable::new(move |args| f(args).map(|v| v.map(instance))))
  }

  /// A factory returning already type-erased instances, e.g. to hand out an
  /// `Rc` shared with something else.
  pub fn shared<F>(f: F) -> Self
  where
    F: Fn(&Args) -> Result<Option<Instance>> + 'static,
  {
    Factory::Plain(Callable::new(f))
  }

  /// Declares the dependencies this factory expects, replacing any declared
  /// before.
  pub fn depends_on<I, S>(self, names: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Factory::Annotated(names.into_iter().map(Into::into).collect(), self.into_callable())
  }

  /// Builds a factory from the loose "names followed by a callable" shape.
  pub fn from_parts(parts: Vec<Part>) -> Result<Self> {
    if !matches!(parts.last(), Some(Part::Callable(_))) {
      return Err(Error::NotCallable);
    }
    if !is_callable_factory(&parts) {
      return Err(Error::NotAFactory(describe(&parts)));
    }

    let mut names = Vec::with_capacity(parts.len() - 1);
    let mut callable = None;
    for part in parts {
      match part {
        Part::Name(name) => names.push(name),
        Part::Callable(c) => callable = Some(c),
      }
    }
    let callable = callable.ok_or(Error::NotCallable)?;

    Ok(if names.is_empty() {
      Factory::Plain(callable)
    } else {
      Factory::Annotated(names, callable)
    })
  }

  /// Every declared dependency must carry a name.
  pub fn is_valid(&self) -> bool {
    match self {
      Factory::Plain(_) => true,
      Factory::Annotated(names, _) => names.iter().all(|n| !n.is_empty()),
    }
  }

  pub fn dependencies(&self) -> &[String] {
    match self {
      Factory::Plain(_) => &[],
      Factory::Annotated(names, _) => names,
    }
  }

  pub fn callable(&self) -> &Callable {
    match self {
      Factory::Plain(c) | Factory::Annotated(_, c) => c,
    }
  }

  /// Rewrites a plain factory into the annotated form with no dependencies,
  /// so stored factories always have one shape.
  pub fn normalize(self) -> Self {
    match self {
      Factory::Plain(c) => Factory::Annotated(Vec::new(), c),
      annotated => annotated,
    }
  }

  /// Inserts `names` ahead of the already declared dependencies.
  pub(crate) fn prepend_dependencies(self, names: Vec<String>) -> Self {
    let (existing, callable) = self.into_parts();
    let mut merged = names;
    merged.extend(existing);
    Factory::Annotated(merged, callable)
  }

  pub(crate) fn into_parts(self) -> (Vec<String>, Callable) {
    match self {
      Factory::Plain(c) => (Vec::new(), c),
      Factory::Annotated(names, c) => (names, c),
    }
  }

  fn into_callable(self) -> Callable {
    self.into_parts().1
  }
}

impl From<Callable> for Factory {
  fn from(callable: Callable) -> Self {
    Factory::Plain(callable)
  }
}

/// One element of a loosely-shaped factory: a dependency name or the callable.
#[derive(Clone, Debug)]
pub enum Part {
  Name(String),
  Callable(Callable),
}

impl From<&str> for Part {
  fn from(name: &str) -> Self {
    Part::Name(name.to_owned())
  }
}

impl From<String> for Part {
  fn from(name: String) -> Self {
    Part::Name(name)
  }
}

impl From<Callable> for Part {
  fn from(callable: Callable) -> Self {
    Part::Callable(callable)
  }
}

/// Checks whether `parts` describes a factory: the last element is callable,
/// and either it is the only element or the sequence starts with a name.
/// A callable anywhere but the tail is rejected.
pub fn is_callable_factory(parts: &[Part]) -> bool {
  let Some((Part::Callable(_), leading)) = parts.split_last() else {
    return false;
  };
  let leading_are_names = leading.iter().all(|p| matches!(p, Part::Name(_)));
  match leading.first() {
    None => true,
    Some(Part::Name(_)) => leading_are_names,
    Some(Part::Callable(_)) => false,
  }
}

fn describe(parts: &[Part]) -> String {
  parts
    .iter()
    .map(|p| match p {
      Part::Name(n) => n.as_str(),
      Part::Callable(_) => "<fn>",
    })
    .collect::<Vec<_>>()
    .join(", ")
}
