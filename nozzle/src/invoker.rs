//! Resolves a factory's declared dependencies and calls it.

use crate::error::{Error, Result};
use crate::factory::{Factory, Part};
use crate::value::{Args, Instance};
use tracing::trace;

/// How the callable of a factory is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationMode {
  /// The callable is the designated initializer of a fresh, owned value.
  /// Producing nothing fails with [`Error::NothingConstructed`].
  Construct,
  /// The callable is an ordinary function; its return value is the result.
  Call,
}

/// Resolves one dependency name to an instance.
pub type DependencyResolver<'a> = dyn Fn(&str) -> Result<Instance> + 'a;

/// Resolves every declared dependency of `factory` through `resolver`, in
/// declaration order, then calls the factory with them.
///
/// The first dependency that fails to resolve aborts the invocation.
pub fn invoke_factory(
  factory: &Factory,
  mode: InvocationMode,
  resolver: &DependencyResolver<'_>,
) -> Result<Option<Instance>> {
  let names = factory.dependencies();
  let values = names
    .iter()
    .map(|name| resolver(name.as_str()))
    .collect::<Result<Vec<_>>>()?;
  let args = Args::new(names.to_vec(), values);

  trace!(?mode, dependencies = ?names, "invoking factory");
  let produced = factory.callable().call(&args)?;
  match (mode, produced) {
    (InvocationMode::Construct, None) => Err(Error::NothingConstructed),
    (_, produced) => Ok(produced),
  }
}

/// Invokes a loosely-shaped factory. Fails with [`Error::NotCallable`] if the
/// sequence does not end with a callable.
pub fn invoke_parts(
  parts: &[Part],
  mode: InvocationMode,
  resolver: &DependencyResolver<'_>,
) -> Result<Option<Instance>> {
  let factory = Factory::from_parts(parts.to_vec()).map_err(|e| match e {
    Error::NotAFactory(_) => Error::NotCallable,
    other => other,
  })?;
  invoke_factory(&factory, mode, resolver)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::factory::Callable;
  use crate::value::instance;
  use std::cell::RefCell;

  fn numbers(name: &str) -> Result<Instance> {
    match name {
      "one" => Ok(instance(1i32)),
      "two" => Ok(instance(2i32)),
      other => Err(Error::NotDefined(other.to_owned())),
    }
  }

  #[test]
  fn resolves_dependencies_in_declared_order() {
    let seen = RefCell::new(Vec::new());
    let resolver = |name: &str| {
      seen.borrow_mut().push(name.to_owned());
      numbers(name)
    };
    let factory = Factory::new(|args| Ok(*args.get::<i32>(0)? * 10 + *args.get::<i32>(1)?))
      .depends_on(["two", "one"]);

    let out = invoke_factory(&factory, InvocationMode::Call, &resolver)
      .unwrap()
      .unwrap();

    assert_eq!(*out.downcast::<i32>().unwrap(), 21);
    assert_eq!(*seen.borrow(), ["two", "one"]);
  }

  #[test]
  fn construct_mode_builds_a_fresh_value_each_time() {
    struct Point {
      x: i32,
    }
    let factory = Factory::new(|args| Ok(Point { x: *args.get::<i32>(0)? })).depends_on(["one"]);

    let a = invoke_factory(&factory, InvocationMode::Construct, &numbers).unwrap().unwrap();
    let b = invoke_factory(&factory, InvocationMode::Construct, &numbers).unwrap().unwrap();

    assert_eq!(a.downcast_ref::<Point>().unwrap().x, 1);
    assert!(!std::rc::Rc::ptr_eq(&a, &b));
  }

  #[test]
  fn construct_mode_rejects_an_empty_result() {
    let factory = Factory::optional(|_| Ok(None::<u8>));

    assert_eq!(
      invoke_factory(&factory, InvocationMode::Construct, &numbers).unwrap_err(),
      Error::NothingConstructed
    );
    assert!(invoke_factory(&factory, InvocationMode::Call, &numbers)
      .unwrap()
      .is_none());
  }

  #[test]
  fn unresolved_dependency_aborts_before_calling() {
    let called = std::rc::Rc::new(std::cell::Cell::new(false));
    let flag = called.clone();
    let factory = Factory::shared(move |_| {
      flag.set(true);
      Ok(None)
    })
    .depends_on(["one", "missing"]);

    let err = invoke_factory(&factory, InvocationMode::Call, &numbers).unwrap_err();
    assert_eq!(err, Error::NotDefined("missing".into()));
    assert!(!called.get());
  }

  #[test]
  fn loose_shape_without_callable_tail_is_not_callable() {
    let parts: Vec<Part> = vec!["one".into(), "two".into()];
    assert_eq!(
      invoke_parts(&parts, InvocationMode::Call, &numbers).unwrap_err(),
      Error::NotCallable
    );
  }

  #[test]
  fn loose_shape_is_invoked_with_names() {
    let parts: Vec<Part> = vec![
      "one".into(),
      Callable::new(|args| Ok(Some(instance(*args.get::<i32>(0)? + 1)))).into(),
    ];
    let out = invoke_parts(&parts, InvocationMode::Call, &numbers).unwrap().unwrap();
    assert_eq!(*out.downcast::<i32>().unwrap(), 2);
  }
}
