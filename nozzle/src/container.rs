//! The main `Container` struct and its associated methods.

use crate::binding::Binding;
use crate::builder::{ContainerBuilder, ExternalResolver};
use crate::error::{Error, Result};
use crate::factory::{is_callable_factory, Factory, Part};
use crate::invoker::{invoke_factory, InvocationMode};
use crate::module::{self, Module};
use crate::value::{downcast, Instance};
use std::any::Any;
use std::cell::RefCell;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::{debug, trace};

pub(crate) struct Shared {
  bindings: RefCell<HashMap<String, Rc<Binding>>>,
  resolver: Option<Box<ExternalResolver>>,
}

/// Resolves one dependency name for [`Container::invoke`], in place of the
/// container's own lookup. It receives the container being invoked on.
pub type OverrideResolver<'a> = dyn Fn(&Container, &str) -> Result<Instance> + 'a;

/// The dependency injection container.
///
/// Holds the name to [`Binding`] registry. A `Container` is a cheap handle:
/// clones share the same registry. Setup modules receive the container as an
/// argument. A factory that needs to reach back into the container it is
/// registered in must capture a [`WeakContainer`] from
/// [`downgrade`](Self::downgrade): bindings live inside the registry, so a
/// captured `Container` would keep the registry alive forever.
///
/// The container is single-threaded. It is neither `Send` nor `Sync`, and no
/// registry borrow is held while user code runs, so factories and modules may
/// call back into it.
#[derive(Clone)]
pub struct Container {
  shared: Rc<Shared>,
}

impl Default for Container {
  fn default() -> Self {
    Self::new()
  }
}

impl Container {
  /// Creates a new, empty `Container` resolving names from its own registry.
  pub fn new() -> Self {
    Self::builder().build()
  }

  pub fn builder() -> ContainerBuilder {
    ContainerBuilder::new()
  }

  /// Creates a container whose name lookups all go through `resolver`.
  ///
  /// The registry is still available to store bindings, but it is never
  /// consulted when resolving a name.
  pub fn with_resolver<F>(resolver: F) -> Self
  where
    F: Fn(&Container, &str) -> Option<Instance> + 'static,
  {
    Self::builder().resolver(resolver).build()
  }

  pub(crate) fn from_resolver(resolver: Option<Box<ExternalResolver>>) -> Self {
    Self {
      shared: Rc::new(Shared {
        bindings: RefCell::new(HashMap::new()),
        resolver,
      }),
    }
  }

  /// Returns a non-owning handle to this container.
  pub fn downgrade(&self) -> WeakContainer {
    WeakContainer {
      shared: Rc::downgrade(&self.shared),
    }
  }

  // --- Registration ---

  /// Registers a new, unconfigured binding under `name` and returns it for
  /// configuration.
  pub fn bind(&self, name: impl Into<String>) -> Result<Rc<Binding>> {
    let name = name.into();
    if name.is_empty() {
      return Err(Error::NameRequired);
    }

    match self.shared.bindings.borrow_mut().entry(name) {
      Entry::Occupied(entry) => Err(Error::AlreadyDefined(entry.key().clone())),
      Entry::Vacant(entry) => {
        debug!(binding = %entry.key(), "registering binding");
        let binding = Rc::new(Binding::new(
          entry.key().clone(),
          self.downgrade(),
        ));
        entry.insert(Rc::clone(&binding));
        Ok(binding)
      }
    }
  }

  /// Binds `name` to `factory` as a constructor and resolves it right away.
  pub fn instantiate(&self, name: impl Into<String>, factory: Factory) -> Result<Instance> {
    let binding = self.bind(name)?;
    binding.constructor(factory)?;
    binding.resolve()
  }

  /// Applies setup modules to this container, depth-first and left to right.
  ///
  /// The first module that fails aborts the ones after it.
  pub fn module<I>(&self, modules: I) -> Result<()>
  where
    I: IntoIterator,
    I::Item: Into<Module>,
  {
    module::apply(self, modules.into_iter().map(Into::into).collect())
  }

  // --- Resolution ---

  /// Resolves a single name, either through the external resolver or through
  /// the registry.
  pub fn resolve_by_name(&self, name: &str) -> Result<Instance> {
    debug!(binding = %name, "resolve binding");

    if let Some(resolver) = &self.shared.resolver {
      return resolver(self, name)
        .ok_or_else(|| Error::NotResolvedByCustomResolver(name.to_owned()));
    }

    self
      .binding(name)
      .ok_or_else(|| Error::NotDefined(name.to_owned()))?
      .resolve()
  }

  pub fn get(&self, name: &str) -> Result<Instance> {
    self.resolve_by_name(name)
  }

  /// Resolves every name in order. Fails on the first name that cannot be
  /// resolved, without returning partial results.
  pub fn get_many<I, S>(&self, names: I) -> Result<Vec<Instance>>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    names
      .into_iter()
      .map(|name| self.resolve_by_name(name.as_ref()))
      .collect()
  }

  /// Resolves `name` and downcasts it to `T`.
  pub fn get_as<T: Any>(&self, name: &str) -> Result<Rc<T>> {
    downcast(name, self.get(name)?)
  }

  // --- Invocation ---

  /// Calls `factory` with its declared dependencies resolved through
  /// `resolver`, or through this container when `None`.
  pub fn invoke(
    &self,
    factory: &Factory,
    resolver: Option<&OverrideResolver<'_>>,
  ) -> Result<Option<Instance>> {
    match resolver {
      Some(resolver) => invoke_factory(factory, InvocationMode::Call, &|name: &str| {
        resolver(self, name)
      }),
      None => invoke_factory(factory, InvocationMode::Call, &|name: &str| {
        self.resolve_by_name(name)
      }),
    }
  }

  /// Like [`invoke`](Self::invoke) for a loosely-shaped factory. A sequence
  /// that is not a factory is skipped and yields `Ok(None)`.
  pub fn invoke_parts(
    &self,
    parts: &[Part],
    resolver: Option<&OverrideResolver<'_>>,
  ) -> Result<Option<Instance>> {
    if !is_callable_factory(parts) {
      trace!(len = parts.len(), "skipping invocation of a non-factory");
      return Ok(None);
    }
    let factory = Factory::from_parts(parts.to_vec())?;
    self.invoke(&factory, resolver)
  }

  // --- Introspection ---

  pub fn binding(&self, name: &str) -> Option<Rc<Binding>> {
    self.shared.bindings.borrow().get(name).cloned()
  }

  pub fn contains(&self, name: &str) -> bool {
    self.shared.bindings.borrow().contains_key(name)
  }

  /// Registered names, sorted.
  pub fn names(&self) -> Vec<String> {
    let mut names: Vec<String> = self.shared.bindings.borrow().keys().cloned().collect();
    names.sort_unstable();
    names
  }

  pub fn len(&self) -> usize {
    self.shared.bindings.borrow().len()
  }

  pub fn is_empty(&self) -> bool {
    self.shared.bindings.borrow().is_empty()
  }

  pub fn has_custom_resolver(&self) -> bool {
    self.shared.resolver.is_some()
  }
}

impl fmt::Debug for Container {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Container")
      .field("bindings", &self.names())
      .field("custom_resolver", &self.has_custom_resolver())
      .finish()
  }
}

/// A non-owning handle to a [`Container`], obtained from
/// [`Container::downgrade`].
///
/// Factories stored in a container capture this instead of a `Container`, so
/// the registry is freed once the last owning handle is dropped.
#[derive(Clone, Default)]
pub struct WeakContainer {
  shared: Weak<Shared>,
}

impl WeakContainer {
  /// Returns the container if an owning handle is still alive.
  pub fn upgrade(&self) -> Option<Container> {
    self.shared.upgrade().map(|shared| Container { shared })
  }
}

impl fmt::Debug for WeakContainer {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("WeakContainer")
      .field("alive", &(self.shared.strong_count() > 0))
      .finish()
  }
}
