//! A named binding: how to produce the value registered under one name.

use crate::container::{Container, WeakContainer};
use crate::error::{Error, Result};
use crate::factory::Factory;
use crate::invoker::{invoke_factory, InvocationMode};
use crate::value::{instance, Instance};
use once_cell::unsync::OnceCell;
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use tracing::trace;

/// Lifecycle of a binding.
///
/// Only singleton bindings ever stay `Resolved`; transient bindings remain
/// `Configured` and re-run their factory on every resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingState {
  Unconfigured,
  Configured,
  /// A singleton instance is cached. Configuration is frozen.
  Resolved,
}

#[derive(Default)]
struct Config {
  constructor: Option<Factory>,
  provider: Option<Factory>,
  value: Option<Instance>,
  singleton: bool,
}

/// What `resolve` will produce, taken out of the config so no borrow is held
/// while a factory runs.
enum Source {
  Factory(Factory, InvocationMode),
  Value(Instance),
  Nothing,
}

/// A named, mutable description of how to produce a value.
///
/// Created by [`Container::bind`]. All configuration methods return `&Self`
/// so they chain:
///
/// ```
/// use nozzle::{Container, Factory};
///
/// # fn main() -> nozzle::Result<()> {
/// let container = Container::new();
/// container.bind("port")?.value(8080u16)?;
/// container
///   .bind("addr")?
///   .provider(Factory::new(|args| Ok(format!("0.0.0.0:{}", args.get::<u16>(0)?))))?
///   .inject(["port"])?
///   .singleton();
///
/// assert_eq!(*container.get_as::<String>("addr")?, "0.0.0.0:8080");
/// # Ok(())
/// # }
/// ```
pub struct Binding {
  name: String,
  owner: WeakContainer,
  config: RefCell<Config>,
  state: Cell<BindingState>,
  instance: OnceCell<Instance>,
}

impl Binding {
  pub(crate) fn new(name: String, owner: WeakContainer) -> Self {
    Self {
      name,
      owner,
      config: RefCell::new(Config::default()),
      state: Cell::new(BindingState::Unconfigured),
      instance: OnceCell::new(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn state(&self) -> BindingState {
    self.state.get()
  }

  pub fn is_singleton(&self) -> bool {
    self.config.borrow().singleton
  }

  /// Names the configured factory depends on, constructor first.
  pub fn dependencies(&self) -> Vec<String> {
    let config = self.config.borrow();
    config
      .constructor
      .as_ref()
      .or(config.provider.as_ref())
      .map(|f| f.dependencies().to_vec())
      .unwrap_or_default()
  }

  // --- Configuration ---

  /// Produces the value by calling `factory` as a plain function.
  pub fn provider(&self, factory: impl Into<Option<Factory>>) -> Result<&Self> {
    let factory = factory
      .into()
      .filter(Factory::is_valid)
      .ok_or_else(|| Error::NotAFactory(self.name.clone()))?;
    self.ensure_unresolved()?;

    self.config.borrow_mut().provider = Some(factory.normalize());
    self.mark_configured();
    Ok(self)
  }

  /// Produces `value` verbatim.
  pub fn value<T: Any>(&self, value: T) -> Result<&Self> {
    self.shared_value(Some(instance(value)))
  }

  /// Produces an already shared instance verbatim.
  pub fn shared_value(&self, value: Option<Instance>) -> Result<&Self> {
    let value = value.ok_or_else(|| Error::ValueRequired(self.name.clone()))?;
    self.ensure_unresolved()?;

    self.config.borrow_mut().value = Some(value);
    self.mark_configured();
    Ok(self)
  }

  /// Produces the value by calling `factory` as the initializer of a new
  /// value. Takes precedence over a provider and a static value.
  pub fn constructor(&self, factory: impl Into<Option<Factory>>) -> Result<&Self> {
    let factory = factory
      .into()
      .ok_or_else(|| Error::TypeRequired(self.name.clone()))?;
    if self.state.get() == BindingState::Resolved {
      return Err(Error::CannotBecomeType(self.name.clone()));
    }
    if !factory.is_valid() {
      return Err(Error::NotAFactory(self.name.clone()));
    }

    self.config.borrow_mut().constructor = Some(factory.normalize());
    self.mark_configured();
    Ok(self)
  }

  /// Caches the first resolved instance and hands it out from then on.
  pub fn singleton(&self) -> &Self {
    self.config.borrow_mut().singleton = true;
    self
  }

  /// Adds dependencies ahead of the ones the factory already declares.
  ///
  /// Applies to the constructor if one is set, otherwise to the provider.
  pub fn inject<I, S>(&self, names: I) -> Result<&Self>
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let names: Vec<String> = names.into_iter().map(Into::into).collect();
    let mut config = self.config.borrow_mut();
    let config = &mut *config;
    let slot = if config.constructor.is_some() {
      &mut config.constructor
    } else if config.provider.is_some() {
      &mut config.provider
    } else {
      return Err(Error::NotAProvider(self.name.clone()));
    };
    if names.is_empty() {
      return Ok(self);
    }
    self.ensure_unresolved()?;
    if names.iter().any(String::is_empty) {
      return Err(Error::NotAFactory(self.name.clone()));
    }

    *slot = slot.take().map(|f| f.prepend_dependencies(names));
    Ok(self)
  }

  // --- Resolution ---

  /// Returns the instance for this binding, building it if needed.
  ///
  /// A cached singleton is returned without touching the configuration.
  pub fn resolve(&self) -> Result<Instance> {
    if let Some(cached) = self.instance.get() {
      return Ok(cached.clone());
    }

    let produced = match self.source() {
      Source::Factory(factory, mode) => {
        let container = self.owner()?;
        invoke_factory(&factory, mode, &|name: &str| container.resolve_by_name(name))?
      }
      Source::Value(value) => Some(value),
      Source::Nothing => None,
    };
    let instance = produced.ok_or_else(|| Error::NoValue(self.name.clone()))?;

    if !self.is_singleton() {
      return Ok(instance);
    }
    // A factory that re-entered this binding may already have filled the cell.
    let cached = self.instance.get_or_init(|| instance).clone();
    self.state.set(BindingState::Resolved);
    trace!(binding = %self.name, "cached singleton instance");
    Ok(cached)
  }

  fn source(&self) -> Source {
    let config = self.config.borrow();
    if let Some(factory) = &config.constructor {
      Source::Factory(factory.clone(), InvocationMode::Construct)
    } else if let Some(factory) = &config.provider {
      Source::Factory(factory.clone(), InvocationMode::Call)
    } else if let Some(value) = &config.value {
      Source::Value(value.clone())
    } else {
      Source::Nothing
    }
  }

  fn owner(&self) -> Result<Container> {
    self
      .owner
      .upgrade()
      .ok_or_else(|| Error::ContainerDropped(self.name.clone()))
  }

  fn ensure_unresolved(&self) -> Result<()> {
    match self.state.get() {
      BindingState::Resolved => Err(Error::AlreadyInitialized(self.name.clone())),
      _ => Ok(()),
    }
  }

  fn mark_configured(&self) {
    if self.state.get() == BindingState::Unconfigured {
      self.state.set(BindingState::Configured);
    }
  }
}

impl fmt::Debug for Binding {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let config = self.config.borrow();
    f.debug_struct("Binding")
      .field("name", &self.name)
      .field("state", &self.state.get())
      .field("singleton", &config.singleton)
      .field("has_constructor", &config.constructor.is_some())
      .field("has_provider", &config.provider.is_some())
      .field("has_value", &config.value.is_some())
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;
  use std::rc::Rc;

  #[test]
  fn state_follows_configuration_and_caching() {
    let container = Container::new();
    let binding = container.bind("answer").unwrap();
    assert_eq!(binding.state(), BindingState::Unconfigured);

    binding.value(42).unwrap();
    assert_eq!(binding.state(), BindingState::Configured);

    binding.resolve().unwrap();
    assert_eq!(binding.state(), BindingState::Configured);

    binding.singleton();
    binding.resolve().unwrap();
    assert_eq!(binding.state(), BindingState::Resolved);
  }

  #[test]
  fn constructor_wins_over_provider_and_value() {
    let container = Container::new();
    let binding = container.bind("kind").unwrap();
    binding
      .value("value")
      .unwrap()
      .provider(Factory::new(|_| Ok("provider")))
      .unwrap();
    assert_eq!(*binding.resolve().unwrap().downcast::<&str>().unwrap(), "provider");

    binding.constructor(Factory::new(|_| Ok("constructor"))).unwrap();
    assert_eq!(*binding.resolve().unwrap().downcast::<&str>().unwrap(), "constructor");
  }

  #[test]
  fn resolved_singleton_is_frozen() {
    let container = Container::new();
    let binding = container.bind("frozen").unwrap();
    binding.provider(Factory::new(|_| Ok(1))).unwrap().singleton();
    binding.resolve().unwrap();

    let frozen = Error::AlreadyInitialized("frozen".into());
    assert_eq!(
      binding.constructor(Factory::new(|_| Ok(2))).err(),
      Some(Error::CannotBecomeType("frozen".into()))
    );
    assert_eq!(binding.provider(Factory::new(|_| Ok(2))).err(), Some(frozen.clone()));
    assert_eq!(binding.value(2).err(), Some(frozen.clone()));
    assert_eq!(binding.inject(["other"]).err(), Some(frozen));
    assert!(binding.inject(Vec::<String>::new()).is_ok());
  }

  #[test]
  fn inject_requires_a_factory() {
    let container = Container::new();
    let binding = container.bind("plain").unwrap();
    binding.value(1).unwrap();

    assert_eq!(
      binding.inject(["a"]).err(),
      Some(Error::NotAProvider("plain".into()))
    );
  }

  #[test]
  fn inject_prepends_in_given_order() {
    let container = Container::new();
    let binding = container.bind("svc").unwrap();
    binding
      .provider(Factory::new(|_| Ok(())).depends_on(["c"]))
      .unwrap()
      .inject(["a", "b"])
      .unwrap();

    assert_eq!(binding.dependencies(), ["a", "b", "c"]);
  }

  #[test]
  fn missing_arguments_are_rejected() {
    let container = Container::new();
    let binding = container.bind("x").unwrap();

    assert_eq!(binding.provider(None::<Factory>).err(), Some(Error::NotAFactory("x".into())));
    assert_eq!(binding.constructor(None::<Factory>).err(), Some(Error::TypeRequired("x".into())));
    assert_eq!(binding.shared_value(None).err(), Some(Error::ValueRequired("x".into())));
    assert_eq!(binding.state(), BindingState::Unconfigured);
  }

  #[test]
  fn empty_dependency_names_are_not_factories() {
    let container = Container::new();
    let binding = container.bind("x").unwrap();
    let malformed = || Factory::new(|_| Ok(1)).depends_on(["a", ""]);

    assert_eq!(binding.provider(malformed()).err(), Some(Error::NotAFactory("x".into())));
    assert_eq!(binding.constructor(malformed()).err(), Some(Error::NotAFactory("x".into())));
    assert_eq!(binding.state(), BindingState::Unconfigured);
    assert!(binding.dependencies().is_empty());
  }

  #[test]
  fn inject_rejects_empty_names_without_changes() {
    let container = Container::new();
    let binding = container.bind("svc").unwrap();
    binding
      .provider(Factory::new(|_| Ok(())).depends_on(["c"]))
      .unwrap();

    assert_eq!(binding.inject(["", "b"]).err(), Some(Error::NotAFactory("svc".into())));
    assert_eq!(binding.dependencies(), ["c"]);
    assert_eq!(binding.state(), BindingState::Configured);
  }

  #[test]
  fn falsy_values_are_still_values() {
    let container = Container::new();
    container.bind("zero").unwrap().value(0).unwrap();
    container.bind("empty").unwrap().value(String::new()).unwrap();
    container.bind("no").unwrap().value(false).unwrap();

    assert_eq!(*container.get_as::<i32>("zero").unwrap(), 0);
    assert_eq!(*container.get_as::<String>("empty").unwrap(), "");
    assert!(!*container.get_as::<bool>("no").unwrap());
  }

  #[test]
  fn factory_producing_nothing_has_no_value() {
    let container = Container::new();
    let binding = container.bind("none").unwrap();
    binding.provider(Factory::optional(|_| Ok(None::<u8>))).unwrap();

    assert_eq!(binding.resolve().err(), Some(Error::NoValue("none".into())));
  }

  #[test]
  fn dropped_container_is_reported() {
    let container = Container::new();
    let binding = container.bind("orphan").unwrap();
    binding.provider(Factory::new(|_| Ok(1))).unwrap();
    drop(container);

    assert_eq!(
      binding.resolve().err(),
      Some(Error::ContainerDropped("orphan".into()))
    );
  }

  #[test]
  fn cached_instance_survives_dropped_container() {
    let container = Container::new();
    let binding = container.bind("kept").unwrap();
    binding.provider(Factory::new(|_| Ok(7))).unwrap().singleton();
    let first = binding.resolve().unwrap();
    drop(container);

    assert!(Rc::ptr_eq(&first, &binding.resolve().unwrap()));
  }
}
