//! Setup modules: functions that configure a container, composable into
//! arbitrarily nested groups.

use crate::container::Container;
use crate::error::Result;
use std::fmt;
use std::rc::Rc;
use tracing::debug;

/// A function that registers or configures bindings on a container.
pub type SetupFn = Rc<dyn Fn(&Container) -> Result<()>>;

/// A setup function, or a nested group of modules.
#[derive(Clone)]
pub enum Module {
  Setup(SetupFn),
  Group(Vec<Module>),
}

impl Module {
  pub fn setup<F>(f: F) -> Self
  where
    F: Fn(&Container) -> Result<()> + 'static,
  {
    Module::Setup(Rc::new(f))
  }

  pub fn group<I>(modules: I) -> Self
  where
    I: IntoIterator,
    I::Item: Into<Module>,
  {
    Module::Group(modules.into_iter().map(Into::into).collect())
  }
}

impl<F> From<F> for Module
where
  F: Fn(&Container) -> Result<()> + 'static,
{
  fn from(f: F) -> Self {
    Module::setup(f)
  }
}

impl From<Vec<Module>> for Module {
  fn from(modules: Vec<Module>) -> Self {
    Module::Group(modules)
  }
}

impl fmt::Debug for Module {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Module::Setup(_) => f.write_str("Setup(..)"),
      Module::Group(modules) => f.debug_tuple("Group").field(modules).finish(),
    }
  }
}

/// Flattens nested groups depth-first, left to right.
pub fn flatten(modules: Vec<Module>) -> Vec<SetupFn> {
  fn walk(modules: Vec<Module>, out: &mut Vec<SetupFn>) {
    for module in modules {
      match module {
        Module::Setup(f) => out.push(f),
        Module::Group(group) => walk(group, out),
      }
    }
  }

  let mut out = Vec::new();
  walk(modules, &mut out);
  out
}

pub(crate) fn apply(container: &Container, modules: Vec<Module>) -> Result<()> {
  let setups = flatten(modules);
  debug!(count = setups.len(), "applying modules");
  for (index, setup) in setups.iter().enumerate() {
    debug!(index, "applying module");
    setup(container)?;
  }
  Ok(())
}
