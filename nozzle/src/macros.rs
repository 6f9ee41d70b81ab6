//! Public macros for composing setup modules.

/// Builds a `Vec<Module>` from setup functions and bracketed, nested groups.
///
/// Each item is either a single token tree evaluating to something that
/// converts into a [`Module`](crate::Module) (a function name, a variable, or a
/// parenthesized closure) or a `[...]` group of further items.
///
/// # Examples
///
/// ```
/// use nozzle::{modules, Container, Result};
///
/// fn config(c: &Container) -> Result<()> {
///   c.bind("greeting")?.value("hello")?;
///   Ok(())
/// }
///
/// fn loud(c: &Container) -> Result<()> {
///   c.bind("volume")?.value(11u8)?;
///   Ok(())
/// }
///
/// let container = Container::new();
/// container
///   .module(modules![config, [loud, [(|c: &Container| -> Result<()> {
///     c.bind("name")?.value("world")?;
///     Ok(())
///   })]]])
///   .unwrap();
///
/// assert_eq!(container.names(), ["greeting", "name", "volume"]);
/// ```
#[macro_export]
macro_rules! modules {
  ($($item:tt),* $(,)?) => {
    ::std::vec![$($crate::__module_item!($item)),*]
  };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __module_item {
  ([$($inner:tt),* $(,)?]) => {
    $crate::Module::Group($crate::modules![$($inner),*])
  };
  ($item:expr) => {
    $crate::Module::from($item)
  };
}

#[cfg(test)]
mod tests {
  use crate::{Container, Module, Result};
  use std::cell::RefCell;
  use std::rc::Rc;

  fn noop(_: &Container) -> Result<()> {
    Ok(())
  }

  #[test]
  fn nests_bracketed_groups() {
    let modules = modules![noop, [noop, [noop]], noop];

    assert_eq!(modules.len(), 3);
    assert!(matches!(&modules[1], Module::Group(g) if g.len() == 2));
    assert_eq!(crate::module::flatten(modules).len(), 4);
  }

  #[test]
  fn accepts_prebuilt_modules() {
    let hits = Rc::new(RefCell::new(0));
    let counter = {
      let hits = Rc::clone(&hits);
      Module::setup(move |_| {
        *hits.borrow_mut() += 1;
        Ok(())
      })
    };

    Container::new()
      .module(modules![(counter.clone()), [counter]])
      .unwrap();
    assert_eq!(*hits.borrow(), 2);
  }
}
