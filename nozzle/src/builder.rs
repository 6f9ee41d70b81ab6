use crate::container::Container;
use crate::value::Instance;
use std::fmt;

/// A caller-supplied lookup that replaces registry-based resolution.
///
/// Returning `None` makes the lookup fail with
/// [`Error::NotResolvedByCustomResolver`](crate::Error::NotResolvedByCustomResolver).
pub type ExternalResolver = dyn Fn(&Container, &str) -> Option<Instance>;

/// A builder for creating `Container` instances.
#[derive(Default)]
pub struct ContainerBuilder {
  resolver: Option<Box<ExternalResolver>>,
}

impl fmt::Debug for ContainerBuilder {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ContainerBuilder")
      .field("has_resolver", &self.resolver.is_some())
      .finish()
  }
}

impl ContainerBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  /// Routes every name lookup through `resolver` instead of the registry.
  /// It is called with the container being resolved from.
  pub fn resolver<F>(mut self, resolver: F) -> Self
  where
    F: Fn(&Container, &str) -> Option<Instance> + 'static,
  {
    self.resolver = Some(Box::new(resolver));
    self
  }

  pub fn build(self) -> Container {
    Container::from_resolver(self.resolver)
  }
}
