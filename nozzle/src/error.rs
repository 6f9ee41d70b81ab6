use thiserror::Error;

/// Every failure the container can report.
///
/// Errors are returned at the point of detection and are never retried or
/// recovered internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  // --- Configuration ---
  #[error("The binding name is required.")]
  NameRequired,

  #[error("The binding with the specified name '{0}' is already defined.")]
  AlreadyDefined(String),

  #[error("The binding value for '{0}' is required.")]
  ValueRequired(String),

  #[error("The binding type for '{0}' is required.")]
  TypeRequired(String),

  #[error("The binding '{0}' is already initialized.")]
  AlreadyInitialized(String),

  #[error("The binding '{0}' is already initialized and cannot become a type.")]
  CannotBecomeType(String),

  #[error("The binding '{0}' is not a provider.")]
  NotAProvider(String),

  #[error("The binding factory for '{0}' is not a factory type.")]
  NotAFactory(String),

  // --- Resolution ---
  #[error("The binding with the specified name '{0}' was not defined.")]
  NotDefined(String),

  #[error("The binding with the specified name '{0}' was not resolved by custom resolver.")]
  NotResolvedByCustomResolver(String),

  #[error("The binding '{0}' is not associated with any value.")]
  NoValue(String),

  #[error("The container owning binding '{0}' has been dropped.")]
  ContainerDropped(String),

  #[error("The value resolved for '{name}' is not a `{expected}`.")]
  TypeMismatch { name: String, expected: &'static str },

  #[error("No argument at position {index} (only {len} dependencies were resolved).")]
  MissingArgument { index: usize, len: usize },

  // --- Invocation ---
  #[error("The invocation target is not callable.")]
  NotCallable,

  #[error("The constructor produced no instance.")]
  NothingConstructed,

  // --- User code ---
  #[error("Factory failed: {0}")]
  Factory(String),
}

impl Error {
  /// Wraps a failure raised inside a user factory or setup function.
  pub fn custom(message: impl std::fmt::Display) -> Self {
    Error::Factory(message.to_string())
  }
}

/// A specialized `Result` type for container operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
