//! # Nozzle
//!
//! A small, single-threaded dependency injection container keyed by name.
//!
//! Values are registered under string names as bindings, built lazily on first
//! request, and optionally cached as singletons. Factories declare the names of
//! the dependencies they need; the container resolves them in order and passes
//! them as positional arguments.
//!
//! ## Core Concepts
//!
//! - **Container**: the registry of bindings. Callers create and own their
//!   containers; there is no global instance.
//! - **Binding**: how one name is produced: a constructor, a provider, or a
//!   static value, optionally marked as a singleton.
//! - **Factory**: a callable, optionally annotated with dependency names.
//! - **Module**: a setup function (or nested group of them) applied to a
//!   container to register bindings.
//! - **External resolver**: a lookup function that replaces the registry
//!   entirely when resolving names.
//!
//! ## Quick Start
//!
//! ```
//! use nozzle::{Container, Factory};
//! use std::rc::Rc;
//!
//! struct Repository {
//!   url: String,
//! }
//!
//! fn main() -> nozzle::Result<()> {
//!   let container = Container::new();
//!
//!   container.bind("db_url")?.value(String::from("postgres://localhost/app"))?;
//!   container
//!     .bind("repository")?
//!     .constructor(Factory::new(|args| {
//!       Ok(Repository {
//!         url: (*args.get::<String>(0)?).clone(),
//!       })
//!     }))?
//!     .inject(["db_url"])?
//!     .singleton();
//!
//!   let first = container.get_as::<Repository>("repository")?;
//!   let second = container.get_as::<Repository>("repository")?;
//!
//!   assert_eq!(first.url, "postgres://localhost/app");
//!   assert!(Rc::ptr_eq(&first, &second));
//!   Ok(())
//! }
//! ```

mod binding;
mod builder;
mod container;
mod error;
mod factory;
mod invoker;
mod macros;
pub mod module;
mod value;

pub use binding::{Binding, BindingState};
pub use builder::{ContainerBuilder, ExternalResolver};
pub use container::{Container, OverrideResolver, WeakContainer};
pub use error::{Error, Result};
pub use factory::{is_callable_factory, Callable, Factory, Part};
pub use invoker::{invoke_factory, invoke_parts, DependencyResolver, InvocationMode};
pub use module::{Module, SetupFn};
pub use value::{downcast, instance, Args, Instance};
