//! Render engine.
//!
//! A [`Template`] owns its configuration, variable bindings and layout, and
//! renders views by loading their compiled [`Program`](crate::compiler::Program)
//! through the artifact cache and running it in an [`Executor`]. The executor
//! holds the owning template, so `{template}` and `{yield}` reach back into
//! the same instance without any global lookup.
//!
//! [`TemplateRegistry`] lets a host keep one instance per configuration.

pub mod bindings;
pub mod executor;
pub mod registry;
pub mod template;
pub mod value;

pub use bindings::Bindings;
pub use executor::Executor;
pub use registry::TemplateRegistry;
pub use template::Template;
