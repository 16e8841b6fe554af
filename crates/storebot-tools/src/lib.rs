//! Tool abstractions and the dispatching registry.
//!
//! A [`Tool`] is a named external operation the assistant may request,
//! described by a [`ToolDescriptor`] carrying a JSON-schema argument
//! specification. The [`ToolRegistry`] looks requested tools up by name,
//! validates arguments (applying declared defaults), and executes them —
//! capturing execution failures into error-payload results so a single
//! failing tool never ends the conversation.

/// The tool trait and its descriptor.
pub mod tool;
/// The dispatching registry.
pub mod registry;
/// JSON-schema argument validation.
pub mod validate;

pub use registry::ToolRegistry;
pub use tool::{Tool, ToolDescriptor};
pub use validate::validate_arguments;
