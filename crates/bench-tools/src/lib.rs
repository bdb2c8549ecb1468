//! Tool contract for toolbench
//!
//! This crate defines the uniform shape every tool obeys: the [`Tool`] trait,
//! the schema the harness advertises to the model, the per-interface
//! registry, and the validation helpers the tool corpus composes.

pub mod args;
pub mod escalate;
pub mod registry;
pub mod schema;
pub mod tool;
pub mod validate;

pub use args::Args;
pub use escalate::TransferToHuman;
pub use registry::{Interface, ToolRegistry};
pub use schema::Parameters;
pub use tool::Tool;
