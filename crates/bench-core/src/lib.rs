//! Core types for the toolbench fixture store
//!
//! This crate defines the in-memory store every tool reads and mutates,
//! the shared error taxonomy, and the frozen episode clock.

pub mod clock;
pub mod error;
pub mod store;

pub use clock::{FROZEN_DATE, FROZEN_TIMESTAMP};
pub use error::{Result, ToolError};
pub use store::{Record, Store};
