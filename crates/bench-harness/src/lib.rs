//! Episode runner for toolbench
//!
//! The harness owns the session loop plumbing: it pairs one fixture
//! [`Store`](bench_core::Store) with one [`Interface`](bench_tools::Interface),
//! exposes the interface's schemas for the model, dispatches named calls,
//! and tracks whether the episode has been handed off to a human.

pub mod episode;

pub use episode::Episode;
