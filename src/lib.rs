//! # keepbest
//!
//! Best-checkpoint selection and persistence for machine-learning training runs.
//! An external training loop produces a stream of scored candidates (epoch,
//! validation score, artifact path); `keepbest` retains only the artifact with
//! the highest score seen so far and skips everything else.
//!
//! ## Modules
//!
//! - [`selector`] — The best-checkpoint selector: strict-greater comparison,
//!   write-then-update commit ordering
//! - [`store`] — Checkpoint persistence: deterministic naming, metadata,
//!   atomic directory commits, `best` symlink
//! - [`monitor`] — Drives the selector from a JSON-lines record stream and
//!   tracks rolling run statistics
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types

pub mod config;
pub mod error;
pub mod monitor;
pub mod selector;
pub mod store;
