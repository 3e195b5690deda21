//! # armctl-core
//!
//! The shared engine layer between the `azure-arm` client bindings and the
//! CLI: configuration profiles, unified errors, the operation polling loop,
//! and per-service lifecycle workflows ("create and wait", "read or gone",
//! "delete and wait").
//!
//! Workflows compose the client's Layer 1 operations:
//!
//! 1. Submit the request (returns an LRO handle)
//! 2. Poll the operation until a terminal status
//! 3. Where the resource reports a secondary state past LRO completion
//!    (Redis Enterprise `resourceState`), wait for it with [`wait::StateWaiter`]
//! 4. Fetch and return the final resource
//!
//! Reads return `Ok(None)` when the service answers 404, so callers can
//! treat a vanished resource as "remove from state" instead of a failure.

pub mod config;
pub mod error;
pub mod managed_app;
pub mod openshift;
pub mod progress;
pub mod redis_enterprise;
pub mod wait;

pub use config::{Config, Profile};
pub use error::{CoreError, Result};
pub use progress::{poll_operation, ProgressCallback, ProgressEvent};
pub use wait::StateWaiter;
