//! MkDocs build invoker.
//!
//! Runs the external static-site build against a staged docs directory and
//! relays what it printed.

pub mod invoker;

pub use invoker::{BuildConfig, BuildInvoker, BuildOutput, InvokeError};
