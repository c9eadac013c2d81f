//! This crate is intended to contain code that is required to provide or
//! improve the observability of the deployer. That includes the logging
//! initialization and the panic hook.
pub mod config;
pub mod panic_hook;
pub mod tracing;

pub use config::Config;
