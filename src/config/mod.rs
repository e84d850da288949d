//! Configuration loading and management.
//!
//! - [`types`]: top-level [`Config`] and file loading
//! - [`hub`]: message hub tunables (HubConfig)
//! - [`log`]: logging filter (LogConfig)
//! - [`validation`]: startup checks

mod hub;
mod log;
mod types;
pub mod validation;

pub use hub::HubConfig;
pub use log::LogConfig;
pub use types::{Config, ConfigError};
pub use validation::{ValidationError, validate};
