//! Application runtime: configuration loading and logging bootstrap.
//!
//! The CLI (and anything else embedding the TaskDeck client) calls
//! [`config::AppConfig::load_or_default`] once at startup, then
//! [`logging::init_logging_from_config`] with the resulting sections.

pub mod config;
pub mod logging;
pub mod paths;

pub use config::{
    default_logging_config, AppConfig, CliArgs, LoggingConfig, Section, SessionConfig,
};
