//! chainprofile tools library
//!
//! Project configuration loading, logging setup and reporting for the
//! `chainprofile` CLI. Resolution itself lives in `chainprofile-core`.

pub mod config;
pub mod logging;
pub mod report;

pub use config::{load_environment, LoadError, ProjectConfig};
