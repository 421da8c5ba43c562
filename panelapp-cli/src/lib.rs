//! PanelApp Australia incremental extractor
//!
//! [`sync`] holds the version tracking core. The remaining modules fetch
//! panel and gene pages from the API and drive them from the command line.

pub mod api;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod logging;
pub mod services;
pub mod sync;
