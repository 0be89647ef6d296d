//! psdfonts - Font usage finder for PSD/PSB documents
//!
//! A cross-platform CLI that walks a directory for Photoshop documents,
//! extracts the font names referenced by their text layers, and records
//! them to a flat text file or a SQLite database, skipping work already
//! done on previous runs.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod progress;
pub mod psd;
pub mod scanner;
pub mod signal;
pub mod store;

pub use app::run_app;
