pub mod api;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod format;
pub mod notification;
pub mod prompt;
pub mod testing;

pub use error::{AcquiaError, Result};
