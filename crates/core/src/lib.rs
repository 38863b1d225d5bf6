//! Shared foundations for the fuelscope workspace
//!
//! - **Error handling**: configuration errors with codes, the file and a recovery hint
//! - **Configuration**: TOML configuration discovered in the working directory
//! - **Retry**: exponential backoff policy used by the HTTP client
//!
//! # Example
//!
//! ```rust,no_run
//! use fuelscope_core::{config::Config, retry::RetryConfig};
//!
//! let config = Config::load(None)?;
//! let retry = RetryConfig::from_section(&config.schema.retry);
//! println!("fetching {} with {} attempts", config.schema.source.url, retry.max_attempts);
//! # Ok::<(), fuelscope_core::Error>(())
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod retry;

pub use error::{exit_codes, Error, ErrorCode, ErrorReport, Result};
