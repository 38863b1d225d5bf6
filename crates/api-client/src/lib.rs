//! Station listing sources for fuelscope
//!
//! # Features
//!
//! - **Environment-based configuration**: endpoint and timeout from `FUELSCOPE_*` variables
//! - **Retry with exponential backoff**: automatic retry for transient failures
//! - **Request correlation**: every request carries an `X-Request-ID`
//! - **Tolerant decoding**: enveloped or bare listings, non-object entries skipped
//!
//! Both [`StationsClient`] and [`FileListing`] implement
//! [`RecordSource`](fuelscope_catalog::RecordSource).
//!
//! # Example
//!
//! ```rust,no_run
//! use fuelscope_api_client::StationsClient;
//! use fuelscope_catalog::StationSession;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = StationsClient::new()?;
//!
//!     let mut session = StationSession::new();
//!     session.refresh(&client).await?;
//!     println!("{} brands", session.engine().catalog().brands.len());
//!
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod file;
pub mod listing;

pub use client::StationsClient;
pub use config::{ClientConfig, Environment};
pub use error::{ApiError, ApiResult};
pub use file::FileListing;
pub use listing::{parse_listing, Listing};
