//! Terminal output helpers for fuelscope
//!
//! - Status messages and value formatting
//! - Column-aligned tables
//! - A spinner for network fetches

pub mod output;
pub mod progress;
pub mod table;
