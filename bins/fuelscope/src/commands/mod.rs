//! Subcommand implementations

pub mod facets;
pub mod fuel_types;
pub mod list;
