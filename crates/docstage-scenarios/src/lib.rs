//! Scenario catalog and staging directory collector.
//!
//! A scenario is a directory of documentation content published under a tag.
//! This crate maps tags to their source directories, decides which ones a run
//! publishes, and copies them into the staging directory MkDocs builds from.

pub mod catalog;
pub mod collector;
pub mod staging;

pub use catalog::{CatalogError, Scenario, ScenarioCatalog, DEFAULT_TAGS};
pub use collector::{collect, copy_scenario, CollectError, CopyStats};
pub use staging::StagingDir;
