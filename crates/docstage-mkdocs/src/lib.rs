//! MkDocs configuration emitter.
//!
//! This crate describes the site metadata and theme handed to MkDocs and
//! writes them out as the `mkdocs.yml` the build tool reads.

pub mod site;

pub use site::{SiteConfig, SiteConfigError, Theme};
