//! Scenario catalog for looking up source directories by tag.
//!
//! The catalog is an ordered list rather than a map: the declaration order is
//! the order in which a run without selectors copies scenarios.

use std::path::{Path, PathBuf};

/// Tags published by default, in copy order.
pub const DEFAULT_TAGS: &[&str] = &[
    "xm",
    "xmcloud",
    "dam",
    "ops",
    "cdp",
    "personalize",
    "send",
    "ordercloud",
    "discover",
    "headlesscms",
    "search",
];

/// A tagged scenario directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    /// Tag name (matched case-sensitively)
    pub tag: String,

    /// Directory whose contents are copied into the staging directory
    pub source_dir: PathBuf,
}

/// An ordered mapping from tag to scenario directory.
#[derive(Debug, Clone, Default)]
pub struct ScenarioCatalog {
    scenarios: Vec<Scenario>,
}

impl ScenarioCatalog {
    /// Create a new empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the default catalog, one subdirectory of `scenarios_dir` per tag.
    pub fn with_default_tags(scenarios_dir: &Path) -> Self {
        Self {
            scenarios: DEFAULT_TAGS
                .iter()
                .map(|tag| Scenario {
                    tag: (*tag).to_string(),
                    source_dir: scenarios_dir.join(tag),
                })
                .collect(),
        }
    }

    /// Add a scenario at the end of the catalog.
    pub fn insert(
        &mut self,
        tag: impl Into<String>,
        source_dir: impl Into<PathBuf>,
    ) -> Result<(), CatalogError> {
        let tag = tag.into();
        if self.contains(&tag) {
            return Err(CatalogError::DuplicateTag(tag));
        }

        self.scenarios.push(Scenario {
            tag,
            source_dir: source_dir.into(),
        });
        Ok(())
    }

    /// Look up a scenario by tag.
    pub fn get(&self, tag: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.tag == tag)
    }

    /// Check if a tag is in the catalog.
    pub fn contains(&self, tag: &str) -> bool {
        self.get(tag).is_some()
    }

    /// Iterate over scenarios in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.iter()
    }

    /// Get all tags in catalog order.
    pub fn tags(&self) -> Vec<&str> {
        self.scenarios.iter().map(|s| s.tag.as_str()).collect()
    }

    /// Get the number of scenarios.
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Resolve command-line selectors to the scenarios a run should copy.
    ///
    /// With no selectors every scenario is returned in catalog order.
    /// Otherwise selectors are resolved in the order given: unknown ones are
    /// skipped and repeats are kept.
    pub fn select<S: AsRef<str>>(&self, selectors: &[S]) -> Vec<&Scenario> {
        if selectors.is_empty() {
            return self.iter().collect();
        }

        selectors
            .iter()
            .filter_map(|selector| {
                let selector = selector.as_ref();
                let scenario = self.get(selector);
                if scenario.is_none() {
                    tracing::debug!("Ignoring unknown scenario tag '{}'", selector);
                }
                scenario
            })
            .collect()
    }
}

/// Errors that can occur when building a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Scenario tag '{0}' is declared more than once")]
    DuplicateTag(String),
}
