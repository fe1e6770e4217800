//! Site configuration document.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Site-level settings written to `mkdocs.yml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SiteConfig {
    /// Site name shown in the header
    pub site_name: String,

    /// Canonical URL of the published site
    pub site_url: String,

    /// Emit `page/index.html` style URLs instead of `page.html`
    #[serde(default)]
    pub use_directory_urls: bool,

    /// Theme descriptor
    pub theme: Theme,
}

/// Theme descriptor nested under `theme:`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Theme {
    /// Theme name (e.g., "readthedocs", "mkdocs")
    pub name: String,
}

pub const DEFAULT_SITE_NAME: &str = "MkDocsPoC";
pub const DEFAULT_SITE_URL: &str = "https://docs.sitecore.com/demo/instanceID/";
pub const DEFAULT_THEME: &str = "readthedocs";

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_name: DEFAULT_SITE_NAME.to_string(),
            site_url: DEFAULT_SITE_URL.to_string(),
            use_directory_urls: false,
            theme: Theme {
                name: DEFAULT_THEME.to_string(),
            },
        }
    }
}

impl SiteConfig {
    /// Render the document as YAML.
    pub fn to_yaml(&self) -> Result<String, SiteConfigError> {
        serde_yaml::to_string(self).map_err(|e| SiteConfigError::Serialize(e.to_string()))
    }

    /// Parse a document previously produced by [`SiteConfig::to_yaml`].
    pub fn from_yaml(source: &str) -> Result<Self, SiteConfigError> {
        serde_yaml::from_str(source).map_err(|e| SiteConfigError::Parse(e.to_string()))
    }

    /// Write the document to `path`, replacing any existing file.
    pub fn write_to(&self, path: &Path) -> Result<(), SiteConfigError> {
        let yaml = self.to_yaml()?;

        fs::write(path, yaml).map_err(|source| SiteConfigError::Write {
            path: path.display().to_string(),
            source,
        })?;

        tracing::info!("Wrote {}", path.display());
        Ok(())
    }
}

/// Errors that can occur when emitting the site configuration.
#[derive(Debug, thiserror::Error)]
pub enum SiteConfigError {
    #[error("Failed to serialize site config: {0}")]
    Serialize(String),

    #[error("Invalid YAML in site config: {0}")]
    Parse(String),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn renders_default_document() {
        let yaml = SiteConfig::default().to_yaml().unwrap();

        assert_eq!(
            yaml,
            "site_name: MkDocsPoC\n\
             site_url: https://docs.sitecore.com/demo/instanceID/\n\
             use_directory_urls: false\n\
             theme:\n  name: readthedocs\n"
        );
    }

    #[test]
    fn written_file_parses_back() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("mkdocs.yml");

        SiteConfig::default().write_to(&path).unwrap();

        let parsed = SiteConfig::from_yaml(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.site_name, "MkDocsPoC");
        assert_eq!(parsed.theme.name, "readthedocs");
        assert!(!parsed.use_directory_urls);
    }

    #[test]
    fn overwrites_existing_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("mkdocs.yml");
        fs::write(&path, "site_name: Stale\nextra: [1, 2, 3]\n").unwrap();

        let config = SiteConfig {
            site_name: "Fresh".to_string(),
            ..Default::default()
        };
        config.write_to(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("site_name: Fresh\n"));
        assert!(!content.contains("extra"));
    }

    #[test]
    fn errors_on_unwritable_destination() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("missing").join("mkdocs.yml");

        let result = SiteConfig::default().write_to(&path);

        assert!(matches!(result, Err(SiteConfigError::Write { .. })));
    }

    #[test]
    fn errors_on_invalid_yaml() {
        let result = SiteConfig::from_yaml("site_name: [unclosed");

        assert!(matches!(result, Err(SiteConfigError::Parse(_))));
    }
}
