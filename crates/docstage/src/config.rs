//! Configuration loading and path resolution.
//!
//! Every path a run touches is resolved here once, against the working root,
//! and handed to the components as an [`AppConfig`].

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use docstage_build::invoker::DEFAULT_INTERPRETER;
use docstage_build::BuildConfig;
use docstage_mkdocs::{SiteConfig, Theme};
use docstage_scenarios::ScenarioCatalog;
use serde::Deserialize;

/// Config file name looked up in the root when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "docstage.toml";

/// Configuration file structure (docstage.toml).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    paths: PathsConfig,
    #[serde(default)]
    site: SiteSettings,
    #[serde(default)]
    builder: BuilderSettings,
    /// Replaces the default catalog when present
    scenarios: Option<Vec<ScenarioEntry>>,
}

#[derive(Debug, Deserialize)]
struct PathsConfig {
    #[serde(default = "default_scenarios_dir")]
    scenarios: String,
    #[serde(default = "default_staging_dir")]
    staging: String,
    #[serde(default = "default_home_page")]
    home_page: String,
    #[serde(default = "default_mkdocs_config")]
    mkdocs_config: String,
}

#[derive(Debug, Deserialize)]
struct SiteSettings {
    #[serde(default = "default_site_name")]
    name: String,
    #[serde(default = "default_site_url")]
    url: String,
    #[serde(default)]
    use_directory_urls: bool,
    #[serde(default = "default_theme")]
    theme: String,
}

#[derive(Debug, Deserialize)]
struct BuilderSettings {
    #[serde(default = "default_interpreter")]
    interpreter: String,
    #[serde(default = "default_module")]
    module: String,
    #[serde(default = "default_subcommand")]
    subcommand: String,
}

#[derive(Debug, Deserialize)]
struct ScenarioEntry {
    tag: String,
    /// Relative to `paths.scenarios`; defaults to the tag name
    path: Option<String>,
}

fn default_scenarios_dir() -> String {
    "../../../scenarios".to_string()
}
fn default_staging_dir() -> String {
    "docs".to_string()
}
fn default_home_page() -> String {
    "index.md".to_string()
}
fn default_mkdocs_config() -> String {
    "mkdocs.yml".to_string()
}
fn default_site_name() -> String {
    docstage_mkdocs::site::DEFAULT_SITE_NAME.to_string()
}
fn default_site_url() -> String {
    docstage_mkdocs::site::DEFAULT_SITE_URL.to_string()
}
fn default_theme() -> String {
    docstage_mkdocs::site::DEFAULT_THEME.to_string()
}
fn default_interpreter() -> String {
    DEFAULT_INTERPRETER.to_string()
}
fn default_module() -> String {
    "mkdocs".to_string()
}
fn default_subcommand() -> String {
    "build".to_string()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            scenarios: default_scenarios_dir(),
            staging: default_staging_dir(),
            home_page: default_home_page(),
            mkdocs_config: default_mkdocs_config(),
        }
    }
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            name: default_site_name(),
            url: default_site_url(),
            use_directory_urls: false,
            theme: default_theme(),
        }
    }
}

impl Default for BuilderSettings {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
            module: default_module(),
            subcommand: default_subcommand(),
        }
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Working root
    pub root: PathBuf,

    /// Staging directory MkDocs reads its pages from
    pub staging_dir: PathBuf,

    /// Home page copied into the staging directory
    pub home_page: PathBuf,

    /// Where `mkdocs.yml` is written
    pub mkdocs_config: PathBuf,

    /// Site document contents
    pub site: SiteConfig,

    /// Scenarios available to the run
    pub catalog: ScenarioCatalog,

    /// External build invocation
    pub build: BuildConfig,
}

impl AppConfig {
    /// Resolve a config file against `root`.
    pub fn resolve(file: ConfigFile, root: PathBuf) -> Result<Self> {
        let scenarios_dir = root.join(&file.paths.scenarios);

        let catalog = match file.scenarios {
            Some(entries) => {
                let mut catalog = ScenarioCatalog::new();
                for entry in entries {
                    let path = entry.path.unwrap_or_else(|| entry.tag.clone());
                    catalog
                        .insert(entry.tag, scenarios_dir.join(path))
                        .context("Invalid [[scenarios]] list")?;
                }
                catalog
            }
            None => ScenarioCatalog::with_default_tags(&scenarios_dir),
        };

        Ok(Self {
            staging_dir: root.join(&file.paths.staging),
            home_page: scenarios_dir.join(&file.paths.home_page),
            mkdocs_config: root.join(&file.paths.mkdocs_config),
            site: SiteConfig {
                site_name: file.site.name,
                site_url: file.site.url,
                use_directory_urls: file.site.use_directory_urls,
                theme: Theme {
                    name: file.site.theme,
                },
            },
            catalog,
            build: BuildConfig {
                interpreter: PathBuf::from(file.builder.interpreter),
                module: file.builder.module,
                subcommand: file.builder.subcommand,
                working_dir: root.clone(),
            },
            root,
        })
    }
}

/// Directory containing the running executable.
pub fn executable_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Failed to locate the executable")?;
    exe.parent()
        .map(Path::to_path_buf)
        .context("Executable has no parent directory")
}

/// Load configuration from `explicit`, or from `<root>/docstage.toml` if it exists.
/// Returns an error if a config file is named but missing, or is malformed.
pub fn load_config(explicit: Option<&Path>, root: &Path) -> Result<ConfigFile> {
    let config_path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = root.join(CONFIG_FILE_NAME);
            if !path.exists() {
                return Ok(ConfigFile::default());
            }
            path
        }
    };

    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;
    let config: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", config_path.display()))?;
    tracing::info!("Loaded config from {}", config_path.display());

    Ok(config)
}
