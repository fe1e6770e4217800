//! Stage, build, clean up.

use anyhow::{Context, Result};
use docstage_build::BuildInvoker;
use docstage_scenarios::{collect, StagingDir};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::config::AppConfig;

/// Per-run options taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Scenario tags to publish; empty means all
    pub selectors: Vec<String>,

    /// Wait for Enter before removing the staging directory
    pub pause: bool,

    /// Skip removing the staging directory
    pub keep_staging: bool,
}

/// Run the whole publish flow.
///
/// Nothing is rolled back on failure: a run that stops early leaves the
/// written `mkdocs.yml` and any copied files behind.
pub async fn run(config: &AppConfig, options: &RunOptions) -> Result<()> {
    tracing::info!("Staging documentation in {}", config.root.display());

    config
        .site
        .write_to(&config.mkdocs_config)
        .context("Failed to write MkDocs config")?;

    let staging = StagingDir::create(&config.staging_dir)?;
    staging
        .copy_home_page(&config.home_page)
        .context("Failed to stage home page")?;

    let stats = collect(&config.catalog, &options.selectors, staging.path())
        .context("Failed to stage scenarios")?;
    tracing::info!(
        "Staged {} files ({} bytes) in {} directories",
        stats.files,
        stats.bytes,
        stats.directories
    );

    let output = BuildInvoker::new(&config.build).run().await?;
    output.report()?;

    if options.pause {
        wait_for_enter().await?;
    }

    if options.keep_staging {
        tracing::info!("Keeping {}", staging.path().display());
    } else {
        staging.remove()?;
    }

    Ok(())
}

async fn wait_for_enter() -> Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(b"Press Enter to exit.\n").await?;
    stdout.flush().await?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await?;
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::config::load_config;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use tempfile::tempdir;

    /// Lay out `<root>/bin` next to `<root>/scenarios` and point the config
    /// at a fake interpreter that records the staged files and its arguments.
    fn fixture(root: &Path) -> AppConfig {
        let scenarios = root.join("scenarios");
        let bin = root.join("bin");
        fs::create_dir_all(&bin).unwrap();
        fs::create_dir_all(&scenarios).unwrap();
        fs::write(scenarios.join("index.md"), "# Home").unwrap();
        for tag in ["xm", "search", "dam"] {
            let dir = scenarios.join(tag).join(tag);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("overview.md"), format!("# {tag}")).unwrap();
        }

        let interpreter = root.join("fake-python");
        fs::write(
            &interpreter,
            "#!/bin/sh\nfind docs -type f | sort > build.log\necho \"$@\" >> build.log\n",
        )
        .unwrap();
        fs::set_permissions(&interpreter, fs::Permissions::from_mode(0o755)).unwrap();

        fs::write(
            bin.join("docstage.toml"),
            format!(
                r#"
[paths]
scenarios = "../scenarios"

[builder]
interpreter = "{}"

[[scenarios]]
tag = "xm"

[[scenarios]]
tag = "search"

[[scenarios]]
tag = "dam"
"#,
                interpreter.display()
            ),
        )
        .unwrap();

        let file = load_config(None, &bin).unwrap();
        AppConfig::resolve(file, bin).unwrap()
    }

    fn options(selectors: &[&str]) -> RunOptions {
        RunOptions {
            selectors: selectors.iter().map(|s| s.to_string()).collect(),
            pause: false,
            keep_staging: false,
        }
    }

    #[tokio::test]
    async fn publishes_selected_scenarios_and_cleans_up() {
        let temp = tempdir().unwrap();
        let app = fixture(temp.path());

        run(&app, &options(&["search", "bogus", "xm"])).await.unwrap();

        let log = fs::read_to_string(app.root.join("build.log")).unwrap();
        assert_eq!(
            log,
            "docs/index.md\ndocs/search/overview.md\ndocs/xm/overview.md\n-m mkdocs build\n"
        );
        assert!(app.root.join("mkdocs.yml").is_file());
        assert!(!app.staging_dir.exists());
    }

    #[tokio::test]
    async fn publishes_everything_without_selectors() {
        let temp = tempdir().unwrap();
        let app = fixture(temp.path());

        run(&app, &options(&[])).await.unwrap();

        let log = fs::read_to_string(app.root.join("build.log")).unwrap();
        assert!(log.contains("docs/dam/overview.md"));
        assert!(log.contains("docs/search/overview.md"));
        assert!(log.contains("docs/xm/overview.md"));
    }

    #[tokio::test]
    async fn keeps_staging_when_asked() {
        let temp = tempdir().unwrap();
        let app = fixture(temp.path());
        let opts = RunOptions {
            keep_staging: true,
            ..options(&["dam"])
        };

        run(&app, &opts).await.unwrap();

        assert!(app.staging_dir.join("index.md").is_file());
        assert!(app.staging_dir.join("dam/overview.md").is_file());
    }

    #[tokio::test]
    async fn missing_scenario_stops_before_build() {
        let temp = tempdir().unwrap();
        let app = fixture(temp.path());
        fs::remove_dir_all(temp.path().join("scenarios").join("search")).unwrap();

        let result = run(&app, &options(&["xm", "search", "dam"])).await;

        assert!(result.is_err());
        assert!(app.staging_dir.join("xm/overview.md").is_file());
        assert!(!app.staging_dir.join("dam").exists());
        assert!(!app.root.join("build.log").exists());
    }

    #[tokio::test]
    async fn missing_interpreter_fails_the_run() {
        let temp = tempdir().unwrap();
        let mut app = fixture(temp.path());
        app.build.interpreter = temp.path().join("no-python");

        let result = run(&app, &options(&["xm"])).await;

        assert!(result.is_err());
        assert!(app.staging_dir.exists());
    }
}
