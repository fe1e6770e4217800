//! External build tool invocation.

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Instant;

use tokio::process::Command;

/// Interpreter used when none is configured.
#[cfg(windows)]
pub const DEFAULT_INTERPRETER: &str = "C:\\Python310\\python.exe";

/// Interpreter used when none is configured.
#[cfg(not(windows))]
pub const DEFAULT_INTERPRETER: &str = "python3";

/// Suppresses the console window of the child on Windows.
#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Configuration for running the site build.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Python interpreter that runs the build module
    pub interpreter: PathBuf,

    /// Module passed to `-m`
    pub module: String,

    /// Subcommand passed to the module
    pub subcommand: String,

    /// Directory holding `mkdocs.yml` and the staging directory
    pub working_dir: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            interpreter: PathBuf::from(DEFAULT_INTERPRETER),
            module: "mkdocs".to_string(),
            subcommand: "build".to_string(),
            working_dir: PathBuf::from("."),
        }
    }
}

/// Captured result of a build run.
///
/// The exit status is recorded but never treated as an error.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    /// Everything the tool wrote to stdout
    pub stdout: String,

    /// Everything the tool wrote to stderr
    pub stderr: String,

    /// Exit code, if the process exited normally
    pub exit_code: Option<i32>,

    /// Whether the process reported success
    pub success: bool,

    /// Wall-clock run time in milliseconds
    pub duration_ms: u64,
}

impl BuildOutput {
    /// Write both streams to `out`, stderr first.
    pub fn write_report<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", self.stderr)?;
        writeln!(out, "{}", self.stdout)?;
        out.flush()
    }

    /// Relay both streams to this process's stdout, stderr first.
    pub fn report(&self) -> io::Result<()> {
        self.write_report(&mut io::stdout().lock())
    }
}

/// Errors that can occur when running the build tool.
#[derive(Debug, thiserror::Error)]
pub enum InvokeError {
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to wait for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Runs an external program and captures its output.
#[derive(Debug, Clone)]
pub struct BuildInvoker {
    program: OsString,
    args: Vec<OsString>,
    working_dir: PathBuf,
}

impl BuildInvoker {
    /// Create an invoker for `<interpreter> -m <module> <subcommand>`.
    pub fn new(config: &BuildConfig) -> Self {
        Self::from_command(
            &config.interpreter,
            ["-m", config.module.as_str(), config.subcommand.as_str()],
        )
        .working_dir(&config.working_dir)
    }

    /// Create an invoker for an arbitrary program and arguments.
    pub fn from_command<I, S>(program: impl Into<OsString>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            working_dir: PathBuf::from("."),
        }
    }

    /// Set the directory the program runs in.
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    /// Program and arguments, for display.
    pub fn command_line(&self) -> String {
        std::iter::once(&self.program)
            .chain(&self.args)
            .map(|s| s.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run the program to completion.
    ///
    /// Both pipes are drained concurrently, so a child that fills one stream
    /// while the other is unread cannot stall.
    pub async fn run(&self) -> Result<BuildOutput, InvokeError> {
        let start = Instant::now();
        let program = self.program.to_string_lossy().to_string();

        tracing::info!("Running {}", self.command_line());

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        #[cfg(windows)]
        command.creation_flags(CREATE_NO_WINDOW);

        let child = command.spawn().map_err(|e| InvokeError::Spawn {
            program: program.clone(),
            source: e,
        })?;

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| InvokeError::Wait { program, source: e })?;

        let result = BuildOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
            success: output.status.success(),
            duration_ms: start.elapsed().as_millis() as u64,
        };

        tracing::debug!(
            "Build tool exited with {} after {}ms",
            output.status,
            result.duration_ms
        );

        Ok(result)
    }
}
