//! Containerized invocations.
//!
//! The project directory is bind-mounted into the container so toolchains
//! inside it read sources and write artifacts in place.

use super::invoke::{Invocation, ProcessHandle};
use crate::config::ContainerConfig;
use crate::output::OutputSink;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// What to run inside the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerCommand {
    /// The image's default entry point (usually a shell).
    Shell,
    /// Pre-split arguments, passed through untouched.
    Tokens(Vec<String>),
    /// A command line split on whitespace. No quoting support.
    Line(String),
}

impl ContainerCommand {
    pub fn tokens(&self) -> Vec<String> {
        match self {
            ContainerCommand::Shell => Vec::new(),
            ContainerCommand::Tokens(tokens) => tokens.clone(),
            ContainerCommand::Line(line) => line.split_whitespace().map(str::to_string).collect(),
        }
    }
}

impl From<&str> for ContainerCommand {
    fn from(line: &str) -> Self {
        ContainerCommand::Line(line.to_string())
    }
}

impl From<String> for ContainerCommand {
    fn from(line: String) -> Self {
        ContainerCommand::Line(line)
    }
}

impl From<Vec<String>> for ContainerCommand {
    fn from(tokens: Vec<String>) -> Self {
        ContainerCommand::Tokens(tokens)
    }
}

impl From<&[&str]> for ContainerCommand {
    fn from(tokens: &[&str]) -> Self {
        ContainerCommand::Tokens(tokens.iter().map(|t| t.to_string()).collect())
    }
}

/// Builds `<runtime> run` invocations that mount the workspace.
///
/// The mount is announced the first time this runtime launches anything.
#[derive(Debug)]
pub struct ContainerRuntime {
    program: String,
    workspace: PathBuf,
    mount_point: String,
    announced: bool,
}

impl ContainerRuntime {
    pub fn new(program: impl Into<String>, workspace: impl Into<PathBuf>, mount_point: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            workspace: workspace.into(),
            mount_point: mount_point.into(),
            announced: false,
        }
    }

    /// Runtime mounting the current directory, as configured.
    pub fn from_config(config: &ContainerConfig) -> Result<Self> {
        let workspace = std::env::current_dir().context("Failed to resolve current directory")?;
        Ok(Self::new(&config.runtime, workspace, &config.mount_point))
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    pub fn invocation(&self, image: &str, command: &ContainerCommand, interactive: bool) -> Invocation {
        Invocation::new(&self.program)
            .args(["run", "--rm", "-it", "-v"])
            .arg(format!("{}:{}", self.workspace.display(), self.mount_point))
            .arg(image)
            .args(command.tokens())
            .interactive(interactive)
    }

    /// Emit the one-time mount notice if it has not been shown yet.
    pub fn announce(&mut self, sink: &mut OutputSink) -> Result<()> {
        if !self.announced {
            sink.info(&format!(
                "Mounting {} to {} in container.",
                self.workspace.display(),
                self.mount_point
            ))?;
            self.announced = true;
        }
        Ok(())
    }

    pub fn invoke(
        &mut self,
        sink: &mut OutputSink,
        image: &str,
        command: &ContainerCommand,
        interactive: bool,
    ) -> Result<ProcessHandle> {
        self.announce(sink)?;
        self.invocation(image, command, interactive).run(sink)
    }
}
