//! State shared by every command of one run.

use crate::config::BuildConfig;
use crate::output::OutputSink;
use crate::process::{self, ContainerCommand, ContainerRuntime, Invocation};
use anyhow::Result;
use colored::*;

/// Context threaded through the chain runner and every command handler.
///
/// Only the orchestration thread holds it, so the prefix inside `sink` has
/// exactly one writer.
pub struct Session {
    pub sink: OutputSink,
    pub containers: ContainerRuntime,
    pub config: BuildConfig,
    /// Image used for container invocations; starts as the configured image.
    pub image: String,
    /// Echo every argument vector before launching it.
    pub verbose: bool,
    /// Print what would run instead of running it.
    pub dry_run: bool,
}

impl Session {
    pub fn new(sink: OutputSink, containers: ContainerRuntime, config: BuildConfig) -> Self {
        let image = config.container.image.clone();
        Self {
            sink,
            containers,
            config,
            image,
            verbose: false,
            dry_run: false,
        }
    }

    pub fn subtask(&mut self, name: &str, index: usize, total: usize) {
        self.sink.prefix_mut().enter_subtask(name, Some((index, total)));
    }

    /// Returns `false` when the invocation must not actually be launched.
    fn log_launch(&mut self, invocation: &Invocation) -> Result<bool> {
        if self.dry_run {
            self.sink
                .info(&format!("{} Would execute: {}", "→".dimmed(), invocation.display()))?;
            return Ok(false);
        }
        if self.verbose {
            self.sink
                .info(&format!("{} Running: {}", "→".dimmed(), invocation.display()))?;
        }
        Ok(true)
    }

    /// Run a process directly and fail the chain if it does not succeed.
    pub fn run(&mut self, invocation: Invocation) -> Result<()> {
        if !self.log_launch(&invocation)? {
            return Ok(());
        }
        let handle = invocation.run(&mut self.sink)?;
        process::check_success(&mut self.sink, &handle)
    }

    /// Run a command inside the session's container image and fail the chain
    /// if it does not succeed.
    pub fn run_container(&mut self, command: impl Into<ContainerCommand>, interactive: bool) -> Result<()> {
        let command = command.into();
        self.containers.announce(&mut self.sink)?;

        let invocation = self.containers.invocation(&self.image, &command, interactive);
        if !self.log_launch(&invocation)? {
            return Ok(());
        }

        let handle = invocation.run(&mut self.sink)?;
        process::check_success(&mut self.sink, &handle)
    }
}
