//! Command handlers.
//!
//! Each top-level command token maps to one [`CommandKind`] variant and one
//! handler function. Handlers build the argument vectors from the session's
//! [`BuildConfig`](crate::config::BuildConfig) and launch them through the
//! [`Session`], which applies the exit check.

pub mod device;
pub mod firmware;
pub mod gateware;
pub mod shell;

use crate::session::Session;
use anyhow::Result;
use clap::ValueEnum;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum CommandKind {
    /// Start an interactive container and open a shell
    Interactive,
    /// Compile the firmware into a flashable image
    Compile,
    /// Build a hardware image for the FPGA
    Build,
    /// Program the last built images to the FPGA board
    Program,
    /// Simulate the test bench
    Test,
}

impl CommandKind {
    pub fn parse(token: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(token, false).ok()
    }

    pub fn name(self) -> &'static str {
        match self {
            CommandKind::Interactive => "interactive",
            CommandKind::Compile => "compile",
            CommandKind::Build => "build",
            CommandKind::Program => "program",
            CommandKind::Test => "test",
        }
    }

    pub fn run(self, session: &mut Session) -> Result<()> {
        match self {
            CommandKind::Interactive => shell::interactive(session),
            CommandKind::Compile => firmware::compile(session),
            CommandKind::Build => gateware::build(session),
            CommandKind::Program => device::program(session),
            CommandKind::Test => gateware::test(session),
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
