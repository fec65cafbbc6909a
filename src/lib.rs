//! # socbuild - Build Orchestrator for an FPGA SoC
//!
//! socbuild chains the steps of a RISC-V SoC project on an FPGA board:
//! hardware synthesis and simulation (FuseSoC in a container), firmware
//! cross-compilation (GCC in the same container) and programming the board
//! (on the host).
//!
//! ## Quick Start
//!
//! ```bash
//! # Compile the firmware, build the bitstream, flash both
//! socbuild compile build program
//!
//! # Use a different image
//! socbuild container_name=me/tinysoc:dev test
//! ```
//!
//! Output of every step is streamed live, each line prefixed with the step
//! it came from (`[2/3] build: ...`). The first failing step ends the run
//! with that step's exit code.
//!
//! ## Module Organization
//!
//! - [`chain`] - Command-line parsing and the command chain runner
//! - [`commands`] - Per-command handlers
//! - [`process`] - Process launching, output capture and exit checks
//! - [`output`] - Prefixed output sink

/// Command-line chain parsing and sequencing.
pub mod chain;

/// Command handlers (`compile`, `build`, `test`, `program`, `interactive`).
pub mod commands;

/// Configuration file parsing (`socbuild.toml`).
pub mod config;

/// Typed errors.
pub mod errors;

/// Prefixed stdout/stderr sink.
pub mod output;

/// Process and container invocation.
pub mod process;

/// Per-run context shared by all commands.
pub mod session;
