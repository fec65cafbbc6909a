//! Launching and supervising external processes.
//!
//! - [`drain`] - per-stream reader threads and non-blocking queue draining
//! - [`invoke`] - direct invocations, interactive or captured
//! - [`container`] - invocations wrapped in a container run
//! - [`exit`] - turning exit statuses into chain failures

pub mod container;
pub mod drain;
pub mod exit;
pub mod invoke;

pub use container::{ContainerCommand, ContainerRuntime};
pub use exit::{check, check_success};
pub use invoke::{ExitOutcome, Invocation, ProcessHandle};
