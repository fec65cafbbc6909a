//! FuseSoC targets run inside the container.

use crate::session::Session;
use anyhow::Result;

/// Synthesize, place and route the hardware image.
pub fn build(session: &mut Session) -> Result<()> {
    let target = session.config.gateware.hardware_target.clone();
    fusesoc_run(session, &target)
}

/// Run the simulation test bench.
pub fn test(session: &mut Session) -> Result<()> {
    let target = session.config.gateware.simulation_target.clone();
    fusesoc_run(session, &target)
}

fn fusesoc_command(target: &str, core: &str) -> String {
    format!("fusesoc run --target={} {}", target, core)
}

fn fusesoc_run(session: &mut Session, target: &str) -> Result<()> {
    let command = fusesoc_command(target, &session.config.gateware.core);
    session.run_container(command, false)
}
