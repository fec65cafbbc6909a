use crate::process::ContainerCommand;
use crate::session::Session;
use anyhow::Result;

/// Open the image's shell with the project mounted, wired to this terminal.
pub fn interactive(session: &mut Session) -> Result<()> {
    if !console::user_attended() {
        session
            .sink
            .warn("Not attached to a terminal; the container shell may refuse to start.")?;
    }
    session.run_container(ContainerCommand::Shell, true)
}
