use crate::process::Invocation;
use crate::session::Session;
use anyhow::Result;

/// Flash the bitstream and the firmware image onto the board.
///
/// Runs on the host, not in the container: the programmer needs the USB device.
pub fn program(session: &mut Session) -> Result<()> {
    let invocation = programmer_invocation(session);
    session.run(invocation)
}

fn programmer_invocation(session: &Session) -> Invocation {
    let config = &session.config;
    Invocation::new(&config.device.programmer).args([
        "-p".to_string(),
        config.gateware.bitstream.clone(),
        "-u".to_string(),
        config.firmware.artifact("bin"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::capture_session;

    #[test]
    fn test_programmer_argv() {
        let (session, _out, _err) = capture_session("docker");
        let invocation = programmer_invocation(&session);
        assert_eq!(
            invocation.argv(),
            vec![
                "tinyprog",
                "-p",
                "build/nevercast_tinysoc_tinysoc_0.1/tinyfpga_bx-icestorm/nevercast_tinysoc_tinysoc_0.1.bin",
                "-u",
                "build/firmware/firmware.bin",
            ]
        );
        assert!(!invocation.is_interactive());
    }
}
