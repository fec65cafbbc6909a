//! Firmware cross-compilation.
//!
//! Three subtasks: create the output directory, compile and link the ELF with
//! the container's RISC-V GCC, then strip it to a raw binary for the programmer.

use crate::config::FirmwareConfig;
use crate::session::Session;
use anyhow::{Context, Result};
use std::fs;

const SUBTASKS: usize = 3;

pub fn compile(session: &mut Session) -> Result<()> {
    let firmware = session.config.firmware.clone();

    session.subtask("init", 1, SUBTASKS);
    if session.dry_run {
        session
            .sink
            .info(&format!("Would create {}", firmware.output_dir))?;
    } else {
        fs::create_dir_all(&firmware.output_dir)
            .with_context(|| format!("Failed to create {}", firmware.output_dir))?;
    }

    session.subtask("gcc", 2, SUBTASKS);
    session.run_container(gcc_command(&firmware), false)?;

    session.subtask("objcopy", 3, SUBTASKS);
    session.run_container(objcopy_command(&firmware), false)
}

fn gcc_command(firmware: &FirmwareConfig) -> Vec<String> {
    let linker_flags = format!(
        "-Wl,-Bstatic,-T,{},--strip-debug,-Map={},--cref",
        firmware.linker_script,
        firmware.artifact("map")
    );
    let mut command = vec![
        firmware.tool("gcc"),
        "-v".to_string(),
        format!("-march={}", firmware.march),
        "-nostartfiles".to_string(),
        linker_flags,
        "-ffreestanding".to_string(),
        "-nostdlib".to_string(),
        "-o".to_string(),
        firmware.artifact("elf"),
    ];
    command.extend(firmware.sources.iter().cloned());
    command
}

fn objcopy_command(firmware: &FirmwareConfig) -> Vec<String> {
    vec![
        firmware.tool("objcopy"),
        "-v".to_string(),
        "-O".to_string(),
        "binary".to_string(),
        firmware.artifact("elf"),
        firmware.artifact("bin"),
    ]
}
