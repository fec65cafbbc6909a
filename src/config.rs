//! Project configuration (`socbuild.toml`).
//!
//! Every section is optional; the defaults describe the stock tinysoc project
//! on a TinyFPGA BX. A minimal override looks like:
//!
//! ```toml
//! [container]
//! runtime = "podman"
//!
//! [device]
//! programmer = "/usr/local/bin/tinyprog"
//! ```

use crate::errors::BuildError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "socbuild.toml";

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    pub container: ContainerConfig,
    pub gateware: GatewareConfig,
    pub firmware: FirmwareConfig,
    pub device: DeviceConfig,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ContainerConfig {
    /// Container CLI, invoked as `<runtime> run --rm -it -v ...`.
    pub runtime: String,
    pub image: String,
    /// Where the project directory appears inside the container.
    pub mount_point: String,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            runtime: "docker".to_string(),
            image: "nevercast/tinysoc:latest".to_string(),
            mount_point: "/workspace".to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GatewareConfig {
    /// FuseSoC core name (VLNV).
    pub core: String,
    pub hardware_target: String,
    pub simulation_target: String,
    /// Bitstream produced by the hardware target, relative to the project root.
    pub bitstream: String,
}

impl Default for GatewareConfig {
    fn default() -> Self {
        Self {
            core: "nevercast:tinysoc:tinysoc".to_string(),
            hardware_target: "tinyfpga_bx".to_string(),
            simulation_target: "sim".to_string(),
            bitstream: "build/nevercast_tinysoc_tinysoc_0.1/tinyfpga_bx-icestorm/nevercast_tinysoc_tinysoc_0.1.bin"
                .to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FirmwareConfig {
    /// Directory holding the cross toolchain inside the container, with a
    /// trailing slash (or empty to rely on `PATH`).
    pub toolchain_prefix: String,
    pub triple: String,
    pub march: String,
    pub output_dir: String,
    pub image_name: String,
    pub linker_script: String,
    pub sources: Vec<String>,
}

impl Default for FirmwareConfig {
    fn default() -> Self {
        Self {
            toolchain_prefix: "/opt/riscv32i/bin/".to_string(),
            triple: "riscv32-unknown-elf".to_string(),
            march: "rv32imc".to_string(),
            output_dir: "build/firmware/".to_string(),
            image_name: "firmware".to_string(),
            linker_script: "firmware/sections.lds".to_string(),
            sources: vec!["firmware/start.S".to_string(), "firmware/entry.c".to_string()],
        }
    }
}

impl FirmwareConfig {
    pub fn tool(&self, name: &str) -> String {
        format!("{}{}-{}", self.toolchain_prefix, self.triple, name)
    }

    /// Path of a firmware artifact, e.g. `artifact("elf")`.
    pub fn artifact(&self, extension: &str) -> String {
        let dir = self.output_dir.trim_end_matches('/');
        if dir.is_empty() {
            format!("{}.{}", self.image_name, extension)
        } else {
            format!("{}/{}.{}", dir, self.image_name, extension)
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DeviceConfig {
    pub programmer: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            programmer: "tinyprog".to_string(),
        }
    }
}

/// Load the build configuration.
///
/// An explicit `path` must exist. Without one, `socbuild.toml` in the current
/// directory is used when present, and the defaults otherwise.
pub fn load_config(path: Option<&Path>) -> Result<BuildConfig, BuildError> {
    let path: PathBuf = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let implicit = PathBuf::from(CONFIG_FILE);
            if !implicit.exists() {
                return Ok(BuildConfig::default());
            }
            implicit
        }
    };

    let text = fs::read_to_string(&path).map_err(|source| BuildError::ConfigRead {
        path: path.clone(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| BuildError::ConfigParse { path, source })
}
