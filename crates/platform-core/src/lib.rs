//! gpacap platform core contracts.
//!
//! This crate contains the OS-facing seams used by the capture engine
//! without coupling it to a concrete OS backend: system registry lookups,
//! the process table, and process launch.

use std::path::Path;

use gpacap_common::error::GpacapResult;

/// Registry values the capture runtime knows how to look up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryValue {
    /// Root directory of the capture framework install.
    FrameworkRoot,
    /// Install directory of the companion monitor application.
    MonitorLocation,
}

impl RegistryValue {
    /// Subkey under `HKEY_LOCAL_MACHINE`.
    pub fn subkey(self) -> &'static str {
        match self {
            Self::FrameworkRoot => {
                r"SYSTEM\CurrentControlSet\Control\Session Manager\Environment"
            }
            Self::MonitorLocation => r"SOFTWARE\Intel\Intel(R) Graphics Performance Analyzers",
        }
    }

    /// Value name within [`Self::subkey`].
    pub fn value_name(self) -> &'static str {
        match self {
            Self::FrameworkRoot => "INTEL_GPA_FRAMEWORK",
            Self::MonitorLocation => "Location",
        }
    }
}

/// System registry (or equivalent) lookup.
pub trait SystemRegistry {
    /// Returns the directory string stored under `value`, or `None` on a miss.
    /// Empty strings are reported as a miss.
    fn lookup(&self, value: RegistryValue) -> Option<String>;
}

/// Snapshot-style access to the OS process table.
pub trait ProcessTable {
    /// Enumerate live process identifiers.
    fn process_ids(&mut self) -> GpacapResult<Vec<u32>>;

    /// Full image path of `pid`, or `None` when the process cannot be
    /// queried (access denied, already exited).
    fn image_path(&mut self, pid: u32) -> Option<String>;
}

/// Launches external executables.
pub trait ProcessLauncher {
    /// Start `executable` as a new process with elevated rights.
    fn launch_elevated(&mut self, executable: &Path) -> GpacapResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_values_point_at_distinct_keys() {
        assert_ne!(
            RegistryValue::FrameworkRoot.subkey(),
            RegistryValue::MonitorLocation.subkey()
        );
        assert_eq!(
            RegistryValue::FrameworkRoot.value_name(),
            "INTEL_GPA_FRAMEWORK"
        );
        assert_eq!(RegistryValue::MonitorLocation.value_name(), "Location");
    }

    #[test]
    fn registry_values_key_a_lookup_table() {
        let mut table = std::collections::HashMap::new();
        table.insert(RegistryValue::FrameworkRoot, "root");
        table.insert(RegistryValue::MonitorLocation, "monitor");
        assert_eq!(table[&RegistryValue::FrameworkRoot], "root");
    }
}
