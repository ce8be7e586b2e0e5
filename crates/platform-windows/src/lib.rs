//! Windows platform integration.
//!
//! - **Registry:** `HKEY_LOCAL_MACHINE` string lookups for the framework
//!   root and the companion monitor install directory
//! - **Launch:** elevated process start through the shell `runas` verb
//!
//! Non-Windows builds get compile-safe fallbacks so the rest of the
//! workspace can be developed and tested anywhere.

pub mod launch;
pub mod registry;

pub use launch::ShellLauncher;
pub use registry::WindowsRegistry;

#[cfg(windows)]
pub(crate) fn to_wide(value: &std::ffi::OsStr) -> Vec<u16> {
    use std::os::windows::ffi::OsStrExt;
    value.encode_wide().chain(std::iter::once(0)).collect()
}
