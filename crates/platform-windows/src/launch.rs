//! Elevated process launch.

use std::path::Path;

use gpacap_common::error::{GpacapError, GpacapResult};
use gpacap_platform_core::ProcessLauncher;

/// Starts executables through the shell with the `runas` verb, so the user
/// is prompted for elevation. Off Windows the process is spawned directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellLauncher;

impl ShellLauncher {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessLauncher for ShellLauncher {
    fn launch_elevated(&mut self, executable: &Path) -> GpacapResult<()> {
        tracing::debug!(path = %executable.display(), "Launching elevated process");
        shell_execute(executable)
    }
}

#[cfg(windows)]
fn shell_execute(executable: &Path) -> GpacapResult<()> {
    use windows::core::{w, PCWSTR};
    use windows::Win32::Foundation::CloseHandle;
    use windows::Win32::UI::Shell::{ShellExecuteExW, SEE_MASK_NOCLOSEPROCESS, SHELLEXECUTEINFOW};
    use windows::Win32::UI::WindowsAndMessaging::SW_SHOW;

    let file = crate::to_wide(executable.as_os_str());
    let mut info = SHELLEXECUTEINFOW {
        cbSize: std::mem::size_of::<SHELLEXECUTEINFOW>() as u32,
        fMask: SEE_MASK_NOCLOSEPROCESS,
        lpVerb: w!("runas"),
        lpFile: PCWSTR(file.as_ptr()),
        lpParameters: w!(""),
        nShow: SW_SHOW.0,
        ..Default::default()
    };

    // SAFETY: `info` is fully initialised and `file` outlives the call.
    unsafe { ShellExecuteExW(&mut info) }
        .map_err(|e| GpacapError::launch(executable, e.to_string()))?;

    if !info.hProcess.is_invalid() {
        // SAFETY: handle was returned to us because of SEE_MASK_NOCLOSEPROCESS.
        unsafe {
            let _ = CloseHandle(info.hProcess);
        }
    }
    Ok(())
}

#[cfg(not(windows))]
fn shell_execute(executable: &Path) -> GpacapResult<()> {
    tracing::debug!("Elevation is not available on this platform; spawning directly");
    std::process::Command::new(executable)
        .spawn()
        .map(|_| ())
        .map_err(|e| GpacapError::launch(executable, e.to_string()))
}

#[cfg(all(test, not(windows)))]
mod tests {
    use super::*;

    #[test]
    fn missing_executable_reports_launch_error() {
        let dir = std::env::temp_dir().join("gpacap_no_such_dir");
        let err = ShellLauncher::new()
            .launch_elevated(&dir.join("GpaMonitor.exe"))
            .unwrap_err();
        assert!(matches!(err, GpacapError::Launch { .. }));
    }
}
