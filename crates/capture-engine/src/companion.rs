//! Companion monitor launch policy.

use std::path::PathBuf;

use gpacap_platform_core::{ProcessLauncher, RegistryValue, SystemRegistry};

use crate::host::{Notification, Notifier};
use crate::process::ProcessMonitor;

/// Executable name inside the registry-provided install directory.
pub const MONITOR_EXECUTABLE: &str = "GpaMonitor.exe";

/// What a launch attempt ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanionLaunch {
    /// Install location missing or executable absent.
    NotInstalled,
    AlreadyRunning,
    Launched,
    /// The launch call itself failed.
    Failed,
}

/// Starts the companion monitor after a capture if it is not already up.
pub struct CompanionLauncher {
    registry: Box<dyn SystemRegistry>,
    monitor: ProcessMonitor,
    launcher: Box<dyn ProcessLauncher>,
}

impl CompanionLauncher {
    pub fn new(
        registry: Box<dyn SystemRegistry>,
        monitor: ProcessMonitor,
        launcher: Box<dyn ProcessLauncher>,
    ) -> Self {
        Self {
            registry,
            monitor,
            launcher,
        }
    }

    /// Full path of the companion executable. Looked up again on every call.
    pub fn resolve_executable(&self) -> Option<PathBuf> {
        self.registry
            .lookup(RegistryValue::MonitorLocation)
            .map(|dir| PathBuf::from(dir).join(MONITOR_EXECUTABLE))
    }

    /// Whether the companion is running right now.
    pub fn is_running(&mut self) -> bool {
        match self.resolve_executable() {
            Some(path) => self.monitor.is_running(&path.to_string_lossy()),
            None => false,
        }
    }

    /// Launch the companion elevated unless it is already running.
    /// Failures are logged and reported in the return value only.
    pub fn launch_if_not_running(&mut self, notifier: &mut dyn Notifier) -> CompanionLaunch {
        let executable = match self.resolve_executable() {
            Some(path) if path.is_file() => path,
            _ => {
                tracing::warn!(
                    "Could not find valid Graphics Monitor location. Please verify GPA installation"
                );
                return CompanionLaunch::NotInstalled;
            }
        };

        if self.monitor.is_running(&executable.to_string_lossy()) {
            tracing::debug!(path = %executable.display(), "Graphics Monitor already running");
            return CompanionLaunch::AlreadyRunning;
        }

        notifier.notify(Notification::new("Starting Graphics Monitor in new window."));

        match self.launcher.launch_elevated(&executable) {
            Ok(()) => {
                tracing::info!(path = %executable.display(), "Started Graphics Monitor");
                CompanionLaunch::Launched
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to start Graphics Monitor application");
                CompanionLaunch::Failed
            }
        }
    }
}
