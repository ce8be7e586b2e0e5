//! Process table scan for the companion monitor.

use gpacap_common::error::{GpacapError, GpacapResult};
use gpacap_platform_core::ProcessTable;
use sysinfo::{Pid, ProcessRefreshKind, System, UpdateKind};

/// Upper bound on process identifiers inspected per scan.
pub const DEFAULT_SNAPSHOT_LIMIT: usize = 1024;

/// Answers "is this executable running?" from a process table snapshot.
pub struct ProcessMonitor {
    table: Box<dyn ProcessTable>,
    snapshot_limit: usize,
}

impl ProcessMonitor {
    pub fn new(table: Box<dyn ProcessTable>) -> Self {
        Self {
            table,
            snapshot_limit: DEFAULT_SNAPSHOT_LIMIT,
        }
    }

    /// Monitor over the live OS process table.
    pub fn system() -> Self {
        Self::new(Box::new(SystemProcessTable::new()))
    }

    pub fn with_snapshot_limit(mut self, limit: usize) -> Self {
        self.snapshot_limit = limit;
        self
    }

    /// Whether a process whose full image path equals `target_image_path`
    /// (exact, case-sensitive) is running.
    ///
    /// Processes that cannot be queried are skipped. Only the first
    /// `snapshot_limit` identifiers are inspected. If the table cannot be
    /// enumerated at all the answer is `false`.
    pub fn is_running(&mut self, target_image_path: &str) -> bool {
        let pids = match self.table.process_ids() {
            Ok(pids) => pids,
            Err(e) => {
                tracing::debug!(error = %e, "Process enumeration failed; assuming not running");
                return false;
            }
        };

        if pids.len() > self.snapshot_limit {
            tracing::debug!(
                total = pids.len(),
                limit = self.snapshot_limit,
                "Process table exceeds snapshot; scanning captured subset"
            );
        }

        let table = &mut self.table;
        pids.into_iter()
            .take(self.snapshot_limit)
            .filter(|&pid| pid != 0)
            .filter_map(|pid| table.image_path(pid))
            .any(|image| image == target_image_path)
    }
}

/// Process table backed by `sysinfo`.
pub struct SystemProcessTable {
    system: System,
}

impl SystemProcessTable {
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }
}

impl Default for SystemProcessTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessTable for SystemProcessTable {
    fn process_ids(&mut self) -> GpacapResult<Vec<u32>> {
        self.system.refresh_processes_specifics(
            ProcessRefreshKind::new().with_exe(UpdateKind::OnlyIfNotSet),
        );
        let pids: Vec<u32> = self
            .system
            .processes()
            .keys()
            .map(|pid| pid.as_u32())
            .collect();
        if pids.is_empty() {
            return Err(GpacapError::platform("process table could not be read"));
        }
        Ok(pids)
    }

    fn image_path(&mut self, pid: u32) -> Option<String> {
        self.system
            .process(Pid::from_u32(pid))
            .and_then(|process| process.exe())
            .map(|exe| exe.to_string_lossy().into_owned())
    }
}
