//! Recording fakes shared by the integration tests.
//!
//! Every fake appends to one [`EventLog`] so tests can assert on the exact
//! interleaving of engine, graphics, module, and launcher calls.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use gpacap_capture_engine::bootstrap::{InstallLocation, ModuleLoader, MODULE_LOAD_ORDER};
use gpacap_capture_engine::{
    CaptureEngine, CaptureSessionController, CompanionLauncher, EngineStatus, GraphicsApi,
    GraphicsBackend, Notification, Notifier, ProcessMonitor,
};
use gpacap_common::error::{GpacapError, GpacapResult};
use gpacap_platform_core::{ProcessLauncher, ProcessTable, RegistryValue, SystemRegistry};

#[derive(Clone, Default)]
pub struct EventLog(Rc<RefCell<Vec<String>>>);

impl EventLog {
    pub fn push(&self, event: impl Into<String>) {
        self.0.borrow_mut().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn count(&self, event: &str) -> usize {
        self.0.borrow().iter().filter(|e| e.as_str() == event).count()
    }

    pub fn count_prefix(&self, prefix: &str) -> usize {
        self.0
            .borrow()
            .iter()
            .filter(|e| e.starts_with(prefix))
            .count()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

pub struct RecordingEngine {
    log: EventLog,
    status: EngineStatus,
}

impl CaptureEngine for RecordingEngine {
    fn initialize(&mut self) -> EngineStatus {
        self.log.push("engine:initialize");
        self.status
    }

    fn trigger_stream_capture(&mut self) {
        self.log.push("engine:trigger");
    }

    fn release(&mut self) {
        self.log.push("engine:release");
    }
}

pub struct FakeModule {
    name: String,
    log: EventLog,
}

impl Drop for FakeModule {
    fn drop(&mut self) {
        self.log.push(format!("unload:{}", self.name));
    }
}

/// Module loader that fails at a chosen position and hands out a
/// [`RecordingEngine`] when `engine_status` is set.
pub struct FakeLoader {
    pub log: EventLog,
    pub fail_at: Option<usize>,
    pub engine_status: Option<EngineStatus>,
    pub attempts: usize,
}

impl FakeLoader {
    pub fn new(log: &EventLog) -> Self {
        Self {
            log: log.clone(),
            fail_at: None,
            engine_status: Some(EngineStatus::Ok),
            attempts: 0,
        }
    }
}

impl ModuleLoader for FakeLoader {
    type Module = FakeModule;

    fn load(&mut self, path: &Path) -> GpacapResult<FakeModule> {
        let index = self.attempts;
        self.attempts += 1;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if self.fail_at == Some(index) {
            self.log.push(format!("load-failed:{name}"));
            return Err(GpacapError::module_load(path, "dependency missing"));
        }
        self.log.push(format!("load:{name}"));
        Ok(FakeModule {
            name,
            log: self.log.clone(),
        })
    }

    fn create_engine(
        &mut self,
        factory_module: &FakeModule,
        install: &InstallLocation,
    ) -> Option<Box<dyn CaptureEngine>> {
        self.log.push(format!(
            "factory:{}@{}",
            factory_module.name,
            install.path().display()
        ));
        self.engine_status.map(|status| {
            Box::new(RecordingEngine {
                log: self.log.clone(),
                status,
            }) as Box<dyn CaptureEngine>
        })
    }
}

pub struct RecordingGraphics {
    pub api: GraphicsApi,
    pub log: EventLog,
}

impl GraphicsBackend for RecordingGraphics {
    fn api(&self) -> GraphicsApi {
        self.api
    }

    fn set_ideal_capture_conditions(&mut self, enabled: bool) {
        self.log
            .push(if enabled { "ideal:enable" } else { "ideal:disable" });
    }
}

pub struct RecordingNotifier(pub EventLog);

impl Notifier for RecordingNotifier {
    fn notify(&mut self, notification: Notification) {
        self.0.push(format!("notify:{}", notification.message));
    }
}

#[derive(Default)]
pub struct FakeRegistry(pub HashMap<RegistryValue, String>);

impl FakeRegistry {
    pub fn with(mut self, value: RegistryValue, dir: &Path) -> Self {
        self.0.insert(value, dir.to_string_lossy().into_owned());
        self
    }
}

impl SystemRegistry for FakeRegistry {
    fn lookup(&self, value: RegistryValue) -> Option<String> {
        self.0.get(&value).cloned()
    }
}

/// Process table listing the given image paths under pids 1..=n.
pub struct FakeProcessTable(pub Vec<String>);

impl ProcessTable for FakeProcessTable {
    fn process_ids(&mut self) -> GpacapResult<Vec<u32>> {
        Ok((1..=self.0.len() as u32).collect())
    }

    fn image_path(&mut self, pid: u32) -> Option<String> {
        self.0.get(pid as usize - 1).cloned()
    }
}

pub struct RecordingLauncher(pub EventLog);

impl ProcessLauncher for RecordingLauncher {
    fn launch_elevated(&mut self, executable: &Path) -> GpacapResult<()> {
        self.0.push(format!("launch:{}", executable.display()));
        Ok(())
    }
}

/// Launcher whose every attempt fails, as when elevation is declined.
pub struct FailingLauncher(pub EventLog);

impl ProcessLauncher for FailingLauncher {
    fn launch_elevated(&mut self, executable: &Path) -> GpacapResult<()> {
        self.0.push(format!("launch-failed:{}", executable.display()));
        Err(GpacapError::launch(executable, "elevation declined"))
    }
}

/// Create `<dir>` holding empty files for every required module.
pub fn populate_install(dir: &Path) {
    std::fs::create_dir_all(dir).unwrap();
    for module in MODULE_LOAD_ORDER {
        std::fs::write(dir.join(module), b"").unwrap();
    }
}

/// Create `<dir>/GpaMonitor.exe`.
pub fn populate_monitor(dir: &Path) -> PathBuf {
    std::fs::create_dir_all(dir).unwrap();
    let exe = dir.join(gpacap_capture_engine::companion::MONITOR_EXECUTABLE);
    std::fs::write(&exe, b"").unwrap();
    exe
}

pub fn controller(
    log: &EventLog,
    api: GraphicsApi,
    monitor_dir: Option<&Path>,
    running: Vec<String>,
) -> CaptureSessionController {
    controller_with_launcher(
        log,
        api,
        monitor_dir,
        running,
        Box::new(RecordingLauncher(log.clone())),
    )
}

pub fn controller_with_launcher(
    log: &EventLog,
    api: GraphicsApi,
    monitor_dir: Option<&Path>,
    running: Vec<String>,
    launcher: Box<dyn ProcessLauncher>,
) -> CaptureSessionController {
    let registry = match monitor_dir {
        Some(dir) => FakeRegistry::default().with(RegistryValue::MonitorLocation, dir),
        None => FakeRegistry::default(),
    };
    let companion = CompanionLauncher::new(
        Box::new(registry),
        ProcessMonitor::new(Box::new(FakeProcessTable(running))),
        launcher,
    );
    CaptureSessionController::new(
        Box::new(RecordingGraphics {
            api,
            log: log.clone(),
        }),
        Box::new(RecordingNotifier(log.clone())),
    )
    .with_companion(companion)
}

/// Captures formatted log output so tests can count warnings.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn warnings(&self) -> usize {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes)
            .lines()
            .filter(|line| line.contains("WARN"))
            .count()
    }

    /// Run `f` with a thread-local subscriber writing into this buffer.
    pub fn record<R>(&self, f: impl FnOnce() -> R) -> R {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        tracing::subscriber::with_default(subscriber, f)
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
