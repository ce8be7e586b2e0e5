//! Stream capture session control.

use gpacap_common::clock::SessionClock;

use crate::command::StreamCaptureCommand;
use crate::companion::{CompanionLaunch, CompanionLauncher};
use crate::engine::{CaptureEngine, EngineStatus};
use crate::host::{GraphicsBackend, Notification, Notifier};

const MSG_STARTING: &str = "Starting GPA stream capture.";
const MSG_STOPPED: &str = "Stopped GPA stream capture.";
const MSG_ALREADY_RUNNING: &str = "GPA capture session already running.";
const MSG_NOT_RUNNING: &str =
    "No GPA capture session running. Start new session to capture stream.";
const MSG_UNSUPPORTED_BACKEND: &str =
    "Currently only DX12 stream capture is supported.\nPlease change RHI to DX12 and restart editor.";

/// State of the capture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureSessionState {
    #[default]
    Idle,
    Capturing,
}

/// What a capture request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Malformed request, dropped without a trace.
    Ignored,
    /// Capture library not usable.
    Unavailable,
    UnsupportedBackend,
    AlreadyCapturing,
    NotCapturing,
    Started,
    Stopped,
}

/// Gates capture start/stop on engine capability and the graphics backend,
/// and toggles ideal capture conditions around the capture window.
///
/// Requests are expected to arrive serialized from the host's main thread.
pub struct CaptureSessionController {
    engine: Option<Box<dyn CaptureEngine>>,
    capable: bool,
    state: CaptureSessionState,
    graphics: Box<dyn GraphicsBackend>,
    notifier: Box<dyn Notifier>,
    companion: Option<CompanionLauncher>,
    run_monitor_after_capture: bool,
    clock: Option<SessionClock>,
}

impl CaptureSessionController {
    /// Create an idle controller with no engine attached.
    pub fn new(graphics: Box<dyn GraphicsBackend>, notifier: Box<dyn Notifier>) -> Self {
        Self {
            engine: None,
            capable: false,
            state: CaptureSessionState::Idle,
            graphics,
            notifier,
            companion: None,
            run_monitor_after_capture: false,
            clock: None,
        }
    }

    pub fn with_companion(mut self, companion: CompanionLauncher) -> Self {
        self.companion = Some(companion);
        self
    }

    /// Take ownership of `engine` and initialize it once.
    ///
    /// Capture becomes available only if initialization succeeds. Either
    /// way the engine is kept so it can be released at shutdown.
    pub fn attach_engine(&mut self, mut engine: Box<dyn CaptureEngine>) -> EngineStatus {
        if let Some(mut previous) = self.engine.take() {
            previous.release();
        }

        let status = engine.initialize();
        match status {
            EngineStatus::Ok => tracing::info!("GPA capture library initialized"),
            EngineStatus::NotSupported => {
                tracing::warn!("GPA capture library not supported on this API or platform")
            }
            EngineStatus::Failed => tracing::warn!("Failed to initialize GPA capture library"),
        }

        self.capable = status.is_ok();
        self.engine = Some(engine);
        status
    }

    pub fn state(&self) -> CaptureSessionState {
        self.state
    }

    pub fn is_capable(&self) -> bool {
        self.capable
    }

    pub fn run_monitor_after_capture(&self) -> bool {
        self.run_monitor_after_capture
    }

    pub fn set_run_monitor_after_capture(&mut self, enabled: bool) {
        self.run_monitor_after_capture = enabled;
    }

    /// Handle the `gpa.StreamCapture` console command.
    ///
    /// Anything but exactly one `start`/`stop` token is silently ignored.
    pub fn handle_command(&mut self, args: &[&str]) -> CommandOutcome {
        match StreamCaptureCommand::parse(args) {
            Some(command) => self.execute(command),
            None => CommandOutcome::Ignored,
        }
    }

    /// Toolbar action: stop if capturing, start otherwise.
    pub fn toggle(&mut self) -> CommandOutcome {
        match self.state {
            CaptureSessionState::Capturing => self.execute(StreamCaptureCommand::Stop),
            CaptureSessionState::Idle => self.execute(StreamCaptureCommand::Start),
        }
    }

    pub fn start(&mut self) -> CommandOutcome {
        self.execute(StreamCaptureCommand::Start)
    }

    pub fn stop(&mut self) -> CommandOutcome {
        self.execute(StreamCaptureCommand::Stop)
    }

    fn execute(&mut self, command: StreamCaptureCommand) -> CommandOutcome {
        if !self.capable {
            tracing::warn!(%command, "GPA capture library unavailable; ignoring stream capture request");
            return CommandOutcome::Unavailable;
        }

        let api = self.graphics.api();
        if !api.is_capture_supported() {
            tracing::warn!(%api, %command, "Stream capture requested on unsupported graphics API");
            self.notify(MSG_UNSUPPORTED_BACKEND);
            return CommandOutcome::UnsupportedBackend;
        }

        match command {
            StreamCaptureCommand::Start => self.begin_capture(),
            StreamCaptureCommand::Stop => self.end_capture(),
        }
    }

    fn begin_capture(&mut self) -> CommandOutcome {
        if self.state == CaptureSessionState::Capturing {
            self.notify(MSG_ALREADY_RUNNING);
            return CommandOutcome::AlreadyCapturing;
        }

        self.state = CaptureSessionState::Capturing;
        self.notify(MSG_STARTING);

        self.graphics.set_ideal_capture_conditions(true);
        if let Some(engine) = self.engine.as_mut() {
            engine.trigger_stream_capture();
        }

        let clock = SessionClock::start();
        tracing::info!(started_at = %clock.epoch_wall(), "GPA stream capture started");
        self.clock = Some(clock);

        CommandOutcome::Started
    }

    fn end_capture(&mut self) -> CommandOutcome {
        if self.state == CaptureSessionState::Idle {
            self.notify(MSG_NOT_RUNNING);
            return CommandOutcome::NotCapturing;
        }

        self.state = CaptureSessionState::Idle;
        self.notify(MSG_STOPPED);

        if let Some(engine) = self.engine.as_mut() {
            engine.trigger_stream_capture();
        }
        self.graphics.set_ideal_capture_conditions(false);

        let duration_secs = self
            .clock
            .take()
            .map(|c| c.elapsed_secs())
            .unwrap_or(0.0);
        tracing::info!(duration_secs, "GPA stream capture stopped");

        if self.run_monitor_after_capture {
            match self.companion.as_mut() {
                Some(companion) => {
                    let launch = companion.launch_if_not_running(self.notifier.as_mut());
                    if launch == CompanionLaunch::Failed {
                        tracing::debug!("Capture stopped; companion monitor did not start");
                    }
                }
                None => tracing::debug!("No companion launcher configured"),
            }
        }

        CommandOutcome::Stopped
    }

    /// Force the session back to idle and release the engine.
    ///
    /// No trigger or ideal-capture side effects are emitted, even if a
    /// capture was running. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if self.state == CaptureSessionState::Capturing {
            tracing::debug!("Shutting down with a capture in progress");
        }
        self.state = CaptureSessionState::Idle;
        self.clock = None;
        self.capable = false;

        if let Some(mut engine) = self.engine.take() {
            engine.release();
            tracing::debug!("GPA capture engine released");
        }
    }

    fn notify(&mut self, message: &str) {
        self.notifier.notify(Notification::new(message));
    }
}
