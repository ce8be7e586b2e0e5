//! Interactive capture console.
//!
//! Reads one console command per line from stdin until EOF or `quit`.

use std::io::{self, BufRead, Write};
use std::path::Path;

use gpacap_capture_engine::{
    CaptureRuntime, CaptureSessionController, CommandOutcome, CompanionLauncher, ConsoleCommand,
    GraphicsApi, GraphicsBackend, LogNotifier, NativeModuleLoader, ProcessMonitor,
};
use gpacap_capture_engine::command::{
    BINARY_LOCATION_VARIABLE, RUN_MONITOR_VARIABLE, STREAM_CAPTURE_COMMAND,
};
use gpacap_common::config::{ConfigStore, SettingsStore};
use gpacap_platform_windows::{ShellLauncher, WindowsRegistry};

/// Stand-in renderer: reports a fixed API and logs capture-condition toggles.
struct ConsoleGraphicsBackend {
    api: GraphicsApi,
}

impl GraphicsBackend for ConsoleGraphicsBackend {
    fn api(&self) -> GraphicsApi {
        self.api
    }

    fn set_ideal_capture_conditions(&mut self, enabled: bool) {
        tracing::info!(enabled, "Ideal capture conditions");
    }
}

pub fn run(api: GraphicsApi) -> anyhow::Result<()> {
    let mut store = ConfigStore::open_default();
    let registry = WindowsRegistry::new();

    let companion = CompanionLauncher::new(
        Box::new(registry),
        ProcessMonitor::system(),
        Box::new(ShellLauncher::new()),
    );
    let controller =
        CaptureSessionController::new(Box::new(ConsoleGraphicsBackend { api }), Box::new(LogNotifier))
            .with_companion(companion);

    let mut runtime = CaptureRuntime::startup(
        NativeModuleLoader::default(),
        &mut store,
        &registry,
        controller,
    );

    if !runtime.controller().is_capable() {
        println!("Capture library unavailable; stream capture commands will be ignored.");
    }
    println!("Commands: {STREAM_CAPTURE_COMMAND} start|stop, toggle, {BINARY_LOCATION_VARIABLE} [DIR], {RUN_MONITOR_VARIABLE} [0|1], quit");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = line?;
        let Some(command) = ConsoleCommand::parse(&line) else {
            continue;
        };

        match command {
            ConsoleCommand::StreamCapture(args) => {
                report(runtime.controller_mut().handle_command(&args));
            }
            ConsoleCommand::Toggle => report(runtime.controller_mut().toggle()),
            ConsoleCommand::BinaryLocation(None) => match store.library_path() {
                Some(path) => println!("{BINARY_LOCATION_VARIABLE} = {}", path.display()),
                None => println!("{BINARY_LOCATION_VARIABLE} is unset"),
            },
            ConsoleCommand::BinaryLocation(Some(dir)) => {
                store.set_library_path(Path::new(dir))?;
                println!("{BINARY_LOCATION_VARIABLE} = {dir} (takes effect on next start)");
            }
            ConsoleCommand::RunMonitorAfterCapture(None) => {
                println!(
                    "{RUN_MONITOR_VARIABLE} = {}",
                    u8::from(runtime.controller().run_monitor_after_capture())
                );
            }
            ConsoleCommand::RunMonitorAfterCapture(Some(enabled)) => {
                store.set_run_monitor_after_capture(enabled)?;
                runtime
                    .controller_mut()
                    .set_run_monitor_after_capture(enabled);
                println!("{RUN_MONITOR_VARIABLE} = {}", u8::from(enabled));
            }
            ConsoleCommand::Quit => break,
            ConsoleCommand::Unknown(name) => println!("Unknown command: {name}"),
        }
        stdout.flush()?;
    }

    runtime.shutdown();
    Ok(())
}

fn report(outcome: CommandOutcome) {
    match outcome_message(outcome) {
        Some(message) => println!("{message}"),
        None => tracing::debug!(?outcome, "Stream capture request not executed"),
    }
}

/// Console echo for a capture request. Malformed requests stay silent.
fn outcome_message(outcome: CommandOutcome) -> Option<&'static str> {
    match outcome {
        CommandOutcome::Started => Some("Capture started"),
        CommandOutcome::Stopped => Some("Capture stopped"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_requests_print_nothing() {
        assert_eq!(outcome_message(CommandOutcome::Ignored), None);
        assert_eq!(
            outcome_message(CommandOutcome::Started),
            Some("Capture started")
        );
        assert_eq!(
            outcome_message(CommandOutcome::Stopped),
            Some("Capture stopped")
        );
    }

    #[test]
    fn ideal_capture_toggles_do_not_change_reported_api() {
        let mut backend = ConsoleGraphicsBackend {
            api: GraphicsApi::D3D11,
        };
        backend.set_ideal_capture_conditions(true);
        assert_eq!(backend.api(), GraphicsApi::D3D11);
    }
}
