//! Check the capture library install and companion monitor.

use gpacap_capture_engine::{
    CompanionLauncher, LibraryBootstrapper, NativeModuleLoader, ProcessMonitor,
};
use gpacap_common::config::ConfigStore;
use gpacap_platform_windows::{ShellLauncher, WindowsRegistry};

pub fn run() -> anyhow::Result<()> {
    println!("gpacap System Check");
    println!("{}", "=".repeat(50));

    let store = ConfigStore::open_default();
    println!("Config file: {}", store.path().display());

    // Resolve against a copy so a check never rewrites the config file.
    let mut settings = store.config().capture.clone();
    let registry = WindowsRegistry::new();
    let bootstrapper = LibraryBootstrapper::new(NativeModuleLoader::default());

    let mut ready = true;
    match bootstrapper.resolve(&mut settings, &registry) {
        Ok(location) => {
            println!("[OK] Install location: {}", location.path().display());
            for module in bootstrapper.modules().iter() {
                let path = location.module_path(module);
                if path.is_file() {
                    println!("     [OK] {module}");
                } else {
                    println!("     [MISSING] {module}");
                    ready = false;
                }
            }
        }
        Err(e) => {
            println!("[FAIL] {e}");
            println!("       Set one with: gpacap config --library-path <DIR>");
            ready = false;
        }
    }

    println!();
    let mut companion = CompanionLauncher::new(
        Box::new(registry),
        ProcessMonitor::system(),
        Box::new(ShellLauncher::new()),
    );
    match companion.resolve_executable() {
        Some(path) if path.is_file() => {
            let state = if companion.is_running() {
                "running"
            } else {
                "not running"
            };
            println!("[OK] Graphics Monitor: {} ({state})", path.display());
        }
        Some(path) => println!("[WARN] Graphics Monitor missing: {}", path.display()),
        None => println!("[WARN] Graphics Monitor location not registered"),
    }
    println!(
        "     Launch after capture: {}",
        settings.run_monitor_after_capture
    );

    println!();
    if ready {
        println!("Capture library is ready. Run `gpacap console` to capture.");
    } else {
        println!("Capture library is not usable. See above for fixes.");
    }

    Ok(())
}
