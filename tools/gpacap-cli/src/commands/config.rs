//! Show or update persisted settings.

use std::path::PathBuf;

use gpacap_common::config::{ConfigStore, SettingsStore};

pub fn run(
    library_path: Option<PathBuf>,
    run_monitor_after_capture: Option<bool>,
) -> anyhow::Result<()> {
    let mut store = ConfigStore::open_default();

    if let Some(path) = library_path {
        store.set_library_path(&path)?;
        println!("Set library path to {}", path.display());
    }
    if let Some(enabled) = run_monitor_after_capture {
        store.set_run_monitor_after_capture(enabled)?;
        println!("Set launch-after-capture to {enabled}");
    }

    println!("Config: {}", store.path().display());
    println!(
        "  Library path: {}",
        store
            .library_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(unset)".to_string())
    );
    println!(
        "  Launch monitor after capture: {}",
        store.run_monitor_after_capture()
    );
    println!("  Log level: {}", store.config().logging.level);

    Ok(())
}
