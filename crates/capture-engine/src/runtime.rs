//! Single owner of the capture library and session for a host process.

use gpacap_common::config::SettingsStore;
use gpacap_platform_core::SystemRegistry;

use crate::bootstrap::{InstallLocation, LibraryBootstrapper, ModuleLoader, NativeModuleLoader};
use crate::session::CaptureSessionController;

/// Bootstraps the capture library at startup and tears everything down
/// exactly once at shutdown.
pub struct CaptureRuntime<L: ModuleLoader = NativeModuleLoader> {
    bootstrapper: LibraryBootstrapper<L>,
    controller: CaptureSessionController,
    install: Option<InstallLocation>,
    shut_down: bool,
}

impl<L: ModuleLoader> CaptureRuntime<L> {
    /// Resolve the install location, load the module set, and hand the
    /// engine to `controller`.
    ///
    /// Every failure along the way is logged and leaves capture disabled;
    /// startup itself never fails.
    pub fn startup(
        loader: L,
        settings: &mut dyn SettingsStore,
        registry: &dyn SystemRegistry,
        controller: CaptureSessionController,
    ) -> Self {
        Self::startup_with(LibraryBootstrapper::new(loader), settings, registry, controller)
    }

    /// Like [`Self::startup`] with a preconfigured bootstrapper.
    pub fn startup_with(
        mut bootstrapper: LibraryBootstrapper<L>,
        settings: &mut dyn SettingsStore,
        registry: &dyn SystemRegistry,
        mut controller: CaptureSessionController,
    ) -> Self {
        controller.set_run_monitor_after_capture(settings.run_monitor_after_capture());

        let install = match bootstrapper.resolve(settings, registry) {
            Ok(location) => Some(location),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Could not find a valid Intel(R) Graphics Performance Analyzers location, please verify installation"
                );
                None
            }
        };
        if let Some(location) = install.as_ref() {
            if bootstrapper.load_all(location) {
                match bootstrapper.create_engine(location) {
                    Some(engine) => {
                        controller.attach_engine(engine);
                    }
                    None => tracing::warn!("GPA capture interface could not be created"),
                }
            }
        }

        tracing::info!(
            capable = controller.is_capable(),
            install = %install.as_ref().map(|l| l.path().display().to_string()).unwrap_or_default(),
            "Capture runtime started"
        );

        Self {
            bootstrapper,
            controller,
            install,
            shut_down: false,
        }
    }

    pub fn controller(&self) -> &CaptureSessionController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut CaptureSessionController {
        &mut self.controller
    }

    pub fn bootstrapper(&self) -> &LibraryBootstrapper<L> {
        &self.bootstrapper
    }

    pub fn install_location(&self) -> Option<&InstallLocation> {
        self.install.as_ref()
    }

    /// Release the engine, then unload modules in reverse order.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.controller.shutdown();
        let unloaded = self.bootstrapper.unload_all();
        self.shut_down = true;
        tracing::info!(unloaded, "Capture runtime shut down");
    }
}

impl<L: ModuleLoader> Drop for CaptureRuntime<L> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
