//! Capture library discovery and ordered module loading.
//!
//! The capture framework ships as a handful of native modules that must be
//! loaded in dependency order from a single install directory. Discovery
//! tries the configured directory first, then the framework root named in
//! the system registry. Any failure leaves capture disabled rather than
//! failing the host.

use std::path::{Path, PathBuf};

use gpacap_common::config::SettingsStore;
use gpacap_common::error::{GpacapError, GpacapResult};
use gpacap_platform_core::{RegistryValue, SystemRegistry};

use crate::engine::{CaptureEngine, EngineFactoryFn, NativeEngine, ENGINE_FACTORY_SYMBOL};

/// Modules in load order. Each one may depend on every module before it;
/// the engine factory lives in the last.
pub const MODULE_LOAD_ORDER: [&str; 3] = [
    "logger-x64.dll",
    "runtime-x64.dll",
    "igpa-shim-loader-x64.dll",
];

/// Binaries directory relative to the registry framework root.
pub const FRAMEWORK_BINARY_SUBDIR: [&str; 2] = ["bin", "Release"];

/// Directory holding the capture framework binaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLocation(PathBuf);

impl InstallLocation {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Full path of `module` inside this location.
    pub fn module_path(&self, module: &str) -> PathBuf {
        self.0.join(module)
    }

    fn contains(&self, module: &str) -> bool {
        self.module_path(module).is_file()
    }
}

/// Ordered set of modules to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleLoadSet {
    modules: Vec<String>,
}

impl ModuleLoadSet {
    pub fn new<I, S>(modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            modules: modules.into_iter().map(Into::into).collect(),
        }
    }

    /// The module used to validate a candidate install location.
    pub fn probe(&self) -> Option<&str> {
        self.modules.first().map(String::as_str)
    }

    /// The module exporting the engine factory.
    pub fn factory_module(&self) -> Option<&str> {
        self.modules.last().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.modules.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl Default for ModuleLoadSet {
    fn default() -> Self {
        Self::new(MODULE_LOAD_ORDER)
    }
}

/// Loads native modules and produces engines from them.
pub trait ModuleLoader {
    /// Handle keeping a module resident. Dropping it unloads the module.
    type Module;

    fn load(&mut self, path: &Path) -> GpacapResult<Self::Module>;

    /// Resolve the engine factory in `factory_module` and call it.
    /// `None` means the factory could not be resolved or produced nothing.
    fn create_engine(
        &mut self,
        factory_module: &Self::Module,
        install: &InstallLocation,
    ) -> Option<Box<dyn CaptureEngine>>;
}

/// Loader backed by the OS dynamic linker.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeModuleLoader;

impl ModuleLoader for NativeModuleLoader {
    type Module = libloading::Library;

    fn load(&mut self, path: &Path) -> GpacapResult<Self::Module> {
        // SAFETY: vendor modules run their initialisers on load; that is the
        // contract of bootstrapping the capture framework at all.
        unsafe { libloading::Library::new(path) }
            .map_err(|e| GpacapError::module_load(path, e.to_string()))
    }

    fn create_engine(
        &mut self,
        factory_module: &Self::Module,
        install: &InstallLocation,
    ) -> Option<Box<dyn CaptureEngine>> {
        // SAFETY: the symbol is declared with the shim's factory signature.
        let factory: EngineFactoryFn =
            match unsafe { factory_module.get::<EngineFactoryFn>(ENGINE_FACTORY_SYMBOL) } {
                Ok(symbol) => *symbol,
                Err(e) => {
                    tracing::warn!(error = %e, "Capture engine factory not found");
                    return None;
                }
            };

        // SAFETY: the bootstrapper keeps every module resident until the
        // runtime has released the engine.
        match unsafe { NativeEngine::create(factory, install) } {
            Ok(Some(engine)) => Some(Box::new(engine)),
            Ok(None) => {
                tracing::warn!("Capture engine factory returned no engine");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "Capture engine factory call failed");
                None
            }
        }
    }
}

struct LoadedModule<M> {
    name: String,
    handle: M,
}

/// Resolves the install location and loads the module set.
pub struct LibraryBootstrapper<L: ModuleLoader> {
    loader: L,
    modules: ModuleLoadSet,
    loaded: Vec<LoadedModule<L::Module>>,
}

impl<L: ModuleLoader> LibraryBootstrapper<L> {
    pub fn new(loader: L) -> Self {
        Self::with_modules(loader, ModuleLoadSet::default())
    }

    pub fn with_modules(loader: L, modules: ModuleLoadSet) -> Self {
        Self {
            loader,
            modules,
            loaded: Vec::new(),
        }
    }

    pub fn modules(&self) -> &ModuleLoadSet {
        &self.modules
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Find a directory containing the first required module.
    ///
    /// Tries the configured path, then `<registry framework root>/bin/Release`.
    /// A hit is written back to `settings` so later runs skip the fallback.
    /// Fails with [`GpacapError::InstallNotFound`] when neither is valid.
    pub fn resolve(
        &self,
        settings: &mut dyn SettingsStore,
        registry: &dyn SystemRegistry,
    ) -> GpacapResult<InstallLocation> {
        let probe = self.modules.probe().ok_or(GpacapError::InstallNotFound)?;

        let configured = settings.library_path().map(InstallLocation::new);
        let location = match configured {
            Some(location) if location.contains(probe) => location,
            other => {
                tracing::warn!(
                    path = %other.as_ref().map(|l| l.path().display().to_string()).unwrap_or_default(),
                    "Configured directory is not a valid GPA directory; trying registry entry"
                );

                let fallback = registry.lookup(RegistryValue::FrameworkRoot).map(|root| {
                    let mut dir = PathBuf::from(root);
                    dir.extend(FRAMEWORK_BINARY_SUBDIR);
                    InstallLocation::new(dir)
                });

                match fallback {
                    Some(location) if location.contains(probe) => {
                        tracing::info!(path = %location.path().display(), "Found valid GPA directory");
                        location
                    }
                    _ => return Err(GpacapError::InstallNotFound),
                }
            }
        };

        if let Err(e) = settings.set_library_path(location.path()) {
            tracing::warn!(error = %e, "Failed to persist capture library location");
        }

        Ok(location)
    }

    /// Load every module in order. Stops at the first failure; modules
    /// loaded before it stay resident.
    ///
    /// Returns `true` only if the whole set is resident.
    pub fn load_all(&mut self, install: &InstallLocation) -> bool {
        for name in self.modules.iter() {
            if self.loaded.iter().any(|m| m.name == name) {
                continue;
            }

            let path = install.module_path(name);
            match self.loader.load(&path) {
                Ok(handle) => {
                    tracing::debug!(path = %path.display(), "Loaded capture module");
                    self.loaded.push(LoadedModule {
                        name: name.to_string(),
                        handle,
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to load GPA capture library. Install latest GPA version"
                    );
                    return false;
                }
            }
        }
        self.is_fully_loaded()
    }

    pub fn is_fully_loaded(&self) -> bool {
        !self.modules.is_empty() && self.loaded.len() == self.modules.len()
    }

    /// Names of resident modules, in load order.
    pub fn loaded_modules(&self) -> impl Iterator<Item = &str> {
        self.loaded.iter().map(|m| m.name.as_str())
    }

    /// Produce an engine from the factory module. Requires a full load.
    pub fn create_engine(&mut self, install: &InstallLocation) -> Option<Box<dyn CaptureEngine>> {
        if !self.is_fully_loaded() {
            return None;
        }
        let factory_module = self.loaded.last()?;
        self.loader.create_engine(&factory_module.handle, install)
    }

    /// Unload resident modules in reverse load order.
    ///
    /// Any engine produced by [`Self::create_engine`] must be released first.
    pub fn unload_all(&mut self) -> usize {
        let count = self.loaded.len();
        while let Some(module) = self.loaded.pop() {
            tracing::debug!(module = %module.name, "Unloading capture module");
            drop(module.handle);
        }
        count
    }
}

impl<L: ModuleLoader> Drop for LibraryBootstrapper<L> {
    fn drop(&mut self) {
        self.unload_all();
    }
}
