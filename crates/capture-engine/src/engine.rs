//! Capture engine adapter.
//!
//! The vendor's own factory has C++ linkage and takes a `std::string`, so it
//! cannot be called from Rust directly. The last module of the load set must
//! instead export a C-linkage bridge under [`ENGINE_FACTORY_SYMBOL`] that
//! takes the install directory as a NUL-terminated UTF-8 string, forwards it
//! to the vendor factory, and returns the engine object unchanged. The
//! object starts with a pointer to a table of three entry points:
//!
//! ```text
//! engine* ──▶ [ vtable* ] ──▶ [ Initialize | TriggerStreamCapture | Release ]
//! ```
//!
//! Each entry point receives the object pointer as its first argument. A
//! module without the bridge export yields no engine, and capture stays
//! disabled.

use std::ffi::{c_char, c_int, CString};
use std::fmt;
use std::ptr::NonNull;

use gpacap_common::error::{GpacapError, GpacapResult};

use crate::bootstrap::InstallLocation;

/// C-linkage factory bridge exported by the last module of the load set.
pub const ENGINE_FACTORY_SYMBOL: &[u8] = b"GetGPAInterface\0";

/// Result of [`CaptureEngine::initialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    Ok,
    /// Not supported for the current API or platform.
    NotSupported,
    Failed,
}

impl EngineStatus {
    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }

    fn from_raw(code: c_int) -> Self {
        match code {
            0 => Self::Ok,
            1 => Self::NotSupported,
            _ => Self::Failed,
        }
    }
}

impl fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::NotSupported => write!(f, "not supported"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Handle over a loaded capture engine.
///
/// Session state is tracked by the caller; the same trigger both starts and
/// stops a stream capture.
pub trait CaptureEngine {
    /// Called once, right after construction.
    fn initialize(&mut self) -> EngineStatus;

    /// Emit the capture start/stop edge.
    fn trigger_stream_capture(&mut self);

    /// Free engine-owned resources. Valid even if `initialize` failed.
    fn release(&mut self);
}

/// Signature of the factory bridge.
pub type EngineFactoryFn = unsafe extern "C" fn(install_path: *const c_char) -> *mut RawEngine;

/// Engine object as laid out by the shim.
#[repr(C)]
pub struct RawEngine {
    vtable: *const RawEngineVtable,
}

#[repr(C)]
struct RawEngineVtable {
    initialize: unsafe extern "C" fn(this: *mut RawEngine) -> c_int,
    trigger_stream_capture: unsafe extern "C" fn(this: *mut RawEngine),
    release: unsafe extern "C" fn(this: *mut RawEngine),
}

/// Engine backed by the native shim.
pub struct NativeEngine {
    raw: NonNull<RawEngine>,
    released: bool,
}

impl NativeEngine {
    /// Call `factory` with the install directory.
    ///
    /// Returns `Ok(None)` when the factory hands back a null object.
    ///
    /// # Safety
    ///
    /// `factory` must be the shim's engine factory, and the module it lives
    /// in (plus its dependencies) must stay loaded until [`CaptureEngine::release`]
    /// has been called on the returned engine.
    pub unsafe fn create(
        factory: EngineFactoryFn,
        install: &InstallLocation,
    ) -> GpacapResult<Option<Self>> {
        let path = install.path().to_str().ok_or_else(|| {
            GpacapError::engine_unavailable("install path is not valid UTF-8")
        })?;
        let path = CString::new(path).map_err(|_| {
            GpacapError::engine_unavailable("install path contains an interior NUL byte")
        })?;

        let raw = factory(path.as_ptr());
        Ok(NonNull::new(raw).map(|raw| Self {
            raw,
            released: false,
        }))
    }

    fn vtable(&self) -> &RawEngineVtable {
        // SAFETY: the shim guarantees a valid vtable for the object's lifetime,
        // and we never touch the object after release.
        unsafe { &*self.raw.as_ref().vtable }
    }
}

impl CaptureEngine for NativeEngine {
    fn initialize(&mut self) -> EngineStatus {
        if self.released {
            return EngineStatus::Failed;
        }
        let initialize = self.vtable().initialize;
        // SAFETY: object is live until release.
        EngineStatus::from_raw(unsafe { initialize(self.raw.as_ptr()) })
    }

    fn trigger_stream_capture(&mut self) {
        if self.released {
            return;
        }
        let trigger = self.vtable().trigger_stream_capture;
        // SAFETY: object is live until release.
        unsafe { trigger(self.raw.as_ptr()) }
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        let release = self.vtable().release;
        // SAFETY: object is live; the flag keeps this to a single call.
        unsafe { release(self.raw.as_ptr()) }
        self.released = true;
    }
}

impl Drop for NativeEngine {
    fn drop(&mut self) {
        if !self.released {
            tracing::warn!("Capture engine dropped without release; engine resources leaked");
        }
    }
}
