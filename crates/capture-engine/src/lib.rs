//! gpacap Capture Engine
//!
//! Bootstraps the GPA capture framework into the host process and controls
//! a single stream capture session.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────┐
//! │                  CaptureRuntime                   │
//! │  ┌─────────────────────┐   ┌───────────────────┐  │
//! │  │ LibraryBootstrapper │──▶│  CaptureEngine    │  │
//! │  │ resolve + load_all  │   │  (native shim)    │  │
//! │  └─────────────────────┘   └─────────┬─────────┘  │
//! │                                      ▼            │
//! │  ┌─────────────────────────────────────────────┐  │
//! │  │        CaptureSessionController             │  │
//! │  │  Idle ⇄ Capturing   GraphicsBackend hooks   │  │
//! │  └──────────────────────┬──────────────────────┘  │
//! │                         ▼                         │
//! │  ┌─────────────────────────────────────────────┐  │
//! │  │ CompanionLauncher ─▶ ProcessMonitor         │  │
//! │  └─────────────────────────────────────────────┘  │
//! └───────────────────────────────────────────────────┘
//! ```

pub mod bootstrap;
pub mod command;
pub mod companion;
pub mod engine;
pub mod host;
pub mod process;
pub mod runtime;
pub mod session;

pub use bootstrap::{InstallLocation, LibraryBootstrapper, ModuleLoadSet, ModuleLoader, NativeModuleLoader};
pub use command::{ConsoleCommand, StreamCaptureCommand};
pub use companion::{CompanionLaunch, CompanionLauncher};
pub use engine::{CaptureEngine, EngineStatus};
pub use host::{GraphicsApi, GraphicsBackend, LogNotifier, Notification, Notifier};
pub use process::{ProcessMonitor, SystemProcessTable};
pub use runtime::CaptureRuntime;
pub use session::*;
