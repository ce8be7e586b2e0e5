//! Host-side seams: the active graphics backend and the on-screen
//! notification sink.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Graphics API the host renderer is running on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphicsApi {
    D3D12,
    D3D11,
    Vulkan,
    OpenGl,
    Null,
}

impl GraphicsApi {
    /// The only backend stream capture works with.
    pub const SUPPORTED: GraphicsApi = GraphicsApi::D3D12;

    pub fn name(self) -> &'static str {
        match self {
            Self::D3D12 => "D3D12",
            Self::D3D11 => "D3D11",
            Self::Vulkan => "Vulkan",
            Self::OpenGl => "OpenGL",
            Self::Null => "Null",
        }
    }

    pub fn is_capture_supported(self) -> bool {
        self == Self::SUPPORTED
    }
}

impl fmt::Display for GraphicsApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GraphicsApi {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "d3d12" | "dx12" => Ok(Self::D3D12),
            "d3d11" | "dx11" => Ok(Self::D3D11),
            "vulkan" => Ok(Self::Vulkan),
            "opengl" | "gl" => Ok(Self::OpenGl),
            "null" => Ok(Self::Null),
            other => Err(format!("unknown graphics API '{other}'")),
        }
    }
}

/// The host renderer, as seen by the capture session.
pub trait GraphicsBackend {
    /// API currently in use.
    fn api(&self) -> GraphicsApi;

    /// Toggle the backend's ideal GPU capture conditions around a capture
    /// window (e.g. disabling frame-pacing shortcuts).
    fn set_ideal_capture_conditions(&mut self, enabled: bool);
}

/// Fire-and-forget, time-limited message for the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub fade_in: Duration,
    pub fade_out: Duration,
    pub expire_after: Duration,
}

impl Notification {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fade_in: Duration::from_millis(500),
            fade_out: Duration::from_secs(1),
            expire_after: Duration::from_secs(4),
        }
    }
}

/// Output sink for notifications. There is no acknowledgement.
pub trait Notifier {
    fn notify(&mut self, notification: Notification);
}

/// Notifier that writes to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, notification: Notification) {
        tracing::info!(
            target: "gpacap::notify",
            expire_secs = notification.expire_after.as_secs_f32(),
            "{}",
            notification.message
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_d3d12_supports_capture() {
        assert!(GraphicsApi::D3D12.is_capture_supported());
        for api in [
            GraphicsApi::D3D11,
            GraphicsApi::Vulkan,
            GraphicsApi::OpenGl,
            GraphicsApi::Null,
        ] {
            assert!(!api.is_capture_supported(), "{api} should be rejected");
        }
    }

    #[test]
    fn graphics_api_parses_common_spellings() {
        assert_eq!("D3D12".parse::<GraphicsApi>().unwrap(), GraphicsApi::D3D12);
        assert_eq!("dx11".parse::<GraphicsApi>().unwrap(), GraphicsApi::D3D11);
        assert!("metal".parse::<GraphicsApi>().is_err());
    }

    #[test]
    fn notification_defaults_expire_after_four_seconds() {
        let n = Notification::new("hello");
        assert_eq!(n.expire_after, Duration::from_secs(4));
        assert_eq!(n.fade_in, Duration::from_millis(500));
    }
}
