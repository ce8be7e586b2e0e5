//! System registry lookups.

use gpacap_platform_core::{RegistryValue, SystemRegistry};

/// Reads string values from `HKEY_LOCAL_MACHINE`.
///
/// Off Windows the framework root is read from the environment variable of
/// the same name, since the registry key it lives under is the system
/// environment block. The monitor location always misses there.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsRegistry;

impl WindowsRegistry {
    pub fn new() -> Self {
        Self
    }
}

impl SystemRegistry for WindowsRegistry {
    fn lookup(&self, value: RegistryValue) -> Option<String> {
        let found = query(value);
        match &found {
            Some(dir) => tracing::debug!(?value, dir = %dir, "Registry lookup hit"),
            None => tracing::debug!(
                ?value,
                subkey = value.subkey(),
                name = value.value_name(),
                "Registry lookup missed"
            ),
        }
        found
    }
}

#[cfg(windows)]
fn query(value: RegistryValue) -> Option<String> {
    use std::ffi::OsStr;

    use windows::core::PCWSTR;
    use windows::Win32::Foundation::ERROR_SUCCESS;
    use windows::Win32::System::Registry::{RegGetValueW, HKEY_LOCAL_MACHINE, RRF_RT_REG_SZ};

    let subkey = crate::to_wide(OsStr::new(value.subkey()));
    let name = crate::to_wide(OsStr::new(value.value_name()));

    let mut size: u32 = 0;
    // SAFETY: both strings are NUL-terminated and outlive the call; a null
    // data pointer asks only for the required size.
    let status = unsafe {
        RegGetValueW(
            HKEY_LOCAL_MACHINE,
            PCWSTR(subkey.as_ptr()),
            PCWSTR(name.as_ptr()),
            RRF_RT_REG_SZ,
            None,
            None,
            Some(&mut size as *mut u32),
        )
    };
    if status != ERROR_SUCCESS || size == 0 {
        return None;
    }

    let mut buffer = vec![0u16; (size as usize).div_ceil(2)];
    // SAFETY: buffer holds `size` bytes as reported by the previous call.
    let status = unsafe {
        RegGetValueW(
            HKEY_LOCAL_MACHINE,
            PCWSTR(subkey.as_ptr()),
            PCWSTR(name.as_ptr()),
            RRF_RT_REG_SZ,
            None,
            Some(buffer.as_mut_ptr().cast()),
            Some(&mut size as *mut u32),
        )
    };
    if status != ERROR_SUCCESS {
        return None;
    }

    let len = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
    String::from_utf16(&buffer[..len])
        .ok()
        .filter(|s| !s.is_empty())
}

#[cfg(not(windows))]
fn query(value: RegistryValue) -> Option<String> {
    match value {
        RegistryValue::FrameworkRoot => std::env::var(value.value_name())
            .ok()
            .filter(|s| !s.is_empty()),
        RegistryValue::MonitorLocation => None,
    }
}
