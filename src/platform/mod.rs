//! Runtime platform detection and the native-SDK capability predicate.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Decides, per operation, whether the native SDK path is usable.
pub trait PlatformCapability: Send + Sync {
    fn supports_native_sdk(&self) -> bool;
}

impl<F> PlatformCapability for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn supports_native_sdk(&self) -> bool {
        self()
    }
}

/// Player platform the host is running on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RuntimePlatform {
    Android,
    IphonePlayer,
    WindowsPlayer,
    OsxPlayer,
    LinuxPlayer,
    WebGl,
    #[default]
    Unknown,
}

impl RuntimePlatform {
    /// Platform of the compilation target.
    pub fn current() -> Self {
        if cfg!(target_os = "android") {
            Self::Android
        } else if cfg!(target_os = "ios") {
            Self::IphonePlayer
        } else if cfg!(target_os = "windows") {
            Self::WindowsPlayer
        } else if cfg!(target_os = "macos") {
            Self::OsxPlayer
        } else if cfg!(target_os = "linux") {
            Self::LinuxPlayer
        } else if cfg!(target_arch = "wasm32") {
            Self::WebGl
        } else {
            Self::Unknown
        }
    }

    pub fn is_mobile(self) -> bool {
        matches!(self, Self::Android | Self::IphonePlayer)
    }
}

/// Platform plus whether the host runs inside a development editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RuntimeEnvironment {
    pub platform: RuntimePlatform,
    pub is_editor: bool,
}

impl RuntimeEnvironment {
    pub fn new(platform: RuntimePlatform, is_editor: bool) -> Self {
        Self {
            platform,
            is_editor,
        }
    }

    /// Environment of the compilation target, outside any editor.
    pub fn detect() -> Self {
        Self::new(RuntimePlatform::current(), false)
    }
}

impl PlatformCapability for RuntimeEnvironment {
    /// Native SDK only on mobile players, never inside an editor.
    fn supports_native_sdk(&self) -> bool {
        self.platform.is_mobile() && !self.is_editor
    }
}
