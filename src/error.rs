//! Crate-level error types.
//!
//! Everything that can fail outside of the CPU-side scene graph funnels into
//! [`LessonError`]: GPU bring-up, per-frame surface acquisition, configuration
//! loading and the offscreen text surface.

use std::fmt;

/// Errors produced by the lessons crate.
#[derive(Debug)]
pub enum LessonError {
    /// The window or canvas could not be turned into a `wgpu` surface.
    Surface(wgpu::CreateSurfaceError),
    /// No adapter compatible with the surface was found.
    NoAdapter,
    /// The surface reports no texture format the adapter can present.
    NoSurfaceFormat,
    /// The adapter refused to hand out a device.
    Device(wgpu::RequestDeviceError),
    /// The next swapchain texture could not be acquired.
    Frame(wgpu::SurfaceError),
    /// TOML configuration parsing failure.
    Config(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// A color string that is not `#rgb`, `#rrggbb` or `#rrggbbaa`.
    Color(String),
    /// The offscreen pixmap could not be allocated.
    Pixmap {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },
}

impl fmt::Display for LessonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Surface(e) => write!(f, "surface error: {e}"),
            Self::NoAdapter => write!(f, "no compatible GPU adapter found"),
            Self::NoSurfaceFormat => write!(f, "surface supports no presentable format"),
            Self::Device(e) => write!(f, "device request failed: {e}"),
            Self::Frame(e) => write!(f, "failed to acquire surface texture: {e}"),
            Self::Config(msg) => write!(f, "config parse error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Color(value) => write!(f, "invalid color: {value:?}"),
            Self::Pixmap { width, height } => {
                write!(f, "cannot allocate a {width}x{height} pixmap")
            }
        }
    }
}

impl std::error::Error for LessonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Surface(e) => Some(e),
            Self::Device(e) => Some(e),
            Self::Frame(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for LessonError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        Self::Surface(e)
    }
}

impl From<wgpu::RequestDeviceError> for LessonError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        Self::Device(e)
    }
}

impl From<wgpu::SurfaceError> for LessonError {
    fn from(e: wgpu::SurfaceError) -> Self {
        Self::Frame(e)
    }
}

impl From<std::io::Error> for LessonError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for LessonError {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, LessonError>;

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn missing_surface_format_is_not_reported_as_a_missing_adapter() {
        let error = LessonError::NoSurfaceFormat;
        assert_eq!(error.to_string(), "surface supports no presentable format");
        assert_ne!(error.to_string(), LessonError::NoAdapter.to_string());
        assert!(error.source().is_none());
    }

    #[test]
    fn io_errors_keep_their_source() {
        let error = LessonError::from(std::io::Error::other("disk"));
        assert!(error.source().is_some());
    }
}
