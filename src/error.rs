//! Error types for surfaces and configuration.

use thiserror::Error;

/// Errors raised by a drawing surface.
///
/// The animation director treats all of these as "skip this frame": they are
/// logged and never surfaced to the host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// The raster context could not be acquired
    #[error("2d context unavailable")]
    ContextUnavailable,
    /// Backing store has no pixels
    #[error("surface has zero size: {width}x{height}")]
    ZeroSize { width: u32, height: u32 },
    /// A raster operation was rejected by the backend
    #[error("raster operation failed: {0}")]
    Raster(String),
    /// Reading back the pixel buffer failed
    #[error("failed to read pixels: {0}")]
    ReadBack(String),
}

/// Errors raised while building or loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("text list is empty")]
    NoTexts,
    #[cfg(feature = "toml")]
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}
