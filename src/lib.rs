//! # vaporize-text
//!
//! Particle-based "vaporizing" text animation for 2D canvas surfaces.
//!
//! Each text of a list is rasterised once, sampled into particles, then
//! dissolved by a frontier sweeping across it. The next text fades in, holds
//! for a moment and vaporizes in turn, cycling forever while the surface is
//! in view.
//!
//! This crate provides platform-agnostic logic for:
//! - Sampling glyph pixels into particles ([`GlyphSampler`])
//! - Simulating the dispersal ([`ParticleSimulator`])
//! - Sequencing the vaporize / fade-in / wait cycle ([`VaporizeAnimation`])
//! - Drawing onto any [`Surface`], including a software [`RasterSurface`]
//!
//! ## Features
//!
//! - `serde` - Enable serialization/deserialization for configuration
//! - `toml` - Load [`VaporizeConfig`] from TOML
//! - `web` - Canvas surface and browser mounting (observers, frame loop)
//!
//! ## Example
//!
//! ```rust
//! use vaporize_text::{FrameStatus, RasterSurface, VaporizeAnimation, VaporizeConfig};
//!
//! let config = VaporizeConfig {
//!     texts: vec!["Hello".into(), "World".into()],
//!     ..Default::default()
//! };
//! let mut animation = VaporizeAnimation::new(config, 1.0).unwrap();
//! let mut surface = RasterSurface::new();
//!
//! animation.resize(400.0, 100.0);
//! animation.set_visible(true);
//!
//! let mut now = 0.0;
//! for _ in 0..10 {
//!     assert!(matches!(animation.tick(now, Some(&mut surface)), FrameStatus::Rendered(_)));
//!     now += 16.0;
//! }
//! assert!(animation.progress() > 0.0);
//! ```

mod animation;
mod color;
mod config;
mod error;
mod particle;
mod raster;
pub mod render;
mod sampler;
pub mod seo;
mod simulator;
pub mod sizing;
mod surface;
pub mod visibility;

#[cfg(feature = "web")]
pub mod mount;

pub use animation::{AnimationPhase, Debounce, FrameStatus, VaporizeAnimation, FONT_CHANGE_DEBOUNCE_MS};
pub use color::{parse_color, parse_color_or_white, Rgb};
pub use config::{Alignment, AnimationDurations, Direction, FontDescriptor, VaporizeConfig};
pub use error::{ConfigError, SurfaceError};
pub use particle::{reset_particles, Particle, TextBoundary};
pub use raster::{BlockMetrics, RasterSurface};
pub use sampler::{GlyphSampler, SampledText};
pub use seo::Tag;
pub use simulator::{DispersalParams, Frontier, ParticleSimulator, FADED_THRESHOLD};
pub use surface::{PixelBuffer, Surface, TextStyle};

#[cfg(feature = "web")]
pub use mount::{mount, VaporizeHandle};
#[cfg(feature = "web")]
pub use render::web::CanvasSurface;
