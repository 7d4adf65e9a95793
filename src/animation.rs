//! Animation director: the vaporize / fade-in / wait cycle.

use crate::color::Rgb;
use crate::config::{Direction, FontDescriptor, VaporizeConfig};
use crate::error::{ConfigError, SurfaceError};
use crate::particle::{reset_particles, Particle, TextBoundary};
use crate::render::{render_fade_in, render_particles};
use crate::sampler::GlyphSampler;
use crate::seo;
use crate::simulator::{DispersalParams, Frontier, ParticleSimulator};
use crate::sizing::effective_pixel_ratio;
use crate::surface::Surface;
use crate::visibility::{VisibilityChange, VisibilityGate};

/// Delay before a font family change rebuilds the particles.
pub const FONT_CHANGE_DEBOUNCE_MS: f64 = 1000.0;

/// Phase of the animation cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnimationPhase {
    /// Idle: particles drawn at rest (also forced while out of view)
    #[default]
    Static,
    /// Frontier sweeping across the text, particles dispersing
    Vaporizing,
    /// Next text fading in at its rest position
    FadingIn,
    /// Holding the text before the next sweep
    Waiting,
}

/// Outcome of one call to [`VaporizeAnimation::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStatus {
    /// Out of view: nothing was simulated, the host should stop its loop
    Halted,
    /// Surface missing or failing: nothing drawn, retry next frame
    Skipped,
    /// A frame was drawn in the given phase
    Rendered(AnimationPhase),
}

/// A cancellable delayed task driven by frame timestamps.
///
/// Scheduling replaces any pending task, so rapid changes collapse into one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Debounce {
    delay_ms: f64,
    due_at: Option<f64>,
}

impl Debounce {
    pub fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms,
            due_at: None,
        }
    }

    /// Schedule the task `delay_ms` after `now_ms`, cancelling any pending one.
    pub fn schedule(&mut self, now_ms: f64) {
        self.due_at = Some(now_ms + self.delay_ms);
    }

    pub fn cancel(&mut self) {
        self.due_at = None;
    }

    pub fn is_pending(&self) -> bool {
        self.due_at.is_some()
    }

    /// Returns `true` exactly once, on the first poll at or after the deadline.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.due_at {
            Some(due) if now_ms >= due => {
                self.due_at = None;
                true
            }
            _ => false,
        }
    }
}

/// One animated text instance.
///
/// The director owns the phase, the particle arena and all progress
/// counters. It does no timing of its own: the host calls [`tick`] once per
/// display refresh with a monotonic timestamp and the surface to draw on.
///
/// ## Example
///
/// ```rust
/// use vaporize_text::{AnimationPhase, FrameStatus, RasterSurface, VaporizeAnimation, VaporizeConfig};
///
/// let config = VaporizeConfig { texts: vec!["Hi".into()], ..Default::default() };
/// let mut anim = VaporizeAnimation::new(config, 1.0).unwrap();
/// let mut surface = RasterSurface::new();
///
/// anim.resize(200.0, 80.0);
/// assert_eq!(anim.tick(0.0, Some(&mut surface)), FrameStatus::Halted);
///
/// anim.set_visible(true);
/// assert_eq!(anim.tick(16.0, Some(&mut surface)), FrameStatus::Rendered(AnimationPhase::Vaporizing));
/// assert!(!anim.particles().is_empty());
/// ```
///
/// [`tick`]: VaporizeAnimation::tick
#[derive(Clone, Debug)]
pub struct VaporizeAnimation {
    config: VaporizeConfig,
    color: Rgb,
    pixel_ratio: f64,
    simulator: ParticleSimulator,
    gate: VisibilityGate,
    phase: AnimationPhase,
    text_index: usize,
    particles: Vec<Particle>,
    boundary: TextBoundary,
    /// Sweep progress in percent, 0..=100
    progress: f64,
    /// Fade-in level, 0..=1 (may overshoot on the last frame)
    fade: f64,
    waited_ms: f64,
    start_pending: bool,
    needs_resample: bool,
    generation: u64,
    last_timestamp: Option<f64>,
    css_size: (f64, f64),
    font_reset: Debounce,
}

impl VaporizeAnimation {
    /// Create an instance for `config` on a display with the given device
    /// pixel ratio.
    pub fn new(config: VaporizeConfig, device_pixel_ratio: f64) -> Result<Self, ConfigError> {
        let simulator = ParticleSimulator::new(DispersalParams::from_config(&config));
        Self::with_simulator(config, device_pixel_ratio, simulator)
    }

    /// Like [`new`](Self::new) with a fixed random seed.
    pub fn with_seed(config: VaporizeConfig, device_pixel_ratio: f64, seed: u64) -> Result<Self, ConfigError> {
        let simulator = ParticleSimulator::with_seed(DispersalParams::from_config(&config), seed);
        Self::with_simulator(config, device_pixel_ratio, simulator)
    }

    fn with_simulator(config: VaporizeConfig, device_pixel_ratio: f64, simulator: ParticleSimulator) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            color: config.base_color(),
            pixel_ratio: effective_pixel_ratio(device_pixel_ratio),
            config,
            simulator,
            gate: VisibilityGate::new(),
            phase: AnimationPhase::Static,
            text_index: 0,
            particles: Vec::new(),
            boundary: TextBoundary::default(),
            progress: 0.0,
            fade: 0.0,
            waited_ms: 0.0,
            start_pending: false,
            needs_resample: true,
            generation: 0,
            last_timestamp: None,
            css_size: (0.0, 0.0),
            font_reset: Debounce::new(FONT_CHANGE_DEBOUNCE_MS),
        })
    }

    pub fn config(&self) -> &VaporizeConfig {
        &self.config
    }

    pub fn phase(&self) -> AnimationPhase {
        self.phase
    }

    /// Sweep progress in percent.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn text_index(&self) -> usize {
        self.text_index
    }

    pub fn current_text(&self) -> &str {
        &self.config.texts[self.text_index]
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn boundary(&self) -> TextBoundary {
        self.boundary
    }

    /// Backing-store pixels per CSS pixel.
    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    pub fn is_visible(&self) -> bool {
        self.gate.is_visible()
    }

    /// Number of times the particle set has been rebuilt.
    pub fn sample_generation(&self) -> u64 {
        self.generation
    }

    pub fn font_reset_pending(&self) -> bool {
        self.font_reset.is_pending()
    }

    /// Hidden markup carrying every text for non-visual consumers.
    pub fn hidden_markup(&self) -> String {
        seo::hidden_markup(self.config.tag, &self.config.texts)
    }

    /// Feed a visibility observation.
    ///
    /// Leaving the viewport forces [`AnimationPhase::Static`] and stops all
    /// simulation. Entering schedules a fresh sweep on the next tick.
    pub fn set_visible(&mut self, visible: bool) -> Option<VisibilityChange> {
        let change = self.gate.update(visible)?;
        match change {
            VisibilityChange::Entered => {
                log::debug!("entered viewport, starting on next frame");
                self.start_pending = true;
            }
            VisibilityChange::Left => {
                log::debug!("left viewport in {:?}, halting", self.phase);
                self.set_phase(AnimationPhase::Static);
                self.start_pending = false;
                if self.font_reset.is_pending() {
                    self.font_reset.cancel();
                    self.needs_resample = true;
                }
            }
        }
        self.last_timestamp = None;
        Some(change)
    }

    /// Report a new CSS display size for the surface.
    pub fn resize(&mut self, css_width: f64, css_height: f64) {
        if self.css_size != (css_width, css_height) {
            self.css_size = (css_width, css_height);
            self.needs_resample = true;
        }
    }

    /// Change the font.
    ///
    /// A family change waits [`FONT_CHANGE_DEBOUNCE_MS`] and then rebuilds the
    /// particles from scratch; repeated changes within the window restart it.
    /// Size and weight changes resample on the next frame.
    pub fn set_font(&mut self, font: FontDescriptor, now_ms: f64) {
        if font == self.config.font {
            return;
        }
        let family_changed = font.family != self.config.font.family;
        self.config.font = font;
        self.simulator.set_params(DispersalParams::from_config(&self.config));

        if family_changed {
            log::debug!("font family changed to {:?}, debouncing reset", self.config.font.family);
            self.font_reset.schedule(now_ms);
        } else {
            self.needs_resample = true;
        }
    }

    /// Advance the animation to `now_ms` and draw one frame.
    ///
    /// Never fails: surface problems are logged and reported as
    /// [`FrameStatus::Skipped`] so the host simply tries again next frame.
    pub fn tick<S: Surface + ?Sized>(&mut self, now_ms: f64, surface: Option<&mut S>) -> FrameStatus {
        if !self.gate.is_visible() {
            self.last_timestamp = None;
            return FrameStatus::Halted;
        }

        let dt = match self.last_timestamp {
            Some(prev) if now_ms > prev => (now_ms - prev) / 1000.0,
            _ => 0.0,
        };
        self.last_timestamp = Some(now_ms);

        if self.start_pending {
            self.start_pending = false;
            self.begin_sweep();
        }

        if self.font_reset.poll(now_ms) {
            log::debug!("applying debounced font reset");
            self.particles.clear();
            self.boundary = TextBoundary::default();
            self.needs_resample = true;
        }

        let Some(surface) = surface else {
            log::trace!("no surface this frame");
            return FrameStatus::Skipped;
        };

        match self.frame(surface, dt) {
            Ok(phase) => FrameStatus::Rendered(phase),
            Err(e) => {
                log::warn!("skipping frame: {e}");
                FrameStatus::Skipped
            }
        }
    }

    fn frame<S: Surface + ?Sized>(&mut self, surface: &mut S, dt: f64) -> Result<AnimationPhase, SurfaceError> {
        if self.needs_resample {
            self.resample(surface)?;
        }
        surface.clear()?;

        match self.phase {
            AnimationPhase::Static => {
                render_particles(surface, &self.particles, self.pixel_ratio)?;
            }
            AnimationPhase::Waiting => {
                render_particles(surface, &self.particles, self.pixel_ratio)?;
                self.waited_ms += dt * 1000.0;
                if self.waited_ms >= self.config.animation.wait_ms() {
                    self.begin_sweep();
                }
            }
            AnimationPhase::Vaporizing => self.vaporize(surface, dt)?,
            AnimationPhase::FadingIn => {
                self.fade += dt * 1000.0 / self.config.animation.fade_in_ms();
                render_fade_in(surface, &mut self.particles, self.pixel_ratio, self.fade)?;
                if self.fade >= 1.0 {
                    self.waited_ms = 0.0;
                    self.set_phase(AnimationPhase::Waiting);
                }
            }
        }
        Ok(self.phase)
    }

    fn vaporize<S: Surface + ?Sized>(&mut self, surface: &mut S, dt: f64) -> Result<(), SurfaceError> {
        let duration_s = self.config.animation.vaporize_ms() / 1000.0;
        self.progress = (self.progress + dt * 100.0 / duration_s).min(100.0);

        let frontier = self.frontier();
        let done = self.simulator.step(&mut self.particles, frontier, dt);
        render_particles(surface, &self.particles, self.pixel_ratio)?;

        if self.progress >= 100.0 && done {
            // The index only moves once the next text is sampled, so a failed
            // frame retries the same text.
            let next = (self.text_index + 1) % self.config.texts.len();
            self.resample_text(surface, next)?;
            self.fade = 0.0;
            self.set_phase(AnimationPhase::FadingIn);
        }
        Ok(())
    }

    // Once the sweep is complete every particle counts as reached, so glyph
    // pixels outside the measured box cannot stall the cycle.
    fn frontier(&self) -> Frontier {
        if self.progress >= 100.0 {
            return Frontier::Exhausted;
        }
        let b = self.boundary;
        let swept = b.width * (self.progress / 100.0);
        match self.config.direction {
            Direction::LeftToRight => Frontier::At(b.left + swept),
            Direction::RightToLeft => Frontier::At(b.right - swept),
        }
    }

    fn begin_sweep(&mut self) {
        self.progress = 0.0;
        reset_particles(&mut self.particles);
        self.set_phase(AnimationPhase::Vaporizing);
    }

    fn resample<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Result<(), SurfaceError> {
        self.resample_text(surface, self.text_index)
    }

    fn resample_text<S: Surface + ?Sized>(&mut self, surface: &mut S, index: usize) -> Result<(), SurfaceError> {
        let sampler = GlyphSampler::new(
            self.config.font.clone(),
            self.color,
            self.config.alignment,
            self.pixel_ratio,
        );
        let (width, height) = self.css_size;
        let sampled = sampler.sample(surface, &self.config.texts[index], width, height)?;

        self.text_index = index;
        self.particles = sampled.particles;
        self.boundary = sampled.boundary;
        self.needs_resample = false;
        self.generation += 1;
        Ok(())
    }

    fn set_phase(&mut self, phase: AnimationPhase) {
        if self.phase != phase {
            log::debug!("phase {:?} -> {:?} (text {})", self.phase, phase, self.text_index);
            self.phase = phase;
        }
    }
}
