// Frame loop for one ambient effect on one surface. The loop is an explicit
// state machine: frames only do work, and only reschedule themselves, while
// the animator is Running. Teardown is final.

use crate::error::RenderError;
use crate::surface::{fit_to_viewport, Surface, Viewport};
use log::{debug, info, warn};
use rand::rngs::ThreadRng;
use rand::Rng;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoopState {
    Uninitialized,
    Running,
    Destroyed,
}

/// Host hook for "call me back before the next repaint".
pub trait FrameScheduler {
    fn request_frame(&mut self) -> Result<i32, RenderError>;
    fn cancel_frame(&mut self, handle: i32);
}

/// Something that can be simulated and drawn once per frame.
pub trait Scene {
    /// Called on start and on every viewport change.
    fn resize<R: Rng + ?Sized>(&mut self, viewport: &Viewport, rng: &mut R);

    fn advance<R: Rng + ?Sized>(&mut self, now_ms: f64, rng: &mut R);

    fn draw<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<(), RenderError>;

    /// Pointer position in CSS pixels.
    fn pointer_moved(&mut self, _x: f64, _y: f64) {}
}

pub struct Animator<S, F, E, R = ThreadRng> {
    surface: S,
    scheduler: F,
    scene: E,
    rng: R,
    state: LoopState,
    viewport: Viewport,
    pending_frame: Option<i32>,
    frames_drawn: u64,
}

impl<S, F, E> Animator<S, F, E, ThreadRng>
where
    S: Surface,
    F: FrameScheduler,
    E: Scene,
{
    pub fn new(surface: S, scheduler: F, scene: E) -> Self {
        Animator::with_rng(surface, scheduler, scene, rand::thread_rng())
    }
}

impl<S, F, E, R> Animator<S, F, E, R>
where
    S: Surface,
    F: FrameScheduler,
    E: Scene,
    R: Rng,
{
    pub fn with_rng(surface: S, scheduler: F, scene: E, rng: R) -> Self {
        Animator {
            surface,
            scheduler,
            scene,
            rng,
            state: LoopState::Uninitialized,
            viewport: Viewport::default(),
            pending_frame: None,
            frames_drawn: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scene(&self) -> &E {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut E {
        &mut self.scene
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub fn pending_frame(&self) -> Option<i32> {
        self.pending_frame
    }

    /// Sizes the surface, populates the scene and schedules the first frame.
    /// Starting a running animator is a no-op.
    pub fn start(&mut self, viewport: Viewport) -> Result<(), RenderError> {
        match self.state {
            LoopState::Destroyed => return Err(RenderError::AlreadyDestroyed),
            LoopState::Running => return Ok(()),
            LoopState::Uninitialized => {}
        }

        self.apply_viewport(viewport)?;
        self.pending_frame = Some(self.scheduler.request_frame()?);
        self.state = LoopState::Running;
        info!(
            "animation started at {}x{} css px @{}x",
            viewport.css_width, viewport.css_height, viewport.dpr
        );
        Ok(())
    }

    pub fn resize(&mut self, viewport: Viewport) -> Result<(), RenderError> {
        if self.state == LoopState::Destroyed {
            return Ok(());
        }
        debug!(
            "resize to {}x{} css px @{}x",
            viewport.css_width, viewport.css_height, viewport.dpr
        );
        self.apply_viewport(viewport)
    }

    fn apply_viewport(&mut self, viewport: Viewport) -> Result<(), RenderError> {
        fit_to_viewport(&mut self.surface, &viewport)?;
        self.viewport = viewport;
        self.scene.resize(&viewport, &mut self.rng);
        Ok(())
    }

    /// Pointer position in CSS pixels, as reported by the host.
    pub fn pointer_moved(&mut self, css_x: f64, css_y: f64) {
        if self.state == LoopState::Destroyed {
            return;
        }
        self.scene.pointer_moved(css_x, css_y);
    }

    /// Body of the animation-frame callback. A frame that fails to draw is
    /// logged and skipped, the loop keeps going.
    pub fn on_frame(&mut self, now_ms: f64) {
        self.pending_frame = None;
        if self.state != LoopState::Running {
            return;
        }

        if let Err(err) = self.render(now_ms) {
            warn!("frame {} dropped: {}", self.frames_drawn, err);
        }

        match self.scheduler.request_frame() {
            Ok(handle) => self.pending_frame = Some(handle),
            Err(err) => warn!("could not schedule next frame: {}", err),
        }
    }

    fn render(&mut self, now_ms: f64) -> Result<(), RenderError> {
        self.surface
            .clear(self.viewport.css_width, self.viewport.css_height);
        self.scene.advance(now_ms, &mut self.rng);
        self.scene.draw(&mut self.surface)?;
        self.frames_drawn += 1;
        Ok(())
    }

    /// Cancels the pending frame. Safe to call any number of times.
    pub fn destroy(&mut self) {
        if self.state == LoopState::Destroyed {
            return;
        }
        self.state = LoopState::Destroyed;
        if let Some(handle) = self.pending_frame.take() {
            self.scheduler.cancel_frame(handle);
        }
        info!("animation torn down after {} frames", self.frames_drawn);
    }
}
