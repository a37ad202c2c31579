// Test doubles for the drawing and scheduling seams.

use crate::animator::FrameScheduler;
use crate::error::RenderError;
use crate::field::{Connection, Sprite};
use crate::snowfall::Glyph;
use crate::surface::Surface;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Clear(f64, f64),
    Line { from: usize, to: usize },
    Circle { x: f64, y: f64, glow: bool },
    Glyph { x: f64, y: f64 },
}

/// Keeps sizing state the way a canvas does and logs every draw.
#[derive(Debug)]
pub struct RecordingSurface {
    pub backing: (u32, u32),
    pub style: (f64, f64),
    pub transform_scale: f64,
    pub calls: Vec<DrawCall>,
    pub fail_draws: bool,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        RecordingSurface {
            backing: (300, 150),
            style: (0.0, 0.0),
            transform_scale: 1.0,
            calls: Vec::new(),
            fail_draws: false,
        }
    }
}

impl RecordingSurface {
    fn check(&self) -> Result<(), RenderError> {
        if self.fail_draws {
            Err(RenderError::Host("draw refused".to_owned()))
        } else {
            Ok(())
        }
    }
}

impl Surface for RecordingSurface {
    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.backing = (width, height);
    }

    fn set_style_size(&mut self, css_width: f64, css_height: f64) -> Result<(), RenderError> {
        self.style = (css_width, css_height);
        Ok(())
    }

    fn reset_transform(&mut self) -> Result<(), RenderError> {
        self.transform_scale = 1.0;
        Ok(())
    }

    fn scale(&mut self, factor: f64) -> Result<(), RenderError> {
        self.transform_scale *= factor;
        Ok(())
    }

    fn clear(&mut self, width: f64, height: f64) {
        self.calls.push(DrawCall::Clear(width, height));
    }

    fn stroke_connection(&mut self, connection: &Connection) -> Result<(), RenderError> {
        self.check()?;
        self.calls.push(DrawCall::Line {
            from: connection.from,
            to: connection.to,
        });
        Ok(())
    }

    fn fill_sprite(&mut self, sprite: &Sprite) -> Result<(), RenderError> {
        self.check()?;
        self.calls.push(DrawCall::Circle {
            x: sprite.center.x,
            y: sprite.center.y,
            glow: sprite.glow_blur().is_some(),
        });
        Ok(())
    }

    fn fill_glyph(&mut self, glyph: &Glyph) -> Result<(), RenderError> {
        self.check()?;
        self.calls.push(DrawCall::Glyph {
            x: glyph.x,
            y: glyph.y,
        });
        Ok(())
    }
}

#[derive(Debug, Default)]
struct SchedulerState {
    next_handle: i32,
    pending: VecDeque<i32>,
    cancelled: Vec<i32>,
    refuse: bool,
}

/// Frames only run when the test fires them. Clones share state, so the
/// test keeps one handle while the animator owns the other.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    state: Rc<RefCell<SchedulerState>>,
}

impl ManualScheduler {
    pub fn pending(&self) -> Vec<i32> {
        self.state.borrow().pending.iter().copied().collect()
    }

    pub fn cancelled(&self) -> Vec<i32> {
        self.state.borrow().cancelled.clone()
    }

    /// Takes the oldest pending frame, as the host would when it repaints.
    pub fn fire(&self) -> Option<i32> {
        self.state.borrow_mut().pending.pop_front()
    }

    pub fn refuse_requests(&self) {
        self.state.borrow_mut().refuse = true;
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> Result<i32, RenderError> {
        let mut state = self.state.borrow_mut();
        if state.refuse {
            return Err(RenderError::Host("requestAnimationFrame refused".to_owned()));
        }
        state.next_handle += 1;
        let handle = state.next_handle;
        state.pending.push_back(handle);
        Ok(handle)
    }

    fn cancel_frame(&mut self, handle: i32) {
        let mut state = self.state.borrow_mut();
        state.pending.retain(|h| *h != handle);
        state.cancelled.push(handle);
    }
}
