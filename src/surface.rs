// The drawing seam. Scenes describe what to draw in terms of connections,
// sprites and glyphs; a Surface turns those into pixels. The browser build
// backs this with a CanvasRenderingContext2d, tests record the calls.

use crate::error::RenderError;
use crate::field::{Connection, Sprite};
use crate::snowfall::Glyph;

/// Layout size of the canvas in CSS pixels plus the device pixel ratio.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    pub css_width: f64,
    pub css_height: f64,
    pub dpr: f64,
}

impl Viewport {
    pub fn new(css_width: f64, css_height: f64, dpr: f64) -> Viewport {
        let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        Viewport {
            css_width: css_width.max(0.0),
            css_height: css_height.max(0.0),
            dpr,
        }
    }

    /// Backing store size, truncated the same way the DOM truncates
    /// `canvas.width = cssWidth * dpr`.
    pub fn backing_size(&self) -> (u32, u32) {
        (
            (self.css_width * self.dpr) as u32,
            (self.css_height * self.dpr) as u32,
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport::new(0.0, 0.0, 1.0)
    }
}

pub trait Surface {
    fn set_backing_size(&mut self, width: u32, height: u32);

    fn set_style_size(&mut self, css_width: f64, css_height: f64) -> Result<(), RenderError>;

    /// Back to the identity transform.
    fn reset_transform(&mut self) -> Result<(), RenderError>;

    /// Multiplies the current transform, it does not replace it.
    fn scale(&mut self, factor: f64) -> Result<(), RenderError>;

    fn clear(&mut self, width: f64, height: f64);

    fn stroke_connection(&mut self, connection: &Connection) -> Result<(), RenderError>;

    fn fill_sprite(&mut self, sprite: &Sprite) -> Result<(), RenderError>;

    fn fill_glyph(&mut self, glyph: &Glyph) -> Result<(), RenderError>;
}

/// Sizes the backing store to the viewport and installs the dpr scale.
/// The transform is reset first so repeated calls never compound the scale.
pub fn fit_to_viewport<S: Surface + ?Sized>(
    surface: &mut S,
    viewport: &Viewport,
) -> Result<(), RenderError> {
    let (width, height) = viewport.backing_size();
    surface.set_backing_size(width, height);
    surface.reset_transform()?;
    surface.scale(viewport.dpr)?;
    surface.set_style_size(viewport.css_width, viewport.css_height)
}
