// Browser side: a CanvasRenderingContext2d backed Surface, a scheduler on top
// of requestAnimationFrame, and the JS-facing handles that wire an Animator to
// the window's resize and the document's mousemove events.

use crate::animator::{Animator, FrameScheduler, LoopState, Scene};
use crate::config::{FieldConfig, SnowConfig};
use crate::error::RenderError;
use crate::field::{Connection, ParticleField, Sprite, LINE_WIDTH};
use crate::snowfall::{Glyph, Snowfall};
use crate::surface::{Surface, Viewport};
use log::{info, warn};
use std::cell::RefCell;
use std::f64::consts::PI;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, MouseEvent, Window};

#[cfg(feature = "frame-timing")]
pub struct Timer<'a> {
    name: &'a str,
}

#[cfg(feature = "frame-timing")]
impl<'a> Timer<'a> {
    pub fn new(name: &'a str) -> Timer<'a> {
        web_sys::console::time_with_label(name);
        Timer { name }
    }
}

#[cfg(feature = "frame-timing")]
impl<'a> Drop for Timer<'a> {
    fn drop(&mut self) {
        web_sys::console::time_end_with_label(self.name);
    }
}

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, RenderError> {
        let context = canvas
            .get_context("2d")
            .map_err(|err| RenderError::ContextUnavailable(format!("{:?}", err)))?
            .ok_or_else(|| {
                RenderError::ContextUnavailable("canvas already holds another context".to_owned())
            })?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| {
                RenderError::ContextUnavailable("not a CanvasRenderingContext2d".to_owned())
            })?;

        Ok(CanvasSurface { canvas, context })
    }

    #[allow(deprecated)]
    fn draw_glyph(&self, glyph: &Glyph) -> Result<(), RenderError> {
        let ctx = &self.context;
        ctx.translate(glyph.x, glyph.y)?;
        ctx.rotate(glyph.rotation)?;
        ctx.set_font(&format!("{}px sans-serif", glyph.size_px));
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        ctx.set_global_alpha(glyph.opacity);
        ctx.set_fill_style(&JsValue::from_str("#fff"));
        ctx.set_shadow_blur(10.0);
        ctx.set_shadow_color("rgba(255, 255, 255, 0.8)");
        ctx.fill_text(glyph.text, 0.0, 0.0)?;
        Ok(())
    }
}

#[allow(deprecated)]
impl Surface for CanvasSurface {
    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn set_style_size(&mut self, css_width: f64, css_height: f64) -> Result<(), RenderError> {
        let style = self.canvas.style();
        style.set_property("width", &format!("{}px", css_width))?;
        style.set_property("height", &format!("{}px", css_height))?;
        Ok(())
    }

    fn reset_transform(&mut self) -> Result<(), RenderError> {
        self.context.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
        Ok(())
    }

    fn scale(&mut self, factor: f64) -> Result<(), RenderError> {
        self.context.scale(factor, factor)?;
        Ok(())
    }

    fn clear(&mut self, width: f64, height: f64) {
        self.context.clear_rect(0.0, 0.0, width, height);
    }

    fn stroke_connection(&mut self, connection: &Connection) -> Result<(), RenderError> {
        let ctx = &self.context;
        let gradient = ctx.create_linear_gradient(
            connection.start.x,
            connection.start.y,
            connection.end.x,
            connection.end.y,
        );
        gradient.add_color_stop(0.0, &connection.start_color.css_rgba(connection.alpha))?;
        gradient.add_color_stop(1.0, &connection.end_color.css_rgba(connection.alpha))?;

        ctx.begin_path();
        ctx.move_to(connection.start.x, connection.start.y);
        ctx.line_to(connection.end.x, connection.end.y);
        ctx.set_stroke_style(&gradient);
        ctx.set_line_width(LINE_WIDTH);
        ctx.stroke();
        Ok(())
    }

    fn fill_sprite(&mut self, sprite: &Sprite) -> Result<(), RenderError> {
        let ctx = &self.context;
        ctx.begin_path();
        ctx.arc(sprite.center.x, sprite.center.y, sprite.radius, 0.0, PI * 2.0)?;
        ctx.set_fill_style(&JsValue::from_str(&sprite.color.css_rgba(sprite.alpha)));
        ctx.fill();

        if let Some(blur) = sprite.glow_blur() {
            ctx.set_shadow_blur(blur);
            ctx.set_shadow_color(&sprite.color.css_hex());
            ctx.fill();
            ctx.set_shadow_blur(0.0);
        }
        Ok(())
    }

    fn fill_glyph(&mut self, glyph: &Glyph) -> Result<(), RenderError> {
        self.context.save();
        let drawn = self.draw_glyph(glyph);
        self.context.restore();
        drawn
    }
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

// The JS function object backing a closure, for rAF and listener calls
fn as_function<T: ?Sized>(closure: &Closure<T>) -> &js_sys::Function {
    closure.as_ref().unchecked_ref()
}

pub struct WindowScheduler {
    window: Window,
    callback: FrameCallback,
}

impl FrameScheduler for WindowScheduler {
    fn request_frame(&mut self) -> Result<i32, RenderError> {
        let callback = self.callback.borrow();
        let callback = callback
            .as_ref()
            .ok_or_else(|| RenderError::Host("frame callback already released".to_owned()))?;
        Ok(self
            .window
            .request_animation_frame(as_function(callback))?)
    }

    fn cancel_frame(&mut self, handle: i32) {
        if let Err(err) = self.window.cancel_animation_frame(handle) {
            warn!("cancelAnimationFrame({}) failed: {:?}", handle, err);
        }
    }
}

type SharedAnimator<E> = Rc<RefCell<Animator<CanvasSurface, WindowScheduler, E>>>;

fn measure(window: &Window, canvas: &HtmlCanvasElement) -> Viewport {
    let rect = canvas.get_bounding_client_rect();
    Viewport::new(rect.width(), rect.height(), window.device_pixel_ratio())
}

// Owns the closures handed to the browser. The frame closure holds the
// animator, which holds the scheduler, which holds the frame closure: the
// cycle is broken in destroy().
struct Driver<E: Scene + 'static> {
    window: Window,
    document: Document,
    animator: SharedAnimator<E>,
    frame_callback: FrameCallback,
    on_resize: Option<Closure<dyn FnMut()>>,
    on_pointer_move: Option<Closure<dyn FnMut(MouseEvent)>>,
}

impl<E: Scene + 'static> Driver<E> {
    fn attach(canvas: HtmlCanvasElement, scene: E, track_pointer: bool) -> Result<Self, RenderError> {
        let window = web_sys::window().ok_or_else(|| RenderError::Host("no global window".to_owned()))?;
        let document = window
            .document()
            .ok_or_else(|| RenderError::Host("window has no document".to_owned()))?;

        // No frame or listener exists until the context is ours
        let surface = CanvasSurface::new(canvas.clone())?;

        let frame_callback: FrameCallback = Rc::new(RefCell::new(None));
        let scheduler = WindowScheduler {
            window: window.clone(),
            callback: frame_callback.clone(),
        };
        let animator = Rc::new(RefCell::new(Animator::new(surface, scheduler, scene)));
        {
            let animator = animator.clone();
            *frame_callback.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
                #[cfg(feature = "frame-timing")]
                let _timer = Timer::new("animation frame");
                animator.borrow_mut().on_frame(now);
            }) as Box<dyn FnMut(f64)>));
        }

        let mut driver = Driver {
            window,
            document,
            animator,
            frame_callback,
            on_resize: None,
            on_pointer_move: None,
        };

        let viewport = measure(&driver.window, &canvas);
        driver.animator.borrow_mut().start(viewport)?;

        let on_resize = {
            let animator = driver.animator.clone();
            let window = driver.window.clone();
            Closure::wrap(Box::new(move || {
                let viewport = measure(&window, &canvas);
                if let Err(err) = animator.borrow_mut().resize(viewport) {
                    warn!("resize failed: {}", err);
                }
            }) as Box<dyn FnMut()>)
        };
        driver
            .window
            .add_event_listener_with_callback("resize", as_function(&on_resize))?;
        driver.on_resize = Some(on_resize);

        if track_pointer {
            let on_pointer_move = {
                let animator = driver.animator.clone();
                Closure::wrap(Box::new(move |event: MouseEvent| {
                    animator
                        .borrow_mut()
                        .pointer_moved(event.client_x() as f64, event.client_y() as f64);
                }) as Box<dyn FnMut(MouseEvent)>)
            };
            driver
                .document
                .add_event_listener_with_callback("mousemove", as_function(&on_pointer_move))?;
            driver.on_pointer_move = Some(on_pointer_move);
        }

        Ok(driver)
    }

    fn state(&self) -> LoopState {
        self.animator.borrow().state()
    }

    fn destroy(&mut self) {
        self.animator.borrow_mut().destroy();

        if let Some(listener) = self.on_resize.take() {
            if let Err(err) = self
                .window
                .remove_event_listener_with_callback("resize", as_function(&listener))
            {
                warn!("could not remove resize listener: {:?}", err);
            }
        }
        if let Some(listener) = self.on_pointer_move.take() {
            if let Err(err) = self
                .document
                .remove_event_listener_with_callback("mousemove", as_function(&listener))
            {
                warn!("could not remove mousemove listener: {:?}", err);
            }
        }

        self.frame_callback.borrow_mut().take();
    }
}

impl<E: Scene + 'static> Drop for Driver<E> {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Animated particle field drawn on a fixed, full-viewport canvas.
#[wasm_bindgen]
pub struct ParticleBackground {
    driver: Driver<ParticleField>,
}

#[wasm_bindgen]
impl ParticleBackground {
    pub fn attach(
        canvas: HtmlCanvasElement,
        config: Option<FieldConfig>,
    ) -> Result<ParticleBackground, JsValue> {
        let field = ParticleField::new(config.unwrap_or_default())?;
        let driver = Driver::attach(canvas, field, true)?;
        info!("particle background attached");
        Ok(ParticleBackground { driver })
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.driver.state() == LoopState::Running
    }

    #[wasm_bindgen(getter, js_name = particleCount)]
    pub fn particle_count(&self) -> usize {
        self.driver.animator.borrow().scene().particles().len()
    }

    pub fn destroy(&mut self) {
        self.driver.destroy();
    }
}

#[wasm_bindgen]
pub struct SnowfallOverlay {
    driver: Driver<Snowfall>,
}

#[wasm_bindgen]
impl SnowfallOverlay {
    pub fn attach(
        canvas: HtmlCanvasElement,
        config: Option<SnowConfig>,
    ) -> Result<SnowfallOverlay, JsValue> {
        let snowfall = Snowfall::new(config.unwrap_or_default())?;
        let driver = Driver::attach(canvas, snowfall, false)?;
        info!("snowfall overlay attached");
        Ok(SnowfallOverlay { driver })
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.driver.state() == LoopState::Running
    }

    /// Call when a route change starts; refreshes pause briefly.
    #[wasm_bindgen(js_name = notifyNavigation)]
    pub fn notify_navigation(&mut self) {
        let now = self
            .driver
            .window
            .performance()
            .map(|p| p.now())
            .unwrap_or(0.0);
        self.driver
            .animator
            .borrow_mut()
            .scene_mut()
            .notify_navigation(now);
    }

    pub fn destroy(&mut self) {
        self.driver.destroy();
    }
}
