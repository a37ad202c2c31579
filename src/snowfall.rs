// Snowfall overlay: a handful of snowflake glyphs falling across the page.
// Each flake loops from just above the viewport to its bottom edge, turning
// once per fall. Every few seconds a random batch of flakes is swapped for
// new ones, unless a page navigation just started.

use crate::animator::Scene;
use crate::config::SnowConfig;
use crate::error::RenderError;
use crate::surface::{Surface, Viewport};
use log::debug;
use rand::Rng;
use std::f64::consts::PI;

pub const SNOWFLAKE_GLYPH: &str = "\u{2744}";

// Flakes start this far above the top edge, as a fraction of the height
const START_OFFSET: f64 = 0.1;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Snowflake {
    pub id: usize,
    /// Horizontal position as a percentage of the viewport width.
    pub left_pct: f64,
    pub duration_s: f64,
    pub delay_s: f64,
    pub font_px: f64,
    pub opacity: f64,
    /// Clock time the flake's animation was (re)started. None until the
    /// first frame timestamp is known.
    pub born_ms: Option<f64>,
}

impl Snowflake {
    pub fn generate<R: Rng + ?Sized>(id: usize, born_ms: Option<f64>, rng: &mut R) -> Snowflake {
        Snowflake {
            id,
            left_pct: rng.gen::<f64>() * 100.0,
            duration_s: 8.0 + rng.gen::<f64>() * 12.0,
            delay_s: rng.gen::<f64>() * 5.0,
            font_px: 12.0 + rng.gen::<f64>() * 18.0,
            opacity: 0.4 + rng.gen::<f64>() * 0.6,
            born_ms,
        }
    }

    /// How far through its current fall the flake is, in [0, 1).
    /// None while the start delay is still running or the flake is unstamped.
    pub fn phase(&self, now_ms: f64) -> Option<f64> {
        let elapsed_s = (now_ms - self.born_ms?) / 1000.0 - self.delay_s;
        if elapsed_s < 0.0 {
            None
        } else {
            Some((elapsed_s / self.duration_s).fract())
        }
    }
}

/// A glyph placed in CSS pixels, rotated about its own origin.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Glyph {
    pub text: &'static str,
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub size_px: f64,
    pub opacity: f64,
}

pub struct Snowfall {
    config: SnowConfig,
    flakes: Vec<Snowflake>,
    width: f64,
    height: f64,
    clock_ms: f64,
    last_refresh_ms: Option<f64>,
    paused_until_ms: f64,
}

impl Snowfall {
    pub fn new(config: SnowConfig) -> Result<Snowfall, RenderError> {
        config.validate()?;
        Ok(Snowfall {
            config,
            flakes: Vec::with_capacity(config.flake_count as usize),
            width: 0.0,
            height: 0.0,
            clock_ms: 0.0,
            last_refresh_ms: None,
            paused_until_ms: f64::NEG_INFINITY,
        })
    }

    pub fn flakes(&self) -> &[Snowflake] {
        &self.flakes
    }

    // Flakes created before the first frame get their start time from it
    fn populate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.flakes = (0..self.config.flake_count as usize)
            .map(|id| Snowflake::generate(id, None, &mut *rng))
            .collect();
    }

    /// Holds back refreshes for a moment while the page changes route.
    pub fn notify_navigation(&mut self, now_ms: f64) {
        self.paused_until_ms = now_ms + self.config.navigation_pause_ms;
    }

    pub fn is_paused(&self, now_ms: f64) -> bool {
        now_ms < self.paused_until_ms
    }

    pub fn tick<R: Rng + ?Sized>(&mut self, now_ms: f64, rng: &mut R) {
        self.clock_ms = now_ms;
        if self.flakes.is_empty() {
            self.populate(rng);
        }
        for flake in self.flakes.iter_mut().filter(|f| f.born_ms.is_none()) {
            flake.born_ms = Some(now_ms);
        }

        let last = *self.last_refresh_ms.get_or_insert(now_ms);
        if now_ms - last < self.config.refresh_interval_ms {
            return;
        }
        self.last_refresh_ms = Some(now_ms);
        if self.is_paused(now_ms) {
            debug!("snowfall refresh skipped during navigation");
            return;
        }
        self.refresh(now_ms, rng);
    }

    // Regenerates a random batch in place. Indices may repeat, so fewer
    // distinct flakes than the batch size can change.
    fn refresh<R: Rng + ?Sized>(&mut self, now_ms: f64, rng: &mut R) {
        let count = self.flakes.len();
        if count == 0 {
            return;
        }
        for _ in 0..self.config.flakes_per_refresh() {
            let index = rng.gen_range(0, count);
            self.flakes[index] = Snowflake::generate(index, Some(now_ms), rng);
        }
    }

    pub fn glyphs(&self) -> impl Iterator<Item = Glyph> + '_ {
        let (width, height, now_ms) = (self.width, self.height, self.clock_ms);
        self.flakes.iter().filter_map(move |flake| {
            let phase = flake.phase(now_ms)?;
            Some(Glyph {
                text: SNOWFLAKE_GLYPH,
                x: width * flake.left_pct / 100.0,
                y: height * (-START_OFFSET + (1.0 + START_OFFSET) * phase),
                rotation: phase * 2.0 * PI,
                size_px: flake.font_px,
                opacity: flake.opacity,
            })
        })
    }
}

impl Scene for Snowfall {
    fn resize<R: Rng + ?Sized>(&mut self, viewport: &Viewport, rng: &mut R) {
        self.width = viewport.css_width;
        self.height = viewport.css_height;
        if self.flakes.is_empty() {
            self.populate(rng);
        }
    }

    fn advance<R: Rng + ?Sized>(&mut self, now_ms: f64, rng: &mut R) {
        self.tick(now_ms, rng);
    }

    fn draw<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<(), RenderError> {
        for glyph in self.glyphs() {
            surface.fill_glyph(&glyph)?;
        }
        Ok(())
    }
}
