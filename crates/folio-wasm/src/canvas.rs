#![forbid(unsafe_code)]

//! 2D canvas surface.

use std::f64::consts::TAU;

use folio_web::Surface;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// [`Surface`] over a `<canvas>` element's 2D context.
pub(crate) struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// `None` if the canvas has no 2D context (already claimed by WebGL, or
    /// the browser refused one).
    pub(crate) fn new(canvas: HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { canvas, ctx })
    }
}

fn pixels(len: f64) -> u32 {
    if len.is_finite() && len > 0.0 {
        len.min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}

impl Surface for CanvasSurface {
    fn set_size(&mut self, width: f64, height: f64) {
        // Assigning either dimension resets the backing store.
        self.canvas.set_width(pixels(width));
        self.canvas.set_height(pixels(height));
    }

    fn size(&self) -> (f64, f64) {
        (
            f64::from(self.canvas.width()),
            f64::from(self.canvas.height()),
        )
    }

    fn clear(&mut self) {
        let (width, height) = self.size();
        self.ctx.clear_rect(0.0, 0.0, width, height);
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: &str) {
        self.ctx.begin_path();
        if self.ctx.arc(x, y, radius, 0.0, TAU).is_err() {
            // Negative radius.
            return;
        }
        self.ctx.set_fill_style_str(color);
        self.ctx.fill();
    }

    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: &str) {
        self.ctx.begin_path();
        self.ctx.move_to(from.0, from.1);
        self.ctx.line_to(to.0, to.1);
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(width);
        self.ctx.stroke();
    }
}
