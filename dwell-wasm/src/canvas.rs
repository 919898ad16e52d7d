use dwell_core::{CanvasDimensions, DrawingSurface};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

// Non-deprecated helpers to set canvas styles via property assignment.
pub fn set_fill_style(ctx: &CanvasRenderingContext2d, color: &str) {
    let _ = js_sys::Reflect::set(
        ctx.as_ref(),
        &JsValue::from_str("fillStyle"),
        &JsValue::from_str(color),
    );
}

pub fn set_stroke_style(ctx: &CanvasRenderingContext2d, color: &str) {
    let _ = js_sys::Reflect::set(
        ctx.as_ref(),
        &JsValue::from_str("strokeStyle"),
        &JsValue::from_str(color),
    );
}

/// Look up the map canvas and its 2D context. `None` while the element is
/// not in the document.
pub fn init_canvas(
    document: &Document,
    id: &str,
) -> Option<(HtmlCanvasElement, CanvasRenderingContext2d)> {
    let cv = document
        .get_element_by_id(id)?
        .dyn_into::<HtmlCanvasElement>()
        .ok()?;
    let ctx = cv
        .get_context("2d")
        .ok()??
        .dyn_into::<CanvasRenderingContext2d>()
        .ok()?;
    Some((cv, ctx))
}

/// Size the backing store by the device pixel ratio and the CSS box to
/// `dims`, so drawing in CSS pixels stays sharp.
pub fn sync_canvas_size(canvas: &HtmlCanvasElement, dims: CanvasDimensions, dpr: f64) {
    let target_w = (dims.width * dpr).round().clamp(1.0, 16384.0) as u32;
    let target_h = (dims.height * dpr).round().clamp(1.0, 16384.0) as u32;
    if canvas.width() != target_w {
        canvas.set_width(target_w);
    }
    if canvas.height() != target_h {
        canvas.set_height(target_h);
    }
    let style = canvas.style();
    let _ = style.set_property("width", &format!("{}px", dims.width));
    let _ = style.set_property("height", &format!("{}px", dims.height));
}

/// [`DrawingSurface`] over a browser 2D context.
pub struct CanvasSurface<'a> {
    ctx: &'a CanvasRenderingContext2d,
    dpr: f64,
}

impl<'a> CanvasSurface<'a> {
    pub fn new(ctx: &'a CanvasRenderingContext2d, dpr: f64) -> Self {
        CanvasSurface { ctx, dpr }
    }
}

impl DrawingSurface for CanvasSurface<'_> {
    fn clear(&mut self, dims: CanvasDimensions) {
        // resizing the canvas resets the transform, so reapply it every frame
        let _ = self
            .ctx
            .set_transform(self.dpr, 0.0, 0.0, self.dpr, 0.0, 0.0);
        self.ctx.clear_rect(0.0, 0.0, dims.width, dims.height);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }

    fn circle(&mut self, x: f64, y: f64, radius: f64) {
        self.ctx.move_to(x + radius, y);
        let _ = self.ctx.arc(x, y, radius, 0.0, std::f64::consts::TAU);
    }

    fn fill(&mut self, color: &str) {
        set_fill_style(self.ctx, color);
        self.ctx.fill();
    }

    fn stroke(&mut self, color: &str, width: f64) {
        self.ctx.set_line_width(width);
        set_stroke_style(self.ctx, color);
        self.ctx.stroke();
    }
}
