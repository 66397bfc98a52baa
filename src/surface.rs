// The drawing surface the background renders onto. The browser
// implementation wraps a canvas element and its 2D context; tests record the
// calls instead.

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub trait Surface {
    fn size(&self) -> (f64, f64);
    /// Wipes the previous frame, leaving the surface fully transparent.
    fn clear(&mut self) -> Result<(), String>;
    fn set_alpha(&mut self, alpha: f64);
    fn fill_circle(&mut self, center: [f64; 2], radius: f64, color: &str) -> Result<(), String>;
    fn stroke_line(
        &mut self,
        from: [f64; 2],
        to: [f64; 2],
        color: &str,
        width: f64,
    ) -> Result<(), String>;
}

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<CanvasSurface, JsValue> {
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(CanvasSurface { canvas, context })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    // Setting either dimension also wipes the canvas
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> (f64, f64) {
        (self.canvas.width() as f64, self.canvas.height() as f64)
    }

    fn clear(&mut self) -> Result<(), String> {
        let (width, height) = self.size();
        self.context.clear_rect(0.0, 0.0, width, height);
        Ok(())
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.context.set_global_alpha(alpha);
    }

    fn fill_circle(&mut self, center: [f64; 2], radius: f64, color: &str) -> Result<(), String> {
        self.context.begin_path();
        self.context
            .arc(center[0], center[1], radius, 0.0, std::f64::consts::PI * 2.0)
            .map_err(|e| format!("arc failed: {:?}", e))?;
        self.context.set_fill_style(&JsValue::from_str(color));
        self.context.fill();
        Ok(())
    }

    fn stroke_line(
        &mut self,
        from: [f64; 2],
        to: [f64; 2],
        color: &str,
        width: f64,
    ) -> Result<(), String> {
        self.context.begin_path();
        self.context.move_to(from[0], from[1]);
        self.context.line_to(to[0], to[1]);
        self.context.set_stroke_style(&JsValue::from_str(color));
        self.context.set_line_width(width);
        self.context.stroke();
        Ok(())
    }
}
