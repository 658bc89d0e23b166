//! Canvas 2D backend

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::shapes::{DrawCmd, label_font};

/// Replays display lists onto a 2D canvas
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    /// Size the canvas to the field and grab its 2D context
    pub fn new(canvas: &HtmlCanvasElement, width: f32, height: f32) -> Result<Self, JsValue> {
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");

        Ok(Self { ctx })
    }

    pub fn render(&self, cmds: &[DrawCmd]) -> Result<(), JsValue> {
        for cmd in cmds {
            match cmd {
                DrawCmd::Clear { width, height } => {
                    self.ctx.clear_rect(0.0, 0.0, *width as f64, *height as f64);
                }
                DrawCmd::Circle {
                    center,
                    radius,
                    color,
                } => {
                    self.ctx.set_fill_style_str(color);
                    self.ctx.begin_path();
                    self.ctx
                        .arc(center.x as f64, center.y as f64, *radius as f64, 0.0, TAU)?;
                    self.ctx.fill();
                }
                DrawCmd::Label {
                    center,
                    text,
                    font_px,
                    color,
                } => {
                    self.ctx.set_fill_style_str(color);
                    self.ctx.set_font(&label_font(*font_px));
                    self.ctx
                        .fill_text(text, center.x as f64, center.y as f64)?;
                }
            }
        }
        Ok(())
    }
}
