//! Canvas 2D drawing for the browser build

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{Placement, Sprite, css_rgb, velocity_color};
use crate::sim::SimState;

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    dpr: f64,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement, dpr: f64) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx, dpr })
    }

    /// Match the backing store to the CSS size; returns the CSS size
    pub fn resize(&mut self, css_width: f64, css_height: f64, dpr: f64) -> (f32, f32) {
        self.dpr = dpr;
        self.canvas.set_width((css_width * dpr) as u32);
        self.canvas.set_height((css_height * dpr) as u32);
        log::info!("Canvas resized to {}x{} (dpr {})", css_width, css_height, dpr);
        (css_width as f32, css_height as f32)
    }

    pub fn render(&self, state: &SimState, sprites: &[Sprite]) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.set_transform(self.dpr, 0.0, 0.0, self.dpr, 0.0, 0.0)?;
        ctx.clear_rect(
            0.0,
            0.0,
            self.canvas.width() as f64 / self.dpr,
            self.canvas.height() as f64 / self.dpr,
        );

        for sprite in sprites {
            if let Some(placement) = sprite.placement(state) {
                self.draw_sprite(sprite, &placement)?;
            }
        }
        Ok(())
    }

    fn draw_sprite(&self, sprite: &Sprite, p: &Placement) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let (x, y) = (p.center.x as f64, p.center.y as f64);

        ctx.begin_path();
        ctx.arc(x, y, p.size as f64 / 2.0, 0.0, TAU)?;
        ctx.set_fill_style_str(sprite.fill);
        ctx.fill();

        ctx.begin_path();
        ctx.arc(x, y, p.collision_radius as f64, 0.0, TAU)?;
        ctx.set_stroke_style_str(&css_rgb(velocity_color(p.speed)));
        ctx.set_line_width(if p.attached { 3.0 } else { 2.0 });
        ctx.stroke();

        ctx.set_fill_style_str("#ffffff");
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        ctx.set_font("14px sans-serif");
        ctx.fill_text(sprite.label, x, y)?;
        Ok(())
    }
}
