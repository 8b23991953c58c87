use minisnake_core::Surface;
use std::f64::consts::TAU;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// [`Surface`] backed by a 2D canvas context.
pub(crate) struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub(crate) fn from_canvas(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { ctx })
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, width: f64, height: f64, color: &str) {
        self.ctx.clear_rect(0., 0., width, height);
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(0., 0., width, height);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(x, y, width, height);
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.begin_path();
        if let Err(err) = self.ctx.arc(cx, cy, radius, 0., TAU) {
            log::warn!("arc failed: {:?}", err);
            return;
        }
        self.ctx.fill();
    }

    fn line(&mut self, from: (f64, f64), to: (f64, f64), color: &str) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.begin_path();
        self.ctx.move_to(from.0, from.1);
        self.ctx.line_to(to.0, to.1);
        self.ctx.stroke();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minisnake_core::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn paints_a_snapshot() {
        let canvas: HtmlCanvasElement = gloo::utils::document()
            .create_element("canvas")
            .unwrap()
            .dyn_into()
            .unwrap();
        let size = canvas_size(10, 10);
        canvas.set_width(size);
        canvas.set_height(size);

        let mut surface = CanvasSurface::from_canvas(&canvas).unwrap();
        let engine = GameEngine::seeded(GameConfig::with_grid_size(10), 7);
        draw(&engine.snapshot(), &mut surface, &Palette::default(), 10.);

        // head cell of the centered snake is painted in the head color
        let (x, y) = engine.head();
        let pixel = surface
            .ctx
            .get_image_data(f64::from(x) * 10. + 5., f64::from(y) * 10. + 6., 1., 1.)
            .unwrap()
            .data();
        assert_eq!(&pixel[..3], &[0x4f, 0xac, 0xfe]);
    }
}
