//! Terminal raster canvas.
//!
//! Logical pixels are scaled onto a grid of `cols × rows*2` colour pixels,
//! two per cell (upper-half block). Text is a glyph overlay on whole cells.

use crate::assets::Assets;
use crate::draw::{Canvas, ImageKey, Point, Rect, Rgba, Size};
use crate::term::{Cell, CellBuffer};
use crossterm::style::Color;
use std::f32::consts::PI;

/// Text is anchored at its top edge; this puts it on the row of its middle.
const TEXT_HALF_HEIGHT: f32 = 10.0;
const HALF_BLOCK: char = '▀';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Glyph {
    ch: char,
    fg: Rgba,
}

pub(crate) struct Raster {
    cols: u16,
    rows: u16,
    screen_w: f32,
    screen_h: f32,
    px: Vec<[u8; 3]>,
    glyphs: Vec<Option<Glyph>>,
}

impl Raster {
    pub(crate) fn new(cols: u16, rows: u16, screen_w: i32, screen_h: i32) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            cols,
            rows,
            screen_w: screen_w.max(1) as f32,
            screen_h: screen_h.max(1) as f32,
            px: vec![[0; 3]; cols as usize * rows as usize * 2],
            glyphs: vec![None; cols as usize * rows as usize],
        }
    }

    pub(crate) fn clear(&mut self) {
        self.px.fill([0; 3]);
        self.glyphs.fill(None);
    }

    fn px_w(&self) -> i32 {
        self.cols as i32
    }

    fn px_h(&self) -> i32 {
        self.rows as i32 * 2
    }

    fn sx(&self) -> f32 {
        self.cols as f32 / self.screen_w
    }

    fn sy(&self) -> f32 {
        (self.rows as f32 * 2.0) / self.screen_h
    }

    /// Logical pixel at the centre of a terminal cell.
    pub(crate) fn cell_to_screen(&self, col: u16, row: u16) -> (i32, i32) {
        let x = (col as f32 + 0.5) * self.screen_w / self.cols as f32;
        let y = (row as f32 + 0.5) * self.screen_h / self.rows as f32;
        (x as i32, y as i32)
    }

    #[cfg(test)]
    pub(crate) fn pixel(&self, x: i32, y: i32) -> Option<[u8; 3]> {
        if x < 0 || y < 0 || x >= self.px_w() || y >= self.px_h() {
            return None;
        }
        Some(self.px[(y * self.px_w() + x) as usize])
    }

    fn blend(&mut self, x: i32, y: i32, c: Rgba) {
        if c.a == 0 || x < 0 || y < 0 || x >= self.px_w() || y >= self.px_h() {
            return;
        }
        let i = (y * self.px_w() + x) as usize;
        let a = c.a as f32 / 255.0;
        let dst = self.px[i];
        let mix = |s: u8, d: u8| (s as f32 * a + d as f32 * (1.0 - a)).round().clamp(0.0, 255.0) as u8;
        self.px[i] = [mix(c.r, dst[0]), mix(c.g, dst[1]), mix(c.b, dst[2])];

        // mostly opaque paint hides text underneath
        if c.a >= 128 {
            let cell = (y / 2 * self.px_w() + x) as usize;
            self.glyphs[cell] = None;
        }
    }

    /// Raster-space box for a logical rectangle, widened to at least one
    /// pixel on each axis so thin shapes stay visible.
    fn raster_box(&self, x: f32, y: f32, w: f32, h: f32) -> (f32, f32, f32, f32) {
        let (mut x0, mut x1) = (x * self.sx(), (x + w) * self.sx());
        let (mut y0, mut y1) = (y * self.sy(), (y + h) * self.sy());
        if x1 - x0 < 1.0 {
            let c = (x0 + x1) / 2.0;
            x0 = c - 0.5;
            x1 = c + 0.5;
        }
        if y1 - y0 < 1.0 {
            let c = (y0 + y1) / 2.0;
            y0 = c - 0.5;
            y1 = c + 0.5;
        }
        (x0, y0, x1, y1)
    }

    /// Pixels whose centres fall inside the half-open box.
    fn covered(x0: f32, y0: f32, x1: f32, y1: f32) -> impl Iterator<Item = (i32, i32)> {
        let (ix0, ix1) = ((x0 - 0.5).ceil() as i32, (x1 - 0.5).ceil() as i32);
        let (iy0, iy1) = ((y0 - 0.5).ceil() as i32, (y1 - 0.5).ceil() as i32);
        (iy0..iy1).flat_map(move |y| (ix0..ix1).map(move |x| (x, y)))
    }

    pub(crate) fn to_cells(&self, out: &mut CellBuffer) {
        let w = self.cols as usize;
        for row in 0..self.rows.min(out.h) {
            for col in 0..self.cols.min(out.w) {
                let top = self.px[(row as usize * 2) * w + col as usize];
                let bottom = self.px[(row as usize * 2 + 1) * w + col as usize];
                let cell = match self.glyphs[row as usize * w + col as usize] {
                    Some(g) => Cell {
                        ch: g.ch,
                        fg: Color::Rgb { r: g.fg.r, g: g.fg.g, b: g.fg.b },
                        bg: rgb(avg(top, bottom)),
                    },
                    None => Cell { ch: HALF_BLOCK, fg: rgb(top), bg: rgb(bottom) },
                };
                out.set(col, row, cell);
            }
        }
    }
}

fn avg(a: [u8; 3], b: [u8; 3]) -> [u8; 3] {
    [
        ((a[0] as u16 + b[0] as u16) / 2) as u8,
        ((a[1] as u16 + b[1] as u16) / 2) as u8,
        ((a[2] as u16 + b[2] as u16) / 2) as u8,
    ]
}

fn rgb(c: [u8; 3]) -> Color {
    Color::Rgb { r: c[0], g: c[1], b: c[2] }
}

/// A raster paired with the sprites it can blit.
pub(crate) struct RasterCanvas<'a> {
    pub(crate) raster: &'a mut Raster,
    pub(crate) assets: &'a Assets,
}

impl Canvas for RasterCanvas<'_> {
    fn draw_image(&mut self, key: ImageKey, center: Point, size: Size) {
        let Some(sprite) = self.assets.get(key) else {
            return;
        };
        if sprite.w == 0 || sprite.h == 0 {
            return;
        }
        let (x0, y0, x1, y1) = self.raster.raster_box(
            center.x - size.w / 2.0,
            center.y - size.h / 2.0,
            size.w,
            size.h,
        );
        for (x, y) in Raster::covered(x0, y0, x1, y1) {
            let u = ((x as f32 + 0.5 - x0) / (x1 - x0)).clamp(0.0, 0.999_999);
            let v = ((y as f32 + 0.5 - y0) / (y1 - y0)).clamp(0.0, 0.999_999);
            let c = sprite.get((u * sprite.w as f32) as u32, (v * sprite.h as f32) as u32);
            self.raster.blend(x, y, c);
        }
    }

    fn draw_circle_outline(&mut self, center: Point, radius: f32, color: Rgba) {
        let r = &mut *self.raster;
        let (cx, cy) = (center.x * r.sx(), center.y * r.sy());
        let (rx, ry) = (radius * r.sx(), radius * r.sy());
        let steps = ((2.0 * PI * rx.max(ry) * 2.0).ceil() as usize).max(24);
        let mut last = None;
        for s in 0..steps {
            let a = 2.0 * PI * s as f32 / steps as f32;
            let p = ((cx + a.cos() * rx).floor() as i32, (cy + a.sin() * ry).floor() as i32);
            if last == Some(p) {
                continue;
            }
            last = Some(p);
            r.blend(p.0, p.1, color);
        }
    }

    fn draw_filled_rect(&mut self, rect: Rect, color: Rgba, corner_radius: f32) {
        let r = &mut *self.raster;
        let (x0, y0, x1, y1) = r.raster_box(rect.x as f32, rect.y as f32, rect.w as f32, rect.h as f32);
        let max_r = (rect.w.min(rect.h) as f32 / 2.0).max(0.0);
        let cr = corner_radius.clamp(0.0, max_r);
        let (crx, cry) = (cr * r.sx(), cr * r.sy());

        for (x, y) in Raster::covered(x0, y0, x1, y1) {
            if crx > 0.0 && cry > 0.0 {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;
                let nx = px.clamp(x0 + crx, (x1 - crx).max(x0 + crx));
                let ny = py.clamp(y0 + cry, (y1 - cry).max(y0 + cry));
                let dx = (px - nx) / crx;
                let dy = (py - ny) / cry;
                if dx * dx + dy * dy > 1.0 {
                    continue;
                }
            }
            r.blend(x, y, color);
        }
    }

    fn draw_text(&mut self, text: &str, position: Point, color: Rgba) {
        let r = &mut *self.raster;
        let col = (position.x * r.cols as f32 / r.screen_w).floor() as i32;
        let row = ((position.y + TEXT_HALF_HEIGHT) * r.rows as f32 / r.screen_h).floor() as i32;
        if row < 0 || row >= r.rows as i32 {
            return;
        }
        for (i, ch) in text.chars().enumerate() {
            let c = col + i as i32;
            if c < 0 {
                continue;
            }
            if c >= r.cols as i32 {
                break;
            }
            r.glyphs[(row * r.cols as i32 + c) as usize] = Some(Glyph { ch, fg: color });
        }
    }

    fn draw_point(&mut self, position: Point, color: Rgba, radius: f32) {
        let r = &mut *self.raster;
        let (cx, cy) = (position.x * r.sx(), position.y * r.sy());
        let (rx, ry) = ((radius * r.sx()).max(0.5), (radius * r.sy()).max(0.5));
        let mut any = false;
        for (x, y) in Raster::covered(cx - rx, cy - ry, cx + rx, cy + ry) {
            let dx = (x as f32 + 0.5 - cx) / rx;
            let dy = (y as f32 + 0.5 - cy) / ry;
            if dx * dx + dy * dy <= 1.0 {
                r.blend(x, y, color);
                any = true;
            }
        }
        if !any {
            r.blend(cx.floor() as i32, cy.floor() as i32, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Sprite;
    use crate::draw::{DrawList, WHITE};

    // 1 logical px per raster px: 100 cols, 50 rows -> 100 x 100 raster
    fn raster() -> Raster {
        Raster::new(100, 50, 100, 100)
    }

    #[test]
    fn filled_rect_covers_its_pixels() {
        let mut r = raster();
        let assets = Assets::default();
        RasterCanvas { raster: &mut r, assets: &assets }.draw_filled_rect(
            Rect::new(10, 10, 5, 4),
            Rgba::rgb(255, 0, 0),
            0.0,
        );
        assert_eq!(r.pixel(10, 10), Some([255, 0, 0]));
        assert_eq!(r.pixel(14, 13), Some([255, 0, 0]));
        assert_eq!(r.pixel(15, 13), Some([0, 0, 0]));
        assert_eq!(r.pixel(14, 14), Some([0, 0, 0]));
    }

    #[test]
    fn rounded_corners_are_cut() {
        let mut r = raster();
        let assets = Assets::default();
        RasterCanvas { raster: &mut r, assets: &assets }.draw_filled_rect(
            Rect::new(0, 0, 40, 40),
            WHITE,
            10.0,
        );
        assert_eq!(r.pixel(0, 0), Some([0, 0, 0]));
        assert_eq!(r.pixel(20, 0), Some([255, 255, 255]));
        assert_eq!(r.pixel(20, 20), Some([255, 255, 255]));
    }

    #[test]
    fn alpha_blends_over_background() {
        let mut r = raster();
        let assets = Assets::default();
        let mut c = RasterCanvas { raster: &mut r, assets: &assets };
        c.draw_filled_rect(Rect::new(0, 0, 10, 10), Rgba::rgb(200, 100, 0), 0.0);
        c.draw_point(Point::new(5.0, 5.0), WHITE.with_alpha(128), 1.0);
        let p = r.pixel(5, 5).unwrap();
        assert!(p[0] > 200 && p[1] > 100 && p[2] > 100 && p[2] < 140, "{p:?}");
    }

    #[test]
    fn thin_shapes_stay_visible_when_downscaled() {
        // 10 logical px per raster px
        let mut r = Raster::new(10, 5, 100, 100);
        let assets = Assets::default();
        let mut c = RasterCanvas { raster: &mut r, assets: &assets };
        c.draw_filled_rect(Rect::new(40, 40, 20, 3), WHITE, 0.0);
        c.draw_point(Point::new(75.0, 75.0), WHITE, 1.0);
        assert_eq!(r.pixel(4, 4), Some([255, 255, 255]));
        assert_eq!(r.pixel(7, 7), Some([255, 255, 255]));
    }

    #[test]
    fn image_is_scaled_into_its_box() {
        let mut assets = Assets::default();
        let mut sp = Sprite::new(2, 1);
        sp.px = vec![Rgba::rgb(255, 0, 0), Rgba::rgb(0, 0, 255)];
        assets.insert(ImageKey::Sun, sp);

        let mut r = raster();
        RasterCanvas { raster: &mut r, assets: &assets }.draw_image(
            ImageKey::Sun,
            Point::new(50.0, 50.0),
            Size { w: 20.0, h: 10.0 },
        );
        assert_eq!(r.pixel(41, 50), Some([255, 0, 0]));
        assert_eq!(r.pixel(58, 50), Some([0, 0, 255]));
        assert_eq!(r.pixel(61, 50), Some([0, 0, 0]));
        assert_eq!(r.pixel(50, 44), Some([0, 0, 0]));
    }

    #[test]
    fn circle_outline_leaves_centre_empty() {
        let mut r = raster();
        let assets = Assets::default();
        RasterCanvas { raster: &mut r, assets: &assets }.draw_circle_outline(
            Point::new(50.0, 50.0),
            20.0,
            WHITE,
        );
        assert_eq!(r.pixel(50, 50), Some([0, 0, 0]));
        assert_eq!(r.pixel(70, 50), Some([255, 255, 255]));
    }

    #[test]
    fn later_paint_occludes_text() {
        let mut r = raster();
        let assets = Assets::default();
        let mut list = DrawList::default();
        list.text("Hi", 0.0, 0.0, WHITE);
        list.text("Yo", 0.0, 40.0, WHITE);
        list.rect(Rect::new(0, 40, 10, 20), Rgba::rgb(1, 2, 3), 0.0);
        list.replay(&mut RasterCanvas { raster: &mut r, assets: &assets });

        let mut cells = CellBuffer::new(100, 50);
        r.to_cells(&mut cells);
        // "Hi" sits on the row of its middle (y = 10 -> row 5)
        assert_eq!(cells.get(0, 5).ch, 'H');
        assert_eq!(cells.get(1, 5).ch, 'i');
        assert_eq!(cells.get(0, 25).ch, HALF_BLOCK);
        assert_eq!(cells.get(0, 0).ch, HALF_BLOCK);
    }

    #[test]
    fn pointer_maps_to_cell_centre() {
        let r = Raster::new(160, 45, 1365, 780);
        let (x, y) = r.cell_to_screen(0, 0);
        assert_eq!((x, y), (4, 8));
        let (x, y) = r.cell_to_screen(159, 44);
        assert!(x < 1365 && y < 780 && x > 1350 && y > 760);
    }
}
