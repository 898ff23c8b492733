use crate::catalog::BodyId;

// -------------------- Geometry --------------------
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Point {
    pub(crate) x: f32,
    pub(crate) y: f32,
}

impl Point {
    pub(crate) fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Size {
    pub(crate) w: f32,
    pub(crate) h: f32,
}

impl Size {
    pub(crate) fn square(s: f32) -> Self {
        Self { w: s, h: s }
    }
}

/// Integer screen rectangle, half-open on the right and bottom edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Rect {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) w: i32,
    pub(crate) h: i32,
}

impl Rect {
    pub(crate) const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub(crate) fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.x + self.w && py >= self.y && py < self.y + self.h
    }

    #[cfg(test)]
    pub(crate) fn intersects(&self, o: &Rect) -> bool {
        self.x < o.x + o.w && o.x < self.x + self.w && self.y < o.y + o.h && o.y < self.y + self.h
    }
}

// -------------------- Colour --------------------
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub(crate) struct Rgba {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl Rgba {
    pub(crate) const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
    pub(crate) const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

pub(crate) const WHITE: Rgba = Rgba::rgb(255, 255, 255);
pub(crate) const HIGHLIGHT: Rgba = Rgba::rgb(100, 100, 255);
pub(crate) const PANEL_BG: Rgba = Rgba { r: 74, g: 4, b: 4, a: 180 };
pub(crate) const TOGGLE_BG: Rgba = Rgba::rgb(74, 4, 4);

// -------------------- Draw commands --------------------
/// Opaque handle for a pre-scaled picture. The canvas owns the pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum ImageKey {
    Background,
    Sun,
    Orbit(BodyId),
    Icon(BodyId),
    Expanded(BodyId),
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum DrawCommand {
    Image { key: ImageKey, center: Point, size: Size },
    CircleOutline { center: Point, radius: f32, color: Rgba },
    FilledRect { rect: Rect, color: Rgba, corner_radius: f32 },
    Text { text: String, position: Point, color: Rgba },
    Point { position: Point, color: Rgba, radius: f32 },
}

pub(crate) trait Canvas {
    fn draw_image(&mut self, key: ImageKey, center: Point, size: Size);
    fn draw_circle_outline(&mut self, center: Point, radius: f32, color: Rgba);
    fn draw_filled_rect(&mut self, rect: Rect, color: Rgba, corner_radius: f32);
    fn draw_text(&mut self, text: &str, position: Point, color: Rgba);
    fn draw_point(&mut self, position: Point, color: Rgba, radius: f32);
}

impl DrawCommand {
    pub(crate) fn apply<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        match self {
            DrawCommand::Image { key, center, size } => canvas.draw_image(*key, *center, *size),
            DrawCommand::CircleOutline { center, radius, color } => {
                canvas.draw_circle_outline(*center, *radius, *color)
            }
            DrawCommand::FilledRect { rect, color, corner_radius } => {
                canvas.draw_filled_rect(*rect, *color, *corner_radius)
            }
            DrawCommand::Text { text, position, color } => canvas.draw_text(text, *position, *color),
            DrawCommand::Point { position, color, radius } => {
                canvas.draw_point(*position, *color, *radius)
            }
        }
    }
}

/// Back-to-front list of commands for one frame.
#[derive(Clone, Debug, Default)]
pub(crate) struct DrawList {
    cmds: Vec<DrawCommand>,
}

impl DrawList {
    pub(crate) fn with_capacity(n: usize) -> Self {
        Self { cmds: Vec::with_capacity(n) }
    }
    pub(crate) fn push(&mut self, cmd: DrawCommand) {
        self.cmds.push(cmd);
    }
    pub(crate) fn image(&mut self, key: ImageKey, center: Point, size: Size) {
        self.push(DrawCommand::Image { key, center, size });
    }
    pub(crate) fn text(&mut self, text: impl Into<String>, x: f32, y: f32, color: Rgba) {
        self.push(DrawCommand::Text { text: text.into(), position: Point::new(x, y), color });
    }
    pub(crate) fn rect(&mut self, rect: Rect, color: Rgba, corner_radius: f32) {
        self.push(DrawCommand::FilledRect { rect, color, corner_radius });
    }
    pub(crate) fn commands(&self) -> &[DrawCommand] {
        &self.cmds
    }
    pub(crate) fn replay<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        for c in self.commands() {
            c.apply(canvas);
        }
    }
}
