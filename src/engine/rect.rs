use serde::Serialize;

/// Axis-aligned box in world pixels. `y` grows downwards, so the top edge is `y`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Strict overlap: boxes that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right() &&
        self.right() > other.x &&
        self.y < other.bottom() &&
        self.bottom() > other.y
    }

    /// Grows the box by `dx`/`dy` in total, keeping it centred. Negative values shrink it.
    pub fn inflate(&self, dx: f32, dy: f32) -> Rect {
        Rect {
            x: self.x - dx / 2.0,
            y: self.y - dy / 2.0,
            width: self.width + dx,
            height: self.height + dy,
        }
    }
}
