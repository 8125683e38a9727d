use serde::{Deserialize, Serialize};

/// Screen bounds as reported by the window system: edges, not sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
}

/// Stored geometry of a window, keyed by name in the layout file.
///
/// Field names follow the on-disk format (`X`, `Y`, `Width`, `Height`).
/// Sizes are signed so a hand-edited file with odd values still loads,
/// and a missing field reads as 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Layout {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

pub trait Positionable {
    fn get_position(&self) -> (i32, i32);
}

pub trait Dimensionable {
    fn get_dimensions(&self) -> (i32, i32);
}

impl Layout {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn to_rect(&self) -> Rect {
        Rect::new(
            self.x,
            self.y,
            self.x.saturating_add(self.width),
            self.y.saturating_add(self.height),
        )
    }
}

impl From<Rect> for Layout {
    fn from(rect: Rect) -> Self {
        Self {
            x: rect.left,
            y: rect.top,
            width: rect.right.saturating_sub(rect.left),
            height: rect.bottom.saturating_sub(rect.top),
        }
    }
}

impl Positionable for Layout {
    fn get_position(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

impl Dimensionable for Layout {
    fn get_dimensions(&self) -> (i32, i32) {
        (self.width, self.height)
    }
}
