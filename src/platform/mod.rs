use crate::{
    error::Result,
    geometry::{Layout, Rect},
};

mod x11;

#[cfg(test)]
pub(crate) mod fake;

pub use self::x11::X11Windows;

// x11 window id
pub type WindowId = u32;

/// One top-level window as seen during a single enumeration pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowRecord {
    pub id: WindowId,
    pub title: String,
    pub rect: Rect,
}

/// The native window services the layout logic depends on.
pub trait WindowSystem {
    /// Every top-level window with a title, in whatever order the system reports them.
    fn top_level_windows(&self) -> Result<Vec<WindowRecord>>;

    /// Moves and resizes `id` without touching its stacking order.
    fn set_geometry(&self, id: WindowId, layout: &Layout) -> Result<()>;
}
