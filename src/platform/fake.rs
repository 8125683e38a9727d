use std::cell::{Cell, RefCell};

use super::{WindowId, WindowRecord, WindowSystem};
use crate::{
    error::{Error, Result},
    geometry::{Layout, Rect},
};

/// In-memory desktop for tests.
#[derive(Default)]
pub(crate) struct FakeWindowSystem {
    windows: RefCell<Vec<WindowRecord>>,
    moves: RefCell<Vec<(WindowId, Layout)>>,
    fail_enumeration: Cell<bool>,
}

impl FakeWindowSystem {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_window(self, id: WindowId, title: &str, rect: Rect) -> Self {
        self.add_window(id, title, rect);
        self
    }

    pub(crate) fn add_window(&self, id: WindowId, title: &str, rect: Rect) {
        self.windows.borrow_mut().push(WindowRecord {
            id,
            title: title.into(),
            rect,
        });
    }

    pub(crate) fn move_window(&self, id: WindowId, rect: Rect) {
        if let Some(w) = self.windows.borrow_mut().iter_mut().find(|w| w.id == id) {
            w.rect = rect;
        }
    }

    pub(crate) fn close_window(&self, id: WindowId) {
        self.windows.borrow_mut().retain(|w| w.id != id);
    }

    pub(crate) fn set_fail_enumeration(&self, fail: bool) {
        self.fail_enumeration.set(fail);
    }

    pub(crate) fn rect_of(&self, id: WindowId) -> Option<Rect> {
        self.windows
            .borrow()
            .iter()
            .find(|w| w.id == id)
            .map(|w| w.rect)
    }

    pub(crate) fn moves(&self) -> Vec<(WindowId, Layout)> {
        self.moves.borrow().clone()
    }
}

impl WindowSystem for FakeWindowSystem {
    fn top_level_windows(&self) -> Result<Vec<WindowRecord>> {
        if self.fail_enumeration.get() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "enumeration failed",
            )));
        }
        Ok(self.windows.borrow().clone())
    }

    fn set_geometry(&self, id: WindowId, layout: &Layout) -> Result<()> {
        self.moves.borrow_mut().push((id, *layout));
        let mut windows = self.windows.borrow_mut();
        let Some(window) = windows.iter_mut().find(|w| w.id == id) else {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no window {id}"),
            )));
        };
        window.rect = layout.to_rect();
        Ok(())
    }
}
