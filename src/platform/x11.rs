use std::collections::HashMap;

use log::debug;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, EnumIter};
use x11rb::{
    connection::Connection,
    protocol::xproto::{AtomEnum, ConfigureWindowAux, ConnectionExt, MapState, Window},
    rust_connection::RustConnection,
};

use super::{WindowId, WindowRecord, WindowSystem};
use crate::{
    error::{Error, Result},
    geometry::{Layout, Rect},
};

#[allow(non_camel_case_types)]
#[derive(AsRefStr, EnumIter, Hash, PartialEq, Eq, Debug, Clone, Copy)]
enum Atom {
    _NET_CLIENT_LIST,
    _NET_FRAME_EXTENTS,
    _NET_WM_NAME,
    UTF8_STRING,
}

/// Decoration a reparenting window manager draws around a client, from
/// `_NET_FRAME_EXTENTS`. All zero when the window is undecorated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct FrameExtents {
    left: i32,
    right: i32,
    top: i32,
    bottom: i32,
}

impl FrameExtents {
    /// Reads the property's `left, right, top, bottom` cardinals.
    fn from_cardinals(values: impl Iterator<Item = u32>) -> Self {
        let v: Vec<i32> = values
            .take(4)
            .map(|c| i32::try_from(c).unwrap_or(0))
            .collect();
        match v[..] {
            [left, right, top, bottom] => Self {
                left,
                right,
                top,
                bottom,
            },
            _ => Self::default(),
        }
    }

    /// The frame's outer rectangle around a client at `inner`.
    fn outer(&self, inner: Rect) -> Rect {
        Rect::new(
            inner.left - self.left,
            inner.top - self.top,
            inner.right + self.right,
            inner.bottom + self.bottom,
        )
    }

    /// The ConfigureWindow values that put the frame at `layout`.
    ///
    /// With NorthWest gravity the window manager places the frame corner at
    /// the requested position, so only the size loses the decoration.
    fn client_request(&self, layout: &Layout) -> (i32, i32, u32, u32) {
        (
            layout.x,
            layout.y,
            extent(layout.width.saturating_sub(self.left + self.right)),
            extent(layout.height.saturating_sub(self.top + self.bottom)),
        )
    }
}

/// Window services backed by a connection to the X server.
pub struct X11Windows {
    conn: RustConnection,
    root: Window,
    atoms: HashMap<Atom, u32>,
}

impl X11Windows {
    /// Connects to `$DISPLAY` and interns the atoms used for lookups.
    pub fn connect() -> Result<Self> {
        let (conn, screen_num) = x11rb::connect(None)?;

        let atom_requests = Atom::iter()
            .map(|atom| {
                Ok((
                    atom,
                    conn.intern_atom(false, atom.as_ref().as_bytes())
                        .map_err(Error::from)?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        let atoms = atom_requests
            .into_iter()
            .map(|(atom, cookie)| Ok((atom, cookie.reply().map_err(Error::from)?.atom)))
            .collect::<Result<HashMap<_, _>>>()?;

        let root = conn
            .setup()
            .roots
            .get(screen_num)
            .map(|screen| screen.root)
            .ok_or(Error::ScreenNotFound(screen_num))?;

        Ok(Self { conn, root, atoms })
    }

    fn atom(&self, atom: Atom) -> u32 {
        // every variant is interned in `connect`
        self.atoms.get(&atom).copied().unwrap_or(x11rb::NONE)
    }

    /// Managed clients from `_NET_CLIENT_LIST`, or the mapped children of
    /// the root when the window manager does not publish that list.
    fn client_windows(&self) -> Result<Vec<Window>> {
        let reply = self
            .conn
            .get_property(
                false,
                self.root,
                self.atom(Atom::_NET_CLIENT_LIST),
                AtomEnum::WINDOW,
                0,
                u32::MAX,
            )?
            .reply()?;
        if let Some(ids) = reply.value32() {
            let ids: Vec<Window> = ids.collect();
            if !ids.is_empty() {
                return Ok(ids);
            }
        }

        debug!("_NET_CLIENT_LIST unavailable, scanning root children");
        let tree = self.conn.query_tree(self.root)?.reply()?;
        Ok(tree
            .children
            .into_iter()
            .filter(|&w| self.is_viewable(w).unwrap_or(false))
            .collect())
    }

    fn is_viewable(&self, window: Window) -> Result<bool> {
        let attrs = self.conn.get_window_attributes(window)?.reply()?;
        Ok(!attrs.override_redirect && attrs.map_state == MapState::VIEWABLE)
    }

    fn title(&self, window: Window) -> Result<String> {
        let reply = self
            .conn
            .get_property(
                false,
                window,
                self.atom(Atom::_NET_WM_NAME),
                self.atom(Atom::UTF8_STRING),
                0,
                u32::MAX,
            )?
            .reply()?;
        if !reply.value.is_empty() {
            return Ok(String::from_utf8_lossy(&reply.value).into_owned());
        }

        let reply = self
            .conn
            .get_property(false, window, AtomEnum::WM_NAME, AtomEnum::ANY, 0, u32::MAX)?
            .reply()?;
        Ok(String::from_utf8_lossy(&reply.value).into_owned())
    }

    fn frame_extents(&self, window: Window) -> Result<FrameExtents> {
        let reply = self
            .conn
            .get_property(
                false,
                window,
                self.atom(Atom::_NET_FRAME_EXTENTS),
                AtomEnum::CARDINAL,
                0,
                4,
            )?
            .reply()?;
        Ok(reply
            .value32()
            .map(FrameExtents::from_cardinals)
            .unwrap_or_default())
    }

    /// Outer rectangle including decorations, in root coordinates.
    fn rect(&self, window: Window) -> Result<Rect> {
        let geometry = self.conn.get_geometry(window)?.reply()?;
        let origin = self
            .conn
            .translate_coordinates(window, self.root, 0, 0)?
            .reply()?;
        let left = i32::from(origin.dst_x);
        let top = i32::from(origin.dst_y);
        let inner = Rect::new(
            left,
            top,
            left + i32::from(geometry.width),
            top + i32::from(geometry.height),
        );
        Ok(self.frame_extents(window).unwrap_or_default().outer(inner))
    }

    fn record(&self, window: Window) -> Result<Option<WindowRecord>> {
        let title = self.title(window)?;
        if title.is_empty() {
            return Ok(None);
        }
        Ok(Some(WindowRecord {
            id: window,
            title,
            rect: self.rect(window)?,
        }))
    }
}

impl WindowSystem for X11Windows {
    fn top_level_windows(&self) -> Result<Vec<WindowRecord>> {
        let windows = self.client_windows()?;
        Ok(windows
            .into_iter()
            .filter_map(|w| match self.record(w) {
                Ok(record) => record,
                Err(e) => {
                    debug!("skipping window {w:#x}: {e}");
                    None
                }
            })
            .collect())
    }

    fn set_geometry(&self, id: WindowId, layout: &Layout) -> Result<()> {
        let extents = self.frame_extents(id).unwrap_or_else(|e| {
            debug!("no frame extents for {id:#x}: {e}");
            FrameExtents::default()
        });
        let (x, y, width, height) = extents.client_request(layout);
        // No stack_mode: the window keeps its place in the stacking order.
        let aux = ConfigureWindowAux::new()
            .x(x)
            .y(y)
            .width(width)
            .height(height);
        self.conn.configure_window(id, &aux)?.check()?;
        Ok(())
    }
}

/// X11 sizes are unsigned and non-zero.
fn extent(size: i32) -> u32 {
    u32::try_from(size).unwrap_or(0).max(1)
}
