use std::collections::HashMap;

use log::{debug, warn};

use crate::platform::{WindowRecord, WindowSystem};

/// Matched windows keyed by full title.
pub type LocatedWindows = HashMap<String, WindowRecord>;

/// Finds every top-level window whose title starts with `prefix`.
///
/// The comparison is exact and case-sensitive. Two windows with the same
/// title collapse into one entry; which one survives depends on the order
/// the window system reports them in. Enumeration failures are logged and
/// give an empty result.
pub fn locate_windows(windows: &impl WindowSystem, prefix: &str) -> LocatedWindows {
    let all = match windows.top_level_windows() {
        Ok(all) => all,
        Err(e) => {
            warn!("window enumeration failed: {e}");
            return LocatedWindows::new();
        }
    };

    let mut located = LocatedWindows::new();
    for window in all {
        if window.title.starts_with(prefix) {
            located.insert(window.title.clone(), window);
        }
    }
    debug!("located {} window(s) with prefix {prefix:?}", located.len());
    located
}

/// The store key for a title, if it carries the prefix.
pub fn window_name<'a>(title: &'a str, prefix: &str) -> Option<&'a str> {
    title.strip_prefix(prefix)
}
