use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info, warn};

use crate::{
    config::MalformedPolicy,
    error::{Error, Result},
    geometry::Layout,
    locator::{window_name, LocatedWindows},
    platform::WindowSystem,
};

/// Desired window geometry by name, backed by a JSON file.
///
/// Keys are kept sorted so successive saves produce the same file.
#[derive(Debug)]
pub struct LayoutStore {
    path: PathBuf,
    layouts: BTreeMap<String, Layout>,
}

impl LayoutStore {
    /// Loads the store from `path`. A missing file gives an empty store.
    pub fn load(path: impl Into<PathBuf>, policy: MalformedPolicy) -> Result<Self> {
        let path = path.into();
        let layouts = read_layouts(&path, policy)?;
        info!("loaded {} layout(s) from {}", layouts.len(), path.display());
        Ok(Self { path, layouts })
    }

    /// Re-reads the backing file, replacing the in-memory map.
    pub fn reload(&mut self, policy: MalformedPolicy) -> Result<()> {
        self.layouts = read_layouts(&self.path, policy)?;
        info!(
            "reloaded {} layout(s) from {}",
            self.layouts.len(),
            self.path.display()
        );
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, name: &str) -> Option<&Layout> {
        self.layouts.get(name)
    }

    pub fn layouts(&self) -> &BTreeMap<String, Layout> {
        &self.layouts
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    /// Captures the current rectangle of every located window, then writes
    /// the whole store to disk. Returns how many windows were captured.
    pub fn save_all(&mut self, windows: &LocatedWindows, prefix: &str) -> Result<usize> {
        let mut captured = 0;
        for (title, window) in windows {
            let Some(name) = window_name(title, prefix) else {
                continue;
            };
            self.layouts.insert(name.to_string(), Layout::from(window.rect));
            captured += 1;
        }
        self.persist()?;
        Ok(captured)
    }

    /// Moves every located window that has a stored layout. Windows without
    /// one are left alone. Returns how many move requests went out.
    pub fn restore_all(
        &self,
        system: &impl WindowSystem,
        windows: &LocatedWindows,
        prefix: &str,
    ) -> usize {
        let mut restored = 0;
        for (title, window) in windows {
            let Some(layout) = window_name(title, prefix).and_then(|name| self.get(name)) else {
                continue;
            };
            if let Err(e) = system.set_geometry(window.id, layout) {
                debug!("failed to restore {title:?}: {e}");
                continue;
            }
            restored += 1;
        }
        restored
    }

    /// Writes the store as pretty-printed JSON, replacing the file.
    ///
    /// The JSON goes to a sibling temp file first and is renamed over the
    /// old one, so an interrupted write never leaves a truncated store.
    pub fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.layouts)?;
        let temp_file = temp_path(&self.path);

        if let Err(e) = fs::write(&temp_file, &json) {
            cleanup_temp_file(&temp_file, &e);
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&temp_file, &self.path) {
            cleanup_temp_file(&temp_file, &e);
            return Err(e.into());
        }

        debug!("wrote {} layout(s) to {}", self.len(), self.path.display());
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn cleanup_temp_file(temp_file: &Path, original_error: &std::io::Error) {
    if let Err(cleanup_err) = fs::remove_file(temp_file) {
        warn!(
            "failed to remove {} after write error ({original_error}): {cleanup_err}",
            temp_file.display()
        );
    }
}

fn read_layouts(path: &Path, policy: MalformedPolicy) -> Result<BTreeMap<String, Layout>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }

    let json = fs::read_to_string(path)?;
    // `null` is accepted as an empty store
    match serde_json::from_str::<Option<BTreeMap<String, Layout>>>(&json) {
        Ok(layouts) => Ok(layouts.unwrap_or_default()),
        Err(source) => match policy {
            MalformedPolicy::Fail => Err(Error::MalformedLayouts {
                path: path.to_path_buf(),
                source,
            }),
            MalformedPolicy::Reset => {
                warn!(
                    "ignoring malformed layout file {}: {source}",
                    path.display()
                );
                Ok(BTreeMap::new())
            }
        },
    }
}
