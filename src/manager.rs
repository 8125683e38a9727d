use log::{debug, error, info, warn};

use crate::{
    config::MalformedPolicy,
    error::Result,
    geometry::Layout,
    layout_store::LayoutStore,
    locator::{locate_windows, window_name},
    notify::Notifier,
    platform::{WindowRecord, WindowSystem},
    scheduler::{Event, EventSource},
};

/// A matched window together with the layout stored for it, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedWindow {
    pub name: String,
    pub window: WindowRecord,
    pub stored: Option<Layout>,
}

/// Owns the layout store and applies it to the windows it finds.
pub struct LayoutManager<W: WindowSystem> {
    windows: W,
    store: LayoutStore,
    prefix: String,
    policy: MalformedPolicy,
    notifier: Option<Box<dyn Notifier>>,
}

impl<W: WindowSystem> LayoutManager<W> {
    pub fn new(
        windows: W,
        store: LayoutStore,
        prefix: impl Into<String>,
        policy: MalformedPolicy,
    ) -> Self {
        Self {
            windows,
            store,
            prefix: prefix.into(),
            policy,
            notifier: None,
        }
    }

    /// Confirms saves requested while running through `notifier`.
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Some(Box::new(notifier));
        self
    }

    pub fn store(&self) -> &LayoutStore {
        &self.store
    }

    /// Captures and persists the current layout. Returns the window count.
    pub fn save(&mut self) -> Result<usize> {
        let located = locate_windows(&self.windows, &self.prefix);
        self.store.save_all(&located, &self.prefix)
    }

    /// Re-applies stored layouts. Returns how many windows were moved.
    pub fn restore(&self) -> usize {
        let located = locate_windows(&self.windows, &self.prefix);
        self.store.restore_all(&self.windows, &located, &self.prefix)
    }

    pub fn reload(&mut self) -> Result<()> {
        self.store.reload(self.policy)
    }

    /// Matched windows sorted by name.
    pub fn matched_windows(&self) -> Vec<MatchedWindow> {
        let mut matched: Vec<MatchedWindow> = locate_windows(&self.windows, &self.prefix)
            .into_values()
            .filter_map(|window| {
                let name = window_name(&window.title, &self.prefix)?.to_string();
                let stored = self.store.get(&name).copied();
                Some(MatchedWindow {
                    name,
                    window,
                    stored,
                })
            })
            .collect();
        matched.sort_by(|a, b| a.name.cmp(&b.name));
        matched
    }

    /// Handles events until the source asks for shutdown or runs dry.
    ///
    /// Failures of individual saves or reloads are logged and the loop
    /// keeps going; the next request is the retry.
    pub fn run(&mut self, events: &mut impl EventSource) {
        info!(
            "watching windows titled {:?}* with {} stored layout(s)",
            self.prefix,
            self.store.len()
        );
        while let Some(event) = events.next_event() {
            match event {
                Event::Tick => {
                    let restored = self.restore();
                    debug!("restore pass moved {restored} window(s)");
                }
                Event::Save => match self.save() {
                    Ok(count) => self.confirm_save(count),
                    Err(e) => error!("saving layouts failed: {e}"),
                },
                Event::Reload => {
                    if let Err(e) = self.reload() {
                        error!("reloading layouts failed: {e}");
                    }
                }
                Event::Shutdown => break,
            }
        }
        info!("stopped");
    }

    fn confirm_save(&self, count: usize) {
        let body = format!(
            "{count} window(s) saved to {}",
            self.store.path().display()
        );
        info!("Layouts saved: {body}");
        if let Some(notifier) = &self.notifier {
            if let Err(e) = notifier.notify("Layouts saved", &body) {
                warn!("save confirmation not shown: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, collections::VecDeque, fs, rc::Rc};

    use super::*;
    use crate::{error::Error, geometry::Rect, platform::fake::FakeWindowSystem};

    #[derive(Clone, Default)]
    struct RecordingNotifier {
        shown: Rc<RefCell<Vec<(String, String)>>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, summary: &str, body: &str) -> Result<()> {
            self.shown
                .borrow_mut()
                .push((summary.to_string(), body.to_string()));
            Ok(())
        }
    }

    struct UnavailableNotifier;

    impl Notifier for UnavailableNotifier {
        fn notify(&self, _summary: &str, _body: &str) -> Result<()> {
            Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "no notification daemon",
            )))
        }
    }

    const PREFIX: &str = "EVE - ";

    fn manager(
        dir: &tempfile::TempDir,
        desktop: FakeWindowSystem,
    ) -> LayoutManager<FakeWindowSystem> {
        let store =
            LayoutStore::load(dir.path().join("layouts.json"), MalformedPolicy::Fail).unwrap();
        LayoutManager::new(desktop, store, PREFIX, MalformedPolicy::Fail)
    }

    #[test]
    fn save_then_restore_puts_windows_back() {
        let dir = tempfile::tempdir().unwrap();
        let desktop = FakeWindowSystem::new()
            .with_window(1, "EVE - Fleet", Rect::new(100, 100, 900, 700))
            .with_window(2, "EVE - Scout", Rect::new(10, 10, 110, 60));
        let mut manager = manager(&dir, desktop);

        assert_eq!(manager.save().unwrap(), 2);
        manager.windows.move_window(1, Rect::new(0, 0, 400, 300));
        manager.windows.move_window(2, Rect::new(500, 500, 520, 520));

        assert_eq!(manager.restore(), 2);
        assert_eq!(
            manager.windows.rect_of(1),
            Some(Rect::new(100, 100, 900, 700))
        );
        assert_eq!(manager.windows.rect_of(2), Some(Rect::new(10, 10, 110, 60)));
    }

    #[test]
    fn run_dispatches_until_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let desktop =
            FakeWindowSystem::new().with_window(1, "EVE - Fleet", Rect::new(100, 100, 900, 700));
        let mut manager = manager(&dir, desktop);
        let mut events = VecDeque::from([Event::Tick, Event::Save, Event::Shutdown, Event::Tick]);

        manager.run(&mut events);

        // nothing stored yet on the first tick, and the trailing tick is never seen
        assert!(manager.windows.moves().is_empty());
        assert_eq!(events, VecDeque::from([Event::Tick]));
        assert_eq!(
            manager.store().get("Fleet"),
            Some(&Layout::new(100, 100, 800, 600))
        );
        assert!(manager.store().path().exists());
    }

    #[test]
    fn tick_restores_after_save() {
        let dir = tempfile::tempdir().unwrap();
        let desktop =
            FakeWindowSystem::new().with_window(1, "EVE - Fleet", Rect::new(100, 100, 900, 700));
        let mut manager = manager(&dir, desktop);
        manager.save().unwrap();
        manager.windows.move_window(1, Rect::new(0, 0, 10, 10));

        manager.run(&mut VecDeque::from([Event::Tick]));

        assert_eq!(
            manager.windows.rect_of(1),
            Some(Rect::new(100, 100, 900, 700))
        );
    }

    #[test]
    fn new_window_is_picked_up_by_later_ticks() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("layouts.json"),
            r#"{"Scout": {"X": 10, "Y": 10, "Width": 100, "Height": 50}}"#,
        )
        .unwrap();
        let mut manager = manager(&dir, FakeWindowSystem::new());

        manager.run(&mut VecDeque::from([Event::Tick]));
        manager
            .windows
            .add_window(3, "EVE - Scout", Rect::new(0, 0, 300, 200));
        manager.run(&mut VecDeque::from([Event::Tick]));

        assert_eq!(manager.windows.rect_of(3), Some(Rect::new(10, 10, 110, 60)));
    }

    #[test]
    fn reload_event_replaces_store() {
        let dir = tempfile::tempdir().unwrap();
        let desktop =
            FakeWindowSystem::new().with_window(1, "EVE - Fleet", Rect::new(0, 0, 400, 300));
        let mut manager = manager(&dir, desktop);
        fs::write(
            dir.path().join("layouts.json"),
            r#"{"Fleet": {"X": 100, "Y": 100, "Width": 800, "Height": 600}}"#,
        )
        .unwrap();

        manager.run(&mut VecDeque::from([Event::Reload, Event::Tick]));

        assert_eq!(
            manager.windows.rect_of(1),
            Some(Rect::new(100, 100, 900, 700))
        );
    }

    #[test]
    fn failed_reload_keeps_running_with_old_store() {
        let dir = tempfile::tempdir().unwrap();
        let desktop =
            FakeWindowSystem::new().with_window(1, "EVE - Fleet", Rect::new(100, 100, 900, 700));
        let mut manager = manager(&dir, desktop);
        manager.save().unwrap();
        fs::write(dir.path().join("layouts.json"), "garbage").unwrap();
        manager.windows.move_window(1, Rect::new(0, 0, 10, 10));

        manager.run(&mut VecDeque::from([Event::Reload, Event::Tick]));

        assert_eq!(manager.store().len(), 1);
        assert_eq!(
            manager.windows.rect_of(1),
            Some(Rect::new(100, 100, 900, 700))
        );
    }

    #[test]
    fn enumeration_failure_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let desktop =
            FakeWindowSystem::new().with_window(1, "EVE - Fleet", Rect::new(0, 0, 400, 300));
        desktop.set_fail_enumeration(true);
        let mut manager = manager(&dir, desktop);

        assert_eq!(manager.restore(), 0);
        assert_eq!(manager.save().unwrap(), 0);
        assert!(manager.store().is_empty());
    }

    #[test]
    fn matched_windows_report_stored_layouts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("layouts.json"),
            r#"{"Fleet": {"X": 100, "Y": 100, "Width": 800, "Height": 600}}"#,
        )
        .unwrap();
        let desktop = FakeWindowSystem::new()
            .with_window(2, "EVE - Scout", Rect::new(10, 10, 110, 60))
            .with_window(1, "EVE - Fleet", Rect::new(0, 0, 400, 300))
            .with_window(9, "Notes", Rect::new(0, 0, 1, 1));
        let manager = manager(&dir, desktop);

        let matched = manager.matched_windows();

        let names: Vec<&str> = matched.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["Fleet", "Scout"]);
        assert_eq!(matched[0].stored, Some(Layout::new(100, 100, 800, 600)));
        assert_eq!(matched[1].stored, None);
        assert_eq!(matched[1].window.id, 2);
    }

    #[test]
    fn save_event_shows_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let desktop = FakeWindowSystem::new()
            .with_window(1, "EVE - Fleet", Rect::new(100, 100, 900, 700))
            .with_window(2, "EVE - Scout", Rect::new(10, 10, 110, 60));
        let notifier = RecordingNotifier::default();
        let mut manager = manager(&dir, desktop).with_notifier(notifier.clone());

        manager.run(&mut VecDeque::from([Event::Tick, Event::Save, Event::Tick]));

        let shown = notifier.shown.borrow();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].0, "Layouts saved");
        assert!(shown[0].1.starts_with("2 window(s) saved to "));
        assert!(shown[0].1.ends_with("layouts.json"));
    }

    #[test]
    fn failed_save_shows_no_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let desktop =
            FakeWindowSystem::new().with_window(1, "EVE - Fleet", Rect::new(0, 0, 400, 300));
        let notifier = RecordingNotifier::default();
        let mut manager = manager(&dir, desktop).with_notifier(notifier.clone());
        // the store path is a directory, so writing it fails
        fs::create_dir(dir.path().join("layouts.json")).unwrap();

        manager.run(&mut VecDeque::from([Event::Save]));

        assert!(notifier.shown.borrow().is_empty());
    }

    #[test]
    fn notification_failure_does_not_stop_the_loop() {
        let dir = tempfile::tempdir().unwrap();
        let desktop =
            FakeWindowSystem::new().with_window(1, "EVE - Fleet", Rect::new(100, 100, 900, 700));
        let mut manager = manager(&dir, desktop).with_notifier(UnavailableNotifier);

        manager.run(&mut VecDeque::from([Event::Save]));
        manager.windows.move_window(1, Rect::new(0, 0, 10, 10));
        manager.run(&mut VecDeque::from([Event::Tick]));

        assert!(manager.store().path().exists());
        assert_eq!(
            manager.windows.rect_of(1),
            Some(Rect::new(100, 100, 900, 700))
        );
    }
}
