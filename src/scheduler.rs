use std::{
    thread,
    time::{Duration, Instant},
};

use strum_macros::{AsRefStr, Display};

use crate::signals::SignalFlags;

const POLL_SLICE: Duration = Duration::from_millis(100);

#[derive(AsRefStr, Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Time to re-apply stored layouts.
    Tick,
    /// The user asked to capture the current layout.
    Save,
    /// The layout file changed on disk.
    Reload,
    Shutdown,
}

/// Where the orchestrator pulls its next event from.
pub trait EventSource {
    /// Blocks until the next event. `None` means the source is exhausted.
    fn next_event(&mut self) -> Option<Event>;
}

/// Ticks on a fixed interval and relays requests raised by signal handlers.
pub struct IntervalTicker {
    interval: Duration,
    next_tick: Instant,
    flags: &'static SignalFlags,
}

impl IntervalTicker {
    /// The first tick fires one `interval` from now.
    pub fn new(interval: Duration, flags: &'static SignalFlags) -> Self {
        Self {
            interval,
            next_tick: Instant::now() + interval,
            flags,
        }
    }

    fn pending_request(&self) -> Option<Event> {
        if self.flags.shutdown_requested() {
            Some(Event::Shutdown)
        } else if self.flags.take_save() {
            Some(Event::Save)
        } else if self.flags.take_reload() {
            Some(Event::Reload)
        } else {
            None
        }
    }
}

impl EventSource for IntervalTicker {
    fn next_event(&mut self) -> Option<Event> {
        loop {
            if let Some(event) = self.pending_request() {
                return Some(event);
            }

            let now = Instant::now();
            if now >= self.next_tick {
                // a slow pass or a suspended machine does not cause a burst
                self.next_tick = now + self.interval;
                return Some(Event::Tick);
            }

            thread::sleep((self.next_tick - now).min(POLL_SLICE));
        }
    }
}
