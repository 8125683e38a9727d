use std::sync::atomic::{AtomicBool, Ordering};

use nix::{
    libc::c_int,
    sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal},
};

use crate::error::Result;

/// Requests raised asynchronously, drained by the event loop.
pub struct SignalFlags {
    save: AtomicBool,
    reload: AtomicBool,
    shutdown: AtomicBool,
}

impl SignalFlags {
    pub const fn new() -> Self {
        Self {
            save: AtomicBool::new(false),
            reload: AtomicBool::new(false),
            shutdown: AtomicBool::new(false),
        }
    }

    pub fn request_save(&self) {
        self.save.store(true, Ordering::SeqCst);
    }

    pub fn request_reload(&self) {
        self.reload.store(true, Ordering::SeqCst);
    }

    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    pub fn take_save(&self) -> bool {
        self.save.swap(false, Ordering::SeqCst)
    }

    pub fn take_reload(&self) -> bool {
        self.reload.swap(false, Ordering::SeqCst)
    }

    /// Shutdown stays latched once requested.
    pub fn shutdown_requested(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }
}

impl Default for SignalFlags {
    fn default() -> Self {
        Self::new()
    }
}

pub static FLAGS: SignalFlags = SignalFlags::new();

extern "C" fn on_signal(signal: c_int) {
    match Signal::try_from(signal) {
        Ok(Signal::SIGUSR1) => FLAGS.request_save(),
        Ok(Signal::SIGHUP) => FLAGS.request_reload(),
        Ok(Signal::SIGINT) | Ok(Signal::SIGTERM) => FLAGS.request_shutdown(),
        _ => {}
    }
}

/// Routes SIGUSR1 to save, SIGHUP to reload, and SIGINT/SIGTERM to shutdown.
pub fn install() -> Result<()> {
    let action = SigAction::new(
        SigHandler::Handler(on_signal),
        SaFlags::SA_RESTART,
        SigSet::empty(),
    );
    for signal in [
        Signal::SIGUSR1,
        Signal::SIGHUP,
        Signal::SIGINT,
        Signal::SIGTERM,
    ] {
        // Safety: the handler only touches atomics.
        unsafe { sigaction(signal, &action) }?;
    }
    Ok(())
}
