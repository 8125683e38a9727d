use notify_rust::Notification;

use crate::error::Result;

const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// Tells the user an action they asked for has finished.
pub trait Notifier {
    fn notify(&self, summary: &str, body: &str) -> Result<()>;
}

/// Freedesktop notifications over D-Bus.
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, summary: &str, body: &str) -> Result<()> {
        Notification::new()
            .appname(APP_NAME)
            .summary(summary)
            .body(body)
            .show()?;
        Ok(())
    }
}
