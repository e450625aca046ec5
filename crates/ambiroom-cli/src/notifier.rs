//! Desktop notifications via the platform notification service.

use ambiroom_core::{NotificationMessage, Notifier};
use notify_rust::Notification;

#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn name(&self) -> &str {
        "desktop"
    }

    fn notify(&self, message: NotificationMessage) {
        if let Err(e) = Notification::new()
            .summary("Ambiroom")
            .body(message.text())
            .show()
        {
            // Fall back to the terminal bell.
            tracing::warn!("desktop notification failed: {e}");
            eprint!("\x07");
        }
    }
}
