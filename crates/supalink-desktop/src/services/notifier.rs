use std::time::Duration;

use dioxus::prelude::*;
use supalink_core::panel::{Notifier, Toast};

const TOAST_LIFETIME: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastEntry {
    pub id: u64,
    pub toast: Toast,
}

/// Pushes toasts into the window-wide toast list and dismisses them later.
#[derive(Clone, Copy)]
pub struct DesktopNotifier {
    pub toasts: Signal<Vec<ToastEntry>>,
    pub next_id: Signal<u64>,
}

impl DesktopNotifier {
    pub fn dismiss(mut self, id: u64) {
        self.toasts.write().retain(|entry| entry.id != id);
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, toast: Toast) {
        let mut next_id = self.next_id;
        let mut toasts = self.toasts;

        let id = *next_id.peek() + 1;
        next_id.set(id);
        tracing::debug!("Toast {:?}: {}", toast.level, toast.message);
        toasts.write().push(ToastEntry { id, toast });

        let notifier = *self;
        spawn_forever(async move {
            tokio::time::sleep(TOAST_LIFETIME).await;
            notifier.dismiss(id);
        });
    }
}
