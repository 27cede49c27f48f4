use std::time::Duration;

use supalink_core::deep_link::{apply_oauth_return, DeepLink, DeepLinkInbox};

use super::DesktopServices;

pub const INBOX_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Persist what the link carries, then tell open panels about it.
pub async fn dispatch_deep_link(services: &DesktopServices, raw: &str) {
    let link = match DeepLink::parse(raw, &services.config.deep_link_scheme) {
        Ok(link) => link,
        Err(error) => {
            tracing::warn!("Ignoring deep link: {}", error);
            return;
        }
    };

    if let Err(error) = apply_oauth_return(&services.settings, &link).await {
        tracing::error!("Failed to store Supabase tokens from deep link: {}", error);
        return;
    }
    services.deep_links.publish(link);
}

/// Queue a deep link for the window to pick up on its next inbox poll.
pub fn handoff_deep_link(inbox: &DeepLinkInbox, raw: &str) {
    match inbox.deliver(raw) {
        Ok(()) => tracing::info!("Queued deep link at {}", inbox.path().display()),
        Err(error) => tracing::error!("Failed to queue deep link: {}", error),
    }
}
