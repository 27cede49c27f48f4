use supalink_core::auth::TokenPersistence;
use supalink_core::deep_link::{apply_oauth_return, DeepLink, DeepLinkInbox};

use crate::commands::common::CliContext;
use crate::error::CliError;

/// Store the tokens of an OAuth return link, then queue the link for a
/// running desktop window.
pub async fn run_deep_link<T: TokenPersistence>(
    ctx: &CliContext<T>,
    url: &str,
    inbox: Option<&DeepLinkInbox>,
) -> Result<DeepLink, CliError> {
    let link = DeepLink::parse(url, &ctx.config.deep_link_scheme)?;

    let db = ctx.open_database().await?;
    let settings = ctx.open_settings(&db).await?;
    apply_oauth_return(&settings, &link).await?;

    if let Some(inbox) = inbox {
        if let Err(error) = inbox.deliver(url) {
            tracing::warn!("Failed to forward deep link to the desktop app: {}", error);
        }
    }

    match &link {
        DeepLink::SupabaseOAuthReturn(_) => println!("Supabase account connected"),
        DeepLink::Other { kind } => println!("Ignored deep link of type '{kind}'"),
    }
    Ok(link)
}
