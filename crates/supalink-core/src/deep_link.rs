//! Deep links routed to the app by the OS.
//!
//! The OAuth broker finishes the Supabase sign-in in the browser and redirects
//! to `supalink://supabase-oauth-return?token=..&refreshToken=..&expiresIn=..`.
//! The host process persists the tokens, then publishes the link so open
//! panels can refresh.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;
use url::Url;

use crate::auth::OAuthTokens;
use crate::error::{Error, Result};
use crate::models::SettingsPatch;
use crate::services::SettingsStore;

pub const SUPABASE_OAUTH_RETURN: &str = "supabase-oauth-return";

const INBOX_FILE_NAME: &str = "pending-deep-link";
const NOTIFIER_CAPACITY: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeepLink {
    SupabaseOAuthReturn(OAuthTokens),
    Other { kind: String },
}

impl DeepLink {
    /// Parse a deep link URL for the given scheme.
    pub fn parse(raw: &str, scheme: &str) -> Result<Self> {
        let url = Url::parse(raw.trim()).map_err(|error| Error::DeepLink(error.to_string()))?;
        if !url.scheme().eq_ignore_ascii_case(scheme) {
            return Err(Error::DeepLink(format!(
                "expected {scheme}:// link, got {}://",
                url.scheme()
            )));
        }

        let kind = url
            .host_str()
            .map(str::to_string)
            .or_else(|| {
                url.path()
                    .trim_matches('/')
                    .split('/')
                    .next()
                    .filter(|segment| !segment.is_empty())
                    .map(str::to_string)
            })
            .ok_or_else(|| Error::DeepLink("link has no type".to_string()))?;

        if kind != SUPABASE_OAUTH_RETURN {
            return Ok(Self::Other { kind });
        }

        let param = |name: &str| {
            url.query_pairs()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or_else(|| Error::DeepLink(format!("missing '{name}' parameter")))
        };
        let access_token = param("token")?;
        let refresh_token = param("refreshToken")?;
        let expires_in = param("expiresIn")?
            .parse::<i64>()
            .map_err(|_| Error::DeepLink("'expiresIn' must be a number".to_string()))?;

        Ok(Self::SupabaseOAuthReturn(OAuthTokens::from_expires_in(
            access_token,
            refresh_token,
            expires_in,
        )))
    }

    /// The `type` discriminator of the link.
    pub fn kind(&self) -> &str {
        match self {
            Self::SupabaseOAuthReturn(_) => SUPABASE_OAUTH_RETURN,
            Self::Other { kind } => kind,
        }
    }
}

/// Persist the tokens carried by an OAuth return link.
///
/// Other link kinds are ignored.
pub async fn apply_oauth_return<S: SettingsStore>(store: &S, link: &DeepLink) -> Result<()> {
    let DeepLink::SupabaseOAuthReturn(tokens) = link else {
        return Ok(());
    };

    let mut supabase = store.current().supabase;
    supabase.access_token = Some(tokens.access_token.clone());
    supabase.refresh_token = Some(tokens.refresh_token.clone());
    supabase.expires_at = Some(tokens.expires_at);
    store.update(SettingsPatch::supabase(supabase)).await?;
    tracing::info!("Stored Supabase OAuth tokens from deep link");
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepLinkEvent {
    /// Arrival counter, starting at 1
    pub seq: u64,
    pub link: DeepLink,
}

/// Fan-out of received deep links. Every subscriber sees each arrival once.
#[derive(Clone)]
pub struct DeepLinkNotifier {
    tx: broadcast::Sender<DeepLinkEvent>,
    seq: Arc<AtomicU64>,
}

impl Default for DeepLinkNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl DeepLinkNotifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(NOTIFIER_CAPACITY);
        Self {
            tx,
            seq: Arc::default(),
        }
    }

    pub fn publish(&self, link: DeepLink) -> u64 {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!("Publishing deep link #{} ({})", seq, link.kind());
        if self.tx.send(DeepLinkEvent { seq, link }).is_err() {
            tracing::debug!("No deep link subscribers");
        }
        seq
    }

    pub fn subscribe(&self) -> DeepLinkSubscription {
        DeepLinkSubscription {
            rx: self.tx.subscribe(),
        }
    }
}

pub struct DeepLinkSubscription {
    rx: broadcast::Receiver<DeepLinkEvent>,
}

impl DeepLinkSubscription {
    /// Wait for the next arrival. Returns `None` once every notifier is gone.
    pub async fn next(&mut self) -> Option<DeepLinkEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("Dropped {} deep links", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// File drop-box used to hand deep links to an already running instance.
#[derive(Debug, Clone)]
pub struct DeepLinkInbox {
    path: PathBuf,
}

impl DeepLinkInbox {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/supalink/pending-deep-link`
    pub fn default_location() -> Self {
        Self::new(
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("supalink")
                .join(INBOX_FILE_NAME),
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a link for the running instance to pick up.
    pub fn deliver(&self, url: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", url.trim())?;
        Ok(())
    }

    /// Drain pending links, oldest first.
    pub fn take(&self) -> Result<Vec<String>> {
        let claimed = self.path.with_extension("claimed");
        match std::fs::rename(&self.path, &claimed) {
            Ok(()) => {}
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(error.into()),
        }

        let raw = std::fs::read_to_string(&claimed)?;
        std::fs::remove_file(&claimed)?;
        Ok(raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryTokenStore;
    use crate::db::Database;
    use crate::services::SettingsService;

    const OAUTH_RETURN: &str =
        "supalink://supabase-oauth-return?token=access-1&refreshToken=refresh-1&expiresIn=3600";

    #[test]
    fn parse_oauth_return() {
        let link = DeepLink::parse(OAUTH_RETURN, "supalink").unwrap();
        assert_eq!(link.kind(), SUPABASE_OAUTH_RETURN);
        let DeepLink::SupabaseOAuthReturn(tokens) = link else {
            panic!("expected oauth return");
        };
        assert_eq!(tokens.access_token, "access-1");
        assert_eq!(tokens.refresh_token, "refresh-1");
        assert!(!tokens.is_expired());
    }

    #[test]
    fn parse_other_kind() {
        let link = DeepLink::parse("supalink://add-mcp-server?name=x", "supalink").unwrap();
        assert_eq!(
            link,
            DeepLink::Other {
                kind: "add-mcp-server".to_string()
            }
        );
    }

    #[test]
    fn parse_rejects_wrong_scheme_and_missing_params() {
        assert!(DeepLink::parse("https://example.com/supabase-oauth-return", "supalink").is_err());
        let error = DeepLink::parse(
            "supalink://supabase-oauth-return?token=a&expiresIn=10",
            "supalink",
        )
        .unwrap_err();
        assert!(error.to_string().contains("refreshToken"));
        assert!(DeepLink::parse(
            "supalink://supabase-oauth-return?token=a&refreshToken=b&expiresIn=soon",
            "supalink",
        )
        .is_err());
    }

    #[test]
    fn debug_output_redacts_tokens() {
        let link = DeepLink::parse(OAUTH_RETURN, "supalink").unwrap();
        assert!(!format!("{link:?}").contains("access-1"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn apply_oauth_return_persists_tokens() {
        let db = Database::open_in_memory().await.unwrap();
        let tokens = MemoryTokenStore::default();
        let store = SettingsService::load(db, tokens.clone()).await.unwrap();

        let link = DeepLink::parse(OAUTH_RETURN, "supalink").unwrap();
        apply_oauth_return(&store, &link).await.unwrap();

        assert_eq!(
            store.current().supabase.access_token.as_deref(),
            Some("access-1")
        );
        assert_eq!(
            crate::auth::TokenPersistence::load(&tokens)
                .unwrap()
                .map(|stored| stored.refresh_token),
            Some("refresh-1".to_string())
        );
    }

    #[tokio::test]
    async fn every_subscriber_sees_each_arrival_once() {
        let notifier = DeepLinkNotifier::new();
        let mut first = notifier.subscribe();
        let mut second = notifier.subscribe();

        notifier.publish(DeepLink::Other {
            kind: "a".to_string(),
        });
        notifier.publish(DeepLink::Other {
            kind: "b".to_string(),
        });

        for subscription in [&mut first, &mut second] {
            assert_eq!(subscription.next().await.unwrap().seq, 1);
            assert_eq!(subscription.next().await.unwrap().seq, 2);
        }
    }

    #[test]
    fn inbox_delivers_and_drains() {
        let tmp = tempfile::tempdir().unwrap();
        let inbox = DeepLinkInbox::new(tmp.path().join("inbox").join(INBOX_FILE_NAME));

        assert!(inbox.take().unwrap().is_empty());
        inbox.deliver(OAUTH_RETURN).unwrap();
        inbox.deliver("supalink://other").unwrap();

        assert_eq!(
            inbox.take().unwrap(),
            vec![OAUTH_RETURN.to_string(), "supalink://other".to_string()]
        );
        assert!(inbox.take().unwrap().is_empty());
    }
}
