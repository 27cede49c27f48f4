//! Reachability check for local / self-hosted Supabase instances.

use std::time::Duration;

use crate::error::{Error, Result};
use crate::util::{is_http_url, trim_base_url};

const HEALTH_PATH: &str = "/auth/v1/health";
const HEALTH_TIMEOUT_SECS: u64 = 5;

/// Build the auth health endpoint for a local instance base URL.
pub fn health_url(local_url: &str) -> Result<String> {
    let base = trim_base_url(local_url);
    if base.is_empty() {
        return Err(Error::InvalidInput("Supabase URL must not be empty".into()));
    }
    if !is_http_url(base) {
        return Err(Error::InvalidInput(
            "Supabase URL must include http:// or https://".into(),
        ));
    }
    Ok(format!("{base}{HEALTH_PATH}"))
}

/// Probe that answers whether a Supabase instance is reachable.
#[allow(async_fn_in_trait)]
pub trait HealthProbe {
    /// Succeeds when `GET {local_url}/auth/v1/health` returns 2xx.
    async fn check(&self, local_url: &str) -> Result<()>;
}

/// reqwest-backed probe.
#[derive(Clone)]
pub struct HttpHealthProbe {
    client: reqwest::Client,
}

impl HttpHealthProbe {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HEALTH_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client })
    }
}

impl HealthProbe for HttpHealthProbe {
    async fn check(&self, local_url: &str) -> Result<()> {
        let url = health_url(local_url)?;
        tracing::debug!("Checking Supabase health at {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            tracing::warn!(
                "Supabase health check at {} returned HTTP {}",
                url,
                response.status().as_u16()
            );
            return Err(Error::Unreachable(url));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;

    use super::*;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn health_url_strips_trailing_slash() {
        assert_eq!(
            health_url("http://localhost:54321/").unwrap(),
            "http://localhost:54321/auth/v1/health"
        );
    }

    #[test]
    fn health_url_requires_http_scheme() {
        assert!(matches!(
            health_url("localhost:54321"),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(health_url("  "), Err(Error::InvalidInput(_))));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn check_succeeds_on_2xx() {
        let base = serve(Router::new().route("/auth/v1/health", get(|| async { "ok" }))).await;
        HttpHealthProbe::new().unwrap().check(&base).await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn check_reports_unreachable_on_error_status() {
        let base = serve(Router::new().route(
            "/auth/v1/health",
            get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
        ))
        .await;

        let error = HttpHealthProbe::new().unwrap().check(&base).await.unwrap_err();
        assert!(matches!(error, Error::Unreachable(_)));
        assert!(error.to_string().contains("/auth/v1/health"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn check_fails_when_nothing_listens() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let error = HttpHealthProbe::new()
            .unwrap()
            .check(&format!("http://{addr}"))
            .await
            .unwrap_err();
        assert!(matches!(error, Error::Http(_)));
    }
}
