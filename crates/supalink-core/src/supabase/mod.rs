//! Supabase Management API client.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::models::Project;
use crate::util::{compact_text, is_http_url, trim_base_url};

const MANAGEMENT_HTTP_TIMEOUT_SECS: u64 = 15;

#[derive(Clone)]
pub struct ManagementClient {
    base_url: String,
    client: Client,
}

impl ManagementClient {
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let base_url = trim_base_url(base_url.as_ref()).to_string();
        if !is_http_url(&base_url) {
            return Err(Error::InvalidInput(
                "Management API URL must include http:// or https://".into(),
            ));
        }

        Ok(Self {
            base_url,
            client: Client::builder()
                .timeout(Duration::from_secs(MANAGEMENT_HTTP_TIMEOUT_SECS))
                .build()?,
        })
    }

    /// List every project the token's owner can access, sorted by display name.
    pub async fn list_projects(&self, access_token: &str) -> Result<Vec<Project>> {
        let access_token = access_token.trim();
        if access_token.is_empty() {
            return Err(Error::NotAuthenticated);
        }

        let response = self
            .client
            .get(format!("{}/v1/projects", self.base_url))
            .bearer_auth(access_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api(parse_api_error(status, &body)));
        }

        let mut projects = response.json::<Vec<Project>>().await?;
        projects.sort_by_cached_key(|project| project.display_name().to_lowercase());
        tracing::debug!("Loaded {} Supabase projects", projects.len());
        Ok(projects)
    }
}

#[derive(Debug, Deserialize)]
struct ManagementErrorResponse {
    error: Option<String>,
    error_description: Option<String>,
    message: Option<String>,
    msg: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if status == StatusCode::UNAUTHORIZED {
        return "Supabase access token was rejected (401). Reconnect your Supabase account."
            .to_string();
    }

    if let Ok(payload) = serde_json::from_str::<ManagementErrorResponse>(body) {
        if let Some(message) = payload
            .message
            .or(payload.msg)
            .or(payload.error_description)
            .or(payload.error)
        {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = compact_text(body);
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}
