use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

use serde::Serialize;

/// Mirrors `supalink_core::config::BootstrapOverrides`.
#[derive(Debug, Default, Serialize)]
struct DesktopBootstrapOverrides {
    oauth_login_url: Option<String>,
    management_api_url: Option<String>,
    deep_link_scheme: Option<String>,
}

fn main() {
    println!("cargo:rerun-if-env-changed=SUPALINK_OAUTH_LOGIN_URL");
    println!("cargo:rerun-if-env-changed=SUPABASE_MANAGEMENT_API_URL");
    println!("cargo:rerun-if-env-changed=SUPALINK_DEEP_LINK_SCHEME");

    if let Err(error) = write_desktop_bootstrap_config() {
        println!("cargo:warning=failed to generate desktop bootstrap config: {error}");
    }
}

fn write_desktop_bootstrap_config() -> io::Result<()> {
    load_workspace_dotenv();

    let out_dir = env::var_os("OUT_DIR")
        .map(PathBuf::from)
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "OUT_DIR is not set"))?;
    fs::create_dir_all(&out_dir)?;

    let overrides = DesktopBootstrapOverrides {
        oauth_login_url: env_var_trimmed("SUPALINK_OAUTH_LOGIN_URL"),
        management_api_url: env_var_trimmed("SUPABASE_MANAGEMENT_API_URL"),
        deep_link_scheme: env_var_trimmed("SUPALINK_DEEP_LINK_SCHEME"),
    };

    let content = serde_json::to_string_pretty(&overrides)
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error.to_string()))?;
    fs::write(out_dir.join("desktop-bootstrap.json"), content)?;
    Ok(())
}

fn load_workspace_dotenv() {
    let manifest_dir =
        env::var_os("CARGO_MANIFEST_DIR").map_or_else(|| PathBuf::from("."), PathBuf::from);
    let candidate = manifest_dir.join("..").join("..").join(".env");
    if candidate.exists() {
        let _ = dotenvy::from_path(candidate);
    }
}

fn env_var_trimmed(name: &str) -> Option<String> {
    let value = env::var(name).ok()?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
