//! supalink-core - Core library for Supalink
//!
//! This crate contains the shared models, libSQL persistence, Supabase clients
//! and the connection panel logic used by the desktop app and the CLI.

pub mod auth;
pub mod config;
pub mod db;
pub mod deep_link;
pub mod error;
pub mod health;
pub mod models;
pub mod panel;
pub mod services;
pub mod supabase;
pub mod util;

pub use error::{Error, Result};
pub use models::{App, AppId, Project, Settings};
