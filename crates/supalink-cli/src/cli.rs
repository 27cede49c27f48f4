use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use supalink_core::AppId;

#[derive(Parser)]
#[command(name = "supalink")]
#[command(about = "Link app records to a Supabase project or a local Supabase instance")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage app records
    Apps {
        #[command(subcommand)]
        command: AppsCommand,
    },
    /// Show the Supabase connection of an app
    Status {
        /// App ID
        #[arg(long)]
        app: AppId,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the Supabase projects of the signed-in account
    Projects {
        /// App ID
        #[arg(long)]
        app: AppId,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Connect an app to a Supabase project
    Link {
        /// App ID
        #[arg(long)]
        app: AppId,
        /// Supabase project ID
        project_id: String,
    },
    /// Disconnect an app from its Supabase project or local instance
    Unlink {
        /// App ID
        #[arg(long)]
        app: AppId,
    },
    /// Connect an app to a local Supabase instance
    ConnectLocal {
        /// App ID
        #[arg(long)]
        app: AppId,
        /// Base URL, e.g. http://localhost:54321
        #[arg(long)]
        url: String,
        /// Anon key of the local instance
        #[arg(long)]
        anon_key: String,
    },
    /// Sign in to Supabase in the browser
    Login {
        /// App ID
        #[arg(long)]
        app: AppId,
    },
    /// Handle a supalink:// deep link (OS URL handler entry point)
    DeepLink {
        /// Deep link URL
        url: String,
    },
    /// Toggle test mode (simulated Supabase sign-in)
    TestMode {
        #[arg(value_enum)]
        state: Toggle,
    },
}

#[derive(Subcommand)]
pub enum AppsCommand {
    /// List app records
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create an app record
    Add {
        /// App name
        name: String,
    },
    /// Delete an app record
    Remove {
        /// App ID
        app: AppId,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub const fn enabled(self) -> bool {
        matches!(self, Self::On)
    }
}
