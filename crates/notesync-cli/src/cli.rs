use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "notesync")]
#[command(about = "Keep your notes in step with a remote notes service")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// CLI profile name for API endpoints and the stored session
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List notes from the server
    #[command(alias = "ls")]
    List {
        /// Only show notes marked important
        #[arg(long)]
        important: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a new note
    #[command(alias = "new")]
    Add {
        /// Note content
        #[arg(required = true)]
        content: Vec<String>,
        /// Mark the note as important
        #[arg(short, long)]
        important: bool,
    },
    /// Toggle the importance of a note
    Toggle {
        /// Note ID as shown by `notesync list`
        id: String,
    },
    /// Sign in and store the session for this profile
    Login {
        #[arg(long, value_name = "USERNAME")]
        username: String,
        #[arg(long, value_name = "PASSWORD")]
        password: String,
    },
    /// Forget the stored session for this profile
    Logout,
    /// Show who is signed in for this profile
    Status,
    /// Configure CLI profiles
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update profile config
    Init {
        /// Profile name to initialize
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
        /// Notes API base URL (notes live at `{base}/notes`)
        #[arg(long, value_name = "URL")]
        api_base_url: Option<String>,
        /// Login endpoint (defaults to `{base}/login`)
        #[arg(long, value_name = "URL")]
        login_url: Option<String>,
        /// How long notifications stay visible, in milliseconds
        #[arg(long, value_name = "MS")]
        notification_timeout_ms: Option<u64>,
        /// Keep current active profile instead of activating this one
        #[arg(long)]
        no_activate: bool,
    },
    /// Print the resolved profile configuration
    Show,
}
