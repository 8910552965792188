//! Clap derive structures for the `swarmui` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// swarmui -- drive the Swarming console shell from the command line
#[derive(Debug, Parser)]
#[command(
    name = "swarmui",
    version,
    about = "Inspect a Swarming server through the console application shell",
    long_about = "Runs the console shell's login cycle against a Swarming server and\n\
        prints what the console header would show: server details, the\n\
        logged-in account's permissions, or the rendered header markup.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Server profile to use
    #[arg(long, short = 'p', env = "SWARMUI_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Server URL (overrides profile)
    #[arg(long, short = 's', env = "SWARMUI_SERVER", global = true)]
    pub server: Option<String>,

    /// OAuth access token or full authorization header value
    #[arg(long, env = "SWARMUI_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SWARMUI_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "SWARMUI_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "SWARMUI_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and show the server's version details
    #[command(alias = "d")]
    Details,

    /// Log in and list the account's permissions
    #[command(alias = "perms")]
    Permissions(PermissionsArgs),

    /// Render the console header for the current session
    Render(RenderArgs),

    /// Manage configuration profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Command Arguments ────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PermissionsArgs {
    /// Scope permissions to a bot
    #[arg(long)]
    pub bot_id: Option<String>,

    /// Scope permissions to a task
    #[arg(long)]
    pub task_id: Option<String>,

    /// Extra query parameter (key=value), repeatable
    #[arg(long = "param", value_name = "KEY=VALUE")]
    pub params: Vec<String>,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Render the login widget in offline testing mode
    #[arg(long)]
    pub offline: bool,

    /// Page title placed in the header
    #[arg(long, default_value = "Swarming")]
    pub title: String,

    /// Skip logging in; render the logged-out header
    #[arg(long)]
    pub no_login: bool,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Display current configuration
    Show,

    /// List configured profiles
    Profiles,

    /// Create or update a profile
    Add {
        /// Profile name
        name: String,

        /// Server URL (e.g., https://chromium-swarm.appspot.com)
        server: String,

        /// OAuth client id for the login widget
        #[arg(long)]
        client_id: Option<String>,

        /// Make this the default profile
        #[arg(long)]
        default: bool,
    },

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store an access token (read from stdin) in the system keyring
    SetToken {
        /// Profile to store the token for (defaults to the active profile)
        name: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
