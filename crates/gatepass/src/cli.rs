//! Clap derive structures for the `gatepass` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// gatepass -- visitor pass issuance and gate verification
#[derive(Debug, Parser)]
#[command(
    name = "gatepass",
    version,
    about = "Issue, share, and verify residential visitor passes",
    long_about = "Issue QR-coded visitor passes against a hosted record store,\n\
        compose shareable pass cards, and verify scanned passes at the gate.",
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
    /// Community profile to use
    #[arg(long, short = 'p', env = "GATEPASS_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "GATEPASS_OUTPUT",
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

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Store request timeout in seconds (overrides config)
    #[arg(long, env = "GATEPASS_TIMEOUT", global = true)]
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
    /// YAML
    Yaml,
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
    /// Issue a new visitor pass
    #[command(alias = "i")]
    Issue(IssueArgs),

    /// List, inspect, and revoke issued passes
    #[command(alias = "p")]
    Passes(PassesArgs),

    /// Render a pass's verification QR code to a PNG
    Qr(QrArgs),

    /// Compose a shareable pass card PNG
    Card(CardArgs),

    /// Verify scanned or pasted pass input
    #[command(alias = "v")]
    Verify(VerifyArgs),

    /// Decode QR codes from captured camera frames
    Scan(ScanArgs),

    /// Manage configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Issue ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct IssueArgs {
    /// Visitor's full name
    #[arg(long)]
    pub visitor: String,

    /// Visitor's phone number
    #[arg(long)]
    pub phone: String,

    /// Vehicle plate number
    #[arg(long)]
    pub plate: String,

    /// Vehicle type: car, motorcycle, van, truck, other
    #[arg(long, default_value = "car")]
    pub vehicle: String,

    /// Visit date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub date: Option<String>,

    /// Reason for the visit
    #[arg(long, default_value = "Visit")]
    pub reason: String,

    /// Also write the verification QR code to this PNG path
    #[arg(long, value_name = "PATH")]
    pub qr: Option<PathBuf>,

    /// Also compose the shareable card to this PNG path
    #[arg(long, value_name = "PATH")]
    pub card: Option<PathBuf>,
}

// ── Passes ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PassesArgs {
    #[command(subcommand)]
    pub command: PassesCommand,
}

#[derive(Debug, Subcommand)]
pub enum PassesCommand {
    /// List passes issued by the configured host
    #[command(alias = "ls")]
    List,

    /// Show one pass by token
    Get {
        /// Pass token, verification URL, or legacy label
        token: String,
    },

    /// Revoke (hard-delete) a pass by id
    #[command(alias = "rm")]
    Revoke {
        /// Store id of the pass (see `passes list`)
        id: uuid::Uuid,
    },
}

// ── Qr / Card ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct QrArgs {
    /// Pass token or verification URL
    pub token: String,

    /// Output PNG path
    #[arg(long, short = 'f', default_value = "pass-qr.png")]
    pub out: PathBuf,
}

#[derive(Debug, Args)]
pub struct CardArgs {
    /// Pass token or verification URL
    pub token: String,

    /// Output PNG path (defaults to VisitorPass-<name>.png)
    #[arg(long, short = 'f')]
    pub out: Option<PathBuf>,
}

// ── Verify / Scan ────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct VerifyArgs {
    /// Scanned payload: URL, "Pass ID: <token>" text, or bare token
    pub input: String,

    /// Verify against this date (YYYY-MM-DD) instead of today
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Captured frame images (PNG), scanned in order until one decodes
    #[arg(required = true)]
    pub frames: Vec<PathBuf>,

    /// Verify the decoded payload instead of printing it
    #[arg(long)]
    pub verify: bool,

    /// Verify against this date (YYYY-MM-DD) instead of today
    #[arg(long, requires = "verify")]
    pub date: Option<String>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Show the loaded configuration (keys masked)
    Show,

    /// Write a starter config file
    Init {
        /// Record store project URL
        #[arg(long)]
        store_url: String,

        /// Public origin verification links point at
        #[arg(long)]
        public_origin: String,
    },

    /// Store the record-store service key in the system keyring
    SetKey,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
