//! Clap derive structures for the `esimly` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// esimly -- storefront, retailer, and back-office CLI for the esimly backend
#[derive(Debug, Parser)]
#[command(
    name = "esimly",
    version,
    about = "Manage the esimly top-up & eSIM store from the command line",
    long_about = "Customer auth flows, the retailer credit/purchase dashboard,\n\
        and the full admin back-office (users, stock, promotions, eSIM\n\
        approvals, credit limits) against the esimly REST backend.",
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
    /// Backend profile to use (e.g. production, development)
    #[arg(long, short = 'p', env = "ESIMLY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "ESIMLY_OUTPUT",
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
    /// Sign in and persist the session
    Login(LoginArgs),

    /// Clear the persisted session (no server call)
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Register a new account
    #[command(subcommand)]
    Register(RegisterCommand),

    /// Confirm an email address from a verification link
    VerifyEmail(VerifyEmailArgs),

    /// Re-send the verification email
    ResendVerification { email: String },

    /// Start a password reset
    ForgotPassword { email: String },

    /// Complete a password reset with the emailed token
    ResetPassword(ResetPasswordArgs),

    /// Retailer storefront: browse bundles, check credit, purchase
    Shop(ShopArgs),

    /// Admin back-office
    Admin(AdminArgs),

    /// Manage configuration profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email (prompted when omitted)
    pub email: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum RegisterCommand {
    /// Register a personal account
    Personal(RegisterPersonalArgs),
    /// Register a business (retailer) account
    Business(RegisterBusinessArgs),
}

#[derive(Debug, Args)]
pub struct RegisterPersonalArgs {
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long, default_value = "")]
    pub phone: String,
}

#[derive(Debug, Args)]
pub struct RegisterBusinessArgs {
    #[arg(long)]
    pub business_name: String,
    #[arg(long)]
    pub contact_name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    #[arg(long, default_value = "")]
    pub registration_number: String,
}

#[derive(Debug, Args)]
pub struct VerifyEmailArgs {
    #[arg(long)]
    pub token: String,
    #[arg(long)]
    pub email: String,
}

#[derive(Debug, Args)]
pub struct ResetPasswordArgs {
    #[arg(long)]
    pub token: String,
    #[arg(long)]
    pub email: String,
}

// ── Shop (retailer) ──────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ShopArgs {
    #[command(subcommand)]
    pub command: ShopCommand,
}

#[derive(Debug, Subcommand)]
pub enum ShopCommand {
    /// List purchasable bundles (eSIM products are not sold here)
    Bundles {
        /// Only bundles at exactly this price
        #[arg(long)]
        price: Option<f64>,
    },
    /// Show credit standing (limit, usage, tier)
    Credit,
    /// Show the credit-level ladder
    Levels,
    /// List already-purchased items
    Inventory,
    /// Purchase a bundle on credit
    Buy {
        /// Bundle id
        bundle: String,
        /// Units to purchase (clamped to available stock)
        #[arg(long, short = 'n', default_value = "1")]
        quantity: u32,
    },
}

// ── Admin ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub command: AdminCommand,
}

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Manage user accounts
    Users(UsersArgs),
    /// List pending business registrations
    Registrations,
    /// List customer enquiries
    Enquiries,
    /// Overview statistics (catalog with CSV-stock fallback)
    Stats,
    /// Manage stock pools and CSV uploads
    Stock(StockArgs),
    /// Manage promotions
    Promos(PromosArgs),
    /// Manage reward campaigns
    Campaigns(CampaignsArgs),
    /// eSIM approval queue
    Esim(EsimArgs),
    /// Retailer credit limits
    Credit(CreditArgs),
}

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List all users
    List,
    /// Show one user
    Show { user: String },
    /// Approve a pending account
    Approve { user: String },
    /// Reject a pending account
    Reject { user: String },
    /// Suspend an active account
    Suspend { user: String },
    /// Re-activate a suspended account
    Activate { user: String },
    /// Update editable fields
    Update {
        user: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        role: Option<String>,
    },
    /// Delete an account
    Delete { user: String },
}

#[derive(Debug, Args)]
pub struct StockArgs {
    #[command(subcommand)]
    pub command: StockCommand,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StockKindArg {
    Pins,
    Esims,
}

#[derive(Debug, Subcommand)]
pub enum StockCommand {
    /// List stock pools
    Pools,
    /// List a pool's items (decrypted server-side)
    Items { pool: String },
    /// Stock usage report
    Report,
    /// Bulk-upload a CSV of PINs or eSIMs
    Upload {
        /// Stock family
        kind: StockKindArg,
        /// CSV file to upload
        file: PathBuf,
        /// Pool name
        #[arg(long)]
        pool_name: String,
        /// Unit price
        #[arg(long)]
        price: f64,
        /// Total stock (defaults to the CSV's counted data rows)
        #[arg(long)]
        total_stock: Option<u32>,
        /// Free-text notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// Download the CSV template for a stock family
    Template {
        kind: StockKindArg,
        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
pub struct PromosArgs {
    #[command(subcommand)]
    pub command: PromosCommand,
}

#[derive(Debug, Subcommand)]
pub enum PromosCommand {
    /// List promotions
    List,
    /// Create a promotion
    Create(PromoFields),
    /// Update a promotion
    Update {
        id: String,
        #[command(flatten)]
        fields: PromoFields,
    },
    /// Delete a promotion
    Delete { id: String },
}

#[derive(Debug, Args)]
pub struct PromoFields {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub description: Option<String>,
    /// PERCENTAGE or FIXED
    #[arg(long)]
    pub discount_type: Option<String>,
    #[arg(long)]
    pub discount_value: Option<f64>,
    /// ISO date, e.g. 2026-09-01
    #[arg(long)]
    pub start_date: Option<String>,
    #[arg(long)]
    pub end_date: Option<String>,
    #[arg(long)]
    pub usage_limit: Option<u32>,
    /// Banner image file, embedded as a base64 data URL (max 2 MB)
    #[arg(long)]
    pub image: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct CampaignsArgs {
    #[command(subcommand)]
    pub command: CampaignsCommand,
}

#[derive(Debug, Subcommand)]
pub enum CampaignsCommand {
    /// List reward campaigns
    List,
    /// Create a campaign
    Create(CampaignFields),
    /// Update a campaign
    Update {
        id: String,
        #[command(flatten)]
        fields: CampaignFields,
    },
    /// Delete a campaign
    Delete { id: String },
}

#[derive(Debug, Args)]
pub struct CampaignFields {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub reward_type: Option<String>,
    #[arg(long)]
    pub reward_value: Option<f64>,
    #[arg(long)]
    pub start_date: Option<String>,
    #[arg(long)]
    pub end_date: Option<String>,
    /// Banner image file, embedded as a base64 data URL (max 2 MB)
    #[arg(long)]
    pub image: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct EsimArgs {
    #[command(subcommand)]
    pub command: EsimCommand,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EsimStatusArg {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Subcommand)]
pub enum EsimCommand {
    /// List activation requests
    List {
        #[arg(long, value_enum)]
        status: Option<EsimStatusArg>,
    },
    /// Approve a pending request
    Approve { request: String },
    /// Reject a pending request (a non-empty reason is required)
    Reject {
        request: String,
        #[arg(long)]
        reason: String,
    },
    /// Generate the activation QR for an assigned eSIM stock item
    Qr {
        /// Stock item id
        item: String,
        /// Also write an SVG file
        #[arg(long)]
        svg: Option<PathBuf>,
        /// Print a prefilled mailto: link for this recipient
        #[arg(long)]
        mailto: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct CreditArgs {
    #[command(subcommand)]
    pub command: CreditCommand,
}

#[derive(Debug, Subcommand)]
pub enum CreditCommand {
    /// List retailers with their credit limits
    List,
    /// Set a retailer's credit limit
    Set { user: String, limit: f64 },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a starter config with production + development profiles
    Init,
    /// Print the resolved configuration
    Show,
    /// Print the config file path
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
