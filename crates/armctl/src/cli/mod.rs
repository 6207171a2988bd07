//! CLI structure and command definitions

use clap::{Parser, Subcommand};

pub mod resources;

pub use resources::*;

/// Resource-manager CLI for database import/export, gateways, clusters and peering
#[derive(Parser, Debug)]
#[command(name = "armctl")]
#[command(version, about = "Command-line client for resource-manager operations")]
#[command(long_about = "
Command-line client for resource-manager operations

EXAMPLES:
    # Set up a profile
    armctl profile set prod --subscription-id 00000000-0000-0000-0000-000000000000 --access-token TOKEN

    # Export a database and wait for it to finish
    armctl sql export --resource-group rg --server srv --database db \\
        --storage-uri https://acct.blob.core.windows.net/backups/db.bacpac \\
        --storage-key KEY --admin-login sqladmin --admin-password PASS --wait

    # Check on an operation later
    armctl sql status https://management.azure.com/.../operationResults/1234

    # Add a node type to a cluster
    armctl cluster node-type add --resource-group rg --cluster sf1 --name nt2 --instances 3

For more help on a specific command, run:
    armctl <command> --help
")]
pub struct Cli {
    /// Profile to use for this command
    #[arg(long, short, global = true, env = "ARMCTL_PROFILE")]
    pub profile: Option<String>,

    /// Path to alternate configuration file
    #[arg(long, global = true, env = "ARMCTL_CONFIG_FILE")]
    pub config_file: Option<String>,

    /// Output format
    #[arg(long, short = 'o', global = true, value_enum, default_value = "auto")]
    pub output: OutputFormat,

    /// Enable verbose logging
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Automatically choose format based on command and context
    Auto,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Human-readable table format
    Table,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Profile management
    #[command(subcommand, visible_alias = "prof", visible_alias = "pr")]
    Profile(ProfileCommands),

    /// Database import/export
    #[command(subcommand)]
    Sql(SqlCommands),

    /// Application gateway editing
    #[command(subcommand, visible_alias = "gw")]
    Gateway(GatewayCommands),

    /// Service fabric cluster management
    #[command(subcommand)]
    Cluster(ClusterCommands),

    /// Peer ASN lookups
    #[command(subcommand, name = "peer-asn")]
    PeerAsn(PeerAsnCommands),

    /// Version information
    #[command(visible_alias = "ver", visible_alias = "v")]
    Version,

    /// Generate shell completions
    #[command(visible_alias = "comp")]
    #[command(after_help = "EXAMPLES:
    # Generate completions for bash
    armctl completions bash > ~/.local/share/bash-completion/completions/armctl

    # Generate completions for zsh
    armctl completions zsh > ~/.zfunc/_armctl

    # Generate completions for fish
    armctl completions fish > ~/.config/fish/completions/armctl.fish
")]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion generation
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bourne Again Shell
    Bash,
    /// Z Shell
    Zsh,
    /// Friendly Interactive Shell
    Fish,
    /// PowerShell
    #[value(name = "powershell", alias = "power-shell")]
    PowerShell,
    /// Elvish
    Elvish,
}

/// Profile management commands
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// List all configured profiles
    #[command(visible_alias = "ls", visible_alias = "l")]
    List,

    /// Show the path to the configuration file
    Path,

    /// Show details of a specific profile
    #[command(visible_alias = "sh", visible_alias = "get")]
    Show {
        /// Profile name to show
        name: String,
    },

    /// Set or create a profile
    #[command(visible_alias = "add", visible_alias = "create")]
    #[command(after_help = "EXAMPLES:
    # Profile with a token stored in the config file
    armctl profile set prod --subscription-id 00000000-0000-0000-0000-000000000000 \\
        --access-token eyJ0eXAi...

    # Token read from the environment at run time
    armctl profile set ci --subscription-id 00000000-0000-0000-0000-000000000000 \\
        --access-token env:ARM_TOKEN

    # Sovereign cloud endpoint
    armctl profile set gov --subscription-id 00000000-0000-0000-0000-000000000000 \\
        --management-url https://management.usgovcloudapi.net
")]
    Set {
        /// Profile name
        name: String,

        /// Subscription the profile operates on
        #[arg(long)]
        subscription_id: String,

        /// Resource manager endpoint
        #[arg(long, default_value = "https://management.azure.com")]
        management_url: String,

        /// Directory (tenant) id, informational
        #[arg(long)]
        tenant_id: Option<String>,

        /// Bearer token, or an env:/base64:/keyring: reference (prompted if omitted)
        #[arg(long)]
        access_token: Option<String>,

        /// Do not prompt for a token when none is given
        #[arg(long)]
        no_token: bool,

        /// Store the token in OS keyring instead of config file
        #[cfg(feature = "secure-storage")]
        #[arg(long)]
        use_keyring: bool,
    },

    /// Remove a profile
    #[command(visible_alias = "rm", visible_alias = "del", visible_alias = "delete")]
    Remove {
        /// Profile name to remove
        name: String,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Set the default profile
    #[command(name = "default", visible_alias = "def")]
    Default {
        /// Profile name to use when --profile is not given
        name: String,
    },
}
