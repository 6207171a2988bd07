//! Resource command definitions

use armctl_core::cluster::DurabilityLevel;
use armctl_core::network::RedirectType;
use armctl_core::sql::{AuthenticationType, DatabaseEdition, StorageKeyType};
use clap::{Args, Subcommand};
use url::Url;

use crate::commands::async_utils::AsyncOperationArgs;

/// Server and database an import/export acts on
#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// Resource group of the server
    #[arg(long, short = 'g')]
    pub resource_group: String,

    /// Server name
    #[arg(long)]
    pub server: String,

    /// Database name (the new database, for import)
    #[arg(long)]
    pub database: String,
}

/// Storage and login settings shared by import and export
#[derive(Args, Debug, Clone)]
pub struct TransferArgs {
    /// Blob URI of the bacpac file
    #[arg(long)]
    pub storage_uri: Url,

    /// Kind of storage key given
    #[arg(long, default_value = "StorageAccessKey")]
    pub storage_key_type: StorageKeyType,

    /// Storage key or SAS token
    #[arg(long)]
    pub storage_key: String,

    /// Server administrator login
    #[arg(long)]
    pub admin_login: String,

    /// Administrator password, or an env:/base64:/keyring: reference (prompted if omitted)
    #[arg(long)]
    pub admin_password: Option<String>,

    /// Authentication used against the database
    #[arg(long, default_value = "None")]
    pub auth_type: AuthenticationType,

    /// Server resource id for a network-isolated operation
    #[arg(long)]
    pub sql_server_resource_id: Option<String>,

    /// Storage account resource id for a network-isolated operation
    #[arg(long)]
    pub storage_account_resource_id: Option<String>,
}

/// Database import/export commands
#[derive(Subcommand, Debug)]
pub enum SqlCommands {
    /// Export a database to a bacpac in blob storage
    #[command(after_help = "EXAMPLES:
    armctl sql export -g rg --server srv --database db \\
        --storage-uri https://acct.blob.core.windows.net/backups/db.bacpac \\
        --storage-key KEY --admin-login sqladmin --wait
")]
    Export {
        #[command(flatten)]
        database: DatabaseArgs,

        #[command(flatten)]
        transfer: TransferArgs,

        #[command(flatten)]
        async_ops: AsyncOperationArgs,
    },

    /// Import a bacpac from blob storage into a new database
    Import {
        #[command(flatten)]
        database: DatabaseArgs,

        #[command(flatten)]
        transfer: TransferArgs,

        /// Edition of the new database
        #[arg(long, default_value = "None")]
        edition: DatabaseEdition,

        /// Service objective of the new database (e.g. S3, P1)
        #[arg(long)]
        service_objective: String,

        /// Maximum size of the new database in bytes
        #[arg(long)]
        max_size_bytes: u64,

        #[command(flatten)]
        async_ops: AsyncOperationArgs,
    },

    /// Show the status of an import or export
    Status {
        /// Operation status link returned by export/import
        handle: String,

        #[command(flatten)]
        async_ops: AsyncOperationArgs,
    },
}

/// Application gateway commands
#[derive(Subcommand, Debug)]
pub enum GatewayCommands {
    /// Redirect configurations of a gateway document
    #[command(subcommand, name = "redirect-config")]
    RedirectConfig(RedirectConfigCommands),
}

#[derive(Subcommand, Debug)]
pub enum RedirectConfigCommands {
    /// Add a redirect configuration
    Add {
        /// Gateway JSON document to edit
        #[arg(long)]
        gateway_file: String,

        /// Configuration name, unique within the gateway
        #[arg(long)]
        name: String,

        /// Redirect type
        #[arg(long, default_value = "Permanent")]
        redirect_type: RedirectType,

        /// Listener to redirect to
        #[arg(long, conflicts_with = "target_url")]
        target_listener_id: Option<String>,

        /// External URL to redirect to
        #[arg(long)]
        target_url: Option<String>,

        /// Keep the request path
        #[arg(long)]
        include_path: bool,

        /// Keep the query string
        #[arg(long)]
        include_query_string: bool,

        /// Write the updated gateway back to the file instead of printing it
        #[arg(long)]
        in_place: bool,
    },

    /// Remove a redirect configuration (no-op if it does not exist)
    #[command(visible_alias = "rm")]
    Remove {
        /// Gateway JSON document to edit
        #[arg(long)]
        gateway_file: String,

        /// Configuration name
        #[arg(long)]
        name: String,

        /// Write the updated gateway back to the file instead of printing it
        #[arg(long)]
        in_place: bool,
    },

    /// List redirect configurations
    #[command(visible_alias = "ls")]
    List {
        /// Gateway JSON document to read
        #[arg(long)]
        gateway_file: String,
    },
}

/// Cluster commands
#[derive(Subcommand, Debug)]
pub enum ClusterCommands {
    /// Show a cluster
    Get {
        #[arg(long, short = 'g')]
        resource_group: String,

        #[arg(long)]
        cluster: String,
    },

    /// Node types of a cluster
    #[command(subcommand, name = "node-type")]
    NodeType(NodeTypeCommands),

    /// Show the status of a cluster update
    Status {
        /// Operation status link returned by node-type add/remove
        handle: String,

        #[command(flatten)]
        async_ops: AsyncOperationArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum NodeTypeCommands {
    /// Add a node type
    Add {
        #[arg(long, short = 'g')]
        resource_group: String,

        #[arg(long)]
        cluster: String,

        /// Node type name, unique within the cluster
        #[arg(long)]
        name: String,

        /// Number of VM instances
        #[arg(long)]
        instances: u32,

        /// Make this the primary node type
        #[arg(long)]
        primary: bool,

        /// Durability level
        #[arg(long, default_value = "Bronze")]
        durability: DurabilityLevel,

        #[command(flatten)]
        async_ops: AsyncOperationArgs,
    },

    /// Remove a node type
    #[command(visible_alias = "rm")]
    Remove {
        #[arg(long, short = 'g')]
        resource_group: String,

        #[arg(long)]
        cluster: String,

        /// Node type name
        #[arg(long)]
        name: String,

        #[command(flatten)]
        async_ops: AsyncOperationArgs,
    },
}

/// Peer ASN commands
#[derive(Subcommand, Debug)]
pub enum PeerAsnCommands {
    /// Show one peer ASN, or all of them in the subscription
    Get {
        /// Peer ASN name; lists every peer ASN when omitted
        #[arg(long)]
        name: Option<String>,
    },
}
