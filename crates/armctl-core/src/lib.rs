//! # armctl-core
//!
//! Client-side adapters for resource-manager REST APIs, shared by the
//! `armctl` CLI and anything else that wants to drive the same operations.
//!
//! Every resource family follows the same layering:
//!
//! - a **builder** maps a user-facing model to a transport request, resolving
//!   stored secrets on the way
//! - a **communicator** performs exactly one HTTP call and returns the raw
//!   response or a [`TransportFault`]
//! - an **adapter** ties the two together, decodes service error envelopes
//!   (see [`envelope`]) and overlays the outcome onto a copy of the caller's
//!   model (see [`operation::overlay`])
//!
//! Long-running operations return an [`OperationHandle`]; callers poll it with
//! [`progress::poll_status`] or their own loop. Nothing in this crate retries.
//!
//! ## Modules
//!
//! ```text
//! armctl-core/
//! ├── config/       # Profiles, credential resolution, poll settings
//! ├── context       # Read-only subscription/credential context
//! ├── transport     # REST client, raw responses and faults
//! ├── envelope      # Error envelope decoding
//! ├── operation     # Handles, states, overlay, status models
//! ├── progress      # Status polling with progress callbacks
//! ├── mutation      # Named child collections
//! ├── sql/          # Database import/export
//! ├── network/      # Application gateway redirect configurations
//! ├── cluster/      # Service fabric node types
//! └── peering/      # Peer ASNs
//! ```

pub mod cluster;
pub mod config;
pub mod context;
pub mod envelope;
pub mod error;
pub mod mutation;
pub mod network;
pub mod operation;
pub mod peering;
pub mod progress;
pub mod secret;
pub mod sql;
pub mod transport;

pub use context::OperationContext;
pub use envelope::OperationError;
pub use error::{CoreError, Result};
pub use operation::{OperationHandle, OperationState, StatusModel};
pub use progress::{ProgressCallback, ProgressEvent, StatusSource, poll_status};
pub use secret::{CredentialError, SecretString};
pub use transport::TransportFault;
