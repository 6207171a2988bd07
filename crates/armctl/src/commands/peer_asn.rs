//! Peer ASN commands

use armctl_core::peering::PeerAsnAdapter;
use tracing::debug;

use crate::cli::PeerAsnCommands;
use crate::connection::ConnectionManager;
use crate::error::Result as CliResult;
use crate::output::{OutputFormat, print_output};

pub async fn handle_peer_asn_command(
    cmd: &PeerAsnCommands,
    conn_mgr: &ConnectionManager,
    profile_name: Option<&str>,
    output_format: OutputFormat,
) -> CliResult<()> {
    let connection = conn_mgr.connect(profile_name)?;
    let adapter = PeerAsnAdapter::new(connection.context)?;

    match cmd {
        PeerAsnCommands::Get { name: Some(name) } => {
            let peer_asn = adapter.get(name).await?;
            print_output(&peer_asn, output_format)?;
        }
        PeerAsnCommands::Get { name: None } => {
            let peer_asns = adapter.list_by_subscription().await?;
            debug!("Listed {} peer ASNs", peer_asns.len());
            print_output(&peer_asns, output_format)?;
        }
    }
    Ok(())
}
