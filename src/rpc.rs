//! RPC provider management for Ethereum connections.
//!
//! This module handles connection to an Ethereum node via HTTP RPC using
//! Alloy's `ProviderBuilder`, and adapts the provider to the
//! [`HeaderSource`] capability the monitor consumes.
//!
//! ## Example
//!
//! ```no_run
//! use reorg_monitor::rpc::{create_provider, RpcHeaderSource};
//! use reorg_monitor::reorg::HeaderSource;
//! use reorg_monitor::error::MonitorResult;
//!
//! # async fn example() -> MonitorResult<()> {
//! let provider = create_provider("https://eth-mainnet.example.com/rpc").await?;
//! let source = RpcHeaderSource::new(provider);
//! let head = source.current_height().await?;
//! println!("Chain head: {head}");
//! # Ok(())
//! # }
//! ```

use alloy::providers::{Provider as AlloyProvider, ProviderBuilder, RootProvider};
use alloy::rpc::types::BlockTransactionsKind;
use alloy::transports::http::{Client, Http};
use tracing::{debug, info, instrument};

use crate::error::{MonitorError, MonitorResult};
use crate::reorg::{BlockRecord, HeaderSource};

/// Type alias for the HTTP provider.
pub type Provider = RootProvider<Http<Client>>;

/// Create a new Ethereum RPC provider connected via HTTP.
///
/// # Errors
///
/// Returns a configuration error if the RPC URL cannot be parsed.
#[allow(clippy::unused_async)]
#[instrument(skip(rpc_url), fields(rpc_host = tracing::field::Empty))]
pub async fn create_provider(rpc_url: &str) -> MonitorResult<Provider> {
    info!("Initializing RPC provider");

    // Extract host for logging (without path components that may carry keys)
    let host = rpc_url
        .split("//")
        .nth(1)
        .and_then(|rest| rest.split('/').next())
        .unwrap_or("unknown");
    tracing::Span::current().record("rpc_host", host);
    debug!(rpc_host = host, "Creating HTTP provider");

    let url = rpc_url.parse().map_err(|e| {
        MonitorError::config(
            format!("Failed to parse RPC URL: '{rpc_url}'. Expected an http(s) endpoint"),
            Some(Box::new(e)),
        )
    })?;

    let provider = ProviderBuilder::new().on_http(url);

    info!("RPC provider initialized successfully");

    Ok(provider)
}

/// [`HeaderSource`] backed by an Alloy HTTP provider.
///
/// A thin adapter: every RPC failure maps to a transient
/// [`MonitorError::FetchError`], which the watch loop recovers from by
/// restarting the detection cycle.
#[derive(Debug, Clone)]
pub struct RpcHeaderSource {
    provider: Provider,
}

impl RpcHeaderSource {
    /// Wrap a provider.
    #[must_use]
    pub const fn new(provider: Provider) -> Self {
        Self { provider }
    }
}

impl HeaderSource for RpcHeaderSource {
    async fn current_height(&self) -> MonitorResult<u64> {
        debug!("Fetching latest block number");

        let height = self.provider.get_block_number().await.map_err(|e| {
            MonitorError::fetch("Failed to fetch latest block number", Some(Box::new(e)))
        })?;

        debug!(height, "Latest block fetched");
        Ok(height)
    }

    async fn header_at(&self, height: u64) -> MonitorResult<BlockRecord> {
        let block = self
            .provider
            .get_block_by_number(height.into(), BlockTransactionsKind::Hashes)
            .await
            .map_err(|e| {
                MonitorError::fetch(
                    format!("Failed to fetch block {height}"),
                    Some(Box::new(e)),
                )
            })?
            .ok_or_else(|| MonitorError::fetch(format!("Block {height} not found"), None))?;

        Ok(BlockRecord::from_block(&block))
    }
}
