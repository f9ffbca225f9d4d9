//! Two-tier destination channel resolution.
//!
//! One resolver serves both the audit path (cache then fetch) and the
//! subscriber fan-out path (cache only, to bound per-notification latency
//! and API volume), selected by an explicit strategy.

use std::collections::HashMap;
use std::sync::RwLock;

use log::debug;

use crate::webhook::error::GatewayError;
use crate::webhook::gateway::ChatGateway;
use crate::webhook::gateway::ResolvedChannel;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolveStrategy {
    /// Consult only the resolver cache and the platform cache.
    CacheOnly,
    /// Fall through to a remote fetch on a cache miss.
    CacheThenFetch,
}

/// Read-through, write-through channel cache keyed by channel id.
/// Concurrent misses may fetch the same channel twice; the last write wins.
#[derive(Default)]
pub struct ChannelResolver {
    cache: RwLock<HashMap<u64, ResolvedChannel>>,
}

impl ChannelResolver {
    pub fn new() -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub async fn resolve(
        &self,
        gateway: &dyn ChatGateway,
        guild_id: u64,
        channel_id: u64,
        strategy: ResolveStrategy,
    ) -> Result<ResolvedChannel, GatewayError> {
        if let Some(hit) = self.cache.read().unwrap().get(&channel_id) {
            return Ok(hit.clone());
        }

        if let Some(channel) = gateway.cached_channel(guild_id, channel_id) {
            self.remember(channel.clone());
            return Ok(channel);
        }

        match strategy {
            ResolveStrategy::CacheOnly => Err(GatewayError::NotCached { channel_id }),
            ResolveStrategy::CacheThenFetch => {
                debug!("Channel {} not cached, fetching.", channel_id);
                let channel = gateway.fetch_channel(channel_id).await?;
                self.remember(channel.clone());
                Ok(channel)
            }
        }
    }

    fn remember(&self, channel: ResolvedChannel) {
        self.cache.write().unwrap().insert(channel.id, channel);
    }
}
