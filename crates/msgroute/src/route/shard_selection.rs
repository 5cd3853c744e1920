// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shard-based destination selection.

use std::sync::Arc;

use super::{ErrorRoute, Route, RouteHandle, RouteStats};
use crate::message::{Reply, Request, ShardKey};

/// Picks a destination index for a request.
pub trait ShardSelector: Send + Sync {
    /// Selector name, used in the route name.
    fn selector_type(&self) -> &str;

    /// Index of the destination for `request` among `size` destinations.
    ///
    /// Any value `>= size` means "no destination".
    fn select<R: ShardKey>(&self, request: &R, size: usize) -> usize;
}

/// Selects through a shard id to destination index table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicShardSelector {
    shards_map: Vec<u16>,
}

impl BasicShardSelector {
    /// Marker for shard ids that are not mapped.
    pub const UNMAPPED: u16 = u16::MAX;

    /// Selector over a ready shard table.
    pub fn new(shards_map: Vec<u16>) -> Self {
        Self { shards_map }
    }

    /// Build the table from one shard list per destination.
    ///
    /// A shard listed for several destinations goes to the last one.
    /// Destinations from index [`Self::UNMAPPED`] on cannot be addressed
    /// and are left out.
    pub fn from_shard_lists(lists: &[Vec<u16>]) -> Self {
        let table_len = lists
            .iter()
            .flatten()
            .max()
            .map_or(0, |&max| usize::from(max) + 1);

        let mut shards_map = vec![Self::UNMAPPED; table_len];
        for (destination, shards) in lists.iter().enumerate() {
            let destination = match u16::try_from(destination) {
                Ok(destination) if destination != Self::UNMAPPED => destination,
                _ => {
                    tracing::warn!(
                        "Shard table addresses {} destinations, ignoring the remaining {}",
                        Self::UNMAPPED,
                        lists.len() - destination
                    );
                    break;
                }
            };
            for &shard in shards {
                shards_map[usize::from(shard)] = destination;
            }
        }
        Self { shards_map }
    }

    /// The shard table.
    pub fn shards_map(&self) -> &[u16] {
        &self.shards_map
    }
}

impl ShardSelector for BasicShardSelector {
    fn selector_type(&self) -> &str {
        "basic-shard-selector"
    }

    fn select<R: ShardKey>(&self, request: &R, _size: usize) -> usize {
        let shard = request.shard_id() as usize;
        match self.shards_map.get(shard) {
            Some(&destination) if destination != Self::UNMAPPED => usize::from(destination),
            _ => usize::MAX,
        }
    }
}

/// Routes each request to the destination its selector picks.
///
/// Requests whose selection falls outside the destinations go to the
/// out-of-range route, an [`ErrorRoute`] unless configured otherwise.
pub struct ShardSelectionRoute<S, R: Request> {
    selector: S,
    destinations: Vec<RouteHandle<R>>,
    out_of_range: RouteHandle<R>,
    stats: RouteStats,
}

impl<S, R> ShardSelectionRoute<S, R>
where
    S: ShardSelector,
    R: Request + ShardKey,
{
    /// Create a route over `destinations`.
    pub fn new(selector: S, destinations: Vec<RouteHandle<R>>) -> Self {
        Self::with_out_of_range(selector, destinations, Arc::new(ErrorRoute::new()))
    }

    /// Create a route with a custom out-of-range route.
    pub fn with_out_of_range(
        selector: S,
        destinations: Vec<RouteHandle<R>>,
        out_of_range: RouteHandle<R>,
    ) -> Self {
        tracing::debug!(
            "Shard selection route '{}' over {} destinations, out of range: {}",
            selector.selector_type(),
            destinations.len(),
            out_of_range.route_name()
        );
        Self {
            selector,
            destinations,
            out_of_range,
            stats: RouteStats::new(),
        }
    }

    /// Number of destinations.
    pub fn destination_count(&self) -> usize {
        self.destinations.len()
    }

    /// Index of the destination for `request`, or `None` when out of range.
    pub fn select(&self, request: &R) -> Option<usize> {
        let index = self.selector.select(request, self.destinations.len());
        (index < self.destinations.len()).then_some(index)
    }

    /// Destination for `request`, or `None` when out of range.
    pub fn destination_for(&self, request: &R) -> Option<&RouteHandle<R>> {
        self.destinations.get(self.select(request)?)
    }

    /// Route statistics.
    pub fn stats(&self) -> &RouteStats {
        &self.stats
    }

    /// The selector.
    pub fn selector(&self) -> &S {
        &self.selector
    }
}

impl<S, R> Route<R> for ShardSelectionRoute<S, R>
where
    S: ShardSelector,
    R: Request + ShardKey,
{
    fn route_name(&self) -> String {
        format!("selection|{}", self.selector.selector_type())
    }

    fn route(&self, request: &R) -> R::Reply {
        let reply = match self.destination_for(request) {
            Some(destination) => destination.route(request),
            None => {
                tracing::debug!(
                    "{} request for shard {} selects no destination",
                    R::NAME,
                    request.shard_id()
                );
                self.stats.record_out_of_range();
                self.out_of_range.route(request)
            }
        };
        self.stats.record(reply.result());
        reply
    }
}
