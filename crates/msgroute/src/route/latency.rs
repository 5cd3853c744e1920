// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Latency-aware destination selection.

use std::time::Instant;

use parking_lot::Mutex;

use super::{Route, RouteHandle};
use crate::config::ConfigError;
use crate::message::Request;
use crate::smooth::SmoothedStat;

struct Destination<R: Request, const WINDOW: usize> {
    route: RouteHandle<R>,
    latency: Mutex<SmoothedStat<WINDOW>>,
}

/// Routes to the destination with the lowest smoothed round-trip time.
///
/// Destinations without a sample are tried first, so every destination
/// gets measured before the estimates decide. Ties go to the earliest
/// destination.
pub struct LatencyAwareRoute<R: Request, const WINDOW: usize = 16> {
    destinations: Vec<Destination<R, WINDOW>>,
}

impl<R: Request, const WINDOW: usize> LatencyAwareRoute<R, WINDOW> {
    /// Create a route over `destinations`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `destinations` is empty.
    pub fn new(destinations: Vec<RouteHandle<R>>) -> Result<Self, ConfigError> {
        if destinations.is_empty() {
            return Err(ConfigError::Invalid(
                "LatencyAwareRoute: at least one destination required".into(),
            ));
        }
        tracing::debug!(
            "Latency-aware route over {} destinations (window {})",
            destinations.len(),
            WINDOW
        );
        Ok(Self {
            destinations: destinations
                .into_iter()
                .map(|route| Destination {
                    route,
                    latency: Mutex::new(SmoothedStat::new()),
                })
                .collect(),
        })
    }

    /// Index of the destination the next request goes to.
    pub fn select(&self) -> usize {
        let mut best: Option<(usize, f64)> = None;
        for (index, destination) in self.destinations.iter().enumerate() {
            let stat = *destination.latency.lock();
            if !stat.has_value() {
                return index;
            }
            match best {
                Some((_, value)) if value.total_cmp(&stat.value()).is_le() => {}
                _ => best = Some((index, stat.value())),
            }
        }
        best.map_or(0, |(index, _)| index)
    }

    /// Feed a latency sample (microseconds) for destination `index`.
    ///
    /// Unknown indices are ignored.
    pub fn record_latency(&self, index: usize, micros: f64) {
        if let Some(destination) = self.destinations.get(index) {
            destination.latency.lock().insert_sample(micros);
        }
    }

    /// Smoothed latency of destination `index`, once it has a sample.
    pub fn latency(&self, index: usize) -> Option<f64> {
        let destination = self.destinations.get(index)?;
        let stat = destination.latency.lock();
        stat.has_value().then(|| stat.value())
    }

    /// Number of destinations.
    pub fn destination_count(&self) -> usize {
        self.destinations.len()
    }
}

impl<R: Request, const WINDOW: usize> Route<R> for LatencyAwareRoute<R, WINDOW> {
    fn route_name(&self) -> String {
        format!("latency-aware|{}", self.destinations.len())
    }

    fn route(&self, request: &R) -> R::Reply {
        let index = self.select();
        let destination = &self.destinations[index];

        let start = Instant::now();
        let reply = destination.route.route(request);
        let micros = start.elapsed().as_secs_f64() * 1_000_000.0;

        tracing::trace!("{} routed to destination {} in {:.1}us", R::NAME, index, micros);
        destination.latency.lock().insert_sample(micros);
        reply
    }
}
