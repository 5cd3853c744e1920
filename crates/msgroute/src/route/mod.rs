// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Route handles.
//!
//! A route takes a typed request and produces its reply. Routes compose:
//! selection routes pick one of several destination routes, wrappers such
//! as [`AsynclogRoute`] adjust the context before forwarding. The
//! destinations that talk to real servers live outside this crate.

pub mod asynclog;
pub mod latency;
pub mod shard_selection;

pub use asynclog::{current_asynclog_name, with_asynclog_name, AsynclogRoute};
pub use latency::LatencyAwareRoute;
pub use shard_selection::{BasicShardSelector, ShardSelectionRoute, ShardSelector};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::capability::set_message_if_present;
use crate::config::ConfigError;
use crate::message::{Reply, Request, ResultCode};

/// A route for requests of type `R`.
pub trait Route<R: Request>: Send + Sync {
    /// Human-readable route description.
    fn route_name(&self) -> String;

    /// Route one request.
    fn route(&self, request: &R) -> R::Reply;
}

/// Shared, type-erased route.
pub type RouteHandle<R> = Arc<dyn Route<R>>;

/// Replies "not found" to everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRoute;

impl<R: Request> Route<R> for NullRoute {
    fn route_name(&self) -> String {
        "null".to_string()
    }

    fn route(&self, _request: &R) -> R::Reply {
        R::Reply::from_result(ResultCode::NotFound)
    }
}

/// Replies with a local error, carrying a message on reply types that have one.
#[derive(Debug, Clone, Default)]
pub struct ErrorRoute {
    message: String,
}

impl ErrorRoute {
    /// Error route without a message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Error route setting `message` on its replies.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Message set on replies.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl<R: Request> Route<R> for ErrorRoute {
    fn route_name(&self) -> String {
        if self.message.is_empty() {
            "error".to_string()
        } else {
            format!("error|{}", self.message)
        }
    }

    fn route(&self, _request: &R) -> R::Reply {
        let mut reply = R::Reply::from_result(ResultCode::LocalError);
        if !self.message.is_empty() {
            set_message_if_present(&mut reply, self.message.as_str());
        }
        reply
    }
}

/// Textual form of a built-in route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteSpec {
    /// `NullRoute`
    Null,

    /// `ErrorRoute` or `ErrorRoute|<message>`
    Error(String),
}

impl RouteSpec {
    /// Parse a textual route.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownRoute`] for unrecognized routes.
    pub fn parse(spec: &str) -> Result<Self, ConfigError> {
        let (kind, arg) = match spec.split_once('|') {
            Some((kind, arg)) => (kind.trim(), Some(arg)),
            None => (spec.trim(), None),
        };
        match kind {
            "NullRoute" => Ok(Self::Null),
            "ErrorRoute" => Ok(Self::Error(arg.unwrap_or_default().to_string())),
            _ => Err(ConfigError::UnknownRoute(spec.to_string())),
        }
    }

    /// Build the route for requests of type `R`.
    pub fn build<R: Request>(&self) -> RouteHandle<R> {
        match self {
            Self::Null => Arc::new(NullRoute),
            Self::Error(message) => Arc::new(ErrorRoute::with_message(message.as_str())),
        }
    }
}

/// Build a route from its textual form.
///
/// Recognized forms: `NullRoute`, `ErrorRoute` and `ErrorRoute|<message>`.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownRoute`] for anything else.
pub fn parse_route<R: Request>(spec: &str) -> Result<RouteHandle<R>, ConfigError> {
    Ok(RouteSpec::parse(spec)?.build())
}

/// Statistics for a route.
#[derive(Debug, Default)]
pub struct RouteStats {
    /// Requests routed.
    pub requests_routed: AtomicU64,

    /// Replies carrying an error result.
    pub errors: AtomicU64,

    /// Requests that selected no valid destination.
    pub out_of_range: AtomicU64,
}

impl RouteStats {
    /// Create new stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a routed request and its outcome.
    pub fn record(&self, result: ResultCode) {
        self.requests_routed.fetch_add(1, Ordering::Relaxed);
        if result.is_error() {
            self.errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a request that fell outside the destinations.
    pub fn record_out_of_range(&self) {
        self.out_of_range.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of current stats.
    pub fn snapshot(&self) -> RouteStatsSnapshot {
        RouteStatsSnapshot {
            requests_routed: self.requests_routed.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            out_of_range: self.out_of_range.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of route statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteStatsSnapshot {
    pub requests_routed: u64,
    pub errors: u64,
    pub out_of_range: u64,
}

impl RouteStatsSnapshot {
    /// Fraction of routed requests that failed.
    pub fn error_rate(&self) -> f64 {
        if self.requests_routed > 0 {
            self.errors as f64 / self.requests_routed as f64
        } else {
            0.0
        }
    }
}

impl std::fmt::Display for RouteStatsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} routed, {} errors ({:.1}%), {} out of range",
            self.requests_routed,
            self.errors,
            self.error_rate() * 100.0,
            self.out_of_range
        )
    }
}
