// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Async-log scoping.
//!
//! Failed requests of types flagged with [`Request::ASYNCLOG`] are meant to
//! be spooled to an async log and replayed later. [`AsynclogRoute`] makes
//! the log name visible to everything below it for the duration of the
//! inner route call.

use std::cell::RefCell;

use super::{Route, RouteHandle};
use crate::message::{Reply, Request};

thread_local! {
    static ASYNCLOG_NAME: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Async-log name installed for the current call, if any.
pub fn current_asynclog_name() -> Option<String> {
    ASYNCLOG_NAME.with(|name| name.borrow().clone())
}

/// Run `f` with `name` as the current async-log name.
///
/// The previous name is restored when `f` returns or unwinds.
pub fn with_asynclog_name<T>(name: &str, f: impl FnOnce() -> T) -> T {
    let previous = ASYNCLOG_NAME.with(|slot| slot.replace(Some(name.to_string())));
    let _restore = RestoreName(previous);
    f()
}

struct RestoreName(Option<String>);

impl Drop for RestoreName {
    fn drop(&mut self) {
        let previous = self.0.take();
        // Thread-local may already be gone during thread teardown.
        let _ = ASYNCLOG_NAME.try_with(|slot| *slot.borrow_mut() = previous);
    }
}

/// Forwards to an inner route, scoping the async-log name for request
/// types that are async-logged.
pub struct AsynclogRoute<R: Request> {
    inner: RouteHandle<R>,
    name: String,
}

impl<R: Request> AsynclogRoute<R> {
    pub fn new(inner: RouteHandle<R>, name: impl Into<String>) -> Self {
        Self {
            inner,
            name: name.into(),
        }
    }

    /// Async-log name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<R: Request> Route<R> for AsynclogRoute<R> {
    fn route_name(&self) -> String {
        format!("asynclog:{}", self.name)
    }

    fn route(&self, request: &R) -> R::Reply {
        if !R::ASYNCLOG {
            return self.inner.route(request);
        }

        let reply = with_asynclog_name(&self.name, || self.inner.route(request));
        if reply.result().is_error() {
            tracing::trace!(
                "{} request failed with {}, eligible for async log '{}'",
                R::NAME,
                reply.result(),
                self.name
            );
        }
        reply
    }
}
