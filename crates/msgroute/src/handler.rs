// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Request handlers and dispatch.
//!
//! A handler implements [`OnRequest<R>`] once per request type it serves.
//! [`RequestDispatcher`] only accepts a handler that serves every member of
//! its family, so a family member without a handler is a build failure
//! rather than an "unhandled request type" at runtime:
//!
//! ```compile_fail
//! use msgroute::hellogoodbye::{HelloReply, HelloRequest, RequestList};
//! use msgroute::{OnRequest, RequestContext, RequestDispatcher, Reply, ResultCode};
//!
//! struct HelloOnly;
//!
//! impl OnRequest<HelloRequest> for HelloOnly {
//!     fn on_request(&self, _ctx: &RequestContext, _req: HelloRequest) -> HelloReply {
//!         HelloReply::from_result(ResultCode::Ok)
//!     }
//! }
//!
//! // GoodbyeRequest has no handler.
//! let _ = RequestDispatcher::<RequestList, _>::new(HelloOnly);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::Result;
use crate::id_map::DenseTypeMap;
use crate::message::{Message, Request};
use crate::type_list::{Cons, Contains, Nil, TypeList, TypeVisitor};

/// Per-request information handed to handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    /// Sequence number assigned by the dispatcher.
    pub request_id: u64,

    /// Identifier of the request type.
    pub type_id: usize,
}

impl RequestContext {
    /// Create a context for a request of type `R`.
    pub fn new<R: Message>(request_id: u64) -> Self {
        Self {
            request_id,
            type_id: R::TYPE_ID,
        }
    }
}

/// Entry point serving requests of type `R`.
pub trait OnRequest<R: Request> {
    /// Serve one request.
    fn on_request(&self, ctx: &RequestContext, request: R) -> R::Reply;
}

/// Build-time check that `H` serves requests of type `R`.
///
/// Always `true` when it compiles; a missing handler does not compile.
pub const fn can_handle<R, H>() -> bool
where
    R: Request,
    H: OnRequest<R>,
{
    true
}

/// Families whose every member is served by `H`.
pub trait CoveredBy<H>: TypeList {}

impl<H> CoveredBy<H> for Nil {}

impl<H, R, T> CoveredBy<H> for Cons<R, T>
where
    R: Request,
    H: OnRequest<R>,
    T: CoveredBy<H>,
{
}

/// Routes typed requests to a handler covering the family `L`.
///
/// Counts served requests per type in a [`DenseTypeMap`].
pub struct RequestDispatcher<L: TypeList, H> {
    handler: H,
    served: DenseTypeMap<L, AtomicU64>,
    next_request_id: AtomicU64,
}

impl<L, H> RequestDispatcher<L, H>
where
    L: CoveredBy<H>,
{
    /// Create a dispatcher for `handler`.
    pub fn new(handler: H) -> Self {
        tracing::debug!(
            "Request dispatcher covers {} types in ids [{}, {}]",
            L::LEN,
            L::MIN_ID,
            L::MAX_ID
        );
        Self {
            handler,
            served: DenseTypeMap::new(),
            next_request_id: AtomicU64::new(1),
        }
    }

    /// Serve `request` with the handler.
    pub fn dispatch<R, I>(&self, request: R) -> R::Reply
    where
        R: Request,
        H: OnRequest<R>,
        L: Contains<R, I>,
    {
        let ctx = RequestContext::new::<R>(self.next_request_id.fetch_add(1, Ordering::Relaxed));
        self.served
            .get_by_type::<R, I>()
            .fetch_add(1, Ordering::Relaxed);
        tracing::trace!("Dispatching {} request #{}", R::NAME, ctx.request_id);
        self.handler.on_request(&ctx, request)
    }

    /// Requests served for the type identified by `id`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegistryError::IdOutOfRange`] for ids outside the
    /// family.
    pub fn served_by_id(&self, id: usize) -> Result<u64> {
        Ok(self.served.get_by_id(id)?.load(Ordering::Relaxed))
    }

    /// Requests served for the member type `R`.
    pub fn served_by_type<R, I>(&self) -> u64
    where
        R: Message,
        L: Contains<R, I>,
    {
        self.served.get_by_type::<R, I>().load(Ordering::Relaxed)
    }

    /// `(name, served)` for every member, in family order.
    pub fn stats(&self) -> Vec<(&'static str, u64)> {
        let mut collector = ServedCollector {
            served: &self.served,
            out: Vec::with_capacity(L::LEN),
        };
        L::visit(&mut collector);
        collector.out
    }

    /// The wrapped handler.
    pub fn handler(&self) -> &H {
        &self.handler
    }
}

struct ServedCollector<'a, L: TypeList> {
    served: &'a DenseTypeMap<L, AtomicU64>,
    out: Vec<(&'static str, u64)>,
}

impl<L: TypeList> TypeVisitor for ServedCollector<'_, L> {
    fn visit<M: Message>(&mut self) {
        // Members are always in range.
        if let Ok(count) = self.served.get_by_id(M::TYPE_ID) {
            self.out.push((M::NAME, count.load(Ordering::Relaxed)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hellogoodbye::{
        GoodbyeReply, GoodbyeRequest, HelloReply, HelloRequest, RequestList,
    };
    use crate::message::{Reply, ResultCode};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<(u64, usize)>>,
    }

    impl OnRequest<HelloRequest> for Recorder {
        fn on_request(&self, ctx: &RequestContext, request: HelloRequest) -> HelloReply {
            self.seen.lock().unwrap().push((ctx.request_id, ctx.type_id));
            let mut reply = HelloReply::from_result(ResultCode::Ok);
            reply.value = Some(request.value);
            reply
        }
    }

    impl OnRequest<GoodbyeRequest> for Recorder {
        fn on_request(&self, ctx: &RequestContext, _request: GoodbyeRequest) -> GoodbyeReply {
            self.seen.lock().unwrap().push((ctx.request_id, ctx.type_id));
            GoodbyeReply::from_result(ResultCode::NotFound)
        }
    }

    #[test]
    fn test_can_handle() {
        const HELLO: bool = can_handle::<HelloRequest, Recorder>();
        assert!(HELLO);
        assert!(can_handle::<GoodbyeRequest, Recorder>());
    }

    #[test]
    fn test_dispatch_reaches_typed_handler() {
        let dispatcher = RequestDispatcher::<RequestList, _>::new(Recorder::default());

        let reply = dispatcher.dispatch(HelloRequest::new(3, "key").with_value("payload"));
        assert_eq!(reply.result(), ResultCode::Ok);
        assert_eq!(reply.value.map(|v| v.to_vec()), Some(b"payload".to_vec()));

        let reply = dispatcher.dispatch(GoodbyeRequest::new(3, "key"));
        assert_eq!(reply.result(), ResultCode::NotFound);

        let seen = dispatcher.handler().seen.lock().unwrap().clone();
        assert_eq!(
            seen,
            vec![
                (1, HelloRequest::TYPE_ID),
                (2, GoodbyeRequest::TYPE_ID)
            ]
        );
    }

    #[test]
    fn test_served_counters() {
        let dispatcher = RequestDispatcher::<RequestList, _>::new(Recorder::default());
        for _ in 0..3 {
            dispatcher.dispatch(HelloRequest::new(1, "a"));
        }
        dispatcher.dispatch(GoodbyeRequest::new(1, "a"));

        assert_eq!(dispatcher.served_by_type::<HelloRequest, _>(), 3);
        assert_eq!(dispatcher.served_by_type::<GoodbyeRequest, _>(), 1);
        assert_eq!(dispatcher.served_by_id(HelloRequest::TYPE_ID), Ok(3));
        // 66 is the hello reply id: inside the range, but not a request.
        assert_eq!(dispatcher.served_by_id(66), Ok(0));
        assert!(dispatcher.served_by_id(64).is_err());

        assert_eq!(dispatcher.stats(), vec![("hello", 3), ("goodbye", 1)]);
    }
}
