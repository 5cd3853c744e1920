// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed message registry and request routing core.
//!
//! Compile-time machinery for a request-routing proxy that handles a fixed
//! family of request and reply types, plus the routes built on it.
//!
//! # Features
//!
//! - **Type Registry**: Identifier ranges and name lookup over a type list
//! - **Dense Type Map**: Array-backed map keyed by message type identifier
//! - **Capability Adapters**: Uniform access to optional message fields
//! - **Handler Checks**: Missing handlers are build failures
//! - **Smoothed Stats**: Exponential moving average for latency tracking
//! - **Routes**: Null, error, shard-selection, async-log and latency-aware routes
//!
//! # Quick Start
//!
//! ```
//! use msgroute::hellogoodbye::{HelloRequest, MessageList};
//! use msgroute::{DenseTypeMap, TypeList};
//!
//! assert_eq!(MessageList::MIN_ID, 65);
//! assert_eq!(MessageList::MAX_ID, 68);
//!
//! let mut counters = DenseTypeMap::<MessageList, u64>::new();
//! counters.set_type::<HelloRequest, _>(1);
//! assert_eq!(counters.get_by_id(65), Ok(&1));
//! assert!(counters.get_by_id(70).is_err());
//! ```
//!
//! # Configuration File
//!
//! ```toml
//! out_of_range = "ErrorRoute|shard not served"
//! shards = [[1, 3, 5], "2, 4, 6"]
//! pool = ["NullRoute", "ErrorRoute"]
//! ```

pub mod capability;
pub mod config;
pub mod error;
pub mod handler;
pub mod hellogoodbye;
pub mod id_map;
pub mod message;
pub mod payload;
pub mod route;
pub mod smooth;
pub mod type_list;

pub use capability::{
    get_flags, set_message_if_present, value_ptr, value_ptr_mut, value_range_slow, Capabilities,
};
pub use config::{ConfigError, PoolConfig, ShardList, ShardSelectionConfig};
pub use error::{RegistryError, Result};
pub use handler::{can_handle, CoveredBy, OnRequest, RequestContext, RequestDispatcher};
pub use id_map::{DenseTypeMap, TypeMapBuilder};
pub use message::{Message, Reply, Request, ResultCode, ShardKey};
pub use payload::Payload;
pub use route::{
    parse_route, AsynclogRoute, BasicShardSelector, ErrorRoute, LatencyAwareRoute, NullRoute,
    Route, RouteHandle, RouteSpec, RouteStats, RouteStatsSnapshot, ShardSelectionRoute,
    ShardSelector,
};
pub use smooth::{Sample, SmoothedStat};
pub use type_list::{
    members, type_id_by_name, Cons, Contains, Here, IdentifierRange, Nil, There, TypeList,
    TypeVisitor,
};
