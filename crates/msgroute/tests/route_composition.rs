// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

// Routes stacked on each other, configured from files on disk.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use msgroute::hellogoodbye::{GoodbyeReply, GoodbyeRequest};
use msgroute::route::current_asynclog_name;
use msgroute::{
    parse_route, AsynclogRoute, ConfigError, LatencyAwareRoute, Reply, ResultCode, Route,
    RouteHandle, ShardSelectionConfig,
};

/// Replies after a fixed delay, counting calls and the async-log scope seen.
struct Backend {
    delay: Duration,
    calls: AtomicUsize,
    scoped_calls: AtomicUsize,
    result: ResultCode,
}

impl Backend {
    fn new(delay: Duration, result: ResultCode) -> Arc<Self> {
        Arc::new(Self {
            delay,
            calls: AtomicUsize::new(0),
            scoped_calls: AtomicUsize::new(0),
            result,
        })
    }
}

impl Route<GoodbyeRequest> for Backend {
    fn route_name(&self) -> String {
        format!("backend|{:?}", self.delay)
    }

    fn route(&self, _request: &GoodbyeRequest) -> GoodbyeReply {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if current_asynclog_name().is_some() {
            self.scoped_calls.fetch_add(1, Ordering::Relaxed);
        }
        std::thread::sleep(self.delay);
        GoodbyeReply::from_result(self.result)
    }
}

#[test]
fn test_latency_aware_prefers_fast_destination() {
    let slow = Backend::new(Duration::from_millis(20), ResultCode::Ok);
    let fast = Backend::new(Duration::ZERO, ResultCode::Ok);
    let route = LatencyAwareRoute::<GoodbyeRequest, 4>::new(vec![
        slow.clone() as RouteHandle<GoodbyeRequest>,
        fast.clone() as RouteHandle<GoodbyeRequest>,
    ])
    .unwrap();

    for _ in 0..10 {
        route.route(&GoodbyeRequest::new(1, "k"));
    }

    // One sample each, then the fast destination wins.
    assert_eq!(slow.calls.load(Ordering::Relaxed), 1);
    assert_eq!(fast.calls.load(Ordering::Relaxed), 9);
    assert!(route.latency(0).unwrap() > route.latency(1).unwrap());
}

#[test]
fn test_asynclog_over_shard_selection() {
    let failing = Backend::new(Duration::ZERO, ResultCode::RemoteError);
    let config = ShardSelectionConfig::from_json_str(
        r#"{
            "pool": { "name": "main", "servers": ["10.0.0.1:11211", "10.0.0.2:11211"] },
            "shards": ["1, 2", "3"]
        }"#,
    )
    .unwrap();
    let selection = config
        .build_route::<GoodbyeRequest, _>(|server| match server {
            "10.0.0.1:11211" => Ok(failing.clone() as RouteHandle<GoodbyeRequest>),
            _ => parse_route("NullRoute"),
        })
        .unwrap();

    let route = AsynclogRoute::new(Arc::new(selection) as RouteHandle<GoodbyeRequest>, "goodbye");
    assert_eq!(route.route_name(), "asynclog:goodbye");

    let reply = route.route(&GoodbyeRequest::new(2, "k"));
    assert_eq!(reply.result(), ResultCode::RemoteError);
    assert_eq!(route.route(&GoodbyeRequest::new(3, "k")).result, ResultCode::NotFound);

    assert_eq!(failing.calls.load(Ordering::Relaxed), 1);
    assert_eq!(failing.scoped_calls.load(Ordering::Relaxed), 1);
    assert_eq!(current_asynclog_name(), None);
}

#[test]
fn test_config_files() {
    let dir = tempfile::tempdir().unwrap();

    let toml_path = dir.path().join("route.toml");
    std::fs::write(
        &toml_path,
        r#"
out_of_range = "ErrorRoute|not served"
shards = [[1, 3], "2, 4,"]

[pool]
type = "Pool"
name = "main"
servers = ["10.0.0.1:11211", "10.0.0.2:11211"]
"#,
    )
    .unwrap();
    let config = ShardSelectionConfig::from_file(&toml_path).unwrap();
    assert_eq!(config.pool.entries().len(), 2);
    assert_eq!(config.shard_lists().unwrap(), vec![vec![1, 3], vec![2, 4]]);

    let json_path = dir.path().join("route.json");
    std::fs::write(&json_path, serde_json::to_string(&config).unwrap()).unwrap();
    assert_eq!(ShardSelectionConfig::from_file(&json_path).unwrap(), config);

    let route = config
        .build_route::<GoodbyeRequest, _>(|_server| parse_route("NullRoute"))
        .unwrap();
    let reply = route.route(&GoodbyeRequest::new(9, "k"));
    assert_eq!(reply.result, ResultCode::LocalError);
    assert_eq!(reply.message, "not served");
}

#[test]
fn test_config_file_errors() {
    let dir = tempfile::tempdir().unwrap();

    let missing = dir.path().join("missing.json");
    assert!(matches!(
        ShardSelectionConfig::from_file(&missing),
        Err(ConfigError::Io(_))
    ));

    let bad_json = dir.path().join("bad.json");
    std::fs::write(&bad_json, "{ not json").unwrap();
    assert!(matches!(
        ShardSelectionConfig::from_file(&bad_json),
        Err(ConfigError::Json(_))
    ));

    let bad_toml = dir.path().join("bad.toml");
    std::fs::write(&bad_toml, "shards = [").unwrap();
    assert!(matches!(
        ShardSelectionConfig::from_file(&bad_toml),
        Err(ConfigError::Toml(_))
    ));
}
