// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Route configuration.
//!
//! Supports both programmatic and file-based configuration (JSON or TOML).

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::message::{Request, ShardKey};
use crate::route::{
    parse_route, BasicShardSelector, ErrorRoute, RouteHandle, RouteSpec, ShardSelectionRoute,
};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Unknown route: {0}")]
    UnknownRoute(String),

    #[error(
        "ShardSelectionRoute: 'shards' property expected to be a string of \
         comma-separated integers. Invalid shard found in string: {item}. \
         Exception: {reason}"
    )]
    InvalidShard { item: String, reason: String },

    #[error("ShardSelectionRoute: 'shards' must have the same number of entries as servers in 'pool'")]
    ShardCountMismatch { shards: usize, destinations: usize },
}

/// Shard selection route configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShardSelectionConfig {
    /// Route for requests whose shard maps to no destination.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_of_range: Option<String>,

    /// Shards served by each destination, in pool order.
    pub shards: Vec<ShardList>,

    /// Destinations.
    pub pool: PoolConfig,
}

/// Destinations of a selection route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PoolConfig {
    /// Route specs, one per destination.
    Routes(Vec<String>),

    /// A named pool of servers.
    Pool {
        #[serde(rename = "type", default = "default_pool_type")]
        kind: String,
        name: String,
        servers: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        protocol: Option<String>,
    },
}

fn default_pool_type() -> String {
    "Pool".to_string()
}

impl PoolConfig {
    /// Number of destinations.
    pub fn len(&self) -> usize {
        match self {
            Self::Routes(routes) => routes.len(),
            Self::Pool { servers, .. } => servers.len(),
        }
    }

    /// Check if the pool has no destination.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Destination specs, in order.
    pub fn entries(&self) -> &[String] {
        match self {
            Self::Routes(routes) => routes,
            Self::Pool { servers, .. } => servers,
        }
    }
}

/// Shards of one destination: an integer list or a comma-separated string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShardList {
    Ids(Vec<u32>),
    Csv(String),
}

impl ShardList {
    /// Parse into shard ids.
    ///
    /// Empty items are skipped, so `""`, `","` and trailing commas are fine.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidShard`] for non-numeric items or ids
    /// that do not fit the shard table.
    pub fn parse(&self) -> Result<Vec<u16>, ConfigError> {
        match self {
            Self::Ids(ids) => ids
                .iter()
                .map(|&id| {
                    u16::try_from(id).map_err(|_| ConfigError::InvalidShard {
                        item: id.to_string(),
                        reason: "Shard id out of range".into(),
                    })
                })
                .collect(),
            Self::Csv(csv) => csv
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(parse_shard)
                .collect(),
        }
    }
}

fn parse_shard(item: &str) -> Result<u16, ConfigError> {
    if let Some(bad) = item.chars().find(|c| !c.is_ascii_digit()) {
        return Err(ConfigError::InvalidShard {
            item: item.to_string(),
            reason: format!("Non-digit character found: \"{}\"", bad),
        });
    }
    item.parse::<u16>().map_err(|_| ConfigError::InvalidShard {
        item: item.to_string(),
        reason: "Shard id out of range".into(),
    })
}

impl ShardSelectionConfig {
    /// Largest pool a shard table can address.
    pub const MAX_DESTINATIONS: usize = BasicShardSelector::UNMAPPED as usize;

    /// Load configuration from a JSON or TOML file, by extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            Some("toml") => Self::from_toml_str(&content),
            other => Err(ConfigError::Invalid(format!(
                "Unsupported config extension: {}",
                other.unwrap_or("<none>")
            ))),
        }
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Example configuration, as written by `gen-config`.
    pub fn example() -> Self {
        Self {
            out_of_range: Some("ErrorRoute|shard not served".into()),
            shards: vec![
                ShardList::Ids(vec![1, 3, 5]),
                ShardList::Csv("2, 4, 6".into()),
            ],
            pool: PoolConfig::Routes(vec!["NullRoute".into(), "ErrorRoute".into()]),
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shards.len() != self.pool.len() {
            return Err(ConfigError::ShardCountMismatch {
                shards: self.shards.len(),
                destinations: self.pool.len(),
            });
        }

        if self.pool.len() > Self::MAX_DESTINATIONS {
            return Err(ConfigError::Invalid(format!(
                "ShardSelectionRoute: at most {} destinations supported, got {}",
                Self::MAX_DESTINATIONS,
                self.pool.len()
            )));
        }

        for list in &self.shards {
            list.parse()?;
        }

        if let PoolConfig::Routes(routes) = &self.pool {
            for spec in routes {
                RouteSpec::parse(spec)?;
            }
        }

        if let Some(spec) = &self.out_of_range {
            RouteSpec::parse(spec)?;
        }

        Ok(())
    }

    /// Parsed shard lists, one per destination.
    pub fn shard_lists(&self) -> Result<Vec<Vec<u16>>, ConfigError> {
        self.shards.iter().map(ShardList::parse).collect()
    }

    /// Shard selector built from the shard lists.
    pub fn selector(&self) -> Result<BasicShardSelector, ConfigError> {
        Ok(BasicShardSelector::from_shard_lists(&self.shard_lists()?))
    }

    /// Build the selection route.
    ///
    /// Pool entries become destinations through `factory`; the
    /// out-of-range spec, when set, goes through [`parse_route`].
    pub fn build_route<R, F>(
        &self,
        mut factory: F,
    ) -> Result<ShardSelectionRoute<BasicShardSelector, R>, ConfigError>
    where
        R: Request + ShardKey,
        F: FnMut(&str) -> Result<RouteHandle<R>, ConfigError>,
    {
        self.validate()?;

        let destinations = self
            .pool
            .entries()
            .iter()
            .map(|entry| factory(entry))
            .collect::<Result<Vec<_>, _>>()?;

        let out_of_range = match &self.out_of_range {
            Some(spec) => parse_route::<R>(spec)?,
            None => Arc::new(ErrorRoute::new()),
        };

        Ok(ShardSelectionRoute::with_out_of_range(
            self.selector()?,
            destinations,
            out_of_range,
        ))
    }

    /// Build the selection route without server connections.
    ///
    /// Route-spec pools are built as configured. Servers of a named pool
    /// cannot be reached from here and are replaced by [`NullRoute`]
    /// destinations.
    ///
    /// [`NullRoute`]: crate::route::NullRoute
    pub fn build_detached_route<R>(
        &self,
    ) -> Result<ShardSelectionRoute<BasicShardSelector, R>, ConfigError>
    where
        R: Request + ShardKey,
    {
        match &self.pool {
            PoolConfig::Routes(_) => self.build_route(parse_route::<R>),
            PoolConfig::Pool { name, .. } => self.build_route(|server| {
                tracing::warn!(
                    "Pool '{}' server {} is not reachable offline, using NullRoute",
                    name,
                    server
                );
                Ok(RouteSpec::Null.build())
            }),
        }
    }
}
