// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! msgroute CLI
//!
//! Inspect the built-in message family and route configurations.
//!
//! # Usage
//!
//! ```bash
//! # List message types, identifiers and capabilities
//! msgroute types
//!
//! # Generate and validate a shard selection config
//! msgroute gen-config --output route.toml
//! msgroute validate --config route.toml
//!
//! # Which destination serves shard 4?
//! msgroute route --config route.toml --shard 4
//!
//! # Feed samples through a smoothed estimator
//! msgroute smooth --window 8 10 12 40 11
//! ```

use clap::{Parser, Subcommand};
use msgroute::hellogoodbye::{GoodbyeRequest, MessageList, ReplyList, RequestList};
use msgroute::{
    Capabilities, IdentifierRange, Message, Route, ShardSelectionConfig, SmoothedStat, TypeList,
    TypeVisitor,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Typed message registry and routing tool
#[derive(Parser, Debug)]
#[command(name = "msgroute")]
#[command(about = "Typed message registry and shard routing inspection")]
#[command(version)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the message types of the built-in family
    Types,

    /// Generate example configuration file
    GenConfig {
        /// Output file path (.toml or .json)
        #[arg(short, long, default_value = "route.toml")]
        output: PathBuf,
    },

    /// Validate a configuration file
    Validate {
        /// Configuration file path
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Route a goodbye request for a shard through a configuration
    Route {
        /// Configuration file path
        #[arg(short, long)]
        config: PathBuf,

        /// Shard id of the request
        #[arg(short, long)]
        shard: u32,
    },

    /// Print the smoothed estimate after each sample
    Smooth {
        /// Logical window (1, 2, 4, 8, 16, 32 or 64)
        #[arg(short, long, default_value = "16")]
        window: usize,

        /// Samples, in arrival order
        #[arg(required = true, allow_negative_numbers = true)]
        samples: Vec<f64>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match args.command {
        Commands::Types => cmd_types(),
        Commands::GenConfig { output } => cmd_gen_config(output),
        Commands::Validate { config } => cmd_validate(config),
        Commands::Route { config, shard } => cmd_route(config, shard),
        Commands::Smooth { window, samples } => cmd_smooth(window, &samples),
    }
}

struct TypeTable {
    rows: Vec<(usize, &'static str, Capabilities)>,
}

impl TypeVisitor for TypeTable {
    fn visit<M: Message>(&mut self) {
        self.rows.push((M::TYPE_ID, M::NAME, Capabilities::of::<M>()));
    }
}

fn cmd_types() -> Result<(), Box<dyn std::error::Error>> {
    let mut table = TypeTable {
        rows: Vec::with_capacity(MessageList::LEN),
    };
    MessageList::visit(&mut table);

    println!("{:>4}  {:<16} capabilities", "id", "name");
    for (id, name, caps) in &table.rows {
        println!("{:>4}  {:<16} {}", id, name, caps);
    }
    println!();
    print_range("requests", IdentifierRange::of::<RequestList>());
    print_range("replies", IdentifierRange::of::<ReplyList>());
    print_range("all", IdentifierRange::of::<MessageList>());
    Ok(())
}

fn print_range(label: &str, range: IdentifierRange) {
    if range.is_empty() {
        println!("{:<9} (empty)", label);
    } else {
        println!(
            "{:<9} ids [{}, {}], {} slots",
            label, range.min, range.max, range.size
        );
    }
}

fn cmd_gen_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = ShardSelectionConfig::example();

    let content = if output.extension().is_some_and(|ext| ext == "json") {
        serde_json::to_string_pretty(&config)?
    } else {
        let toml_str = toml::to_string_pretty(&config)?;
        // Add comments
        format!(
            r#"# msgroute shard selection configuration
# Generated by msgroute gen-config

{}
"#,
            toml_str
        )
    };

    std::fs::write(&output, content)?;
    println!("Generated configuration file: {}", output.display());
    Ok(())
}

fn cmd_validate(config_path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    match ShardSelectionConfig::from_file(&config_path) {
        Ok(config) => {
            println!("Configuration valid!");
            println!();
            println!("Destinations: {}", config.pool.len());
            for (i, (entry, shards)) in config
                .pool
                .entries()
                .iter()
                .zip(config.shard_lists()?)
                .enumerate()
            {
                println!("  [{}] {} <- shards {:?}", i, entry, shards);
            }
            println!(
                "Out of range: {}",
                config.out_of_range.as_deref().unwrap_or("ErrorRoute")
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("Configuration invalid: {}", e);
            std::process::exit(1);
        }
    }
}

fn cmd_route(config_path: PathBuf, shard: u32) -> Result<(), Box<dyn std::error::Error>> {
    let config = ShardSelectionConfig::from_file(&config_path)?;
    let route = config.build_detached_route::<GoodbyeRequest>()?;

    let request = GoodbyeRequest::new(shard, "cli");
    let entries = config.pool.entries();
    let target = match route.select(&request) {
        Some(index) => format!("destination {} ({})", index, entries[index]),
        None => "out of range".to_string(),
    };

    let reply = route.route(&request);
    println!("Route:  {}", route.route_name());
    println!("Shard:  {} -> {}", shard, target);
    println!("Result: {}", reply.result);
    if !reply.message.is_empty() {
        println!("Message: {}", reply.message);
    }
    println!("Stats:  {}", route.stats().snapshot());
    Ok(())
}

fn cmd_smooth(window: usize, samples: &[f64]) -> Result<(), Box<dyn std::error::Error>> {
    let estimates = match window {
        1 => smooth_with::<1>(samples),
        2 => smooth_with::<2>(samples),
        4 => smooth_with::<4>(samples),
        8 => smooth_with::<8>(samples),
        16 => smooth_with::<16>(samples),
        32 => smooth_with::<32>(samples),
        64 => smooth_with::<64>(samples),
        other => {
            return Err(format!("Unsupported window {} (use 1, 2, 4, 8, 16, 32 or 64)", other).into())
        }
    };

    for (sample, estimate) in samples.iter().zip(estimates) {
        println!("{:>12.3} -> {:>12.3}", sample, estimate);
    }
    Ok(())
}

fn smooth_with<const WINDOW: usize>(samples: &[f64]) -> Vec<f64> {
    let mut stat = SmoothedStat::<WINDOW>::new();
    samples
        .iter()
        .map(|&sample| {
            stat.insert_sample(sample);
            stat.value()
        })
        .collect()
}
