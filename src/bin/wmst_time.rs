// Copyright 2024 OctoFHIR Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Command line interface for WMS-T time dimensions
//!
//! Resolves extent expressions the way a capabilities document declares them
//! and prints the result as JSON.

use clap::{Parser, Subcommand};
use std::process;
use wmst_time::{
    DimensionDeclaration, ExtentDeclaration, SortOrder, TimeDimensionConfig,
    TimeDimensionCoordinator, TimeSpecification, decode_resolution, detect_precision,
};

#[derive(Parser)]
#[command(name = "wmst-time")]
#[command(about = "Resolve WMS-T time dimension extents")]
#[command(version)]
#[command(author = "OctoFHIR Team <funyloony@gmail.com>")]
struct Cli {
    /// JSON configuration file (camelCase TimeDimensionConfig fields)
    #[arg(long, value_name = "FILE")]
    config: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand an extent expression and resolve its default value
    Resolve {
        /// Extent expression, e.g. 2006/2018/P2Y
        #[arg(short, long)]
        extent: String,
        /// Dimension units declared by the service
        #[arg(short, long, default_value = "ISO8601")]
        units: String,
        /// Default value declared on the extent
        #[arg(long)]
        extent_default: Option<String>,
        /// Configured default value, or "current"
        #[arg(short, long)]
        default: Option<String>,
        /// Order values by instant instead of by string
        #[arg(long)]
        chronological: bool,
        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,
    },
    /// Print the precision of a timestamp
    Detect {
        /// ISO8601 timestamp
        timestamp: String,
    },
    /// Decode an ISO8601 resolution into its increments
    Decode {
        /// Resolution such as P1DT12H
        resolution: String,
        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,
    },
}

fn main() {
    human_panic::setup_panic!();
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve {
            ref extent,
            ref units,
            ref extent_default,
            ref default,
            chronological,
            pretty,
        } => {
            let mut config = load_config(cli.config.as_deref());
            if chronological {
                config.sort_order = SortOrder::Chronological;
            }
            handle_resolve(
                config,
                extent,
                units,
                extent_default.as_deref(),
                default.as_deref(),
                pretty,
            );
        }
        Commands::Detect { timestamp } => match detect_precision(&timestamp) {
            Ok(precision) => println!("{precision}"),
            Err(e) => fail(&e),
        },
        Commands::Decode { resolution, pretty } => {
            print_json(&decode_resolution(&resolution), pretty);
        }
    }
}

fn load_config(path: Option<&str>) -> TimeDimensionConfig {
    let Some(path) = path else {
        return TimeDimensionConfig::default();
    };
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading config file '{path}': {e}");
            process::exit(1);
        }
    };
    TimeDimensionConfig::from_json(&content).unwrap_or_else(|e| fail(&e))
}

fn handle_resolve(
    config: TimeDimensionConfig,
    extent: &str,
    units: &str,
    extent_default: Option<&str>,
    default: Option<&str>,
    pretty: bool,
) {
    const NAME: &str = "time";

    let dimension = DimensionDeclaration::new(NAME, units);
    let mut declaration = ExtentDeclaration::new(NAME, extent);
    if let Some(value) = extent_default {
        declaration = declaration.with_default(value);
    }
    let mut spec = TimeSpecification::new(NAME, NAME);
    if let Some(value) = default {
        spec = spec.with_default(value);
    }

    let coordinator = TimeDimensionCoordinator::new(config);
    match coordinator.resolve_time_dimension(Some(&dimension), Some(&declaration), &spec) {
        Ok(result) => print_json(&result, pretty),
        Err(e) => fail(&e),
    }
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) {
    let output = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match output {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error serializing output: {e}");
            process::exit(1);
        }
    }
}

fn fail(error: &wmst_time::TimeDimensionError) -> ! {
    eprintln!("Error: {error}");
    let help = error.error_info().help;
    if !help.is_empty() {
        eprintln!("  help: {help}");
    }
    process::exit(1);
}
