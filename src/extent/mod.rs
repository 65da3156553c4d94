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

//! Parser for WMS extent expressions
//!
//! An extent expression is a comma separated list of segments. Each segment
//! is either a single literal value or a `min/max/resolution` interval:
//!
//! ```text
//! 2020-01-01,2020-06-01
//! 2006/2018/P2Y
//! 2006/2018/P2Y,2020/2024/P1Y
//! ```
//!
//! Parsing yields the merged, deduplicated, ascending time range and the
//! finest step of all intervals.

pub mod range;

pub use range::{generate_bounded, generate_time_range};

use crate::config::{MalformedSegmentPolicy, SortOrder, TimeDimensionConfig};
use crate::core::{
    IncrementMap, PrecisionDateTime, Result, TimeDimensionError, decode_resolution, is_smaller,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One comma separated piece of an extent expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtentSegment<'a> {
    /// A single value, taken verbatim
    Value(&'a str),
    /// An interval to expand
    Interval {
        min: &'a str,
        max: &'a str,
        resolution: &'a str,
    },
}

impl<'a> ExtentSegment<'a> {
    /// Classify a segment by its number of `/` separated parts
    pub fn classify(segment: &'a str, policy: MalformedSegmentPolicy) -> Result<Self> {
        let parts: Vec<&str> = segment.split('/').collect();
        match *parts.as_slice() {
            [value] => Ok(Self::Value(value)),
            [min, max, resolution] => Ok(Self::Interval {
                min,
                max,
                resolution,
            }),
            _ => match policy {
                MalformedSegmentPolicy::Reject => {
                    Err(TimeDimensionError::malformed_segment(segment, parts.len()))
                }
                MalformedSegmentPolicy::Literal => Ok(Self::Value(segment)),
            },
        }
    }
}

/// Result of parsing an extent expression
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedExtent {
    /// Ascending, unique values
    pub time_range: Vec<String>,
    /// Finest interval resolution, absent when there were no intervals
    pub step: Option<IncrementMap>,
}

/// Extent expression parser
#[derive(Debug, Clone, Default)]
pub struct ExtentParser {
    config: TimeDimensionConfig,
}

impl ExtentParser {
    pub fn new(config: TimeDimensionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TimeDimensionConfig {
        &self.config
    }

    /// Parse an extent expression into its time range and step
    ///
    /// All whitespace is removed first, so values wrapped over several lines
    /// of a capabilities document parse the same as on one line. Empty
    /// segments, such as the one after a trailing comma, are skipped.
    pub fn parse(&self, expression: &str) -> Result<ParsedExtent> {
        self.config.validate()?;

        let compact: String = expression.chars().filter(|c| !c.is_whitespace()).collect();

        let mut pool = Vec::new();
        let mut step: Option<IncrementMap> = None;

        for segment in compact.split(',').filter(|segment| !segment.is_empty()) {
            match ExtentSegment::classify(segment, self.config.malformed_segment_policy)? {
                ExtentSegment::Value(value) => {
                    log::debug!("extent segment '{segment}' is a literal value");
                    pool.push(value.to_string());
                }
                ExtentSegment::Interval {
                    min,
                    max,
                    resolution,
                } => {
                    let increment = decode_resolution(resolution);
                    let values =
                        generate_bounded(min, max, &increment, self.config.max_range_values)?;
                    log::debug!(
                        "extent segment '{segment}' expanded to {} values",
                        values.len()
                    );
                    pool.extend(values);

                    let finer = match &step {
                        Some(kept) => is_smaller(kept, &increment),
                        None => true,
                    };
                    if finer {
                        log::debug!("keeping step {increment}");
                        step = Some(increment);
                    }
                }
            }
        }

        sort_pool(&mut pool, self.config.sort_order);
        pool.dedup();

        Ok(ParsedExtent {
            time_range: pool,
            step,
        })
    }
}

/// Parse an extent expression with the default configuration
pub fn parse_extent(expression: &str) -> Result<ParsedExtent> {
    ExtentParser::default().parse(expression)
}

/// Sort so that equal strings end up adjacent
fn sort_pool(pool: &mut [String], order: SortOrder) {
    let instants: Vec<Option<PrecisionDateTime>> = pool
        .iter()
        .map(|value| PrecisionDateTime::parse(value).ok())
        .collect();

    let chronological = match order {
        SortOrder::Chronological => true,
        SortOrder::Lexical => {
            // Lexical order only holds while every value shares one precision
            let mut precisions = instants.iter().map(|v| v.as_ref().map(|p| p.precision));
            let first = precisions.next().flatten();
            instants.iter().all(Option::is_some) && precisions.any(|p| p != first)
        }
    };

    if !chronological {
        pool.sort_unstable();
        return;
    }

    let mut keyed: Vec<(Option<DateTime<Utc>>, String)> = instants
        .into_iter()
        .map(|instant| instant.map(|p| p.datetime))
        .zip(pool.iter_mut().map(std::mem::take))
        .collect();
    keyed.sort_by(|(a, a_text), (b, b_text)| {
        // Unparseable values sort after every instant
        let by_instant = match (a, b) {
            (Some(a), Some(b)) => a.cmp(b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_instant.then_with(|| a_text.cmp(b_text))
    });
    for (slot, (_, value)) in pool.iter_mut().zip(keyed) {
        *slot = value;
    }
}
