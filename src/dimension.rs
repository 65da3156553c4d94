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

//! WMS-T time dimension resolution
//!
//! [`TimeDimensionCoordinator`] is the entry point used while processing a
//! GetCapabilities document. It validates the `<Dimension>` and `<Extent>`
//! declarations of a layer, expands the extent expression and picks the
//! initial time value.

use crate::config::TimeDimensionConfig;
use crate::core::{IncrementMap, Result, TimeDimensionError};
use crate::extent::ExtentParser;
use crate::resolver::{Clock, DefaultResolver, DefaultValue};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The only dimension units a time dimension may declare
pub const ISO8601_UNITS: &str = "ISO8601";

/// A `<Dimension>` element from the capabilities document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionDeclaration {
    pub name: String,
    pub units: String,
    #[serde(default)]
    pub value: String,
}

impl DimensionDeclaration {
    pub fn new(name: impl Into<String>, units: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            units: units.into(),
            value: String::new(),
        }
    }
}

/// An `<Extent>` element from the capabilities document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtentDeclaration {
    pub name: String,
    /// Comma/slash delimited extent expression
    pub value: String,
    #[serde(default)]
    pub default: Option<String>,
}

impl ExtentDeclaration {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            default: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// Time settings of a layer as written in its configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSpecification {
    pub dimension_name: String,
    pub extent_name: String,
    #[serde(default)]
    pub default: Option<DefaultValue>,
}

impl TimeSpecification {
    pub fn new(dimension_name: impl Into<String>, extent_name: impl Into<String>) -> Self {
        Self {
            dimension_name: dimension_name.into(),
            extent_name: extent_name.into(),
            default: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<DefaultValue>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// Resolved time dimension of a layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRangeResult {
    /// Ascending, unique selectable values
    pub time_range: Vec<String>,
    /// Finest interval step, absent for pure value lists
    pub step: Option<IncrementMap>,
    /// Initial value for the TIME parameter and the time control
    pub default_value: String,
}

/// Validates declarations and assembles a [`TimeRangeResult`]
#[derive(Debug, Clone, Default)]
pub struct TimeDimensionCoordinator {
    parser: ExtentParser,
    resolver: DefaultResolver,
}

impl TimeDimensionCoordinator {
    /// Coordinator with the given configuration and the wall clock
    pub fn new(config: TimeDimensionConfig) -> Self {
        Self {
            parser: ExtentParser::new(config),
            resolver: DefaultResolver::new(),
        }
    }

    /// Replace the clock used by the `current` default policy
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.resolver = DefaultResolver::with_clock(clock);
        self
    }

    pub fn config(&self) -> &TimeDimensionConfig {
        self.parser.config()
    }

    /// Resolve a layer's time dimension from its declarations
    pub fn resolve_time_dimension(
        &self,
        dimension: Option<&DimensionDeclaration>,
        extent: Option<&ExtentDeclaration>,
        spec: &TimeSpecification,
    ) -> Result<TimeRangeResult> {
        let missing = |what: &'static str| {
            TimeDimensionError::missing_time_data(&spec.dimension_name, &spec.extent_name, what)
        };
        let dimension = dimension.ok_or_else(|| missing("dimension"))?;
        let extent = extent.ok_or_else(|| missing("extent"))?;

        if dimension.units != ISO8601_UNITS {
            return Err(TimeDimensionError::unsupported_units(&dimension.units));
        }

        let parsed = self.parser.parse(&extent.value)?;
        let extent_default = extent.default.clone().map(DefaultValue::from);
        let default_value = self.resolver.resolve(
            &parsed.time_range,
            extent_default.as_ref(),
            spec.default.as_ref(),
        )?;

        Ok(TimeRangeResult {
            time_range: parsed.time_range,
            step: parsed.step,
            default_value,
        })
    }

    /// Pick the dimension and extent named by `spec`, then resolve them
    pub fn resolve_from_declarations(
        &self,
        dimensions: &[DimensionDeclaration],
        extents: &[ExtentDeclaration],
        spec: &TimeSpecification,
    ) -> Result<TimeRangeResult> {
        let dimension = dimensions.iter().find(|d| d.name == spec.dimension_name);
        let extent = extents.iter().find(|e| e.name == spec.extent_name);
        self.resolve_time_dimension(dimension, extent, spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::FixedClock;
    use chrono::{TimeZone, Utc};

    fn coordinator() -> TimeDimensionCoordinator {
        let now = Utc.with_ymd_and_hms(2015, 1, 1, 0, 0, 0).unwrap();
        TimeDimensionCoordinator::default().with_clock(Arc::new(FixedClock(now)))
    }

    #[test]
    fn test_resolves_interval_extent() {
        let result = coordinator()
            .resolve_time_dimension(
                Some(&DimensionDeclaration::new("time", "ISO8601")),
                Some(&ExtentDeclaration::new("time", "2006/2018/P2Y").with_default("2010")),
                &TimeSpecification::new("time", "time"),
            )
            .unwrap();

        assert_eq!(result.time_range.len(), 7);
        assert_eq!(result.step, Some(IncrementMap::decode("P2Y")));
        assert_eq!(result.default_value, "2010");
    }

    #[test]
    fn test_missing_declarations() {
        let spec = TimeSpecification::new("time", "time");
        let dimension = DimensionDeclaration::new("time", "ISO8601");

        let err = coordinator()
            .resolve_time_dimension(None, None, &spec)
            .unwrap_err();
        assert!(matches!(
            err,
            TimeDimensionError::MissingTimeData {
                missing: "dimension",
                ..
            }
        ));

        let err = coordinator()
            .resolve_time_dimension(Some(&dimension), None, &spec)
            .unwrap_err();
        assert!(matches!(
            err,
            TimeDimensionError::MissingTimeData {
                missing: "extent",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_non_iso8601_units() {
        let err = coordinator()
            .resolve_time_dimension(
                Some(&DimensionDeclaration::new("time", "hours")),
                Some(&ExtentDeclaration::new("time", "1,2,3")),
                &TimeSpecification::new("time", "time"),
            )
            .unwrap_err();
        assert_eq!(err, TimeDimensionError::unsupported_units("hours"));
    }

    #[test]
    fn test_resolve_from_declarations_matches_names() {
        let dimensions = vec![
            DimensionDeclaration::new("elevation", "m"),
            DimensionDeclaration::new("time", "ISO8601"),
        ];
        let extents = vec![
            ExtentDeclaration::new("elevation", "0,100"),
            ExtentDeclaration::new("time", "2020-01-01,2020-06-01"),
        ];
        let spec = TimeSpecification::new("time", "time").with_default("2020-06-01");

        let result = coordinator()
            .resolve_from_declarations(&dimensions, &extents, &spec)
            .unwrap();
        assert_eq!(result.time_range, vec!["2020-01-01", "2020-06-01"]);
        assert_eq!(result.step, None);
        assert_eq!(result.default_value, "2020-06-01");

        let err = coordinator()
            .resolve_from_declarations(
                &dimensions,
                &extents,
                &TimeSpecification::new("TIME", "time"),
            )
            .unwrap_err();
        assert_eq!(err.error_code(), crate::core::WT0001);
    }

    #[test]
    fn test_specification_from_layer_config() {
        let spec: TimeSpecification = serde_json::from_str(
            r#"{"dimensionName": "time", "extentName": "time", "default": "current"}"#,
        )
        .unwrap();
        assert_eq!(spec.default, Some(DefaultValue::Current));

        let spec: TimeSpecification =
            serde_json::from_str(r#"{"dimensionName": "time", "extentName": "time"}"#).unwrap();
        assert_eq!(spec.default, None);
    }
}
