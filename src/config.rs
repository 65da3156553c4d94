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

//! Configuration for time dimension resolution

use crate::core::{Result, TimeDimensionError};
use serde::{Deserialize, Serialize};

/// Default cap on values generated from a single interval
pub const DEFAULT_MAX_RANGE_VALUES: usize = 100_000;

/// What to do with a segment that has neither one nor three `/` parts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedSegmentPolicy {
    /// Fail the parse with a malformed segment error
    #[default]
    Reject,
    /// Keep the raw segment text as a literal value
    Literal,
}

/// How the merged pool of values is ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Plain string order; instants are used only when precisions are mixed
    #[default]
    Lexical,
    /// Always order by parsed instant, ties broken by string order
    Chronological,
}

impl std::str::FromStr for SortOrder {
    type Err = TimeDimensionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "lexical" => Ok(SortOrder::Lexical),
            "chronological" => Ok(SortOrder::Chronological),
            _ => Err(TimeDimensionError::invalid_configuration(format!(
                "Invalid sort order: {s}"
            ))),
        }
    }
}

/// Time dimension resolution settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimeDimensionConfig {
    /// Policy for segments with two or more than three parts
    pub malformed_segment_policy: MalformedSegmentPolicy,
    /// Maximum number of values a single interval may expand to
    pub max_range_values: usize,
    /// Ordering of the final time range
    pub sort_order: SortOrder,
}

impl Default for TimeDimensionConfig {
    fn default() -> Self {
        Self {
            malformed_segment_policy: MalformedSegmentPolicy::Reject,
            max_range_values: DEFAULT_MAX_RANGE_VALUES,
            sort_order: SortOrder::Lexical,
        }
    }
}

impl TimeDimensionConfig {
    /// Parse configuration from a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check settings that deserialization and the builder cannot rule out
    pub fn validate(&self) -> Result<()> {
        if self.max_range_values == 0 {
            return Err(TimeDimensionError::invalid_configuration(
                "maxRangeValues must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Builder for time dimension configuration with fluent API
#[derive(Debug, Default)]
pub struct TimeDimensionConfigBuilder {
    config: TimeDimensionConfig,
}

impl TimeDimensionConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the malformed segment policy
    pub fn with_malformed_segment_policy(mut self, policy: MalformedSegmentPolicy) -> Self {
        self.config.malformed_segment_policy = policy;
        self
    }

    /// Set the per-interval value cap
    pub fn with_max_range_values(mut self, max: usize) -> Self {
        self.config.max_range_values = max;
        self
    }

    /// Set the sort order
    pub fn with_sort_order(mut self, order: SortOrder) -> Self {
        self.config.sort_order = order;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> TimeDimensionConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TimeDimensionConfig::default();
        assert_eq!(config.malformed_segment_policy, MalformedSegmentPolicy::Reject);
        assert_eq!(config.max_range_values, DEFAULT_MAX_RANGE_VALUES);
        assert_eq!(config.sort_order, SortOrder::Lexical);
    }

    #[test]
    fn test_config_builder() {
        let config = TimeDimensionConfigBuilder::new()
            .with_malformed_segment_policy(MalformedSegmentPolicy::Literal)
            .with_max_range_values(10)
            .with_sort_order(SortOrder::Chronological)
            .build();

        assert_eq!(config.malformed_segment_policy, MalformedSegmentPolicy::Literal);
        assert_eq!(config.max_range_values, 10);
        assert_eq!(config.sort_order, SortOrder::Chronological);
    }

    #[test]
    fn test_config_from_json() {
        let config =
            TimeDimensionConfig::from_json(r#"{"malformedSegmentPolicy": "literal"}"#).unwrap();
        assert_eq!(config.malformed_segment_policy, MalformedSegmentPolicy::Literal);
        assert_eq!(config.max_range_values, DEFAULT_MAX_RANGE_VALUES);

        assert!(TimeDimensionConfig::from_json(r#"{"maxRangeValues": 0}"#).is_err());
        assert!(TimeDimensionConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_zero_range_limit_is_invalid_from_any_source() {
        let built = TimeDimensionConfigBuilder::new()
            .with_max_range_values(0)
            .build();
        assert!(matches!(
            built.validate(),
            Err(TimeDimensionError::InvalidConfiguration { .. })
        ));
        assert_eq!(
            TimeDimensionConfig::from_json(r#"{"maxRangeValues": 0}"#),
            Err(built.validate().unwrap_err())
        );
        assert!(TimeDimensionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_sort_order_parsing() {
        assert_eq!("lexical".parse::<SortOrder>().unwrap(), SortOrder::Lexical);
        assert_eq!(
            "Chronological".parse::<SortOrder>().unwrap(),
            SortOrder::Chronological
        );
        assert!("random".parse::<SortOrder>().is_err());
    }
}
