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

//! Core error types with error codes

use thiserror::Error;

pub use super::error_code::*;

/// Errors raised while resolving a WMS-T time dimension
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeDimensionError {
    /// The capabilities document does not declare the configured dimension or extent
    #[error(
        "{code}: no {missing} for time dimension '{dimension_name}' (extent '{extent_name}')",
        code = WT0001
    )]
    MissingTimeData {
        dimension_name: String,
        extent_name: String,
        missing: &'static str,
    },

    /// Dimension units other than ISO8601
    #[error("{code}: unsupported time dimension units '{units}', expected ISO8601", code = WT0002)]
    UnsupportedUnits { units: String },

    /// Timestamp matching none of the recognized precisions
    #[error("{code}: '{value}' does not match any ISO8601 precision", code = WT0003)]
    Precision { value: String },

    /// No values to resolve a default from
    #[error("{code}: time range is empty", code = WT0004)]
    EmptyRange,

    /// Extent segment that is neither a value nor a min/max/resolution triple
    #[error("{code}: malformed extent segment '{segment}' ({parts} parts)", code = WT0005)]
    MalformedSegment { segment: String, parts: usize },

    /// Interval whose resolution never advances the cursor
    #[error("{code}: resolution '{resolution}' has no non-zero increment", code = WT0006)]
    DegenerateIncrement { resolution: String },

    /// Interval expanding to more values than allowed
    #[error("{code}: interval {min}/{max} exceeds {limit} values", code = WT0007)]
    RangeLimitExceeded {
        min: String,
        max: String,
        limit: usize,
    },

    /// Invalid configuration input
    #[error("{code}: {message}", code = WT0008)]
    InvalidConfiguration { message: String },
}

impl TimeDimensionError {
    /// Create a missing time data error
    pub fn missing_time_data(
        dimension_name: impl Into<String>,
        extent_name: impl Into<String>,
        missing: &'static str,
    ) -> Self {
        Self::MissingTimeData {
            dimension_name: dimension_name.into(),
            extent_name: extent_name.into(),
            missing,
        }
    }

    /// Create an unsupported units error
    pub fn unsupported_units(units: impl Into<String>) -> Self {
        Self::UnsupportedUnits {
            units: units.into(),
        }
    }

    /// Create a precision error
    pub fn precision(value: impl Into<String>) -> Self {
        Self::Precision {
            value: value.into(),
        }
    }

    /// Create a malformed segment error
    pub fn malformed_segment(segment: impl Into<String>, parts: usize) -> Self {
        Self::MalformedSegment {
            segment: segment.into(),
            parts,
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::MissingTimeData { .. } => WT0001,
            Self::UnsupportedUnits { .. } => WT0002,
            Self::Precision { .. } => WT0003,
            Self::EmptyRange => WT0004,
            Self::MalformedSegment { .. } => WT0005,
            Self::DegenerateIncrement { .. } => WT0006,
            Self::RangeLimitExceeded { .. } => WT0007,
            Self::InvalidConfiguration { .. } => WT0008,
        }
    }

    /// Get error information with help text
    pub fn error_info(&self) -> &'static ErrorInfo {
        self.error_code().info()
    }
}

impl From<serde_json::Error> for TimeDimensionError {
    fn from(err: serde_json::Error) -> Self {
        Self::invalid_configuration(err.to_string())
    }
}

/// Result type for time dimension operations
pub type Result<T> = std::result::Result<T, TimeDimensionError>;
