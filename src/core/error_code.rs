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

//! Error code system in the style of the Rust compiler (E0001, E0002, etc.)
//!
//! Every fatal time dimension error carries a stable `WTxxxx` code so callers
//! can match on failures without parsing messages.

use std::fmt;

/// Error categories for organizing error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Capabilities declaration errors (WT0001-WT0002)
    Declaration,
    /// Extent expression and timestamp errors (WT0003-WT0007)
    Extent,
    /// Configuration errors (WT0008)
    Configuration,
}

/// Error code following Rust compiler pattern (WT0001, WT0002, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode {
    pub code: u16,
}

impl ErrorCode {
    /// Create a new error code
    pub const fn new(code: u16) -> Self {
        Self { code }
    }

    /// Get the full error code string (e.g., "WT0001")
    pub fn code_str(&self) -> String {
        format!("WT{:04}", self.code)
    }

    /// Get error information from the registry
    pub fn info(&self) -> &'static ErrorInfo {
        match self.code {
            1 => &WT0001_INFO,
            2 => &WT0002_INFO,
            3 => &WT0003_INFO,
            4 => &WT0004_INFO,
            5 => &WT0005_INFO,
            6 => &WT0006_INFO,
            7 => &WT0007_INFO,
            8 => &WT0008_INFO,
            _ => &UNKNOWN_ERROR_INFO,
        }
    }

    /// Get error category for this error code
    pub fn category(&self) -> ErrorCategory {
        match self.code {
            1..=2 => ErrorCategory::Declaration,
            3..=7 => ErrorCategory::Extent,
            _ => ErrorCategory::Configuration,
        }
    }

    /// Get human-readable description for this error code
    pub fn description(&self) -> &'static str {
        self.info().title
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WT{:04}", self.code)
    }
}

/// Error information with help text
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Error code number
    pub code: u16,
    /// Human-readable error title
    pub title: &'static str,
    /// Help information and suggested solutions
    pub help: &'static str,
}

impl ErrorInfo {
    pub const fn new(code: u16, title: &'static str, help: &'static str) -> Self {
        Self { code, title, help }
    }
}

pub const WT0001: ErrorCode = ErrorCode::new(1); // Missing time dimension or extent
pub const WT0002: ErrorCode = ErrorCode::new(2); // Unsupported dimension units
pub const WT0003: ErrorCode = ErrorCode::new(3); // Unrecognized timestamp precision
pub const WT0004: ErrorCode = ErrorCode::new(4); // Empty time range
pub const WT0005: ErrorCode = ErrorCode::new(5); // Malformed extent segment
pub const WT0006: ErrorCode = ErrorCode::new(6); // Zero increment
pub const WT0007: ErrorCode = ErrorCode::new(7); // Range too large
pub const WT0008: ErrorCode = ErrorCode::new(8); // Invalid configuration

static WT0001_INFO: ErrorInfo = ErrorInfo::new(
    1,
    "Missing time dimension",
    "Check that the layer's Dimension and Extent names match the capabilities document",
);

static WT0002_INFO: ErrorInfo = ErrorInfo::new(
    2,
    "Unsupported dimension units",
    "Only ISO8601 time dimensions can be resolved",
);

static WT0003_INFO: ErrorInfo = ErrorInfo::new(
    3,
    "Unrecognized timestamp precision",
    "Use YYYY, YYYY-MM, YYYY-MM-DD or YYYY-MM-DDTHH[:MM[:SS[.sss]]] with an optional Z",
);

static WT0004_INFO: ErrorInfo = ErrorInfo::new(
    4,
    "Empty time range",
    "The extent expression produced no values to choose a default from",
);

static WT0005_INFO: ErrorInfo = ErrorInfo::new(
    5,
    "Malformed extent segment",
    "Segments must be a single value or a min/max/resolution triple",
);

static WT0006_INFO: ErrorInfo = ErrorInfo::new(
    6,
    "Zero increment",
    "The interval resolution must advance by at least one unit",
);

static WT0007_INFO: ErrorInfo = ErrorInfo::new(
    7,
    "Time range too large",
    "Raise max_range_values or use a coarser resolution",
);

static WT0008_INFO: ErrorInfo = ErrorInfo::new(
    8,
    "Invalid configuration",
    "Check the layer time configuration",
);

static UNKNOWN_ERROR_INFO: ErrorInfo = ErrorInfo::new(0, "Unknown error", "");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_formatting() {
        assert_eq!(WT0003.to_string(), "WT0003");
        assert_eq!(WT0008.code_str(), "WT0008");
    }

    #[test]
    fn test_categories() {
        assert_eq!(WT0001.category(), ErrorCategory::Declaration);
        assert_eq!(WT0005.category(), ErrorCategory::Extent);
        assert_eq!(WT0008.category(), ErrorCategory::Configuration);
        assert_eq!(WT0004.description(), "Empty time range");
    }
}
