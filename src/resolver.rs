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

//! Resolution of the initial time value of a WMS-T layer
//!
//! The configured default wins when it is one of the advertised values. The
//! `current` keyword, from either the configuration or the capabilities,
//! selects the first value at or after the present instant. Otherwise the
//! advertised default, then the first value, is used.

use crate::core::{PrecisionDateTime, Result, TimeDimensionError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Keyword selecting the value closest to now
pub const CURRENT_KEYWORD: &str = "current";

/// Source of the present instant
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

impl<F> Clock for F
where
    F: Fn() -> DateTime<Utc> + Send + Sync,
{
    fn now(&self) -> DateTime<Utc> {
        self()
    }
}

/// A default time value, either literal or the `current` keyword
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DefaultValue {
    Current,
    Value(String),
}

impl DefaultValue {
    pub fn is_current(&self) -> bool {
        matches!(self, Self::Current)
    }

    pub fn as_value(&self) -> Option<&str> {
        match self {
            Self::Current => None,
            Self::Value(value) => Some(value),
        }
    }
}

impl From<String> for DefaultValue {
    fn from(value: String) -> Self {
        if value == CURRENT_KEYWORD {
            Self::Current
        } else {
            Self::Value(value)
        }
    }
}

impl From<&str> for DefaultValue {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<DefaultValue> for String {
    fn from(value: DefaultValue) -> Self {
        match value {
            DefaultValue::Current => CURRENT_KEYWORD.to_string(),
            DefaultValue::Value(value) => value,
        }
    }
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Current => f.write_str(CURRENT_KEYWORD),
            Self::Value(value) => f.write_str(value),
        }
    }
}

/// Which rule produced the resolved default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DefaultSource {
    /// The configured default, found in the range
    Configured,
    /// The `current` keyword
    Current,
    /// The default advertised by the service
    ExtentDefault,
    /// The first value of the range
    FirstValue,
}

/// Recoverable problems met while resolving a default
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionWarning {
    /// The configured default is not one of the advertised values
    ConfiguredDefaultOutOfRange { value: String },
}

impl fmt::Display for ResolutionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfiguredDefaultOutOfRange { value } => {
                write!(f, "configured default '{value}' is not within the computed time range")
            }
        }
    }
}

/// Resolved default with the rule that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDefault {
    pub value: String,
    pub source: DefaultSource,
    pub warnings: Vec<ResolutionWarning>,
}

/// Picks the initial value of a time range
#[derive(Clone)]
pub struct DefaultResolver {
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for DefaultResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultResolver").finish_non_exhaustive()
    }
}

impl Default for DefaultResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultResolver {
    /// Resolver reading the wall clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Resolve the default value of `time_range`
    pub fn resolve(
        &self,
        time_range: &[String],
        extent_default: Option<&DefaultValue>,
        configured_default: Option<&DefaultValue>,
    ) -> Result<String> {
        self.resolve_detailed(time_range, extent_default, configured_default)
            .map(|resolved| resolved.value)
    }

    /// Resolve the default value, reporting its source and any warnings
    pub fn resolve_detailed(
        &self,
        time_range: &[String],
        extent_default: Option<&DefaultValue>,
        configured_default: Option<&DefaultValue>,
    ) -> Result<ResolvedDefault> {
        let mut warnings = Vec::new();

        if let Some(configured) = configured_default.and_then(DefaultValue::as_value) {
            if time_range.iter().any(|value| value == configured) {
                return Ok(resolved(configured, DefaultSource::Configured, warnings));
            }
            let warning = ResolutionWarning::ConfiguredDefaultOutOfRange {
                value: configured.to_string(),
            };
            log::warn!("{warning}, falling back");
            warnings.push(warning);
        }

        let (Some(first), Some(last)) = (time_range.first(), time_range.last()) else {
            return Err(TimeDimensionError::EmptyRange);
        };

        let wants_current = configured_default.is_some_and(DefaultValue::is_current)
            || extent_default.is_some_and(DefaultValue::is_current);
        if wants_current {
            let now = self.clock.now();
            for value in time_range {
                if PrecisionDateTime::parse(value)?.datetime >= now {
                    return Ok(resolved(value, DefaultSource::Current, warnings));
                }
            }
            log::debug!("every time value precedes {now}, using the last one");
            return Ok(resolved(last, DefaultSource::Current, warnings));
        }

        match extent_default.and_then(DefaultValue::as_value) {
            Some(advertised) => Ok(resolved(advertised, DefaultSource::ExtentDefault, warnings)),
            None => Ok(resolved(first, DefaultSource::FirstValue, warnings)),
        }
    }
}

fn resolved(
    value: &str,
    source: DefaultSource,
    warnings: Vec<ResolutionWarning>,
) -> ResolvedDefault {
    log::debug!("resolved default time '{value}' from {source:?}");
    ResolvedDefault {
        value: value.to_string(),
        source,
        warnings,
    }
}
