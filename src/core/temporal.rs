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

//! Precision-aware ISO8601 timestamps for WMS-T extents
//!
//! Extent values come in seven canonical precisions, from a bare year up to
//! milliseconds. Detection is strict: a value matches a precision only when
//! every character lines up with that precision's layout and the fields form
//! a real calendar instant. A trailing `Z` is accepted and remembered, but it
//! is not part of the precision.

use super::{Result, TimeDimensionError};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// UTC designator accepted at the end of a timestamp
const UTC_DESIGNATOR: char = 'Z';

/// Precision levels for temporal values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum TemporalPrecision {
    /// Year precision (YYYY)
    Year,
    /// Month precision (YYYY-MM)
    Month,
    /// Day precision (YYYY-MM-DD)
    Day,
    /// Hour precision (YYYY-MM-DDTHH)
    Hour,
    /// Minute precision (YYYY-MM-DDTHH:MM)
    Minute,
    /// Second precision (YYYY-MM-DDTHH:MM:SS)
    Second,
    /// Millisecond precision (YYYY-MM-DDTHH:MM:SS.sss)
    Millisecond,
}

impl TemporalPrecision {
    /// All precisions in detection order
    pub const ALL: [Self; 7] = [
        Self::Year,
        Self::Month,
        Self::Day,
        Self::Hour,
        Self::Minute,
        Self::Second,
        Self::Millisecond,
    ];

    /// chrono format string producing this precision
    pub fn format_str(&self) -> &'static str {
        match self {
            Self::Year => "%Y",
            Self::Month => "%Y-%m",
            Self::Day => "%Y-%m-%d",
            Self::Hour => "%Y-%m-%dT%H",
            Self::Minute => "%Y-%m-%dT%H:%M",
            Self::Second => "%Y-%m-%dT%H:%M:%S",
            Self::Millisecond => "%Y-%m-%dT%H:%M:%S%.3f",
        }
    }

    /// Character layout, `d` standing for a single ASCII digit
    fn layout(&self) -> &'static str {
        const FULL: &str = "dddd-dd-ddTdd:dd:dd.ddd";
        let len = match self {
            Self::Year => 4,
            Self::Month => 7,
            Self::Day => 10,
            Self::Hour => 13,
            Self::Minute => 16,
            Self::Second => 19,
            Self::Millisecond => 23,
        };
        &FULL[..len]
    }

    /// Detect the precision of a timestamp, ignoring a trailing `Z`
    pub fn detect(timestamp: &str) -> Result<Self> {
        let bare = strip_utc_designator(timestamp).0;
        Self::ALL
            .into_iter()
            .find(|precision| precision.parse_naive(bare).is_some())
            .ok_or_else(|| TimeDimensionError::precision(timestamp))
    }

    /// Strictly parse a timestamp without `Z` at exactly this precision
    fn parse_naive(&self, s: &str) -> Option<NaiveDateTime> {
        let layout = self.layout();
        if s.len() != layout.len() {
            return None;
        }
        let shape_ok = s.bytes().zip(layout.bytes()).all(|(c, l)| match l {
            b'd' => c.is_ascii_digit(),
            _ => c == l,
        });
        if !shape_ok {
            return None;
        }

        // Layout is all ASCII, so byte slicing is safe from here on
        let field = |start: usize, end: usize| -> u32 {
            s.get(start..end)
                .and_then(|digits| digits.parse().ok())
                .unwrap_or(0)
        };
        let year = field(0, 4) as i32;
        let month = if *self >= Self::Month { field(5, 7) } else { 1 };
        let day = if *self >= Self::Day { field(8, 10) } else { 1 };
        let hour = if *self >= Self::Hour { field(11, 13) } else { 0 };
        let minute = if *self >= Self::Minute { field(14, 16) } else { 0 };
        let second = if *self >= Self::Second { field(17, 19) } else { 0 };
        let milli = if *self >= Self::Millisecond { field(20, 23) } else { 0 };

        NaiveDate::from_ymd_opt(year, month, day)?.and_hms_milli_opt(hour, minute, second, milli)
    }
}

impl fmt::Display for TemporalPrecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Year => write!(f, "year"),
            Self::Month => write!(f, "month"),
            Self::Day => write!(f, "day"),
            Self::Hour => write!(f, "hour"),
            Self::Minute => write!(f, "minute"),
            Self::Second => write!(f, "second"),
            Self::Millisecond => write!(f, "millisecond"),
        }
    }
}

/// Split off a trailing `Z`, reporting whether it was present
fn strip_utc_designator(s: &str) -> (&str, bool) {
    match s.strip_suffix(UTC_DESIGNATOR) {
        Some(bare) => (bare, true),
        None => (s, false),
    }
}

/// Detect which canonical precision a timestamp is written in
pub fn detect_precision(timestamp: &str) -> Result<TemporalPrecision> {
    TemporalPrecision::detect(timestamp)
}

/// A UTC instant remembering the precision and `Z` suffix it was written with
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrecisionDateTime {
    /// The instant, always interpreted as UTC
    pub datetime: DateTime<Utc>,
    /// The precision used when formatting
    pub precision: TemporalPrecision,
    /// Whether the value carries a trailing `Z`
    pub utc_designator: bool,
}

impl PrecisionDateTime {
    pub fn new(
        datetime: DateTime<Utc>,
        precision: TemporalPrecision,
        utc_designator: bool,
    ) -> Self {
        Self {
            datetime,
            precision,
            utc_designator,
        }
    }

    /// Parse a timestamp at whichever precision it matches first
    pub fn parse(s: &str) -> Result<Self> {
        let (bare, utc_designator) = strip_utc_designator(s);
        TemporalPrecision::ALL
            .into_iter()
            .find_map(|precision| {
                precision
                    .parse_naive(bare)
                    .map(|naive| Self::new(naive.and_utc(), precision, utc_designator))
            })
            .ok_or_else(|| TimeDimensionError::precision(s))
    }

    /// Same precision and suffix, different instant
    pub fn with_datetime(&self, datetime: DateTime<Utc>) -> Self {
        Self::new(datetime, self.precision, self.utc_designator)
    }
}

impl fmt::Display for PrecisionDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.datetime.format(self.precision.format_str()))?;
        if self.utc_designator {
            write!(f, "{UTC_DESIGNATOR}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_detect_each_precision() {
        let cases = [
            ("2022", TemporalPrecision::Year),
            ("2022-11", TemporalPrecision::Month),
            ("2022-11-30", TemporalPrecision::Day),
            ("2022-11-30T23", TemporalPrecision::Hour),
            ("2022-11-30T23:59", TemporalPrecision::Minute),
            ("2022-11-30T23:59:59", TemporalPrecision::Second),
            ("2022-11-30T23:59:59.111", TemporalPrecision::Millisecond),
        ];
        for (input, expected) in cases {
            assert_eq!(detect_precision(input).unwrap(), expected, "{input}");
        }
    }

    #[test]
    fn test_detect_ignores_utc_designator() {
        assert_eq!(
            detect_precision("2022-11-30T23:59:59Z").unwrap(),
            TemporalPrecision::Second
        );
        assert_eq!(detect_precision("2022Z").unwrap(), TemporalPrecision::Year);
    }

    #[test]
    fn test_detect_is_strict() {
        for input in [
            "not a date",
            "",
            "Z",
            "22",
            "20221",
            "2022-1",
            "2022-13",
            "2022-02-30",
            "2022-11-30T24",
            "2022-11-30 23:59",
            "2022-11-30T23:59:60",
            "2022-11-30T23:59:59.1",
            "2022-11-30T23:59:59.1111",
            "+2022",
            "2022-11-30T23:59:59ZZ",
        ] {
            assert!(
                matches!(
                    detect_precision(input),
                    Err(TimeDimensionError::Precision { .. })
                ),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_and_display() {
        let value = PrecisionDateTime::parse("2020-02-29T12:30Z").unwrap();
        assert_eq!(value.precision, TemporalPrecision::Minute);
        assert!(value.utc_designator);
        assert_eq!(
            value.datetime,
            Utc.with_ymd_and_hms(2020, 2, 29, 12, 30, 0).unwrap()
        );
        assert_eq!(value.to_string(), "2020-02-29T12:30Z");

        let year = PrecisionDateTime::parse("2006").unwrap();
        assert_eq!(year.datetime, Utc.with_ymd_and_hms(2006, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(year.to_string(), "2006");
    }

    #[test]
    fn test_display_round_trips_precision() {
        for input in [
            "2006",
            "2006-07",
            "2006-07-08",
            "2006-07-08T09",
            "2006-07-08T09:10",
            "2006-07-08T09:10:11Z",
            "2006-07-08T09:10:11.012",
        ] {
            let parsed = PrecisionDateTime::parse(input).unwrap();
            assert_eq!(parsed.to_string(), input);
            assert_eq!(detect_precision(&parsed.to_string()).unwrap(), parsed.precision);
        }
    }
}
