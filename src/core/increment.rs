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

//! Calendar increments decoded from ISO8601 resolution strings
//!
//! A resolution such as `P1DT12H` is decoded into a sparse [`IncrementMap`].
//! The letter `M` is ambiguous in ISO8601 durations: before the `T` it means
//! months, after it minutes. Tokens are therefore looked up in a different
//! table depending on which side of the first `T` they appear.

use chrono::{DateTime, Days, Months, TimeDelta, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// `<digits><letter>` token inside either half of a resolution
static INCREMENT_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)([A-Za-z])").expect("increment token pattern is valid")
});

/// Calendar units an increment can step by, in the order they are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarUnit {
    Years,
    Months,
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl CalendarUnit {
    /// Unit for a letter on the date side of a resolution
    fn from_date_letter(letter: &str) -> Option<Self> {
        match letter {
            "Y" => Some(Self::Years),
            "M" => Some(Self::Months),
            "D" => Some(Self::Days),
            _ => None,
        }
    }

    /// Unit for a letter on the time side of a resolution
    fn from_time_letter(letter: &str) -> Option<Self> {
        match letter {
            "H" => Some(Self::Hours),
            "M" => Some(Self::Minutes),
            "S" => Some(Self::Seconds),
            _ => None,
        }
    }
}

impl fmt::Display for CalendarUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Years => write!(f, "years"),
            Self::Months => write!(f, "months"),
            Self::Days => write!(f, "days"),
            Self::Hours => write!(f, "hours"),
            Self::Minutes => write!(f, "minutes"),
            Self::Seconds => write!(f, "seconds"),
        }
    }
}

/// Sparse mapping from calendar unit to count; absent units do not step
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IncrementMap(BTreeMap<CalendarUnit, u32>);

impl IncrementMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a resolution of the form `P<date-part>[T<time-part>]`
    ///
    /// Unknown letters are skipped, as are counts too large for a `u32`.
    /// A string with no recognizable token decodes to an empty map.
    /// Fractions are not supported: only the digits directly before a letter
    /// count, so `PT0.5H` decodes as five hours.
    pub fn decode(resolution: &str) -> Self {
        let (date_part, time_part) = match resolution.split_once('T') {
            Some((date, time)) => (date, Some(time)),
            None => (resolution, None),
        };

        let mut map = Self::new();
        map.scan(date_part, CalendarUnit::from_date_letter);
        if let Some(time_part) = time_part {
            map.scan(time_part, CalendarUnit::from_time_letter);
        }
        map
    }

    fn scan(&mut self, part: &str, unit_for: fn(&str) -> Option<CalendarUnit>) {
        for captures in INCREMENT_TOKEN.captures_iter(part) {
            let Some(unit) = unit_for(&captures[2]) else {
                continue;
            };
            if let Ok(count) = captures[1].parse::<u32>() {
                self.0.insert(unit, count);
            }
        }
    }

    /// Set the count for a unit
    pub fn with(mut self, unit: CalendarUnit, count: u32) -> Self {
        self.0.insert(unit, count);
        self
    }

    pub fn get(&self, unit: CalendarUnit) -> Option<u32> {
        self.0.get(&unit).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when stepping by this increment would never move an instant
    pub fn is_zero(&self) -> bool {
        self.0.values().all(|count| *count == 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CalendarUnit, u32)> + '_ {
        self.0.iter().map(|(unit, count)| (*unit, *count))
    }

    /// Advance an instant by each present unit, years first and seconds last
    ///
    /// Month and year steps clamp to the last day of the target month.
    /// Returns `None` when the result falls outside chrono's range.
    pub fn add_to(&self, datetime: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.iter().try_fold(datetime, |acc, (unit, count)| match unit {
            CalendarUnit::Years => acc.checked_add_months(Months::new(count.checked_mul(12)?)),
            CalendarUnit::Months => acc.checked_add_months(Months::new(count)),
            CalendarUnit::Days => acc.checked_add_days(Days::new(u64::from(count))),
            CalendarUnit::Hours => acc.checked_add_signed(TimeDelta::try_hours(i64::from(count))?),
            CalendarUnit::Minutes => {
                acc.checked_add_signed(TimeDelta::try_minutes(i64::from(count))?)
            }
            CalendarUnit::Seconds => {
                acc.checked_add_signed(TimeDelta::try_seconds(i64::from(count))?)
            }
        })
    }

    /// Fixed-width key used to rank granularities
    ///
    /// This is a textual approximation, not calendar-correct: it ranks by the
    /// largest unit first, so `P1M` always counts as coarser than `P30D` even
    /// though some months are shorter. Counts wider than their field shift
    /// the layout and compare accordingly.
    fn comparison_key(&self) -> String {
        let field = |unit| self.get(unit).unwrap_or(0);
        format!(
            "P{:04}Y{:02}M{:02}DT{:02}H{:02}M{:02}S",
            field(CalendarUnit::Years),
            field(CalendarUnit::Months),
            field(CalendarUnit::Days),
            field(CalendarUnit::Hours),
            field(CalendarUnit::Minutes),
            field(CalendarUnit::Seconds),
        )
    }

    /// Render as a canonical ISO8601 duration, e.g. `P1DT12H`
    pub fn to_iso8601(&self) -> String {
        let mut out = String::from("P");
        for (unit, letter) in [
            (CalendarUnit::Years, 'Y'),
            (CalendarUnit::Months, 'M'),
            (CalendarUnit::Days, 'D'),
        ] {
            if let Some(count) = self.get(unit) {
                out.push_str(&format!("{count}{letter}"));
            }
        }

        let time: String = [
            (CalendarUnit::Hours, 'H'),
            (CalendarUnit::Minutes, 'M'),
            (CalendarUnit::Seconds, 'S'),
        ]
        .into_iter()
        .filter_map(|(unit, letter)| self.get(unit).map(|count| format!("{count}{letter}")))
        .collect();
        if !time.is_empty() {
            out.push('T');
            out.push_str(&time);
        }

        if out.len() == 1 {
            out.push_str("T0S");
        }
        out
    }
}

impl fmt::Display for IncrementMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl FromIterator<(CalendarUnit, u32)> for IncrementMap {
    fn from_iter<I: IntoIterator<Item = (CalendarUnit, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Decode an ISO8601 resolution string into an increment map
pub fn decode_resolution(resolution: &str) -> IncrementMap {
    IncrementMap::decode(resolution)
}

/// Whether `candidate` is a strictly finer granularity than `current`
///
/// Equal granularities return `false`, so the first of two ties is kept.
pub fn is_smaller(current: &IncrementMap, candidate: &IncrementMap) -> bool {
    current.comparison_key() > candidate.comparison_key()
}
