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

//! Expansion of `min/max/resolution` intervals into discrete timestamps

use crate::config::DEFAULT_MAX_RANGE_VALUES;
use crate::core::{IncrementMap, PrecisionDateTime, Result, TimeDimensionError};

/// Expand an interval into ascending timestamps formatted like `min`
///
/// Values start at `min` and advance by `increment` until they pass `max`;
/// `max` itself is included when it is hit exactly. Every value is written
/// at the precision of `min` and carries its `Z` suffix, if any. An empty
/// range is returned when `min` is later than `max`.
pub fn generate_time_range(min: &str, max: &str, increment: &IncrementMap) -> Result<Vec<String>> {
    generate_bounded(min, max, increment, DEFAULT_MAX_RANGE_VALUES)
}

/// Same as [`generate_time_range`] but failing once `limit` values are exceeded
pub fn generate_bounded(
    min: &str,
    max: &str,
    increment: &IncrementMap,
    limit: usize,
) -> Result<Vec<String>> {
    let start = PrecisionDateTime::parse(min)?;
    let end = PrecisionDateTime::parse(max)?.datetime;

    if increment.is_zero() {
        return Err(TimeDimensionError::DegenerateIncrement {
            resolution: increment.to_iso8601(),
        });
    }

    let mut values = Vec::new();
    let mut cursor = start.datetime;
    while cursor <= end {
        if values.len() >= limit {
            return Err(TimeDimensionError::RangeLimitExceeded {
                min: min.to_string(),
                max: max.to_string(),
                limit,
            });
        }
        values.push(start.with_datetime(cursor).to_string());

        match increment.add_to(cursor) {
            Some(next) => cursor = next,
            // Stepped past the representable calendar
            None => break,
        }
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CalendarUnit, decode_resolution};

    #[test]
    fn test_yearly_range_is_inclusive() {
        let values = generate_time_range("2006", "2018", &decode_resolution("P2Y")).unwrap();
        assert_eq!(
            values,
            vec!["2006", "2008", "2010", "2012", "2014", "2016", "2018"]
        );
    }

    #[test]
    fn test_range_stops_before_overshooting_max() {
        let values = generate_time_range("2006", "2011", &decode_resolution("P2Y")).unwrap();
        assert_eq!(values, vec!["2006", "2008", "2010"]);
    }

    #[test]
    fn test_range_keeps_min_precision_and_suffix() {
        let values = generate_time_range(
            "2020-01-01T00:00Z",
            "2020-01-01T01:00:00Z",
            &decode_resolution("PT30M"),
        )
        .unwrap();
        assert_eq!(
            values,
            vec!["2020-01-01T00:00Z", "2020-01-01T00:30Z", "2020-01-01T01:00Z"]
        );
    }

    #[test]
    fn test_monthly_range_clamps_to_month_end() {
        let values =
            generate_time_range("2021-01-31", "2021-04-30", &decode_resolution("P1M")).unwrap();
        assert_eq!(
            values,
            vec!["2021-01-31", "2021-02-28", "2021-03-28", "2021-04-28"]
        );
    }

    #[test]
    fn test_single_value_and_reversed_bounds() {
        let step = IncrementMap::new().with(CalendarUnit::Days, 1);
        assert_eq!(
            generate_time_range("2020-05-05", "2020-05-05", &step).unwrap(),
            vec!["2020-05-05"]
        );
        assert!(generate_time_range("2020-05-06", "2020-05-05", &step)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_invalid_bounds_and_increments() {
        let step = decode_resolution("P1D");
        assert!(matches!(
            generate_time_range("yesterday", "2020-05-05", &step),
            Err(TimeDimensionError::Precision { .. })
        ));
        assert!(matches!(
            generate_time_range("2020-05-05", "tomorrow", &step),
            Err(TimeDimensionError::Precision { .. })
        ));
        assert!(matches!(
            generate_time_range("2020", "2021", &decode_resolution("P0D")),
            Err(TimeDimensionError::DegenerateIncrement { .. })
        ));
        assert!(matches!(
            generate_time_range("2020", "2021", &IncrementMap::new()),
            Err(TimeDimensionError::DegenerateIncrement { .. })
        ));
    }

    #[test]
    fn test_limit() {
        let step = decode_resolution("P1D");
        assert_eq!(
            generate_bounded("2020-01-01", "2020-01-03", &step, 3).unwrap().len(),
            3
        );
        assert!(matches!(
            generate_bounded("2020-01-01", "2020-01-04", &step, 3),
            Err(TimeDimensionError::RangeLimitExceeded { limit: 3, .. })
        ));
    }
}
