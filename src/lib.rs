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

//! WMS-T time dimension extent parser and time range engine
//!
//! Turns the `<Dimension>`/`<Extent>` declarations of a WMS GetCapabilities
//! document into a normalized list of selectable time values, the finest
//! step between them, and the value a layer should initially show.
//!
//! ```
//! use wmst_time::{parse_extent, CalendarUnit};
//!
//! let parsed = parse_extent("2006/2018/P2Y,2020/2024/P1Y").unwrap();
//! assert_eq!(parsed.time_range.first().map(String::as_str), Some("2006"));
//! assert_eq!(parsed.step.unwrap().get(CalendarUnit::Years), Some(1));
//! ```

pub mod config;
pub mod core;
pub mod dimension;
pub mod extent;
pub mod resolver;

pub use config::{
    MalformedSegmentPolicy, SortOrder, TimeDimensionConfig, TimeDimensionConfigBuilder,
};
pub use crate::core::{
    CalendarUnit, ErrorCode, IncrementMap, PrecisionDateTime, Result, TemporalPrecision,
    TimeDimensionError, decode_resolution, detect_precision, is_smaller,
};
pub use dimension::{
    DimensionDeclaration, ExtentDeclaration, TimeDimensionCoordinator, TimeRangeResult,
    TimeSpecification,
};
pub use extent::{ExtentParser, ExtentSegment, ParsedExtent, generate_time_range, parse_extent};
pub use resolver::{
    Clock, DefaultResolver, DefaultSource, DefaultValue, FixedClock, ResolutionWarning,
    ResolvedDefault, SystemClock,
};
