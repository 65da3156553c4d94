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

//! Extent parsing benchmarks

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use wmst_time::parse_extent;

const EXTENTS: &[(&str, &str)] = &[
    ("value_list", "2020-01-01,2020-06-01,2020-12-01"),
    ("yearly_interval", "1900/2100/P1Y"),
    ("hourly_interval", "2022-01-01T00:00:00Z/2022-03-01T00:00:00Z/PT1H"),
    (
        "mixed_intervals",
        "2006/2018/P2Y,2019-01-01/2020-12-31/P1D,2021-01-01T00:00Z/2021-01-07T00:00Z/PT30M",
    ),
];

fn bench_parse_extent(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_extent");
    for (name, expression) in EXTENTS {
        group.bench_with_input(BenchmarkId::from_parameter(name), expression, |b, expr| {
            b.iter(|| parse_extent(black_box(expr)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse_extent);
criterion_main!(benches);
