// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Sampled median of the tracked counts.

use std::collections::HashMap;
use std::hash::Hash;

use crate::common::random::RandomSource;

/// Draws `min(sample_size, keys.len())` keys uniformly with replacement and returns the
/// median of their counts.
///
/// `keys` must be non-empty and every key in it must be present in `counts`.
pub(super) fn sample_median<K, R>(
    counts: &HashMap<K, i64>,
    keys: &[K],
    sample_size: usize,
    rng: &mut R,
) -> i64
where
    K: Eq + Hash,
    R: RandomSource + ?Sized,
{
    assert!(!keys.is_empty(), "cannot sample an empty key set");
    let limit = sample_size.min(keys.len());
    let mut samples = Vec::with_capacity(limit);
    for _ in 0..limit {
        let key = &keys[rng.next_index(keys.len())];
        samples.push(counts.get(key).copied().unwrap_or_default());
    }
    median_of(&mut samples)
}

/// Median of a non-empty slice, reordering it in place.
///
/// An even number of values yields the floor of the mean of the two middle values.
fn median_of(samples: &mut [i64]) -> i64 {
    let len = samples.len();
    let mid = len / 2;
    let (lower, upper, _) = samples.select_nth_unstable(mid);
    let upper = *upper;
    if len % 2 == 1 {
        return upper;
    }
    // the lower middle value is the largest element left of `mid`
    match lower.iter().copied().max() {
        Some(lower) => midpoint(lower, upper),
        None => upper,
    }
}

/// Floor of `(a + b) / 2` without overflow.
#[inline]
fn midpoint(a: i64, b: i64) -> i64 {
    (a & b) + ((a ^ b) >> 1)
}
