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

use std::collections::HashMap;

use googletest::assert_that;
use googletest::prelude::ge;
use googletest::prelude::le;
use mgsmed::common::random::RandomSource;
use mgsmed::common::random::XorShift64;
use mgsmed::topk::Stream;

/// Zipf-like stream: low keys are much more frequent than high keys.
fn skewed_stream(seed: u64, len: usize) -> Vec<(u32, i64)> {
    let mut rng = XorShift64::seeded(seed);
    (0..len)
        .map(|_| {
            let a = rng.next_index(1000) + 1;
            let b = rng.next_index(a) + 1;
            let key = (rng.next_index(b) as u32) % 400;
            let delta = 1 + rng.next_index(3) as i64;
            (key, delta)
        })
        .collect()
}

fn truth(events: &[(u32, i64)]) -> HashMap<u32, i64> {
    let mut totals = HashMap::new();
    for &(key, delta) in events {
        *totals.entry(key).or_insert(0) += delta;
    }
    totals
}

#[test]
fn test_estimates_are_bounded_by_truth() {
    for seed in [1u64, 2, 3, 42] {
        let events = skewed_stream(seed, 20_000);
        let totals = truth(&events);
        let mut stream = Stream::with_random(32, XorShift64::seeded(seed)).unwrap();
        for &(key, delta) in &events {
            stream.update(key, delta);
        }

        assert!(stream.num_decays() > 0);
        for (key, &total) in &totals {
            let estimate = stream.estimate(key);
            assert_that!(estimate, ge(0i64));
            assert_that!(estimate, le(total));
            if stream.contains(key) {
                assert_that!(stream.upper_bound(key), ge(total));
            }
        }
        for element in stream.keys() {
            assert_that!(element.count(), le(totals[element.key()]));
            assert_that!(element.upper_bound(), ge(totals[element.key()]));
        }
    }
}

#[test]
fn test_untracked_keys_estimate_zero() {
    let mut stream = Stream::<String>::new(4).unwrap();
    assert_eq!(stream.estimate("missing"), 0);
    assert_eq!(stream.upper_bound("missing"), 0);

    stream.update("present".to_string(), 3);
    assert_eq!(stream.estimate("present"), 3);
    assert_eq!(stream.estimate("missing"), 0);
}

#[test]
fn test_heavy_hitter_survives_singletons() {
    let capacity = 16;
    for seed in [7u64, 11, 13] {
        let mut stream = Stream::with_random(capacity, XorShift64::seeded(seed)).unwrap();
        for i in 0..capacity * 10 {
            stream.update("heavy".to_string(), 10);
            stream.update(format!("singleton-{i}"), 1);
        }

        assert!(stream.contains("heavy"));
        assert_that!(stream.estimate("heavy"), ge(1i64));
        assert_eq!(*stream.top_k(1)[0].key(), "heavy");
    }
}

#[test]
fn test_keys_is_repeatable() {
    let mut stream = Stream::with_random(8, XorShift64::seeded(5)).unwrap();
    for (key, delta) in skewed_stream(5, 2_000) {
        stream.update(key, delta);
    }

    let first = stream.keys();
    let second = stream.keys();
    assert_eq!(first, second);
    assert!(first.len() <= 8);
}

#[test]
fn test_keys_order_by_count_then_key() {
    let mut stream = Stream::new(8).unwrap();
    for (key, delta) in [("m", 2), ("b", 5), ("z", 2), ("a", 2), ("q", 5), ("c", 1)] {
        stream.update(key, delta);
    }

    let ranked: Vec<(&str, i64)> = stream
        .keys()
        .into_iter()
        .map(|e| (*e.key(), e.count()))
        .collect();
    assert_eq!(
        ranked,
        vec![("b", 5), ("q", 5), ("a", 2), ("m", 2), ("z", 2), ("c", 1)]
    );

    for pair in stream.keys().windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(a.count() > b.count() || (a.count() == b.count() && a.key() < b.key()));
    }
}

#[test]
fn test_keys_returns_a_snapshot() {
    let mut stream = Stream::new(4).unwrap();
    stream.update("a", 3);
    stream.update("b", 1);

    let mut snapshot = stream.keys();
    snapshot.clear();
    stream.update("a", 1);

    assert_eq!(stream.keys().len(), 2);
    assert_eq!(stream.estimate("a"), 4);
}

#[test]
fn test_top_k_truncates_ranking() {
    let mut stream = Stream::new(8).unwrap();
    for (key, delta) in [("a", 1), ("b", 4), ("c", 3), ("d", 2)] {
        stream.update(key, delta);
    }

    let top: Vec<&str> = stream.top_k(2).into_iter().map(|e| e.into_key()).collect();
    assert_eq!(top, vec!["b", "c"]);
    assert_eq!(stream.top_k(10).len(), 4);
    assert!(stream.top_k(0).is_empty());
}

#[test]
fn test_seeded_streams_agree() {
    let events = skewed_stream(77, 5_000);
    let mut a = Stream::with_random(16, XorShift64::seeded(3)).unwrap();
    let mut b = Stream::with_random(16, XorShift64::seeded(3)).unwrap();
    for &(key, delta) in &events {
        a.update(key, delta);
        b.update(key, delta);
    }

    assert_eq!(a.keys(), b.keys());
    assert_eq!(a.maximum_error(), b.maximum_error());
    assert_eq!(a.total_weight(), events.iter().map(|(_, d)| d).sum::<i64>());
}
