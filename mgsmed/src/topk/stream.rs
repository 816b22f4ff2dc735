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

//! Bounded top-K summary of a weighted key stream.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use crate::common::random::RandomSource;
use crate::common::random::XorShift64;
use crate::error::Error;
use crate::error::ErrorKind;
use crate::topk::decay::decay;
use crate::topk::median::sample_median;

/// Default number of counts sampled to estimate the median during a decay round.
pub const DEFAULT_SAMPLE_SIZE: usize = 1024;

const LOG_TARGET: &str = "mgsmed::topk";

/// A tracked key with its estimated frequency, as returned by [`Stream::keys`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element<K> {
    key: K,
    count: i64,
    upper_bound: i64,
}

impl<K> Element<K> {
    /// Returns the key.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Returns the estimated frequency, a lower bound on the true frequency.
    pub fn count(&self) -> i64 {
        self.count
    }

    /// Returns the estimate compensated by every median subtracted so far.
    pub fn upper_bound(&self) -> i64 {
        self.upper_bound
    }

    /// Consumes the element, returning the key.
    pub fn into_key(self) -> K {
        self.key
    }
}

/// Builder for [`Stream`].
///
/// # Examples
///
/// ```
/// use mgsmed::topk::StreamBuilder;
///
/// let mut stream = StreamBuilder::new(64)
///     .sample_size(256)
///     .seed(7)
///     .build()
///     .unwrap();
/// stream.update("GET /", 3);
/// assert_eq!(stream.estimate("GET /"), 3);
/// ```
#[derive(Debug, Clone)]
pub struct StreamBuilder {
    capacity: usize,
    sample_size: usize,
    seed: Option<u64>,
}

impl StreamBuilder {
    /// Starts a builder for a stream tracking at most `capacity` keys.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            sample_size: DEFAULT_SAMPLE_SIZE,
            seed: None,
        }
    }

    /// Sets how many counts are sampled to estimate the median in a decay round.
    pub fn sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    /// Seeds the default random source, making sampling reproducible.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builds a stream backed by [`XorShift64`].
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidCapacity`] if the capacity is 0 and
    /// [`ErrorKind::ConfigInvalid`] if the sample size is 0.
    pub fn build<K>(self) -> Result<Stream<K>, Error> {
        let rng = match self.seed {
            Some(seed) => XorShift64::seeded(seed),
            None => XorShift64::default(),
        };
        self.build_with_random(rng)
    }

    /// Builds a stream that samples with `rng`. A configured seed is ignored.
    ///
    /// # Errors
    ///
    /// Same as [`build`](Self::build).
    pub fn build_with_random<K, R: RandomSource>(self, rng: R) -> Result<Stream<K, R>, Error> {
        if self.capacity == 0 {
            return Err(Error::invalid_capacity(self.capacity));
        }
        if self.sample_size == 0 {
            return Err(
                Error::new(ErrorKind::ConfigInvalid, "sample size must be at least 1")
                    .with_context("sample_size", self.sample_size),
            );
        }
        Ok(Stream {
            capacity: self.capacity,
            sample_size: self.sample_size,
            counts: HashMap::with_capacity(self.capacity),
            keys: Vec::with_capacity(self.capacity),
            offset: 0,
            total_weight: 0,
            num_decays: 0,
            rng,
        })
    }
}

/// Misra-Gries summary that reduces all counters by a sampled median when full.
///
/// The stream tracks at most `capacity` keys. Updating an unseen key while full triggers
/// a decay round: the median of a random sample of tracked counts is subtracted from
/// every counter, keys left at zero or below are evicted, and the new key is admitted
/// only if its delta is at least the median.
///
/// The summary is not synchronized. Wrap it in a lock to share it between threads.
#[derive(Debug, Clone)]
pub struct Stream<K, R = XorShift64> {
    capacity: usize,
    sample_size: usize,
    counts: HashMap<K, i64>,
    // tracked keys in a sampleable layout; equal to the key set of `counts`
    keys: Vec<K>,
    offset: i64,
    total_weight: i64,
    num_decays: u64,
    rng: R,
}

impl<K> Stream<K> {
    /// Creates a stream tracking at most `capacity` keys.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidCapacity`] if `capacity` is 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use mgsmed::error::ErrorKind;
    /// use mgsmed::topk::Stream;
    ///
    /// assert!(Stream::<String>::new(16).is_ok());
    /// let err = Stream::<String>::new(0).unwrap_err();
    /// assert_eq!(err.kind(), ErrorKind::InvalidCapacity);
    /// ```
    pub fn new(capacity: usize) -> Result<Self, Error> {
        StreamBuilder::new(capacity).build()
    }
}

impl<K, R: RandomSource> Stream<K, R> {
    /// Creates a stream tracking at most `capacity` keys that samples with `rng`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidCapacity`] if `capacity` is 0.
    pub fn with_random(capacity: usize, rng: R) -> Result<Self, Error> {
        StreamBuilder::new(capacity).build_with_random(rng)
    }
}

impl<K, R> Stream<K, R> {
    /// Returns the maximum number of tracked keys.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of counts sampled per decay round.
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns true if no key is tracked.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Returns the sum of every delta passed to [`update`](Self::update).
    pub fn total_weight(&self) -> i64 {
        self.total_weight
    }

    /// Returns the sum of all medians subtracted so far.
    pub fn maximum_error(&self) -> i64 {
        self.offset
    }

    /// Returns the number of decay rounds performed.
    pub fn num_decays(&self) -> u64 {
        self.num_decays
    }

    /// Forgets every tracked key and accumulated statistic.
    ///
    /// Capacity, sample size and the random source are kept.
    pub fn reset(&mut self) {
        self.counts.clear();
        self.keys.clear();
        self.offset = 0;
        self.total_weight = 0;
        self.num_decays = 0;
    }
}

impl<K: Eq + Hash, R> Stream<K, R> {
    /// Returns true if `key` is tracked.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.counts.contains_key(key)
    }

    /// Returns the estimated frequency of `key`.
    ///
    /// The estimate is the tracked count clamped at 0, which never exceeds the true
    /// frequency. Untracked keys report 0.
    pub fn estimate<Q>(&self, key: &Q) -> i64
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.counts.get(key).map_or(0, |&count| count.max(0))
    }

    /// Returns the tracked count plus [`maximum_error`](Self::maximum_error).
    ///
    /// Untracked keys report 0.
    pub fn upper_bound<Q>(&self, key: &Q) -> i64
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.counts
            .get(key)
            .map_or(0, |&count| (count + self.offset).max(0))
    }
}

impl<K: Eq + Hash + Clone, R: RandomSource> Stream<K, R> {
    /// Adds `delta` to the frequency of `key`.
    ///
    /// Tracked keys are adjusted unconditionally, even if the count becomes negative.
    /// An unseen key is admitted while there is room. Once the stream is full, an unseen
    /// key starts a decay round and is then admitted with `delta - median` only if
    /// `delta >= median`. A negative sampled median is treated as 0.
    ///
    /// Counts use `i64` arithmetic: overflow panics in debug builds and wraps in release
    /// builds.
    ///
    /// # Examples
    ///
    /// ```
    /// use mgsmed::topk::Stream;
    ///
    /// let mut stream = Stream::new(2).unwrap();
    /// stream.update("a", 5);
    /// stream.update("a", -2);
    /// stream.update("b", 1);
    /// assert_eq!(stream.estimate("a"), 3);
    /// assert_eq!(stream.len(), 2);
    /// ```
    pub fn update(&mut self, key: K, delta: i64) {
        self.total_weight += delta;

        if let Some(count) = self.counts.get_mut(&key) {
            *count += delta;
            return;
        }

        if self.counts.len() < self.capacity {
            self.admit(key, delta);
            return;
        }

        let median = self.decrement_counters();
        if delta >= median {
            self.admit(key, delta - median);
        } else {
            tracing::trace!(target: LOG_TARGET, delta, median, "update_dropped");
        }
    }

    fn admit(&mut self, key: K, count: i64) {
        debug_assert!(self.counts.len() < self.capacity, "stream is full");
        self.counts.insert(key.clone(), count);
        self.keys.push(key);
    }

    fn decrement_counters(&mut self) -> i64 {
        // negative counts never raise other counters or lower the offset
        let median =
            sample_median(&self.counts, &self.keys, self.sample_size, &mut self.rng).max(0);
        let evicted = decay(&mut self.counts, &mut self.keys, median);
        self.offset += median;
        self.num_decays += 1;

        tracing::debug!(
            target: LOG_TARGET,
            capacity = self.capacity,
            sample_size = self.sample_size.min(self.capacity),
            median,
            evicted,
            survivors = self.counts.len(),
            offset = self.offset,
            "decay_round"
        );
        median
    }
}

impl<K: Ord + Clone, R> Stream<K, R> {
    /// Returns every tracked key ordered by estimate descending, then key ascending.
    ///
    /// # Examples
    ///
    /// ```
    /// use mgsmed::topk::Stream;
    ///
    /// let mut stream = Stream::new(8).unwrap();
    /// stream.update("b", 2);
    /// stream.update("c", 5);
    /// stream.update("a", 2);
    ///
    /// let keys: Vec<_> = stream.keys().into_iter().map(|e| *e.key()).collect();
    /// assert_eq!(keys, ["c", "a", "b"]);
    /// ```
    pub fn keys(&self) -> Vec<Element<K>> {
        let mut elements: Vec<Element<K>> = self
            .counts
            .iter()
            .map(|(key, &count)| Element {
                key: key.clone(),
                count: count.max(0),
                upper_bound: (count + self.offset).max(0),
            })
            .collect();
        elements.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
        elements
    }

    /// Returns the first `k` entries of [`keys`](Self::keys).
    pub fn top_k(&self, k: usize) -> Vec<Element<K>> {
        let mut elements = self.keys();
        elements.truncate(k);
        elements
    }
}
