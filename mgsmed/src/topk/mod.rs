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

//! Top-K heavy hitters with Misra-Gries counters reduced by a sampled median.
//!
//! A [`Stream`] keeps at most `capacity` counters. When an unseen key arrives at a full
//! stream, the median of a bounded random sample of counters is subtracted from all of
//! them and non-positive counters are evicted, so each update costs amortized O(1).
//!
//! For background, see "A High-Performance Algorithm for Identifying Frequent Items in
//! Data Streams": <https://arxiv.org/abs/1705.07001>
//!
//! # Usage
//!
//! ```rust
//! # use mgsmed::topk::Stream;
//! let mut stream = Stream::new(3).unwrap();
//! for key in ["x", "y", "x", "z", "x", "w", "x"] {
//!     stream.update(key, 1);
//! }
//! let top = stream.top_k(1);
//! assert_eq!(*top[0].key(), "x");
//! assert!(top[0].count() <= 4);
//! ```
//!
//! # Reproducible sampling
//!
//! ```rust
//! # use mgsmed::common::random::XorShift64;
//! # use mgsmed::topk::Stream;
//! let mut a = Stream::with_random(4, XorShift64::seeded(1)).unwrap();
//! let mut b = Stream::with_random(4, XorShift64::seeded(1)).unwrap();
//! for i in 0..100u32 {
//!     a.update(i % 13, 1 + i64::from(i % 5));
//!     b.update(i % 13, 1 + i64::from(i % 5));
//! }
//! assert_eq!(a.keys(), b.keys());
//! ```

mod decay;
mod median;
mod stream;

pub use self::stream::DEFAULT_SAMPLE_SIZE;
pub use self::stream::Element;
pub use self::stream::Stream;
pub use self::stream::StreamBuilder;
