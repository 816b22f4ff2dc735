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

//! Decay round: subtract the median from every counter and evict what runs out.

use std::collections::HashMap;
use std::hash::Hash;

/// Subtracts `median` from every count in `counts`, removes entries that drop to zero or
/// below, and compacts `keys` in place so that it lists exactly the survivors.
///
/// Returns the number of evicted keys.
pub(super) fn decay<K>(counts: &mut HashMap<K, i64>, keys: &mut Vec<K>, median: i64) -> usize
where
    K: Eq + Hash,
{
    let before = counts.len();
    counts.retain(|_, count| {
        *count -= median;
        *count > 0
    });
    keys.retain(|key| counts.contains_key(key));
    debug_assert_eq!(keys.len(), counts.len());
    before - counts.len()
}
