// Copyright 2025 Sushanth (https://github.com/sushanthpy)
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

//! Re-entrancy guard for intercepted operations.

use interceptors_core::MethodSelector;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::thread::{self, ThreadId};

type GuardKey = (ThreadId, MethodSelector);

/// In-progress set of `(thread, operation)` pairs for one decorated instance.
///
/// An operation that calls itself again on the same thread while its chain is
/// running finds the key held and bypasses interception.
#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    in_progress: Mutex<HashSet<GuardKey>>,
}

impl ReentrancyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `selector` as in progress on the current thread.
    ///
    /// Returns `None` when it already is. The key is released when the
    /// returned token drops, on every exit path.
    pub fn enter(&self, selector: &MethodSelector) -> Option<InProgress<'_>> {
        let key = (thread::current().id(), selector.unqualified());
        if !self.in_progress.lock().insert(key.clone()) {
            return None;
        }
        Some(InProgress { guard: self, key })
    }

    /// Whether `selector` is in progress on the current thread.
    pub fn is_held(&self, selector: &MethodSelector) -> bool {
        self.in_progress
            .lock()
            .contains(&(thread::current().id(), selector.unqualified()))
    }
}

/// Token releasing its guard key on drop.
#[must_use = "the operation is only guarded while the token is alive"]
#[derive(Debug)]
pub struct InProgress<'g> {
    guard: &'g ReentrancyGuard,
    key: GuardKey,
}

impl Drop for InProgress<'_> {
    fn drop(&mut self) {
        self.guard.in_progress.lock().remove(&self.key);
    }
}
