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

//! Shared cache of built descriptors.

use super::{InterceptorDescriptor, InterceptorDescriptorBuilder};
use crate::error::Result;
use crate::metadata::ClassMetadata;
use crate::types::TypeName;
use dashmap::DashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

type DescriptorKey = (TypeName, bool);

/// Descriptor cache keyed by `(class, is_target_descriptor)`.
///
/// Reads are lock-free. A miss takes the build lock and checks again, so a
/// key is built at most once even when many threads ask for it first.
pub struct DescriptorRegistry {
    descriptors: DashMap<DescriptorKey, Arc<InterceptorDescriptor>>,
    build_lock: Mutex<()>,
    hits: AtomicU64,
    builds: AtomicU64,
}

impl DescriptorRegistry {
    pub fn new() -> Self {
        Self {
            descriptors: DashMap::new(),
            build_lock: Mutex::new(()),
            hits: AtomicU64::new(0),
            builds: AtomicU64::new(0),
        }
    }

    /// Get or build the descriptor for `class`.
    ///
    /// The type name is the identity: two `ClassMetadata` values with the same
    /// name share one cached descriptor. Build failures are returned to every
    /// caller and never cached.
    pub fn descriptor(
        &self,
        class: &Arc<ClassMetadata>,
        for_target: bool,
    ) -> Result<Arc<InterceptorDescriptor>> {
        let key = (class.name().clone(), for_target);
        if let Some(descriptor) = self.cached(&key) {
            return Ok(descriptor);
        }

        let _guard = self.build_lock.lock();
        if let Some(descriptor) = self.cached(&key) {
            return Ok(descriptor);
        }

        let descriptor = Arc::new(InterceptorDescriptorBuilder::build(class, for_target)?);
        self.descriptors.insert(key, Arc::clone(&descriptor));
        self.builds.fetch_add(1, Ordering::Relaxed);
        debug!(class = %class.name(), target = for_target, "Cached interceptor descriptor");
        Ok(descriptor)
    }

    /// Descriptor of a satellite interceptor class.
    pub fn interceptor_descriptor(
        &self,
        class: &Arc<ClassMetadata>,
    ) -> Result<Arc<InterceptorDescriptor>> {
        self.descriptor(class, false)
    }

    /// Descriptor of the intercepted class itself.
    pub fn target_descriptor(&self, class: &Arc<ClassMetadata>) -> Result<Arc<InterceptorDescriptor>> {
        self.descriptor(class, true)
    }

    fn cached(&self, key: &DescriptorKey) -> Option<Arc<InterceptorDescriptor>> {
        let descriptor = self.descriptors.get(key).map(|entry| Arc::clone(entry.value()))?;
        self.hits.fetch_add(1, Ordering::Relaxed);
        Some(descriptor)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Drop every cached descriptor and reset the counters.
    pub fn clear(&self) {
        let _guard = self.build_lock.lock();
        self.descriptors.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.builds.store(0, Ordering::Relaxed);
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            hits: self.hits.load(Ordering::Relaxed),
            builds: self.builds.load(Ordering::Relaxed),
            cached: self.descriptors.len(),
        }
    }
}

impl Default for DescriptorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Descriptor cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStats {
    pub hits: u64,
    pub builds: u64,
    pub cached: usize,
}
