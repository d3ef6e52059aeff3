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

//! Interceptor descriptors.
//!
//! A descriptor records, per interception type, which callbacks a class
//! hierarchy contributes and in which order they run. Descriptors are built
//! once per `(class, is_target_descriptor)` and shared through the
//! [`DescriptorRegistry`].

mod builder;
mod registry;

pub use builder::InterceptorDescriptorBuilder;
pub use registry::{DescriptorRegistry, RegistryStats};

use crate::metadata::{ClassMetadata, MethodMetadata};
use crate::types::{InterceptionType, TypeName};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Immutable callback table for one interceptor or target class.
pub struct InterceptorDescriptor {
    class: Arc<ClassMetadata>,
    target: bool,
    methods: HashMap<InterceptionType, Vec<Arc<MethodMetadata>>>,
}

impl InterceptorDescriptor {
    pub(crate) fn new(
        class: Arc<ClassMetadata>,
        target: bool,
        methods: HashMap<InterceptionType, Vec<Arc<MethodMetadata>>>,
    ) -> Self {
        Self {
            class,
            target,
            methods,
        }
    }

    pub fn class(&self) -> &Arc<ClassMetadata> {
        &self.class
    }

    pub fn name(&self) -> &TypeName {
        self.class.name()
    }

    /// Whether this describes the intercepted entity itself.
    pub fn is_target_descriptor(&self) -> bool {
        self.target
    }

    /// Callbacks for `interception_type`, base-most first.
    pub fn methods(&self, interception_type: InterceptionType) -> &[Arc<MethodMetadata>] {
        self.methods
            .get(&interception_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_callbacks(&self, interception_type: InterceptionType) -> bool {
        !self.methods(interception_type).is_empty()
    }

    /// True when no interception type has any callback.
    pub fn is_empty(&self) -> bool {
        self.methods.values().all(Vec::is_empty)
    }

    /// Interception types with at least one callback, in declaration order.
    pub fn interception_types(&self) -> impl Iterator<Item = InterceptionType> + '_ {
        InterceptionType::ALL
            .into_iter()
            .filter(move |t| self.has_callbacks(*t))
    }
}

impl fmt::Debug for InterceptorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for t in self.interception_types() {
            let names: Vec<String> = self.methods(t).iter().map(|m| m.to_string()).collect();
            map.entry(&t, &names);
        }
        map.finish()?;
        write!(f, " for {} (target: {})", self.class.name(), self.target)
    }
}
