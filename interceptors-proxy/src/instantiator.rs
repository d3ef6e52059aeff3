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

//! Interceptor instance creation.

use dashmap::DashMap;
use interceptors_core::{ClassMetadata, Instance, Result, TypeName};
use std::sync::Arc;
use tracing::trace;

/// Creates the interceptor instances bound to one intercepted target.
pub trait InterceptorInstantiator: Send + Sync {
    fn create_for(&self, class: &Arc<ClassMetadata>) -> Result<Instance>;
}

/// Creates a fresh instance per target through the class factory.
#[derive(Debug, Default, Clone, Copy)]
pub struct FactoryInstantiator;

impl InterceptorInstantiator for FactoryInstantiator {
    fn create_for(&self, class: &Arc<ClassMetadata>) -> Result<Instance> {
        trace!(class = %class.name(), "Instantiating interceptor");
        class.instantiate()
    }
}

/// Hands out pre-registered instances, falling back to the class factory for
/// classes without one.
#[derive(Default)]
pub struct PreparedInstantiator {
    instances: DashMap<TypeName, Instance>,
}

impl PreparedInstantiator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration.
    pub fn with_instance(self, class: impl Into<TypeName>, instance: Instance) -> Self {
        self.register(class, instance);
        self
    }

    /// Register the instance to use for `class`, replacing any previous one.
    pub fn register(&self, class: impl Into<TypeName>, instance: Instance) -> Option<Instance> {
        self.instances.insert(class.into(), instance)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl InterceptorInstantiator for PreparedInstantiator {
    fn create_for(&self, class: &Arc<ClassMetadata>) -> Result<Instance> {
        match self.instances.get(class.name()) {
            Some(instance) => Ok(Arc::clone(instance.value())),
            None => FactoryInstantiator.create_for(class),
        }
    }
}
