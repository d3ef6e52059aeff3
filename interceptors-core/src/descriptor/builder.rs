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

//! Hierarchy scan producing an [`InterceptorDescriptor`].

use super::InterceptorDescriptor;
use crate::error::{InterceptorError, Result};
use crate::metadata::{ClassMetadata, MethodMetadata};
use crate::selector::MethodSelector;
use crate::types::{InterceptionType, ValueType};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use tracing::debug;

/// Builds descriptors by walking a class hierarchy from the most-derived
/// level up to the root.
pub struct InterceptorDescriptorBuilder;

impl InterceptorDescriptorBuilder {
    /// Scan `class` and collect its callbacks.
    ///
    /// Each newly accepted callback is pushed to the front of its type's list,
    /// so base-level callbacks end up first. An operation redeclared on a
    /// more-derived level hides the base declaration entirely.
    pub fn build(class: &Arc<ClassMetadata>, for_target: bool) -> Result<InterceptorDescriptor> {
        let mut methods: HashMap<InterceptionType, VecDeque<Arc<MethodMetadata>>> = HashMap::new();
        let mut found: HashSet<MethodSelector> = HashSet::new();

        for level in class.hierarchy() {
            let mut detected: HashSet<InterceptionType> = HashSet::new();

            for method in level.declared_methods() {
                let reference = method.reference();
                if found.contains(&reference) {
                    continue;
                }

                for interception_type in InterceptionType::ALL {
                    if !Self::is_interceptor_method(interception_type, method, for_target) {
                        continue;
                    }
                    if !detected.insert(interception_type) {
                        return Err(InterceptorError::DuplicateInterceptionType {
                            class: level.name().clone(),
                            interception_type,
                        });
                    }
                    methods
                        .entry(interception_type)
                        .or_default()
                        .push_front(Arc::clone(method));
                }

                // Recorded even without markers: an unmarked override still
                // hides the base callback.
                found.insert(reference);
            }
        }

        let methods: HashMap<_, Vec<_>> = methods
            .into_iter()
            .map(|(t, list)| (t, Vec::from(list)))
            .collect();

        debug!(
            class = %class.name(),
            target = for_target,
            interception_types = methods.len(),
            "Built interceptor descriptor"
        );

        Ok(InterceptorDescriptor::new(Arc::clone(class), for_target, methods))
    }

    /// Whether `method` qualifies as a callback for `interception_type`.
    ///
    /// A marked method with the wrong shape is skipped with a diagnostic, it
    /// never fails the build.
    pub fn is_interceptor_method(
        interception_type: InterceptionType,
        method: &MethodMetadata,
        for_target: bool,
    ) -> bool {
        if !method.has_marker(interception_type) {
            return false;
        }

        let expected_return = interception_type.callback_return_type();
        if method.return_type() != expected_return {
            debug!(
                method = %method,
                interception_type = %interception_type,
                expected = %expected_return,
                found = %method.return_type(),
                "Ignoring callback with wrong return type"
            );
            return false;
        }

        let expected_arity = interception_type.callback_arity(for_target);
        let params = method.parameter_types();
        if params.len() != expected_arity {
            debug!(
                method = %method,
                interception_type = %interception_type,
                expected = expected_arity,
                found = params.len(),
                target = for_target,
                "Ignoring callback with wrong parameter count"
            );
            return false;
        }

        if let Some(param) = params.first() {
            if *param != ValueType::Context {
                debug!(
                    method = %method,
                    interception_type = %interception_type,
                    found = %param,
                    "Ignoring callback whose parameter is not an invocation context"
                );
                return false;
            }
        }

        true
    }
}
