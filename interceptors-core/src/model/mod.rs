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

//! Interceptor bindings for one intercepted entity.
//!
//! An [`InterceptionModel`] maps `(interception type, operation)` to the
//! ordered interceptors that apply. Global bindings cover every operation of
//! a type unless the operation opts out with
//! [`InterceptionModel::set_ignores_global`]. Models are mutated during a
//! build phase and then shared read-only.

mod builder;

pub use builder::{InterceptionBinding, InterceptionModelBuilder};

use crate::error::{InterceptorError, Result};
use crate::selector::MethodSelector;
use crate::types::InterceptionType;
use indexmap::IndexSet;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

/// Ordered interceptor bindings for the entity `T`, keyed by interceptor
/// identity `I`.
#[derive(Debug, Clone)]
pub struct InterceptionModel<T, I> {
    intercepted_entity: T,
    global: HashMap<InterceptionType, Vec<I>>,
    per_operation: HashMap<InterceptionType, HashMap<MethodSelector, Vec<I>>>,
    ignoring_global: HashSet<MethodSelector>,
    all_interceptors: IndexSet<I>,
}

impl<T, I> InterceptionModel<T, I>
where
    I: Clone + Eq + Hash + fmt::Display,
{
    pub fn new(intercepted_entity: T) -> Self {
        Self {
            intercepted_entity,
            global: HashMap::new(),
            per_operation: HashMap::new(),
            ignoring_global: HashSet::new(),
            all_interceptors: IndexSet::new(),
        }
    }

    pub fn intercepted_entity(&self) -> &T {
        &self.intercepted_entity
    }

    /// Interceptors that apply to a call, outermost first.
    ///
    /// Lifecycle types take no selector; around types require one. For an
    /// operation the global list comes first, unless the operation ignores
    /// global interceptors, followed by the operation's own bindings.
    pub fn resolve(
        &self,
        interception_type: InterceptionType,
        selector: Option<&MethodSelector>,
    ) -> Result<Vec<I>> {
        let global = self.global.get(&interception_type);

        if interception_type.is_lifecycle() {
            if selector.is_some() {
                return Err(InterceptorError::InvalidSelector {
                    interception_type,
                    reason: "lifecycle interception does not take an operation",
                });
            }
            return Ok(global.cloned().unwrap_or_default());
        }

        let selector = selector
            .ok_or(InterceptorError::InvalidSelector {
                interception_type,
                reason: "an operation is required",
            })?
            .unqualified();

        let mut resolved = Vec::new();
        if !self.ignoring_global.contains(&selector) {
            if let Some(global) = global {
                resolved.extend(global.iter().cloned());
            }
        }
        if let Some(bound) = self
            .per_operation
            .get(&interception_type)
            .and_then(|by_op| by_op.get(&selector))
        {
            resolved.extend(bound.iter().cloned());
        }
        Ok(resolved)
    }

    /// Append interceptors to the global list (`selector` is `None`) or to an
    /// operation's list.
    ///
    /// The whole batch is rejected, leaving the model untouched, if any id is
    /// repeated inside it, already bound to the same list, or bound on the
    /// other scope of the same type: globally for an operation binding, to any
    /// operation for a global binding.
    pub fn append(
        &mut self,
        interception_type: InterceptionType,
        selector: Option<MethodSelector>,
        ids: impl IntoIterator<Item = I>,
    ) -> Result<()> {
        let ids: Vec<I> = ids.into_iter().collect();
        let selector = selector.map(|s| s.unqualified());
        self.check_append(interception_type, selector.as_ref(), &ids)?;

        let list = match selector {
            None => self.global.entry(interception_type).or_default(),
            Some(selector) => self
                .per_operation
                .entry(interception_type)
                .or_default()
                .entry(selector)
                .or_default(),
        };
        list.extend(ids.iter().cloned());
        self.all_interceptors.extend(ids);
        Ok(())
    }

    pub(crate) fn check_append(
        &self,
        interception_type: InterceptionType,
        selector: Option<&MethodSelector>,
        ids: &[I],
    ) -> Result<()> {
        if selector.is_some() && interception_type.is_lifecycle() {
            return Err(InterceptorError::InvalidSelector {
                interception_type,
                reason: "lifecycle interceptors cannot be bound to an operation",
            });
        }

        let global = self.global.get(&interception_type);
        let existing = match selector {
            None => global,
            Some(selector) => self
                .per_operation
                .get(&interception_type)
                .and_then(|by_op| by_op.get(selector)),
        };

        let operations = match selector {
            None => self.per_operation.get(&interception_type),
            Some(_) => None,
        };

        let mut batch = HashSet::with_capacity(ids.len());
        for id in ids {
            let duplicate = !batch.insert(id)
                || existing.is_some_and(|list| list.contains(id))
                || (selector.is_some() && global.is_some_and(|list| list.contains(id)))
                || operations.is_some_and(|by_op| by_op.values().any(|list| list.contains(id)));
            if duplicate {
                return Err(InterceptorError::DuplicateInterceptor {
                    interceptor: id.to_string(),
                    interception_type,
                });
            }
        }
        Ok(())
    }

    /// Make an operation skip (or stop skipping) global interceptors.
    pub fn set_ignores_global(&mut self, selector: MethodSelector, ignore: bool) {
        let selector = selector.unqualified();
        if ignore {
            self.ignoring_global.insert(selector);
        } else {
            self.ignoring_global.remove(&selector);
        }
    }

    pub fn ignores_global(&self, selector: &MethodSelector) -> bool {
        self.ignoring_global.contains(&selector.unqualified())
    }

    /// Every interceptor ever bound, in first-seen order.
    pub fn all_interceptors(&self) -> &IndexSet<I> {
        &self.all_interceptors
    }

    /// Whether any binding exists for `interception_type`.
    pub fn has_bindings(&self, interception_type: InterceptionType) -> bool {
        self.global
            .get(&interception_type)
            .is_some_and(|list| !list.is_empty())
            || self
                .per_operation
                .get(&interception_type)
                .is_some_and(|by_op| by_op.values().any(|list| !list.is_empty()))
    }
}
