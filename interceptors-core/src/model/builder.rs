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

//! Fluent construction of an [`InterceptionModel`].
//!
//! ```
//! use interceptors_core::{InterceptionModelBuilder, MethodSelector};
//!
//! let mut builder = InterceptionModelBuilder::<&str, &str>::new_for("FootballTeam");
//! builder.intercept_all().with(["Audit"]).unwrap();
//! builder
//!     .intercept_around_invoke(MethodSelector::no_args("getName"))
//!     .with(["Timing"])
//!     .unwrap();
//! let model = builder.build();
//! assert_eq!(model.all_interceptors().len(), 2);
//! ```

use super::InterceptionModel;
use crate::error::Result;
use crate::selector::MethodSelector;
use crate::types::InterceptionType;
use std::fmt;
use std::hash::Hash;

/// Builder for one entity's interception model.
pub struct InterceptionModelBuilder<T, I> {
    model: InterceptionModel<T, I>,
}

impl<T, I> InterceptionModelBuilder<T, I>
where
    I: Clone + Eq + Hash + fmt::Display,
{
    pub fn new_for(intercepted_entity: T) -> Self {
        Self {
            model: InterceptionModel::new(intercepted_entity),
        }
    }

    /// Global binding for every interception type.
    pub fn intercept_all(&mut self) -> InterceptionBinding<'_, T, I> {
        self.binding(InterceptionType::ALL.to_vec(), None)
    }

    pub fn intercept_around_invoke(&mut self, selector: MethodSelector) -> InterceptionBinding<'_, T, I> {
        self.intercept(InterceptionType::AroundInvoke, Some(selector))
    }

    pub fn intercept_around_timeout(&mut self, selector: MethodSelector) -> InterceptionBinding<'_, T, I> {
        self.intercept(InterceptionType::AroundTimeout, Some(selector))
    }

    pub fn intercept_post_construct(&mut self) -> InterceptionBinding<'_, T, I> {
        self.intercept(InterceptionType::PostConstruct, None)
    }

    pub fn intercept_pre_destroy(&mut self) -> InterceptionBinding<'_, T, I> {
        self.intercept(InterceptionType::PreDestroy, None)
    }

    pub fn intercept_post_activate(&mut self) -> InterceptionBinding<'_, T, I> {
        self.intercept(InterceptionType::PostActivate, None)
    }

    pub fn intercept_pre_passivate(&mut self) -> InterceptionBinding<'_, T, I> {
        self.intercept(InterceptionType::PrePassivate, None)
    }

    /// Binding for one type, global when `selector` is `None`.
    pub fn intercept(
        &mut self,
        interception_type: InterceptionType,
        selector: Option<MethodSelector>,
    ) -> InterceptionBinding<'_, T, I> {
        self.binding(vec![interception_type], selector)
    }

    pub fn ignore_global_interceptors(&mut self, selector: MethodSelector) -> &mut Self {
        self.model.set_ignores_global(selector, true);
        self
    }

    /// Inspect the model built so far.
    pub fn model(&self) -> &InterceptionModel<T, I> {
        &self.model
    }

    pub fn build(self) -> InterceptionModel<T, I> {
        self.model
    }

    fn binding(
        &mut self,
        interception_types: Vec<InterceptionType>,
        selector: Option<MethodSelector>,
    ) -> InterceptionBinding<'_, T, I> {
        InterceptionBinding {
            model: &mut self.model,
            interception_types,
            selector,
        }
    }
}

/// Pending binding returned by the `intercept*` methods.
#[must_use = "a binding does nothing until `with` is called"]
pub struct InterceptionBinding<'b, T, I> {
    model: &'b mut InterceptionModel<T, I>,
    interception_types: Vec<InterceptionType>,
    selector: Option<MethodSelector>,
}

impl<T, I> InterceptionBinding<'_, T, I>
where
    I: Clone + Eq + Hash + fmt::Display,
{
    /// Append `ids` for every interception type of this binding. Nothing is
    /// appended unless every type accepts the batch.
    pub fn with(self, ids: impl IntoIterator<Item = I>) -> Result<()> {
        let ids: Vec<I> = ids.into_iter().collect();
        let selector = self.selector.map(|s| s.unqualified());

        for interception_type in &self.interception_types {
            self.model
                .check_append(*interception_type, selector.as_ref(), &ids)?;
        }
        for interception_type in self.interception_types {
            self.model
                .append(interception_type, selector.clone(), ids.iter().cloned())?;
        }
        Ok(())
    }
}
