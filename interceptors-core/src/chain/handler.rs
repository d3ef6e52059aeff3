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

//! One chain step: an interceptor instance paired with its descriptor.

use super::context::{DelegatingInvocationContext, InvocationContext};
use crate::descriptor::InterceptorDescriptor;
use crate::error::Result;
use crate::metadata::Instance;
use crate::types::{InterceptionType, Value};
use std::fmt;
use std::sync::Arc;

/// An interceptor (or the target itself) taking part in a chain.
#[derive(Clone)]
pub struct InterceptorInvocation {
    instance: Instance,
    descriptor: Arc<InterceptorDescriptor>,
}

impl InterceptorInvocation {
    pub fn new(instance: Instance, descriptor: Arc<InterceptorDescriptor>) -> Self {
        Self {
            instance,
            descriptor,
        }
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    pub fn descriptor(&self) -> &Arc<InterceptorDescriptor> {
        &self.descriptor
    }

    /// Run this step's callbacks for `interception_type`.
    ///
    /// Without callbacks the step just proceeds. Lifecycle callbacks all run
    /// in order; around callbacks run one at a time, each started by the
    /// previous one's `proceed`.
    pub fn intercept(
        &self,
        interception_type: InterceptionType,
        ctx: &mut dyn InvocationContext,
    ) -> Result<Value> {
        let callbacks = self.descriptor.methods(interception_type);
        if callbacks.is_empty() {
            return ctx.proceed();
        }

        let mut delegating =
            DelegatingInvocationContext::new(ctx, Arc::clone(&self.instance), callbacks);
        if interception_type.is_lifecycle() {
            delegating.run_lifecycle()
        } else {
            delegating.proceed()
        }
    }
}

impl fmt::Debug for InterceptorInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorInvocation")
            .field("class", self.descriptor.name())
            .field("target", &self.descriptor.is_target_descriptor())
            .finish()
    }
}
