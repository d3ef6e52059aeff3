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

//! Chain execution.
//!
//! An [`InterceptionChain`] is created per call. It walks its handlers in
//! order through [`InterceptionChain::invoke_next`], each handler continuing
//! the walk by calling [`InvocationContext::proceed`]. Once every handler has
//! run, the target operation is invoked with the current arguments; lifecycle
//! chains have no terminal operation and yield `Value::Null`.

mod context;
mod handler;

pub use context::{InvocationContext, SimpleInvocationContext};
pub use handler::InterceptorInvocation;

use crate::error::{InterceptorError, Result};
use crate::metadata::{Instance, MethodArgs, MethodMetadata};
use crate::types::{InterceptionType, Value};
use std::cell::Cell;
use std::sync::Arc;
use tracing::trace;

/// Single-use chain of handlers wrapping one call.
pub struct InterceptionChain {
    handlers: Vec<InterceptorInvocation>,
    interception_type: InterceptionType,
    target: Instance,
    target_method: Option<Arc<MethodMetadata>>,
    position: Cell<usize>,
}

impl InterceptionChain {
    pub fn new(
        handlers: Vec<InterceptorInvocation>,
        interception_type: InterceptionType,
        target: Instance,
        target_method: Option<Arc<MethodMetadata>>,
    ) -> Self {
        Self {
            handlers,
            interception_type,
            target,
            target_method,
            position: Cell::new(0),
        }
    }

    pub fn interception_type(&self) -> InterceptionType {
        self.interception_type
    }

    pub fn target(&self) -> &Instance {
        &self.target
    }

    pub fn target_method(&self) -> Option<&Arc<MethodMetadata>> {
        self.target_method.as_ref()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Index of the next handler to run.
    pub fn position(&self) -> usize {
        self.position.get()
    }

    pub fn is_exhausted(&self) -> bool {
        self.position.get() >= self.handlers.len()
    }

    /// Run the next handler, or the terminal action once all have run.
    ///
    /// Target failures are returned with one level of invocation wrapping
    /// removed. An exhausted lifecycle chain keeps returning `Value::Null`.
    pub fn invoke_next(&self, ctx: &mut dyn InvocationContext) -> Result<Value> {
        let position = self.position.get();
        if let Some(handler) = self.handlers.get(position) {
            self.position.set(position + 1);
            trace!(
                interception_type = %self.interception_type,
                position,
                handler = %handler.descriptor().name(),
                "Dispatching chain handler"
            );
            return handler.intercept(self.interception_type, ctx);
        }

        match &self.target_method {
            Some(method) => {
                trace!(method = %method, "Invoking target operation");
                let parameters = ctx.parameters().to_vec();
                method
                    .invoke(&self.target, MethodArgs::Values(&parameters))
                    .map_err(InterceptorError::unwrap_invocation)
            }
            None => Ok(Value::Null),
        }
    }

    /// Run the whole chain with `parameters` as the initial arguments.
    pub fn invoke(&self, parameters: Vec<Value>) -> Result<Value> {
        self.run(parameters, None)
    }

    /// Run an around-timeout chain exposing `timer` to callbacks.
    pub fn invoke_timeout(&self, parameters: Vec<Value>, timer: Value) -> Result<Value> {
        self.run(parameters, Some(timer))
    }

    fn run(&self, parameters: Vec<Value>, timer: Option<Value>) -> Result<Value> {
        let mut ctx = SimpleInvocationContext::new(self, parameters).with_timer(timer);
        ctx.proceed()
    }
}
