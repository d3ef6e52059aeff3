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

//! Invocation contexts handed to interceptor callbacks.

use super::InterceptionChain;
use crate::error::{InterceptorError, Result};
use crate::metadata::{Instance, MethodArgs, MethodMetadata};
use crate::types::{Value, ValueType};
use std::any::Any;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// View of an intercepted call, as seen by a callback.
pub trait InvocationContext {
    /// The intercepted target instance.
    fn target(&self) -> &Instance;

    /// The intercepted operation, `None` for lifecycle calls.
    fn method(&self) -> Option<&MethodMetadata>;

    fn parameters(&self) -> &[Value];

    /// Replace the call arguments.
    ///
    /// Fails with `IllegalState` on lifecycle calls, `ArityMismatch` when the
    /// count differs from the operation's parameters and `TypeMismatch` when a
    /// value does not fit its slot.
    fn set_parameters(&mut self, parameters: Vec<Value>) -> Result<()>;

    /// Key/value bag shared by every callback of the call.
    fn context_data(&self) -> &HashMap<String, Value>;

    fn context_data_mut(&mut self) -> &mut HashMap<String, Value>;

    /// Timer payload of an around-timeout call.
    fn timer(&self) -> Option<&Value>;

    /// Continue with the next callback, interceptor or the target operation.
    fn proceed(&mut self) -> Result<Value>;
}

impl dyn InvocationContext + '_ {
    /// The target downcast to its concrete type.
    pub fn target_as<T: Any>(&self) -> Option<&T> {
        (**self.target()).downcast_ref::<T>()
    }
}

/// Context created by the chain for each call.
pub struct SimpleInvocationContext<'c> {
    chain: &'c InterceptionChain,
    parameters: Vec<Value>,
    context_data: HashMap<String, Value>,
    timer: Option<Value>,
}

impl<'c> SimpleInvocationContext<'c> {
    pub fn new(chain: &'c InterceptionChain, parameters: Vec<Value>) -> Self {
        Self {
            chain,
            parameters,
            context_data: HashMap::new(),
            timer: None,
        }
    }

    pub fn with_timer(mut self, timer: Option<Value>) -> Self {
        self.timer = timer;
        self
    }
}

impl InvocationContext for SimpleInvocationContext<'_> {
    fn target(&self) -> &Instance {
        self.chain.target()
    }

    fn method(&self) -> Option<&MethodMetadata> {
        self.chain.target_method().map(Arc::as_ref)
    }

    fn parameters(&self) -> &[Value] {
        &self.parameters
    }

    fn set_parameters(&mut self, parameters: Vec<Value>) -> Result<()> {
        let method = self.chain.target_method().ok_or_else(|| {
            InterceptorError::IllegalState(
                "parameters cannot be set on a lifecycle invocation".to_string(),
            )
        })?;
        check_parameters(method, &parameters)?;
        self.parameters = parameters;
        Ok(())
    }

    fn context_data(&self) -> &HashMap<String, Value> {
        &self.context_data
    }

    fn context_data_mut(&mut self) -> &mut HashMap<String, Value> {
        &mut self.context_data
    }

    fn timer(&self) -> Option<&Value> {
        self.timer.as_ref()
    }

    fn proceed(&mut self) -> Result<Value> {
        let chain = self.chain;
        chain.invoke_next(self)
    }
}

fn check_parameters(method: &MethodMetadata, parameters: &[Value]) -> Result<()> {
    let expected = method.parameter_types();
    if expected.len() != parameters.len() {
        return Err(InterceptorError::ArityMismatch {
            method: method.to_string(),
            expected: expected.len(),
            actual: parameters.len(),
        });
    }

    for (index, (slot, value)) in expected.iter().zip(parameters).enumerate() {
        if slot.accepts(value) {
            continue;
        }
        let found = if value.is_null() {
            "null (slot cannot hold null)".to_string()
        } else {
            ValueType::of(value).to_string()
        };
        return Err(InterceptorError::TypeMismatch {
            method: method.to_string(),
            index,
            expected: *slot,
            found,
        });
    }
    Ok(())
}

/// Context seen by the callbacks of one interceptor.
///
/// `proceed` first runs the interceptor's remaining callbacks for the
/// current interception type and only then hands over to the outer context.
pub(crate) struct DelegatingInvocationContext<'a> {
    delegate: &'a mut dyn InvocationContext,
    interceptor: Instance,
    pending: VecDeque<Arc<MethodMetadata>>,
    delegated: bool,
}

impl<'a> DelegatingInvocationContext<'a> {
    pub(crate) fn new(
        delegate: &'a mut dyn InvocationContext,
        interceptor: Instance,
        callbacks: &[Arc<MethodMetadata>],
    ) -> Self {
        Self {
            delegate,
            interceptor,
            pending: callbacks.iter().cloned().collect(),
            delegated: false,
        }
    }

    /// Run every pending lifecycle callback, then continue the outer chain
    /// unless one of them already did.
    pub(crate) fn run_lifecycle(&mut self) -> Result<Value> {
        while let Some(callback) = self.pending.pop_front() {
            self.invoke_callback(&callback)?;
        }
        if self.delegated {
            Ok(Value::Null)
        } else {
            self.proceed()
        }
    }

    fn invoke_callback(&mut self, callback: &MethodMetadata) -> Result<Value> {
        let interceptor = Arc::clone(&self.interceptor);
        let args = if callback.parameter_types().is_empty() {
            MethodArgs::None
        } else {
            MethodArgs::Context(self)
        };
        callback
            .invoke(&interceptor, args)
            .map_err(InterceptorError::unwrap_invocation)
    }
}

impl InvocationContext for DelegatingInvocationContext<'_> {
    fn target(&self) -> &Instance {
        self.delegate.target()
    }

    fn method(&self) -> Option<&MethodMetadata> {
        self.delegate.method()
    }

    fn parameters(&self) -> &[Value] {
        self.delegate.parameters()
    }

    fn set_parameters(&mut self, parameters: Vec<Value>) -> Result<()> {
        self.delegate.set_parameters(parameters)
    }

    fn context_data(&self) -> &HashMap<String, Value> {
        self.delegate.context_data()
    }

    fn context_data_mut(&mut self) -> &mut HashMap<String, Value> {
        self.delegate.context_data_mut()
    }

    fn timer(&self) -> Option<&Value> {
        self.delegate.timer()
    }

    fn proceed(&mut self) -> Result<Value> {
        match self.pending.pop_front() {
            Some(callback) => self.invoke_callback(&callback),
            None => {
                self.delegated = true;
                self.delegate.proceed()
            }
        }
    }
}
