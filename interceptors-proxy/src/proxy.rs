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

//! The decorator standing in front of an intercepted target.

use crate::guard::ReentrancyGuard;
use crate::instantiator::{FactoryInstantiator, InterceptorInstantiator};
use crate::registry::{ClassInterceptionModel, InterceptorRegistry};
use interceptors_core::{
    ClassMetadata, DescriptorRegistry, Instance, InterceptionChain, InterceptionModel,
    InterceptionType, InterceptorDescriptor, InterceptorError, InterceptorInvocation,
    MethodArgs, MethodMetadata, MethodSelector, Result, TypeName, Value,
};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// A target instance whose calls run through its interception chains.
///
/// Interceptor instances are created once, when the decorator is built, for
/// every interceptor class the model mentions.
pub struct InterceptedInstance {
    target: Instance,
    class: Arc<ClassMetadata>,
    model: Arc<ClassInterceptionModel>,
    interceptors: HashMap<TypeName, InterceptorInvocation>,
    target_descriptor: Arc<InterceptorDescriptor>,
    guard: ReentrancyGuard,
}

impl InterceptedInstance {
    pub fn new(
        target: Instance,
        class: Arc<ClassMetadata>,
        model: Arc<ClassInterceptionModel>,
        descriptors: &DescriptorRegistry,
        instantiator: &dyn InterceptorInstantiator,
    ) -> Result<Self> {
        let mut interceptors = HashMap::with_capacity(model.all_interceptors().len());
        for interceptor_class in model.all_interceptors() {
            let descriptor = descriptors.interceptor_descriptor(interceptor_class)?;
            let instance = instantiator.create_for(interceptor_class)?;
            interceptors.insert(
                interceptor_class.name().clone(),
                InterceptorInvocation::new(instance, descriptor),
            );
        }
        let target_descriptor = descriptors.target_descriptor(&class)?;

        debug!(
            class = %class.name(),
            interceptors = interceptors.len(),
            self_intercepting = !target_descriptor.is_empty(),
            "Created intercepted instance"
        );

        Ok(Self {
            target,
            class,
            model,
            interceptors,
            target_descriptor,
            guard: ReentrancyGuard::new(),
        })
    }

    pub fn target(&self) -> &Instance {
        &self.target
    }

    /// The target downcast to its concrete type.
    pub fn target_as<T: Any>(&self) -> Option<&T> {
        (*self.target).downcast_ref::<T>()
    }

    pub fn class(&self) -> &Arc<ClassMetadata> {
        &self.class
    }

    pub fn model(&self) -> &Arc<ClassInterceptionModel> {
        &self.model
    }

    /// The interceptor instance created for `class`.
    pub fn interceptor(&self, class: &TypeName) -> Option<&Instance> {
        self.interceptors.get(class).map(InterceptorInvocation::instance)
    }

    /// Call an operation through its around-invoke chain.
    ///
    /// Interceptor callbacks declared on the target and nested calls of an
    /// operation already in progress on this thread run directly.
    pub fn invoke(&self, selector: &MethodSelector, parameters: Vec<Value>) -> Result<Value> {
        self.intercept_call(InterceptionType::AroundInvoke, selector, parameters, None)
    }

    /// Call a timer operation through its around-timeout chain.
    pub fn invoke_timeout(
        &self,
        selector: &MethodSelector,
        parameters: Vec<Value>,
        timer: Value,
    ) -> Result<Value> {
        self.intercept_call(InterceptionType::AroundTimeout, selector, parameters, Some(timer))
    }

    pub fn post_construct(&self) -> Result<()> {
        self.lifecycle(InterceptionType::PostConstruct)
    }

    pub fn pre_destroy(&self) -> Result<()> {
        self.lifecycle(InterceptionType::PreDestroy)
    }

    /// Run before the surrounding persistence layer passivates the target.
    pub fn pre_passivate(&self) -> Result<()> {
        self.lifecycle(InterceptionType::PrePassivate)
    }

    /// Run after the surrounding persistence layer restored the target.
    pub fn post_activate(&self) -> Result<()> {
        self.lifecycle(InterceptionType::PostActivate)
    }

    fn intercept_call(
        &self,
        interception_type: InterceptionType,
        selector: &MethodSelector,
        parameters: Vec<Value>,
        timer: Option<Value>,
    ) -> Result<Value> {
        let method = self.class.find_method(selector).ok_or_else(|| {
            InterceptorError::MethodNotFound(format!("{}::{}", self.class.name(), selector))
        })?;

        if !method.is_interception_candidate() {
            return self.invoke_directly(&method, &parameters);
        }

        let operation = method.selector();
        let Some(_in_progress) = self.guard.enter(&operation) else {
            trace!(method = %method, "Re-entrant call, bypassing interception");
            return self.invoke_directly(&method, &parameters);
        };

        let chain = self.chain(interception_type, Some(&operation), Some(method))?;
        match timer {
            Some(timer) => chain.invoke_timeout(parameters, timer),
            None => chain.invoke(parameters),
        }
    }

    fn lifecycle(&self, interception_type: InterceptionType) -> Result<()> {
        let chain = self.chain(interception_type, None, None)?;
        chain.invoke(Vec::new()).map(|_| ())
    }

    fn invoke_directly(&self, method: &MethodMetadata, parameters: &[Value]) -> Result<Value> {
        method
            .invoke(&self.target, MethodArgs::Values(parameters))
            .map_err(InterceptorError::unwrap_invocation)
    }

    fn chain(
        &self,
        interception_type: InterceptionType,
        selector: Option<&MethodSelector>,
        method: Option<Arc<MethodMetadata>>,
    ) -> Result<InterceptionChain> {
        let mut handlers = self
            .model
            .resolve(interception_type, selector)?
            .iter()
            .map(|class| {
                self.interceptors
                    .get(class.name())
                    .cloned()
                    .ok_or_else(|| InterceptorError::MissingInstance(class.name().clone()))
            })
            .collect::<Result<Vec<_>>>()?;

        if self.target_descriptor.has_callbacks(interception_type) {
            handlers.push(InterceptorInvocation::new(
                Arc::clone(&self.target),
                Arc::clone(&self.target_descriptor),
            ));
        }

        trace!(
            class = %self.class.name(),
            interception_type = %interception_type,
            handlers = handlers.len(),
            "Built interception chain"
        );

        Ok(InterceptionChain::new(
            handlers,
            interception_type,
            Arc::clone(&self.target),
            method,
        ))
    }
}

impl fmt::Debug for InterceptedInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptedInstance")
            .field("class", self.class.name())
            .field("interceptors", &self.interceptors.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Wraps targets in [`InterceptedInstance`]s using the registered models.
pub struct ProxyCreator {
    registry: Arc<InterceptorRegistry>,
    descriptors: Arc<DescriptorRegistry>,
    instantiator: Arc<dyn InterceptorInstantiator>,
}

impl ProxyCreator {
    pub fn new(registry: Arc<InterceptorRegistry>, descriptors: Arc<DescriptorRegistry>) -> Self {
        Self {
            registry,
            descriptors,
            instantiator: Arc::new(FactoryInstantiator),
        }
    }

    pub fn with_instantiator(mut self, instantiator: Arc<dyn InterceptorInstantiator>) -> Self {
        self.instantiator = instantiator;
        self
    }

    pub fn registry(&self) -> &Arc<InterceptorRegistry> {
        &self.registry
    }

    pub fn descriptors(&self) -> &Arc<DescriptorRegistry> {
        &self.descriptors
    }

    /// Decorate an existing target. Classes without a registered model get an
    /// empty one, so only their own callbacks apply.
    pub fn create(&self, target: Instance, class: &Arc<ClassMetadata>) -> Result<InterceptedInstance> {
        let model = self
            .registry
            .get(class.name())
            .unwrap_or_else(|| Arc::new(InterceptionModel::new(Arc::clone(class))));
        InterceptedInstance::new(
            target,
            Arc::clone(class),
            model,
            &self.descriptors,
            self.instantiator.as_ref(),
        )
    }

    /// Create a target through its class factory, decorate it and run its
    /// post-construct chain.
    pub fn instantiate(&self, class: &Arc<ClassMetadata>) -> Result<InterceptedInstance> {
        let target = class.instantiate()?;
        let instance = self.create(target, class)?;
        instance.post_construct()?;
        Ok(instance)
    }
}
