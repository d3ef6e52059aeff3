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

//! Precomputed class and method metadata.
//!
//! Types register their operations once through [`ClassMetadata::builder`];
//! the descriptor builder and the chain executor only ever read these tables.
//! Each [`MethodMetadata`] carries its own invocation primitive, so no runtime
//! introspection is needed to call it.

use crate::chain::InvocationContext;
use crate::error::{InterceptorError, Result};
use crate::selector::MethodSelector;
use crate::types::{InterceptionType, TypeName, Value, ValueType};
use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter;
use std::sync::Arc;

/// A live target or interceptor object.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Arguments handed to an invocation primitive.
pub enum MethodArgs<'a> {
    /// Zero-parameter callbacks.
    None,
    /// Business operation arguments.
    Values(&'a [Value]),
    /// Interceptor callbacks receive the invocation context.
    Context(&'a mut dyn InvocationContext),
}

type Invoker = Arc<dyn Fn(&Instance, MethodArgs<'_>) -> Result<Value> + Send + Sync>;

type Factory = Arc<dyn Fn() -> Result<Instance> + Send + Sync>;

fn downcast<'i, T: Any>(instance: &'i Instance, method: &str) -> Result<&'i T> {
    (**instance).downcast_ref::<T>().ok_or_else(|| {
        InterceptorError::IllegalState(format!(
            "{} invoked on an instance that is not a {}",
            method,
            std::any::type_name::<T>()
        ))
    })
}

fn wrong_arguments(method: &str, expected: &str) -> InterceptorError {
    InterceptorError::IllegalState(format!("{} expects {}", method, expected))
}

/// Metadata for a single declared operation.
pub struct MethodMetadata {
    name: String,
    parameter_types: Vec<ValueType>,
    return_type: ValueType,
    markers: Vec<InterceptionType>,
    private: bool,
    declaring_type: TypeName,
    invoker: Invoker,
}

impl MethodMetadata {
    /// Start describing an operation with an arbitrary shape.
    pub fn builder(name: impl Into<String>) -> MethodMetadataBuilder {
        MethodMetadataBuilder::new(name)
    }

    /// A business operation on `T`.
    pub fn operation<T, F>(
        name: impl Into<String>,
        parameter_types: &[ValueType],
        return_type: ValueType,
        f: F,
    ) -> MethodMetadataBuilder
    where
        T: Any + Send + Sync,
        F: Fn(&T, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        let name = name.into();
        let label = name.clone();
        MethodMetadataBuilder::new(name)
            .parameters(parameter_types)
            .returns(return_type)
            .handler(move |instance, args| {
                let this = downcast::<T>(instance, &label)?;
                match args {
                    MethodArgs::Values(values) => f(this, values),
                    MethodArgs::None => f(this, &[]),
                    MethodArgs::Context(_) => Err(wrong_arguments(&label, "argument values")),
                }
            })
    }

    /// An around-invoke callback taking the invocation context.
    pub fn around_invoke<T, F>(name: impl Into<String>, f: F) -> MethodMetadataBuilder
    where
        T: Any + Send + Sync,
        F: Fn(&T, &mut dyn InvocationContext) -> Result<Value> + Send + Sync + 'static,
    {
        Self::around(InterceptionType::AroundInvoke, name, f)
    }

    /// An around-timeout callback taking the invocation context.
    pub fn around_timeout<T, F>(name: impl Into<String>, f: F) -> MethodMetadataBuilder
    where
        T: Any + Send + Sync,
        F: Fn(&T, &mut dyn InvocationContext) -> Result<Value> + Send + Sync + 'static,
    {
        Self::around(InterceptionType::AroundTimeout, name, f)
    }

    fn around<T, F>(interception_type: InterceptionType, name: impl Into<String>, f: F) -> MethodMetadataBuilder
    where
        T: Any + Send + Sync,
        F: Fn(&T, &mut dyn InvocationContext) -> Result<Value> + Send + Sync + 'static,
    {
        let name = name.into();
        let label = name.clone();
        MethodMetadataBuilder::new(name)
            .parameters(&[ValueType::Context])
            .returns(ValueType::Any)
            .marker(interception_type)
            .handler(move |instance, args| {
                let this = downcast::<T>(instance, &label)?;
                match args {
                    MethodArgs::Context(ctx) => f(this, ctx),
                    _ => Err(wrong_arguments(&label, "an invocation context")),
                }
            })
    }

    /// A lifecycle callback declared on an interceptor class.
    pub fn lifecycle<T, F>(
        interception_type: InterceptionType,
        name: impl Into<String>,
        f: F,
    ) -> MethodMetadataBuilder
    where
        T: Any + Send + Sync,
        F: Fn(&T, &mut dyn InvocationContext) -> Result<()> + Send + Sync + 'static,
    {
        let name = name.into();
        let label = name.clone();
        MethodMetadataBuilder::new(name)
            .parameters(&[ValueType::Context])
            .returns(ValueType::Void)
            .marker(interception_type)
            .handler(move |instance, args| {
                let this = downcast::<T>(instance, &label)?;
                match args {
                    MethodArgs::Context(ctx) => f(this, ctx).map(|()| Value::Null),
                    _ => Err(wrong_arguments(&label, "an invocation context")),
                }
            })
    }

    /// A zero-argument lifecycle callback declared on the target class itself.
    pub fn target_lifecycle<T, F>(
        interception_type: InterceptionType,
        name: impl Into<String>,
        f: F,
    ) -> MethodMetadataBuilder
    where
        T: Any + Send + Sync,
        F: Fn(&T) -> Result<()> + Send + Sync + 'static,
    {
        let name = name.into();
        let label = name.clone();
        MethodMetadataBuilder::new(name)
            .returns(ValueType::Void)
            .marker(interception_type)
            .handler(move |instance, _args| {
                let this = downcast::<T>(instance, &label)?;
                f(this).map(|()| Value::Null)
            })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameter_types(&self) -> &[ValueType] {
        &self.parameter_types
    }

    pub fn return_type(&self) -> ValueType {
        self.return_type
    }

    pub fn declaring_type(&self) -> &TypeName {
        &self.declaring_type
    }

    pub fn is_private(&self) -> bool {
        self.private
    }

    pub fn markers(&self) -> &[InterceptionType] {
        &self.markers
    }

    pub fn has_marker(&self, interception_type: InterceptionType) -> bool {
        self.markers.contains(&interception_type)
    }

    /// Unqualified selector, the key used for bindings.
    pub fn selector(&self) -> MethodSelector {
        MethodSelector::new(self.name.clone(), &self.parameter_types)
    }

    /// Override identity: private operations cannot be overridden, so they are
    /// qualified by their declaring type.
    pub fn reference(&self) -> MethodSelector {
        let selector = self.selector();
        if self.private {
            selector.qualified(self.declaring_type.clone())
        } else {
            selector
        }
    }

    /// Operations that are not themselves interceptor callbacks get intercepted.
    pub fn is_interception_candidate(&self) -> bool {
        self.markers.is_empty() && !self.declaring_type.is_root()
    }

    /// Call the operation. Failures come back wrapped in exactly one
    /// [`InterceptorError::InvocationTarget`] level.
    pub fn invoke(&self, instance: &Instance, args: MethodArgs<'_>) -> Result<Value> {
        (self.invoker)(instance, args)
            .map_err(|e| InterceptorError::invocation_target(self.to_string(), e))
    }
}

impl fmt::Display for MethodMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.declaring_type, self.selector())
    }
}

impl fmt::Debug for MethodMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodMetadata")
            .field("name", &self.name)
            .field("parameter_types", &self.parameter_types)
            .field("return_type", &self.return_type)
            .field("markers", &self.markers)
            .field("private", &self.private)
            .field("declaring_type", &self.declaring_type)
            .finish()
    }
}

/// Builder for [`MethodMetadata`]. The declaring type is assigned when the
/// method is added to a class.
pub struct MethodMetadataBuilder {
    name: String,
    parameter_types: Vec<ValueType>,
    return_type: ValueType,
    markers: Vec<InterceptionType>,
    private: bool,
    invoker: Option<Invoker>,
}

impl MethodMetadataBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameter_types: Vec::new(),
            return_type: ValueType::Void,
            markers: Vec::new(),
            private: false,
            invoker: None,
        }
    }

    pub fn parameters(mut self, parameter_types: &[ValueType]) -> Self {
        self.parameter_types = parameter_types.to_vec();
        self
    }

    pub fn returns(mut self, return_type: ValueType) -> Self {
        self.return_type = return_type;
        self
    }

    /// Attach an interception marker.
    pub fn marker(mut self, interception_type: InterceptionType) -> Self {
        if !self.markers.contains(&interception_type) {
            self.markers.push(interception_type);
        }
        self
    }

    /// Mark the operation private (not overridable).
    pub fn private(mut self) -> Self {
        self.private = true;
        self
    }

    /// Set the raw invocation primitive.
    pub fn handler<F>(mut self, f: F) -> Self
    where
        F: Fn(&Instance, MethodArgs<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        self.invoker = Some(Arc::new(f));
        self
    }

    #[cfg(test)]
    pub(crate) fn build_for_test(self, declaring_type: &str) -> MethodMetadata {
        self.build(TypeName::from(declaring_type))
    }

    fn build(self, declaring_type: TypeName) -> MethodMetadata {
        let invoker = self.invoker.unwrap_or_else(|| {
            let name = self.name.clone();
            Arc::new(move |_: &Instance, _: MethodArgs<'_>| {
                Err(InterceptorError::IllegalState(format!(
                    "{} has no invocation primitive",
                    name
                )))
            })
        });
        MethodMetadata {
            name: self.name,
            parameter_types: self.parameter_types,
            return_type: self.return_type,
            markers: self.markers,
            private: self.private,
            declaring_type,
            invoker,
        }
    }
}

/// One level of a type hierarchy.
pub struct ClassMetadata {
    name: TypeName,
    methods: Vec<Arc<MethodMetadata>>,
    superclass: Option<Arc<ClassMetadata>>,
    factory: Option<Factory>,
}

impl ClassMetadata {
    pub fn builder(name: impl Into<TypeName>) -> ClassMetadataBuilder {
        ClassMetadataBuilder {
            name: name.into(),
            methods: Vec::new(),
            superclass: None,
            factory: None,
        }
    }

    /// The common root every hierarchy implicitly ends in.
    pub fn root() -> Arc<ClassMetadata> {
        Arc::new(ClassMetadata {
            name: TypeName::root(),
            methods: Vec::new(),
            superclass: None,
            factory: None,
        })
    }

    pub fn name(&self) -> &TypeName {
        &self.name
    }

    /// Operations declared at this level, in declaration order.
    pub fn declared_methods(&self) -> &[Arc<MethodMetadata>] {
        &self.methods
    }

    pub fn superclass(&self) -> Option<&Arc<ClassMetadata>> {
        self.superclass.as_ref()
    }

    pub fn is_root(&self) -> bool {
        self.name.is_root()
    }

    /// Levels from the most-derived type up to, but excluding, the root.
    pub fn hierarchy(&self) -> impl Iterator<Item = &ClassMetadata> {
        iter::successors(Some(self), |class| class.superclass.as_deref())
            .take_while(|class| !class.is_root())
    }

    /// Resolve an operation through the hierarchy, most-derived first.
    pub fn find_method(&self, selector: &MethodSelector) -> Option<Arc<MethodMetadata>> {
        let wanted = selector.unqualified();
        self.hierarchy()
            .flat_map(|class| class.methods.iter())
            .find(|method| {
                method.selector() == wanted
                    && selector
                        .declaring_type()
                        .map_or(true, |ty| ty == method.declaring_type())
            })
            .cloned()
    }

    /// Create a fresh instance through the registered factory.
    pub fn instantiate(&self) -> Result<Instance> {
        match &self.factory {
            Some(factory) => factory(),
            None => Err(InterceptorError::Instantiation {
                class: self.name.clone(),
                reason: "no factory registered".to_string(),
            }),
        }
    }
}

impl PartialEq for ClassMetadata {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ClassMetadata {}

impl Hash for ClassMetadata {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Debug for ClassMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassMetadata")
            .field("name", &self.name)
            .field("methods", &self.methods.len())
            .field("superclass", &self.superclass.as_ref().map(|s| s.name()))
            .finish()
    }
}

impl fmt::Display for ClassMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Builder for [`ClassMetadata`].
pub struct ClassMetadataBuilder {
    name: TypeName,
    methods: Vec<MethodMetadataBuilder>,
    superclass: Option<Arc<ClassMetadata>>,
    factory: Option<Factory>,
}

impl ClassMetadataBuilder {
    pub fn extends(mut self, superclass: Arc<ClassMetadata>) -> Self {
        self.superclass = Some(superclass);
        self
    }

    pub fn method(mut self, method: MethodMetadataBuilder) -> Self {
        self.methods.push(method);
        self
    }

    /// Register how fresh instances are created.
    pub fn factory<T, F>(mut self, f: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.factory = Some(Arc::new(move || Ok(Arc::new(f()) as Instance)));
        self
    }

    pub fn build(self) -> Arc<ClassMetadata> {
        let name = self.name;
        let methods = self
            .methods
            .into_iter()
            .map(|m| Arc::new(m.build(name.clone())))
            .collect();
        Arc::new(ClassMetadata {
            name,
            methods,
            superclass: self.superclass,
            factory: self.factory,
        })
    }
}
