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

//! Interceptor resolution and chain execution
//!
//! Cross-cutting interceptors wrap the operations and lifecycle transitions
//! of a target entity. This crate covers:
//!
//! - **Interception model**: which interceptors apply to a call, global and
//!   per-operation bindings, ignore-global overrides
//! - **Descriptors**: which callbacks an interceptor class hierarchy
//!   contributes per interception type, base classes first
//! - **Chain execution**: running the callbacks around the target operation
//!   with `proceed` delegation and checked parameter replacement
//!
//! # Architecture
//!
//! ```text
//! call ──► InterceptionModel::resolve ──► [interceptor ids]
//!                                              │
//!                    DescriptorRegistry ◄──────┘ (one descriptor per class)
//!                                              │
//!      InterceptionChain [A, B, target-self] ──┴──► target operation
//! ```
//!
//! Types describe themselves once through [`ClassMetadata`]; nothing is
//! discovered at call time. Wiring a model to a live instance is the job of a
//! call-interception boundary built on top of this crate.
//!
//! # Example
//!
//! ```
//! use interceptors_core::{
//!     ClassMetadata, DescriptorRegistry, InterceptionChain, InterceptionType,
//!     InterceptorInvocation, MethodMetadata, Value, ValueType,
//! };
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! struct Team;
//! struct Uppercase;
//!
//! let team = ClassMetadata::builder("Team")
//!     .method(MethodMetadata::operation::<Team, _>(
//!         "getName", &[], ValueType::String, |_, _| Ok(json!("ajax")),
//!     ))
//!     .build();
//! let interceptor = ClassMetadata::builder("Uppercase")
//!     .method(MethodMetadata::around_invoke::<Uppercase, _>("around", |_, ctx| {
//!         let name = ctx.proceed()?;
//!         Ok(json!(name.as_str().unwrap_or_default().to_uppercase()))
//!     }))
//!     .build();
//!
//! let registry = DescriptorRegistry::new();
//! let handler = InterceptorInvocation::new(
//!     Arc::new(Uppercase),
//!     registry.interceptor_descriptor(&interceptor).unwrap(),
//! );
//! let chain = InterceptionChain::new(
//!     vec![handler],
//!     InterceptionType::AroundInvoke,
//!     Arc::new(Team),
//!     Some(Arc::clone(&team.declared_methods()[0])),
//! );
//! assert_eq!(chain.invoke(Vec::<Value>::new()).unwrap(), json!("AJAX"));
//! ```

pub mod chain;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod metadata;
pub mod model;
pub mod selector;
pub mod types;

pub use chain::{InterceptionChain, InterceptorInvocation, InvocationContext, SimpleInvocationContext};
pub use config::{BindingDefinition, ConfigError, InterceptionConfig};
pub use descriptor::{DescriptorRegistry, InterceptorDescriptor, InterceptorDescriptorBuilder, RegistryStats};
pub use error::{InterceptorError, Result};
pub use metadata::{ClassMetadata, ClassMetadataBuilder, Instance, MethodArgs, MethodMetadata, MethodMetadataBuilder};
pub use model::{InterceptionBinding, InterceptionModel, InterceptionModelBuilder};
pub use selector::MethodSelector;
pub use types::{InterceptionType, TypeName, Value, ValueType, ROOT_TYPE_NAME};
