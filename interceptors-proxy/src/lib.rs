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

//! Call-interception boundary
//!
//! Wraps a target instance in an [`InterceptedInstance`] decorator. Every
//! business call and lifecycle transition made through the decorator is
//! resolved against the class's interception model and executed as an
//! interception chain.
//!
//! - [`InterceptorRegistry`]: interception models per intercepted class
//! - [`ProxyCreator`]: builds decorators from the registry
//! - [`InterceptorInstantiator`]: how interceptor instances are created
//! - [`ReentrancyGuard`]: keeps nested self-calls out of the chain
//!
//! # Example
//!
//! ```rust,ignore
//! let registry = Arc::new(InterceptorRegistry::new());
//! registry.register_config(&team_class, &InterceptionConfig::load("team.toml")?, &interceptors)?;
//!
//! let creator = ProxyCreator::new(registry, Arc::new(DescriptorRegistry::new()));
//! let team = creator.instantiate(&team_class)?;
//! let name = team.invoke(&MethodSelector::no_args("getName"), vec![])?;
//! team.pre_destroy()?;
//! ```

mod guard;
mod instantiator;
mod proxy;
mod registry;

pub use guard::{InProgress, ReentrancyGuard};
pub use instantiator::{FactoryInstantiator, InterceptorInstantiator, PreparedInstantiator};
pub use proxy::{InterceptedInstance, ProxyCreator};
pub use registry::{ClassInterceptionModel, ClassInterceptionModelBuilder, InterceptorRegistry};
