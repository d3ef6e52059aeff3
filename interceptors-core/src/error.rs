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

//! Interceptor error types

use crate::config::ConfigError;
use crate::types::{InterceptionType, TypeName, ValueType};
use thiserror::Error;

/// Result type for interception operations
pub type Result<T> = std::result::Result<T, InterceptorError>;

/// Errors raised while building interception metadata or running a chain
#[derive(Debug, Error)]
pub enum InterceptorError {
    // Model errors
    #[error("Invalid selector for {interception_type}: {reason}")]
    InvalidSelector {
        interception_type: InterceptionType,
        reason: &'static str,
    },

    #[error("Duplicate interceptor {interceptor} when binding on {interception_type}")]
    DuplicateInterceptor {
        interceptor: String,
        interception_type: InterceptionType,
    },

    #[error("Unknown interceptor: {0}")]
    UnknownInterceptor(String),

    // Descriptor errors
    #[error("Same interception type {interception_type} declared twice on {class}")]
    DuplicateInterceptionType {
        class: TypeName,
        interception_type: InterceptionType,
    },

    // Parameter override errors
    #[error("Wrong number of parameters for {method}: method has {expected}, attempting to set {actual}")]
    ArityMismatch {
        method: String,
        expected: usize,
        actual: usize,
    },

    #[error("Incompatible parameter {index} for {method}: expected {expected}, got {found}")]
    TypeMismatch {
        method: String,
        index: usize,
        expected: ValueType,
        found: String,
    },

    #[error("Illegal state: {0}")]
    IllegalState(String),

    // Boundary errors
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("No interceptor instance for {0}")]
    MissingInstance(TypeName),

    #[error("Cannot create instance of {class}: {reason}")]
    Instantiation { class: TypeName, reason: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// One level of invocation indirection around a failure raised by a
    /// callback or target operation.
    #[error("Invocation of {method} failed: {source}")]
    InvocationTarget {
        method: String,
        #[source]
        source: Box<InterceptorError>,
    },

    /// Failure raised by application code (interceptor or target).
    #[error(transparent)]
    Application(#[from] anyhow::Error),
}

impl InterceptorError {
    /// Wrap a failure raised behind an invocation primitive.
    pub fn invocation_target(method: impl Into<String>, source: InterceptorError) -> Self {
        InterceptorError::InvocationTarget {
            method: method.into(),
            source: Box::new(source),
        }
    }

    /// Strip exactly one level of invocation wrapping.
    pub fn unwrap_invocation(self) -> Self {
        match self {
            InterceptorError::InvocationTarget { source, .. } => *source,
            other => other,
        }
    }

    /// Shorthand for an application failure with a message.
    pub fn application(message: impl Into<String>) -> Self {
        InterceptorError::Application(anyhow::anyhow!(message.into()))
    }
}
