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

//! Declarative interceptor bindings.

use crate::error::{InterceptorError, Result};
use crate::model::InterceptionModelBuilder;
use crate::selector::MethodSelector;
use crate::types::InterceptionType;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Interceptor bindings for one entity.
///
/// # Example TOML Configuration
///
/// ```toml
/// entity = "FootballTeam"
///
/// [[bindings]]
/// interceptors = ["AuditInterceptor"]
///
/// [[bindings]]
/// type = "around_invoke"
/// method = { name = "getName" }
/// interceptors = ["TimingInterceptor"]
///
/// [[ignore_global]]
/// name = "getName"
/// ```
///
/// A binding without `type` applies globally to every interception type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterceptionConfig {
    /// Name of the intercepted entity, informational.
    #[serde(default)]
    pub entity: Option<String>,

    #[serde(default)]
    pub bindings: Vec<BindingDefinition>,

    /// Operations that skip global interceptors.
    #[serde(default)]
    pub ignore_global: Vec<MethodSelector>,
}

impl InterceptionConfig {
    pub fn from_json(json: &str) -> std::result::Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    pub fn from_toml(toml_str: &str) -> std::result::Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Load a `.toml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> std::result::Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml(&content)?,
            Some("json") => Self::from_json(&content)?,
            other => {
                return Err(ConfigError::UnsupportedFormat(
                    other.unwrap_or_default().to_string(),
                ))
            }
        };
        debug!(path = %path.display(), bindings = config.bindings.len(), "Loaded interception config");
        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        for (i, binding) in self.bindings.iter().enumerate() {
            binding.validate().map_err(|e| ConfigError::InvalidBinding {
                index: i,
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// Feed every binding into `builder`, mapping interceptor names through
    /// `resolve_id`.
    pub fn apply<T, I, F>(&self, builder: &mut InterceptionModelBuilder<T, I>, resolve_id: F) -> Result<()>
    where
        I: Clone + Eq + Hash + fmt::Display,
        F: Fn(&str) -> Option<I>,
    {
        self.validate()?;

        for binding in &self.bindings {
            let ids = binding
                .interceptors
                .iter()
                .map(|name| {
                    resolve_id(name).ok_or_else(|| InterceptorError::UnknownInterceptor(name.clone()))
                })
                .collect::<Result<Vec<I>>>()?;

            match binding.interception_type {
                Some(t) => builder.intercept(t, binding.method.clone()).with(ids)?,
                None => builder.intercept_all().with(ids)?,
            }
        }

        for selector in &self.ignore_global {
            builder.ignore_global_interceptors(selector.clone());
        }
        Ok(())
    }
}

/// One `[[bindings]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindingDefinition {
    /// Interception type; every type when absent.
    #[serde(default, rename = "type")]
    pub interception_type: Option<InterceptionType>,

    /// Operation for a per-operation binding.
    #[serde(default)]
    pub method: Option<MethodSelector>,

    /// Interceptor names, outermost first.
    pub interceptors: Vec<String>,
}

impl BindingDefinition {
    /// Global binding for one interception type.
    pub fn global(interception_type: InterceptionType, interceptors: Vec<String>) -> Self {
        Self {
            interception_type: Some(interception_type),
            method: None,
            interceptors,
        }
    }

    /// Binding for a single operation.
    pub fn for_method(
        interception_type: InterceptionType,
        method: MethodSelector,
        interceptors: Vec<String>,
    ) -> Self {
        Self {
            interception_type: Some(interception_type),
            method: Some(method),
            interceptors,
        }
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.interceptors.is_empty() {
            return Err(ConfigError::EmptyInterceptorList);
        }

        match (self.interception_type, &self.method) {
            (None, Some(_)) => return Err(ConfigError::MethodWithoutType),
            (Some(t), Some(_)) if t.is_lifecycle() => {
                return Err(ConfigError::MethodOnLifecycleType(t))
            }
            _ => {}
        }

        let mut seen = HashSet::new();
        for name in &self.interceptors {
            if name.is_empty() {
                return Err(ConfigError::EmptyInterceptorName);
            }
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::DuplicateName(name.clone()));
            }
        }
        Ok(())
    }
}

/// Errors that can occur while loading interception configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported configuration format: {0:?}")]
    UnsupportedFormat(String),

    #[error("Invalid binding at index {index}: {reason}")]
    InvalidBinding { index: usize, reason: String },

    #[error("Interceptor list cannot be empty")]
    EmptyInterceptorList,

    #[error("Interceptor name cannot be empty")]
    EmptyInterceptorName,

    #[error("Interceptor {0} listed twice")]
    DuplicateName(String),

    #[error("A method binding needs an interception type")]
    MethodWithoutType,

    #[error("{0} interceptors cannot be bound to a method")]
    MethodOnLifecycleType(InterceptionType),
}
