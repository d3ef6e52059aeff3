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

//! Operation identity used as a binding key and for override detection.

use crate::types::{TypeName, ValueType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name plus parameter signature of an operation.
///
/// The declaring type only takes part in equality when it was explicitly
/// attached with [`MethodSelector::qualified`], which is how private
/// operations are kept apart from same-named operations on other levels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodSelector {
    name: String,
    #[serde(default)]
    parameter_types: Vec<ValueType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    declaring_type: Option<TypeName>,
}

impl MethodSelector {
    pub fn new(name: impl Into<String>, parameter_types: &[ValueType]) -> Self {
        Self {
            name: name.into(),
            parameter_types: parameter_types.to_vec(),
            declaring_type: None,
        }
    }

    /// Selector for an operation without parameters.
    pub fn no_args(name: impl Into<String>) -> Self {
        Self::new(name, &[])
    }

    /// Attach the declaring type so it takes part in equality.
    pub fn qualified(mut self, declaring_type: TypeName) -> Self {
        self.declaring_type = Some(declaring_type);
        self
    }

    /// Copy without the declaring type.
    pub fn unqualified(&self) -> Self {
        Self {
            name: self.name.clone(),
            parameter_types: self.parameter_types.clone(),
            declaring_type: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameter_types(&self) -> &[ValueType] {
        &self.parameter_types
    }

    pub fn declaring_type(&self) -> Option<&TypeName> {
        self.declaring_type.as_ref()
    }

    pub fn arity(&self) -> usize {
        self.parameter_types.len()
    }
}

impl fmt::Display for MethodSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(declaring_type) = &self.declaring_type {
            write!(f, "{}::", declaring_type)?;
        }
        write!(f, "{}(", self.name)?;
        for (i, ty) in self.parameter_types.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", ty)?;
        }
        f.write_str(")")
    }
}
