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

//! Interception types, slot types and type identities.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Dynamic argument and result payload.
pub type Value = serde_json::Value;

/// Name of the common root type every hierarchy ends in.
pub const ROOT_TYPE_NAME: &str = "Object";

/// A hook point where interceptors can be attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterceptionType {
    /// Wraps a business operation.
    AroundInvoke,
    /// Wraps a timer callback.
    AroundTimeout,
    /// After the entity has been constructed.
    PostConstruct,
    /// Before the entity is discarded.
    PreDestroy,
    /// After the entity has been restored from passivation.
    PostActivate,
    /// Before the entity is passivated.
    PrePassivate,
}

impl InterceptionType {
    /// Every supported interception type, in declaration order.
    pub const ALL: [InterceptionType; 6] = [
        InterceptionType::AroundInvoke,
        InterceptionType::AroundTimeout,
        InterceptionType::PostConstruct,
        InterceptionType::PreDestroy,
        InterceptionType::PostActivate,
        InterceptionType::PrePassivate,
    ];

    /// Lifecycle types resolve without an operation selector.
    pub fn is_lifecycle(self) -> bool {
        !matches!(
            self,
            InterceptionType::AroundInvoke | InterceptionType::AroundTimeout
        )
    }

    /// Number of parameters a callback of this type must declare.
    pub fn callback_arity(self, for_target: bool) -> usize {
        if self.is_lifecycle() && for_target {
            0
        } else {
            1
        }
    }

    /// Return type a callback of this type must declare.
    pub fn callback_return_type(self) -> ValueType {
        if self.is_lifecycle() {
            ValueType::Void
        } else {
            ValueType::Any
        }
    }

    /// Name of the marker carried by callbacks of this type.
    pub fn marker_name(self) -> &'static str {
        match self {
            InterceptionType::AroundInvoke => "AroundInvoke",
            InterceptionType::AroundTimeout => "AroundTimeout",
            InterceptionType::PostConstruct => "PostConstruct",
            InterceptionType::PreDestroy => "PreDestroy",
            InterceptionType::PostActivate => "PostActivate",
            InterceptionType::PrePassivate => "PrePassivate",
        }
    }
}

impl fmt::Display for InterceptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker_name())
    }
}

/// Declared type of a parameter or return slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Void,
    Bool,
    Integer,
    Float,
    String,
    Array,
    Object,
    /// The universal object type; accepts any value including null.
    Any,
    /// The invocation-context capability handed to interceptor callbacks.
    Context,
}

impl ValueType {
    /// Primitive-like slots cannot hold null.
    pub fn is_primitive(self) -> bool {
        matches!(self, ValueType::Bool | ValueType::Integer | ValueType::Float)
    }

    /// Whether `value` can be stored in a slot of this type.
    pub fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (ValueType::Void | ValueType::Context, _) => false,
            (ValueType::Any, _) => true,
            (slot, Value::Null) => !slot.is_primitive(),
            (ValueType::Bool, Value::Bool(_)) => true,
            (ValueType::Integer, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (ValueType::Float, Value::Number(_)) => true,
            (ValueType::String, Value::String(_)) => true,
            (ValueType::Array, Value::Array(_)) => true,
            (ValueType::Object, Value::Object(_)) => true,
            _ => false,
        }
    }

    /// Slot type describing a runtime value, used in diagnostics.
    pub fn of(value: &Value) -> &'static str {
        match value {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(n) if n.is_f64() => "float",
            Value::Number(_) => "integer",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Void => "void",
            ValueType::Bool => "bool",
            ValueType::Integer => "integer",
            ValueType::Float => "float",
            ValueType::String => "string",
            ValueType::Array => "array",
            ValueType::Object => "object",
            ValueType::Any => "any",
            ValueType::Context => "context",
        };
        f.write_str(name)
    }
}

/// Identity of a declared type (a target class or an interceptor class).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct TypeName(Arc<str>);

impl TypeName {
    pub fn new(name: impl AsRef<str>) -> Self {
        TypeName(Arc::from(name.as_ref()))
    }

    /// The common root sentinel.
    pub fn root() -> Self {
        TypeName::new(ROOT_TYPE_NAME)
    }

    pub fn is_root(&self) -> bool {
        &*self.0 == ROOT_TYPE_NAME
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        TypeName::new(name)
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        TypeName(Arc::from(name))
    }
}

impl From<TypeName> for String {
    fn from(name: TypeName) -> Self {
        name.0.to_string()
    }
}

impl AsRef<str> for TypeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lifecycle_partition() {
        let lifecycle: Vec<_> = InterceptionType::ALL
            .iter()
            .filter(|t| t.is_lifecycle())
            .collect();
        assert_eq!(lifecycle.len(), 4);
        assert!(!InterceptionType::AroundInvoke.is_lifecycle());
        assert!(!InterceptionType::AroundTimeout.is_lifecycle());
    }

    #[test]
    fn test_callback_shape_rules() {
        assert_eq!(InterceptionType::PostConstruct.callback_arity(true), 0);
        assert_eq!(InterceptionType::PostConstruct.callback_arity(false), 1);
        assert_eq!(InterceptionType::AroundInvoke.callback_arity(true), 1);
        assert_eq!(
            InterceptionType::PreDestroy.callback_return_type(),
            ValueType::Void
        );
        assert_eq!(
            InterceptionType::AroundTimeout.callback_return_type(),
            ValueType::Any
        );
    }

    #[test]
    fn test_null_only_in_reference_slots() {
        assert!(!ValueType::Integer.accepts(&Value::Null));
        assert!(!ValueType::Bool.accepts(&Value::Null));
        assert!(ValueType::String.accepts(&Value::Null));
        assert!(ValueType::Any.accepts(&Value::Null));
    }

    #[test]
    fn test_value_assignability() {
        assert!(ValueType::Integer.accepts(&json!(3)));
        assert!(!ValueType::Integer.accepts(&json!(3.5)));
        assert!(ValueType::Float.accepts(&json!(3)));
        assert!(ValueType::String.accepts(&json!("x")));
        assert!(!ValueType::String.accepts(&json!(1)));
        assert!(ValueType::Any.accepts(&json!({"a": 1})));
        assert!(!ValueType::Void.accepts(&json!(1)));
    }

    #[test]
    fn test_interception_type_serde() {
        let t: InterceptionType = serde_json::from_str("\"post_construct\"").unwrap();
        assert_eq!(t, InterceptionType::PostConstruct);
        assert_eq!(t.to_string(), "PostConstruct");
    }

    #[test]
    fn test_type_name_root() {
        assert!(TypeName::root().is_root());
        assert!(!TypeName::from("FootballTeam").is_root());
        let name: TypeName = serde_json::from_str("\"Leaf\"").unwrap();
        assert_eq!(name.as_str(), "Leaf");
    }
}
