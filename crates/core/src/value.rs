// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime value model

use crate::component::{Component, ComponentHandle, NativeFn};
use indexmap::IndexMap;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// A value manipulated by pipelines.
///
/// Data variants mirror JSON. `Function` carries a native callable, already
/// bound to its owning object; `Handle` carries a live registered component.
/// Objects preserve insertion order.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(IndexMap<String, Value>),
    Function(NativeFn),
    Handle(ComponentHandle),
}

impl Value {
    /// Create an empty object value.
    pub fn object() -> Self {
        Self::Object(IndexMap::new())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Truthiness used by conditional jumps: null, `false`, `0`, `NaN` and
    /// the empty string are falsy; everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::String(s) => !s.is_empty(),
            Self::Array(_) | Self::Object(_) | Self::Function(_) | Self::Handle(_) => true,
        }
    }

    /// Numeric coercion: numbers as-is, booleans as 0/1, strings that parse.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Look up a member by key: object fields, array indices, and component
    /// members (which may be bound methods). Returns an owned value.
    pub fn member(&self, key: &str) -> Option<Value> {
        match self {
            Self::Object(map) => map.get(key).cloned(),
            Self::Array(items) => {
                let index: usize = key.parse().ok()?;
                items.get(index).cloned()
            }
            Self::Handle(component) => component.member(key),
            _ => None,
        }
    }

    /// Mutable access to an object field or array element.
    pub fn member_mut(&mut self, key: &str) -> Option<&mut Value> {
        match self {
            Self::Object(map) => map.get_mut(key),
            Self::Array(items) => {
                let index: usize = key.parse().ok()?;
                items.get_mut(index)
            }
            _ => None,
        }
    }

    /// Assign a member. Object keys are inserted or replaced; array indices
    /// must address an existing element or the one-past-the-end slot.
    /// Returns false when the target cannot hold members.
    pub fn set_member(&mut self, key: &str, value: Value) -> bool {
        match self {
            Self::Object(map) => {
                map.insert(key.to_string(), value);
                true
            }
            Self::Array(items) => {
                let Ok(index) = key.parse::<usize>() else {
                    return false;
                };
                match index.cmp(&items.len()) {
                    Ordering::Less => {
                        items[index] = value;
                        true
                    }
                    Ordering::Equal => {
                        items.push(value);
                        true
                    }
                    Ordering::Greater => false,
                }
            }
            _ => false,
        }
    }

    /// Remove a member, returning it if present.
    pub fn remove_member(&mut self, key: &str) -> Option<Value> {
        match self {
            Self::Object(map) => map.shift_remove(key),
            Self::Array(items) => {
                let index: usize = key.parse().ok()?;
                if index < items.len() {
                    Some(items.remove(index))
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Ordering for `gt`/`ge`/`lt`/`le`: defined on number/number and
    /// string/string pairs only; mismatched kinds compare as none.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.partial_cmp(b),
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Build a value from parsed JSON.
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Self::from_json).collect())
            }
            serde_json::Value::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Self::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Project to JSON. Functions and component handles become null.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null | Self::Function(_) | Self::Handle(_) => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => number_to_json(*n),
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Array(items) => {
                serde_json::Value::Array(items.iter().map(Self::to_json).collect())
            }
            Self::Object(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

/// Integral floats serialize as integers so `{count: 3}` round-trips
/// without a trailing `.0`.
fn number_to_json(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < (i64::MAX as f64) {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => a.ptr_eq(b),
            (Self::Handle(a), Self::Handle(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "Null"),
            Self::Bool(b) => write!(f, "Bool({b})"),
            Self::Number(n) => write!(f, "Number({n})"),
            Self::String(s) => write!(f, "String({s:?})"),
            Self::Array(items) => f.debug_tuple("Array").field(items).finish(),
            Self::Object(map) => f.debug_tuple("Object").field(map).finish(),
            Self::Function(_) => write!(f, "Function"),
            Self::Handle(c) => write!(f, "Handle({})", c.name()),
        }
    }
}

impl fmt::Display for Value {
    /// Display form used for string concatenation and diagnostics.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{}", number_to_json(*n)),
            Self::String(s) => write!(f, "{s}"),
            Self::Array(_) | Self::Object(_) => write!(f, "{}", self.to_json()),
            Self::Function(_) => write!(f, "[function]"),
            Self::Handle(c) => write!(f, "[{}]", c.name()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

#[cfg(test)]
#[path = "value_tests.rs"]
mod tests;
