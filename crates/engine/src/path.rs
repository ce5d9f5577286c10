// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dotted-path resolution against the pipeline roots
//!
//! Paths resolve against four roots: the execution context, the ambient
//! input (`input`/`output`), the bound object (`this`), and the container
//! registry for any other head. Numeric, quoted and boolean heads are
//! literals and stop resolution.

use crate::container::Container;
use crate::error::RuntimeError;
use oxbow_core::{LiteralKind, Resolved, Value};
use std::sync::Arc;

/// Mutable view over the three value roots a pipeline manipulates.
pub struct Scope<'a> {
    pub context: &'a mut Value,
    pub input: &'a mut Value,
    pub this: &'a mut Value,
}

impl<'a> Scope<'a> {
    pub fn new(context: &'a mut Value, input: &'a mut Value, this: &'a mut Value) -> Self {
        Self {
            context,
            input,
            this,
        }
    }
}

/// Classify a literal step. Detection looks at the head token so dotted
/// forms like `2.5` read as one number; the value is taken from the whole
/// step.
pub fn build_literal(step: &str) -> Option<Resolved> {
    let trimmed = step.trim();
    let head = trimmed.split('.').next().unwrap_or("").trim();
    if head.is_empty() {
        return None;
    }
    if head.chars().all(|c| c.is_ascii_digit()) {
        let value = trimmed
            .parse::<f64>()
            .ok()
            .or_else(|| head.parse::<f64>().ok())?;
        return Some(Resolved::literal(
            LiteralKind::Number,
            step,
            Value::Number(value),
        ));
    }
    for quote in ['"', '\''] {
        if let Some(rest) = trimmed.strip_prefix(quote) {
            let inner = rest.strip_suffix(quote).unwrap_or(rest);
            return Some(Resolved::literal(
                LiteralKind::String,
                step,
                Value::String(inner.to_string()),
            ));
        }
    }
    match trimmed {
        "true" => Some(Resolved::literal(LiteralKind::Bool, step, Value::Bool(true))),
        "false" => Some(Resolved::literal(
            LiteralKind::Bool,
            step,
            Value::Bool(false),
        )),
        _ => None,
    }
}

/// Normalize an empty head: a leading dot means `this`, otherwise the
/// context.
fn normalize_head<'s>(head: &'s str, step: &str) -> &'s str {
    if head.is_empty() {
        if step.starts_with('.') {
            "this"
        } else {
            "context"
        }
    } else {
        head
    }
}

/// Resolve a dotted path to a tagged value.
///
/// A chain that breaks before the final token fails with `PathNotFound`;
/// breaking at the final token yields an absent reference. Callables come
/// back already bound to their owning object.
pub fn resolve_path_with_type(
    container: &Arc<Container>,
    scope: &Scope<'_>,
    step: &str,
) -> Result<Resolved, RuntimeError> {
    if let Some(literal) = build_literal(step) {
        return Ok(literal);
    }

    let trimmed = step.trim();
    let tokens: Vec<&str> = trimmed.split('.').collect();
    let head = normalize_head(tokens.first().map(|t| t.trim()).unwrap_or(""), trimmed);
    let remaining = tokens.get(1..).unwrap_or(&[]);

    let mut current: Value = match head {
        "input" | "output" => scope.input.clone(),
        "this" => scope.this.clone(),
        "context" => scope.context.clone(),
        name => match container.get(name, None) {
            Some(component) => Value::Handle(component),
            None => match scope.context.member(name) {
                Some(value) => value,
                None if remaining.is_empty() => {
                    return Ok(Resolved::reference(step, Value::Null));
                }
                None => return Err(RuntimeError::PathNotFound(step.to_string())),
            },
        },
    };

    for (index, raw) in remaining.iter().enumerate() {
        let key = raw.trim();
        match current.member(key) {
            Some(next) => current = next,
            None if index + 1 == remaining.len() => {
                return Ok(Resolved::reference(step, Value::Null));
            }
            None => return Err(RuntimeError::PathNotFound(step.to_string())),
        }
    }

    if matches!(current, Value::Function(_)) {
        Ok(Resolved::function(step, current))
    } else {
        Ok(Resolved::reference(step, current))
    }
}

/// Resolve a path to its value.
pub fn resolve_path(
    container: &Arc<Container>,
    scope: &Scope<'_>,
    step: &str,
) -> Result<Value, RuntimeError> {
    resolve_path_with_type(container, scope, step).map(|resolved| resolved.value)
}

/// Resolve the parent of an assignment target mutably. Mutation only
/// reaches the value roots; registered components are not assignable.
fn resolve_parent_mut<'s>(
    scope: &'s mut Scope<'_>,
    parents: &[&str],
    step: &str,
) -> Result<&'s mut Value, RuntimeError> {
    let Some((head_raw, rest)) = parents.split_first() else {
        // Single-token path: the parent is the context.
        return Ok(&mut *scope.context);
    };
    let head = normalize_head(head_raw.trim(), step);

    let mut current: &mut Value = match head {
        "input" | "output" => &mut *scope.input,
        "this" => &mut *scope.this,
        "context" => &mut *scope.context,
        name => scope
            .context
            .member_mut(name)
            .ok_or_else(|| RuntimeError::PathNotFound(step.to_string()))?,
    };
    for raw in rest {
        current = current
            .member_mut(raw.trim())
            .ok_or_else(|| RuntimeError::PathNotFound(step.to_string()))?;
    }
    Ok(current)
}

fn split_target<'s>(step: &'s str) -> Result<(Vec<&'s str>, &'s str), RuntimeError> {
    let trimmed = step.trim();
    let tokens: Vec<&str> = trimmed.split('.').collect();
    match tokens.split_last() {
        Some((last, parents)) => Ok((parents.to_vec(), last.trim())),
        None => Err(RuntimeError::PathNotFound(step.to_string())),
    }
}

/// Assign `value` at `step`.
pub fn set_value(scope: &mut Scope<'_>, step: &str, value: Value) -> Result<(), RuntimeError> {
    let (parents, last) = split_target(step)?;
    let parent = resolve_parent_mut(scope, &parents, step)?;
    if parent.set_member(last, value) {
        Ok(())
    } else {
        Err(RuntimeError::PathNotFound(step.to_string()))
    }
}

/// Add `delta` at `step`. Strings concatenate; numbers add, with an
/// absent target counting as zero.
pub fn inc_value(scope: &mut Scope<'_>, step: &str, delta: Value) -> Result<(), RuntimeError> {
    let (parents, last) = split_target(step)?;
    let parent = resolve_parent_mut(scope, &parents, step)?;
    let current = parent.member(last).unwrap_or_default();
    let next = if matches!(current, Value::String(_)) || matches!(delta, Value::String(_)) {
        Value::String(format!("{current}{delta}"))
    } else {
        Value::Number(current.as_number().unwrap_or(0.0) + delta.as_number().unwrap_or(0.0))
    };
    if parent.set_member(last, next) {
        Ok(())
    } else {
        Err(RuntimeError::PathNotFound(step.to_string()))
    }
}

/// Subtract `delta` at `step`. Non-numeric operands count as zero.
pub fn dec_value(scope: &mut Scope<'_>, step: &str, delta: Value) -> Result<(), RuntimeError> {
    let (parents, last) = split_target(step)?;
    let parent = resolve_parent_mut(scope, &parents, step)?;
    let current = parent.member(last).unwrap_or_default();
    let next = Value::Number(current.as_number().unwrap_or(0.0) - delta.as_number().unwrap_or(0.0));
    if parent.set_member(last, next) {
        Ok(())
    } else {
        Err(RuntimeError::PathNotFound(step.to_string()))
    }
}

/// Remove the leaf at `step`. Removing an absent leaf is a no-op.
pub fn delete_value(scope: &mut Scope<'_>, step: &str) -> Result<(), RuntimeError> {
    let (parents, last) = split_target(step)?;
    let parent = resolve_parent_mut(scope, &parents, step)?;
    parent.remove_member(last);
    Ok(())
}

/// Read a path, defaulting to the `floating` comparison slot.
pub fn get_value(
    container: &Arc<Container>,
    scope: &Scope<'_>,
    step: Option<&str>,
) -> Result<Value, RuntimeError> {
    resolve_path(container, scope, step.unwrap_or("floating"))
}

fn write_floating(scope: &mut Scope<'_>, result: bool) -> Result<bool, RuntimeError> {
    if scope.context.set_member("floating", Value::Bool(result)) {
        Ok(result)
    } else {
        Err(RuntimeError::PathNotFound("floating".to_string()))
    }
}

fn compare_paths(
    container: &Arc<Container>,
    scope: &Scope<'_>,
    left: &str,
    right: &str,
) -> Result<(Value, Value), RuntimeError> {
    let left = resolve_path(container, scope, left)?;
    let right = resolve_path(container, scope, right)?;
    Ok((left, right))
}

/// `left == right`, written into `context.floating`.
pub fn eq_value(
    container: &Arc<Container>,
    scope: &mut Scope<'_>,
    left: &str,
    right: &str,
) -> Result<bool, RuntimeError> {
    let (a, b) = compare_paths(container, scope, left, right)?;
    write_floating(scope, a == b)
}

/// `left != right`, written into `context.floating`.
pub fn neq_value(
    container: &Arc<Container>,
    scope: &mut Scope<'_>,
    left: &str,
    right: &str,
) -> Result<bool, RuntimeError> {
    let (a, b) = compare_paths(container, scope, left, right)?;
    write_floating(scope, a != b)
}

/// `left > right`, written into `context.floating`. Ordering is defined on
/// same-kind numbers and strings; mismatched kinds compare false.
pub fn gt_value(
    container: &Arc<Container>,
    scope: &mut Scope<'_>,
    left: &str,
    right: &str,
) -> Result<bool, RuntimeError> {
    let (a, b) = compare_paths(container, scope, left, right)?;
    write_floating(scope, a.compare(&b) == Some(std::cmp::Ordering::Greater))
}

/// `left >= right`, written into `context.floating`.
pub fn ge_value(
    container: &Arc<Container>,
    scope: &mut Scope<'_>,
    left: &str,
    right: &str,
) -> Result<bool, RuntimeError> {
    let (a, b) = compare_paths(container, scope, left, right)?;
    let result = matches!(
        a.compare(&b),
        Some(std::cmp::Ordering::Greater | std::cmp::Ordering::Equal)
    );
    write_floating(scope, result)
}

/// `left < right`, written into `context.floating`.
pub fn lt_value(
    container: &Arc<Container>,
    scope: &mut Scope<'_>,
    left: &str,
    right: &str,
) -> Result<bool, RuntimeError> {
    let (a, b) = compare_paths(container, scope, left, right)?;
    write_floating(scope, a.compare(&b) == Some(std::cmp::Ordering::Less))
}

/// `left <= right`, written into `context.floating`.
pub fn le_value(
    container: &Arc<Container>,
    scope: &mut Scope<'_>,
    left: &str,
    right: &str,
) -> Result<bool, RuntimeError> {
    let (a, b) = compare_paths(container, scope, left, right)?;
    let result = matches!(
        a.compare(&b),
        Some(std::cmp::Ordering::Less | std::cmp::Ordering::Equal)
    );
    write_floating(scope, result)
}

#[cfg(test)]
#[path = "path_tests.rs"]
mod tests;
