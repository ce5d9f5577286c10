// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The default compiler: line tokenization plus the cursor interpreter

use crate::compiler::PipelineCompiler;
use crate::container::Container;
use crate::error::RuntimeError;
use crate::path::{
    dec_value, delete_value, eq_value, ge_value, get_value, gt_value, inc_value, le_value,
    lt_value, neq_value, resolve_path, resolve_path_with_type, set_value, Scope,
};
use async_trait::async_trait;
use oxbow_core::{Component, Value};
use oxbow_dsl::{compile_lines, token_from_word, Instruction, OpKind, Token};
use std::collections::HashMap;
use std::sync::Arc;

/// Name of the compiler every container starts with.
pub const DEFAULT_COMPILER: &str = "default";

/// Per-invocation interpreter state. `vars` is the `context` path root;
/// the `floating` comparison slot lives inside it.
struct ExecutionContext {
    cursor: usize,
    labels: HashMap<String, usize>,
    vars: Value,
}

/// The built-in compiler and interpreter.
#[derive(Debug, Default)]
pub struct DefaultCompiler;

#[async_trait]
impl PipelineCompiler for DefaultCompiler {
    fn name(&self) -> &str {
        DEFAULT_COMPILER
    }

    fn compile(&self, lines: &[String]) -> Vec<Instruction> {
        compile_lines(lines)
    }

    async fn execute(
        &self,
        container: &Arc<Container>,
        compiled: &[Instruction],
        input: Value,
        this: Value,
        depth: usize,
    ) -> Result<Value, RuntimeError> {
        let mut state = ExecutionContext {
            cursor: 0,
            labels: find_labels(compiled),
            vars: Value::object(),
        };
        let mut input = input;
        let mut this = this;
        while state.cursor < compiled.len() {
            let instruction = &compiled[state.cursor];
            let result =
                run_instruction(container, &mut state, &mut input, &mut this, instruction, depth)
                    .await?;
            if let Some(value) = result {
                input = value;
            }
            state.cursor += 1;
        }
        Ok(input)
    }
}

/// Record the index of every `label` instruction before execution starts.
fn find_labels(compiled: &[Instruction]) -> HashMap<String, usize> {
    let mut labels = HashMap::new();
    for (index, instruction) in compiled.iter().enumerate() {
        if let Some(Token::Op(OpKind::Label)) = instruction.first() {
            if let Some(name) = instruction.operand(1) {
                labels.insert(name, index);
            }
        }
    }
    labels
}

/// Rebuild an instruction whose first word carries the `->` prefix.
fn strip_arrow(instruction: &Instruction) -> Option<Instruction> {
    let word = instruction.first()?.word();
    let rest = word.strip_prefix("->")?;
    let mut tokens = instruction.tokens.clone();
    if rest.is_empty() {
        tokens.remove(0);
    } else {
        tokens[0] = token_from_word(rest);
    }
    Some(Instruction::new(tokens))
}

async fn run_instruction(
    container: &Arc<Container>,
    state: &mut ExecutionContext,
    input: &mut Value,
    this: &mut Value,
    instruction: &Instruction,
    depth: usize,
) -> Result<Option<Value>, RuntimeError> {
    // `->` prefixed lines run only at the top level; callees skip them.
    let stripped;
    let instruction = match strip_arrow(instruction) {
        Some(plain) => {
            if depth > 0 {
                return Ok(None);
            }
            stripped = plain;
            &stripped
        }
        None => instruction,
    };

    let Some(first) = instruction.first() else {
        return Ok(None);
    };

    match first {
        Token::Comment(_) => Ok(None),
        Token::Op(op) => run_op(container, state, input, this, *op, instruction),
        Token::Call(name) => {
            let result = container
                .run_pipeline_at_depth(name, input.clone(), this.clone(), depth + 1)
                .await?;
            Ok(Some(result))
        }
        Token::Reference(path) => {
            let (resolved, args) = {
                let scope = Scope::new(&mut state.vars, &mut *input, &mut *this);
                let resolved = resolve_path_with_type(container, &scope, path)?;
                let mut args = Vec::new();
                for token in instruction.tokens.get(1..).unwrap_or(&[]) {
                    if token.is_comment() {
                        continue;
                    }
                    args.push(resolve_path_with_type(container, &scope, &token.word())?);
                }
                (resolved, args)
            };
            match resolved.value {
                Value::Function(callable) => Ok(Some(callable.call(input.clone(), args).await?)),
                Value::Handle(component) if component.runnable() => {
                    Ok(Some(component.run(input.clone(), args).await?))
                }
                Value::Null if !args.is_empty() => {
                    Err(RuntimeError::MethodNotFound(path.clone()))
                }
                value => Ok(Some(value)),
            }
        }
    }
}

fn run_op(
    container: &Arc<Container>,
    state: &mut ExecutionContext,
    input: &mut Value,
    this: &mut Value,
    op: OpKind,
    instruction: &Instruction,
) -> Result<Option<Value>, RuntimeError> {
    let a = instruction.operand(1);
    let b = instruction.operand(2);

    match op {
        OpKind::Label => Ok(None),
        OpKind::Goto => {
            jump(state, op, a)?;
            Ok(None)
        }
        OpKind::Je => {
            if floating(state) {
                jump(state, op, a)?;
            }
            Ok(None)
        }
        OpKind::Jne => {
            if !floating(state) {
                jump(state, op, a)?;
            }
            Ok(None)
        }
        OpKind::Get => {
            let scope = Scope::new(&mut state.vars, input, this);
            let value = get_value(container, &scope, a.as_deref())?;
            Ok(Some(value))
        }
        OpKind::Set => {
            let path = required(op, a)?;
            let value_path = required(op, b)?;
            let mut scope = Scope::new(&mut state.vars, input, this);
            let value = resolve_path(container, &scope, &value_path)?;
            set_value(&mut scope, &path, value)?;
            Ok(None)
        }
        OpKind::Delete => {
            let path = required(op, a)?;
            let mut scope = Scope::new(&mut state.vars, input, this);
            delete_value(&mut scope, &path)?;
            Ok(None)
        }
        OpKind::Inc | OpKind::Dec => {
            let path = required(op, a)?;
            let delta_path = b.unwrap_or_else(|| "1".to_string());
            let mut scope = Scope::new(&mut state.vars, input, this);
            let delta = resolve_path(container, &scope, &delta_path)?;
            if op == OpKind::Inc {
                inc_value(&mut scope, &path, delta)?;
            } else {
                dec_value(&mut scope, &path, delta)?;
            }
            Ok(None)
        }
        OpKind::Eq | OpKind::Neq | OpKind::Gt | OpKind::Ge | OpKind::Lt | OpKind::Le => {
            let left = required(op, a)?;
            let right = required(op, b)?;
            let mut scope = Scope::new(&mut state.vars, input, this);
            match op {
                OpKind::Eq => eq_value(container, &mut scope, &left, &right)?,
                OpKind::Neq => neq_value(container, &mut scope, &left, &right)?,
                OpKind::Gt => gt_value(container, &mut scope, &left, &right)?,
                OpKind::Ge => ge_value(container, &mut scope, &left, &right)?,
                OpKind::Lt => lt_value(container, &mut scope, &left, &right)?,
                OpKind::Le => le_value(container, &mut scope, &left, &right)?,
                _ => false,
            };
            Ok(None)
        }
    }
}

fn required(op: OpKind, operand: Option<String>) -> Result<String, RuntimeError> {
    operand.ok_or_else(|| RuntimeError::InvalidInstruction(format!("{op} needs an operand")))
}

fn floating(state: &ExecutionContext) -> bool {
    state
        .vars
        .member("floating")
        .map(|value| value.is_truthy())
        .unwrap_or(false)
}

/// Move the cursor onto the label; the main loop's increment lands
/// execution on the instruction after it.
fn jump(state: &mut ExecutionContext, op: OpKind, name: Option<String>) -> Result<(), RuntimeError> {
    let name = required(op, name)?;
    let target = state
        .labels
        .get(&name)
        .copied()
        .ok_or_else(|| RuntimeError::InvalidInstruction(format!("unknown label: {name}")))?;
    state.cursor = target;
    Ok(())
}

#[cfg(test)]
#[path = "interpreter_tests.rs"]
mod tests;
