//! Arithmetic operators (spec.md §4.4).
//!
//! `+` is overloaded: numbers add, strings concatenate, and class instances
//! dispatch to `__add__`. `-`, `*`, `/` only make sense for numbers. Integer
//! overflow and division by zero both trap into `ArithmeticError` rather
//! than wrapping or panicking (an Open Question resolved in SPEC_FULL.md).

use std::rc::Rc;

use crate::{
    context::Context,
    error::{MythonError, MythonResult},
    value::{ObjectHolder, Value},
};

fn type_error(op: &str, a: &ObjectHolder, b: &ObjectHolder) -> MythonError {
    MythonError::type_error(format!(
        "unsupported operand types for {op}: {} and {}",
        kind_name(a),
        kind_name(b)
    ))
}

fn kind_name(holder: &ObjectHolder) -> &'static str {
    match holder.value() {
        Value::None => "None",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Bool(_) => "bool",
        Value::Class(_) => "class",
        Value::ClassInstance(_) => "instance",
    }
}

/// `a + b`: numeric addition, string concatenation, or `__add__` dispatch.
pub fn add(a: &ObjectHolder, b: &ObjectHolder, ctx: &mut Context<'_>) -> MythonResult<ObjectHolder> {
    match (a.value(), b.value()) {
        (Value::Number(x), Value::Number(y)) => x
            .checked_add(*y)
            .map(|sum| ObjectHolder::own(Value::Number(sum)))
            .ok_or_else(|| MythonError::arithmetic("integer overflow in +")),
        (Value::String(x), Value::String(y)) => {
            let mut out = String::with_capacity(x.len() + y.len());
            out.push_str(x);
            out.push_str(y);
            Ok(ObjectHolder::own(Value::String(out.into())))
        }
        (Value::ClassInstance(inst), _) if inst.class.has_method("__add__") => {
            let inst = Rc::clone(inst);
            crate::class::Instance::call(&inst, "__add__", vec![b.clone()], ctx)
        }
        _ => Err(type_error("+", a, b)),
    }
}

pub fn sub(a: &ObjectHolder, b: &ObjectHolder) -> MythonResult<ObjectHolder> {
    match (a.value(), b.value()) {
        (Value::Number(x), Value::Number(y)) => x
            .checked_sub(*y)
            .map(|diff| ObjectHolder::own(Value::Number(diff)))
            .ok_or_else(|| MythonError::arithmetic("integer overflow in -")),
        _ => Err(type_error("-", a, b)),
    }
}

pub fn mult(a: &ObjectHolder, b: &ObjectHolder) -> MythonResult<ObjectHolder> {
    match (a.value(), b.value()) {
        (Value::Number(x), Value::Number(y)) => x
            .checked_mul(*y)
            .map(|prod| ObjectHolder::own(Value::Number(prod)))
            .ok_or_else(|| MythonError::arithmetic("integer overflow in *")),
        _ => Err(type_error("*", a, b)),
    }
}

pub fn div(a: &ObjectHolder, b: &ObjectHolder) -> MythonResult<ObjectHolder> {
    match (a.value(), b.value()) {
        (Value::Number(_), Value::Number(0)) => Err(MythonError::arithmetic("division by zero")),
        (Value::Number(x), Value::Number(y)) => x
            .checked_div(*y)
            .map(|q| ObjectHolder::own(Value::Number(q)))
            .ok_or_else(|| MythonError::arithmetic("integer overflow in /")),
        _ => Err(type_error("/", a, b)),
    }
}
