//! Comparisons (spec.md §4.5).
//!
//! Only `<` and `==` are primitive: for numbers, strings and bools they
//! compare directly; for class instances they dispatch to `__lt__`/`__eq__`.
//! Every other comparison operator is derived from those two, matching the
//! original reference's composition (`a > b` is `b < a`, etc. — see
//! SPEC_FULL.md §3).

use std::rc::Rc;

use crate::{
    class::Instance,
    context::Context,
    error::{MythonError, MythonResult},
    value::{is_true, ObjectHolder, Value},
};

/// The comparison operators a `Comparison` expression node can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    Equal,
    NotEqual,
}

fn dispatch(inst: &Rc<Instance>, dunder: &str, other: &ObjectHolder, ctx: &mut Context<'_>) -> MythonResult<bool> {
    let result = Instance::call(inst, dunder, vec![other.clone()], ctx)?;
    Ok(is_true(&result))
}

fn type_error(op: &str, a: &ObjectHolder, b: &ObjectHolder) -> MythonError {
    MythonError::type_error(format!(
        "'{op}' not supported between instances of '{}' and '{}'",
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

/// `a < b`, the one ordering primitive.
pub fn less(a: &ObjectHolder, b: &ObjectHolder, ctx: &mut Context<'_>) -> MythonResult<bool> {
    match (a.value(), b.value()) {
        (Value::Number(x), Value::Number(y)) => Ok(x < y),
        (Value::String(x), Value::String(y)) => Ok(x < y),
        (Value::Bool(x), Value::Bool(y)) => Ok(!*x && *y),
        (Value::ClassInstance(inst), _) if inst.class.has_method("__lt__") => {
            let inst = Rc::clone(inst);
            dispatch(&inst, "__lt__", b, ctx)
        }
        _ => Err(type_error("<", a, b)),
    }
}

/// `a == b`, the one equality primitive.
///
/// A `ClassInstance` on the left dispatches to `__eq__` if it defines one;
/// otherwise falls through to the structural rule `!less(a,b) && !less(b,a)`
/// (spec.md §4.5), which is also how the original reference's `Equal`
/// composes with `Less` — and `less` itself rejects mismatched or otherwise
/// incomparable types with a `TypeError`, so there is no separate "different
/// types" case to special-case here.
pub fn equal(a: &ObjectHolder, b: &ObjectHolder, ctx: &mut Context<'_>) -> MythonResult<bool> {
    if let Value::ClassInstance(inst) = a.value() {
        if inst.class.has_method("__eq__") {
            let inst = Rc::clone(inst);
            return dispatch(&inst, "__eq__", b, ctx);
        }
        return Err(type_error("==", a, b));
    }
    if a.is_none() && b.is_none() {
        return Ok(true);
    }
    Ok(!less(a, b, ctx)? && !less(b, a, ctx)?)
}

/// Evaluates `op` by composing [`less`] and [`equal`] (spec.md §4.5).
pub fn compare(op: CompareOp, a: &ObjectHolder, b: &ObjectHolder, ctx: &mut Context<'_>) -> MythonResult<bool> {
    match op {
        CompareOp::Less => less(a, b, ctx),
        CompareOp::Equal => equal(a, b, ctx),
        CompareOp::NotEqual => Ok(!equal(a, b, ctx)?),
        CompareOp::LessOrEqual => Ok(less(a, b, ctx)? || equal(a, b, ctx)?),
        CompareOp::Greater => less(b, a, ctx),
        CompareOp::GreaterOrEqual => Ok(!less(a, b, ctx)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::NoPrint;

    fn num(n: i64) -> ObjectHolder {
        ObjectHolder::own(Value::Number(n))
    }

    fn with_ctx<T>(f: impl FnOnce(&mut Context<'_>) -> T) -> T {
        let mut sink = NoPrint;
        let mut ctx = Context::new(&mut sink);
        f(&mut ctx)
    }

    #[test]
    fn less_and_equal_on_numbers() {
        with_ctx(|ctx| {
            assert!(less(&num(1), &num(2), ctx).unwrap());
            assert!(!less(&num(2), &num(1), ctx).unwrap());
            assert!(equal(&num(2), &num(2), ctx).unwrap());
        });
    }

    #[test]
    fn greater_is_derived_from_less_with_swapped_operands() {
        with_ctx(|ctx| {
            assert_eq!(
                compare(CompareOp::Greater, &num(5), &num(3), ctx).unwrap(),
                less(&num(3), &num(5), ctx).unwrap()
            );
        });
    }

    #[test]
    fn not_equal_is_negated_equal() {
        with_ctx(|ctx| {
            assert!(compare(CompareOp::NotEqual, &num(1), &num(2), ctx).unwrap());
            assert!(!compare(CompareOp::NotEqual, &num(1), &num(1), ctx).unwrap());
        });
    }

    #[test]
    fn less_or_equal_and_greater_or_equal() {
        with_ctx(|ctx| {
            assert!(compare(CompareOp::LessOrEqual, &num(2), &num(2), ctx).unwrap());
            assert!(compare(CompareOp::GreaterOrEqual, &num(2), &num(2), ctx).unwrap());
            assert!(!compare(CompareOp::LessOrEqual, &num(3), &num(2), ctx).unwrap());
        });
    }

    #[test]
    fn none_equals_none() {
        with_ctx(|ctx| {
            assert!(equal(&ObjectHolder::none(), &ObjectHolder::none(), ctx).unwrap());
        });
    }

    #[test]
    fn equality_across_mismatched_types_is_a_type_error() {
        with_ctx(|ctx| {
            assert!(equal(&ObjectHolder::none(), &num(0), ctx).is_err());
            assert!(equal(&num(1), &ObjectHolder::own(Value::Bool(true)), ctx).is_err());
        });
    }
}
