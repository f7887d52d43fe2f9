//! The evaluator: AST node shapes (spec.md §3.4) plus the `execute`/`evaluate`
//! contract that walks them (spec.md §4.6-§4.9).
//!
//! Expressions are read-only with respect to the enclosing frame (`evaluate`
//! takes `&Closure`); statements can bind names (`execute` takes
//! `&mut Closure`). Non-local control transfer (`return`) is an explicit
//! [`Flow`] value threaded back up through `execute`, not a Rust panic or
//! exception — Mython has no `try`/`except`, so there is nothing to unwind
//! past `MethodBody`, which is the one place that turns a `Flow::Return`
//! back into a plain value.

use std::rc::Rc;

use crate::{
    arith,
    class::{Class, Instance, Method},
    compare::{self, CompareOp},
    context::Context,
    error::{MythonError, MythonResult},
    namespace::Closure,
    value::{is_true, ObjectHolder, Value},
};

/// The outcome of executing a statement: either a plain fall-through value
/// (mostly irrelevant outside expression statements) or a `return` in
/// flight, which must propagate through enclosing `Compound`/`IfElse` nodes
/// until a `MethodBody` catches it.
#[derive(Debug)]
pub enum Flow {
    Value(ObjectHolder),
    Return(ObjectHolder),
}

impl Flow {
    fn into_holder(self) -> ObjectHolder {
        match self {
            Flow::Value(v) | Flow::Return(v) => v,
        }
    }
}

/// Expression nodes (spec.md §3.4).
#[derive(Debug)]
pub enum Expr {
    VariableValue(Vec<String>),
    NumericConst(i64),
    StringConst(String),
    BoolConst(bool),
    NoneLiteral,
    NewInstance {
        class_name: String,
        args: Vec<Expr>,
    },
    MethodCall {
        receiver: Box<Expr>,
        method: String,
        args: Vec<Expr>,
    },
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mult(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
    Comparison(CompareOp, Box<Expr>, Box<Expr>),
    Stringify(Box<Expr>),
}

/// Statement nodes (spec.md §3.4).
#[derive(Debug)]
pub enum Stmt {
    Assignment {
        name: String,
        value: Box<Expr>,
    },
    FieldAssignment {
        object: Box<Expr>,
        field: String,
        value: Box<Expr>,
    },
    Print(Vec<Expr>),
    IfElse {
        condition: Box<Expr>,
        if_body: Box<Stmt>,
        else_body: Option<Box<Stmt>>,
    },
    Return(Box<Expr>),
    Compound(Vec<Stmt>),
    MethodBody(Box<Stmt>),
    ClassDefinition {
        name: String,
        parent: Option<String>,
        methods: Vec<(String, Vec<String>, Stmt)>,
    },
}

/// Resolves a dotted name chain (spec.md §4.9): the first segment is looked
/// up in `closure`; every following segment is a field access on the
/// instance produced by the previous step.
fn resolve_chain(segments: &[String], closure: &Closure) -> MythonResult<ObjectHolder> {
    let (head, rest) = segments
        .split_first()
        .expect("VariableValue/FieldAssignment chains always have at least one segment");

    let mut current = closure
        .get(head)
        .cloned()
        .ok_or_else(|| MythonError::name(format!("name '{head}' is not defined")))?;

    for field in rest {
        let instance = current.as_instance().ok_or_else(|| {
            MythonError::attribute(format!("'{field}' accessed on a non-instance value"))
        })?;
        let value = instance
            .fields
            .borrow()
            .get(field)
            .cloned()
            .ok_or_else(|| {
                MythonError::attribute(format!(
                    "'{}' instance has no field '{field}'",
                    instance.class.name
                ))
            })?;
        current = value;
    }

    Ok(current)
}

impl Expr {
    /// Evaluates this expression against `closure`, producing a value
    /// (spec.md §4.6-§4.9). Expressions never bind names themselves.
    pub fn evaluate(&self, closure: &Closure, ctx: &mut Context<'_>) -> MythonResult<ObjectHolder> {
        match self {
            Expr::VariableValue(chain) => resolve_chain(chain, closure),
            Expr::NumericConst(n) => Ok(ObjectHolder::own(Value::Number(*n))),
            Expr::StringConst(s) => Ok(ObjectHolder::own(Value::String(s.as_str().into()))),
            Expr::BoolConst(b) => Ok(ObjectHolder::own(Value::Bool(*b))),
            Expr::NoneLiteral => Ok(ObjectHolder::none()),

            Expr::NewInstance { class_name, args } => {
                let class_holder = closure
                    .get(class_name)
                    .cloned()
                    .ok_or_else(|| MythonError::name(format!("class '{class_name}' is not defined")))?;
                let class = class_holder
                    .as_class()
                    .ok_or_else(|| MythonError::type_error(format!("'{class_name}' is not a class")))?;
                let instance = Rc::new(Instance::new(Rc::clone(class)));

                let mut evaluated = Vec::with_capacity(args.len());
                for arg in args {
                    evaluated.push(arg.evaluate(closure, ctx)?);
                }

                if instance.class.has_method("__init__") {
                    Instance::call(&instance, "__init__", evaluated, ctx)?;
                } else if !evaluated.is_empty() {
                    return Err(MythonError::arity(format!(
                        "class '{class_name}' has no '__init__' but received {} argument(s)",
                        evaluated.len()
                    )));
                }

                Ok(ObjectHolder::own(Value::ClassInstance(instance)))
            }

            Expr::MethodCall { receiver, method, args } => {
                let receiver_holder = receiver.evaluate(closure, ctx)?;
                let instance = receiver_holder
                    .as_instance()
                    .ok_or_else(|| MythonError::attribute(format!("'{method}' called on a non-instance value")))?;
                let instance = Rc::clone(instance);
                let mut evaluated = Vec::with_capacity(args.len());
                for arg in args {
                    evaluated.push(arg.evaluate(closure, ctx)?);
                }
                Instance::call(&instance, method, evaluated, ctx)
            }

            Expr::Add(a, b) => arith::add(&a.evaluate(closure, ctx)?, &b.evaluate(closure, ctx)?, ctx),
            Expr::Sub(a, b) => arith::sub(&a.evaluate(closure, ctx)?, &b.evaluate(closure, ctx)?),
            Expr::Mult(a, b) => arith::mult(&a.evaluate(closure, ctx)?, &b.evaluate(closure, ctx)?),
            Expr::Div(a, b) => arith::div(&a.evaluate(closure, ctx)?, &b.evaluate(closure, ctx)?),

            // `and`/`or` coerce to a strict Bool rather than returning an
            // operand (the original reference's `And`/`Or::Execute` only
            // ever evaluate the right side once the left side is itself a
            // `Bool`, and always yield `Bool`, never a non-Bool operand).
            Expr::And(a, b) => {
                let left = a.evaluate(closure, ctx)?;
                let result = match left.value() {
                    Value::Bool(true) => matches!(b.evaluate(closure, ctx)?.value(), Value::Bool(true)),
                    _ => false,
                };
                Ok(ObjectHolder::own(Value::Bool(result)))
            }
            Expr::Or(a, b) => {
                let left = a.evaluate(closure, ctx)?;
                let result = match left.value() {
                    Value::Bool(true) => true,
                    Value::Bool(false) => matches!(b.evaluate(closure, ctx)?.value(), Value::Bool(true)),
                    _ => false,
                };
                Ok(ObjectHolder::own(Value::Bool(result)))
            }
            Expr::Not(a) => Ok(ObjectHolder::own(Value::Bool(!is_true(&a.evaluate(closure, ctx)?)))),

            Expr::Comparison(op, a, b) => {
                let left = a.evaluate(closure, ctx)?;
                let right = b.evaluate(closure, ctx)?;
                Ok(ObjectHolder::own(Value::Bool(compare::compare(*op, &left, &right, ctx)?)))
            }

            Expr::Stringify(inner) => {
                let value = inner.evaluate(closure, ctx)?;
                Ok(ObjectHolder::own(Value::String(stringify(&value, ctx)?.into())))
            }
        }
    }
}

/// Produces the canonical text form of `value` (spec.md §4.2), invoking
/// `__str__` for class instances that define it and falling back to
/// `<Name instance>` otherwise (SPEC_FULL.md's Open Question resolution).
pub fn stringify(value: &ObjectHolder, ctx: &mut Context<'_>) -> MythonResult<String> {
    if let Some(instance) = value.as_instance() {
        if instance.class.has_method("__str__") {
            let instance = Rc::clone(instance);
            let result = Instance::call(&instance, "__str__", vec![], ctx)?;
            return stringify(&result, ctx);
        }
        return Ok(instance.default_repr());
    }

    let mut buf = crate::context::CollectStringPrint::new();
    {
        let mut scratch = Context::new(&mut buf);
        value.print_primitive(&mut scratch);
    }
    Ok(buf.into_output())
}

impl Stmt {
    /// Executes this statement against `closure`, returning the resulting
    /// [`Flow`]. Only `Return` produces `Flow::Return`; everything else
    /// produces `Flow::Value`, threading a `Return` from a nested statement
    /// straight through unchanged.
    pub fn execute(&self, closure: &mut Closure, ctx: &mut Context<'_>) -> MythonResult<Flow> {
        match self {
            Stmt::Assignment { name, value } => {
                let v = value.evaluate(closure, ctx)?;
                closure.set(name.clone(), v.clone());
                Ok(Flow::Value(v))
            }

            Stmt::FieldAssignment { object, field, value } => {
                let target = object.evaluate(closure, ctx)?;
                let instance = target
                    .as_instance()
                    .ok_or_else(|| MythonError::attribute(format!("'{field}' assigned on a non-instance value")))?;
                let v = value.evaluate(closure, ctx)?;
                instance.fields.borrow_mut().set(field.clone(), v.clone());
                Ok(Flow::Value(v))
            }

            Stmt::Print(args) => {
                let mut parts = Vec::with_capacity(args.len());
                for arg in args {
                    let holder = arg.evaluate(closure, ctx)?;
                    parts.push(stringify(&holder, ctx)?);
                }
                ctx.output.write_str(&parts.join(" "));
                ctx.output.write_str("\n");
                Ok(Flow::Value(ObjectHolder::none()))
            }

            Stmt::IfElse { condition, if_body, else_body } => {
                if is_true(&condition.evaluate(closure, ctx)?) {
                    if_body.execute(closure, ctx)
                } else if let Some(else_body) = else_body {
                    else_body.execute(closure, ctx)
                } else {
                    Ok(Flow::Value(ObjectHolder::none()))
                }
            }

            Stmt::Return(expr) => Ok(Flow::Return(expr.evaluate(closure, ctx)?)),

            Stmt::Compound(stmts) => {
                let mut last = ObjectHolder::none();
                for stmt in stmts {
                    match stmt.execute(closure, ctx)? {
                        Flow::Return(v) => return Ok(Flow::Return(v)),
                        Flow::Value(v) => last = v,
                    }
                }
                Ok(Flow::Value(last))
            }

            Stmt::MethodBody(body) => {
                let flow = body.execute(closure, ctx)?;
                Ok(Flow::Value(flow.into_holder()))
            }

            Stmt::ClassDefinition { name, parent, methods } => {
                let parent_class = match parent {
                    Some(parent_name) => {
                        let holder = closure.get(parent_name).cloned().ok_or_else(|| {
                            MythonError::name(format!("class '{parent_name}' is not defined"))
                        })?;
                        let class = holder.as_class().ok_or_else(|| {
                            MythonError::type_error(format!("'{parent_name}' is not a class"))
                        })?;
                        Some(Rc::clone(class))
                    }
                    None => None,
                };

                let built_methods = methods
                    .iter()
                    .map(|(mname, params, body)| Method {
                        name: mname.clone(),
                        params: params.clone(),
                        body: Stmt::MethodBody(Box::new(body.clone_shallow())),
                    })
                    .collect();

                let class = Rc::new(Class::new(name.clone(), built_methods, parent_class));
                closure.set(name.clone(), ObjectHolder::own(Value::Class(class)));
                Ok(Flow::Value(ObjectHolder::none()))
            }
        }
    }
}

impl Stmt {
    /// A cheap structural clone used only when wrapping a `ClassDefinition`
    /// method body in a fresh `MethodBody` node. `Stmt`/`Expr` trees are
    /// otherwise never duplicated at runtime.
    fn clone_shallow(&self) -> Stmt {
        match self {
            Stmt::Assignment { name, value } => Stmt::Assignment {
                name: name.clone(),
                value: Box::new(value.clone_shallow()),
            },
            Stmt::FieldAssignment { object, field, value } => Stmt::FieldAssignment {
                object: Box::new(object.clone_shallow()),
                field: field.clone(),
                value: Box::new(value.clone_shallow()),
            },
            Stmt::Print(args) => Stmt::Print(args.iter().map(Expr::clone_shallow).collect()),
            Stmt::IfElse { condition, if_body, else_body } => Stmt::IfElse {
                condition: Box::new(condition.clone_shallow()),
                if_body: Box::new(if_body.clone_shallow()),
                else_body: else_body.as_ref().map(|b| Box::new(b.clone_shallow())),
            },
            Stmt::Return(expr) => Stmt::Return(Box::new(expr.clone_shallow())),
            Stmt::Compound(stmts) => Stmt::Compound(stmts.iter().map(Stmt::clone_shallow).collect()),
            Stmt::MethodBody(body) => Stmt::MethodBody(Box::new(body.clone_shallow())),
            Stmt::ClassDefinition { name, parent, methods } => Stmt::ClassDefinition {
                name: name.clone(),
                parent: parent.clone(),
                methods: methods
                    .iter()
                    .map(|(n, p, b)| (n.clone(), p.clone(), b.clone_shallow()))
                    .collect(),
            },
        }
    }
}

impl Expr {
    fn clone_shallow(&self) -> Expr {
        match self {
            Expr::VariableValue(chain) => Expr::VariableValue(chain.clone()),
            Expr::NumericConst(n) => Expr::NumericConst(*n),
            Expr::StringConst(s) => Expr::StringConst(s.clone()),
            Expr::BoolConst(b) => Expr::BoolConst(*b),
            Expr::NoneLiteral => Expr::NoneLiteral,
            Expr::NewInstance { class_name, args } => Expr::NewInstance {
                class_name: class_name.clone(),
                args: args.iter().map(Expr::clone_shallow).collect(),
            },
            Expr::MethodCall { receiver, method, args } => Expr::MethodCall {
                receiver: Box::new(receiver.clone_shallow()),
                method: method.clone(),
                args: args.iter().map(Expr::clone_shallow).collect(),
            },
            Expr::Add(a, b) => Expr::Add(Box::new(a.clone_shallow()), Box::new(b.clone_shallow())),
            Expr::Sub(a, b) => Expr::Sub(Box::new(a.clone_shallow()), Box::new(b.clone_shallow())),
            Expr::Mult(a, b) => Expr::Mult(Box::new(a.clone_shallow()), Box::new(b.clone_shallow())),
            Expr::Div(a, b) => Expr::Div(Box::new(a.clone_shallow()), Box::new(b.clone_shallow())),
            Expr::And(a, b) => Expr::And(Box::new(a.clone_shallow()), Box::new(b.clone_shallow())),
            Expr::Or(a, b) => Expr::Or(Box::new(a.clone_shallow()), Box::new(b.clone_shallow())),
            Expr::Not(a) => Expr::Not(Box::new(a.clone_shallow())),
            Expr::Comparison(op, a, b) => Expr::Comparison(*op, Box::new(a.clone_shallow()), Box::new(b.clone_shallow())),
            Expr::Stringify(a) => Expr::Stringify(Box::new(a.clone_shallow())),
        }
    }
}
