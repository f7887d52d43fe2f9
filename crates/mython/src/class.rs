//! Classes, methods and instances (spec.md §3.2, §4.6).
//!
//! Single inheritance, depth-first method lookup. Classes form a tree with
//! no cycles (spec.md §5, §9), so plain `Rc` parent links are enough; there
//! is no need for the teacher's heap arena or a tracing collector.

use std::cell::RefCell;
use std::rc::Rc;

use crate::{
    ast::{Flow, Stmt},
    context::Context,
    error::{MythonError, MythonResult},
    namespace::Closure,
    value::{ObjectHolder, Value},
};

/// A method: its formal parameter names and its (already `MethodBody`-wrapped) body.
#[derive(Debug)]
pub struct Method {
    pub name: String,
    pub params: Vec<String>,
    pub body: Stmt,
}

/// A class definition: a name, its own methods, and an optional parent.
#[derive(Debug)]
pub struct Class {
    pub name: String,
    pub methods: Vec<Method>,
    pub parent: Option<Rc<Class>>,
}

impl Class {
    pub fn new(name: impl Into<String>, methods: Vec<Method>, parent: Option<Rc<Class>>) -> Self {
        Self {
            name: name.into(),
            methods,
            parent,
        }
    }

    /// Depth-first lookup: this class's own methods first, then the parent
    /// chain (spec.md §3.2's "single inheritance, most-derived wins").
    pub fn find_method(&self, name: &str) -> Option<&Method> {
        if let Some(method) = self.methods.iter().find(|m| m.name == name) {
            return Some(method);
        }
        self.parent.as_ref().and_then(|p| p.find_method(name))
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.find_method(name).is_some()
    }
}

/// A live class instance: a reference to its class plus its own field bag.
///
/// Fields live in a `RefCell<Closure>` because method calls need to mutate
/// `self`'s fields while other shared references to the same instance
/// (e.g. held by a caller) remain live.
#[derive(Debug)]
pub struct Instance {
    pub class: Rc<Class>,
    pub fields: RefCell<Closure>,
}

impl Instance {
    pub fn new(class: Rc<Class>) -> Self {
        Self {
            class,
            fields: RefCell::new(Closure::new()),
        }
    }

    /// Invokes `method_name` on `self_rc` with `args`, per spec.md §4.6:
    /// a fresh `Closure` binds `self` and the positional parameters, then the
    /// method body runs against it. Arity mismatches are `ArityError`s;
    /// unknown methods are `AttributeError`s.
    pub fn call(
        self_rc: &Rc<Instance>,
        method_name: &str,
        args: Vec<ObjectHolder>,
        ctx: &mut Context<'_>,
    ) -> MythonResult<ObjectHolder> {
        let method = self_rc.class.find_method(method_name).ok_or_else(|| {
            MythonError::attribute(format!(
                "class '{}' has no method '{method_name}'",
                self_rc.class.name
            ))
        })?;

        if method.params.len() != args.len() {
            return Err(MythonError::arity(format!(
                "method '{method_name}' of class '{}' expects {} argument(s), got {}",
                self_rc.class.name,
                method.params.len(),
                args.len()
            )));
        }

        let mut frame = Closure::new();
        frame.set("self", ObjectHolder::share(Value::ClassInstance(Rc::clone(self_rc))));
        for (param, arg) in method.params.iter().zip(args.into_iter()) {
            frame.set(param.clone(), arg);
        }

        match method.body.execute(&mut frame, ctx)? {
            Flow::Value(holder) | Flow::Return(holder) => Ok(holder),
        }
    }

    /// The canonical text form of an instance without its own `__str__`
    /// (SPEC_FULL.md's Open Question resolution: `<Name instance>`).
    pub fn default_repr(&self) -> String {
        format!("<{} instance>", self.class.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expr;

    fn leaf_class(name: &str, methods: Vec<Method>) -> Rc<Class> {
        Rc::new(Class::new(name, methods, None))
    }

    #[test]
    fn find_method_checks_own_before_parent() {
        let base = leaf_class(
            "Base",
            vec![Method {
                name: "greet".into(),
                params: vec![],
                body: Stmt::Return(Box::new(Expr::StringConst("base".into()))),
            }],
        );
        let child = Rc::new(Class::new(
            "Child",
            vec![Method {
                name: "greet".into(),
                params: vec![],
                body: Stmt::Return(Box::new(Expr::StringConst("child".into()))),
            }],
            Some(base),
        ));
        let method = child.find_method("greet").unwrap();
        let Stmt::Return(expr) = &method.body else {
            panic!("expected a Return statement");
        };
        let Expr::StringConst(s) = expr.as_ref() else {
            panic!("expected a string constant");
        };
        assert_eq!(s, "child");
    }

    #[test]
    fn find_method_falls_back_to_parent() {
        let base = leaf_class(
            "Base",
            vec![Method {
                name: "only_in_base".into(),
                params: vec![],
                body: Stmt::Return(Box::new(Expr::NoneLiteral)),
            }],
        );
        let child = Rc::new(Class::new("Child", vec![], Some(base)));
        assert!(child.find_method("only_in_base").is_some());
        assert!(child.find_method("nope").is_none());
    }

    #[test]
    fn default_repr_uses_class_name() {
        let class = leaf_class("Point", vec![]);
        let instance = Instance::new(class);
        assert_eq!(instance.default_repr(), "<Point instance>");
    }
}
