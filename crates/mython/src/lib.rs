//! Mython: a tree-walking interpreter for a small, indentation-sensitive,
//! dynamically-typed object-oriented scripting language.
//!
//! The crate is organized bottom-up: [`token`] and [`lexer`] turn source
//! text into a token stream; [`value`], [`class`] and [`namespace`] define
//! the runtime object model; [`arith`] and [`compare`] implement the
//! overloadable operators; [`ast`] ties evaluation together; and [`parser`]
//! plus [`run`] provide the ambient (non-spec) pieces needed to actually
//! execute a program end to end.

pub mod arith;
pub mod ast;
pub mod class;
pub mod compare;
pub mod context;
pub mod error;
pub mod lexer;
pub mod namespace;
pub mod parser;
pub mod run;
pub mod token;
pub mod value;

pub use ast::{stringify, Expr, Flow, Stmt};
pub use class::{Class, Instance, Method};
pub use compare::CompareOp;
pub use context::{CollectStringPrint, Context, NoPrint, OutputSink, StdPrint};
pub use error::{ExcKind, MythonError, MythonResult};
pub use lexer::Lexer;
pub use namespace::Closure;
pub use parser::Parser;
pub use run::Runner;
pub use token::Token;
pub use value::{is_true, ObjectHolder, Value};
