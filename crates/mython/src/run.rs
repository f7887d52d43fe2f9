//! The program driver (SPEC_FULL.md §2), mirroring the teacher's
//! `Runner`: parse once, then execute against a caller-supplied output sink.

use crate::{
    ast::Stmt,
    context::{Context, OutputSink},
    error::MythonResult,
    namespace::Closure,
    parser::Parser,
};

/// A parsed Mython program, ready to run against any [`OutputSink`].
pub struct Runner {
    program: Stmt,
}

impl Runner {
    /// Lexes and parses `source` in full. Lexical and parse errors surface here.
    pub fn compile(source: &str) -> MythonResult<Self> {
        let program = Parser::parse_program(source)?;
        Ok(Self { program })
    }

    /// Executes the compiled program once, against a fresh top-level
    /// `Closure`, writing all `print` output through `sink`.
    ///
    /// Runtime errors (name/type/arity/arithmetic/attribute) surface here,
    /// distinct from the parse-time errors `compile` can return.
    pub fn run(&self, sink: &mut dyn OutputSink) -> MythonResult<()> {
        let mut closure = Closure::new();
        let mut ctx = Context::new(sink);
        self.program.execute(&mut closure, &mut ctx)?;
        Ok(())
    }
}
