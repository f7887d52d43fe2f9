//! End-to-end tests: each one compiles a small Mython program and asserts on
//! its `print`ed output, exercising the lexer, parser and evaluator together.

use mython::{CollectStringPrint, Runner};

fn run(src: &str) -> String {
    let runner = Runner::compile(src).unwrap_or_else(|err| panic!("compile error: {err}\nsource:\n{src}"));
    let mut sink = CollectStringPrint::new();
    runner
        .run(&mut sink)
        .unwrap_or_else(|err| panic!("runtime error: {err}\nsource:\n{src}"));
    sink.into_output()
}

fn run_err(src: &str) -> mython::MythonError {
    match Runner::compile(src) {
        Ok(runner) => {
            let mut sink = CollectStringPrint::new();
            runner.run(&mut sink).expect_err("expected a runtime error")
        }
        Err(err) => err,
    }
}

// ============================================================================
// Arithmetic and comparisons
// ============================================================================

#[test]
fn arithmetic_follows_standard_precedence() {
    assert_eq!(run("print 2 + 3 * 4 - 1\n"), "13\n");
}

#[test]
fn division_by_zero_is_an_arithmetic_error() {
    let err = run_err("print 1 / 0\n");
    assert_eq!(err.kind, mython::ExcKind::ArithmeticError);
}

#[test]
fn comparisons_derive_from_less_and_equal() {
    let src = "print 1 < 2\nprint 2 <= 2\nprint 3 > 2\nprint 3 >= 4\nprint 1 == 1\nprint 1 != 2\n";
    assert_eq!(run(src), "True\nTrue\nTrue\nFalse\nTrue\nTrue\n");
}

#[test]
fn string_concatenation_via_plus() {
    assert_eq!(run("print \"foo\" + \"bar\"\n"), "foobar\n");
}

#[test]
fn boolean_short_circuit_and_or() {
    let src = concat!(
        "class Loud:\n",
        "  def __init__(self):\n",
        "    self.calls = 0\n",
        "  def bump(self):\n",
        "    self.calls = self.calls + 1\n",
        "    return True\n",
        "l = Loud()\n",
        "x = False and l.bump()\n",
        "print l.calls\n",
    );
    assert_eq!(run(src), "0\n");
}

// ============================================================================
// Control flow
// ============================================================================

#[test]
fn if_else_picks_branch_by_truthiness() {
    let src = "x = 0\nif x:\n  print \"truthy\"\nelse:\n  print \"falsy\"\n";
    assert_eq!(run(src), "falsy\n");
}

#[test]
fn return_inside_nested_if_short_circuits_method_body() {
    let src = concat!(
        "class Classify:\n",
        "  def sign(self, n):\n",
        "    if n < 0:\n",
        "      return \"negative\"\n",
        "    print \"unreachable when negative\"\n",
        "    return \"non-negative\"\n",
        "c = Classify()\n",
        "print c.sign(-3)\n",
        "print c.sign(5)\n",
    );
    assert_eq!(run(src), "negative\nnon-negative\n");
}

// ============================================================================
// Classes, inheritance, dunder dispatch
// ============================================================================

#[test]
fn single_inheritance_method_resolution_order() {
    let src = concat!(
        "class Animal:\n",
        "  def __init__(self, name):\n",
        "    self.name = name\n",
        "  def speak(self):\n",
        "    return \"...\"\n",
        "  def describe(self):\n",
        "    return str(self.name) + \" says \" + self.speak()\n",
        "class Dog(Animal):\n",
        "  def speak(self):\n",
        "    return \"Woof\"\n",
        "a = Animal(\"Generic\")\n",
        "d = Dog(\"Rex\")\n",
        "print a.describe()\n",
        "print d.describe()\n",
    );
    assert_eq!(run(src), "Generic says ...\nRex says Woof\n");
}

#[test]
fn add_dunder_overload_on_instances() {
    let src = concat!(
        "class Vec:\n",
        "  def __init__(self, x):\n",
        "    self.x = x\n",
        "  def __add__(self, other):\n",
        "    return Vec(self.x + other.x)\n",
        "  def __str__(self):\n",
        "    return str(self.x)\n",
        "a = Vec(2)\n",
        "b = Vec(3)\n",
        "print a + b\n",
    );
    assert_eq!(run(src), "5\n");
}

#[test]
fn eq_and_lt_dunder_overloads_compose_into_full_comparison_set() {
    let src = concat!(
        "class Box:\n",
        "  def __init__(self, n):\n",
        "    self.n = n\n",
        "  def __lt__(self, other):\n",
        "    return self.n < other.n\n",
        "  def __eq__(self, other):\n",
        "    return self.n == other.n\n",
        "a = Box(1)\n",
        "b = Box(2)\n",
        "print a < b\n",
        "print a > b\n",
        "print a == Box(1)\n",
        "print a != b\n",
    );
    assert_eq!(run(src), "True\nFalse\nTrue\nTrue\n");
}

#[test]
fn instance_without_str_prints_default_repr() {
    let src = "class Widget:\n  def __init__(self):\n    self.id = 1\nw = Widget()\nprint w\n";
    assert_eq!(run(src), "<Widget instance>\n");
}

#[test]
fn calling_undefined_method_is_an_attribute_error() {
    let err = run_err("class Empty:\n  def __init__(self):\n    self.n = 0\ne = Empty()\nprint e.missing()\n");
    assert_eq!(err.kind, mython::ExcKind::AttributeError);
}

#[test]
fn calling_method_with_wrong_arity_is_an_arity_error() {
    let src = concat!(
        "class One:\n",
        "  def __init__(self):\n",
        "    self.n = 0\n",
        "  def take(self, x):\n",
        "    return x\n",
        "o = One()\n",
        "print o.take(1, 2)\n",
    );
    let err = run_err(src);
    assert_eq!(err.kind, mython::ExcKind::ArityError);
}

// ============================================================================
// Closures / field chains / print formatting
// ============================================================================

#[test]
fn nested_field_chain_reads_through_two_instances() {
    let src = concat!(
        "class Engine:\n",
        "  def __init__(self, horsepower):\n",
        "    self.horsepower = horsepower\n",
        "class Car:\n",
        "  def __init__(self, engine):\n",
        "    self.engine = engine\n",
        "e = Engine(300)\n",
        "c = Car(e)\n",
        "print c.engine.horsepower\n",
    );
    assert_eq!(run(src), "300\n");
}

#[test]
fn print_with_multiple_args_is_space_joined() {
    assert_eq!(run("print 1, \"two\", 3\n"), "1 two 3\n");
}

#[test]
fn print_with_no_args_emits_a_bare_line() {
    assert_eq!(run("print\nprint 1\n"), "\n1\n");
}

#[test]
fn reassigning_a_name_overwrites_its_binding() {
    assert_eq!(run("x = 1\nx = x + 1\nx = x + 1\nprint x\n"), "3\n");
}

#[test]
fn referencing_an_undefined_name_is_a_name_error() {
    let err = run_err("print missing\n");
    assert_eq!(err.kind, mython::ExcKind::NameError);
}

#[test]
fn print_none_literal() {
    assert_eq!(run("print None\n"), "None\n");
}
