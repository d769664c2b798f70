//! Integration tests for end-to-end evaluation.
//!
//! These tests run source text through a session: tokenization, parsing,
//! code generation, linking and JIT execution of top-level expressions.

use inkwell::context::Context;
use kaleidoscope::{
    compiler::stdlib::capture_output,
    errors::errors::{Error, ErrorCategory, ErrorImpl},
    format_error,
    session::session::{Outcome, Session, SessionOptions},
};

fn new_session(context: &Context) -> Session<'_> {
    Session::new(context, SessionOptions::default()).unwrap()
}

/// Runs `source` and returns the value of its last form.
fn evaluate(session: &mut Session<'_>, source: &str) -> f64 {
    match session.run(source).pop() {
        Some(Ok(Outcome::Evaluated(value))) => value,
        other => panic!("expected a value from {:?}, got {:?}", source, other),
    }
}

/// Runs `source` and returns the error of its last form.
fn last_error(session: &mut Session<'_>, source: &str) -> Error {
    match session.run(source).pop() {
        Some(Err(error)) => error,
        other => panic!("expected an error from {:?}, got {:?}", source, other),
    }
}

#[test]
fn test_arithmetic_precedence() {
    let context = Context::create();
    let mut session = new_session(&context);

    assert_eq!(evaluate(&mut session, "1+2*3"), 7.0);
    assert_eq!(evaluate(&mut session, "(1+2)*3"), 9.0);
    assert_eq!(evaluate(&mut session, "10-4-3"), 3.0);
    assert_eq!(evaluate(&mut session, "2*3-4*5"), -14.0);
}

#[test]
fn test_comparison_yields_zero_or_one() {
    let context = Context::create();
    let mut session = new_session(&context);

    assert_eq!(evaluate(&mut session, "1<2"), 1.0);
    assert_eq!(evaluate(&mut session, "2<1"), 0.0);
    assert_eq!(evaluate(&mut session, "1<1"), 0.0);
    assert_eq!(evaluate(&mut session, "(1<2)+(3<4)"), 2.0);
}

#[test]
fn test_user_binary_operator_precedence() {
    let context = Context::create();
    let mut session = new_session(&context);

    let results = session.run("def binary@ 10 (a b) a+b");
    assert_eq!(results, vec![Ok(Outcome::Defined("binary@".to_string()))]);

    // '@' binds looser than '*'.
    assert_eq!(evaluate(&mut session, "1@2*3"), 7.0);
    assert_eq!(evaluate(&mut session, "(1@2)*3"), 9.0);

    // '%' binds tighter than '*'.
    session.run("def binary% 50 (a b) a+b");
    assert_eq!(evaluate(&mut session, "1%2*3"), 9.0);
}

#[test]
fn test_operator_unusable_before_definition() {
    let context = Context::create();
    let mut session = new_session(&context);

    let results = session.run("1@2");

    // '1' is a complete form; '@2' is then a use of an undefined unary '@'.
    assert_eq!(results[0], Ok(Outcome::Evaluated(1.0)));
    let error = results[1].clone().unwrap_err();
    assert_eq!(error.get_category(), ErrorCategory::UnresolvedSymbol);
    assert_eq!(
        error.get_impl(),
        &ErrorImpl::UnknownFunction {
            function: "unary@".to_string()
        }
    );

    session.run("def binary@ 10 (a b) a+b");
    assert_eq!(evaluate(&mut session, "1@2"), 3.0);
}

#[test]
fn test_user_unary_operators() {
    let context = Context::create();
    let mut session = new_session(&context);

    session.run("def unary!(v) if v then 0 else 1; def unary-(v) 0-v");

    assert_eq!(evaluate(&mut session, "!0"), 1.0);
    assert_eq!(evaluate(&mut session, "!5"), 0.0);
    assert_eq!(evaluate(&mut session, "-5 + 2"), -3.0);
    assert_eq!(evaluate(&mut session, "!!3"), 1.0);
}

#[test]
fn test_conditionals() {
    let context = Context::create();
    let mut session = new_session(&context);

    assert_eq!(evaluate(&mut session, "if 1 then 2 else 3"), 2.0);
    assert_eq!(evaluate(&mut session, "if 0 then 2 else 3"), 3.0);

    session.run(
        "def classify(x) if x < 5 then (if x < 2 then 1 else 2) else (if x < 8 then 3 else 4)",
    );

    assert_eq!(evaluate(&mut session, "classify(1)"), 1.0);
    assert_eq!(evaluate(&mut session, "classify(3)"), 2.0);
    assert_eq!(evaluate(&mut session, "classify(6)"), 3.0);
    assert_eq!(evaluate(&mut session, "classify(9)"), 4.0);
}

#[test]
fn test_loop_runs_while_condition_holds() {
    let context = Context::create();
    let mut session = new_session(&context);

    let (value, output) = capture_output(|| evaluate(&mut session, "for i = 1, i < 4, 1 in printd(i)"));
    assert_eq!(value, 0.0);
    assert_eq!(output, "1.000000\n2.000000\n3.000000\n");

    let (value, output) = capture_output(|| evaluate(&mut session, "for i = 1, i < 4 in printd(i)"));
    assert_eq!(value, 0.0);
    assert_eq!(output, "1.000000\n2.000000\n3.000000\n");
}

#[test]
fn test_loop_body_runs_at_least_once() {
    let context = Context::create();
    let mut session = new_session(&context);

    let (value, output) = capture_output(|| evaluate(&mut session, "for i = 10, i < 4 in printd(i)"));

    assert_eq!(value, 0.0);
    assert_eq!(output, "10.000000\n");
}

#[test]
fn test_loop_with_step() {
    let context = Context::create();
    let mut session = new_session(&context);

    let (_, output) = capture_output(|| evaluate(&mut session, "for i = 0, i < 10, 4 in printd(i)"));

    assert_eq!(output, "0.000000\n4.000000\n8.000000\n");
}

#[test]
fn test_extern_then_definition() {
    let context = Context::create();
    let mut session = new_session(&context);

    let results = session.run("extern foo(x); def foo(x) x*2; foo(5)");

    assert_eq!(
        results,
        vec![
            Ok(Outcome::Declared("foo".to_string())),
            Ok(Outcome::Defined("foo".to_string())),
            Ok(Outcome::Evaluated(10.0)),
        ]
    );
}

#[test]
fn test_redefinition_last_linked_wins() {
    let context = Context::create();
    let mut session = new_session(&context);

    session.run("def foo(x) x*2");
    assert_eq!(evaluate(&mut session, "foo(5)"), 10.0);

    session.run("def foo(x) x*3");
    assert_eq!(evaluate(&mut session, "foo(5)"), 15.0);
}

#[test]
fn test_redefined_host_function_takes_over() {
    let context = Context::create();
    let mut session = new_session(&context);

    let results = session.run("def printd(x) x*2");
    assert_eq!(results, vec![Ok(Outcome::Defined("printd".to_string()))]);

    let (value, output) = capture_output(|| evaluate(&mut session, "printd(5)"));

    assert_eq!(value, 10.0);
    assert_eq!(output, "");
}

#[test]
fn test_earlier_callers_keep_their_binding() {
    let context = Context::create();
    let mut session = new_session(&context);

    session.run("def foo(x) 1; def bar(x) foo(x); def foo(x) 2");

    // `bar` was linked against the first `foo`; new units see the second.
    assert_eq!(evaluate(&mut session, "bar(0)"), 1.0);
    assert_eq!(evaluate(&mut session, "foo(0)"), 2.0);
}

#[test]
fn test_loop_variable_shadowing_restores_parameter() {
    let context = Context::create();
    let mut session = new_session(&context);

    session.run("def shadow(i) (for i = 1, i < 3 in i) + i");

    assert_eq!(evaluate(&mut session, "shadow(10)"), 10.0);
}

#[test]
fn test_nested_loops_shadow_same_name() {
    let context = Context::create();
    let mut session = new_session(&context);

    let (_, output) = capture_output(|| {
        evaluate(
            &mut session,
            "for i = 1, i < 3 in (for i = 5, i < 7 in printd(i)) + printd(i)",
        )
    });

    assert_eq!(
        output,
        "5.000000\n6.000000\n1.000000\n5.000000\n6.000000\n2.000000\n"
    );
}

#[test]
fn test_arity_mismatch() {
    let context = Context::create();
    let mut session = new_session(&context);

    session.run("def id(x) x");
    let error = last_error(&mut session, "id(1, 2)");

    assert_eq!(error.get_category(), ErrorCategory::ArityMismatch);
    assert_eq!(evaluate(&mut session, "id(4)"), 4.0);
}

#[test]
fn test_unknown_variable_recovers() {
    let context = Context::create();
    let mut session = new_session(&context);

    let error = last_error(&mut session, "x + 1");
    assert_eq!(
        error.get_impl(),
        &ErrorImpl::UnknownVariable {
            variable: "x".to_string()
        }
    );

    assert_eq!(evaluate(&mut session, "1 + 1"), 2.0);
}

#[test]
fn test_repeated_anonymous_expressions() {
    let context = Context::create();
    let mut session = new_session(&context);

    let results = session.run("1; 2; 3");

    assert_eq!(
        results,
        vec![
            Ok(Outcome::Evaluated(1.0)),
            Ok(Outcome::Evaluated(2.0)),
            Ok(Outcome::Evaluated(3.0)),
        ]
    );
    assert!(session.linker().is_empty());
}

#[test]
fn test_extern_process_symbols() {
    let context = Context::create();
    let mut session = new_session(&context);

    session.run("extern sin(x); extern cos(x)");

    assert_eq!(evaluate(&mut session, "sin(0)"), 0.0);
    assert_eq!(evaluate(&mut session, "cos(0)"), 1.0);
}

#[test]
fn test_host_output_functions() {
    let context = Context::create();
    let mut session = new_session(&context);

    let (value, output) = capture_output(|| evaluate(&mut session, "putchard(72) + putchard(105) + printd(2.5)"));

    assert_eq!(value, 0.0);
    assert_eq!(output, "Hi2.500000\n");
}

#[test]
fn test_recursive_definition() {
    let context = Context::create();
    let mut session = new_session(&context);

    session.run("def fib(x) if x < 3 then 1 else fib(x-1)+fib(x-2)");

    assert_eq!(evaluate(&mut session, "fib(10)"), 55.0);
}

#[test]
fn test_sequencing_operator() {
    let context = Context::create();
    let mut session = new_session(&context);

    session.run("def binary : 1 (x y) y");

    let (value, output) = capture_output(|| evaluate(&mut session, "printd(1) : printd(2) : 7"));

    assert_eq!(value, 7.0);
    assert_eq!(output, "1.000000\n2.000000\n");
}

#[test]
fn test_failed_definition_leaves_previous_callable() {
    let context = Context::create();
    let mut session = new_session(&context);

    session.run("def twice(x) x*2");
    let error = last_error(&mut session, "def twice(x) y*2");
    assert_eq!(error.get_category(), ErrorCategory::UnresolvedSymbol);

    assert_eq!(evaluate(&mut session, "twice(4)"), 8.0);
}

#[test]
fn test_syntax_error_rendering() {
    let context = Context::create();
    let options = SessionOptions {
        file: Some("test.ks".to_string()),
        ..SessionOptions::default()
    };
    let mut session = Session::new(&context, options).unwrap();

    let source = "def f(x)\n  if x then 1";
    let error = last_error(&mut session, source);
    assert_eq!(error.get_category(), ErrorCategory::SyntaxError);

    let rendered = format_error(&error, source);
    assert!(rendered.starts_with("Error: UnexpectedToken"));
    assert!(rendered.contains("-> test.ks"));
}
