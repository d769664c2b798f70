//! Unit tests for error handling.
//!
//! This module contains tests for error types and error reporting.

use crate::errors::errors::{Error, ErrorCategory, ErrorImpl, ErrorTip};
use crate::Position;
use std::rc::Rc;

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "then".to_string(),
            message: "expected expression".to_string(),
        },
        Position(10, Rc::new("test.ks".to_string())),
    );

    assert_eq!(error.get_error_name(), "UnexpectedToken");
    assert_eq!(error.get_category(), ErrorCategory::SyntaxError);
}

#[test]
fn test_error_position() {
    let pos = Position(42, Rc::new("test.ks".to_string()));
    let error = Error::new(
        ErrorImpl::NumberParseError {
            token: "1.2.3".to_string(),
        },
        pos.clone(),
    );

    assert_eq!(error.get_position().0, 42);
}

#[test]
fn test_unpositioned_error_uses_null_position() {
    let error = Error::unpositioned(ErrorImpl::UnknownVariable {
        variable: "x".to_string(),
    });

    assert_eq!(error.get_position().0, 0);
    assert_eq!(error.get_position().1.as_str(), "<null>");
}

#[test]
fn test_categories() {
    let unresolved = [
        ErrorImpl::UnknownVariable { variable: "x".to_string() },
        ErrorImpl::UnknownFunction { function: "f".to_string() },
        ErrorImpl::UnresolvedSymbol { symbol: "g".to_string() },
    ];
    for error_impl in unresolved {
        assert_eq!(
            Error::unpositioned(error_impl).get_category(),
            ErrorCategory::UnresolvedSymbol
        );
    }

    let syntax = [
        ErrorImpl::InvalidPrecedence { precedence: 0.0 },
        ErrorImpl::InvalidOperandCount { operator: '@', expected: 2, received: 1 },
        ErrorImpl::DuplicateParameter { parameter: "a".to_string() },
    ];
    for error_impl in syntax {
        assert_eq!(
            Error::unpositioned(error_impl).get_category(),
            ErrorCategory::SyntaxError
        );
    }

    let arity = Error::unpositioned(ErrorImpl::ArityMismatch {
        function: "f".to_string(),
        expected: 2,
        received: 1,
    });
    assert_eq!(arity.get_category(), ErrorCategory::ArityMismatch);
    assert_eq!(arity.get_error_name(), "ArityMismatch");
}

#[test]
fn test_error_tip_none() {
    let error = Error::unpositioned(ErrorImpl::Backend {
        message: "boom".to_string(),
    });

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_suggestion() {
    let error = Error::unpositioned(ErrorImpl::ArityMismatch {
        function: "foo".to_string(),
        expected: 1,
        received: 2,
    });

    match error.get_tip() {
        ErrorTip::Suggestion(tip) => assert_eq!(tip, "Function `foo` expects 1 arguments, received 2"),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_error_display() {
    let error = Error::unpositioned(ErrorImpl::UnknownVariable {
        variable: "y".to_string(),
    });

    assert_eq!(error.to_string(), "unknown variable name \"y\"");
}
