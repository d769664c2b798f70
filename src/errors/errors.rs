use std::fmt::Display;

use inkwell::builder::BuilderError;
use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    /// Errors raised after parsing have no useful source location.
    pub fn unpositioned(error_impl: ErrorImpl) -> Self {
        Error::new(error_impl, Position::null())
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::InvalidPrecedence { .. } => "InvalidPrecedence",
            ErrorImpl::InvalidOperandCount { .. } => "InvalidOperandCount",
            ErrorImpl::DuplicateParameter { .. } => "DuplicateParameter",
            ErrorImpl::UnknownVariable { .. } => "UnknownVariable",
            ErrorImpl::UnknownFunction { .. } => "UnknownFunction",
            ErrorImpl::UnresolvedSymbol { .. } => "UnresolvedSymbol",
            ErrorImpl::ArityMismatch { .. } => "ArityMismatch",
            ErrorImpl::InvalidFunction { .. } => "InvalidFunction",
            ErrorImpl::Backend { .. } => "Backend",
        }
    }

    pub fn get_category(&self) -> ErrorCategory {
        match &self.internal_error {
            ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::NumberParseError { .. }
            | ErrorImpl::InvalidPrecedence { .. }
            | ErrorImpl::InvalidOperandCount { .. }
            | ErrorImpl::DuplicateParameter { .. } => ErrorCategory::SyntaxError,
            ErrorImpl::UnknownVariable { .. }
            | ErrorImpl::UnknownFunction { .. }
            | ErrorImpl::UnresolvedSymbol { .. } => ErrorCategory::UnresolvedSymbol,
            ErrorImpl::ArityMismatch { .. } => ErrorCategory::ArityMismatch,
            ErrorImpl::InvalidFunction { .. } | ErrorImpl::Backend { .. } => ErrorCategory::Backend,
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnexpectedToken { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => {
                ErrorTip::Suggestion(format!("Invalid number: `{}`", token))
            }
            ErrorImpl::InvalidPrecedence { precedence } => ErrorTip::Suggestion(format!(
                "Precedence {} is out of range, it must be between 1 and 100",
                precedence
            )),
            ErrorImpl::InvalidOperandCount { operator, expected, received } => {
                ErrorTip::Suggestion(format!(
                    "Operator `{}` takes {} operands, {} declared",
                    operator, expected, received
                ))
            }
            ErrorImpl::DuplicateParameter { parameter } => {
                ErrorTip::Suggestion(format!("Parameter `{}` is declared twice", parameter))
            }
            ErrorImpl::UnknownVariable { variable } => {
                ErrorTip::Suggestion(format!("Variable `{}` not declared", variable))
            }
            ErrorImpl::UnknownFunction { function } => ErrorTip::Suggestion(format!(
                "Function `{}` is neither defined nor declared with `extern`",
                function
            )),
            ErrorImpl::UnresolvedSymbol { symbol } => ErrorTip::Suggestion(format!(
                "Symbol `{}` was declared but never defined",
                symbol
            )),
            ErrorImpl::ArityMismatch { function, expected, received } => {
                ErrorTip::Suggestion(format!(
                    "Function `{}` expects {} arguments, received {}",
                    function, expected, received
                ))
            }
            ErrorImpl::InvalidFunction { .. } | ErrorImpl::Backend { .. } => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.internal_error)
    }
}

impl std::error::Error for Error {}

impl From<BuilderError> for Error {
    fn from(error: BuilderError) -> Self {
        Error::unpositioned(ErrorImpl::Backend {
            message: format!("{:?}", error),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    SyntaxError,
    UnresolvedSymbol,
    ArityMismatch,
    Backend,
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unexpected token ({message}): {token:?}")]
    UnexpectedToken { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("invalid precedence: {precedence}, must be 1..100")]
    InvalidPrecedence { precedence: f64 },
    #[error("invalid number of operands for operator {operator:?}: expected {expected}, received {received}")]
    InvalidOperandCount {
        operator: char,
        expected: usize,
        received: usize,
    },
    #[error("parameter {parameter:?} declared more than once")]
    DuplicateParameter { parameter: String },
    #[error("unknown variable name {variable:?}")]
    UnknownVariable { variable: String },
    #[error("unknown function referenced: {function:?}")]
    UnknownFunction { function: String },
    #[error("unresolved symbol {symbol:?}")]
    UnresolvedSymbol { symbol: String },
    #[error("incorrect number of arguments passed to {function:?}: expected {expected}, received {received}")]
    ArityMismatch {
        function: String,
        expected: usize,
        received: usize,
    },
    #[error("function {function:?} failed verification")]
    InvalidFunction { function: String },
    #[error("backend error: {message}")]
    Backend { message: String },
}
