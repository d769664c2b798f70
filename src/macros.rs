//! Utility macros for the frontend.
//!
//! This module defines helper macros used throughout the crate:
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_UNEXPECTED!` - Creates an `UnexpectedToken` error at the parser's current token
//!
//! These macros reduce boilerplate in the lexer and parser.

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$value` - The token's string value
/// * `$span` - The source span
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::Number, "42".to_string(), span);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $span:expr) => {
        Token {
            kind: $kind,
            value: $value,
            span: $span,
        }
    };
}

/// Creates an `UnexpectedToken` error pointing at the parser's current token.
///
/// Evaluates to an `Error`, not a `Result`, so call sites decide whether to
/// wrap it in `Err`.
///
/// # Arguments
///
/// * `$parser` - The parser whose current token is unexpected
/// * `$message` - What the grammar expected instead
///
/// # Example
///
/// ```ignore
/// return Err(MK_UNEXPECTED!(parser, "expected ')'"));
/// ```
#[macro_export]
macro_rules! MK_UNEXPECTED {
    ($parser:expr, $message:expr) => {
        $crate::errors::errors::Error::new(
            $crate::errors::errors::ErrorImpl::UnexpectedToken {
                token: $parser.current_token().value.clone(),
                message: String::from($message),
            },
            $parser.get_position(),
        )
    };
}
