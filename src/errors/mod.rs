//! Error types and error handling for the frontend.
//!
//! This module defines the error types used by every phase of the
//! interactive compiler. It includes:
//!
//! - Error structures with source position information
//! - Specific error variants for lexing, parsing, code generation and linking
//! - The coarse error categories reported to the user
//! - Helpful error messages and suggestions

pub mod errors;

#[cfg(test)]
mod tests;
