//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into top-level forms. Expressions are parsed by precedence climbing
//! over a mutable binary operator table, and handles:
//!
//! - Form parsing (definitions, externs, bare expressions)
//! - Prototype parsing, including user-defined unary and binary operators
//! - Expression parsing (binary ops, unary ops, calls, if, for)
//!
//! Primary expressions are dispatched through NUD (null denotation)
//! handlers registered by token kind.

pub mod decl;
pub mod expr;
pub mod lookups;
pub mod parser;
