//! Code generation module for the compiler.
//!
//! This module contains the LLVM-based code generator that lowers parsed
//! functions into compilation units. It handles:
//!
//! - Compilation of expressions, including `if` and `for` control flow
//! - Prototype materialization and the session-wide prototype registry
//! - Compilation units and their sealing
//! - Host library functions callable from compiled code

pub mod compiler;
pub mod expr;
pub mod stdlib;
pub mod unit;
