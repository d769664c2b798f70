//! Incremental compilation session.
//!
//! - session: the per-form state machine (parse, generate, seal, link, run)
//! - linker: sealed units, their execution engines and symbol resolution

pub mod linker;
pub mod session;
