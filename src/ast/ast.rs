use super::declarations::{Function, Prototype};

/// Top-level form
///
/// One unit of interactive input, compiled independently of the others.
#[derive(Debug, Clone, PartialEq)]
pub enum Form {
    /// `def proto body`
    Definition(Function),
    /// `extern proto`
    Extern(Prototype),
    /// A bare expression, already wrapped in the anonymous function.
    Expression(Function),
}

impl Form {
    pub fn name(&self) -> &str {
        match self {
            Form::Definition(function) | Form::Expression(function) => &function.prototype.name,
            Form::Extern(prototype) => &prototype.name,
        }
    }
}
