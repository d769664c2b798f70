use super::expressions::Expr;

/// Default precedence of a `binary` operator declared without one.
pub const DEFAULT_BINARY_PRECEDENCE: u32 = 30;

/// Name given to the synthetic function wrapping a bare top-level expression.
///
/// Identifiers cannot start with `_`, so user code can never refer to it.
pub const ANON_EXPR_NAME: &str = "__anon_expr";

/// What kind of callable a prototype declares.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OperatorKind {
    Plain,
    UnaryOperator,
    BinaryOperator { precedence: u32 },
}

impl OperatorKind {
    /// Number of operands an operator of this kind takes.
    pub fn operand_count(&self) -> Option<usize> {
        match self {
            OperatorKind::Plain => None,
            OperatorKind::UnaryOperator => Some(1),
            OperatorKind::BinaryOperator { .. } => Some(2),
        }
    }
}

/// Prototype
///
/// The name and parameter list of a function. Operator prototypes carry
/// synthesized names (`unary!`, `binary|`) so that lookup by name also
/// encodes the operator's character and arity.
#[derive(Debug, Clone, PartialEq)]
pub struct Prototype {
    pub name: String,
    pub params: Vec<String>,
    pub kind: OperatorKind,
}

impl Prototype {
    pub fn new(name: &str, params: Vec<String>) -> Self {
        Prototype {
            name: String::from(name),
            params,
            kind: OperatorKind::Plain,
        }
    }

    pub fn unary_name(operator: char) -> String {
        format!("unary{}", operator)
    }

    pub fn binary_name(operator: char) -> String {
        format!("binary{}", operator)
    }

    /// The operator character for operator prototypes.
    pub fn operator_char(&self) -> Option<char> {
        match self.kind {
            OperatorKind::Plain => None,
            _ => self.name.chars().last(),
        }
    }

    /// Character and precedence when this prototype declares a binary operator.
    pub fn binary_precedence(&self) -> Option<(char, u32)> {
        match self.kind {
            OperatorKind::BinaryOperator { precedence } => {
                self.operator_char().map(|operator| (operator, precedence))
            }
            _ => None,
        }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// A function definition: one prototype and its body expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub prototype: Prototype,
    pub body: Expr,
}

impl Function {
    /// Wraps a bare expression in the zero-argument anonymous function.
    pub fn anonymous(body: Expr) -> Self {
        Function {
            prototype: Prototype::new(ANON_EXPR_NAME, vec![]),
            body,
        }
    }
}
