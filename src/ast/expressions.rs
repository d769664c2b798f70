use std::fmt::Display;

/// Expression
///
/// The closed set of expression nodes. Every node owns its children, and
/// variable names are resolved only during code generation.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal, the only value type of the language.
    Number(f64),
    /// Reference to a function parameter or loop induction variable.
    Variable(String),
    /// Prefix application of a user-defined unary operator.
    Unary { operator: char, operand: Box<Expr> },
    /// Infix application of a built-in or user-defined binary operator.
    Binary {
        operator: char,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Call of a named function with positional arguments.
    Call { callee: String, arguments: Vec<Expr> },
    /// `if cond then a else b`; both branches are mandatory.
    If {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    /// `for var = start, end (, step)? in body`.
    ///
    /// A missing step is left as `None` here; the code generator substitutes
    /// the default increment.
    For {
        variable: String,
        start: Box<Expr>,
        end: Box<Expr>,
        step: Option<Box<Expr>>,
        body: Box<Expr>,
    },
}

impl Expr {
    pub fn binary(operator: char, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(operator: char, operand: Expr) -> Self {
        Expr::Unary {
            operator,
            operand: Box::new(operand),
        }
    }
}

/// Renders the tree as an s-expression, e.g. `(+ 1 (* 2 3))`.
impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Number(value) => write!(f, "{}", value),
            Expr::Variable(name) => write!(f, "{}", name),
            Expr::Unary { operator, operand } => write!(f, "({} {})", operator, operand),
            Expr::Binary { operator, left, right } => {
                write!(f, "({} {} {})", operator, left, right)
            }
            Expr::Call { callee, arguments } => {
                write!(f, "(call {}", callee)?;
                for argument in arguments {
                    write!(f, " {}", argument)?;
                }
                write!(f, ")")
            }
            Expr::If { condition, then_branch, else_branch } => {
                write!(f, "(if {} {} {})", condition, then_branch, else_branch)
            }
            Expr::For { variable, start, end, step, body } => {
                write!(f, "(for {} {} {}", variable, start, end)?;
                if let Some(step) = step {
                    write!(f, " {}", step)?;
                }
                write!(f, " {})", body)
            }
        }
    }
}
