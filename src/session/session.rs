//! Compilation session.
//!
//! The session drives one top-level form at a time through parsing, code
//! generation and linking. It owns the state that outlives a single form:
//! the operator table, the prototype registry, the open compilation unit
//! and the linker.

use std::fmt::Display;

use inkwell::{context::Context, values::AnyValue};

use crate::{
    ast::{
        ast::Form,
        declarations::{Function, Prototype, ANON_EXPR_NAME},
    },
    compiler::{
        compiler::{Compiler, PrototypeRegistry},
        unit::{CompilationUnit, UnitId},
    },
    errors::errors::Error,
    lexer::{lexer::tokenize, tokens::TokenKind},
    parser::{
        lookups::OperatorTable,
        parser::{parse_form, Parser},
    },
};

use super::linker::Linker;

/// Knobs a session is constructed with.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    /// Run the function optimization pipeline
    pub optimize: bool,
    /// Echo the IR of every compiled form to stderr
    pub emit_ir: bool,
    /// Name reported in diagnostics, `shell` when absent
    pub file: Option<String>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        SessionOptions {
            optimize: true,
            emit_ir: false,
            file: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No form processed yet, no unit open
    Idle,
    /// A form is being generated into the open unit
    UnitOpen,
    /// Between forms, with a fresh or extern-only unit open
    AwaitingForm,
}

/// What a successfully processed form did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Defined(String),
    Declared(String),
    Evaluated(f64),
}

impl Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Defined(name) => write!(f, "Defined {}", name),
            Outcome::Declared(name) => write!(f, "Declared {}", name),
            Outcome::Evaluated(value) => write!(f, "Evaluated to {:.6}", value),
        }
    }
}

pub struct Session<'ctx> {
    context: &'ctx Context,
    options: SessionOptions,
    operators: OperatorTable,
    prototypes: PrototypeRegistry,
    unit: Option<CompilationUnit<'ctx>>,
    linker: Linker<'ctx>,
    next_unit: usize,
    state: SessionState,
}

impl<'ctx> Session<'ctx> {
    pub fn new(context: &'ctx Context, options: SessionOptions) -> Result<Self, Error> {
        Ok(Session {
            context,
            options,
            operators: OperatorTable::default(),
            prototypes: PrototypeRegistry::with_host_functions(),
            unit: None,
            linker: Linker::new()?,
            next_unit: 0,
            state: SessionState::Idle,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn operators(&self) -> &OperatorTable {
        &self.operators
    }

    pub fn prototypes(&self) -> &PrototypeRegistry {
        &self.prototypes
    }

    pub fn linker(&self) -> &Linker<'ctx> {
        &self.linker
    }

    /// Processes every form in `source`, collecting one result per form.
    pub fn run(&mut self, source: &str) -> Vec<Result<Outcome, Error>> {
        let mut results = vec![];
        self.run_with(source, |result| results.push(result));
        results
    }

    /// Processes every form in `source`, calling `callback` once per form.
    ///
    /// `;` separators are skipped. After a parse failure the offending token
    /// is dropped and parsing resumes right after it. A lexer failure is
    /// reported once and nothing is processed.
    pub fn run_with<F>(&mut self, source: &str, mut callback: F)
    where
        F: FnMut(Result<Outcome, Error>),
    {
        let tokens = match tokenize(String::from(source), self.options.file.clone()) {
            Ok(tokens) => tokens,
            Err(error) => {
                callback(Err(error));
                return;
            }
        };

        let mut cursor = 0;
        while let Some(token) = tokens.get(cursor) {
            if token.kind == TokenKind::EOF {
                break;
            }

            if token.is_char(';') {
                cursor += 1;
                continue;
            }

            let (parsed, position) = {
                let mut parser = Parser::new(&tokens, cursor, &self.operators);
                let parsed = parse_form(&mut parser);
                (parsed, parser.cursor())
            };

            match parsed {
                Ok(form) => {
                    cursor = position;
                    callback(self.process_form(&form));
                }
                Err(error) => {
                    cursor = position + 1;
                    self.discard_unit();
                    self.state = SessionState::AwaitingForm;
                    callback(Err(error));
                }
            }
        }
    }

    /// Generates, links and (for bare expressions) runs one parsed form.
    pub fn process_form(&mut self, form: &Form) -> Result<Outcome, Error> {
        if self.unit.is_none() {
            self.unit = Some(self.fresh_unit());
        }
        self.state = SessionState::UnitOpen;

        let result = match form {
            Form::Definition(function) => self
                .compile_and_link(function, "Read function definition:")
                .map(|_| Outcome::Defined(String::from(form.name()))),
            Form::Extern(prototype) => {
                self.handle_extern(prototype);
                Ok(Outcome::Declared(String::from(form.name())))
            }
            Form::Expression(function) => self.handle_top_level_expression(function),
        };

        if result.is_err() || self.unit.is_none() {
            self.discard_unit();
        }
        self.state = SessionState::AwaitingForm;

        result
    }

    fn handle_extern(&mut self, prototype: &Prototype) {
        if self.options.emit_ir {
            eprintln!("Read extern:");
            eprintln!("{}", declaration_ir(prototype));
        }

        self.prototypes.insert(prototype.clone());
    }

    fn handle_top_level_expression(&mut self, function: &Function) -> Result<Outcome, Error> {
        let id = self.compile_and_link(function, "Read top-level expression:")?;

        let result = self.linker.call(id, ANON_EXPR_NAME);

        self.linker.remove(id);
        self.prototypes.restore(ANON_EXPR_NAME, None);

        Ok(Outcome::Evaluated(result?))
    }

    /// Generates `function` into the open unit, seals the unit and links it.
    ///
    /// When linking fails, the prototype registry and operator table are put
    /// back to how they were before the function was generated.
    fn compile_and_link(&mut self, function: &Function, heading: &str) -> Result<UnitId, Error> {
        let unit = self.take_unit();
        let name = &function.prototype.name;

        let previous_prototype = self.prototypes.get(name).cloned();
        let previous_operators = self.operators.clone();

        let function_value = {
            let mut compiler = Compiler::new(
                self.context,
                &unit,
                &mut self.prototypes,
                &mut self.operators,
            );
            compiler.gen_function(function)?
        };

        if self.options.emit_ir {
            eprintln!("{}", heading);
            eprintln!("{}", function_value.print_to_string().to_string());
        }

        match self.linker.add(unit.seal()) {
            Ok(id) => Ok(id),
            Err(error) => {
                self.prototypes.restore(name, previous_prototype);
                self.operators = previous_operators;
                Err(error)
            }
        }
    }

    fn take_unit(&mut self) -> CompilationUnit<'ctx> {
        match self.unit.take() {
            Some(unit) => unit,
            None => self.fresh_unit(),
        }
    }

    fn discard_unit(&mut self) {
        self.unit = Some(self.fresh_unit());
    }

    fn fresh_unit(&mut self) -> CompilationUnit<'ctx> {
        let id = UnitId(self.next_unit);
        self.next_unit += 1;

        CompilationUnit::new(self.context, id, self.options.optimize)
    }
}

/// Textual IR of the declaration an extern stands for.
fn declaration_ir(prototype: &Prototype) -> String {
    let params = vec!["double"; prototype.arity()].join(", ");

    if prototype.name.chars().all(|c| c.is_ascii_alphanumeric()) {
        format!("declare double @{}({})", prototype.name, params)
    } else {
        format!("declare double @\"{}\"({})", prototype.name, params)
    }
}
