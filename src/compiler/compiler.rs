//! Main compiler module.
//!
//! This module contains the core Compiler structure, which lowers one
//! function definition at a time into the currently open compilation unit,
//! and the process-wide prototype registry it resolves callees against.

use std::collections::HashMap;

use inkwell::{
    basic_block::BasicBlock,
    builder::Builder,
    context::Context,
    module::Linkage,
    types::BasicMetadataTypeEnum,
    values::{FloatValue, FunctionValue},
};

use crate::{
    ast::declarations::{Function, Prototype},
    errors::errors::{Error, ErrorImpl},
    parser::lookups::OperatorTable,
};

use super::{expr::gen_expression, stdlib::host_prototypes, unit::CompilationUnit};

/// Most recently seen prototype for every function name.
///
/// Lives for the whole session. Whenever a callee is not materialized in the
/// current unit, its prototype is re-declared there from this registry.
#[derive(Debug, Clone, Default)]
pub struct PrototypeRegistry {
    prototypes: HashMap<String, Prototype>,
}

impl PrototypeRegistry {
    /// A registry that already knows the host library functions.
    pub fn with_host_functions() -> Self {
        let mut registry = PrototypeRegistry::default();
        for prototype in host_prototypes() {
            registry.insert(prototype);
        }
        registry
    }

    /// Records `prototype`, returning the one it replaces.
    pub fn insert(&mut self, prototype: Prototype) -> Option<Prototype> {
        self.prototypes.insert(prototype.name.clone(), prototype)
    }

    pub fn get(&self, name: &str) -> Option<&Prototype> {
        self.prototypes.get(name)
    }

    /// Puts back the entry `insert` replaced, or removes the name.
    pub fn restore(&mut self, name: &str, previous: Option<Prototype>) {
        match previous {
            Some(prototype) => {
                self.prototypes.insert(String::from(name), prototype);
            }
            None => {
                self.prototypes.remove(name);
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.prototypes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }
}

/// The compiler state for generating code into one compilation unit.
///
/// This structure holds:
/// - The LLVM context and an IR builder (the insertion cursor)
/// - The open unit that functions are generated into
/// - The prototype registry and operator table shared with the session
/// - The variable scope of the function currently being generated
///
/// # Type Parameters
///
/// * `'a` - Lifetime of the borrowed session state
/// * `'ctx` - Lifetime of the LLVM context
pub struct Compiler<'a, 'ctx> {
    /// Reference to the LLVM context
    pub context: &'ctx Context,
    /// The LLVM IR builder
    pub builder: Builder<'ctx>,
    /// The unit being generated into
    pub unit: &'a CompilationUnit<'ctx>,
    /// Session-wide prototypes, used to re-declare callees from other units
    pub prototypes: &'a mut PrototypeRegistry,
    /// Binary operator precedences, extended when an operator compiles
    pub operators: &'a mut OperatorTable,
    /// Parameters and loop variables in scope for the current function
    pub named_values: HashMap<String, FloatValue<'ctx>>,
}

impl<'a, 'ctx> Compiler<'a, 'ctx> {
    /// Creates a new Compiler instance.
    ///
    /// # Arguments
    ///
    /// * `context` - Reference to the LLVM context
    /// * `unit` - The open compilation unit to generate into
    /// * `prototypes` - The session's prototype registry
    /// * `operators` - The session's operator table
    pub fn new(
        context: &'ctx Context,
        unit: &'a CompilationUnit<'ctx>,
        prototypes: &'a mut PrototypeRegistry,
        operators: &'a mut OperatorTable,
    ) -> Self {
        Compiler {
            context,
            builder: context.create_builder(),
            unit,
            prototypes,
            operators,
            named_values: HashMap::new(),
        }
    }

    /// Looks up a callee: first in the unit, then by re-declaring the
    /// registered prototype into the unit.
    pub fn get_function(&self, name: &str) -> Option<FunctionValue<'ctx>> {
        if let Some(function) = self.unit.module().get_function(name) {
            return Some(function);
        }

        self.prototypes
            .get(name)
            .map(|prototype| self.gen_prototype(prototype))
    }

    /// Declares `prototype` in the unit: all-double signature, external
    /// linkage, parameters named after the prototype.
    pub fn gen_prototype(&self, prototype: &Prototype) -> FunctionValue<'ctx> {
        let f64_type = self.context.f64_type();
        let param_types: Vec<BasicMetadataTypeEnum> = vec![f64_type.into(); prototype.arity()];
        let function_type = f64_type.fn_type(&param_types, false);

        let function = self.unit.module().add_function(
            &prototype.name,
            function_type,
            Some(Linkage::External),
        );

        for (param, name) in function.get_param_iter().zip(prototype.params.iter()) {
            param.into_float_value().set_name(name);
        }

        function
    }

    /// Generates a complete function definition.
    ///
    /// The prototype is registered before the body is generated so the body
    /// can call itself. On failure the partially built function is deleted
    /// and the registry entry it replaced is put back. A binary operator is
    /// installed in the operator table only once its function has been
    /// verified and optimized.
    pub fn gen_function(&mut self, function: &Function) -> Result<FunctionValue<'ctx>, Error> {
        let prototype = &function.prototype;
        let previous = self.prototypes.insert(prototype.clone());

        let result = self.gen_function_body(function);

        match result {
            Ok(function_value) => {
                if let Some((operator, precedence)) = prototype.binary_precedence() {
                    self.operators.install(operator, precedence);
                }
                Ok(function_value)
            }
            Err(error) => {
                self.prototypes.restore(&prototype.name, previous);
                Err(error)
            }
        }
    }

    fn gen_function_body(&mut self, function: &Function) -> Result<FunctionValue<'ctx>, Error> {
        let prototype = &function.prototype;

        let function_value = match self.unit.module().get_function(&prototype.name) {
            Some(existing)
                if existing.count_basic_blocks() > 0
                    || existing.count_params() as usize != prototype.arity() =>
            {
                return Err(Error::unpositioned(ErrorImpl::InvalidFunction {
                    function: prototype.name.clone(),
                }));
            }
            Some(existing) => {
                for (param, name) in existing.get_param_iter().zip(prototype.params.iter()) {
                    param.into_float_value().set_name(name);
                }
                existing
            }
            None => self.gen_prototype(prototype),
        };

        let entry = self.create_basic_block("entry", function_value);
        self.builder.position_at_end(entry);

        self.named_values.clear();
        for (param, name) in function_value.get_param_iter().zip(prototype.params.iter()) {
            self.named_values.insert(name.clone(), param.into_float_value());
        }

        if let Err(error) = self.gen_return(function) {
            unsafe { function_value.delete() };
            return Err(error);
        }

        if !function_value.verify(false) {
            unsafe { function_value.delete() };
            return Err(Error::unpositioned(ErrorImpl::InvalidFunction {
                function: prototype.name.clone(),
            }));
        }

        self.unit.optimize(&function_value);

        Ok(function_value)
    }

    fn gen_return(&mut self, function: &Function) -> Result<(), Error> {
        let value = gen_expression(self, &function.body)?;
        self.builder.build_return(Some(&value))?;

        Ok(())
    }

    /// The function the cursor is currently inside.
    pub fn current_function(&self) -> Result<FunctionValue<'ctx>, Error> {
        self.current_block()?.get_parent().ok_or_else(|| {
            Error::unpositioned(ErrorImpl::Backend {
                message: String::from("insertion block has no parent function"),
            })
        })
    }

    /// The block the cursor is currently positioned in.
    pub fn current_block(&self) -> Result<BasicBlock<'ctx>, Error> {
        self.builder.get_insert_block().ok_or_else(|| {
            Error::unpositioned(ErrorImpl::Backend {
                message: String::from("builder is not positioned in a block"),
            })
        })
    }

    /// Creates a new basic block at the end of `function`.
    pub fn create_basic_block(&self, name: &str, function: FunctionValue<'ctx>) -> BasicBlock<'ctx> {
        self.context.append_basic_block(function, name)
    }
}
