//! Compilation units.
//!
//! A [`CompilationUnit`] is an open LLVM module that functions are generated
//! into. Sealing it produces a [`SealedUnit`], which offers read-only queries
//! and can only be handed to the linker.

use std::fmt::Display;

use inkwell::{
    context::Context,
    execution_engine::ExecutionEngine,
    module::Module,
    passes::PassManager,
    values::FunctionValue,
    OptimizationLevel,
};

use crate::errors::errors::{Error, ErrorImpl};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnitId(pub usize);

impl Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unit{}", self.0)
    }
}

/// An open module plus the function pass manager bound to it.
pub struct CompilationUnit<'ctx> {
    // Declared before `module` so it is dropped first.
    fpm: Option<PassManager<FunctionValue<'ctx>>>,
    module: Module<'ctx>,
    id: UnitId,
}

impl<'ctx> CompilationUnit<'ctx> {
    /// Creates an empty unit.
    ///
    /// # Arguments
    ///
    /// * `context` - The LLVM context owning every unit of the session
    /// * `id` - Identifier, also used as the module name
    /// * `optimize` - Whether finished functions go through the pass pipeline
    pub fn new(context: &'ctx Context, id: UnitId, optimize: bool) -> Self {
        let module = context.create_module(&id.to_string());

        let fpm = if optimize {
            let fpm = PassManager::create(&module);

            fpm.add_instruction_combining_pass();
            fpm.add_reassociate_pass(); // Reorder expressions to enable better optimizations
            fpm.add_gvn_pass(); // Eliminate common subexpressions
            fpm.add_cfg_simplification_pass(); // Simplify the control flow graph
            fpm.initialize();

            Some(fpm)
        } else {
            None
        };

        CompilationUnit { fpm, module, id }
    }

    pub fn id(&self) -> UnitId {
        self.id
    }

    pub fn module(&self) -> &Module<'ctx> {
        &self.module
    }

    /// Runs the optimization pipeline over one finished function.
    pub fn optimize(&self, function: &FunctionValue<'ctx>) {
        if let Some(fpm) = &self.fpm {
            fpm.run_on(function);
        }
    }

    /// Closes the unit to further changes.
    pub fn seal(self) -> SealedUnit<'ctx> {
        let CompilationUnit { fpm, module, id } = self;
        drop(fpm);

        SealedUnit { module, id }
    }
}

/// A unit that can no longer be changed.
pub struct SealedUnit<'ctx> {
    module: Module<'ctx>,
    id: UnitId,
}

impl<'ctx> SealedUnit<'ctx> {
    pub fn id(&self) -> UnitId {
        self.id
    }

    pub fn get_function(&self, name: &str) -> Option<FunctionValue<'ctx>> {
        self.module.get_function(name)
    }

    /// True when the unit contains a body for `name`.
    pub fn defines(&self, name: &str) -> bool {
        self.get_function(name)
            .map(|function| function.count_basic_blocks() > 0)
            .unwrap_or(false)
    }

    /// Functions the unit calls but does not define.
    pub fn declarations(&self) -> Vec<FunctionValue<'ctx>> {
        self.module
            .get_functions()
            .filter(|function| function.count_basic_blocks() == 0)
            .collect()
    }

    pub fn print_to_string(&self) -> String {
        self.module.print_to_string().to_string()
    }

    /// Hands the module to a fresh MCJIT execution engine.
    pub(crate) fn jit(&self) -> Result<ExecutionEngine<'ctx>, Error> {
        self.module
            .create_jit_execution_engine(OptimizationLevel::None)
            .map_err(|message| {
                Error::unpositioned(ErrorImpl::Backend {
                    message: message.to_string(),
                })
            })
    }
}
