//! Incremental linker over sealed units.
//!
//! Every linked unit gets its own MCJIT execution engine. Calls a unit makes
//! to functions it does not define are bound when the unit is added, so
//! symbol resolution is decided here rather than by the JIT: the newest
//! linked unit defining the name first, then host library functions, then
//! symbols visible in the process.

use std::sync::Once;

use inkwell::{
    execution_engine::{ExecutionEngine, JitFunction},
    support::{load_visible_symbols, search_for_address_of_symbol},
    targets::{InitializationConfig, Target},
};

use crate::{
    compiler::{
        stdlib::host_address,
        unit::{SealedUnit, UnitId},
    },
    errors::errors::{Error, ErrorImpl},
};

type AnonymousFunction = unsafe extern "C" fn() -> f64;

static INIT_NATIVE: Once = Once::new();

fn initialize_native() -> Result<(), Error> {
    let mut result = Ok(());

    INIT_NATIVE.call_once(|| {
        result = Target::initialize_native(&InitializationConfig::default())
            .map_err(|message| Error::unpositioned(ErrorImpl::Backend { message }));
        load_visible_symbols();
    });

    result
}

struct LinkedUnit<'ctx> {
    unit: SealedUnit<'ctx>,
    engine: ExecutionEngine<'ctx>,
}

/// The set of units currently linked, oldest first.
pub struct Linker<'ctx> {
    units: Vec<LinkedUnit<'ctx>>,
}

impl<'ctx> Linker<'ctx> {
    pub fn new() -> Result<Self, Error> {
        initialize_native()?;

        Ok(Linker { units: vec![] })
    }

    /// Links `unit`, binding each of its external declarations.
    ///
    /// Fails with `UnresolvedSymbol` when a declaration resolves nowhere; the
    /// unit is then released without being linked.
    pub fn add(&mut self, unit: SealedUnit<'ctx>) -> Result<UnitId, Error> {
        let engine = unit.jit()?;

        for declaration in unit.declarations() {
            let name = declaration.get_name().to_string_lossy().to_string();

            let address = self
                .resolve(&name)
                .or_else(|| host_address(&name))
                .or_else(|| search_for_address_of_symbol(&name))
                .ok_or_else(|| Error::unpositioned(ErrorImpl::UnresolvedSymbol { symbol: name }))?;

            engine.add_global_mapping(&declaration, address);
        }

        let id = unit.id();
        self.units.push(LinkedUnit { unit, engine });

        Ok(id)
    }

    /// Address of the newest linked definition of `name`.
    pub fn resolve(&self, name: &str) -> Option<usize> {
        self.units
            .iter()
            .rev()
            .filter(|linked| linked.unit.defines(name))
            .find_map(|linked| linked.engine.get_function_address(name).ok())
    }

    /// Calls the zero-argument function `name` defined in unit `id`.
    pub fn call(&self, id: UnitId, name: &str) -> Result<f64, Error> {
        let linked = self
            .units
            .iter()
            .find(|linked| linked.unit.id() == id)
            .ok_or_else(|| {
                Error::unpositioned(ErrorImpl::Backend {
                    message: format!("{} is not linked", id),
                })
            })?;

        let function: JitFunction<'_, AnonymousFunction> = unsafe { linked.engine.get_function(name) }
            .map_err(|error| {
                Error::unpositioned(ErrorImpl::Backend {
                    message: format!("{}: {}", name, error),
                })
            })?;

        Ok(unsafe { function.call() })
    }

    /// Releases unit `id` and its JIT memory. Returns false if it was not linked.
    pub fn remove(&mut self, id: UnitId) -> bool {
        let count = self.units.len();
        self.units.retain(|linked| linked.unit.id() != id);

        self.units.len() != count
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
