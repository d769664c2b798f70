//! Host library functions.
//!
//! `putchard` and `printd` are implemented in Rust with the C calling
//! convention and mapped into every unit that calls them. Their prototypes
//! are pre-registered so programs can call them without an `extern`.
//!
//! Output goes to stderr unless a [`capture_output`] call is active on the
//! current thread, in which case it is appended to the capture buffer.

use std::cell::RefCell;

use crate::ast::declarations::Prototype;

type HostFunction = extern "C" fn(f64) -> f64;

thread_local! {
    static CAPTURE: RefCell<Option<String>> = const { RefCell::new(None) };
}

fn emit(text: &str) {
    CAPTURE.with(|capture| match capture.borrow_mut().as_mut() {
        Some(buffer) => buffer.push_str(text),
        None => eprint!("{}", text),
    });
}

/// Writes the byte `x` as a character. Returns 0.
pub extern "C" fn putchard(x: f64) -> f64 {
    emit(&char::from(x as u8).to_string());
    0.0
}

/// Writes `x` with six decimals and a newline. Returns 0.
pub extern "C" fn printd(x: f64) -> f64 {
    emit(&format!("{:.6}\n", x));
    0.0
}

/// Runs `f`, collecting everything the host functions print meanwhile.
///
/// Captures nest; the outer buffer does not see the inner capture's output.
pub fn capture_output<R>(f: impl FnOnce() -> R) -> (R, String) {
    let previous = CAPTURE.with(|capture| capture.borrow_mut().replace(String::new()));
    let result = f();
    let captured = CAPTURE.with(|capture| {
        let mut capture = capture.borrow_mut();
        let captured = capture.take().unwrap_or_default();
        *capture = previous;
        captured
    });

    (result, captured)
}

/// Name, address and arity of every host function.
pub fn host_functions() -> [(&'static str, usize, usize); 2] {
    [
        ("putchard", putchard as HostFunction as usize, 1),
        ("printd", printd as HostFunction as usize, 1),
    ]
}

pub fn host_address(name: &str) -> Option<usize> {
    host_functions()
        .iter()
        .find(|(host_name, _, _)| *host_name == name)
        .map(|(_, address, _)| *address)
}

pub fn host_prototypes() -> Vec<Prototype> {
    host_functions()
        .iter()
        .map(|(name, _, arity)| {
            let params = (0..*arity).map(|i| format!("x{}", i)).collect();
            Prototype::new(name, params)
        })
        .collect()
}
