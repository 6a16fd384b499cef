//! Hrimfax Common QASM
//!
//! Reader and writer for the common qasm dialect (version 1.0): a
//! `version` header, a `qubits` declaration, and `.name`-labelled
//! kernel sections of gate statements, with `{ a | b }` bundles and
//! `wait n` in scheduled files.
//!
//! # Example
//!
//! ```rust
//! use hrimfax_qasm::parse;
//!
//! let src = "\
//! version 1.0
//! qubits 2
//!
//! .bell
//!     h q[0]
//!     cnot q[0],q[1]
//! ";
//! let program = parse(src).unwrap();
//! assert_eq!(program.qubits, 2);
//! assert_eq!(program.kernels[0].name, "bell");
//! ```

pub mod ast;
pub mod emitter;
pub mod error;
pub mod lexer;
pub mod parser;

pub use ast::{QasmKernel, QasmProgram, QasmStatement, StatementGate};
pub use emitter::{emit_program, emit_scheduled};
pub use error::{QasmError, QasmResult};
pub use parser::parse;
