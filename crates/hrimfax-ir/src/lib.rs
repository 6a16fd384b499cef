//! Hrimfax Circuit Intermediate Representation
//!
//! This crate provides the core data structures for representing quantum
//! programs in hrimfax: gates, instructions, kernels, and the bundle
//! structure produced by the scheduler.
//!
//! # Overview
//!
//! A [`Kernel`] is a straight-line sequence of [`Instruction`]s over a
//! fixed number of qubits and classical registers. Instructions carry a
//! resolved gate (a [`DefaultGate`] or a platform-defined custom gate),
//! their operands, a duration in nanoseconds, and the signal type used
//! for resource-constrained scheduling. After scheduling, a kernel's
//! instructions are grouped into [`Bundle`]s of operations that start in
//! the same cycle.
//!
//! # Example: Building a Bell-pair kernel
//!
//! ```rust
//! use hrimfax_ir::{DefaultGate, Kernel, QubitId};
//!
//! let mut k = Kernel::new("bell", 2, 2);
//! k.prepz(QubitId(0)).unwrap();
//! k.prepz(QubitId(1)).unwrap();
//! k.default_gate(DefaultGate::H, &[QubitId(0)]).unwrap();
//! k.default_gate(DefaultGate::Cnot, &[QubitId(0), QubitId(1)]).unwrap();
//! k.measure(QubitId(0), hrimfax_ir::CregId(0)).unwrap();
//! k.measure(QubitId(1), hrimfax_ir::CregId(1)).unwrap();
//!
//! assert_eq!(k.instructions().len(), 6);
//! ```

pub mod bundle;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod kernel;
pub mod qubit;

pub use bundle::{Bundle, Bundles};
pub use error::{IrError, IrResult};
pub use gate::{CommuteClass, DefaultGate, SignalType};
pub use instruction::{Instruction, InstructionKind};
pub use kernel::Kernel;
pub use qubit::{CregId, QubitId};
