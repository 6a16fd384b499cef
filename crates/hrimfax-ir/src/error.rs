//! Error types for IR construction.

use crate::qubit::{CregId, QubitId};
use thiserror::Error;

/// Errors raised while building or transforming circuits.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum IrError {
    /// A gate name could not be resolved against the platform or the
    /// default gate set.
    #[error("unknown gate '{0}'")]
    UnknownGate(String),

    /// A qubit operand is outside the kernel's qubit count.
    #[error("qubit {qubit} out of range: kernel has {count} qubits")]
    QubitOutOfRange {
        /// The offending operand.
        qubit: QubitId,
        /// Number of qubits in the kernel.
        count: u32,
    },

    /// A classical register operand is outside the kernel's register count.
    #[error("creg {creg} out of range: kernel has {count} registers")]
    CregOutOfRange {
        /// The offending operand.
        creg: CregId,
        /// Number of classical registers in the kernel.
        count: u32,
    },

    /// A gate received the wrong number of qubit operands.
    #[error("gate '{name}' expects {expected} qubit(s), got {got}")]
    OperandCount {
        /// Gate name.
        name: String,
        /// Expected operand count.
        expected: u32,
        /// Actual operand count.
        got: u32,
    },

    /// The same qubit appears twice in one gate's operand list.
    #[error("gate '{name}' uses qubit {qubit} more than once")]
    DuplicateOperand {
        /// Gate name.
        name: String,
        /// The repeated operand.
        qubit: QubitId,
    },

    /// A controlled version of a gate cannot be derived.
    #[error("cannot derive controlled form of gate '{0}'")]
    NoControlledForm(String),

    /// Controlled-kernel derivation supports a single control qubit.
    #[error("controlled kernels support exactly one control qubit, got {0}")]
    ControlCount(usize),
}

/// Result alias for IR operations.
pub type IrResult<T> = Result<T, IrError>;
