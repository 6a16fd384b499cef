//! Error types for platform loading.

use thiserror::Error;

/// Errors raised while loading or querying a platform configuration.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PlatformError {
    /// The configuration file could not be read.
    #[error("cannot read platform configuration '{path}': {source}")]
    Io {
        /// Path of the configuration file.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON or is missing mandatory
    /// fields.
    #[error("malformed platform configuration: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A matrix entry does not have 2^n x 2^n complex entries.
    #[error("instruction '{name}': matrix has {got} entries, expected {expected}")]
    BadMatrix {
        /// Instruction name.
        name: String,
        /// Expected entry count.
        expected: usize,
        /// Actual entry count.
        got: usize,
    },

    /// A specialized instruction key names an operand that cannot be
    /// parsed as a qubit.
    #[error("instruction '{0}': malformed operand list in key")]
    BadInstructionKey(String),

    /// A decomposition rule is malformed.
    #[error("decomposition '{key}': {reason}")]
    BadDecomposition {
        /// The rule key as written in the configuration.
        key: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A decomposition expands into itself.
    #[error("decomposition of '{0}' exceeds the expansion depth limit")]
    DecompositionDepth(String),

    /// The configuration names a backend this compiler cannot drive.
    /// `none` and `qx` mean qasm-only output and are accepted.
    #[error("unsupported eqasm_compiler '{0}'")]
    UnsupportedBackend(String),

    /// An instruction declares an unknown signal type.
    #[error("instruction '{name}': unknown signal type '{signal}'")]
    UnknownSignal {
        /// Instruction name.
        name: String,
        /// The unparseable type string.
        signal: String,
    },

    /// A resource section references a qubit outside the platform.
    #[error("resource '{resource}': qubit {qubit} out of range ({count} qubits)")]
    ResourceQubit {
        /// Resource name.
        resource: String,
        /// Offending qubit index.
        qubit: u32,
        /// Platform qubit count.
        count: u32,
    },

    /// Gate resolution failed.
    #[error(transparent)]
    Ir(#[from] hrimfax_ir::IrError),
}

/// Result alias for platform operations.
pub type PlatformResult<T> = Result<T, PlatformError>;
