//! Error types for the compilation pipeline.

use thiserror::Error;

/// Errors raised while assembling or compiling a program.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CompileError {
    /// An option name nothing recognizes.
    #[error("unknown option '{0}'")]
    UnknownOption(String),

    /// An option value outside the allowed set.
    #[error("invalid value '{value}' for option '{name}' (allowed: {allowed})")]
    InvalidOptionValue {
        /// Option name.
        name: &'static str,
        /// The rejected value.
        value: String,
        /// Human-readable list of accepted values.
        allowed: &'static str,
    },

    /// A kernel name used twice within one program.
    #[error("duplicate kernel name '{0}'")]
    DuplicateKernel(String),

    /// A program needs more qubits than the platform has.
    #[error("program '{name}' requests {requested} qubits, platform has {available}")]
    TooManyQubits {
        /// Program name.
        name: String,
        /// Requested qubit count.
        requested: u32,
        /// Platform qubit count.
        available: u32,
    },

    /// A kernel's register file is wider than the program's.
    #[error("kernel '{kernel}' addresses {kernel_count} {what}, program declares {program_count}")]
    KernelExceedsProgram {
        /// Kernel name.
        kernel: String,
        /// Which register file, `qubits` or `cregs`.
        what: &'static str,
        /// The kernel's count.
        kernel_count: u32,
        /// The program's count.
        program_count: u32,
    },

    /// Compilation of a program with no kernels.
    #[error("program '{0}' has no kernels")]
    EmptyProgram(String),

    /// Output files could not be written.
    #[error("cannot write '{path}': {source}")]
    Io {
        /// Target path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Circuit construction failed.
    #[error(transparent)]
    Ir(#[from] hrimfax_ir::IrError),

    /// Platform loading or gate resolution failed.
    #[error(transparent)]
    Platform(#[from] hrimfax_platform::PlatformError),

    /// Scheduling failed.
    #[error(transparent)]
    Sched(#[from] hrimfax_sched::SchedError),

    /// Qasm input could not be parsed.
    #[error(transparent)]
    Qasm(#[from] hrimfax_qasm::QasmError),
}

/// Result alias for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;
