//! Error types for scheduling.

use thiserror::Error;

/// Errors raised during dependence analysis or scheduling.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SchedError {
    /// The dependence graph contains a cycle. This indicates corrupted
    /// input; straight-line kernels always produce a DAG.
    #[error("dependence graph of kernel '{0}' is cyclic")]
    CyclicDependences(String),

    /// No cycle could be found at which an instruction's resources
    /// become available.
    #[error("resource deadlock scheduling '{instruction}' in kernel '{kernel}'")]
    ResourceDeadlock {
        /// Kernel name.
        kernel: String,
        /// The instruction text that could not be placed.
        instruction: String,
    },
}

/// Result alias for scheduling operations.
pub type SchedResult<T> = Result<T, SchedError>;
