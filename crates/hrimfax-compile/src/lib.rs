//! Hrimfax Compilation Pipeline
//!
//! Ties the other crates together: a [`Program`] owns a
//! [`hrimfax_platform::Platform`] and a list of kernels built through
//! [`KernelBuilder`]; [`Program::compile`] runs the configured passes,
//! writes the unscheduled qasm, schedules every kernel, and writes the
//! scheduled qasm.
//!
//! # Example
//!
//! ```rust,no_run
//! use hrimfax_compile::{CompilerOptions, KernelBuilder, Program};
//! use hrimfax_platform::Platform;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let platform = Platform::from_file("device", "device.json")?;
//! let mut program = Program::new("bell", platform.clone(), platform.qubit_count(), 2)?;
//!
//! let mut k = KernelBuilder::new("main", &platform, 2, true);
//! k.prepz(0)?;
//! k.prepz(1)?;
//! k.gate("h", &[0])?;
//! k.gate("cnot", &[0, 1])?;
//! k.measure(0, 0)?;
//! k.measure(1, 1)?;
//! program.add_kernel(k.finish())?;
//!
//! let mut options = CompilerOptions::default();
//! options.set("scheduler", "ASAP")?;
//! let report = program.compile(&options)?;
//! if let Some(path) = &report.scheduled_path {
//!     println!("wrote {}", path.display());
//! }
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod error;
pub mod options;
pub mod pass;
pub mod passes;
pub mod program;

pub use builder::{kernels_from_qasm, KernelBuilder};
pub use error::{CompileError, CompileResult};
pub use options::{CompilerOptions, LogLevel, ToffoliDecomposition};
pub use pass::{Pass, PassContext, PassManager};
pub use program::{CompileReport, Program};
