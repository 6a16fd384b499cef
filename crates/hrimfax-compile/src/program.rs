//! Programs and the compile pipeline.

use crate::error::{CompileError, CompileResult};
use crate::options::{CompilerOptions, ToffoliDecomposition};
use crate::pass::{PassContext, PassManager};
use crate::passes::{DecomposeToffoli, Optimize};
use hrimfax_ir::Kernel;
use hrimfax_platform::Platform;
use hrimfax_qasm::{emit_program, emit_scheduled};
use hrimfax_sched::{Scheduler, SchedulerKind};
use std::path::{Path, PathBuf};
use tracing::info;

/// A named collection of kernels bound to one platform.
#[derive(Debug, Clone)]
pub struct Program {
    name: String,
    platform: Platform,
    qubit_count: u32,
    creg_count: u32,
    kernels: Vec<Kernel>,
}

/// What one compilation produced.
#[derive(Debug, Clone)]
pub struct CompileReport {
    /// Unscheduled qasm text.
    pub qasm: String,
    /// Scheduled qasm text.
    pub scheduled_qasm: String,
    /// Path of the unscheduled qasm file, when files were written.
    pub qasm_path: Option<PathBuf>,
    /// Path of the scheduled qasm file, when files were written.
    pub scheduled_path: Option<PathBuf>,
    /// Depth in cycles per kernel, in program order.
    pub kernel_depths: Vec<(String, u64)>,
}

impl Program {
    /// Create an empty program over `qubit_count` qubits of the
    /// platform.
    pub fn new(
        name: impl Into<String>,
        platform: Platform,
        qubit_count: u32,
        creg_count: u32,
    ) -> CompileResult<Self> {
        let name = name.into();
        if qubit_count > platform.qubit_count() {
            return Err(CompileError::TooManyQubits {
                name,
                requested: qubit_count,
                available: platform.qubit_count(),
            });
        }
        Ok(Program {
            name,
            platform,
            qubit_count,
            creg_count,
            kernels: Vec::new(),
        })
    }

    /// Program name; output files derive from it.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The bound platform.
    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Qubit count declared for this program.
    pub fn qubit_count(&self) -> u32 {
        self.qubit_count
    }

    /// Classical register count shared by the kernels.
    pub fn creg_count(&self) -> u32 {
        self.creg_count
    }

    /// The kernels added so far.
    pub fn kernels(&self) -> &[Kernel] {
        &self.kernels
    }

    /// Append a kernel. Names must be unique and the kernel's register
    /// file must fit the program's.
    pub fn add_kernel(&mut self, kernel: Kernel) -> CompileResult<()> {
        if self.kernels.iter().any(|k| k.name() == kernel.name()) {
            return Err(CompileError::DuplicateKernel(kernel.name().to_string()));
        }
        if kernel.qubit_count() > self.qubit_count {
            return Err(CompileError::KernelExceedsProgram {
                kernel: kernel.name().to_string(),
                what: "qubits",
                kernel_count: kernel.qubit_count(),
                program_count: self.qubit_count,
            });
        }
        if kernel.creg_count() > self.creg_count {
            return Err(CompileError::KernelExceedsProgram {
                kernel: kernel.name().to_string(),
                what: "cregs",
                kernel_count: kernel.creg_count(),
                program_count: self.creg_count,
            });
        }
        self.kernels.push(kernel);
        Ok(())
    }

    /// Run the pipeline: passes, unscheduled qasm, scheduling,
    /// scheduled qasm.
    ///
    /// With `write_qasm` on (the default) this writes `<name>.qasm` and
    /// `<name>_scheduled.qasm` into the options' output directory,
    /// creating it when missing. The report carries both texts either
    /// way.
    pub fn compile(&self, options: &CompilerOptions) -> CompileResult<CompileReport> {
        if self.kernels.is_empty() {
            return Err(CompileError::EmptyProgram(self.name.clone()));
        }
        info!(program = %self.name, kernels = self.kernels.len(), "compiling");
        let mut kernels = self.kernels.clone();

        let mut pm = PassManager::new();
        if options.optimize {
            pm.push(Box::new(Optimize));
        }
        if options.decompose_toffoli != ToffoliDecomposition::No {
            pm.push(Box::new(DecomposeToffoli));
        }
        let ctx = PassContext {
            platform: &self.platform,
            options,
        };
        pm.run(&mut kernels, &ctx)?;

        let qasm = emit_program(&kernels, self.qubit_count, self.platform.cycle_time());

        let kind = options.scheduler_kind();
        let scheduler = Scheduler::new(&self.platform, kind, options.scheduler_commute);
        // Uniform balancing assumes dependence-only slack windows, so it
        // bypasses the resource state.
        let constrained =
            !self.platform.resources().is_empty() && kind != SchedulerKind::AlapUniform;

        let mut schedules = Vec::with_capacity(kernels.len());
        let mut kernel_depths = Vec::with_capacity(kernels.len());
        for kernel in &kernels {
            let schedule = if constrained {
                scheduler.run_constrained(kernel)?
            } else {
                scheduler.run(kernel)?
            };
            kernel_depths.push((kernel.name().to_string(), schedule.depth));
            schedules.push(schedule);
        }

        let pairs: Vec<_> = kernels
            .iter()
            .zip(&schedules)
            .map(|(k, s)| (k, &s.bundles))
            .collect();
        let scheduled_qasm = emit_scheduled(&pairs, self.qubit_count);

        let (qasm_path, scheduled_path) = if options.write_qasm {
            std::fs::create_dir_all(&options.output_dir).map_err(|source| CompileError::Io {
                path: options.output_dir.display().to_string(),
                source,
            })?;
            let qasm_path = options.output_dir.join(format!("{}.qasm", self.name));
            write(&qasm_path, &qasm)?;
            let scheduled_path = options
                .output_dir
                .join(format!("{}_scheduled.qasm", self.name));
            write(&scheduled_path, &scheduled_qasm)?;
            info!(
                program = %self.name,
                qasm = %qasm_path.display(),
                scheduled = %scheduled_path.display(),
                "compilation finished"
            );
            (Some(qasm_path), Some(scheduled_path))
        } else {
            info!(program = %self.name, "compilation finished, qasm output suppressed");
            (None, None)
        };

        Ok(CompileReport {
            qasm,
            scheduled_qasm,
            qasm_path,
            scheduled_path,
            kernel_depths,
        })
    }
}

fn write(path: &Path, text: &str) -> CompileResult<()> {
    std::fs::write(path, text).map_err(|source| CompileError::Io {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrimfax_ir::QubitId;

    fn platform() -> Platform {
        Platform::from_json_str(
            "prog",
            r#"{ "hardware_settings": { "qubit_number": 2, "cycle_time": 20 } }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_qubit_count_checked_against_platform() {
        let err = Program::new("p", platform(), 5, 0).unwrap_err();
        assert!(matches!(
            err,
            CompileError::TooManyQubits {
                requested: 5,
                available: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_duplicate_kernel_rejected() {
        let mut p = Program::new("p", platform(), 2, 0).unwrap();
        p.add_kernel(Kernel::new("k", 2, 0)).unwrap();
        let err = p.add_kernel(Kernel::new("k", 2, 0)).unwrap_err();
        assert!(matches!(err, CompileError::DuplicateKernel(_)));
    }

    #[test]
    fn test_oversized_kernel_rejected() {
        let mut p = Program::new("p", platform(), 1, 0).unwrap();
        let err = p.add_kernel(Kernel::new("wide", 2, 0)).unwrap_err();
        assert!(matches!(
            err,
            CompileError::KernelExceedsProgram { what: "qubits", .. }
        ));
    }

    #[test]
    fn test_empty_program_rejected() {
        let p = Program::new("p", platform(), 2, 0).unwrap();
        let err = p.compile(&CompilerOptions::default()).unwrap_err();
        assert!(matches!(err, CompileError::EmptyProgram(_)));
    }

    #[test]
    fn test_compile_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut prog = Program::new("bell", platform(), 2, 0).unwrap();
        let mut k = Kernel::new("main", 2, 0);
        k.h(QubitId(0)).unwrap();
        k.cnot(QubitId(0), QubitId(1)).unwrap();
        prog.add_kernel(k).unwrap();

        let mut options = CompilerOptions::default();
        options.output_dir = dir.path().to_path_buf();
        let report = prog.compile(&options).unwrap();

        let qasm_path = report.qasm_path.unwrap();
        let scheduled_path = report.scheduled_path.unwrap();
        assert!(qasm_path.ends_with("bell.qasm"));
        assert!(scheduled_path.ends_with("bell_scheduled.qasm"));
        let plain = std::fs::read_to_string(&qasm_path).unwrap();
        assert_eq!(plain, report.qasm);
        assert!(plain.contains(".main"));
        assert!(plain.contains("cnot q[0],q[1]"));
        let sched = std::fs::read_to_string(&scheduled_path).unwrap();
        assert!(sched.contains("# total depth:"));
        assert_eq!(report.kernel_depths.len(), 1);
        assert!(report.kernel_depths[0].1 > 0);
    }

    #[test]
    fn test_write_qasm_off_keeps_text_only() {
        let mut prog = Program::new("dry", platform(), 2, 0).unwrap();
        let mut k = Kernel::new("main", 2, 0);
        k.x(QubitId(0)).unwrap();
        prog.add_kernel(k).unwrap();

        let mut options = CompilerOptions::default();
        options.set("write_qasm", "no").unwrap();
        let report = prog.compile(&options).unwrap();
        assert!(report.qasm_path.is_none());
        assert!(report.scheduled_path.is_none());
        assert!(report.qasm.contains("x q[0]"));
        assert!(report.scheduled_qasm.contains("x q[0]"));
    }
}
