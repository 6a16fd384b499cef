//! Kernel construction against a platform.
//!
//! [`KernelBuilder`] is the front door for building circuits: gate
//! names go through the platform's resolution chain (specialized entry,
//! parameterized entry, decomposition, then the default gate set when
//! enabled), and the resolved instructions land in the kernel.

use crate::error::CompileResult;
use hrimfax_ir::{CregId, Kernel, QubitId};
use hrimfax_platform::Platform;
use hrimfax_qasm::{QasmProgram, QasmStatement};

/// Builds one kernel, resolving gate names through a platform.
#[derive(Debug)]
pub struct KernelBuilder<'p> {
    platform: &'p Platform,
    use_default_gates: bool,
    kernel: Kernel,
}

impl<'p> KernelBuilder<'p> {
    /// Start a kernel over the platform's qubits.
    pub fn new(
        name: impl Into<String>,
        platform: &'p Platform,
        creg_count: u32,
        use_default_gates: bool,
    ) -> Self {
        KernelBuilder {
            platform,
            use_default_gates,
            kernel: Kernel::new(name, platform.qubit_count(), creg_count),
        }
    }

    /// Append a gate by name.
    pub fn gate(&mut self, name: &str, qubits: &[u32]) -> CompileResult<&mut Self> {
        self.gate_full(name, qubits, &[], None)
    }

    /// Append a parameterized gate.
    pub fn gate_with_angle(
        &mut self,
        name: &str,
        qubits: &[u32],
        angle: f64,
    ) -> CompileResult<&mut Self> {
        self.gate_full(name, qubits, &[], Some(angle))
    }

    /// Append a gate with explicit operands of every kind.
    pub fn gate_full(
        &mut self,
        name: &str,
        qubits: &[u32],
        cregs: &[u32],
        angle: Option<f64>,
    ) -> CompileResult<&mut Self> {
        let qubits: Vec<QubitId> = qubits.iter().map(|&q| QubitId(q)).collect();
        let cregs: Vec<CregId> = cregs.iter().map(|&c| CregId(c)).collect();
        let resolved =
            self.platform
                .resolve(name, &qubits, &cregs, angle, self.use_default_gates)?;
        for instr in resolved {
            self.kernel.push(instr)?;
        }
        Ok(self)
    }

    /// Append a state preparation.
    pub fn prepz(&mut self, qubit: u32) -> CompileResult<&mut Self> {
        self.gate("prepz", &[qubit])
    }

    /// Append a measurement into register `creg`.
    pub fn measure(&mut self, qubit: u32, creg: u32) -> CompileResult<&mut Self> {
        self.gate_full("measure", &[qubit], &[creg], None)
    }

    /// Append an explicit wait.
    pub fn wait(&mut self, cycles: u64) -> &mut Self {
        self.kernel.wait(cycles, self.platform.cycle_time());
        self
    }

    /// Take the finished kernel.
    pub fn finish(self) -> Kernel {
        self.kernel
    }
}

/// Rebuild kernels from parsed qasm, resolving each gate against the
/// platform. Parallel bundles flatten back to sequence order; the
/// scheduler recovers the parallelism.
pub fn kernels_from_qasm(
    program: &QasmProgram,
    platform: &Platform,
    creg_count: u32,
    use_default_gates: bool,
) -> CompileResult<Vec<Kernel>> {
    let mut kernels = Vec::with_capacity(program.kernels.len());
    for qk in &program.kernels {
        let mut builder =
            KernelBuilder::new(qk.name.clone(), platform, creg_count, use_default_gates);
        for stmt in &qk.statements {
            match stmt {
                QasmStatement::Gate(g) => {
                    builder.gate_full(&g.name, &g.qubits, &g.cregs, g.angle)?;
                }
                QasmStatement::Parallel(gates) => {
                    for g in gates {
                        builder.gate_full(&g.name, &g.qubits, &g.cregs, g.angle)?;
                    }
                }
                QasmStatement::Wait(cycles) => {
                    builder.wait(*cycles);
                }
            }
        }
        kernels.push(builder.finish());
    }
    Ok(kernels)
}
