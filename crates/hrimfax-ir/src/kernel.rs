//! Kernels: straight-line instruction sequences.

use crate::error::{IrError, IrResult};
use crate::gate::{DefaultGate, SignalType};
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::{CregId, QubitId};
use serde::{Deserialize, Serialize};

/// A straight-line sequence of instructions over a fixed register file.
///
/// Kernels are built instruction by instruction, either through the
/// convenience methods here (which resolve against the default gate set)
/// or by pushing already-resolved [`Instruction`]s from a platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kernel {
    name: String,
    qubit_count: u32,
    creg_count: u32,
    instructions: Vec<Instruction>,
}

impl Kernel {
    /// Create an empty kernel.
    pub fn new(name: impl Into<String>, qubit_count: u32, creg_count: u32) -> Self {
        Kernel {
            name: name.into(),
            qubit_count,
            creg_count,
            instructions: Vec::new(),
        }
    }

    /// Kernel name, used for the section label in qasm output.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of qubits this kernel addresses.
    pub fn qubit_count(&self) -> u32 {
        self.qubit_count
    }

    /// Number of classical registers this kernel addresses.
    pub fn creg_count(&self) -> u32 {
        self.creg_count
    }

    /// The instruction sequence.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Mutable access for passes that rewrite the body in place.
    pub fn instructions_mut(&mut self) -> &mut Vec<Instruction> {
        &mut self.instructions
    }

    /// Total duration in nanoseconds of the unscheduled sequence.
    pub fn sequential_duration(&self) -> u64 {
        self.instructions.iter().map(|i| i.duration).sum()
    }

    fn check_qubits(&self, name: &str, qubits: &[QubitId]) -> IrResult<()> {
        for (i, q) in qubits.iter().enumerate() {
            if q.0 >= self.qubit_count {
                return Err(IrError::QubitOutOfRange {
                    qubit: *q,
                    count: self.qubit_count,
                });
            }
            if qubits[..i].contains(q) {
                return Err(IrError::DuplicateOperand {
                    name: name.to_string(),
                    qubit: *q,
                });
            }
        }
        Ok(())
    }

    /// Append an already-resolved instruction, validating its operands.
    pub fn push(&mut self, instr: Instruction) -> IrResult<()> {
        self.check_qubits(&instr.name, &instr.qubits)?;
        for c in &instr.cregs {
            if c.0 >= self.creg_count {
                return Err(IrError::CregOutOfRange {
                    creg: *c,
                    count: self.creg_count,
                });
            }
        }
        self.instructions.push(instr);
        Ok(())
    }

    /// Append a gate from the default gate set.
    pub fn default_gate(&mut self, gate: DefaultGate, qubits: &[QubitId]) -> IrResult<()> {
        let expected = gate.num_qubits();
        if qubits.len() as u32 != expected {
            return Err(IrError::OperandCount {
                name: gate.name().to_string(),
                expected,
                got: qubits.len() as u32,
            });
        }
        let kind = match gate {
            DefaultGate::Prepz => InstructionKind::Prep,
            DefaultGate::Measure => InstructionKind::Measure,
            _ => InstructionKind::Unitary,
        };
        self.push(Instruction {
            name: gate.name().into(),
            kind,
            qubits: qubits.to_vec(),
            cregs: Vec::new(),
            angle: gate.angle(),
            duration: gate.duration(),
            signal: gate.signal(),
            commute: gate.commute_class(),
            matrix: gate.matrix(),
        })
    }

    /// Prepare a qubit in |0>.
    pub fn prepz(&mut self, q: QubitId) -> IrResult<()> {
        self.default_gate(DefaultGate::Prepz, &[q])
    }

    /// Measure a qubit into a classical register.
    pub fn measure(&mut self, q: QubitId, c: CregId) -> IrResult<()> {
        if c.0 >= self.creg_count {
            return Err(IrError::CregOutOfRange {
                creg: c,
                count: self.creg_count,
            });
        }
        self.check_qubits("measure", &[q])?;
        self.instructions.push(Instruction {
            name: "measure".into(),
            kind: InstructionKind::Measure,
            qubits: vec![q],
            cregs: vec![c],
            angle: None,
            duration: DefaultGate::Measure.duration(),
            signal: SignalType::Readout,
            commute: DefaultGate::Measure.commute_class(),
            matrix: None,
        });
        Ok(())
    }

    /// Pauli-X.
    pub fn x(&mut self, q: QubitId) -> IrResult<()> {
        self.default_gate(DefaultGate::X, &[q])
    }

    /// Pauli-Y.
    pub fn y(&mut self, q: QubitId) -> IrResult<()> {
        self.default_gate(DefaultGate::Y, &[q])
    }

    /// Pauli-Z.
    pub fn z(&mut self, q: QubitId) -> IrResult<()> {
        self.default_gate(DefaultGate::Z, &[q])
    }

    /// Hadamard.
    pub fn h(&mut self, q: QubitId) -> IrResult<()> {
        self.default_gate(DefaultGate::H, &[q])
    }

    /// Phase gate.
    pub fn s(&mut self, q: QubitId) -> IrResult<()> {
        self.default_gate(DefaultGate::S, &[q])
    }

    /// Phase dagger.
    pub fn sdag(&mut self, q: QubitId) -> IrResult<()> {
        self.default_gate(DefaultGate::Sdag, &[q])
    }

    /// T gate.
    pub fn t(&mut self, q: QubitId) -> IrResult<()> {
        self.default_gate(DefaultGate::T, &[q])
    }

    /// T dagger.
    pub fn tdag(&mut self, q: QubitId) -> IrResult<()> {
        self.default_gate(DefaultGate::Tdag, &[q])
    }

    /// X rotation.
    pub fn rx(&mut self, q: QubitId, angle: f64) -> IrResult<()> {
        self.default_gate(DefaultGate::Rx(angle), &[q])
    }

    /// Y rotation.
    pub fn ry(&mut self, q: QubitId, angle: f64) -> IrResult<()> {
        self.default_gate(DefaultGate::Ry(angle), &[q])
    }

    /// Z rotation.
    pub fn rz(&mut self, q: QubitId, angle: f64) -> IrResult<()> {
        self.default_gate(DefaultGate::Rz(angle), &[q])
    }

    /// Controlled-NOT.
    pub fn cnot(&mut self, control: QubitId, target: QubitId) -> IrResult<()> {
        self.default_gate(DefaultGate::Cnot, &[control, target])
    }

    /// Controlled-Z.
    pub fn cz(&mut self, a: QubitId, b: QubitId) -> IrResult<()> {
        self.default_gate(DefaultGate::Cz, &[a, b])
    }

    /// SWAP.
    pub fn swap(&mut self, a: QubitId, b: QubitId) -> IrResult<()> {
        self.default_gate(DefaultGate::Swap, &[a, b])
    }

    /// Toffoli.
    pub fn toffoli(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<()> {
        self.default_gate(DefaultGate::Toffoli, &[c1, c2, target])
    }

    /// Explicit wait of `cycles` cycles at the given cycle time.
    pub fn wait(&mut self, cycles: u64, cycle_time: u64) {
        self.instructions.push(Instruction::wait(cycles, cycle_time));
    }

    /// Derive the controlled version of `source` onto this kernel.
    ///
    /// Every gate in `source` is replaced by a circuit computing the same
    /// unitary conditioned on the single qubit in `controls`. Ancilla
    /// qubits are accepted for interface compatibility with multi-control
    /// derivation but are unused for a single control. Preparation and
    /// measurement have no controlled form.
    pub fn controlled(
        &mut self,
        source: &Kernel,
        controls: &[QubitId],
        _ancillas: &[QubitId],
    ) -> IrResult<()> {
        let [control] = controls else {
            return Err(IrError::ControlCount(controls.len()));
        };
        let control = *control;
        for instr in &source.instructions {
            self.push_controlled(instr, control)?;
        }
        Ok(())
    }

    fn push_controlled(&mut self, instr: &Instruction, c: QubitId) -> IrResult<()> {
        use DefaultGate as G;
        match instr.kind {
            InstructionKind::Wait { cycles } => {
                self.instructions
                    .push(Instruction::wait(cycles, instr.duration / cycles.max(1)));
                return Ok(());
            }
            InstructionKind::Prep | InstructionKind::Measure => {
                return Err(IrError::NoControlledForm(instr.name.clone()));
            }
            InstructionKind::Unitary => {}
        }
        let gate = DefaultGate::from_name(&instr.name, instr.angle)
            .ok_or_else(|| IrError::NoControlledForm(instr.name.clone()))?;
        let q = &instr.qubits;
        let (t, t2, t3) = (
            q.first().copied(),
            q.get(1).copied(),
            q.get(2).copied(),
        );
        let t = t.ok_or_else(|| IrError::NoControlledForm(instr.name.clone()))?;
        match gate {
            G::I | G::Nop => {}
            G::X | G::Rx180 => self.cnot(c, t)?,
            G::Y | G::Ry180 => {
                self.sdag(t)?;
                self.cnot(c, t)?;
                self.s(t)?;
            }
            G::Z => self.cz(c, t)?,
            G::H => {
                // CH via the T-gate network.
                self.s(t)?;
                self.h(t)?;
                self.t(t)?;
                self.cnot(c, t)?;
                self.tdag(t)?;
                self.h(t)?;
                self.sdag(t)?;
            }
            G::S => self.controlled_phase(c, t, std::f64::consts::FRAC_PI_2)?,
            G::Sdag => self.controlled_phase(c, t, -std::f64::consts::FRAC_PI_2)?,
            G::T => self.controlled_phase(c, t, std::f64::consts::FRAC_PI_4)?,
            G::Tdag => self.controlled_phase(c, t, -std::f64::consts::FRAC_PI_4)?,
            G::Rx90 => self.controlled_rx(c, t, std::f64::consts::FRAC_PI_2)?,
            G::MRx90 => self.controlled_rx(c, t, -std::f64::consts::FRAC_PI_2)?,
            G::Ry90 => self.controlled_ry(c, t, std::f64::consts::FRAC_PI_2)?,
            G::MRy90 => self.controlled_ry(c, t, -std::f64::consts::FRAC_PI_2)?,
            G::Rx(a) => self.controlled_rx(c, t, a)?,
            G::Ry(a) => self.controlled_ry(c, t, a)?,
            G::Rz(a) => self.controlled_rz(c, t, a)?,
            G::Cnot => {
                let t2 = t2.ok_or_else(|| IrError::NoControlledForm(instr.name.clone()))?;
                self.toffoli(c, t, t2)?;
            }
            G::Cz => {
                let t2 = t2.ok_or_else(|| IrError::NoControlledForm(instr.name.clone()))?;
                self.h(t2)?;
                self.toffoli(c, t, t2)?;
                self.h(t2)?;
            }
            G::Swap => {
                let t2 = t2.ok_or_else(|| IrError::NoControlledForm(instr.name.clone()))?;
                self.cnot(t2, t)?;
                self.toffoli(c, t, t2)?;
                self.cnot(t2, t)?;
            }
            G::Toffoli => {
                let _ = t3;
                return Err(IrError::NoControlledForm(instr.name.clone()));
            }
            G::Prepz | G::Measure => {
                return Err(IrError::NoControlledForm(instr.name.clone()));
            }
        }
        Ok(())
    }

    fn controlled_phase(&mut self, c: QubitId, t: QubitId, theta: f64) -> IrResult<()> {
        self.rz(c, theta / 2.0)?;
        self.rz(t, theta / 2.0)?;
        self.cnot(c, t)?;
        self.rz(t, -theta / 2.0)?;
        self.cnot(c, t)
    }

    fn controlled_rz(&mut self, c: QubitId, t: QubitId, theta: f64) -> IrResult<()> {
        self.rz(t, theta / 2.0)?;
        self.cnot(c, t)?;
        self.rz(t, -theta / 2.0)?;
        self.cnot(c, t)
    }

    fn controlled_ry(&mut self, c: QubitId, t: QubitId, theta: f64) -> IrResult<()> {
        self.ry(t, theta / 2.0)?;
        self.cnot(c, t)?;
        self.ry(t, -theta / 2.0)?;
        self.cnot(c, t)
    }

    fn controlled_rx(&mut self, c: QubitId, t: QubitId, theta: f64) -> IrResult<()> {
        self.h(t)?;
        self.controlled_rz(c, t, theta)?;
        self.h(t)
    }
}
