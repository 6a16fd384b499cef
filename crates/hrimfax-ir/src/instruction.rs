//! Resolved circuit instructions.

use crate::gate::{CommuteClass, SignalType};
use crate::qubit::{CregId, QubitId};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The semantic class of an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// A unitary gate.
    Unitary,
    /// State preparation. Writes its qubit.
    Prep,
    /// Measurement. Writes its qubit and its classical register.
    Measure,
    /// An explicit wait of the given number of cycles.
    Wait {
        /// Duration in cycles.
        cycles: u64,
    },
}

/// A single resolved operation in a kernel.
///
/// Instructions are produced by gate resolution: the platform's
/// instruction section (specialized or parameterized), a decomposition
/// rule, or the default gate set. By the time an instruction exists its
/// duration and signal type are fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// Resolved gate name, as it appears in output qasm.
    pub name: String,
    /// Semantic class.
    pub kind: InstructionKind,
    /// Qubit operands, in gate order.
    pub qubits: Vec<QubitId>,
    /// Classical register operands (measurements).
    pub cregs: Vec<CregId>,
    /// Rotation angle in radians, for parameterized gates.
    pub angle: Option<f64>,
    /// Duration in nanoseconds.
    pub duration: u64,
    /// Instrument channel claimed during scheduling.
    pub signal: SignalType,
    /// Commutation class for dependence analysis.
    #[serde(skip, default = "default_commute")]
    pub commute: CommuteClass,
    /// Unitary matrix, when the platform or default gate set provides one.
    pub matrix: Option<Vec<Complex64>>,
}

fn default_commute() -> CommuteClass {
    CommuteClass::Other
}

impl Instruction {
    /// Create a unitary instruction with no commutation structure and no
    /// matrix. Builders fill in the rest.
    pub fn unitary(name: impl Into<String>, qubits: Vec<QubitId>, duration: u64) -> Self {
        Instruction {
            name: name.into(),
            kind: InstructionKind::Unitary,
            qubits,
            cregs: Vec::new(),
            angle: None,
            duration,
            signal: SignalType::Mw,
            commute: CommuteClass::Other,
            matrix: None,
        }
    }

    /// Create a wait instruction covering `cycles` cycles of `cycle_time`
    /// nanoseconds each.
    pub fn wait(cycles: u64, cycle_time: u64) -> Self {
        Instruction {
            name: "wait".into(),
            kind: InstructionKind::Wait { cycles },
            qubits: Vec::new(),
            cregs: Vec::new(),
            angle: None,
            duration: cycles * cycle_time,
            signal: SignalType::None,
            commute: CommuteClass::Other,
            matrix: None,
        }
    }

    /// Whether this is a classical (non-gate) instruction. A bare wait
    /// acts as a barrier across all qubits.
    pub fn is_classical(&self) -> bool {
        matches!(self.kind, InstructionKind::Wait { .. })
    }

    /// Duration in whole cycles, rounded up.
    pub fn duration_in_cycles(&self, cycle_time: u64) -> u64 {
        if let InstructionKind::Wait { cycles } = self.kind {
            return cycles;
        }
        self.duration.div_ceil(cycle_time.max(1))
    }

    /// The qasm text of this instruction, without indentation.
    pub fn qasm(&self) -> String {
        use std::fmt::Write;
        if let InstructionKind::Wait { cycles } = self.kind {
            return format!("wait {cycles}");
        }
        let mut out = self.name.clone();
        let mut first = true;
        for q in &self.qubits {
            if first {
                let _ = write!(out, " {q}");
                first = false;
            } else {
                let _ = write!(out, ",{q}");
            }
        }
        for c in &self.cregs {
            if first {
                let _ = write!(out, " {c}");
                first = false;
            } else {
                let _ = write!(out, ",{c}");
            }
        }
        if let Some(a) = self.angle {
            let _ = write!(out, ", {a}");
        }
        out
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qasm())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::DefaultGate;

    fn from_default(g: DefaultGate, qubits: Vec<QubitId>) -> Instruction {
        Instruction {
            name: g.name().into(),
            kind: InstructionKind::Unitary,
            qubits,
            cregs: Vec::new(),
            angle: g.angle(),
            duration: g.duration(),
            signal: g.signal(),
            commute: g.commute_class(),
            matrix: g.matrix(),
        }
    }

    #[test]
    fn test_qasm_single_qubit() {
        let i = from_default(DefaultGate::H, vec![QubitId(2)]);
        assert_eq!(i.qasm(), "h q[2]");
    }

    #[test]
    fn test_qasm_two_qubit() {
        let i = from_default(DefaultGate::Cnot, vec![QubitId(0), QubitId(3)]);
        assert_eq!(i.qasm(), "cnot q[0],q[3]");
    }

    #[test]
    fn test_qasm_rotation() {
        let i = from_default(DefaultGate::Rx(1.25), vec![QubitId(1)]);
        assert_eq!(i.qasm(), "rx q[1], 1.25");
    }

    #[test]
    fn test_qasm_wait() {
        let i = Instruction::wait(3, 20);
        assert_eq!(i.qasm(), "wait 3");
        assert_eq!(i.duration, 60);
    }

    #[test]
    fn test_duration_in_cycles_rounds_up() {
        let i = from_default(DefaultGate::X, vec![QubitId(0)]);
        assert_eq!(i.duration_in_cycles(20), 2);
        assert_eq!(i.duration_in_cycles(30), 2);
        assert_eq!(i.duration_in_cycles(40), 1);
    }
}
