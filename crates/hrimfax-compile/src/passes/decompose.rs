//! Toffoli decomposition.

use crate::error::CompileResult;
use crate::options::ToffoliDecomposition;
use crate::pass::{Pass, PassContext};
use hrimfax_ir::{DefaultGate, Instruction, InstructionKind, Kernel, QubitId};
use tracing::debug;

/// Replaces Toffoli gates with one- and two-qubit networks.
pub struct DecomposeToffoli;

impl Pass for DecomposeToffoli {
    fn name(&self) -> &'static str {
        "decompose_toffoli"
    }

    fn run(&self, kernel: &mut Kernel, ctx: &PassContext<'_>) -> CompileResult<bool> {
        let style = ctx.options.decompose_toffoli;
        if style == ToffoliDecomposition::No {
            return Ok(false);
        }
        let mut out: Vec<Instruction> = Vec::with_capacity(kernel.instructions().len());
        let mut changed = false;
        for instr in kernel.instructions() {
            let is_toffoli = instr.kind == InstructionKind::Unitary
                && matches!(instr.name.as_str(), "toffoli" | "ccx")
                && instr.qubits.len() == 3;
            if !is_toffoli {
                out.push(instr.clone());
                continue;
            }
            let (a, b, c) = (instr.qubits[0], instr.qubits[1], instr.qubits[2]);
            match style {
                ToffoliDecomposition::NielsenChuang => nielsen_chuang(&mut out, a, b, c),
                ToffoliDecomposition::Margolus => margolus(&mut out, a, b, c),
                ToffoliDecomposition::No => unreachable!(),
            }
            changed = true;
        }
        if changed {
            debug!(kernel = kernel.name(), style = ?style, "toffoli gates decomposed");
            *kernel.instructions_mut() = out;
        }
        Ok(changed)
    }
}

fn push(out: &mut Vec<Instruction>, gate: DefaultGate, qubits: &[QubitId]) {
    out.push(Instruction {
        name: gate.name().into(),
        kind: InstructionKind::Unitary,
        qubits: qubits.to_vec(),
        cregs: Vec::new(),
        angle: gate.angle(),
        duration: gate.duration(),
        signal: gate.signal(),
        commute: gate.commute_class(),
        matrix: gate.matrix(),
    });
}

/// The textbook exact network: six CNOTs, seven T-phase gates, two
/// Hadamards.
fn nielsen_chuang(out: &mut Vec<Instruction>, a: QubitId, b: QubitId, c: QubitId) {
    use DefaultGate as G;
    push(out, G::H, &[c]);
    push(out, G::Cnot, &[b, c]);
    push(out, G::Tdag, &[c]);
    push(out, G::Cnot, &[a, c]);
    push(out, G::T, &[c]);
    push(out, G::Cnot, &[b, c]);
    push(out, G::Tdag, &[c]);
    push(out, G::Cnot, &[a, c]);
    push(out, G::T, &[b]);
    push(out, G::T, &[c]);
    push(out, G::H, &[c]);
    push(out, G::Cnot, &[a, b]);
    push(out, G::T, &[a]);
    push(out, G::Tdag, &[b]);
    push(out, G::Cnot, &[a, b]);
}

/// The Margolus relative-phase network: three CNOTs and four Y
/// rotations. Correct up to a phase on the |101> component, which is
/// unobservable when the Toffoli is paired with its own uncomputation.
fn margolus(out: &mut Vec<Instruction>, a: QubitId, b: QubitId, c: QubitId) {
    use std::f64::consts::FRAC_PI_4;
    use DefaultGate as G;
    push(out, G::Ry(FRAC_PI_4), &[c]);
    push(out, G::Cnot, &[b, c]);
    push(out, G::Ry(FRAC_PI_4), &[c]);
    push(out, G::Cnot, &[a, c]);
    push(out, G::Ry(-FRAC_PI_4), &[c]);
    push(out, G::Cnot, &[b, c]);
    push(out, G::Ry(-FRAC_PI_4), &[c]);
}
