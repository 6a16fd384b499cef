//! Peephole circuit optimization.
//!
//! Cancels adjacent self-inverse pairs and explicit inverse pairs on
//! identical operands, and merges runs of same-axis rotations on the
//! same qubit. "Adjacent" means no instruction in between touches any
//! of the pair's qubits.

use crate::error::CompileResult;
use crate::pass::{Pass, PassContext};
use hrimfax_ir::{Instruction, InstructionKind, Kernel};
use tracing::debug;

const SELF_INVERSE: &[&str] = &[
    "i", "x", "y", "z", "h", "x180", "y180", "cnot", "cx", "cz", "cphase", "swap", "toffoli",
];

const INVERSE_PAIRS: &[(&str, &str)] = &[
    ("s", "sdag"),
    ("sdag", "s"),
    ("t", "tdag"),
    ("tdag", "t"),
    ("x90", "mx90"),
    ("mx90", "x90"),
    ("y90", "my90"),
    ("my90", "y90"),
];

const ROTATIONS: &[&str] = &["rx", "ry", "rz"];

const ANGLE_EPS: f64 = 1e-9;

/// The optimizer pass.
pub struct Optimize;

impl Pass for Optimize {
    fn name(&self) -> &'static str {
        "optimize"
    }

    fn run(&self, kernel: &mut Kernel, _ctx: &PassContext<'_>) -> CompileResult<bool> {
        let mut changed = false;
        // Each rewrite invalidates adjacency, so restart until stable.
        loop {
            let instrs = kernel.instructions_mut();
            let Some(rewrite) = find_rewrite(instrs) else {
                break;
            };
            apply(instrs, rewrite);
            changed = true;
        }
        if changed {
            debug!(kernel = kernel.name(), "peephole optimization changed circuit");
        }
        Ok(changed)
    }
}

enum Rewrite {
    RemovePair(usize, usize),
    Merge(usize, usize, f64),
    Remove(usize),
}

fn find_rewrite(instrs: &[Instruction]) -> Option<Rewrite> {
    for (i, a) in instrs.iter().enumerate() {
        if a.kind != InstructionKind::Unitary {
            continue;
        }
        // Zero rotations evaporate on their own.
        if ROTATIONS.contains(&a.name.as_str()) {
            if let Some(angle) = a.angle {
                if angle.abs() < ANGLE_EPS {
                    return Some(Rewrite::Remove(i));
                }
            }
        }
        let Some(j) = next_touching(instrs, i) else {
            continue;
        };
        let b = &instrs[j];
        if b.kind != InstructionKind::Unitary || a.qubits != b.qubits {
            continue;
        }
        let cancels = (a.name == b.name && SELF_INVERSE.contains(&a.name.as_str()))
            || INVERSE_PAIRS.contains(&(a.name.as_str(), b.name.as_str()));
        if cancels {
            return Some(Rewrite::RemovePair(i, j));
        }
        if a.name == b.name && ROTATIONS.contains(&a.name.as_str()) {
            if let (Some(x), Some(y)) = (a.angle, b.angle) {
                return Some(Rewrite::Merge(i, j, x + y));
            }
        }
    }
    None
}

/// Index of the next instruction sharing a qubit with `instrs[i]`, but
/// only if no instruction in between touches any of those qubits.
fn next_touching(instrs: &[Instruction], i: usize) -> Option<usize> {
    let a = &instrs[i];
    for (j, b) in instrs.iter().enumerate().skip(i + 1) {
        if b.is_classical() {
            return None;
        }
        if b.qubits.iter().any(|q| a.qubits.contains(q)) {
            return Some(j);
        }
    }
    None
}

fn apply(instrs: &mut Vec<Instruction>, rewrite: Rewrite) {
    match rewrite {
        Rewrite::Remove(i) => {
            instrs.remove(i);
        }
        Rewrite::RemovePair(i, j) => {
            instrs.remove(j);
            instrs.remove(i);
        }
        Rewrite::Merge(i, j, angle) => {
            instrs.remove(j);
            instrs[i].angle = Some(angle);
            instrs[i].matrix = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::CompilerOptions;
    use hrimfax_ir::QubitId;
    use hrimfax_platform::Platform;

    fn ctx_platform() -> Platform {
        Platform::from_json_str(
            "opt",
            r#"{ "hardware_settings": { "qubit_number": 3, "cycle_time": 20 } }"#,
        )
        .unwrap()
    }

    fn run(kernel: &mut Kernel) -> bool {
        let platform = ctx_platform();
        let options = CompilerOptions::default();
        let ctx = PassContext {
            platform: &platform,
            options: &options,
        };
        Optimize.run(kernel, &ctx).unwrap()
    }

    #[test]
    fn test_double_x_cancels() {
        let mut k = Kernel::new("k", 1, 0);
        k.x(QubitId(0)).unwrap();
        k.x(QubitId(0)).unwrap();
        assert!(run(&mut k));
        assert!(k.instructions().is_empty());
    }

    #[test]
    fn test_interleaved_qubits_still_cancel() {
        let mut k = Kernel::new("k", 2, 0);
        k.h(QubitId(0)).unwrap();
        k.x(QubitId(1)).unwrap();
        k.h(QubitId(0)).unwrap();
        assert!(run(&mut k));
        assert_eq!(k.instructions().len(), 1);
        assert_eq!(k.instructions()[0].name, "x");
    }

    #[test]
    fn test_blocked_by_intervening_gate() {
        let mut k = Kernel::new("k", 2, 0);
        k.h(QubitId(0)).unwrap();
        k.cnot(QubitId(0), QubitId(1)).unwrap();
        k.h(QubitId(0)).unwrap();
        assert!(!run(&mut k));
        assert_eq!(k.instructions().len(), 3);
    }

    #[test]
    fn test_s_sdag_cancels() {
        let mut k = Kernel::new("k", 1, 0);
        k.s(QubitId(0)).unwrap();
        k.sdag(QubitId(0)).unwrap();
        assert!(run(&mut k));
        assert!(k.instructions().is_empty());
    }

    #[test]
    fn test_rotations_merge_and_vanish() {
        let mut k = Kernel::new("k", 1, 0);
        k.rz(QubitId(0), 0.4).unwrap();
        k.rz(QubitId(0), -0.4).unwrap();
        assert!(run(&mut k));
        assert!(k.instructions().is_empty());

        let mut k = Kernel::new("k", 1, 0);
        k.rz(QubitId(0), 0.25).unwrap();
        k.rz(QubitId(0), 0.5).unwrap();
        assert!(run(&mut k));
        assert_eq!(k.instructions().len(), 1);
        assert!((k.instructions()[0].angle.unwrap() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_cnot_pair_cancels_cnot_reversed_does_not() {
        let mut k = Kernel::new("k", 2, 0);
        k.cnot(QubitId(0), QubitId(1)).unwrap();
        k.cnot(QubitId(0), QubitId(1)).unwrap();
        assert!(run(&mut k));
        assert!(k.instructions().is_empty());

        let mut k = Kernel::new("k", 2, 0);
        k.cnot(QubitId(0), QubitId(1)).unwrap();
        k.cnot(QubitId(1), QubitId(0)).unwrap();
        assert!(!run(&mut k));
        assert_eq!(k.instructions().len(), 2);
    }

    #[test]
    fn test_measure_untouched() {
        let mut k = Kernel::new("k", 1, 1);
        k.measure(QubitId(0), hrimfax_ir::CregId(0)).unwrap();
        k.measure(QubitId(0), hrimfax_ir::CregId(0)).unwrap();
        assert!(!run(&mut k));
        assert_eq!(k.instructions().len(), 2);
    }
}
