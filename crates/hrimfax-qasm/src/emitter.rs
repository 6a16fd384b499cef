//! Qasm text generation.

use hrimfax_ir::{Bundles, Kernel};
use std::fmt::Write;

const INDENT: &str = "    ";

fn header(out: &mut String, qubit_count: u32) {
    out.push_str("version 1.0\n");
    out.push_str("# generated by hrimfax, do not edit\n");
    let _ = writeln!(out, "qubits {qubit_count}");
}

/// Emit the unscheduled form of a program: one section per kernel, one
/// instruction per line in program order. The depth in the footer is
/// the sequential one, each instruction after the last.
pub fn emit_program(kernels: &[Kernel], qubit_count: u32, cycle_time: u64) -> String {
    let mut out = String::new();
    header(&mut out, qubit_count);
    let mut used: Vec<u32> = Vec::new();
    let mut gates = 0usize;
    let mut depth = 0u64;
    for kernel in kernels {
        let _ = writeln!(out, "\n.{}", kernel.name());
        for instr in kernel.instructions() {
            let _ = writeln!(out, "{INDENT}{}", instr.qasm());
            gates += 1;
            depth += instr.duration_in_cycles(cycle_time);
            for q in &instr.qubits {
                if !used.contains(&q.0) {
                    used.push(q.0);
                }
            }
        }
    }
    let _ = writeln!(out, "\n# total depth: {depth} cycles");
    let _ = writeln!(out, "# total gates: {gates}");
    let _ = writeln!(out, "# qubits used: {}", used.len());
    let _ = writeln!(out, "# kernels: {}", kernels.len());
    out
}

/// Emit the scheduled form: bundles in cycle order, parallel sections
/// in `{ a | b }` notation, `wait` lines for idle gaps, and a stats
/// trailer per kernel.
pub fn emit_scheduled(kernels: &[(&Kernel, &Bundles)], qubit_count: u32) -> String {
    let mut out = String::new();
    header(&mut out, qubit_count);
    for (kernel, bundles) in kernels {
        let _ = writeln!(out, "\n.{}", kernel.name());
        // Each bundle line stands for one cycle; a gap of delta cycles
        // needs a wait of delta - 1 on top of the line before it.
        let mut cursor = 1u64;
        for bundle in bundles.iter() {
            let delta = bundle.start_cycle.saturating_sub(cursor);
            if delta > 1 {
                let _ = writeln!(out, "{INDENT}wait {}", delta - 1);
            }
            match bundle.instructions.as_slice() {
                [] => {}
                [single] => {
                    let _ = writeln!(out, "{INDENT}{}", single.qasm());
                }
                many => {
                    let body: Vec<String> = many.iter().map(|i| i.qasm()).collect();
                    let _ = writeln!(out, "{INDENT}{{ {} }}", body.join(" | "));
                }
            }
            cursor = cursor.max(bundle.start_cycle);
        }
        // The final bundle's own duration past its line.
        if let Some(last) = bundles.last() {
            if last.duration_in_cycles > 1 {
                let _ = writeln!(out, "{INDENT}wait {}", last.duration_in_cycles - 1);
            }
        }
        let depth = bundles
            .iter()
            .map(|b| b.end_cycle() - 1)
            .max()
            .unwrap_or(0);
        let gates: usize = bundles.iter().map(|b| b.instructions.len()).sum();
        let _ = writeln!(out, "\n{INDENT}# total depth: {depth} cycles");
        let _ = writeln!(out, "{INDENT}# total gates: {gates}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrimfax_ir::{Bundle, QubitId};

    fn bell() -> Kernel {
        let mut k = Kernel::new("bell", 2, 2);
        k.h(QubitId(0)).unwrap();
        k.cnot(QubitId(0), QubitId(1)).unwrap();
        k.measure(QubitId(0), hrimfax_ir::CregId(0)).unwrap();
        k
    }

    #[test]
    fn test_unscheduled_layout() {
        let text = emit_program(&[bell()], 2, 20);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "version 1.0");
        assert_eq!(lines[2], "qubits 2");
        assert_eq!(lines[4], ".bell");
        assert_eq!(lines[5], "    h q[0]");
        assert_eq!(lines[6], "    cnot q[0],q[1]");
        assert_eq!(lines[7], "    measure q[0],r0");
        // h (2) + cnot (4) + measure (2), back to back.
        assert!(text.contains("# total depth: 8 cycles"));
        assert!(text.contains("# total gates: 3"));
        assert!(text.contains("# qubits used: 2"));
        assert!(text.contains("# kernels: 1"));
    }

    #[test]
    fn test_scheduled_bundles_and_waits() {
        let k = {
            let mut k = Kernel::new("k", 2, 0);
            k.x(QubitId(0)).unwrap();
            k.y(QubitId(1)).unwrap();
            k.cz(QubitId(0), QubitId(1)).unwrap();
            k
        };
        let instrs = k.instructions();
        let bundles = vec![
            Bundle::new(1, vec![instrs[0].clone(), instrs[1].clone()], 20),
            Bundle::new(4, vec![instrs[2].clone()], 20),
        ];
        let text = emit_scheduled(&[(&k, &bundles)], 2);
        assert!(text.contains("{ x q[0] | y q[1] }"));
        // Three idle cycles before the cz line, minus the line itself.
        assert!(text.contains("wait 2"));
        assert!(text.contains("cz q[0],q[1]"));
        // The 4-cycle cz keeps running for 3 cycles past its line.
        assert!(text.contains("wait 3"));
        assert!(text.contains("# total depth: 7 cycles"));
        assert!(text.contains("# total gates: 3"));
    }

    #[test]
    fn test_wait_lines_count_cycles_past_each_bundle_line() {
        let k = {
            let mut k = Kernel::new("k", 1, 0);
            k.h(QubitId(0)).unwrap();
            k.x(QubitId(0)).unwrap();
            k
        };
        let instrs = k.instructions();
        // h occupies cycles 1-2, x cycles 3-4.
        let bundles = vec![
            Bundle::new(1, vec![instrs[0].clone()], 20),
            Bundle::new(3, vec![instrs[1].clone()], 20),
        ];
        let text = emit_scheduled(&[(&k, &bundles)], 1);
        let lines: Vec<&str> = text.lines().map(str::trim).collect();
        let body = &lines[5..9];
        assert_eq!(body, &["h q[0]", "wait 1", "x q[0]", "wait 1"]);
        assert!(text.contains("# total depth: 4 cycles"));
    }

    #[test]
    fn test_depth_covers_overlapping_bundles() {
        let k = {
            let mut k = Kernel::new("k", 2, 0);
            k.cz(QubitId(0), QubitId(1)).unwrap();
            k.x(QubitId(0)).unwrap();
            k
        };
        let instrs = k.instructions();
        // The 4-cycle cz at cycle 1 outlives the x at cycle 2.
        let bundles = vec![
            Bundle::new(1, vec![instrs[0].clone()], 20),
            Bundle::new(2, vec![instrs[1].clone()], 20),
        ];
        let text = emit_scheduled(&[(&k, &bundles)], 2);
        assert!(text.contains("# total depth: 4 cycles"));
    }

    #[test]
    fn test_roundtrip_through_parser() {
        let text = emit_program(&[bell()], 2, 20);
        let prog = crate::parse(&text).unwrap();
        assert_eq!(prog.qubits, 2);
        assert_eq!(prog.kernels[0].name, "bell");
        assert_eq!(prog.kernels[0].statements.len(), 3);
    }
}
