//! Property tests: schedules respect dependences for arbitrary
//! straight-line kernels.

use hrimfax_ir::{Kernel, QubitId};
use hrimfax_platform::Platform;
use hrimfax_sched::{Scheduler, SchedulerKind};
use proptest::prelude::*;

const QUBITS: u32 = 5;
const CYCLE_TIME: u64 = 20;

fn platform() -> Platform {
    Platform::from_json_str(
        "prop",
        r#"{ "hardware_settings": { "qubit_number": 5, "cycle_time": 20 } }"#,
    )
    .unwrap()
}

#[derive(Debug, Clone)]
enum Op {
    One(u32),
    Two(u32, u32),
}

fn ops() -> impl Strategy<Value = Vec<Op>> {
    let one = (0..QUBITS).prop_map(Op::One);
    let two = (0..QUBITS, 0..QUBITS)
        .prop_filter("distinct operands", |(a, b)| a != b)
        .prop_map(|(a, b)| Op::Two(a, b));
    prop::collection::vec(prop_oneof![one, two], 0..40)
}

fn build(ops: &[Op]) -> Kernel {
    let mut k = Kernel::new("prop", QUBITS, 0);
    for op in ops {
        match *op {
            Op::One(q) => k.h(QubitId(q)).unwrap(),
            Op::Two(a, b) => k.cnot(QubitId(a), QubitId(b)).unwrap(),
        }
    }
    k
}

proptest! {
    // Without commutation analysis, instructions touching a common
    // qubit must occupy disjoint cycle ranges in program order.
    #[test]
    fn asap_keeps_qubit_order(ops in ops()) {
        let p = platform();
        let k = build(&ops);
        let s = Scheduler::new(&p, SchedulerKind::Asap, false).run(&k).unwrap();
        let instrs = k.instructions();
        for i in 0..instrs.len() {
            for j in (i + 1)..instrs.len() {
                let shared = instrs[i].qubits.iter().any(|q| instrs[j].qubits.contains(q));
                if shared {
                    let end_i = s.cycles[i] + instrs[i].duration_in_cycles(CYCLE_TIME);
                    prop_assert!(s.cycles[j] >= end_i);
                }
            }
        }
    }

    // ALAP never grows the critical path: the last end cycle matches
    // the ASAP schedule's.
    #[test]
    fn alap_same_makespan(ops in ops()) {
        let p = platform();
        let k = build(&ops);
        let asap = Scheduler::new(&p, SchedulerKind::Asap, true).run(&k).unwrap();
        let alap = Scheduler::new(&p, SchedulerKind::Alap, true).run(&k).unwrap();
        let end = |s: &hrimfax_sched::Schedule| {
            k.instructions()
                .iter()
                .zip(&s.cycles)
                .map(|(i, c)| c + i.duration_in_cycles(CYCLE_TIME))
                .max()
                .unwrap_or(0)
        };
        prop_assert_eq!(end(&asap), end(&alap));
    }

    // Resource state never pushes instructions before cycle 1 and the
    // bundled view covers every instruction exactly once.
    #[test]
    fn bundles_partition_instructions(ops in ops()) {
        let p = platform();
        let k = build(&ops);
        let s = Scheduler::new(&p, SchedulerKind::Asap, true).run_constrained(&k).unwrap();
        let bundled: usize = s.bundles.iter().map(|b| b.instructions.len()).sum();
        prop_assert_eq!(bundled, k.instructions().len());
        for c in &s.cycles {
            prop_assert!(*c >= 1);
        }
        for w in s.bundles.windows(2) {
            prop_assert!(w[0].start_cycle < w[1].start_cycle);
        }
    }
}
