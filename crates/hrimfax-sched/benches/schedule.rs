use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use hrimfax_ir::{Kernel, QubitId};
use hrimfax_platform::Platform;
use hrimfax_sched::{Scheduler, SchedulerKind};

fn platform(qubits: u32) -> Platform {
    let json = format!(
        r#"{{ "hardware_settings": {{ "qubit_number": {qubits}, "cycle_time": 20 }} }}"#
    );
    Platform::from_json_str("bench", &json).unwrap()
}

/// Layered circuit: rounds of single-qubit gates and nearest-neighbor
/// CZs, the shape error-correction cycles produce.
fn layered_kernel(qubits: u32, rounds: u32) -> Kernel {
    let mut k = Kernel::new("layered", qubits, 0);
    for r in 0..rounds {
        for q in 0..qubits {
            k.h(QubitId(q)).unwrap();
        }
        let offset = (r % 2) as u32;
        let mut q = offset;
        while q + 1 < qubits {
            k.cz(QubitId(q), QubitId(q + 1)).unwrap();
            q += 2;
        }
    }
    k
}

fn bench_schedule(c: &mut Criterion) {
    let mut group = c.benchmark_group("schedule");
    for qubits in [8u32, 32, 64] {
        let p = platform(qubits);
        let k = layered_kernel(qubits, 10);
        group.bench_with_input(BenchmarkId::new("asap", qubits), &k, |b, k| {
            let s = Scheduler::new(&p, SchedulerKind::Asap, true);
            b.iter(|| s.run(k).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("alap", qubits), &k, |b, k| {
            let s = Scheduler::new(&p, SchedulerKind::Alap, true);
            b.iter(|| s.run(k).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_schedule);
criterion_main!(benches);
