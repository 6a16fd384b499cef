//! Cycle assignment over the dependence graph.

use crate::depgraph::DepGraph;
use crate::error::{SchedError, SchedResult};
use crate::resources::ResourceManager;
use hrimfax_ir::{Bundle, Bundles, Kernel};
use hrimfax_platform::Platform;
use petgraph::graph::NodeIndex;
use rustc_hash::FxHashMap;
use tracing::debug;

/// Which schedule to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerKind {
    /// Every instruction as early as its dependences allow.
    Asap,
    /// Every instruction as late as possible without growing the
    /// critical path.
    Alap,
    /// ALAP followed by a load-balancing pass that pulls instructions
    /// into underfilled cycles.
    AlapUniform,
}

/// A scheduled kernel: per-instruction start cycles plus the bundled
/// view.
#[derive(Debug, Clone)]
pub struct Schedule {
    /// Start cycle per kernel instruction, counting from 1.
    pub cycles: Vec<u64>,
    /// Total length in cycles.
    pub depth: u64,
    /// Instructions grouped by start cycle.
    pub bundles: Bundles,
}

/// Schedules kernels against one platform.
pub struct Scheduler<'p> {
    platform: &'p Platform,
    kind: SchedulerKind,
    commute: bool,
}

impl<'p> Scheduler<'p> {
    /// Create a scheduler. `commute` enables commutation-aware
    /// dependence analysis.
    pub fn new(platform: &'p Platform, kind: SchedulerKind, commute: bool) -> Self {
        Scheduler {
            platform,
            kind,
            commute,
        }
    }

    /// Schedule ignoring resource declarations.
    pub fn run(&self, kernel: &Kernel) -> SchedResult<Schedule> {
        let cycle_time = self.platform.cycle_time();
        let graph = DepGraph::build(kernel, cycle_time, self.commute);
        let order = graph.topo(kernel.name())?;
        let asap = forward_cycles(&graph, &order);
        let cycles = match self.kind {
            SchedulerKind::Asap => collect(&graph, kernel, &asap),
            SchedulerKind::Alap => {
                let alap = backward_cycles(&graph, &order, asap[&graph.sink()]);
                collect(&graph, kernel, &alap)
            }
            SchedulerKind::AlapUniform => {
                let alap = backward_cycles(&graph, &order, asap[&graph.sink()]);
                let balanced = balance(&graph, &order, &asap, &alap);
                collect(&graph, kernel, &balanced)
            }
        };
        let depth = asap[&graph.sink()].saturating_sub(1);
        debug!(
            kernel = kernel.name(),
            depth,
            kind = ?self.kind,
            "kernel scheduled"
        );
        Ok(self.into_schedule(kernel, cycles, depth))
    }

    /// Schedule honoring the platform's resource declarations and
    /// inter-signal buffers.
    ///
    /// Placement is forward list scheduling in dependence order; for the
    /// ALAP kinds the dependence-only ALAP cycles act as lower bounds so
    /// the result keeps the late-placement shape where resources permit.
    pub fn run_constrained(&self, kernel: &Kernel) -> SchedResult<Schedule> {
        let cycle_time = self.platform.cycle_time();
        let graph = DepGraph::build(kernel, cycle_time, self.commute);
        let order = graph.topo(kernel.name())?;
        let asap = forward_cycles(&graph, &order);
        let bounds = match self.kind {
            SchedulerKind::Asap => None,
            SchedulerKind::Alap | SchedulerKind::AlapUniform => {
                Some(backward_cycles(&graph, &order, asap[&graph.sink()]))
            }
        };

        let mut rm = ResourceManager::new(self.platform);
        let mut placed: FxHashMap<NodeIndex, u64> = FxHashMap::default();
        placed.insert(graph.source(), 0);
        // A placement further out than this means the state machine can
        // never free the resources.
        let horizon: u64 = kernel
            .instructions()
            .iter()
            .map(|i| i.duration_in_cycles(cycle_time).max(1))
            .sum::<u64>()
            .saturating_mul(2)
            + 64;

        let mut cycles = vec![0u64; kernel.instructions().len()];
        let mut depth = 0u64;
        for &node in &order {
            let Some(idx) = graph.node_instr(node) else {
                if node == graph.sink() {
                    placed.insert(
                        node,
                        graph
                            .preds(node)
                            .map(|(p, w)| placed.get(&p).copied().unwrap_or(0) + w)
                            .max()
                            .unwrap_or(1),
                    );
                }
                continue;
            };
            let instr = &kernel.instructions()[idx];
            let dep_ready = graph
                .preds(node)
                .map(|(p, w)| placed.get(&p).copied().unwrap_or(0) + w)
                .max()
                .unwrap_or(1);
            let mut start = dep_ready;
            if let Some(bounds) = &bounds {
                start = start.max(bounds.get(&node).copied().unwrap_or(dep_ready));
            }
            while !rm.available(start, instr) {
                start += 1;
                if start > horizon {
                    return Err(SchedError::ResourceDeadlock {
                        kernel: kernel.name().to_string(),
                        instruction: instr.qasm(),
                    });
                }
            }
            rm.reserve(start, instr);
            placed.insert(node, start);
            cycles[idx] = start;
            depth = depth.max(start + instr.duration_in_cycles(cycle_time).max(1) - 1);
        }
        debug!(
            kernel = kernel.name(),
            depth,
            kind = ?self.kind,
            resources = ?rm.channel_names(),
            "kernel scheduled under resource constraints"
        );
        Ok(self.into_schedule(kernel, cycles, depth))
    }

    fn into_schedule(&self, kernel: &Kernel, cycles: Vec<u64>, depth: u64) -> Schedule {
        let bundles = bundle(kernel, &cycles, self.platform.cycle_time());
        Schedule {
            cycles,
            depth,
            bundles,
        }
    }
}

fn forward_cycles(graph: &DepGraph, order: &[NodeIndex]) -> FxHashMap<NodeIndex, u64> {
    let mut cycles = FxHashMap::default();
    for &node in order {
        let cycle = graph
            .preds(node)
            .map(|(p, w)| cycles.get(&p).copied().unwrap_or(0) + w)
            .max()
            .unwrap_or(0);
        cycles.insert(node, cycle);
    }
    cycles
}

fn backward_cycles(
    graph: &DepGraph,
    order: &[NodeIndex],
    sink_cycle: u64,
) -> FxHashMap<NodeIndex, u64> {
    let mut cycles = FxHashMap::default();
    for &node in order.iter().rev() {
        let cycle = graph
            .succs(node)
            .map(|(s, w)| cycles.get(&s).copied().unwrap_or(sink_cycle).saturating_sub(w))
            .min()
            .unwrap_or(sink_cycle);
        cycles.insert(node, cycle);
    }
    cycles
}

/// Pull instructions out of crowded cycles into the emptiest legal
/// cycle of their `[asap, alap]` slack window, latest such cycle first.
fn balance(
    graph: &DepGraph,
    order: &[NodeIndex],
    asap: &FxHashMap<NodeIndex, u64>,
    alap: &FxHashMap<NodeIndex, u64>,
) -> FxHashMap<NodeIndex, u64> {
    let mut load: FxHashMap<u64, usize> = FxHashMap::default();
    let mut out = FxHashMap::default();
    for &node in order {
        let lo = graph
            .preds(node)
            .map(|(p, w)| out.get(&p).copied().unwrap_or(0) + w)
            .max()
            .unwrap_or(0)
            .max(asap.get(&node).copied().unwrap_or(0));
        let hi = alap.get(&node).copied().unwrap_or(lo).max(lo);
        if graph.node_instr(node).is_none() {
            out.insert(node, hi);
            continue;
        }
        let mut best = hi;
        let mut best_load = load.get(&hi).copied().unwrap_or(0);
        for c in (lo..hi).rev() {
            let l = load.get(&c).copied().unwrap_or(0);
            if l < best_load {
                best = c;
                best_load = l;
            }
        }
        *load.entry(best).or_insert(0) += 1;
        out.insert(node, best);
    }
    out
}

fn collect(graph: &DepGraph, kernel: &Kernel, cycles: &FxHashMap<NodeIndex, u64>) -> Vec<u64> {
    (0..kernel.instructions().len())
        .map(|i| cycles.get(&graph.instr_node(i)).copied().unwrap_or(1))
        .collect()
}

/// Group instructions by start cycle into ascending bundles.
///
/// Explicit waits order the dependence graph but are left out of the
/// bundles; the gaps in the cycle numbering reproduce them on emission.
pub fn bundle(kernel: &Kernel, cycles: &[u64], cycle_time: u64) -> Bundles {
    let mut by_cycle: Vec<(u64, usize)> = cycles.iter().copied().zip(0..).collect();
    by_cycle.sort_by_key(|&(c, i)| (c, i));
    let mut out: Bundles = Vec::new();
    for (cycle, idx) in by_cycle {
        if kernel.instructions()[idx].is_classical() {
            continue;
        }
        let instr = kernel.instructions()[idx].clone();
        match out.last_mut() {
            Some(b) if b.start_cycle == cycle => {
                b.duration_in_cycles = b
                    .duration_in_cycles
                    .max(instr.duration_in_cycles(cycle_time));
                b.instructions.push(instr);
            }
            _ => out.push(Bundle::new(cycle, vec![instr], cycle_time)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrimfax_ir::QubitId;

    fn platform() -> Platform {
        Platform::from_json_str(
            "sched",
            r#"{ "hardware_settings": { "qubit_number": 4, "cycle_time": 20 } }"#,
        )
        .unwrap()
    }

    fn bell() -> Kernel {
        let mut k = Kernel::new("bell", 2, 0);
        k.h(QubitId(0)).unwrap();
        k.x(QubitId(1)).unwrap();
        k.cnot(QubitId(0), QubitId(1)).unwrap();
        k
    }

    #[test]
    fn test_asap_packs_front() {
        let p = platform();
        let k = bell();
        let s = Scheduler::new(&p, SchedulerKind::Asap, true).run(&k).unwrap();
        // h and x both start in cycle 1; cnot after the 2-cycle h.
        assert_eq!(s.cycles, vec![1, 1, 3]);
        assert_eq!(s.bundles.len(), 2);
        assert_eq!(s.bundles[0].instructions.len(), 2);
    }

    #[test]
    fn test_alap_pushes_back() {
        let p = platform();
        let mut k = Kernel::new("k", 2, 0);
        k.x(QubitId(1)).unwrap();
        k.h(QubitId(0)).unwrap();
        k.h(QubitId(0)).unwrap();
        let s = Scheduler::new(&p, SchedulerKind::Alap, true).run(&k).unwrap();
        // The lone x on q1 floats to the end of the q0 chain.
        assert_eq!(s.cycles, vec![3, 1, 3]);
    }

    #[test]
    fn test_depth_is_critical_path() {
        let p = platform();
        let k = bell();
        let s = Scheduler::new(&p, SchedulerKind::Asap, true).run(&k).unwrap();
        // h (2 cycles) then cnot (4 cycles).
        assert_eq!(s.depth, 6);
    }

    #[test]
    fn test_commutation_widens_bundles() {
        let p = platform();
        let mut k = Kernel::new("k", 3, 0);
        k.cz(QubitId(0), QubitId(1)).unwrap();
        k.cz(QubitId(1), QubitId(2)).unwrap();
        let with = Scheduler::new(&p, SchedulerKind::Asap, true).run(&k).unwrap();
        let without = Scheduler::new(&p, SchedulerKind::Asap, false).run(&k).unwrap();
        assert_eq!(with.cycles[0], with.cycles[1]);
        assert!(without.cycles[1] > without.cycles[0]);
    }

    #[test]
    fn test_constrained_matches_unconstrained_without_resources() {
        let p = platform();
        let k = bell();
        let a = Scheduler::new(&p, SchedulerKind::Asap, true).run(&k).unwrap();
        let b = Scheduler::new(&p, SchedulerKind::Asap, true)
            .run_constrained(&k)
            .unwrap();
        assert_eq!(a.cycles, b.cycles);
    }

    #[test]
    fn test_constrained_shared_channel() {
        let p = Platform::from_json_str(
            "rc",
            r#"{
                "hardware_settings": { "qubit_number": 2, "cycle_time": 20 },
                "resources": {
                    "wave_gen": {
                        "count": 1,
                        "type": "mw",
                        "connection_map": { "0": [0, 1] }
                    }
                }
            }"#,
        )
        .unwrap();
        let mut k = Kernel::new("k", 2, 0);
        k.x(QubitId(0)).unwrap();
        k.y(QubitId(1)).unwrap();
        let s = Scheduler::new(&p, SchedulerKind::Asap, true)
            .run_constrained(&k)
            .unwrap();
        // Independent qubits, but one shared microwave unit.
        assert_ne!(s.cycles[0], s.cycles[1]);
    }

    #[test]
    fn test_uniform_spreads_load() {
        let p = platform();
        let mut k = Kernel::new("k", 4, 0);
        // Four independent single-qubit gates plus a long chain on q0.
        k.x(QubitId(0)).unwrap();
        k.y(QubitId(0)).unwrap();
        k.z(QubitId(0)).unwrap();
        k.x(QubitId(1)).unwrap();
        k.x(QubitId(2)).unwrap();
        k.x(QubitId(3)).unwrap();
        let s = Scheduler::new(&p, SchedulerKind::AlapUniform, true)
            .run(&k)
            .unwrap();
        let max_width = s.bundles.iter().map(|b| b.instructions.len()).max().unwrap();
        assert!(max_width <= 2, "uniform schedule too bursty: {max_width}");
    }

    #[test]
    fn test_bundles_skip_explicit_waits() {
        let p = platform();
        let mut k = Kernel::new("k", 2, 0);
        k.x(QubitId(0)).unwrap();
        k.wait(2, p.cycle_time());
        k.y(QubitId(0)).unwrap();
        let s = Scheduler::new(&p, SchedulerKind::Asap, true).run(&k).unwrap();
        // The wait delays y but never shows up as a bundled instruction.
        let bundled: usize = s.bundles.iter().map(|b| b.instructions.len()).sum();
        assert_eq!(bundled, 2);
        assert!(s.cycles[2] > s.cycles[0] + 2);
    }

    #[test]
    fn test_empty_kernel() {
        let p = platform();
        let k = Kernel::new("empty", 2, 0);
        let s = Scheduler::new(&p, SchedulerKind::Asap, true).run(&k).unwrap();
        assert!(s.bundles.is_empty());
        assert_eq!(s.depth, 0);
    }
}
