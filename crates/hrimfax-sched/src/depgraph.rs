//! Dependence graph construction.
//!
//! Instructions are nodes between two dummy nodes, `SOURCE` and `SINK`.
//! Each qubit tracks its last writer, the readers since that writer,
//! and the CNOT targets since that writer; events against that state
//! produce the dependence edges. Classical registers track writers
//! only. Edge weights are the source node's duration in cycles, so a
//! longest path from `SOURCE` is a valid start cycle.
//!
//! Commutation shows up as event classes rather than special cases:
//! both operands of a CZ are reads (CZs on shared qubits commute), a
//! CNOT control is a read, and a CNOT target is its own event class
//! (`D`) that commutes with other CNOT targets but not with reads or
//! writes.

use crate::error::{SchedError, SchedResult};
use hrimfax_ir::{CommuteClass, Instruction, InstructionKind, Kernel};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use tracing::trace;

/// Dependence kind, named `<event>After<event>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepType {
    /// Read after write.
    Raw,
    /// Write after write.
    Waw,
    /// Write after read.
    War,
    /// Write after CNOT-target.
    Wad,
    /// Read after CNOT-target.
    Rad,
    /// CNOT-target after read.
    Dar,
    /// CNOT-target after write.
    Daw,
}

/// A dependence edge: kind plus the source node's duration in cycles.
#[derive(Debug, Clone, Copy)]
pub struct Dep {
    /// Dependence kind.
    pub ty: DepType,
    /// Minimum cycle distance between the two start cycles.
    pub weight: u64,
}

/// Graph node: an instruction by kernel index, or a dummy endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    /// Dummy predecessor of everything.
    Source,
    /// Dummy successor of everything.
    Sink,
    /// Instruction at this index in the kernel.
    Instr(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Read,
    Write,
    D,
}

#[derive(Default)]
struct QubitState {
    last_writer: Option<NodeIndex>,
    last_readers: Vec<NodeIndex>,
    last_ds: Vec<NodeIndex>,
}

/// The dependence graph of one kernel.
pub struct DepGraph {
    graph: DiGraph<Node, Dep>,
    source: NodeIndex,
    sink: NodeIndex,
    instr_nodes: Vec<NodeIndex>,
}

impl DepGraph {
    /// Build the graph for a kernel.
    ///
    /// With `commute` false, every qubit operand is a write and the
    /// graph degenerates to strict program order per qubit.
    pub fn build(kernel: &Kernel, cycle_time: u64, commute: bool) -> Self {
        let instrs = kernel.instructions();
        let mut graph = DiGraph::with_capacity(instrs.len() + 2, instrs.len() * 2);
        let source = graph.add_node(Node::Source);
        let sink = graph.add_node(Node::Sink);

        let mut qubits: Vec<QubitState> = (0..kernel.qubit_count())
            .map(|_| QubitState {
                last_writer: Some(source),
                ..QubitState::default()
            })
            .collect();
        let mut cregs: Vec<Option<NodeIndex>> =
            vec![Some(source); kernel.creg_count() as usize];

        // SOURCE occupies one cycle so real instructions start at 1.
        let dur = |g: &DiGraph<Node, Dep>, n: NodeIndex| -> u64 {
            match g[n] {
                Node::Source => 1,
                Node::Sink => 0,
                Node::Instr(i) => instrs[i].duration_in_cycles(cycle_time),
            }
        };

        let mut instr_nodes = Vec::with_capacity(instrs.len());
        for (idx, instr) in instrs.iter().enumerate() {
            let node = graph.add_node(Node::Instr(idx));
            instr_nodes.push(node);

            if instr.is_classical() {
                // A bare wait is a barrier across the whole register file.
                for q in 0..qubits.len() {
                    apply_event(&mut graph, &mut qubits[q], node, Event::Write, &dur);
                }
                continue;
            }

            for (op, q) in instr.qubits.iter().enumerate() {
                let ev = operand_event(instr, op, commute);
                apply_event(&mut graph, &mut qubits[q.0 as usize], node, ev, &dur);
            }
            for c in &instr.cregs {
                let state = &mut cregs[c.0 as usize];
                if let Some(w) = *state {
                    let weight = dur(&graph, w);
                    graph.add_edge(w, node, Dep { ty: DepType::Waw, weight });
                }
                *state = Some(node);
            }
        }

        // Close every chain into SINK.
        for q in &mut qubits {
            apply_event(&mut graph, q, sink, Event::Write, &dur);
        }
        for state in cregs.iter().flatten() {
            let weight = dur(&graph, *state);
            graph.add_edge(*state, sink, Dep { ty: DepType::Waw, weight });
        }
        // An empty kernel still needs SOURCE ordered before SINK.
        if kernel.qubit_count() == 0 && kernel.creg_count() == 0 {
            graph.add_edge(source, sink, Dep { ty: DepType::Waw, weight: 1 });
        }

        trace!(
            kernel = kernel.name(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "dependence graph built"
        );

        DepGraph {
            graph,
            source,
            sink,
            instr_nodes,
        }
    }

    /// The underlying graph.
    pub fn graph(&self) -> &DiGraph<Node, Dep> {
        &self.graph
    }

    /// The dummy start node.
    pub fn source(&self) -> NodeIndex {
        self.source
    }

    /// The dummy end node.
    pub fn sink(&self) -> NodeIndex {
        self.sink
    }

    /// Graph node of the instruction at `idx`.
    pub fn instr_node(&self, idx: usize) -> NodeIndex {
        self.instr_nodes[idx]
    }

    /// Kernel index of a graph node, `None` for the dummies.
    pub fn node_instr(&self, node: NodeIndex) -> Option<usize> {
        match self.graph[node] {
            Node::Instr(i) => Some(i),
            _ => None,
        }
    }

    /// Nodes in topological order.
    pub fn topo(&self, kernel_name: &str) -> SchedResult<Vec<NodeIndex>> {
        petgraph::algo::toposort(&self.graph, None)
            .map_err(|_| SchedError::CyclicDependences(kernel_name.to_string()))
    }

    /// Direct predecessors with edge weights.
    pub fn preds(&self, node: NodeIndex) -> impl Iterator<Item = (NodeIndex, u64)> + '_ {
        self.graph
            .edges_directed(node, Direction::Incoming)
            .map(|e| (e.source(), e.weight().weight))
    }

    /// Direct successors with edge weights.
    pub fn succs(&self, node: NodeIndex) -> impl Iterator<Item = (NodeIndex, u64)> + '_ {
        self.graph
            .edges_directed(node, Direction::Outgoing)
            .map(|e| (e.target(), e.weight().weight))
    }
}

fn operand_event(instr: &Instruction, operand: usize, commute: bool) -> Event {
    if matches!(
        instr.kind,
        InstructionKind::Prep | InstructionKind::Measure
    ) {
        return Event::Write;
    }
    if !commute {
        return Event::Write;
    }
    match instr.commute {
        CommuteClass::CzLike => Event::Read,
        CommuteClass::CnotLike => {
            if operand == 0 {
                Event::Read
            } else {
                Event::D
            }
        }
        CommuteClass::ControlledOther => {
            if operand == 0 {
                Event::Read
            } else {
                Event::Write
            }
        }
        CommuteClass::Other => Event::Write,
    }
}

fn apply_event<F>(
    graph: &mut DiGraph<Node, Dep>,
    state: &mut QubitState,
    node: NodeIndex,
    event: Event,
    dur: &F,
) where
    F: Fn(&DiGraph<Node, Dep>, NodeIndex) -> u64,
{
    let edge = |graph: &mut DiGraph<Node, Dep>, from: NodeIndex, ty: DepType| {
        if from != node {
            let weight = dur(graph, from);
            graph.add_edge(from, node, Dep { ty, weight });
        }
    };
    match event {
        Event::Read => {
            if let Some(w) = state.last_writer {
                edge(graph, w, DepType::Raw);
            }
            for d in state.last_ds.clone() {
                edge(graph, d, DepType::Rad);
            }
            state.last_readers.push(node);
        }
        Event::D => {
            if let Some(w) = state.last_writer {
                edge(graph, w, DepType::Daw);
            }
            for r in state.last_readers.clone() {
                edge(graph, r, DepType::Dar);
            }
            state.last_ds.push(node);
        }
        Event::Write => {
            if let Some(w) = state.last_writer {
                edge(graph, w, DepType::Waw);
            }
            for r in state.last_readers.clone() {
                edge(graph, r, DepType::War);
            }
            for d in state.last_ds.clone() {
                edge(graph, d, DepType::Wad);
            }
            state.last_writer = Some(node);
            state.last_readers.clear();
            state.last_ds.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrimfax_ir::QubitId;

    fn has_edge(g: &DepGraph, from: usize, to: usize) -> bool {
        g.graph()
            .find_edge(g.instr_node(from), g.instr_node(to))
            .is_some()
    }

    #[test]
    fn test_serial_chain() {
        let mut k = Kernel::new("k", 1, 0);
        k.x(QubitId(0)).unwrap();
        k.y(QubitId(0)).unwrap();
        k.z(QubitId(0)).unwrap();
        let g = DepGraph::build(&k, 20, true);
        assert!(has_edge(&g, 0, 1));
        assert!(has_edge(&g, 1, 2));
        assert!(!has_edge(&g, 0, 2));
    }

    #[test]
    fn test_independent_qubits_no_edge() {
        let mut k = Kernel::new("k", 2, 0);
        k.x(QubitId(0)).unwrap();
        k.y(QubitId(1)).unwrap();
        let g = DepGraph::build(&k, 20, true);
        assert!(!has_edge(&g, 0, 1));
        assert!(!has_edge(&g, 1, 0));
    }

    #[test]
    fn test_cz_pair_commutes() {
        let mut k = Kernel::new("k", 3, 0);
        k.cz(QubitId(0), QubitId(1)).unwrap();
        k.cz(QubitId(1), QubitId(2)).unwrap();
        let g = DepGraph::build(&k, 20, true);
        assert!(!has_edge(&g, 0, 1));
        // Without commutation analysis they serialize on q1.
        let g = DepGraph::build(&k, 20, false);
        assert!(has_edge(&g, 0, 1));
    }

    #[test]
    fn test_cnot_controls_commute_targets_serialize() {
        let mut k = Kernel::new("k", 3, 0);
        k.cnot(QubitId(0), QubitId(1)).unwrap();
        k.cnot(QubitId(0), QubitId(2)).unwrap();
        k.cnot(QubitId(2), QubitId(1)).unwrap();
        let g = DepGraph::build(&k, 20, true);
        // Shared control q0: no edge.
        assert!(!has_edge(&g, 0, 1));
        // Targets on q1 are D events and commute with each other.
        assert!(!has_edge(&g, 0, 2));
        // q2: control read of gate 2 follows the target D of gate 1.
        assert!(has_edge(&g, 1, 2));
    }

    #[test]
    fn test_measure_serializes_on_creg() {
        let mut k = Kernel::new("k", 2, 1);
        k.measure(QubitId(0), hrimfax_ir::CregId(0)).unwrap();
        k.measure(QubitId(1), hrimfax_ir::CregId(0)).unwrap();
        let g = DepGraph::build(&k, 20, true);
        assert!(has_edge(&g, 0, 1));
    }

    #[test]
    fn test_wait_is_barrier() {
        let mut k = Kernel::new("k", 2, 0);
        k.x(QubitId(0)).unwrap();
        k.wait(2, 20);
        k.y(QubitId(1)).unwrap();
        let g = DepGraph::build(&k, 20, true);
        assert!(has_edge(&g, 0, 1));
        assert!(has_edge(&g, 1, 2));
    }

    #[test]
    fn test_topo_has_all_nodes() {
        let mut k = Kernel::new("k", 2, 0);
        k.h(QubitId(0)).unwrap();
        k.cnot(QubitId(0), QubitId(1)).unwrap();
        let g = DepGraph::build(&k, 20, true);
        let order = g.topo("k").unwrap();
        assert_eq!(order.len(), 4);
        assert_eq!(order[0], g.source());
    }
}
