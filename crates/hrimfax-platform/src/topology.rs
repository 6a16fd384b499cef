//! Qubit grid topology.

use serde::{Deserialize, Serialize};

/// A positioned qubit on the device grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridQubit {
    /// Qubit index.
    pub id: u32,
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
}

/// A directed coupling between two qubits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Edge index, used by edge-based resources.
    pub id: u32,
    /// Source qubit.
    pub src: u32,
    /// Destination qubit.
    pub dst: u32,
}

/// The `topology` section of a platform configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topology {
    /// Grid width.
    pub x_size: u32,
    /// Grid height.
    pub y_size: u32,
    /// Qubit placements.
    #[serde(default)]
    pub qubits: Vec<GridQubit>,
    /// Couplings.
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Topology {
    /// Whether `a` and `b` share an edge, in either direction.
    pub fn connected(&self, a: u32, b: u32) -> bool {
        self.edges
            .iter()
            .any(|e| (e.src == a && e.dst == b) || (e.src == b && e.dst == a))
    }

    /// Qubits reachable from `q` over one edge.
    pub fn neighbors(&self, q: u32) -> Vec<u32> {
        let mut out: Vec<u32> = self
            .edges
            .iter()
            .filter_map(|e| {
                if e.src == q {
                    Some(e.dst)
                } else if e.dst == q {
                    Some(e.src)
                } else {
                    None
                }
            })
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// The edge from `src` to `dst`, if declared.
    pub fn edge(&self, src: u32, dst: u32) -> Option<&Edge> {
        self.edges.iter().find(|e| e.src == src && e.dst == dst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line3() -> Topology {
        Topology {
            x_size: 3,
            y_size: 1,
            qubits: (0..3).map(|id| GridQubit { id, x: id, y: 0 }).collect(),
            edges: vec![
                Edge { id: 0, src: 0, dst: 1 },
                Edge { id: 1, src: 1, dst: 2 },
            ],
        }
    }

    #[test]
    fn test_connectivity() {
        let t = line3();
        assert!(t.connected(0, 1));
        assert!(t.connected(1, 0));
        assert!(!t.connected(0, 2));
    }

    #[test]
    fn test_neighbors() {
        let t = line3();
        assert_eq!(t.neighbors(1), vec![0, 2]);
        assert_eq!(t.neighbors(2), vec![1]);
    }
}
