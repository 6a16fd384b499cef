//! Scheduled instruction bundles.
//!
//! After scheduling, instructions that start in the same cycle form a
//! bundle. Bundles are the unit of parallel emission in scheduled qasm
//! (`{ a | b }`) and the unit instrument backends consume.

use crate::instruction::Instruction;
use serde::{Deserialize, Serialize};

/// Instructions that start in the same cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    /// First cycle of the bundle, counting from 1.
    pub start_cycle: u64,
    /// Length of the longest member, in whole cycles.
    pub duration_in_cycles: u64,
    /// The parallel instructions.
    pub instructions: Vec<Instruction>,
}

impl Bundle {
    /// Build a bundle from instructions starting at `start_cycle`, taking
    /// the duration from the longest member.
    pub fn new(start_cycle: u64, instructions: Vec<Instruction>, cycle_time: u64) -> Self {
        let duration_in_cycles = instructions
            .iter()
            .map(|i| i.duration_in_cycles(cycle_time))
            .max()
            .unwrap_or(0);
        Bundle {
            start_cycle,
            duration_in_cycles,
            instructions,
        }
    }

    /// Cycle after the last member finishes.
    pub fn end_cycle(&self) -> u64 {
        self.start_cycle + self.duration_in_cycles
    }
}

/// A scheduled kernel body.
pub type Bundles = Vec<Bundle>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qubit::QubitId;

    #[test]
    fn test_duration_is_max_of_members() {
        let b = Bundle::new(
            1,
            vec![
                Instruction::unitary("x", vec![QubitId(0)], 40),
                Instruction::unitary("cnot", vec![QubitId(1), QubitId(2)], 80),
            ],
            20,
        );
        assert_eq!(b.duration_in_cycles, 4);
        assert_eq!(b.end_cycle(), 5);
    }

    #[test]
    fn test_empty_bundle() {
        let b = Bundle::new(1, vec![], 20);
        assert_eq!(b.duration_in_cycles, 0);
    }
}
