//! Qubit and classical register index types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a qubit within a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q[{}]", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

impl From<usize> for QubitId {
    fn from(id: usize) -> Self {
        QubitId(u32::try_from(id).expect("QubitId overflow: exceeds u32::MAX"))
    }
}

/// Index of a classical register within a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CregId(pub u32);

impl fmt::Display for CregId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

impl From<u32> for CregId {
    fn from(id: u32) -> Self {
        CregId(id)
    }
}

impl From<usize> for CregId {
    fn from(id: usize) -> Self {
        CregId(u32::try_from(id).expect("CregId overflow: exceeds u32::MAX"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qubit_display() {
        assert_eq!(format!("{}", QubitId(0)), "q[0]");
        assert_eq!(format!("{}", QubitId(12)), "q[12]");
    }

    #[test]
    fn test_creg_display() {
        assert_eq!(format!("{}", CregId(3)), "r3");
    }
}
