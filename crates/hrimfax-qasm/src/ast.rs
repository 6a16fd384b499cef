//! Parsed qasm structure.

/// A whole qasm file.
#[derive(Debug, Clone, PartialEq)]
pub struct QasmProgram {
    /// Declared language version.
    pub version: String,
    /// Declared qubit count.
    pub qubits: u32,
    /// Kernel sections in file order.
    pub kernels: Vec<QasmKernel>,
}

/// One `.name` section.
#[derive(Debug, Clone, PartialEq)]
pub struct QasmKernel {
    /// Section label without the leading dot.
    pub name: String,
    /// Statements in source order.
    pub statements: Vec<QasmStatement>,
}

/// A single gate application.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementGate {
    /// Gate name as written.
    pub name: String,
    /// Qubit operands (`q[N]`).
    pub qubits: Vec<u32>,
    /// Classical register operands (`rN`).
    pub cregs: Vec<u32>,
    /// Trailing angle argument, when present.
    pub angle: Option<f64>,
}

/// One statement of a kernel section.
#[derive(Debug, Clone, PartialEq)]
pub enum QasmStatement {
    /// A single gate.
    Gate(StatementGate),
    /// A parallel bundle `{ a | b }`.
    Parallel(Vec<StatementGate>),
    /// `wait n`.
    Wait(u64),
}
