//! Raw platform configuration as it appears on disk.
//!
//! These structs mirror the JSON layout one-to-one. [`crate::Platform`]
//! validates and indexes them into the queryable form the rest of the
//! compiler uses.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level platform configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Backend identifier. Only recorded; hrimfax emits common qasm.
    #[serde(default)]
    pub eqasm_compiler: Option<String>,
    /// Mandatory hardware parameters.
    pub hardware_settings: HardwareSettings,
    /// Instruction set. Keys are either plain gate names (`"x"`) or
    /// specialized forms with fixed operands (`"cz q0,q1"`).
    #[serde(default)]
    pub instructions: BTreeMap<String, InstructionDef>,
    /// Decomposition rules. Keys carry `%N` parameter placeholders
    /// (`"cnot %0,%1"`), values are the replacement gate list.
    #[serde(default)]
    pub gate_decomposition: BTreeMap<String, Vec<String>>,
    /// Scheduling resources, consulted by resource-constrained
    /// scheduling when present.
    #[serde(default)]
    pub resources: BTreeMap<String, ResourceDef>,
    /// Qubit grid topology.
    #[serde(default)]
    pub topology: Option<crate::topology::Topology>,
}

/// The `hardware_settings` section.
///
/// `qubit_number` and `cycle_time` are mandatory. Any field of the form
/// `<t1>_<t2>_buffer` (with `t1`/`t2` one of `mw`, `flux`, `readout`)
/// declares a buffer time in nanoseconds inserted between operations of
/// those signal types on the same qubit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HardwareSettings {
    /// Number of qubits on the device.
    pub qubit_number: u32,
    /// Cycle time in nanoseconds.
    pub cycle_time: u64,
    /// Remaining fields, including the buffer declarations.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl HardwareSettings {
    /// Buffer in nanoseconds between a `from`-type and a `to`-type
    /// operation, zero when undeclared.
    pub fn buffer_ns(&self, from: &str, to: &str) -> u64 {
        self.extra
            .get(&format!("{from}_{to}_buffer"))
            .and_then(|v| v.as_u64())
            .unwrap_or(0)
    }
}

/// One entry of the `instructions` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstructionDef {
    /// Duration in nanoseconds.
    #[serde(default = "default_duration")]
    pub duration: u64,
    /// Operand list (`["q0", "q1"]`). Its length fixes the gate's
    /// arity; empty means the entry leaves the arity open.
    #[serde(default)]
    pub qubits: Vec<String>,
    /// Fixed latency correction in cycles (may be negative).
    #[serde(default)]
    pub latency: i64,
    /// Signal type: `mw`, `flux`, `readout`, or `none`.
    #[serde(default, rename = "type")]
    pub signal: Option<String>,
    /// Unitary matrix as `[re, im]` pairs, row-major.
    #[serde(default)]
    pub matrix: Option<Vec<[f64; 2]>>,
    /// When set, optimization passes leave this gate alone.
    #[serde(default)]
    pub disable_optimization: bool,
}

fn default_duration() -> u64 {
    40
}

/// One entry of the `resources` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceDef {
    /// Number of units of this resource.
    pub count: u32,
    /// Map from unit index (as a string key) to the qubits it serves.
    /// Empty for per-qubit resources.
    #[serde(default)]
    pub connection_map: BTreeMap<String, Vec<u32>>,
    /// Signal type this resource arbitrates, when it is channel-based.
    #[serde(default, rename = "type")]
    pub signal: Option<String>,
}
