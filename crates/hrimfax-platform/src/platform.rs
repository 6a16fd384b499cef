//! The queryable platform and its gate resolution chain.

use crate::config::{HardwareSettings, InstructionDef, PlatformConfig, ResourceDef};
use crate::error::{PlatformError, PlatformResult};
use crate::topology::Topology;
use hrimfax_ir::{
    CommuteClass, CregId, DefaultGate, Instruction, InstructionKind, IrError, QubitId, SignalType,
};
use num_complex::Complex64;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

// Decompositions may nest (a rule body naming another decomposed gate);
// anything deeper than this is a cycle.
const MAX_DECOMP_DEPTH: u32 = 32;

/// A loaded, validated hardware platform.
///
/// Gate names are resolved through a fixed chain: a specialized
/// instruction entry with matching operands (`"cz q0,q1"`), then a
/// parameterized entry (`"cz"`), then a decomposition rule
/// (`"cnot %0,%1"`), and finally the default gate set when the caller
/// allows it. Resolution failure is an [`IrError::UnknownGate`].
#[derive(Debug, Clone)]
pub struct Platform {
    name: String,
    config: PlatformConfig,
    decomp: FxHashMap<String, DecompRule>,
}

#[derive(Debug, Clone)]
struct DecompRule {
    arity: usize,
    body: Vec<String>,
}

impl Platform {
    /// Load a platform from a JSON configuration file.
    pub fn from_file(name: impl Into<String>, path: impl AsRef<Path>) -> PlatformResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| PlatformError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(name, &text)
    }

    /// Load a platform from a JSON string.
    pub fn from_json_str(name: impl Into<String>, json: &str) -> PlatformResult<Self> {
        let config: PlatformConfig = serde_json::from_str(json)?;
        let name = name.into();
        let decomp = index_decompositions(&config.gate_decomposition)?;
        let platform = Platform {
            name,
            config,
            decomp,
        };
        platform.validate()?;
        debug!(
            platform = %platform.name,
            qubits = platform.qubit_count(),
            cycle_time = platform.cycle_time(),
            instructions = platform.config.instructions.len(),
            "platform loaded"
        );
        Ok(platform)
    }

    fn validate(&self) -> PlatformResult<()> {
        if let Some(backend) = &self.config.eqasm_compiler {
            if !matches!(backend.as_str(), "none" | "qx") {
                return Err(PlatformError::UnsupportedBackend(backend.clone()));
            }
        }
        for (key, def) in &self.config.instructions {
            if let Some((_, ops)) = key.split_once(' ') {
                let well_formed = ops
                    .split(',')
                    .map(str::trim)
                    .all(|op| op.strip_prefix('q').is_some_and(|i| i.parse::<u32>().is_ok()));
                if !well_formed {
                    return Err(PlatformError::BadInstructionKey(key.clone()));
                }
            }
            if let Some(matrix) = &def.matrix {
                let expected = match declared_arity(key, def) {
                    Some(arity) => 1usize << (2 * arity),
                    None => 4,
                };
                if matrix.len() != expected {
                    return Err(PlatformError::BadMatrix {
                        name: key.clone(),
                        expected,
                        got: matrix.len(),
                    });
                }
            }
            if let Some(sig) = &def.signal {
                if SignalType::parse(sig).is_none() {
                    return Err(PlatformError::UnknownSignal {
                        name: key.clone(),
                        signal: sig.clone(),
                    });
                }
            }
        }
        let count = self.qubit_count();
        for (rname, res) in &self.config.resources {
            for qubits in res.connection_map.values() {
                for &q in qubits {
                    if q >= count {
                        return Err(PlatformError::ResourceQubit {
                            resource: rname.clone(),
                            qubit: q,
                            count,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Platform name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of qubits on the device.
    pub fn qubit_count(&self) -> u32 {
        self.config.hardware_settings.qubit_number
    }

    /// Cycle time in nanoseconds.
    pub fn cycle_time(&self) -> u64 {
        self.config.hardware_settings.cycle_time
    }

    /// The hardware settings section, for buffer lookups.
    pub fn settings(&self) -> &HardwareSettings {
        &self.config.hardware_settings
    }

    /// Buffer between two signal types, in whole cycles (rounded up).
    pub fn buffer_cycles(&self, from: SignalType, to: SignalType) -> u64 {
        let ns = self
            .settings()
            .buffer_ns(&from.to_string(), &to.to_string());
        ns.div_ceil(self.cycle_time().max(1))
    }

    /// Declared scheduling resources.
    pub fn resources(&self) -> &BTreeMap<String, ResourceDef> {
        &self.config.resources
    }

    /// The raw instruction section, keyed as written in the
    /// configuration.
    pub fn instructions(&self) -> &BTreeMap<String, InstructionDef> {
        &self.config.instructions
    }

    /// Device topology, when declared.
    pub fn topology(&self) -> Option<&Topology> {
        self.config.topology.as_ref()
    }

    /// Backend identifier from the configuration file.
    pub fn eqasm_compiler(&self) -> Option<&str> {
        self.config.eqasm_compiler.as_deref()
    }

    /// Resolve a gate name against this platform.
    ///
    /// Returns the instruction sequence the name expands to: a single
    /// instruction for direct matches, several for decomposition rules.
    pub fn resolve(
        &self,
        name: &str,
        qubits: &[QubitId],
        cregs: &[CregId],
        angle: Option<f64>,
        use_default_gates: bool,
    ) -> PlatformResult<Vec<Instruction>> {
        self.resolve_inner(name, qubits, cregs, angle, use_default_gates, 0)
    }

    fn resolve_inner(
        &self,
        name: &str,
        qubits: &[QubitId],
        cregs: &[CregId],
        angle: Option<f64>,
        use_default_gates: bool,
        depth: u32,
    ) -> PlatformResult<Vec<Instruction>> {
        if depth > MAX_DECOMP_DEPTH {
            return Err(PlatformError::DecompositionDepth(name.to_string()));
        }

        // 1. Specialized entry with these exact operands.
        let specialized = specialized_key(name, qubits);
        if let Some(def) = self.config.instructions.get(&specialized) {
            return Ok(vec![self.instruction_from_def(name, def, qubits, cregs, angle)]);
        }

        // 2. Parameterized entry.
        if let Some(def) = self.config.instructions.get(name) {
            if let Some(arity) = declared_arity(name, def) {
                if arity != qubits.len() {
                    return Err(IrError::OperandCount {
                        name: name.to_string(),
                        expected: arity as u32,
                        got: qubits.len() as u32,
                    }
                    .into());
                }
            }
            return Ok(vec![self.instruction_from_def(name, def, qubits, cregs, angle)]);
        }

        // 3. Decomposition rule.
        if let Some(rule) = self.decomp.get(name) {
            if rule.arity != qubits.len() {
                return Err(PlatformError::BadDecomposition {
                    key: name.to_string(),
                    reason: format!(
                        "rule takes {} operand(s), gate has {}",
                        rule.arity,
                        qubits.len()
                    ),
                });
            }
            let mut out = Vec::new();
            for sub in &rule.body {
                let (sub_name, sub_qubits) = instantiate(sub, qubits).map_err(|reason| {
                    PlatformError::BadDecomposition {
                        key: name.to_string(),
                        reason,
                    }
                })?;
                out.extend(self.resolve_inner(
                    &sub_name,
                    &sub_qubits,
                    &[],
                    None,
                    use_default_gates,
                    depth + 1,
                )?);
            }
            return Ok(out);
        }

        // 4. Default gate set.
        if use_default_gates {
            if let Some(gate) = DefaultGate::from_name(name, angle) {
                let mut instr = Instruction {
                    name: gate.name().into(),
                    kind: match gate {
                        DefaultGate::Prepz => InstructionKind::Prep,
                        DefaultGate::Measure => InstructionKind::Measure,
                        _ => InstructionKind::Unitary,
                    },
                    qubits: qubits.to_vec(),
                    cregs: cregs.to_vec(),
                    angle: gate.angle(),
                    duration: gate.duration(),
                    signal: gate.signal(),
                    commute: gate.commute_class(),
                    matrix: gate.matrix(),
                };
                if matches!(gate, DefaultGate::Rx(_) | DefaultGate::Ry(_) | DefaultGate::Rz(_)) {
                    instr.angle = angle;
                }
                return Ok(vec![instr]);
            }
        }

        Err(IrError::UnknownGate(name.to_string()).into())
    }

    fn instruction_from_def(
        &self,
        name: &str,
        def: &InstructionDef,
        qubits: &[QubitId],
        cregs: &[CregId],
        angle: Option<f64>,
    ) -> Instruction {
        let kind = classify(name);
        let signal = def
            .signal
            .as_deref()
            .and_then(SignalType::parse)
            .unwrap_or_else(|| infer_signal(&kind, qubits.len()));
        Instruction {
            name: name.to_string(),
            kind,
            qubits: qubits.to_vec(),
            cregs: cregs.to_vec(),
            angle,
            duration: def.duration,
            signal,
            commute: commute_for(name),
            matrix: def.matrix.as_deref().map(to_matrix),
        }
    }
}

fn classify(name: &str) -> InstructionKind {
    match name {
        "prepz" | "prep_z" | "prepx" | "prep_x" | "prepy" | "prep_y" => InstructionKind::Prep,
        "measure" | "measz" | "measx" | "measy" => InstructionKind::Measure,
        _ => InstructionKind::Unitary,
    }
}

fn commute_for(name: &str) -> CommuteClass {
    match name {
        "cz" | "cphase" => CommuteClass::CzLike,
        "cnot" | "cx" => CommuteClass::CnotLike,
        _ => CommuteClass::Other,
    }
}

fn infer_signal(kind: &InstructionKind, arity: usize) -> SignalType {
    match kind {
        InstructionKind::Measure => SignalType::Readout,
        InstructionKind::Prep | InstructionKind::Wait { .. } => SignalType::None,
        InstructionKind::Unitary if arity >= 2 => SignalType::Flux,
        InstructionKind::Unitary => SignalType::Mw,
    }
}

/// The specialized-entry key for a gate applied to concrete operands,
/// e.g. `"cz q0,q1"`.
fn specialized_key(name: &str, qubits: &[QubitId]) -> String {
    use std::fmt::Write;
    let mut key = name.to_string();
    for (i, q) in qubits.iter().enumerate() {
        let sep = if i == 0 { ' ' } else { ',' };
        let _ = write!(key, "{sep}q{}", q.0);
    }
    key
}

/// Declared operand count of an instruction entry: the key's operand
/// list for specialized entries (`"cz q0,q1"` has two), otherwise the
/// `qubits` field, otherwise the matrix dimensions. `None` when the
/// entry leaves the arity open.
fn declared_arity(key: &str, def: &InstructionDef) -> Option<usize> {
    if let Some((_, ops)) = key.split_once(' ') {
        return Some(ops.split(',').count());
    }
    if !def.qubits.is_empty() {
        return Some(def.qubits.len());
    }
    def.matrix.as_ref().and_then(|m| matrix_arity(m.len()))
}

/// The operand count whose row-major 2^n x 2^n unitary has `len`
/// entries, when `len` is an exact power of four.
fn matrix_arity(len: usize) -> Option<usize> {
    let mut n = 0usize;
    let mut size = 1usize;
    while size < len {
        size *= 4;
        n += 1;
    }
    (n > 0 && size == len).then_some(n)
}

fn index_decompositions(
    raw: &BTreeMap<String, Vec<String>>,
) -> PlatformResult<FxHashMap<String, DecompRule>> {
    let mut out = FxHashMap::default();
    for (key, body) in raw {
        let Some((name, params)) = key.split_once(' ') else {
            return Err(PlatformError::BadDecomposition {
                key: key.clone(),
                reason: "key has no parameter list".into(),
            });
        };
        let params: Vec<&str> = params.split(',').map(str::trim).collect();
        for (i, p) in params.iter().enumerate() {
            if *p != format!("%{i}") {
                return Err(PlatformError::BadDecomposition {
                    key: key.clone(),
                    reason: format!("parameter {i} must be %{i}, got '{p}'"),
                });
            }
        }
        out.insert(
            name.to_string(),
            DecompRule {
                arity: params.len(),
                body: body.clone(),
            },
        );
    }
    Ok(out)
}

/// Substitute `%N` placeholders in a decomposition body entry with the
/// actual operands. Literal `qN` operands are also accepted.
fn instantiate(sub: &str, qubits: &[QubitId]) -> Result<(String, Vec<QubitId>), String> {
    let (name, ops) = match sub.split_once(' ') {
        Some((n, o)) => (n, o),
        None => return Ok((sub.to_string(), Vec::new())),
    };
    let mut resolved = Vec::new();
    for op in ops.split(',').map(str::trim) {
        if let Some(idx) = op.strip_prefix('%') {
            let idx: usize = idx
                .parse()
                .map_err(|_| format!("bad placeholder '{op}'"))?;
            let q = qubits
                .get(idx)
                .ok_or_else(|| format!("placeholder %{idx} out of range"))?;
            resolved.push(*q);
        } else if let Some(idx) = op.strip_prefix('q') {
            let idx: u32 = idx.parse().map_err(|_| format!("bad operand '{op}'"))?;
            resolved.push(QubitId(idx));
        } else {
            return Err(format!("bad operand '{op}'"));
        }
    }
    Ok((name.to_string(), resolved))
}

fn to_matrix(pairs: &[[f64; 2]]) -> Vec<Complex64> {
    pairs.iter().map(|[re, im]| Complex64::new(*re, *im)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"{
        "eqasm_compiler": "none",
        "hardware_settings": {
            "qubit_number": 5,
            "cycle_time": 20,
            "mw_flux_buffer": 40,
            "flux_mw_buffer": 20
        },
        "instructions": {
            "x": { "duration": 40, "type": "mw" },
            "y90": { "duration": 40, "type": "mw" },
            "my90": { "duration": 40, "type": "mw" },
            "cz": { "duration": 80, "type": "flux", "qubits": ["q0", "q1"] },
            "cz q2,q3": { "duration": 100, "type": "flux" },
            "measure": { "duration": 300, "type": "readout" },
            "prepz": { "duration": 200 }
        },
        "gate_decomposition": {
            "cnot %0,%1": ["y90 %1", "cz %0,%1", "my90 %1"]
        }
    }"#;

    fn platform() -> Platform {
        Platform::from_json_str("test", CONFIG).unwrap()
    }

    #[test]
    fn test_parameterized_resolution() {
        let p = platform();
        let got = p.resolve("x", &[QubitId(1)], &[], None, false).unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].duration, 40);
        assert_eq!(got[0].signal, SignalType::Mw);
    }

    #[test]
    fn test_specialized_beats_parameterized() {
        let p = platform();
        let got = p
            .resolve("cz", &[QubitId(2), QubitId(3)], &[], None, false)
            .unwrap();
        assert_eq!(got[0].duration, 100);
        let got = p
            .resolve("cz", &[QubitId(0), QubitId(1)], &[], None, false)
            .unwrap();
        assert_eq!(got[0].duration, 80);
    }

    #[test]
    fn test_decomposition_expands() {
        let p = platform();
        let got = p
            .resolve("cnot", &[QubitId(0), QubitId(1)], &[], None, false)
            .unwrap();
        let names: Vec<&str> = got.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["y90", "cz", "my90"]);
        assert_eq!(got[0].qubits, vec![QubitId(1)]);
        assert_eq!(got[1].qubits, vec![QubitId(0), QubitId(1)]);
    }

    #[test]
    fn test_unknown_gate_without_defaults() {
        let p = platform();
        let err = p.resolve("pepez", &[QubitId(0)], &[], None, false).unwrap_err();
        assert!(matches!(err, PlatformError::Ir(IrError::UnknownGate(name)) if name == "pepez"));
    }

    #[test]
    fn test_default_gate_fallback() {
        let p = platform();
        assert!(p.resolve("h", &[QubitId(0)], &[], None, false).is_err());
        let got = p.resolve("h", &[QubitId(0)], &[], None, true).unwrap();
        assert_eq!(got[0].duration, 40);
    }

    #[test]
    fn test_measure_keeps_register() {
        let p = platform();
        let got = p
            .resolve("measure", &[QubitId(0)], &[CregId(0)], None, false)
            .unwrap();
        assert_eq!(got[0].kind, InstructionKind::Measure);
        assert_eq!(got[0].cregs, vec![CregId(0)]);
        assert_eq!(got[0].duration, 300);
    }

    #[test]
    fn test_buffer_cycles_round_up() {
        let p = platform();
        assert_eq!(p.buffer_cycles(SignalType::Mw, SignalType::Flux), 2);
        assert_eq!(p.buffer_cycles(SignalType::Flux, SignalType::Mw), 1);
        assert_eq!(p.buffer_cycles(SignalType::Readout, SignalType::Mw), 0);
    }

    #[test]
    fn test_unsupported_backend_rejected() {
        let json = r#"{
            "eqasm_compiler": "cc_light",
            "hardware_settings": { "qubit_number": 2, "cycle_time": 20 }
        }"#;
        let err = Platform::from_json_str("cc", json).unwrap_err();
        assert!(matches!(err, PlatformError::UnsupportedBackend(ref b) if b == "cc_light"));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("device.json");
        std::fs::write(&path, CONFIG).unwrap();
        let p = Platform::from_file("disk", &path).unwrap();
        assert_eq!(p.qubit_count(), 5);
        let err = Platform::from_file("gone", dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, PlatformError::Io { .. }));
    }

    #[test]
    fn test_operand_count_from_qubits_list() {
        let p = platform();
        let err = p.resolve("cz", &[QubitId(0)], &[], None, false).unwrap_err();
        assert!(matches!(
            err,
            PlatformError::Ir(IrError::OperandCount { expected: 2, got: 1, .. })
        ));
    }

    #[test]
    fn test_two_qubit_matrix_sized_by_arity() {
        let json = r#"{
            "hardware_settings": { "qubit_number": 2, "cycle_time": 20 },
            "instructions": {
                "cz": {
                    "duration": 80,
                    "matrix": [
                        [1.0, 0.0], [0.0, 0.0], [0.0, 0.0], [0.0, 0.0],
                        [0.0, 0.0], [1.0, 0.0], [0.0, 0.0], [0.0, 0.0],
                        [0.0, 0.0], [0.0, 0.0], [1.0, 0.0], [0.0, 0.0],
                        [0.0, 0.0], [0.0, 0.0], [0.0, 0.0], [-1.0, 0.0]
                    ]
                }
            }
        }"#;
        let p = Platform::from_json_str("czmat", json).unwrap();
        let got = p
            .resolve("cz", &[QubitId(0), QubitId(1)], &[], None, false)
            .unwrap();
        assert_eq!(got[0].matrix.as_ref().map(Vec::len), Some(16));
        // The matrix also fixes the arity when no qubits list is given.
        let err = p.resolve("cz", &[QubitId(0)], &[], None, false).unwrap_err();
        assert!(matches!(err, PlatformError::Ir(IrError::OperandCount { .. })));
    }

    #[test]
    fn test_malformed_instruction_key_rejected() {
        let json = r#"{
            "hardware_settings": { "qubit_number": 2, "cycle_time": 20 },
            "instructions": { "cz q0,ancilla": { "duration": 80 } }
        }"#;
        let err = Platform::from_json_str("bad_key", json).unwrap_err();
        assert!(matches!(err, PlatformError::BadInstructionKey(ref k) if k == "cz q0,ancilla"));
    }

    #[test]
    fn test_bad_matrix_rejected() {
        let json = r#"{
            "hardware_settings": { "qubit_number": 2, "cycle_time": 20 },
            "instructions": {
                "x": { "duration": 40, "matrix": [[1.0, 0.0], [0.0, 0.0]] }
            }
        }"#;
        let err = Platform::from_json_str("bad", json).unwrap_err();
        assert!(matches!(err, PlatformError::BadMatrix { expected: 4, got: 2, .. }));
    }
}
