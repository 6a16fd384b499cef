//! The built-in gate set.
//!
//! Default gates carry the fixed durations of the reference gate library
//! (40 ns for single-qubit operations, 80 ns for two-qubit operations,
//! 160 ns for the Toffoli, 20 ns for a nop). Platforms normally override
//! these through their instruction section; default gates are only used
//! when the `use_default_gates` option allows the fallback.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Signal type of an instruction, used to group operations onto shared
/// instrument channels during resource-constrained scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalType {
    /// No instrument channel is claimed.
    #[default]
    None,
    /// Microwave channel (single-qubit drive).
    Mw,
    /// Flux channel (two-qubit interactions).
    Flux,
    /// Readout channel (measurement).
    Readout,
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SignalType::None => "none",
            SignalType::Mw => "mw",
            SignalType::Flux => "flux",
            SignalType::Readout => "readout",
        };
        write!(f, "{s}")
    }
}

impl SignalType {
    /// Parse a signal type from its configuration-file spelling.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(SignalType::None),
            "mw" => Some(SignalType::Mw),
            "flux" => Some(SignalType::Flux),
            "readout" => Some(SignalType::Readout),
            _ => None,
        }
    }
}

/// How an instruction participates in commutation-aware dependence
/// analysis.
///
/// Control operands of controlled unitaries commute with each other;
/// CZ-class gates commute on both operands; CNOT targets commute with
/// other CNOT targets on the same qubit. Everything else serializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommuteClass {
    /// Both operands behave as reads (cz, cphase).
    CzLike,
    /// First operand reads, second operand is a CNOT target.
    CnotLike,
    /// First operand reads, remaining operands write (other controlled
    /// unitaries).
    ControlledOther,
    /// No commutation structure.
    Other,
}

/// Gates with built-in semantics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DefaultGate {
    /// Identity.
    I,
    /// Hadamard.
    H,
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
    /// Phase gate (sqrt(Z)).
    S,
    /// Phase dagger.
    Sdag,
    /// T gate.
    T,
    /// T dagger.
    Tdag,
    /// X rotation by 90 degrees.
    Rx90,
    /// X rotation by -90 degrees.
    MRx90,
    /// X rotation by 180 degrees.
    Rx180,
    /// Y rotation by 90 degrees.
    Ry90,
    /// Y rotation by -90 degrees.
    MRy90,
    /// Y rotation by 180 degrees.
    Ry180,
    /// Arbitrary X rotation.
    Rx(f64),
    /// Arbitrary Y rotation.
    Ry(f64),
    /// Arbitrary Z rotation.
    Rz(f64),
    /// Prepare |0>.
    Prepz,
    /// Measurement in the Z basis.
    Measure,
    /// No-operation.
    Nop,
    /// Controlled-NOT.
    Cnot,
    /// Controlled-Z (cphase).
    Cz,
    /// SWAP.
    Swap,
    /// Toffoli (CCNOT).
    Toffoli,
}

impl DefaultGate {
    /// Look up a default gate by its circuit name.
    pub fn from_name(name: &str, angle: Option<f64>) -> Option<Self> {
        match name {
            "i" | "identity" => Some(DefaultGate::I),
            "h" | "hadamard" => Some(DefaultGate::H),
            "x" => Some(DefaultGate::X),
            "y" => Some(DefaultGate::Y),
            "z" => Some(DefaultGate::Z),
            "s" | "phase" => Some(DefaultGate::S),
            "sdag" | "phasedag" => Some(DefaultGate::Sdag),
            "t" => Some(DefaultGate::T),
            "tdag" => Some(DefaultGate::Tdag),
            "x90" | "rx90" => Some(DefaultGate::Rx90),
            "mx90" | "mrx90" => Some(DefaultGate::MRx90),
            "x180" | "rx180" => Some(DefaultGate::Rx180),
            "y90" | "ry90" => Some(DefaultGate::Ry90),
            "my90" | "mry90" => Some(DefaultGate::MRy90),
            "y180" | "ry180" => Some(DefaultGate::Ry180),
            "rx" => Some(DefaultGate::Rx(angle.unwrap_or(0.0))),
            "ry" => Some(DefaultGate::Ry(angle.unwrap_or(0.0))),
            "rz" => Some(DefaultGate::Rz(angle.unwrap_or(0.0))),
            "prepz" | "prep_z" => Some(DefaultGate::Prepz),
            "measure" | "measz" => Some(DefaultGate::Measure),
            "nop" => Some(DefaultGate::Nop),
            "cnot" | "cx" => Some(DefaultGate::Cnot),
            "cz" | "cphase" => Some(DefaultGate::Cz),
            "swap" => Some(DefaultGate::Swap),
            "toffoli" | "ccx" => Some(DefaultGate::Toffoli),
            _ => None,
        }
    }

    /// The circuit name of this gate.
    pub fn name(&self) -> &'static str {
        match self {
            DefaultGate::I => "i",
            DefaultGate::H => "h",
            DefaultGate::X => "x",
            DefaultGate::Y => "y",
            DefaultGate::Z => "z",
            DefaultGate::S => "s",
            DefaultGate::Sdag => "sdag",
            DefaultGate::T => "t",
            DefaultGate::Tdag => "tdag",
            DefaultGate::Rx90 => "x90",
            DefaultGate::MRx90 => "mx90",
            DefaultGate::Rx180 => "x180",
            DefaultGate::Ry90 => "y90",
            DefaultGate::MRy90 => "my90",
            DefaultGate::Ry180 => "y180",
            DefaultGate::Rx(_) => "rx",
            DefaultGate::Ry(_) => "ry",
            DefaultGate::Rz(_) => "rz",
            DefaultGate::Prepz => "prepz",
            DefaultGate::Measure => "measure",
            DefaultGate::Nop => "nop",
            DefaultGate::Cnot => "cnot",
            DefaultGate::Cz => "cz",
            DefaultGate::Swap => "swap",
            DefaultGate::Toffoli => "toffoli",
        }
    }

    /// Number of qubit operands.
    pub fn num_qubits(&self) -> u32 {
        match self {
            DefaultGate::Cnot | DefaultGate::Cz | DefaultGate::Swap => 2,
            DefaultGate::Toffoli => 3,
            _ => 1,
        }
    }

    /// Fixed duration in nanoseconds.
    pub fn duration(&self) -> u64 {
        match self {
            DefaultGate::Nop => 20,
            DefaultGate::Cnot | DefaultGate::Cz | DefaultGate::Swap => 80,
            DefaultGate::Toffoli => 160,
            _ => 40,
        }
    }

    /// Rotation angle, for parameterized gates.
    pub fn angle(&self) -> Option<f64> {
        match self {
            DefaultGate::Rx(a) | DefaultGate::Ry(a) | DefaultGate::Rz(a) => Some(*a),
            _ => None,
        }
    }

    /// Signal type claimed on the instrument channels.
    pub fn signal(&self) -> SignalType {
        match self {
            DefaultGate::Measure => SignalType::Readout,
            DefaultGate::Cnot | DefaultGate::Cz | DefaultGate::Swap | DefaultGate::Toffoli => {
                SignalType::Flux
            }
            DefaultGate::Prepz | DefaultGate::Nop | DefaultGate::I => SignalType::None,
            _ => SignalType::Mw,
        }
    }

    /// Commutation class for dependence-graph construction.
    pub fn commute_class(&self) -> CommuteClass {
        match self {
            DefaultGate::Cz => CommuteClass::CzLike,
            DefaultGate::Cnot => CommuteClass::CnotLike,
            _ => CommuteClass::Other,
        }
    }

    /// Unitary matrix (row-major, 2^n x 2^n) for the gates that have a
    /// closed form worth carrying. Rotations compute theirs; prep,
    /// measure and nop have none.
    pub fn matrix(&self) -> Option<Vec<Complex64>> {
        let r = |re: f64| Complex64::new(re, 0.0);
        let im = |i: f64| Complex64::new(0.0, i);
        let sq = std::f64::consts::FRAC_1_SQRT_2;
        match self {
            DefaultGate::I => Some(vec![r(1.0), r(0.0), r(0.0), r(1.0)]),
            DefaultGate::X | DefaultGate::Rx180 => {
                Some(vec![r(0.0), r(1.0), r(1.0), r(0.0)])
            }
            DefaultGate::Y | DefaultGate::Ry180 => {
                Some(vec![r(0.0), im(-1.0), im(1.0), r(0.0)])
            }
            DefaultGate::Z => Some(vec![r(1.0), r(0.0), r(0.0), r(-1.0)]),
            DefaultGate::H => Some(vec![r(sq), r(sq), r(sq), r(-sq)]),
            DefaultGate::S => Some(vec![r(1.0), r(0.0), r(0.0), im(1.0)]),
            DefaultGate::Sdag => Some(vec![r(1.0), r(0.0), r(0.0), im(-1.0)]),
            DefaultGate::T => Some(vec![r(1.0), r(0.0), r(0.0), Complex64::new(sq, sq)]),
            DefaultGate::Tdag => Some(vec![r(1.0), r(0.0), r(0.0), Complex64::new(sq, -sq)]),
            DefaultGate::Rx(a) | DefaultGate::Ry(a) | DefaultGate::Rz(a) => {
                let (c, s) = ((a / 2.0).cos(), (a / 2.0).sin());
                Some(match self {
                    DefaultGate::Rx(_) => vec![r(c), im(-s), im(-s), r(c)],
                    DefaultGate::Ry(_) => vec![r(c), r(-s), r(s), r(c)],
                    _ => vec![
                        Complex64::new(c, -s),
                        r(0.0),
                        r(0.0),
                        Complex64::new(c, s),
                    ],
                })
            }
            DefaultGate::Cnot => Some(vec![
                r(1.0), r(0.0), r(0.0), r(0.0),
                r(0.0), r(1.0), r(0.0), r(0.0),
                r(0.0), r(0.0), r(0.0), r(1.0),
                r(0.0), r(0.0), r(1.0), r(0.0),
            ]),
            DefaultGate::Cz => Some(vec![
                r(1.0), r(0.0), r(0.0), r(0.0),
                r(0.0), r(1.0), r(0.0), r(0.0),
                r(0.0), r(0.0), r(1.0), r(0.0),
                r(0.0), r(0.0), r(0.0), r(-1.0),
            ]),
            DefaultGate::Swap => Some(vec![
                r(1.0), r(0.0), r(0.0), r(0.0),
                r(0.0), r(0.0), r(1.0), r(0.0),
                r(0.0), r(1.0), r(0.0), r(0.0),
                r(0.0), r(0.0), r(0.0), r(1.0),
            ]),
            _ => None,
        }
    }
}
