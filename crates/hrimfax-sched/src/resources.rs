//! Resource state for constrained scheduling.
//!
//! Tracks, per qubit, the first free cycle and the signal type of the
//! last operation (for inter-signal buffers), and per declared channel
//! resource the first free cycle of each shared unit. A channel
//! resource is a `resources` entry with a signal type and a
//! `connection_map`; qubits sharing a unit cannot start operations of
//! that signal type in overlapping cycle ranges.

use hrimfax_ir::{Instruction, SignalType};
use hrimfax_platform::Platform;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone)]
struct Channel {
    name: String,
    signal: SignalType,
    qubit_unit: FxHashMap<u32, usize>,
    unit_free: Vec<u64>,
}

/// Mutable resource state consumed by one scheduling run.
#[derive(Debug, Clone)]
pub struct ResourceManager {
    cycle_time: u64,
    qubit_free: Vec<u64>,
    qubit_signal: Vec<SignalType>,
    buffers: FxHashMap<(SignalType, SignalType), u64>,
    channels: Vec<Channel>,
}

const SIGNALS: [SignalType; 4] = [
    SignalType::None,
    SignalType::Mw,
    SignalType::Flux,
    SignalType::Readout,
];

impl ResourceManager {
    /// Fresh state for a platform.
    pub fn new(platform: &Platform) -> Self {
        let mut buffers = FxHashMap::default();
        for from in SIGNALS {
            for to in SIGNALS {
                let cycles = platform.buffer_cycles(from, to);
                if cycles > 0 {
                    buffers.insert((from, to), cycles);
                }
            }
        }
        let mut channels = Vec::new();
        for (name, def) in platform.resources() {
            let Some(signal) = def.signal.as_deref().and_then(SignalType::parse) else {
                continue;
            };
            if def.connection_map.is_empty() {
                continue;
            }
            let mut qubit_unit = FxHashMap::default();
            for (unit, qubits) in &def.connection_map {
                let Ok(unit) = unit.parse::<usize>() else {
                    continue;
                };
                for &q in qubits {
                    qubit_unit.insert(q, unit);
                }
            }
            channels.push(Channel {
                name: name.clone(),
                signal,
                qubit_unit,
                unit_free: vec![0; def.count as usize],
            });
        }
        ResourceManager {
            cycle_time: platform.cycle_time(),
            qubit_free: vec![0; platform.qubit_count() as usize],
            qubit_signal: vec![SignalType::None; platform.qubit_count() as usize],
            buffers,
            channels,
        }
    }

    /// Whether any channel resources are declared.
    pub fn has_channels(&self) -> bool {
        !self.channels.is_empty()
    }

    fn buffer(&self, from: SignalType, to: SignalType) -> u64 {
        self.buffers.get(&(from, to)).copied().unwrap_or(0)
    }

    /// Whether `instr` may start at `cycle`.
    pub fn available(&self, cycle: u64, instr: &Instruction) -> bool {
        for q in &instr.qubits {
            let q = q.0 as usize;
            let gap = self.buffer(self.qubit_signal[q], instr.signal);
            if cycle < self.qubit_free[q] + gap {
                return false;
            }
        }
        for ch in &self.channels {
            if ch.signal != instr.signal {
                continue;
            }
            for q in &instr.qubits {
                if let Some(&unit) = ch.qubit_unit.get(&q.0) {
                    if unit < ch.unit_free.len() && cycle < ch.unit_free[unit] {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Claim the resources of `instr` starting at `cycle`.
    pub fn reserve(&mut self, cycle: u64, instr: &Instruction) {
        let end = cycle + instr.duration_in_cycles(self.cycle_time);
        for q in &instr.qubits {
            let q = q.0 as usize;
            self.qubit_free[q] = end;
            self.qubit_signal[q] = instr.signal;
        }
        for ch in &mut self.channels {
            if ch.signal != instr.signal {
                continue;
            }
            for q in &instr.qubits {
                if let Some(&unit) = ch.qubit_unit.get(&q.0) {
                    if unit < ch.unit_free.len() {
                        ch.unit_free[unit] = ch.unit_free[unit].max(end);
                    }
                }
            }
        }
    }

    /// Names of the declared channel resources, for diagnostics.
    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrimfax_ir::QubitId;

    fn platform() -> Platform {
        Platform::from_json_str(
            "rm",
            r#"{
                "hardware_settings": {
                    "qubit_number": 4,
                    "cycle_time": 20,
                    "mw_flux_buffer": 40
                },
                "resources": {
                    "wave_gen": {
                        "count": 2,
                        "type": "mw",
                        "connection_map": { "0": [0, 1], "1": [2, 3] }
                    }
                }
            }"#,
        )
        .unwrap()
    }

    fn mw(q: u32) -> Instruction {
        let mut i = Instruction::unitary("x", vec![QubitId(q)], 40);
        i.signal = SignalType::Mw;
        i
    }

    #[test]
    fn test_qubit_serializes() {
        let mut rm = ResourceManager::new(&platform());
        let a = mw(0);
        assert!(rm.available(1, &a));
        rm.reserve(1, &a);
        assert!(!rm.available(2, &a));
        assert!(rm.available(3, &a));
    }

    #[test]
    fn test_shared_channel_blocks_neighbor() {
        let mut rm = ResourceManager::new(&platform());
        rm.reserve(1, &mw(0));
        // q1 shares unit 0 with q0.
        assert!(!rm.available(1, &mw(1)));
        assert!(rm.available(3, &mw(1)));
        // q2 is on unit 1 and unaffected.
        assert!(rm.available(1, &mw(2)));
    }

    #[test]
    fn test_buffer_between_signal_types() {
        let mut rm = ResourceManager::new(&platform());
        rm.reserve(1, &mw(0));
        let mut flux = Instruction::unitary("cz", vec![QubitId(0), QubitId(1)], 80);
        flux.signal = SignalType::Flux;
        // mw ends at cycle 3; mw->flux buffer is 2 cycles.
        assert!(!rm.available(3, &flux));
        assert!(!rm.available(4, &flux));
        assert!(rm.available(5, &flux));
    }
}
