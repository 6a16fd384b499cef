//! Shared pieces of the demo binaries: console output helpers and a
//! small shuttling-grid device configuration.

use console::style;

/// A 2x2 shuttling grid with decomposed CNOT and vertical shuttle
/// operations.
pub const GRID_2X2: &str = r#"{
    "eqasm_compiler": "none",
    "hardware_settings": {
        "qubit_number": 4,
        "cycle_time": 20,
        "mw_readout_buffer": 20
    },
    "instructions": {
        "prepz": { "duration": 200 },
        "x": { "duration": 40, "type": "mw" },
        "y90": { "duration": 40, "type": "mw" },
        "my90": { "duration": 40, "type": "mw" },
        "cz": { "duration": 80, "type": "flux" },
        "shuttle_up": { "duration": 120, "type": "flux" },
        "shuttle_down": { "duration": 120, "type": "flux" },
        "measure": { "duration": 300, "type": "readout" }
    },
    "gate_decomposition": {
        "cnot %0,%1": ["y90 %1", "cz %0,%1", "my90 %1"]
    },
    "topology": {
        "x_size": 2,
        "y_size": 2,
        "qubits": [
            { "id": 0, "x": 0, "y": 0 },
            { "id": 1, "x": 1, "y": 0 },
            { "id": 2, "x": 0, "y": 1 },
            { "id": 3, "x": 1, "y": 1 }
        ],
        "edges": [
            { "id": 0, "src": 0, "dst": 1 },
            { "id": 1, "src": 2, "dst": 3 },
            { "id": 2, "src": 0, "dst": 2 },
            { "id": 3, "src": 1, "dst": 3 }
        ]
    }
}"#;

pub fn print_header(title: &str) {
    println!("\n{}", style(title).bold().underlined());
}

pub fn print_info(label: &str, value: impl std::fmt::Display) {
    println!("  {} {value}", style(format!("{label}:")).dim());
}

pub fn print_success(message: &str) {
    println!("{} {message}", style("ok").green().bold());
}
