//! Hrimfax Hardware Platform Configuration
//!
//! A [`Platform`] describes the target hardware: qubit count, cycle
//! time, the instruction set with per-gate durations and signal types,
//! gate decomposition rules, scheduling resources, and qubit topology.
//! Platforms are loaded from a JSON configuration file.
//!
//! # Example
//!
//! ```rust
//! use hrimfax_platform::Platform;
//!
//! let json = r#"{
//!     "eqasm_compiler": "none",
//!     "hardware_settings": { "qubit_number": 5, "cycle_time": 20 },
//!     "instructions": {
//!         "x": { "duration": 40, "type": "mw" }
//!     }
//! }"#;
//! let platform = Platform::from_json_str("five_q", json).unwrap();
//! assert_eq!(platform.qubit_count(), 5);
//! assert_eq!(platform.cycle_time(), 20);
//! ```

pub mod config;
pub mod error;
pub mod platform;
pub mod topology;

pub use config::{HardwareSettings, InstructionDef, PlatformConfig, ResourceDef};
pub use error::{PlatformError, PlatformResult};
pub use platform::Platform;
pub use topology::{Edge, Topology};
