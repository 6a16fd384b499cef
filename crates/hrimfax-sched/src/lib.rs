//! Hrimfax Scheduler
//!
//! Assigns a start cycle to every instruction of a kernel. The
//! dependence graph ([`DepGraph`]) captures the ordering constraints
//! between instructions, including the commutation freedom of CZ
//! operands and CNOT controls; the [`Scheduler`] then places
//! instructions ASAP or ALAP along that graph, optionally constrained
//! by the platform's resource declarations and inter-signal buffers.
//!
//! # Example
//!
//! ```rust
//! use hrimfax_ir::{Kernel, QubitId};
//! use hrimfax_platform::Platform;
//! use hrimfax_sched::{Scheduler, SchedulerKind};
//!
//! let json = r#"{
//!     "hardware_settings": { "qubit_number": 3, "cycle_time": 20 }
//! }"#;
//! let platform = Platform::from_json_str("three_q", json).unwrap();
//!
//! let mut k = Kernel::new("k", 3, 0);
//! k.h(QubitId(0)).unwrap();
//! k.x(QubitId(1)).unwrap();
//! k.cnot(QubitId(0), QubitId(1)).unwrap();
//!
//! let scheduler = Scheduler::new(&platform, SchedulerKind::Asap, true);
//! let schedule = scheduler.run(&k).unwrap();
//! // h and x are independent and share the first bundle.
//! assert_eq!(schedule.bundles[0].instructions.len(), 2);
//! ```

pub mod depgraph;
pub mod error;
pub mod resources;
pub mod schedule;

pub use depgraph::{DepGraph, DepType};
pub use error::{SchedError, SchedResult};
pub use resources::ResourceManager;
pub use schedule::{Schedule, Scheduler, SchedulerKind};
