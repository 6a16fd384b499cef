//! Compiler options.
//!
//! Options are a typed struct; the string `set`/`get` interface exists
//! for the CLI and for embedding, and validates values on the way in
//! rather than at first use.

use crate::error::{CompileError, CompileResult};
use hrimfax_sched::SchedulerKind;
use std::path::PathBuf;

/// How verbose the compiler's own reporting is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    /// No output at all.
    #[default]
    Nothing,
    /// Errors only.
    Error,
    /// Errors and warnings.
    Warning,
    /// Progress information.
    Info,
    /// Everything.
    Debug,
}

/// Toffoli decomposition selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToffoliDecomposition {
    /// Leave Toffoli gates alone.
    #[default]
    No,
    /// Textbook network: six CNOTs and seven T-phase gates.
    NielsenChuang,
    /// Relative-phase Margolus network: three CNOTs and four Y
    /// rotations.
    Margolus,
}

/// The full option set with its defaults.
#[derive(Debug, Clone)]
pub struct CompilerOptions {
    /// Reporting verbosity. Defaults to silent.
    pub log_level: LogLevel,
    /// Directory the output files land in.
    pub output_dir: PathBuf,
    /// Run the circuit optimizer before scheduling.
    pub optimize: bool,
    /// Scheduling direction.
    pub scheduler: SchedulerKind,
    /// Balance bundle sizes after ALAP.
    pub scheduler_uniform: bool,
    /// Exploit CZ/CNOT commutation during dependence analysis.
    pub scheduler_commute: bool,
    /// Fall back to the built-in gate set for names the platform does
    /// not define.
    pub use_default_gates: bool,
    /// Toffoli decomposition selection.
    pub decompose_toffoli: ToffoliDecomposition,
    /// Write the qasm files. When off the pipeline still runs and the
    /// report carries the texts.
    pub write_qasm: bool,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        CompilerOptions {
            log_level: LogLevel::Nothing,
            output_dir: PathBuf::from("test_output"),
            optimize: false,
            scheduler: SchedulerKind::Alap,
            scheduler_uniform: false,
            scheduler_commute: true,
            use_default_gates: false,
            decompose_toffoli: ToffoliDecomposition::No,
            write_qasm: true,
        }
    }
}

impl CompilerOptions {
    /// The scheduler kind after folding in the uniform flag.
    pub fn scheduler_kind(&self) -> SchedulerKind {
        if self.scheduler_uniform && self.scheduler == SchedulerKind::Alap {
            SchedulerKind::AlapUniform
        } else {
            self.scheduler
        }
    }

    /// Set an option by name, validating the value.
    pub fn set(&mut self, name: &str, value: &str) -> CompileResult<()> {
        match name {
            "log_level" => {
                self.log_level = match value {
                    "LOG_NOTHING" => LogLevel::Nothing,
                    "LOG_ERROR" => LogLevel::Error,
                    "LOG_WARNING" => LogLevel::Warning,
                    "LOG_INFO" => LogLevel::Info,
                    "LOG_DEBUG" => LogLevel::Debug,
                    _ => {
                        return Err(CompileError::InvalidOptionValue {
                            name: "log_level",
                            value: value.to_string(),
                            allowed: "LOG_NOTHING|LOG_ERROR|LOG_WARNING|LOG_INFO|LOG_DEBUG",
                        })
                    }
                }
            }
            "output_dir" => self.output_dir = PathBuf::from(value),
            "optimize" => self.optimize = parse_bool("optimize", value)?,
            "scheduler" => {
                self.scheduler = match value {
                    "ASAP" => SchedulerKind::Asap,
                    "ALAP" => SchedulerKind::Alap,
                    _ => {
                        return Err(CompileError::InvalidOptionValue {
                            name: "scheduler",
                            value: value.to_string(),
                            allowed: "ASAP|ALAP",
                        })
                    }
                }
            }
            "scheduler_uniform" => {
                self.scheduler_uniform = parse_bool("scheduler_uniform", value)?
            }
            "scheduler_commute" => {
                self.scheduler_commute = parse_bool("scheduler_commute", value)?
            }
            "use_default_gates" => {
                self.use_default_gates = parse_bool("use_default_gates", value)?
            }
            "write_qasm" => self.write_qasm = parse_bool("write_qasm", value)?,
            "decompose_toffoli" => {
                self.decompose_toffoli = match value {
                    "no" => ToffoliDecomposition::No,
                    "NC" => ToffoliDecomposition::NielsenChuang,
                    "AM" => ToffoliDecomposition::Margolus,
                    _ => {
                        return Err(CompileError::InvalidOptionValue {
                            name: "decompose_toffoli",
                            value: value.to_string(),
                            allowed: "no|NC|AM",
                        })
                    }
                }
            }
            _ => return Err(CompileError::UnknownOption(name.to_string())),
        }
        Ok(())
    }

    /// Read an option back in its string form.
    pub fn get(&self, name: &str) -> CompileResult<String> {
        let value = match name {
            "log_level" => match self.log_level {
                LogLevel::Nothing => "LOG_NOTHING",
                LogLevel::Error => "LOG_ERROR",
                LogLevel::Warning => "LOG_WARNING",
                LogLevel::Info => "LOG_INFO",
                LogLevel::Debug => "LOG_DEBUG",
            }
            .to_string(),
            "output_dir" => self.output_dir.display().to_string(),
            "optimize" => bool_str(self.optimize),
            "scheduler" => match self.scheduler {
                SchedulerKind::Asap => "ASAP".to_string(),
                _ => "ALAP".to_string(),
            },
            "scheduler_uniform" => bool_str(self.scheduler_uniform),
            "scheduler_commute" => bool_str(self.scheduler_commute),
            "use_default_gates" => bool_str(self.use_default_gates),
            "write_qasm" => bool_str(self.write_qasm),
            "decompose_toffoli" => match self.decompose_toffoli {
                ToffoliDecomposition::No => "no",
                ToffoliDecomposition::NielsenChuang => "NC",
                ToffoliDecomposition::Margolus => "AM",
            }
            .to_string(),
            _ => return Err(CompileError::UnknownOption(name.to_string())),
        };
        Ok(value)
    }
}

fn parse_bool(name: &'static str, value: &str) -> CompileResult<bool> {
    match value {
        "yes" => Ok(true),
        "no" => Ok(false),
        _ => Err(CompileError::InvalidOptionValue {
            name,
            value: value.to_string(),
            allowed: "yes|no",
        }),
    }
}

fn bool_str(v: bool) -> String {
    if v { "yes" } else { "no" }.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let o = CompilerOptions::default();
        assert_eq!(o.log_level, LogLevel::Nothing);
        assert_eq!(o.output_dir, PathBuf::from("test_output"));
        assert!(!o.optimize);
        assert_eq!(o.scheduler, SchedulerKind::Alap);
        assert!(o.scheduler_commute);
        assert!(!o.use_default_gates);
    }

    #[test]
    fn test_string_roundtrip() {
        let mut o = CompilerOptions::default();
        o.set("scheduler", "ASAP").unwrap();
        o.set("use_default_gates", "yes").unwrap();
        o.set("decompose_toffoli", "NC").unwrap();
        assert_eq!(o.get("scheduler").unwrap(), "ASAP");
        assert_eq!(o.get("use_default_gates").unwrap(), "yes");
        assert_eq!(o.get("decompose_toffoli").unwrap(), "NC");
    }

    #[test]
    fn test_invalid_value_rejected() {
        let mut o = CompilerOptions::default();
        let err = o.set("scheduler", "sideways").unwrap_err();
        assert!(matches!(err, CompileError::InvalidOptionValue { .. }));
        let err = o.set("no_such_option", "x").unwrap_err();
        assert!(matches!(err, CompileError::UnknownOption(_)));
    }

    #[test]
    fn test_uniform_folds_into_kind() {
        let mut o = CompilerOptions::default();
        o.set("scheduler_uniform", "yes").unwrap();
        assert_eq!(o.scheduler_kind(), SchedulerKind::AlapUniform);
        o.set("scheduler", "ASAP").unwrap();
        assert_eq!(o.scheduler_kind(), SchedulerKind::Asap);
    }
}
