//! `hrimfax compile`

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use hrimfax_compile::{kernels_from_qasm, CompilerOptions, Program};
use hrimfax_platform::Platform;
use hrimfax_qasm::{QasmStatement, StatementGate};
use std::path::PathBuf;

#[derive(Args)]
pub struct CompileArgs {
    /// Input qasm file.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Platform configuration JSON.
    #[arg(short, long)]
    pub config: PathBuf,

    /// Program name; output files derive from it. Defaults to the
    /// input file stem.
    #[arg(short, long)]
    pub name: Option<String>,

    /// Output directory.
    #[arg(short, long, default_value = "test_output")]
    pub output_dir: PathBuf,

    /// Scheduling direction.
    #[arg(long, value_parser = ["ASAP", "ALAP"], default_value = "ALAP")]
    pub scheduler: String,

    /// Balance bundle sizes after ALAP.
    #[arg(long)]
    pub uniform: bool,

    /// Disable commutation-aware dependence analysis.
    #[arg(long)]
    pub no_commute: bool,

    /// Run the circuit optimizer.
    #[arg(long)]
    pub optimize: bool,

    /// Toffoli decomposition.
    #[arg(long, value_parser = ["no", "NC", "AM"], default_value = "no")]
    pub decompose_toffoli: String,

    /// Fall back to the built-in gate set for undefined names.
    #[arg(long)]
    pub use_default_gates: bool,
}

pub fn run(args: CompileArgs) -> Result<()> {
    let platform_name = args
        .config
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "platform".to_string());
    let platform = Platform::from_file(&platform_name, &args.config)
        .with_context(|| format!("loading platform {}", args.config.display()))?;

    let src = std::fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let parsed = hrimfax_qasm::parse(&src)
        .with_context(|| format!("parsing {}", args.input.display()))?;

    let creg_count = max_creg(&parsed);
    let kernels = kernels_from_qasm(&parsed, &platform, creg_count, args.use_default_gates)
        .context("resolving gates against the platform")?;

    let name = args.name.clone().unwrap_or_else(|| {
        args.input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "program".to_string())
    });
    let mut program = Program::new(&name, platform.clone(), platform.qubit_count(), creg_count)?;
    for kernel in kernels {
        program.add_kernel(kernel)?;
    }

    let mut options = CompilerOptions::default();
    options.output_dir = args.output_dir.clone();
    options.set("scheduler", &args.scheduler)?;
    options.scheduler_uniform = args.uniform;
    options.scheduler_commute = !args.no_commute;
    options.optimize = args.optimize;
    options.set("decompose_toffoli", &args.decompose_toffoli)?;
    options.use_default_gates = args.use_default_gates;

    let report = program.compile(&options)?;

    println!("{} {}", style("compiled").green().bold(), name);
    if let Some(path) = &report.qasm_path {
        println!("  {} {}", style("qasm:").dim(), path.display());
    }
    if let Some(path) = &report.scheduled_path {
        println!("  {} {}", style("scheduled:").dim(), path.display());
    }
    for (kernel, depth) in &report.kernel_depths {
        println!(
            "  {} {kernel}: {depth} cycles",
            style("depth:").dim()
        );
    }
    Ok(())
}

fn max_creg(program: &hrimfax_qasm::QasmProgram) -> u32 {
    let gate_max = |g: &StatementGate| g.cregs.iter().max().map(|&c| c + 1).unwrap_or(0);
    program
        .kernels
        .iter()
        .flat_map(|k| &k.statements)
        .map(|s| match s {
            QasmStatement::Gate(g) => gate_max(g),
            QasmStatement::Parallel(gates) => gates.iter().map(gate_max).max().unwrap_or(0),
            QasmStatement::Wait(_) => 0,
        })
        .max()
        .unwrap_or(0)
}
