//! Builds and compiles a small shuttling program on the 2x2 grid
//! device: prepare all sites, entangle the bottom row, shuttle a qubit
//! up and back, and read everything out.

use anyhow::Result;
use clap::Parser;
use console::style;
use hrimfax_compile::{CompilerOptions, KernelBuilder, Program};
use hrimfax_demos::{print_header, print_info, print_success, GRID_2X2};
use hrimfax_platform::Platform;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "demo-shuttling", about = "Compile a shuttling circuit")]
struct Args {
    /// Output directory for the qasm files.
    #[arg(short, long, default_value = "test_output")]
    output_dir: PathBuf,

    /// Scheduling direction.
    #[arg(long, value_parser = ["ASAP", "ALAP"], default_value = "ALAP")]
    scheduler: String,

    /// Print the scheduled qasm.
    #[arg(long)]
    show_qasm: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();
    let args = Args::parse();

    print_header("Shuttling demo");
    let platform = Platform::from_json_str("grid_2x2", GRID_2X2)?;
    print_info("qubits", platform.qubit_count());
    print_info("cycle time", format!("{} ns", platform.cycle_time()));

    let mut kernel = KernelBuilder::new("main", &platform, 4, false);
    for q in 0..4 {
        kernel.prepz(q)?;
    }
    kernel.gate("x", &[0])?;
    kernel.gate("cnot", &[0, 1])?;
    kernel.gate("shuttle_up", &[2])?;
    kernel.gate("shuttle_down", &[2])?;
    for q in 0..4 {
        kernel.measure(q, q)?;
    }

    let kernel = kernel.finish();
    let mut program = Program::new("shuttling_demo", platform, 4, 4)?;
    program.add_kernel(kernel)?;

    let mut options = CompilerOptions::default();
    options.output_dir = args.output_dir;
    options.set("scheduler", &args.scheduler)?;
    let report = program.compile(&options)?;

    for (kernel, depth) in &report.kernel_depths {
        print_info("depth", format!("{kernel}: {depth} cycles"));
    }
    if args.show_qasm {
        println!("\n{}", style(&report.scheduled_qasm).dim());
    }
    if let Some(path) = &report.scheduled_path {
        print_success(&format!("wrote {}", path.display()));
    }
    Ok(())
}
